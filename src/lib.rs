// Pools - random and sequential selection over line and media pools
//
// This is the library crate: loading, discovery, selection, controllers and
// the registry that owns them. The binary crate (main.rs) provides a CLI host.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pool;
pub mod selector;
pub mod services;
pub mod setup;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::{ConfigError, LoadError, QueryError};
pub use models::{PoolKind, PoolsConfig, SelectionMode, SelectionResult};
pub use pool::{CommandTarget, PoolCommand, PoolController, PoolRegistry};
pub use selector::Selector;
pub use setup::build_registry;
pub use state::{EventBus, PoolEvent};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
