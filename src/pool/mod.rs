//! Pool layer: controllers, the registry that owns them, and the commands
//! they accept.
//!
//! A [`PoolController`] owns one pool's items and selector and publishes a
//! [`PoolEvent`](crate::state::PoolEvent) after every operation. The
//! [`PoolRegistry`] maps entity ids to controllers and fans bulk commands out
//! to them concurrently.

pub mod command;
pub mod controller;
pub mod registry;
pub mod url;

pub use command::{CommandTarget, PoolCommand};
pub use controller::{PoolController, PoolSettings};
pub use registry::PoolRegistry;
pub use url::resolve_media_url;
