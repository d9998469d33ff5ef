//! Services module - disk-facing logic for pools.
//!
//! These functions are framework-agnostic: they take explicit inputs, touch
//! only the filesystem, and have no knowledge of controllers or observers.
//!
//! # Components
//!
//! - [`loader`]: reads a text file or media folder into a bounded
//!   [`PoolCollection`](crate::models::PoolCollection), with an async
//!   [`load_off_thread`] wrapper for the blocking pool.
//! - [`discovery`]: enumerates pool sources when none are configured.
//! - [`patterns`]: include/exclude glob filters, extension checks, slugs.

pub mod discovery;
pub mod loader;
pub mod patterns;

pub use discovery::discover_sources;
pub use loader::{FsLoader, SourceLoader, load_off_thread, load_source};
pub use patterns::{PatternFilter, slugify};
