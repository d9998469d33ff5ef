//! Error types shared across the crate.
//!
//! [`LoadError`] is recovered locally by the pool controller (empty pool plus
//! fallback). [`ConfigError`] only surfaces while pools are being set up.
//! [`QueryError`] is returned by the registry's value queries.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::models::PoolKind;

/// Errors raised while reading a pool source from disk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Pool source not found: {0}")]
    SourceNotFound(Utf8PathBuf),

    #[error("Pool source unreadable: {path}: {reason}")]
    SourceUnreadable { path: Utf8PathBuf, reason: String },
}

impl LoadError {
    pub(crate) fn unreadable(path: impl Into<Utf8PathBuf>, reason: impl ToString) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Path of the source that failed to load.
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::SourceNotFound(path) => path,
            Self::SourceUnreadable { path, .. } => path,
        }
    }
}

/// Errors detected while validating configuration or building pools.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Invalid glob pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate pool entity id: {0}")]
    DuplicateEntity(String),
}

/// Errors from looking up a pool's value by entity id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No pool bound to entity_id: {0}")]
    NotFound(String),

    #[error("Pool {entity_id} is a {actual} pool, expected {expected}")]
    WrongKind {
        entity_id: String,
        expected: PoolKind,
        actual: PoolKind,
    },
}
