//! Data models for the pools engine.
//!
//! - [`PoolsConfig`]: options read from `pools.yaml` (selection mode, limits, filters, directories)
//! - [`PoolSource`]: where one pool's items come from
//! - [`PoolCollection`]: the ordered, bounded items of one pool
//! - [`SelectionResult`]: the materialized value observers see after each operation

pub mod config;
pub mod item;

pub use config::{
    Limits, LinesPoolEntry, MediaPoolEntry, OverlongPolicy, PoolsConfig, SelectionMode, ServeFrom,
};
pub use item::{
    Item, LoadReport, MediaFile, PoolCollection, PoolKind, PoolSource, PoolStats, SelectionResult,
};
