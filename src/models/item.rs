use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::SelectionMode;
use crate::services::patterns::PatternFilter;

/// The two kinds of pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// One text file, one item per non-blank line.
    Lines,
    /// One folder, one item per matching media file.
    Media,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lines => write!(f, "lines"),
            Self::Media => write!(f, "media"),
        }
    }
}

/// A media file inside a media pool folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// File name, e.g. `siren.mp3`.
    pub name: String,
    /// Absolute (resolved) path on disk.
    pub path: Utf8PathBuf,
}

/// One selectable entry of a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Line(String),
    Media(MediaFile),
}

impl Item {
    /// Text line, or the media file name.
    pub fn label(&self) -> &str {
        match self {
            Self::Line(line) => line,
            Self::Media(file) => &file.name,
        }
    }
}

/// Where a pool's items come from.
#[derive(Debug, Clone)]
pub struct PoolSource {
    pub kind: PoolKind,
    /// Resolved path of the text file or media folder.
    pub path: Utf8PathBuf,
    /// Root directory as configured (before resolution), used for URL mapping.
    pub root: String,
    /// File or folder name relative to `root`.
    pub name: String,
    pub filter: PatternFilter,
    /// Lowercased extension allow-list.
    pub extensions: Vec<String>,
}

impl PoolSource {
    /// File stem for lines pools, folder name for media pools.
    pub fn stem(&self) -> &str {
        match self.kind {
            PoolKind::Lines => self
                .name
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .filter(|stem| !stem.is_empty())
                .unwrap_or(&self.name),
            PoolKind::Media => &self.name,
        }
    }
}

/// Counters gathered while loading a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Lines cut down to `max_chars`.
    pub truncated: usize,
    /// Lines dropped for exceeding `max_chars` under the reject policy.
    pub rejected: usize,
    /// Blank lines skipped.
    pub ignored_blank: usize,
    /// File mtime, or the newest media file mtime.
    pub modified: Option<DateTime<Utc>>,
}

/// Ordered, bounded items of one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolCollection {
    items: Vec<Item>,
    report: LoadReport,
}

impl PoolCollection {
    pub fn new(items: Vec<Item>, report: LoadReport) -> Self {
        Self { items, report }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Diagnostics counters kept per pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub shuffle_count: u64,
    pub reload_count: u64,
    pub last_shuffle: Option<DateTime<Utc>>,
    pub last_reload: Option<DateTime<Utc>>,
}

/// Materialized output of the latest pick, plus pool metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    pub entity_id: String,
    pub name: String,
    pub kind: PoolKind,
    /// Selected line, media URL (or raw path), or the fallback.
    pub value: String,
    /// True when the pool has no items and `value` is the fallback.
    pub is_empty: bool,
    pub index: Option<usize>,
    /// Selected media file name.
    pub file: Option<String>,
    /// Selected media file absolute path.
    pub path: Option<Utf8PathBuf>,
    /// Public URL of the selected media file, if served.
    pub url: Option<String>,
    pub source: Utf8PathBuf,
    pub pool_size: usize,
    pub mode: SelectionMode,
    pub no_repeat: usize,
    pub history_len: usize,
    pub report: LoadReport,
    pub stats: PoolStats,
}
