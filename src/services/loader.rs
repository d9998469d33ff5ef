//! Pool loader: turns a text file or media folder into a bounded [`PoolCollection`].
//!
//! Loading is plain blocking file I/O. The async entry point,
//! [`load_off_thread`], runs it on tokio's blocking pool so the caller's
//! scheduler never waits on the disk.
//!
//! # Text sources
//!
//! The file must be UTF-8. Byte-order marks are stripped, line endings are
//! normalized to `\n`, every line is NFC-normalized and trimmed, blank lines
//! are skipped, overlong lines are truncated (or rejected), and at most
//! `max_lines` lines are kept.
//!
//! # Media sources
//!
//! Directory entries are sorted by name, filtered by the extension allow-list
//! and the include/exclude globs, and capped at `max_lines` files.

use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::SystemTime;

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use unicode_normalization::UnicodeNormalization;

use crate::error::LoadError;
use crate::models::{
    Item, Limits, LoadReport, MediaFile, OverlongPolicy, PoolCollection, PoolKind, PoolSource,
};
use crate::services::patterns::has_allowed_extension;

/// Seam between the controller and the filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait SourceLoader: Send + Sync {
    fn load(&self, source: &PoolSource, limits: &Limits) -> Result<PoolCollection, LoadError>;
}

/// Loader backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, source: &PoolSource, limits: &Limits) -> Result<PoolCollection, LoadError> {
        load_source(source, limits)
    }
}

/// Run `loader` on the blocking thread pool and await its result.
pub async fn load_off_thread(
    loader: Arc<dyn SourceLoader>,
    source: PoolSource,
    limits: Limits,
) -> Result<PoolCollection, LoadError> {
    let path = source.path.clone();
    tokio::task::spawn_blocking(move || loader.load(&source, &limits))
        .await
        .unwrap_or_else(|e| Err(LoadError::unreadable(path, format!("loader task failed: {}", e))))
}

/// Load a source synchronously.
pub fn load_source(source: &PoolSource, limits: &Limits) -> Result<PoolCollection, LoadError> {
    match source.kind {
        PoolKind::Lines => load_lines(&source.path, limits),
        PoolKind::Media => load_media(source, limits),
    }
}

fn load_lines(path: &Utf8Path, limits: &Limits) -> Result<PoolCollection, LoadError> {
    let metadata = stat(path)?;
    if !metadata.is_file() {
        return Err(LoadError::unreadable(path, "not a regular file"));
    }

    let bytes = fs::read(path).map_err(|e| LoadError::unreadable(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| LoadError::unreadable(path, e))?;

    let (lines, mut report) = normalize_lines(&text, limits);
    report.modified = metadata.modified().ok().map(to_utc);

    tracing::debug!(
        "Loaded {} lines from {} (truncated={}, rejected={}, blank={})",
        lines.len(),
        path,
        report.truncated,
        report.rejected,
        report.ignored_blank
    );

    Ok(PoolCollection::new(
        lines.into_iter().map(Item::Line).collect(),
        report,
    ))
}

/// Normalize decoded text into pool lines.
pub fn normalize_lines(text: &str, limits: &Limits) -> (Vec<String>, LoadReport) {
    let text = text.replace('\u{feff}', "").replace("\r\n", "\n").replace('\r', "\n");

    let mut lines = Vec::new();
    let mut report = LoadReport::default();

    for raw in text.lines() {
        if lines.len() >= limits.max_lines {
            break;
        }

        let normalized: String = raw.nfc().collect();
        let line = normalized.trim();
        if line.is_empty() {
            report.ignored_blank += 1;
            continue;
        }

        if line.chars().count() > limits.max_chars {
            match limits.overlong {
                OverlongPolicy::Truncate => {
                    report.truncated += 1;
                    let cut: String = line.chars().take(limits.max_chars).collect();
                    lines.push(cut.trim_end().to_string());
                }
                OverlongPolicy::Reject => {
                    report.rejected += 1;
                }
            }
            continue;
        }

        lines.push(line.to_string());
    }

    (lines, report)
}

fn load_media(source: &PoolSource, limits: &Limits) -> Result<PoolCollection, LoadError> {
    let dir = &source.path;
    let metadata = stat(dir)?;
    if !metadata.is_dir() {
        return Err(LoadError::unreadable(dir, "not a directory"));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| LoadError::unreadable(dir, e))? {
        let entry = entry.map_err(|e| LoadError::unreadable(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::debug!("Skipping non UTF-8 entry {:?} in {}", raw, dir),
        }
    }
    names.sort();

    let mut files = Vec::new();
    let mut latest: Option<SystemTime> = None;

    for name in names {
        if files.len() >= limits.max_lines {
            break;
        }
        if !has_allowed_extension(&name, &source.extensions) || !source.filter.matches(&name) {
            continue;
        }

        let path = dir.join(&name);
        // Entries may vanish between listing and stat.
        let Ok(file_meta) = fs::metadata(&path) else {
            continue;
        };
        if !file_meta.is_file() {
            continue;
        }
        if let Ok(modified) = file_meta.modified() {
            latest = Some(latest.map_or(modified, |current| current.max(modified)));
        }

        files.push(Item::Media(MediaFile { name, path }));
    }

    tracing::debug!("Scanned {} media files in {}", files.len(), dir);

    let report = LoadReport {
        modified: latest.map(to_utc),
        ..LoadReport::default()
    };
    Ok(PoolCollection::new(files, report))
}

fn stat(path: &Utf8Path) -> Result<fs::Metadata, LoadError> {
    fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::SourceNotFound(path.to_path_buf()),
        _ => LoadError::unreadable(path, e),
    })
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}
