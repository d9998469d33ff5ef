//! File-name filters and identifier helpers shared by the loader and discovery.

use std::sync::LazyLock;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::error::ConfigError;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("Invalid slug regex"));

/// Compiled include/exclude glob sets, matched against bare file names.
///
/// A name passes when it matches at least one include pattern (or no include
/// patterns are configured) and matches no exclude pattern.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    include: GlobSet,
    exclude: GlobSet,
    has_include: bool,
}

impl Default for PatternFilter {
    fn default() -> Self {
        Self {
            include: GlobSet::empty(),
            exclude: GlobSet::empty(),
            has_include: false,
        }
    }
}

impl PatternFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
            has_include: include.iter().any(|p| !p.trim().is_empty()),
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.has_include && !self.include.is_match(name) {
            return false;
        }
        !self.exclude.is_match(name)
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        let glob = GlobBuilder::new(pattern)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })
}

/// Case-insensitive suffix check against a lowercased extension allow-list.
pub fn has_allowed_extension(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
}

/// Lowercase and collapse every run of non-alphanumerics into one `_`.
pub fn slugify(text: &str) -> String {
    NON_ALNUM
        .replace_all(&text.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}
