use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::services::patterns::PatternFilter;

pub const DEFAULT_LINES_DIRECTORY: &str = "custom_components/pools/assets/lines";
pub const DEFAULT_MEDIA_DIRECTORY: &str = "custom_components/pools/assets/media";
pub const DEFAULT_NO_REPEAT: usize = 1;
pub const DEFAULT_MAX_LINES: usize = 255;
pub const DEFAULT_MAX_CHARS: usize = 255;

/// Upper bound on pools created per kind, whether listed or discovered.
pub const MAX_POOLS_PER_KIND: usize = 255;

const NO_REPEAT_MAX: usize = 1000;
const MAX_LINES_MAX: usize = 10_000;
const MAX_CHARS_MAX: usize = 20_000;

/// How a pool chooses its next item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Random,
    Queue,
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Queue => write!(f, "queue"),
        }
    }
}

/// Where media files are served from, which decides the URL shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServeFrom {
    /// Not web-served; only the raw file path is exposed.
    #[default]
    Component,
    /// Served under the public `/local/` static prefix.
    Www,
    /// Exposed as a media-source identifier.
    Media,
}

/// What to do with a line longer than `max_chars`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlongPolicy {
    #[default]
    Truncate,
    Reject,
}

/// Bounds applied by the loader to every collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of items kept (lines, or media files).
    pub max_lines: usize,
    /// Maximum characters per text line.
    pub max_chars: usize,
    pub overlong: OverlongPolicy,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            max_chars: DEFAULT_MAX_CHARS,
            overlong: OverlongPolicy::Truncate,
        }
    }
}

/// Explicitly configured lines pool (one text file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesPoolEntry {
    /// File name relative to `lines_directory`.
    pub file: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_suffix: Option<String>,
}

/// Explicitly configured media pool (one folder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPoolEntry {
    /// Folder name relative to `media_directory`.
    pub folder: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_suffix: Option<String>,
}

/// Complete pools configuration, as read from `pools.yaml`.
///
/// Every field has a default, so an empty document is a valid configuration
/// that auto-discovers pools under the default directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolsConfig {
    /// Base for relative directories.
    pub base_path: Utf8PathBuf,

    pub lines_directory: String,
    pub lines_pools: Vec<LinesPoolEntry>,

    pub media_directory: String,
    pub media_pools: Vec<MediaPoolEntry>,

    pub selection_mode: SelectionMode,
    pub no_repeat: usize,
    pub fallback_text: String,
    pub fallback_url: String,
    pub serve_from: ServeFrom,

    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub lines_extensions: Vec<String>,
    pub media_extensions: Vec<String>,

    pub max_lines: usize,
    pub max_chars: usize,
    pub overlong: OverlongPolicy,
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            base_path: Utf8PathBuf::from("."),
            lines_directory: DEFAULT_LINES_DIRECTORY.to_string(),
            lines_pools: Vec::new(),
            media_directory: DEFAULT_MEDIA_DIRECTORY.to_string(),
            media_pools: Vec::new(),
            selection_mode: SelectionMode::Random,
            no_repeat: DEFAULT_NO_REPEAT,
            fallback_text: String::new(),
            fallback_url: String::new(),
            serve_from: ServeFrom::Component,
            include: Vec::new(),
            exclude: Vec::new(),
            lines_extensions: vec![".txt".to_string()],
            media_extensions: [".mp3", ".ogg", ".wav", ".m4a", ".aac", ".opus", ".flac"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_lines: DEFAULT_MAX_LINES,
            max_chars: DEFAULT_MAX_CHARS,
            overlong: OverlongPolicy::Truncate,
        }
    }
}

impl PoolsConfig {
    /// Check ranges and patterns once, at setup time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("no_repeat", self.no_repeat, 0, NO_REPEAT_MAX)?;
        check_range("max_lines", self.max_lines, 1, MAX_LINES_MAX)?;
        check_range("max_chars", self.max_chars, 1, MAX_CHARS_MAX)?;

        if self.lines_extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "lines_extensions",
                reason: "at least one extension is required".to_string(),
            });
        }
        if self.media_extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "media_extensions",
                reason: "at least one extension is required".to_string(),
            });
        }

        self.pattern_filter()?;
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_lines: self.max_lines,
            max_chars: self.max_chars,
            overlong: self.overlong,
        }
    }

    /// Compile the include/exclude globs.
    pub fn pattern_filter(&self) -> Result<PatternFilter, ConfigError> {
        PatternFilter::new(&self.include, &self.exclude)
    }

    /// Lowercased, non-empty lines extensions.
    pub fn lines_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.lines_extensions)
    }

    /// Lowercased, non-empty media extensions.
    pub fn media_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.media_extensions)
    }

    /// Resolve a configured path: absolute paths pass through, relative ones
    /// are joined onto `base_path`.
    pub fn resolve_path(&self, path: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

fn check_range(key: &'static str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!("{} is outside {}..={}", value, min, max),
        });
    }
    Ok(())
}

fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|ext| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolsConfig::default();
        assert_eq!(config.selection_mode, SelectionMode::Random);
        assert_eq!(config.no_repeat, 1);
        assert_eq!(config.serve_from, ServeFrom::Component);
        assert_eq!(config.lines_extensions, vec![".txt".to_string()]);
        assert_eq!(config.media_extensions.len(), 7);
        assert_eq!(config.limits(), Limits::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: PoolsConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config, PoolsConfig::default());
    }

    #[test]
    fn test_parse_modes() {
        let yaml = "selection_mode: queue\nserve_from: www\noverlong: reject\nno_repeat: 0\n";
        let config: PoolsConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.selection_mode, SelectionMode::Queue);
        assert_eq!(config.serve_from, ServeFrom::Www);
        assert_eq!(config.overlong, OverlongPolicy::Reject);
        assert_eq!(config.no_repeat, 0);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result: Result<PoolsConfig, _> = serde_yaml_ng::from_str("selection_mode: shuffle");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let config = PoolsConfig {
            no_repeat: 1001,
            ..PoolsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "no_repeat", .. })
        ));

        let config = PoolsConfig {
            max_lines: 0,
            ..PoolsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "max_lines", .. })
        ));

        let config = PoolsConfig {
            max_chars: 20_001,
            ..PoolsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_extensions_and_patterns() {
        let config = PoolsConfig {
            media_extensions: vec!["  ".to_string()],
            ..PoolsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "media_extensions", .. })
        ));

        let config = PoolsConfig {
            include: vec!["[unclosed".to_string()],
            ..PoolsConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_normalized_extensions() {
        let config = PoolsConfig {
            media_extensions: vec![".MP3".to_string(), "".to_string(), " .Ogg ".to_string()],
            ..PoolsConfig::default()
        };
        assert_eq!(config.media_extensions(), vec![".mp3".to_string(), ".ogg".to_string()]);
    }

    #[test]
    fn test_resolve_path() {
        let config = PoolsConfig {
            base_path: Utf8PathBuf::from("/config"),
            ..PoolsConfig::default()
        };
        assert_eq!(config.resolve_path("www/sounds"), Utf8PathBuf::from("/config/www/sounds"));
        assert_eq!(config.resolve_path("/srv/lines"), Utf8PathBuf::from("/srv/lines"));
    }
}
