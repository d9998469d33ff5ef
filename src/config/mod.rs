use crate::models::PoolsConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// File name of the pools configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "pools.yaml";

/// Prefix of environment variables that override file values (e.g. `POOLS_NO_REPEAT=3`).
pub const ENV_PREFIX: &str = "POOLS";

/// Configuration manager for loading and saving `pools.yaml`.
///
/// Values are layered: built-in defaults, then the YAML file (if present),
/// then `POOLS_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing `pools.yaml` (e.g. "/config")
    ///
    /// # Returns
    /// A new ConfigManager instance
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Load the pools configuration.
    ///
    /// A missing file yields defaults (plus any environment overrides). A
    /// relative `base_path` is taken relative to the config directory.
    ///
    /// # Returns
    /// The loaded PoolsConfig, or defaults if the file doesn't exist
    pub fn load_config(&self) -> Result<PoolsConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Pools config file not found at {}, using defaults",
                self.config_path
            );
        }

        let layered = Config::builder()
            .add_source(
                File::from(self.config_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("include")
                    .with_list_parse_key("exclude")
                    .with_list_parse_key("lines_extensions")
                    .with_list_parse_key("media_extensions"),
            )
            .build()
            .with_context(|| format!("Failed to read pools config: {}", self.config_path))?;

        let mut config: PoolsConfig = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse pools config: {}", self.config_path))?;

        if config.base_path.is_relative() {
            config.base_path = self.config_dir.join(&config.base_path);
        }

        tracing::info!("Loaded pools config from {}", self.config_path);
        Ok(config)
    }

    /// Save the pools configuration file.
    ///
    /// # Arguments
    /// * `config` - The PoolsConfig to save
    pub fn save_config(&self, config: &PoolsConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize pools config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write pools config: {}", self.config_path))?;

        tracing::info!("Saved pools config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the path of `pools.yaml`.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
