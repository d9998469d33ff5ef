//! Builds a [`PoolRegistry`] from a [`PoolsConfig`].
//!
//! Explicit `lines_pools` / `media_pools` entries are used as given. When a
//! list is empty, that kind is discovered on disk instead. Either way at most
//! [`MAX_POOLS_PER_KIND`] pools of each kind are created.
//!
//! Two explicit entries with the same entity id are a configuration error.
//! A discovered source whose id is already taken is skipped with a warning,
//! so one naming clash on disk never disables the other pools.

use std::sync::Arc;

use camino::Utf8Path;

use crate::error::ConfigError;
use crate::models::config::MAX_POOLS_PER_KIND;
use crate::models::{PoolKind, PoolSource, PoolsConfig};
use crate::pool::{PoolController, PoolRegistry, PoolSettings};
use crate::services::discovery::discover_sources;
use crate::services::loader::SourceLoader;
use crate::services::patterns::{PatternFilter, slugify};
use crate::state::EventBus;

/// Naming for one pool before it becomes a controller.
struct PoolIdentity {
    suffix: String,
    unique_id: Option<String>,
    name: String,
    discovered: bool,
}

/// Validate `config` and create one controller per pool.
///
/// Controllers start empty; the caller decides when to run the initial reload.
pub fn build_registry(
    config: &PoolsConfig,
    loader: Arc<dyn SourceLoader>,
    events: EventBus,
) -> Result<PoolRegistry, ConfigError> {
    config.validate()?;
    let filter = config.pattern_filter()?;

    let mut pools = lines_pools(config, &filter);
    pools.extend(media_pools(config, &filter));

    let mut registry = PoolRegistry::new(events.clone());
    for (identity, source) in pools {
        let entity_id = format!("sensor.{}", identity.suffix);
        if identity.discovered && registry.get(&entity_id).is_some() {
            tracing::warn!(
                "Skipping discovered pool {}: entity_id {} is already in use",
                source.path,
                entity_id
            );
            continue;
        }
        let settings = PoolSettings {
            unique_id: identity.unique_id.unwrap_or_else(|| identity.suffix.clone()),
            entity_id,
            name: identity.name,
            mode: config.selection_mode,
            no_repeat: config.no_repeat,
            fallback_text: config.fallback_text.clone(),
            fallback_url: config.fallback_url.clone(),
            serve_from: config.serve_from,
            limits: config.limits(),
        };
        let controller = PoolController::new(settings, source, Arc::clone(&loader), events.clone());
        registry.register(Box::new(controller))?;
    }

    tracing::info!("Configured {} pools", registry.len());
    Ok(registry)
}

fn lines_pools(config: &PoolsConfig, filter: &PatternFilter) -> Vec<(PoolIdentity, PoolSource)> {
    let root = config.resolve_path(&config.lines_directory);
    let extensions = config.lines_extensions();

    if config.lines_pools.is_empty() {
        let discovered = discover_sources(
            &root,
            &config.lines_directory,
            PoolKind::Lines,
            &extensions,
            filter,
        );
        if discovered.is_empty() {
            tracing::warn!("No lines pools discovered in {}", root);
        }
        return discovered
            .into_iter()
            .map(|source| {
                let stem = source.stem().to_string();
                let identity = PoolIdentity {
                    suffix: derive_suffix(PoolKind::Lines, &stem),
                    unique_id: None,
                    name: format!("Pools Lines {}", nice_name(&stem)),
                    discovered: true,
                };
                (identity, source)
            })
            .collect();
    }

    config
        .lines_pools
        .iter()
        .take(MAX_POOLS_PER_KIND)
        .map(|entry| {
            let stem = Utf8Path::new(&entry.file).file_stem().unwrap_or(entry.file.as_str());
            let identity = PoolIdentity {
                suffix: entry
                    .entity_suffix
                    .clone()
                    .unwrap_or_else(|| derive_suffix(PoolKind::Lines, stem)),
                unique_id: entry.unique_id.clone(),
                name: entry.name.clone(),
                discovered: false,
            };
            let source = PoolSource {
                kind: PoolKind::Lines,
                path: root.join(&entry.file),
                root: config.lines_directory.clone(),
                name: entry.file.clone(),
                filter: filter.clone(),
                extensions: extensions.clone(),
            };
            (identity, source)
        })
        .collect()
}

fn media_pools(config: &PoolsConfig, filter: &PatternFilter) -> Vec<(PoolIdentity, PoolSource)> {
    let root = config.resolve_path(&config.media_directory);
    let extensions = config.media_extensions();

    if config.media_pools.is_empty() {
        let discovered = discover_sources(
            &root,
            &config.media_directory,
            PoolKind::Media,
            &extensions,
            filter,
        );
        if discovered.is_empty() {
            tracing::debug!("No media pools discovered in {}", root);
        }
        return discovered
            .into_iter()
            .map(|source| {
                let identity = PoolIdentity {
                    suffix: derive_suffix(PoolKind::Media, &source.name),
                    unique_id: None,
                    name: format!("Pools Media {}", nice_name(&source.name)),
                    discovered: true,
                };
                (identity, source)
            })
            .collect();
    }

    config
        .media_pools
        .iter()
        .take(MAX_POOLS_PER_KIND)
        .map(|entry| {
            let folder = entry.folder.trim_matches('/');
            let base = Utf8Path::new(folder).file_name().unwrap_or(folder);
            let identity = PoolIdentity {
                suffix: entry
                    .entity_suffix
                    .clone()
                    .unwrap_or_else(|| derive_suffix(PoolKind::Media, base)),
                unique_id: entry.unique_id.clone(),
                name: entry.name.clone(),
                discovered: false,
            };
            let source = PoolSource {
                kind: PoolKind::Media,
                path: root.join(folder),
                root: config.media_directory.clone(),
                name: folder.to_string(),
                filter: filter.clone(),
                extensions: extensions.clone(),
            };
            (identity, source)
        })
        .collect()
}

/// `pools_lines_<slug>` or `pools_media_<slug>`.
pub fn derive_suffix(kind: PoolKind, base: &str) -> String {
    format!("pools_{}_{}", kind, slugify(base))
}

fn nice_name(base: &str) -> String {
    base.replace('_', " ")
}
