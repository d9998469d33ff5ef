use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::command::{CommandTarget, PoolCommand};
use super::url::resolve_media_url;
use crate::error::LoadError;
use crate::models::{
    Item, Limits, PoolCollection, PoolKind, PoolSource, PoolStats, SelectionMode,
    SelectionResult, ServeFrom,
};
use crate::selector::Selector;
use crate::services::loader::{SourceLoader, load_off_thread};
use crate::state::{EventBus, PoolEvent};

/// Per-pool options, resolved from the configuration at setup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub entity_id: String,
    pub unique_id: String,
    pub name: String,
    pub mode: SelectionMode,
    pub no_repeat: usize,
    pub fallback_text: String,
    pub fallback_url: String,
    pub serve_from: ServeFrom,
    pub limits: Limits,
}

/// Owns one pool: its source, loaded items, selector, and current value.
///
/// Every operation takes `&mut self` and runs to completion, so one
/// controller never has two operations in flight. Disk access happens only
/// in [`async_force_reload_and_push_state`](Self::async_force_reload_and_push_state),
/// on the blocking thread pool.
///
/// A pool that fails to load is not an error for callers: it becomes empty,
/// reports `is_empty`, and yields the configured fallback.
pub struct PoolController {
    settings: PoolSettings,
    source: PoolSource,
    collection: PoolCollection,
    selector: Selector,
    /// Index of the current value in `collection`.
    selected: Option<usize>,
    stats: PoolStats,
    last_error: Option<LoadError>,
    loader: Arc<dyn SourceLoader>,
    events: EventBus,
    seed: Option<u64>,
}

impl PoolController {
    /// Create a controller with an empty collection. Call
    /// [`async_force_reload_and_push_state`](Self::async_force_reload_and_push_state)
    /// to populate it.
    pub fn new(
        settings: PoolSettings,
        source: PoolSource,
        loader: Arc<dyn SourceLoader>,
        events: EventBus,
    ) -> Self {
        let selector = Selector::new(settings.mode, settings.no_repeat, 0);
        Self {
            settings,
            source,
            collection: PoolCollection::empty(),
            selector,
            selected: None,
            stats: PoolStats::default(),
            last_error: None,
            loader,
            events,
            seed: None,
        }
    }

    /// Seed every selector this controller creates, for reproducible picks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.selector = self.build_selector(self.collection.len());
        self
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    pub fn source(&self) -> &PoolSource {
        &self.source
    }

    pub fn collection(&self) -> &PoolCollection {
        &self.collection
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Error from the latest reload, if it failed.
    pub fn last_load_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    /// Advance one step in the current mode and publish the new state.
    pub async fn async_next_and_push_state(&mut self) -> SelectionResult {
        self.selected = self.selector.pick();
        self.record_selection();
        self.push_state()
    }

    /// Shuffle the selector and publish the new state. Never touches disk.
    pub async fn async_shuffle_and_push_state(&mut self) -> SelectionResult {
        self.selected = self.selector.shuffle();
        self.record_selection();
        self.push_state()
    }

    /// Reload the source, start a fresh selector, pick, and publish.
    ///
    /// A failed load leaves the pool empty; observers are still notified.
    pub async fn async_force_reload_and_push_state(&mut self) -> SelectionResult {
        let loaded = load_off_thread(
            Arc::clone(&self.loader),
            self.source.clone(),
            self.settings.limits,
        )
        .await;

        match loaded {
            Ok(collection) => {
                tracing::debug!(
                    "Reloaded {} with {} items",
                    self.settings.entity_id,
                    collection.len()
                );
                self.collection = collection;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Pool {} is empty: {}", self.settings.entity_id, e);
                self.collection = PoolCollection::empty();
                self.last_error = Some(e);
            }
        }

        self.selector = self.build_selector(self.collection.len());
        self.selected = self.selector.pick();

        self.stats.reload_count += 1;
        self.stats.last_reload = Some(Utc::now());
        self.push_state()
    }

    /// Clear selector history/cursor and counters, keep the value, publish attributes.
    pub async fn async_reset_and_push_attrs(&mut self) -> SelectionResult {
        self.selector.reset();
        self.stats = PoolStats::default();

        let result = self.get_state();
        self.events.publish(PoolEvent::AttributesChanged {
            entity_id: self.settings.entity_id.clone(),
            result: result.clone(),
        });
        result
    }

    /// Materialize the current value and metadata.
    pub fn get_state(&self) -> SelectionResult {
        let item = self.selected.and_then(|index| self.collection.get(index));

        let (value, file, path, url) = match item {
            Some(Item::Line(line)) => (line.clone(), None, None, None),
            Some(Item::Media(media)) => {
                let url = resolve_media_url(
                    self.settings.serve_from,
                    &self.source.root,
                    &self.source.name,
                    &media.name,
                );
                let value = url.clone().unwrap_or_else(|| media.path.to_string());
                (value, Some(media.name.clone()), Some(media.path.clone()), url)
            }
            None => (self.fallback().to_string(), None, None, None),
        };

        SelectionResult {
            entity_id: self.settings.entity_id.clone(),
            name: self.settings.name.clone(),
            kind: self.source.kind,
            value,
            is_empty: self.collection.is_empty(),
            index: item.and(self.selected),
            file,
            path,
            url,
            source: self.source.path.clone(),
            pool_size: self.collection.len(),
            mode: self.selector.mode(),
            no_repeat: self.selector.no_repeat(),
            history_len: self.selector.history().len(),
            report: self.collection.report().clone(),
            stats: self.stats.clone(),
        }
    }

    fn fallback(&self) -> &str {
        match self.source.kind {
            PoolKind::Lines => &self.settings.fallback_text,
            PoolKind::Media => &self.settings.fallback_url,
        }
    }

    fn build_selector(&self, len: usize) -> Selector {
        match self.seed {
            Some(seed) => Selector::with_seed(self.settings.mode, self.settings.no_repeat, len, seed),
            None => Selector::new(self.settings.mode, self.settings.no_repeat, len),
        }
    }

    fn record_selection(&mut self) {
        self.stats.shuffle_count += 1;
        self.stats.last_shuffle = Some(Utc::now());
    }

    fn push_state(&self) -> SelectionResult {
        let result = self.get_state();
        self.events.publish(PoolEvent::StateChanged {
            entity_id: self.settings.entity_id.clone(),
            result: result.clone(),
        });
        result
    }
}

#[async_trait]
impl CommandTarget for PoolController {
    fn entity_id(&self) -> &str {
        &self.settings.entity_id
    }

    fn state(&self) -> SelectionResult {
        self.get_state()
    }

    async fn execute(&mut self, command: PoolCommand) -> SelectionResult {
        match command {
            PoolCommand::Next => self.async_next_and_push_state().await,
            PoolCommand::Shuffle => self.async_shuffle_and_push_state().await,
            PoolCommand::Reload => self.async_force_reload_and_push_state().await,
            PoolCommand::ResetStats => self.async_reset_and_push_attrs().await,
        }
    }
}
