use std::collections::HashSet;

use futures::future::join_all;
use indexmap::IndexMap;

use super::command::{CommandTarget, PoolCommand};
use crate::error::{ConfigError, QueryError};
use crate::models::{PoolKind, SelectionResult};
use crate::state::{EventBus, PoolEvent};

/// All live pools of one application context, keyed by entity id.
///
/// The registry is created at startup, filled as controllers are built, and
/// consumed by [`shutdown`](Self::shutdown). Commands reach pools only
/// through it (or through a controller handed out by it).
pub struct PoolRegistry {
    pools: IndexMap<String, Box<dyn CommandTarget>>,
    events: EventBus,
}

impl PoolRegistry {
    pub fn new(events: EventBus) -> Self {
        Self {
            pools: IndexMap::new(),
            events,
        }
    }

    /// Event bus shared with the registered controllers.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<PoolEvent> {
        self.events.subscribe()
    }

    /// Register a pool. Entity ids must be unique.
    pub fn register(&mut self, target: Box<dyn CommandTarget>) -> Result<(), ConfigError> {
        let entity_id = target.entity_id().to_string();
        if self.pools.contains_key(&entity_id) {
            return Err(ConfigError::DuplicateEntity(entity_id));
        }
        tracing::debug!("Registered pool {}", entity_id);
        self.pools.insert(entity_id, target);
        Ok(())
    }

    pub fn remove(&mut self, entity_id: &str) -> Option<Box<dyn CommandTarget>> {
        self.pools.shift_remove(entity_id)
    }

    pub fn get(&self, entity_id: &str) -> Option<&dyn CommandTarget> {
        self.pools.get(entity_id).map(|pool| pool.as_ref())
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Entity ids in registration order.
    pub fn entity_ids(&self) -> Vec<String> {
        self.pools.keys().cloned().collect()
    }

    /// Current state of every pool, in registration order.
    pub fn states(&self) -> Vec<SelectionResult> {
        self.pools.values().map(|pool| pool.state()).collect()
    }

    /// Run one command on one pool. Unknown ids are logged and ignored.
    pub async fn execute(&mut self, entity_id: &str, command: PoolCommand) -> Option<SelectionResult> {
        match self.pools.get_mut(entity_id) {
            Some(pool) => Some(pool.execute(command).await),
            None => {
                tracing::warn!("No pool bound to entity_id: {}", entity_id);
                None
            }
        }
    }

    /// Run a command on the listed pools, or on all pools when `targets` is empty.
    ///
    /// Pools run concurrently and independently; one pool degrading to empty
    /// does not affect the others. Unknown ids are logged and skipped.
    pub async fn dispatch(&mut self, command: PoolCommand, targets: &[String]) -> Vec<SelectionResult> {
        let wanted: HashSet<&str> = targets.iter().map(String::as_str).collect();
        for unknown in wanted.iter().filter(|id| !self.pools.contains_key(**id)) {
            tracing::warn!("No pool bound to entity_id: {}", unknown);
        }

        let runs = self
            .pools
            .iter_mut()
            .filter(|(id, _)| wanted.is_empty() || wanted.contains(id.as_str()))
            .map(|(_, pool)| pool.execute(command));

        let results = join_all(runs).await;
        tracing::debug!("Dispatched {} to {} pools", command, results.len());
        results
    }

    pub async fn shuffle_all(&mut self) -> Vec<SelectionResult> {
        self.dispatch(PoolCommand::Shuffle, &[]).await
    }

    pub async fn reload_all(&mut self) -> Vec<SelectionResult> {
        self.dispatch(PoolCommand::Reload, &[]).await
    }

    /// Current line of a lines pool, optionally shuffling first.
    pub async fn get_line(&mut self, entity_id: &str, shuffle: bool) -> Result<SelectionResult, QueryError> {
        self.query(entity_id, PoolKind::Lines, shuffle).await
    }

    /// Current selection of a media pool, optionally shuffling first.
    pub async fn get_media(&mut self, entity_id: &str, shuffle: bool) -> Result<SelectionResult, QueryError> {
        self.query(entity_id, PoolKind::Media, shuffle).await
    }

    async fn query(
        &mut self,
        entity_id: &str,
        kind: PoolKind,
        shuffle: bool,
    ) -> Result<SelectionResult, QueryError> {
        let pool = self
            .pools
            .get_mut(entity_id)
            .ok_or_else(|| QueryError::NotFound(entity_id.to_string()))?;

        let actual = pool.state().kind;
        if actual != kind {
            return Err(QueryError::WrongKind {
                entity_id: entity_id.to_string(),
                expected: kind,
                actual,
            });
        }

        if shuffle {
            Ok(pool.execute(PoolCommand::Shuffle).await)
        } else {
            Ok(pool.state())
        }
    }

    /// Tear down every pool.
    pub fn shutdown(self) {
        tracing::info!("Shutting down {} pools", self.pools.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoadReport, PoolStats, SelectionMode};
    use async_trait::async_trait;
    use camino::Utf8PathBuf;

    /// Counts the commands it receives.
    struct CountingPool {
        id: String,
        kind: PoolKind,
        executed: Vec<PoolCommand>,
    }

    impl CountingPool {
        fn boxed(id: &str, kind: PoolKind) -> Box<dyn CommandTarget> {
            Box::new(Self {
                id: id.to_string(),
                kind,
                executed: Vec::new(),
            })
        }
    }

    #[async_trait]
    impl CommandTarget for CountingPool {
        fn entity_id(&self) -> &str {
            &self.id
        }

        fn state(&self) -> SelectionResult {
            SelectionResult {
                entity_id: self.id.clone(),
                name: self.id.clone(),
                kind: self.kind,
                value: self.executed.len().to_string(),
                is_empty: false,
                index: None,
                file: None,
                path: None,
                url: None,
                source: Utf8PathBuf::from("/tmp"),
                pool_size: 0,
                mode: SelectionMode::Random,
                no_repeat: 0,
                history_len: 0,
                report: LoadReport::default(),
                stats: PoolStats::default(),
            }
        }

        async fn execute(&mut self, command: PoolCommand) -> SelectionResult {
            self.executed.push(command);
            self.state()
        }
    }

    fn registry() -> PoolRegistry {
        let mut registry = PoolRegistry::new(EventBus::default());
        registry.register(CountingPool::boxed("sensor.a", PoolKind::Lines)).unwrap();
        registry.register(CountingPool::boxed("sensor.b", PoolKind::Media)).unwrap();
        registry.register(CountingPool::boxed("sensor.c", PoolKind::Lines)).unwrap();
        registry
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let result = registry.register(CountingPool::boxed("sensor.a", PoolKind::Lines));
        assert!(matches!(result, Err(ConfigError::DuplicateEntity(id)) if id == "sensor.a"));
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_all_when_no_targets() {
        let mut registry = registry();
        let results = registry.shuffle_all().await;
        assert_eq!(results.len(), 3);
        assert!(registry.states().iter().all(|s| s.value == "1"));
    }

    #[tokio::test]
    async fn test_dispatch_targets_and_skips_unknown() {
        let mut registry = registry();
        let targets = vec!["sensor.c".to_string(), "sensor.zzz".to_string(), "sensor.c".to_string()];
        let results = registry.dispatch(PoolCommand::Reload, &targets).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entity_id, "sensor.c");
        assert_eq!(registry.get("sensor.a").unwrap().state().value, "0");
    }

    #[tokio::test]
    async fn test_execute_unknown() {
        let mut registry = registry();
        assert!(registry.execute("sensor.nope", PoolCommand::Next).await.is_none());
        assert!(registry.execute("sensor.b", PoolCommand::Next).await.is_some());
    }

    #[tokio::test]
    async fn test_queries_check_kind() {
        let mut registry = registry();

        let line = registry.get_line("sensor.a", true).await.unwrap();
        assert_eq!(line.value, "1");
        let line = registry.get_line("sensor.a", false).await.unwrap();
        assert_eq!(line.value, "1");

        assert!(matches!(
            registry.get_line("sensor.b", false).await,
            Err(QueryError::WrongKind { expected: PoolKind::Lines, .. })
        ));
        assert!(matches!(
            registry.get_media("sensor.missing", false).await,
            Err(QueryError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_and_order() {
        let mut registry = registry();
        assert!(registry.remove("sensor.b").is_some());
        assert_eq!(registry.entity_ids(), vec!["sensor.a".to_string(), "sensor.c".to_string()]);
        registry.shutdown();
    }
}
