use async_trait::async_trait;

use crate::models::SelectionResult;

/// Operations the host can invoke on a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolCommand {
    /// Advance one step in the current mode.
    Next,
    /// Reshuffle (queue) or redraw (random), then publish.
    Shuffle,
    /// Reload items from disk, restart selection, then publish.
    Reload,
    /// Clear history and counters; the value is kept.
    ResetStats,
}

impl std::fmt::Display for PoolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Next => "next",
            Self::Shuffle => "shuffle",
            Self::Reload => "reload",
            Self::ResetStats => "reset_stats",
        };
        write!(f, "{}", name)
    }
}

/// Anything the registry can dispatch commands to.
#[async_trait]
pub trait CommandTarget: Send + Sync {
    fn entity_id(&self) -> &str;

    /// Current materialized value and metadata.
    fn state(&self) -> SelectionResult;

    /// Run one command to completion and return the resulting state.
    async fn execute(&mut self, command: PoolCommand) -> SelectionResult;
}
