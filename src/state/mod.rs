// Observer notification
//
// Controllers publish a PoolEvent after every operation; any number of
// observers can subscribe through the shared EventBus.

use tokio::sync::broadcast;

use crate::models::SelectionResult;

/// Default number of events buffered per subscriber.
pub const EVENT_BUFFER: usize = 100;

/// Change events emitted by pool controllers.
///
/// Both variants carry the full materialized result so observers never need
/// to call back into the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum PoolEvent {
    /// A new value was selected (shuffle, next, reload).
    StateChanged {
        entity_id: String,
        result: SelectionResult,
    },

    /// Only metadata changed (reset_stats); the value is unchanged.
    AttributesChanged {
        entity_id: String,
        result: SelectionResult,
    },
}

impl PoolEvent {
    pub fn entity_id(&self) -> &str {
        match self {
            Self::StateChanged { entity_id, .. } => entity_id,
            Self::AttributesChanged { entity_id, .. } => entity_id,
        }
    }

    pub fn result(&self) -> &SelectionResult {
        match self {
            Self::StateChanged { result, .. } => result,
            Self::AttributesChanged { result, .. } => result,
        }
    }
}

/// Broadcast channel shared by all controllers of one registry.
///
/// Cloning the bus shares the same channel.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<PoolEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PoolEvent> {
        self.tx.subscribe()
    }

    /// Publish an event, returning how many subscribers received it.
    pub fn publish(&self, event: PoolEvent) -> usize {
        // No subscribers is not an error
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_BUFFER)
    }
}
