//! Event Sink Adapters
//!
//! `InMemoryEventLog` keeps events for indexers and tests;
//! `TracingEventSink` only logs them.

use crate::domain::BridgeEvent;
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;
use tracing::info;

/// Append-only in-memory event log.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<BridgeEvent>>,
}

impl InMemoryEventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events in emission order.
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events.read().clone()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// No events yet.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Events named `name` (see [`BridgeEvent::name`]).
    pub fn named(&self, name: &str) -> Vec<BridgeEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.name() == name)
            .cloned()
            .collect()
    }

    /// One JSON object per line.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let events = self.events.read();
        let mut out = String::new();
        for event in events.iter() {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl EventSink for InMemoryEventLog {
    fn emit(&self, event: BridgeEvent) {
        self.events.write().push(event);
    }
}

/// Logs each event at info level.
#[derive(Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: BridgeEvent) {
        info!(event = event.name(), "[qc-15] {:?}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChainId;

    #[test]
    fn test_log_keeps_order() {
        let log = InMemoryEventLog::new();
        assert!(log.is_empty());
        log.emit(BridgeEvent::Paused { actor: [1u8; 20] });
        log.emit(BridgeEvent::Unpaused { actor: [1u8; 20] });
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[1].name(), "Unpaused");
        assert_eq!(log.named("Paused").len(), 1);
    }

    #[test]
    fn test_json_lines() {
        let log = InMemoryEventLog::new();
        log.emit(BridgeEvent::ChainAdded {
            chain_id: ChainId(9),
            actor: [1u8; 20],
        });
        log.emit(BridgeEvent::Paused { actor: [1u8; 20] });
        let lines = log.to_json_lines().unwrap();
        assert_eq!(lines.lines().count(), 2);
        assert!(lines.starts_with("{\"event\":\"ChainAdded\""));
    }
}
