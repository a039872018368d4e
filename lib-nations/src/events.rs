//! Registry Event Publishing
//!
//! Registry-level notifications are published synchronously to subscribed
//! listeners in subscription order. Nothing in this workspace is async, so
//! the publisher is a plain call loop rather than a channel.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use lib_types::{Address, CountryCode};

use crate::registry::NationRecord;

/// Registry-level events that clients can subscribe to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NationEvent {
    /// A nation was created under `code`
    NationCreated {
        code: CountryCode,
        founder: Address,
    },

    /// Full record of a freshly created nation
    NationDetails { record: NationRecord },

    /// Templates for future nations were replaced
    ImplementationUpdated {
        generation: u64,
        awards: Address,
        timelock: Address,
        governor: Address,
    },

    /// The creation mode changed
    IsCreationPermissionless { permissionless: bool },

    /// A country code was added to (or renamed in) the directory
    CountryCodeAdded { code: CountryCode, name: String },
}

impl std::fmt::Display for NationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NationEvent::NationCreated { code, .. } => write!(f, "NationCreated({})", code),
            NationEvent::NationDetails { record } => write!(f, "NationDetails({})", record.code),
            NationEvent::ImplementationUpdated { generation, .. } => {
                write!(f, "ImplementationUpdated(generation={})", generation)
            }
            NationEvent::IsCreationPermissionless { permissionless } => {
                write!(f, "IsCreationPermissionless({})", permissionless)
            }
            NationEvent::CountryCodeAdded { code, .. } => {
                write!(f, "CountryCodeAdded({})", code)
            }
        }
    }
}

/// Subscriber to registry events.
pub trait NationListener: Send {
    fn on_event(&mut self, event: &NationEvent);
}

/// Synchronous fan-out to subscribed listeners.
#[derive(Default)]
pub struct EventPublisher {
    listeners: Vec<Box<dyn NationListener>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every event published afterwards.
    pub fn subscribe(&mut self, listener: Box<dyn NationListener>) {
        self.listeners.push(listener);
    }

    /// Deliver `event` to every listener, in subscription order.
    pub fn publish(&mut self, event: &NationEvent) {
        tracing::debug!("event: {}", event);
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Listener that records every event it sees; clones share the same
/// recording, so a test can keep one handle and box another into the
/// publisher.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<NationEvent>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<NationEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl NationListener for RecordingListener {
    fn on_event(&mut self, event: &NationEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_listeners_in_order() {
        let first = RecordingListener::new();
        let second = RecordingListener::new();

        let mut publisher = EventPublisher::new();
        publisher.subscribe(Box::new(first.clone()));
        publisher.subscribe(Box::new(second.clone()));

        let event = NationEvent::IsCreationPermissionless {
            permissionless: true,
        };
        publisher.publish(&event);

        assert_eq!(first.events(), vec![event.clone()]);
        assert_eq!(second.events(), vec![event]);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let mut publisher = EventPublisher::new();
        publisher.publish(&NationEvent::IsCreationPermissionless {
            permissionless: true,
        });

        let listener = RecordingListener::new();
        publisher.subscribe(Box::new(listener.clone()));
        assert!(listener.events().is_empty());
    }
}
