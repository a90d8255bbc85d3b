//! Observability events emitted by the fetch engine.
//!
//! The engine reports what it is doing through [`FetchEvent`]s delivered to
//! an injected [`FetchObserver`]. [`TracingObserver`] is the default and
//! turns every event into a `tracing` record; tests install their own
//! observer to assert on the exact sequence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// FetchEvent
// ---------------------------------------------------------------------------

/// Something that happened during a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// The cache satisfied the request; no network I/O happened.
    CacheHit { source: String },
    /// A gateway attempt is starting.
    AttemptStarted {
        source: String,
        gateway: usize,
        total: usize,
        url: String,
    },
    /// A gateway attempt failed; the engine moves to the next gateway.
    AttemptFailed {
        source: String,
        gateway: usize,
        total: usize,
        message: String,
    },
    /// Metadata and video were both resolved on `gateway`.
    Succeeded {
        source: String,
        gateway: usize,
        video_url: String,
    },
    /// Every gateway failed.
    GatewaysExhausted {
        source: String,
        attempted: usize,
        last_error: String,
    },
}

/// A [`FetchEvent`] stamped with the time it was observed.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub timestamp: DateTime<Utc>,
    pub event: FetchEvent,
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

/// Receives events from the fetch engine.
///
/// Observers are called inline on the fetching task and must not block.
pub trait FetchObserver: Send + Sync {
    fn on_event(&self, event: &FetchEvent);
}

/// Default observer: structured `tracing` output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_event(&self, event: &FetchEvent) {
        match event {
            FetchEvent::CacheHit { source } => {
                debug!(source = %source, "Metadata cache hit");
            }
            FetchEvent::AttemptStarted {
                source,
                gateway,
                total,
                url,
            } => {
                debug!(
                    source = %source,
                    gateway = gateway + 1,
                    total,
                    url = %url,
                    "Trying gateway"
                );
            }
            FetchEvent::AttemptFailed {
                source,
                gateway,
                total,
                message,
            } => {
                warn!(
                    source = %source,
                    gateway = gateway + 1,
                    total,
                    error = %message,
                    "Gateway attempt failed"
                );
            }
            FetchEvent::Succeeded {
                source,
                gateway,
                video_url,
            } => {
                info!(
                    source = %source,
                    gateway = gateway + 1,
                    video_url = %video_url,
                    "Resolved metadata and video"
                );
            }
            FetchEvent::GatewaysExhausted {
                source,
                attempted,
                last_error,
            } => {
                warn!(
                    source = %source,
                    attempted,
                    error = %last_error,
                    "All gateways failed"
                );
            }
        }
    }
}

/// Observer that keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the recorded events without timestamps.
    pub fn events(&self) -> Vec<FetchEvent> {
        self.events.lock().iter().map(|r| r.event.clone()).collect()
    }

    /// Snapshot including timestamps.
    pub fn recorded(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl FetchObserver for RecordingObserver {
    fn on_event(&self, event: &FetchEvent) {
        self.events.lock().push(RecordedEvent {
            timestamp: Utc::now(),
            event: event.clone(),
        });
    }
}

/// Forwards each event to every wrapped observer in order.
pub struct FanoutObserver {
    observers: Vec<Arc<dyn FetchObserver>>,
}

impl FanoutObserver {
    pub fn new(observers: Vec<Arc<dyn FetchObserver>>) -> Self {
        Self { observers }
    }
}

impl FetchObserver for FanoutObserver {
    fn on_event(&self, event: &FetchEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_observer_keeps_order() {
        let recorder = RecordingObserver::new();
        recorder.on_event(&FetchEvent::CacheHit {
            source: "ipfs://a".into(),
        });
        recorder.on_event(&FetchEvent::GatewaysExhausted {
            source: "ipfs://b".into(),
            attempted: 3,
            last_error: "boom".into(),
        });

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], FetchEvent::CacheHit { .. }));
        assert!(matches!(events[1], FetchEvent::GatewaysExhausted { attempted: 3, .. }));

        let recorded = recorder.recorded();
        assert!(recorded[0].timestamp <= recorded[1].timestamp);

        recorder.clear();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn fanout_reaches_every_observer() {
        let a = RecordingObserver::new();
        let b = RecordingObserver::new();
        let observers: Vec<Arc<dyn FetchObserver>> =
            vec![a.clone(), b.clone(), Arc::new(TracingObserver)];
        let fanout = FanoutObserver::new(observers);

        fanout.on_event(&FetchEvent::CacheHit {
            source: "ipfs://x".into(),
        });

        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events().len(), 1);
    }
}
