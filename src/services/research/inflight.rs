//! In-Flight Research Registry
//!
//! At most one expensive research run per normalized key. The first caller
//! for a key becomes the leader and runs the stream; later callers for the
//! same key become followers that wait for the leader to finish and then
//! re-read the cache. Runs for different keys are independent.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::debug;

type FlightMap = Arc<DashMap<String, watch::Receiver<bool>>>;

/// Outcome of trying to start a flight for a key.
pub enum Flight {
    /// This caller runs the research; the guard releases the key on drop.
    Leader(FlightGuard),
    /// Another caller is already researching this key; wait on the handle.
    Follower(FlightWaiter),
}

/// Held by the leader for the duration of its research run. Dropping the
/// guard (on success, failure, or panic unwind) completes the flight and
/// wakes every follower.
pub struct FlightGuard {
    key: String,
    flights: FlightMap,
    done_tx: watch::Sender<bool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flights.remove(&self.key);
        let _ = self.done_tx.send(true);
        debug!(key = %self.key, "research flight released");
    }
}

/// Completion handle held by followers.
pub struct FlightWaiter {
    done_rx: watch::Receiver<bool>,
}

impl FlightWaiter {
    /// Wait until the leader's flight completes.
    pub async fn wait(mut self) {
        // An error means the sender is gone, which also means the flight
        // is over.
        let _ = self.done_rx.wait_for(|done| *done).await;
    }
}

/// Registry of research runs currently in flight.
#[derive(Clone, Default)]
pub struct InflightRegistry {
    flights: FlightMap,
}

impl InflightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or join) the flight for a key.
    pub fn begin(&self, key: &str) -> Flight {
        match self.flights.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!(key = %key, "joining in-flight research run");
                Flight::Follower(FlightWaiter {
                    done_rx: entry.get().clone(),
                })
            }
            Entry::Vacant(entry) => {
                let (done_tx, done_rx) = watch::channel(false);
                entry.insert(done_rx);
                debug!(key = %key, "leading new research flight");
                Flight::Leader(FlightGuard {
                    key: key.to_string(),
                    flights: self.flights.clone(),
                    done_tx,
                })
            }
        }
    }

    /// Number of keys currently being researched.
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether no research is in flight.
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
