//! In-memory snapshot store and change notification.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::record::DbRecord;

use super::FeedSource;

/// Change events delivered to SSE subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum FeedEvent {
    /// The mirror published a new snapshot; fragments should re-fetch.
    #[serde(rename = "changed")]
    Changed { revision: u64, count: usize },
}

/// One immutable, ordered view of the collection.
///
/// Consumers always get a fresh `Arc` of the whole record list, never a
/// patch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub records: Arc<[DbRecord]>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            revision: 0,
            records: Arc::from(Vec::new()),
        }
    }
}

/// Shared, read-only mirror of the run-record collection.
#[derive(Debug)]
pub struct RecordFeed {
    snapshot: watch::Sender<Snapshot>,
    changed: broadcast::Sender<FeedEvent>,
}

impl Default for RecordFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFeed {
    #[must_use]
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Snapshot::empty());
        let (changed, _) = broadcast::channel(64);
        Self { snapshot, changed }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Current record list.
    #[must_use]
    pub fn records(&self) -> Arc<[DbRecord]> {
        Arc::clone(&self.snapshot.borrow().records)
    }

    /// Look up one record by document id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<DbRecord> {
        self.snapshot
            .borrow()
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Replace the mirror wholesale with a freshly fetched record list.
    ///
    /// No-op when the upstream data is unchanged, so subscribers only wake
    /// for real changes. Returns the published revision, if any.
    pub fn publish(&self, records: Vec<DbRecord>) -> Option<u64> {
        let current = self.snapshot.borrow().clone();
        if *current.records == records[..] {
            return None;
        }

        let revision = current.revision + 1;
        let next = Snapshot {
            revision,
            records: Arc::from(records),
        };
        let count = next.records.len();
        info!(
            name: "feed.snapshot",
            revision,
            count,
            "Published feed snapshot"
        );
        self.snapshot.send_replace(next);
        // Nobody listening is fine.
        let _ = self.changed.send(FeedEvent::Changed { revision, count });
        Some(revision)
    }

    /// Subscribe to change notifications (for the SSE endpoint).
    #[must_use]
    pub fn subscribe_changes(&self) -> broadcast::Receiver<FeedEvent> {
        self.changed.subscribe()
    }
}

/// Spawn the background poll loop mirroring the collection.
///
/// A failed poll logs and leaves the previous snapshot in place; there is
/// deliberately no backoff or reconnect state beyond the fixed interval.
pub fn spawn_poller(
    feed: Arc<RecordFeed>,
    source: Arc<dyn FeedSource>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match source.fetch().await {
                Ok(records) => {
                    feed.publish(records);
                }
                Err(e) => {
                    warn!(name: "feed.poll.failed", error = %e, "Feed poll failed; keeping stale snapshot");
                }
            }
        }
    })
}
