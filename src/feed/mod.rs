//! Read-only live mirror of the run-record collection.
//!
//! A [`FeedSource`] fetches the full collection from the hosted document
//! store; [`RecordFeed`] republishes it wholesale as immutable snapshots and
//! notifies SSE subscribers. The client never writes records.

pub mod source;
pub mod watch;

pub use source::{FeedError, FeedSource, HttpFeedSource};
pub use watch::{FeedEvent, RecordFeed, Snapshot, spawn_poller};
