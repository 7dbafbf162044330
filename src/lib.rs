//! Notorious R.A.G. dashboard
//!
//! A live dashboard for watching agent runs: submit a question to the
//! external agent service, then follow the recorded actions as they land in
//! the hosted document store.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server rendering HTML fragments, with SSE
//!   change notifications driving HTMX re-fetches
//! - **Feed**: read-only polling mirror of the run-record collection,
//!   republished wholesale as immutable snapshots
//! - **View model**: three historical record shapes normalized into one
//!   rendering projection at the ingestion boundary
//! - **Submission**: thin proxy to the external `POST /agent` endpoint with
//!   the idle/loading/success/error flow
//!
//! # Modules
//!
//! - [`record`]: wire model and shape tolerance
//! - [`feed`]: collection mirror and change notification
//! - [`view`]: view-model projection (titles, truncation, citations)
//! - [`submit`]: agent client and submission state machine
//! - [`ui`]: server-rendered HTML fragments

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod feed;
pub mod limit;
pub mod record;
pub mod server;
pub mod sse;
pub mod submit;
pub mod telemetry;
pub mod ui;
pub mod view;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::feed::RecordFeed;
use crate::limit::SimpleRateLimiter;
use crate::submit::AgentClient;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Read-only mirror of the run-record collection.
    pub feed: Arc<RecordFeed>,
    /// Client for the external agent endpoint.
    pub agent: Arc<AgentClient>,
    /// Global rate limiter for submissions.
    pub limiter: Arc<SimpleRateLimiter>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}
