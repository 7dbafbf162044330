//! Wire model for agent run records.
//!
//! Records are authored entirely by the external agent service and mirrored
//! read-only by this dashboard. Three historical shapes of the initial prompt
//! and two shapes of action content coexist in the store; both are resolved
//! into tagged variants here, at the deserialization boundary, so the
//! rendering layer never branches on raw JSON shape.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a run, as written by the agent service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Completed,
    Failed,
    Cancelled,
    Paused,
}

impl RunState {
    /// Wire name, also used as the badge label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Paused => "paused",
        }
    }
}

/// One chat message captured when the run was created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Intent classification attached to the rich prompt shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub intent: String,
    pub title: String,
}

/// The initial prompt of a run.
///
/// Variant order matters: serde tries `Rich` (object), then `Flat` (array),
/// then `Bare` (string) against the untagged JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum InitialPrompt {
    /// Current shape: messages plus a classification carrying the title.
    Rich {
        messages: Vec<ChatMessage>,
        classification: Classification,
    },
    /// Older shape: just the ordered message list.
    Flat(Vec<ChatMessage>),
    /// Earliest shape: the question text alone.
    Bare(String),
}

/// One retrieved chunk inside a structured retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationChunk {
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Structured retrieval result carried by `RAGResult`-style actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagResult {
    pub result: Vec<CitationChunk>,
}

/// Action content: free text, or a structured citation list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ActionContent {
    Citations(RagResult),
    Text(String),
}

/// One timestamped step taken by the agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    pub content: ActionContent,
    #[serde(default = "epoch", with = "ts_ms")]
    pub create_time_ms: DateTime<Utc>,
}

/// A full run record as stored by the agent service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    #[serde(default = "epoch", with = "ts_ms")]
    pub create_time_ms: DateTime<Utc>,
    #[serde(default = "epoch", with = "ts_ms")]
    pub update_time_ms: DateTime<Utc>,
    pub state: RunState,
    pub initial_state: InitialPrompt,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub final_state: Option<String>,
}

impl RunRecord {
    /// Restore the creation-time ordering invariant on actions.
    ///
    /// The store delivers actions append-ordered, which normally matches
    /// creation time; sorting is stable so equal timestamps keep their
    /// append order.
    pub fn sort_actions(&mut self) {
        self.actions.sort_by_key(|a| a.create_time_ms);
    }
}

/// A run record paired with its document id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbRecord {
    pub id: String,
    pub data: RunRecord,
}

/// Order records by creation time ascending (the subscription contract).
pub fn sort_records(records: &mut [DbRecord]) {
    records.sort_by_key(|r| r.data.create_time_ms);
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Timestamps arrive as raw millisecond numbers and are converted to
/// [`DateTime<Utc>`] here, at the subscription boundary.
mod ts_ms {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(dt.timestamp_millis())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept integers and floats; some writers emit fractional millis.
        let ms = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
        Ok(DateTime::from_timestamp_millis(ms as i64).unwrap_or(DateTime::UNIX_EPOCH))
    }
}
