//! Question submission to the external agent service.

use serde::Deserialize;

/// A submission the agent accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub id: String,
    pub title: String,
}

/// Everything that can go wrong submitting a question.
///
/// All three flavors collapse to one user-visible message; only the
/// rejection carries server-provided wording.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Application-level rejection with an explicit reason.
    #[error("{0}")]
    Rejected(String),
    /// The agent endpoint answered with a non-success status.
    #[error("the agent service could not process the question (HTTP {0})")]
    Status(reqwest::StatusCode),
    /// Network/transport failure reaching the agent endpoint.
    #[error("could not reach the agent service: {0}")]
    Transport(#[from] reqwest::Error),
    /// 2xx response that matched neither known body.
    #[error("unexpected response from the agent service")]
    Decode(#[from] serde_json::Error),
}

/// Wire shapes of the agent's reply.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AgentReply {
    Accepted { id: String, title: String },
    Ignored { ignore_reason: String },
}

/// Client for the external `POST /agent` endpoint.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a question. The body is the question serialized as a raw JSON
    /// string, matching what the agent service expects.
    pub async fn submit(&self, question: &str) -> Result<Accepted, SubmitError> {
        let url = format!("{}/agent", self.base_url);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(question)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status));
        }

        let body = response.text().await?;
        match serde_json::from_str::<AgentReply>(&body)? {
            AgentReply::Accepted { id, title } => Ok(Accepted { id, title }),
            AgentReply::Ignored { ignore_reason } => Err(SubmitError::Rejected(ignore_reason)),
        }
    }
}

/// The submission flow's four states.
///
/// `Idle → Loading → (Success | Error)`, back to `Idle` when the user edits
/// a new question.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Loading,
    /// The agent accepted; `run_id` is the record to watch.
    Success { run_id: String },
    Error { message: String },
}

impl SubmitStatus {
    /// A submission left for the network.
    pub fn begin(&mut self) {
        *self = Self::Loading;
    }

    /// The network call came back.
    pub fn finish(&mut self, result: &Result<Accepted, SubmitError>) {
        *self = match result {
            Ok(accepted) => Self::Success {
                run_id: accepted.id.clone(),
            },
            Err(e) => Self::Error {
                message: e.to_string(),
            },
        };
    }

    /// New input resets the flow.
    pub fn edit(&mut self) {
        *self = Self::Idle;
    }

    /// The id of the accepted run, when in the success state.
    #[must_use]
    pub fn watched_run(&self) -> Option<&str> {
        match self {
            Self::Success { run_id } => Some(run_id),
            _ => None,
        }
    }
}
