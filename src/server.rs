use axum::{
    Router,
    extract::{DefaultBodyLimit, Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::feed::{HttpFeedSource, RecordFeed, spawn_poller};
use crate::limit::{SimpleRateLimiter, rate_limit_middleware};
use crate::sse::build_sse_response;
use crate::submit::{AgentClient, SubmitStatus};
use crate::ui::{bubble, components, detail, list, page};

/// Start the server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let feed = Arc::new(RecordFeed::new());

    if config.feed.base_url.is_empty() {
        tracing::warn!("No feed base URL configured; the dashboard will stay empty");
    } else {
        let source = Arc::new(HttpFeedSource::new(
            &config.feed.base_url,
            &config.feed.collection,
        ));
        let _poller = spawn_poller(
            Arc::clone(&feed),
            source,
            Duration::from_millis(config.feed.poll_interval_ms),
        );
        info!(
            name: "feed.mirror.started",
            collection = %config.feed.collection,
            interval_ms = config.feed.poll_interval_ms,
            "Record mirror started"
        );
    }

    let state = AppState {
        feed,
        agent: Arc::new(AgentClient::new(&config.agent.base_url)),
        limiter: Arc::new(SimpleRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        )),
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the full router for the given state (also used by tests).
pub fn build_router(state: AppState) -> Router {
    // Submissions fan out to the external agent; only they get the bucket.
    let submit_routes = Router::new()
        .route("/agent", post(submit_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let timeout_duration = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60) // effectively off
    } else {
        Duration::from_secs(30)
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(healthz_handler))
        .route("/fragments/dashboard", get(dashboard_fragment_handler))
        .route("/fragments/runs/{id}", get(run_detail_handler))
        .route("/fragments/runs/{id}/actions/{index}", get(action_handler))
        .route("/watch", get(watch_handler))
        .merge(submit_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(axum::middleware::from_fn(move |req: Request, next: Next| {
            let duration = timeout_duration;
            async move {
                match tokio::time::timeout(duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            }
        }))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Page & fragment handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Selection carried through fragment requests; empty means "latest".
#[derive(Debug, Deserialize)]
struct SelectedQuery {
    #[serde(default)]
    selected: Option<String>,
}

impl SelectedQuery {
    fn id(&self) -> Option<&str> {
        self.selected.as_deref().filter(|s| !s.is_empty())
    }
}

/// Query parameters for the expand/collapse round trip.
#[derive(Debug, Deserialize)]
struct ExpandQuery {
    #[serde(default)]
    expanded: bool,
}

/// GET / - dashboard page.
async fn index_handler() -> impl IntoResponse {
    Html(page::dashboard_page())
}

/// GET /healthz - liveness probe.
async fn healthz_handler() -> &'static str {
    "ok"
}

/// GET /fragments/dashboard - the list/detail split.
async fn dashboard_fragment_handler(
    State(state): State<AppState>,
    Query(query): Query<SelectedQuery>,
) -> impl IntoResponse {
    let records = state.feed.records();
    Html(page::dashboard_fragment(&records, query.id(), Utc::now()))
}

/// GET /fragments/runs/{id} - detail pane for one record.
///
/// Also swaps the selection input and the list highlight out-of-band so
/// SSE-triggered refreshes keep the picked run.
async fn run_detail_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(record) = state.feed.get(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let records = state.feed.records();
    let body = format!(
        "{}{}{}",
        detail::run_detail(&record),
        detail::selected_input_oob(&record.id),
        list::run_list_oob(&records, Some(record.id.as_str()), Utc::now()),
    );
    Html(body).into_response()
}

/// GET /fragments/runs/{id}/actions/{index} - one bubble, expanded or not.
async fn action_handler(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Query(query): Query<ExpandQuery>,
) -> Response {
    let Some(record) = state.feed.get(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(action) = record.data.actions.get(index) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    Html(bubble::action_bubble(
        &record.id,
        index,
        action,
        record.data.create_time_ms,
        query.expanded,
    ))
    .into_response()
}

/// GET /watch - SSE stream of feed change notifications.
async fn watch_handler(State(state): State<AppState>) -> impl IntoResponse {
    let rx = state.feed.subscribe_changes();
    let stream = BroadcastStream::new(rx).filter_map(|res| res.ok());
    build_sse_response(stream)
}

// ─────────────────────────────────────────────────────────────────────────────
// Submission
// ─────────────────────────────────────────────────────────────────────────────

/// Form body of the submission.
#[derive(Debug, Deserialize)]
struct SubmitForm {
    question: String,
}

/// POST /agent - submit a question to the external agent service.
///
/// Walks the idle → loading → success/error flow for this request and
/// renders the outcome as a fragment. A success additionally pins the new
/// run as the watched selection and triggers a dashboard refresh.
async fn submit_handler(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<SubmitForm>,
) -> Response {
    let question = form.question.trim();
    if question.is_empty() {
        return Html(components::error_alert("Enter a question first")).into_response();
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(
        request_id = %request_id,
        question_length = question.len(),
        "Submitting question to agent service"
    );

    let mut status = SubmitStatus::default();
    status.begin();

    let result = state.agent.submit(question).await;
    status.finish(&result);

    match (&status, result) {
        (SubmitStatus::Success { run_id }, Ok(accepted)) => {
            info!(
                name: "submit.accepted",
                request_id = %request_id,
                run_id = %run_id,
                title = %accepted.title,
                "Question accepted"
            );
            let body = format!(
                "{}{}",
                components::success_banner(&accepted.title),
                detail::selected_input_oob(run_id),
            );
            (AppendHeaders([("HX-Trigger", "run-submitted")]), Html(body)).into_response()
        }
        (SubmitStatus::Error { message }, _) => {
            tracing::warn!(
                name: "submit.failed",
                request_id = %request_id,
                error = %message,
                "Question rejected"
            );
            Html(components::error_alert(message)).into_response()
        }
        // finish() only ever lands in Success or Error.
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
