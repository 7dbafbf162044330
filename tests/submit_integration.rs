use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::post};
use axum_test::TestServer;
use serde::Serialize;
use serde_json::json;

use ragwatch::AppState;
use ragwatch::config::AppConfig;
use ragwatch::feed::RecordFeed;
use ragwatch::limit::SimpleRateLimiter;
use ragwatch::server::build_router;
use ragwatch::submit::{AgentClient, SubmitError};

/// Stand-in for the external agent service, bound to an ephemeral port.
async fn spawn_stub_agent(reply: serde_json::Value, status: StatusCode) -> String {
    let app = Router::new().route(
        "/agent",
        post(move |body: String| async move {
            // The dashboard sends the question as a raw JSON string.
            assert!(serde_json::from_str::<String>(&body).is_ok());
            (status, Json(reply.clone()))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub agent");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub agent");
    });

    format!("http://{addr}")
}

fn dashboard_server(agent_url: &str) -> TestServer {
    let config = AppConfig::load_from_args([
        "ragwatch",
        "--agent-url",
        agent_url,
        "--rate-limit-enabled",
        "false",
    ])
    .expect("test config");
    let state = AppState {
        feed: Arc::new(RecordFeed::new()),
        agent: Arc::new(AgentClient::new(agent_url)),
        limiter: Arc::new(SimpleRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        )),
        config: Arc::new(config),
    };
    TestServer::new(build_router(state)).expect("test server")
}

#[derive(Serialize)]
struct QuestionForm {
    question: String,
}

fn form(question: &str) -> QuestionForm {
    QuestionForm {
        question: question.to_string(),
    }
}

#[tokio::test]
async fn test_client_accepted() {
    let base = spawn_stub_agent(
        json!({"id": "run-42", "title": "Reset password"}),
        StatusCode::OK,
    )
    .await;

    let client = AgentClient::new(&base);
    let accepted = client.submit("How do I reset my password?").await.unwrap();
    assert_eq!(accepted.id, "run-42");
    assert_eq!(accepted.title, "Reset password");
}

#[tokio::test]
async fn test_client_rejection_reason() {
    let base = spawn_stub_agent(json!({"ignore_reason": "duplicate question"}), StatusCode::OK).await;

    let client = AgentClient::new(&base);
    let err = client.submit("again?").await.unwrap_err();
    match err {
        SubmitError::Rejected(reason) => assert_eq!(reason, "duplicate question"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_non_success_status() {
    let base = spawn_stub_agent(json!({"detail": "boom"}), StatusCode::INTERNAL_SERVER_ERROR).await;

    let client = AgentClient::new(&base);
    let err = client.submit("q").await.unwrap_err();
    assert!(matches!(err, SubmitError::Status(s) if s.as_u16() == 500));
}

#[tokio::test]
async fn test_submit_endpoint_success_pins_run() {
    let base = spawn_stub_agent(
        json!({"id": "run-42", "title": "Reset password"}),
        StatusCode::OK,
    )
    .await;
    let server = dashboard_server(&base);

    let response = server.post("/agent").form(&form("How do I reset my password?")).await;
    response.assert_status_ok();

    // The fragment confirms and re-pins the watched run out-of-band.
    let html = response.text();
    assert!(html.contains("Question submitted: Reset password"));
    assert!(html.contains("value=\"run-42\""));
    assert!(html.contains("hx-swap-oob"));

    let trigger = response.header("HX-Trigger");
    assert_eq!(trigger.to_str().unwrap(), "run-submitted");
}

#[tokio::test]
async fn test_submit_endpoint_rejection_message() {
    let base = spawn_stub_agent(json!({"ignore_reason": "duplicate question"}), StatusCode::OK).await;
    let server = dashboard_server(&base);

    let response = server.post("/agent").form(&form("again?")).await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("duplicate question"));
    assert!(html.contains("role=\"alert\""));
    // No record gets pinned on a rejection.
    assert!(!html.contains("selected-run"));
    assert!(response.maybe_header("HX-Trigger").is_none());
}

#[tokio::test]
async fn test_submit_endpoint_generic_error_on_bad_status() {
    let base = spawn_stub_agent(json!({}), StatusCode::BAD_GATEWAY).await;
    let server = dashboard_server(&base);

    let response = server.post("/agent").form(&form("q")).await;
    response.assert_status_ok();
    assert!(response.text().contains("could not process the question"));
}

#[tokio::test]
async fn test_submit_rate_limited() {
    let base = spawn_stub_agent(
        json!({"id": "run-1", "title": "t"}),
        StatusCode::OK,
    )
    .await;

    let mut config = AppConfig::load_from_args(["ragwatch", "--agent-url", &base])
        .expect("test config");
    config.resilience.rate_limit_enabled = true;
    config.resilience.requests_per_second = 0.001;
    config.resilience.burst_size = 1.0;

    let state = AppState {
        feed: Arc::new(RecordFeed::new()),
        agent: Arc::new(AgentClient::new(&base)),
        limiter: Arc::new(SimpleRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        )),
        config: Arc::new(config),
    };
    let server = TestServer::new(build_router(state)).expect("test server");

    let first = server.post("/agent").form(&form("q")).await;
    first.assert_status_ok();

    let second = server.post("/agent").form(&form("q")).await;
    second.assert_status(StatusCode::TOO_MANY_REQUESTS);

    // Read-only fragments stay outside the bucket.
    let fragment = server.get("/fragments/dashboard").await;
    fragment.assert_status_ok();
}
