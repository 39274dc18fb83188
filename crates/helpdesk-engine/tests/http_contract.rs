//! HTTP contract tests for the controller against a mock assistant service.

use helpdesk_engine::{
    connect, ChatRequest, FailureKind, HttpTransport, Role, TurnOutcome, WidgetConfig,
    FALLBACK_MESSAGE,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const T: &str = "2024-05-01T10:00:00.123456";

fn config_for(server: &MockServer) -> WidgetConfig {
    WidgetConfig {
        base_url: server.uri(),
        ..Default::default()
    }
}

fn reply(response: &str, session_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "response": response,
        "session_id": session_id,
        "timestamp": T,
    }))
}

async fn sent_requests(server: &MockServer) -> Vec<ChatRequest> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_first_turn_posts_null_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"message": "Hello", "session_id": null})))
        .respond_with(reply("Hi!", "s1"))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = connect(&config_for(&server)).unwrap();
    controller.update_draft("Hello");
    let outcome = controller.submit().await;

    assert_eq!(outcome, Some(TurnOutcome::Replied));
    let messages = controller.state().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Hello");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Hi!");
    assert_eq!(messages[1].timestamp, T);
    assert_eq!(controller.state().session_id(), Some("s1"));
}

#[tokio::test]
async fn test_follow_up_turn_carries_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(reply("Hi!", "s1"))
        .expect(2)
        .mount(&server)
        .await;

    let mut controller = connect(&config_for(&server)).unwrap();
    controller.update_draft("Hello");
    controller.submit().await;
    controller.update_draft("More");
    controller.submit().await;

    let requests = sent_requests(&server).await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].session_id, None);
    assert_eq!(requests[1].session_id.as_deref(), Some("s1"));
    assert_eq!(requests[1].message, "More");
}

#[tokio::test]
async fn test_message_is_trimmed_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "Where is my order?", "session_id": null})))
        .respond_with(reply("Let me check.", "s9"))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = connect(&config_for(&server)).unwrap();
    controller.update_draft("  Where is my order?\n");
    assert_eq!(controller.submit().await, Some(TurnOutcome::Replied));
}

#[tokio::test]
async fn test_clear_sends_null_session_again() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(reply("Hi!", "s1"))
        .mount(&server)
        .await;

    let mut controller = connect(&config_for(&server)).unwrap();
    controller.update_draft("Hello");
    controller.submit().await;
    controller.clear();
    assert!(controller.state().messages().is_empty());
    assert_eq!(controller.state().session_id(), None);

    controller.update_draft("Hello again");
    controller.submit().await;

    let requests = sent_requests(&server).await;
    assert_eq!(requests[1].session_id, None);
}

#[tokio::test]
async fn test_server_error_is_a_service_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    let mut controller = connect(&config_for(&server)).unwrap();
    controller.update_draft("X");
    let outcome = controller.submit().await;

    assert_eq!(outcome, Some(TurnOutcome::FellBack(FailureKind::Service)));
    let messages = controller.state().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, FALLBACK_MESSAGE);
    assert!(!controller.state().is_pending());
    assert!(controller.diagnostics().last().unwrap().detail.contains("500"));
}

#[tokio::test]
async fn test_malformed_body_is_a_contract_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi!"})))
        .mount(&server)
        .await;

    let mut controller = connect(&config_for(&server)).unwrap();
    controller.update_draft("X");

    assert_eq!(
        controller.submit().await,
        Some(TurnOutcome::FellBack(FailureKind::Contract))
    );
    assert_eq!(controller.state().session_id(), None);
    assert_eq!(
        controller.state().messages().last().unwrap().content,
        FALLBACK_MESSAGE
    );
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_failure() {
    // Grab a free port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let config = WidgetConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        ..Default::default()
    };

    let mut controller = connect(&config).unwrap();
    controller.update_draft("X");

    assert_eq!(
        controller.submit().await,
        Some(TurnOutcome::FellBack(FailureKind::Transport))
    );
    assert!(!controller.state().is_pending());
    assert_eq!(controller.state().messages().len(), 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "service": "AI Customer Support Agent",
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config_for(&server)).unwrap();
    let health = transport.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.service, "AI Customer Support Agent");
}
