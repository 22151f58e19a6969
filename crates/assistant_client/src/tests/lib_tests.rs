use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Debug)]
struct CapturedRequest {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
    status: StatusCode,
    reply: String,
    delay: Duration,
}

async fn handle_generate(
    State(state): State<ServerState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(CapturedRequest {
            path: uri.path().to_string(),
            api_key: headers
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
    }
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, state.reply)
}

async fn spawn_assistant_server(
    status: StatusCode,
    reply: impl Into<String>,
    delay: Duration,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
        reply: reply.into(),
        delay,
    };
    let app = Router::new().fallback(handle_generate).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn assistant_for(base_url: &str, api_key: &str) -> GeminiAssistant {
    GeminiAssistant::new(AssistantOptions {
        base_url: base_url.to_string(),
        model: "test-model".to_string(),
        api_key: api_key.to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("assistant")
}

fn answer_body(parts: &[&str]) -> String {
    let parts: Vec<Value> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": parts } }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn ask_posts_prompt_and_returns_answer_text() {
    let (base_url, request_rx) =
        spawn_assistant_server(StatusCode::OK, answer_body(&["Voting is ", "a civic duty."]), Duration::ZERO)
            .await;
    let assistant = assistant_for(&base_url, "secret-key");

    let answer = assistant.ask("Why vote?").await.expect("answer");
    assert_eq!(answer, "Voting is a civic duty.");

    let captured = request_rx.await.expect("captured request");
    assert_eq!(captured.path, "/v1beta/models/test-model:generateContent");
    assert_eq!(captured.api_key.as_deref(), Some("secret-key"));
    assert_eq!(
        captured.body["contents"][0]["parts"][0]["text"],
        json!("As an election information assistant, answer this briefly: Why vote?")
    );
    assert_eq!(captured.body["contents"][0]["role"], json!("user"));
    let instruction = captured.body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system instruction");
    assert!(instruction.contains("under 100 words"));
}

#[tokio::test]
async fn ask_returns_empty_text_when_model_sends_no_parts() {
    let (base_url, _rx) =
        spawn_assistant_server(StatusCode::OK, json!({ "candidates": [] }).to_string(), Duration::ZERO).await;
    let assistant = assistant_for(&base_url, "secret-key");

    let answer = assistant.ask("Anything?").await.expect("answer");
    assert!(answer.is_empty());
}

#[tokio::test]
async fn ask_maps_error_status_to_service_unavailable() {
    let (base_url, _rx) = spawn_assistant_server(
        StatusCode::FORBIDDEN,
        json!({ "error": { "message": "API key not valid" } }).to_string(),
        Duration::ZERO,
    )
    .await;
    let assistant = assistant_for(&base_url, "wrong-key");

    let err = assistant.ask("Why vote?").await.expect_err("must fail");
    let AssistantError::ServiceUnavailable(reason) = err;
    assert!(reason.contains("403"), "unexpected reason: {reason}");
}

#[tokio::test]
async fn ask_maps_malformed_body_to_service_unavailable() {
    let (base_url, _rx) =
        spawn_assistant_server(StatusCode::OK, "not json at all", Duration::ZERO).await;
    let assistant = assistant_for(&base_url, "secret-key");

    let err = assistant.ask("Why vote?").await.expect_err("must fail");
    assert!(matches!(err, AssistantError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn ask_times_out_as_service_unavailable() {
    let (base_url, _rx) = spawn_assistant_server(
        StatusCode::OK,
        answer_body(&["late"]),
        Duration::from_secs(3),
    )
    .await;
    let assistant = GeminiAssistant::new(AssistantOptions {
        base_url,
        model: "test-model".to_string(),
        api_key: "secret-key".to_string(),
        timeout: Duration::from_millis(200),
    })
    .expect("assistant");

    let err = assistant.ask("Why vote?").await.expect_err("must time out");
    assert!(matches!(err, AssistantError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn ask_with_blank_key_fails_without_network() {
    let assistant = assistant_for("http://127.0.0.1:9", "   ");
    let err = assistant.ask("Why vote?").await.expect_err("must fail");
    let AssistantError::ServiceUnavailable(reason) = err;
    assert!(reason.contains("credential"));
}

#[tokio::test]
async fn missing_assistant_is_always_unavailable() {
    let err = MissingAssistant.ask("Why vote?").await.expect_err("must fail");
    assert!(matches!(err, AssistantError::ServiceUnavailable(_)));
}

#[test]
fn endpoint_tolerates_trailing_slash() {
    let assistant = assistant_for("https://example.test/", "k");
    assert_eq!(
        assistant.endpoint().as_str(),
        "https://example.test/v1beta/models/test-model:generateContent"
    );
}

#[test]
fn rejects_unparseable_base_url() {
    let err = GeminiAssistant::new(AssistantOptions::new("k").with_base_url("not a url"));
    assert!(err.is_err());
}
