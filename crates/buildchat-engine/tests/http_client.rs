use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use buildchat_engine::{
    ChatSession, ClientConfig, Completion, HttpTaskClient, Sender, TaskClient, TaskRequest,
    TransportError, SEND_FAILED_NOTICE,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn task_handler(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let task = body.get("task").and_then(Value::as_str).unwrap_or("");
    Json(json!({
        "result": {
            "output": format!("built: {task}"),
            "content_type": content_type,
        }
    }))
}

async fn echo_handler(Json(body): Json<Value>) -> impl IntoResponse {
    Json(json!({ "result": body }))
}

async fn failing_handler() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"result": {"output": "should not be shown"}})),
    )
}

async fn html_handler() -> impl IntoResponse {
    (StatusCode::OK, "<html>oops</html>")
}

async fn slow_handler() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"result": "too late"}))
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/task", post(task_handler))
        .route("/echo", post(echo_handler))
        .route("/fail", post(failing_handler))
        .route("/html", post(html_handler))
        .route("/slow", post(slow_handler));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, path: &str, timeout_seconds: u64) -> HttpTaskClient {
    let config = ClientConfig::default()
        .with_endpoint(format!("http://{addr}{path}"))
        .with_timeout_seconds(timeout_seconds);
    HttpTaskClient::new(&config).unwrap()
}

#[tokio::test]
async fn posts_json_task_and_parses_response() {
    let addr = spawn_server().await;
    let client = client_for(addr, "/api/task", 5);

    let body = client
        .submit_task(&TaskRequest::new("build a widget"))
        .await
        .unwrap();

    assert_eq!(body["result"]["output"], "built: build a widget");
    assert_eq!(body["result"]["content_type"], "application/json");
}

#[tokio::test]
async fn sends_empty_context_object() {
    let addr = spawn_server().await;
    let client = client_for(addr, "/echo", 5);

    let body = client.submit_task(&TaskRequest::new("hi")).await.unwrap();
    assert_eq!(body["result"], json!({"task": "hi", "context": {}}));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let addr = spawn_server().await;
    let client = client_for(addr, "/fail", 5);

    let err = client.submit_task(&TaskRequest::new("x")).await.unwrap_err();
    assert!(matches!(
        err,
        TransportError::Status(status) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn non_json_body_is_an_error() {
    let addr = spawn_server().await;
    let client = client_for(addr, "/html", 5);

    let err = client.submit_task(&TaskRequest::new("x")).await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let addr = spawn_server().await;
    let client = client_for(addr, "/slow", 1);

    let err = client.submit_task(&TaskRequest::new("x")).await.unwrap_err();
    assert!(matches!(err, TransportError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr, "/api/task", 5);
    let err = client.submit_task(&TaskRequest::new("x")).await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)), "got {err:?}");
}

#[tokio::test]
async fn session_round_trip_against_server() {
    let addr = spawn_server().await;
    let client = client_for(addr, "/api/task", 5);
    let mut session = ChatSession::new();

    let pending = session.submit("  build a widget  ").unwrap();
    assert_eq!(session.log().len(), 1);

    let outcome = client.submit_task(&pending.request).await;
    assert_eq!(session.complete(pending.id, outcome), Completion::Answered);

    let messages = session.log().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender(), Sender::User);
    assert_eq!(messages[0].text(), "build a widget");
    assert_eq!(messages[1].sender(), Sender::System);
    assert_eq!(messages[1].text(), "built: build a widget");
    assert!(session.error().is_none());
}

#[tokio::test]
async fn session_failure_against_server() {
    let addr = spawn_server().await;
    let client = client_for(addr, "/fail", 5);
    let mut session = ChatSession::new();

    let pending = session.submit("build").unwrap();
    let outcome = client.submit_task(&pending.request).await;

    assert_eq!(session.complete(pending.id, outcome), Completion::Failed);
    assert_eq!(session.log().len(), 1);
    assert_eq!(session.error(), Some(SEND_FAILED_NOTICE));
    assert!(session.status().is_idle());
}
