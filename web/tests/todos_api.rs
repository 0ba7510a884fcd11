//! HTTP API tests against the in-memory repository.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use todo::client::{ClientAction, ClientEnvironment, ClientReducer, ClientState};
use todo::{CreateTodoRequest, InMemoryTodoRepository, Priority, TodoItem, TodoRepository};
use todome_runtime::Store;
use todome_web::{build_router, error::ErrorBody, AppState, Config, HttpTodoRepository};

fn app(repo: &Arc<InMemoryTodoRepository>) -> axum::Router {
    let config = Config::from_lookup(|_| None);
    build_router(AppState::new(Arc::clone(repo)), &config.server)
}

fn server() -> (TestServer, Arc<InMemoryTodoRepository>) {
    let repo = Arc::new(InMemoryTodoRepository::new());
    (TestServer::new(app(&repo)).unwrap(), repo)
}

#[tokio::test]
async fn create_toggle_delete_round_trip() {
    let (server, _repo) = server();

    let response = server
        .post("/api/todos")
        .json(&json!({"content": "Buy milk", "priority": "low"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: TodoItem = response.json();
    assert_eq!(created.content, "Buy milk");
    assert_eq!(created.priority, Priority::Low);
    assert!(!created.completed);
    assert!(created.submit_date.is_none());

    let response = server
        .patch("/api/todos")
        .json(&json!({"id": created.id, "tickonoff": true}))
        .await;
    response.assert_status_ok();
    let updated: TodoItem = response.json();
    assert!(updated.completed);
    assert_eq!(updated.content, "Buy milk");

    let response = server
        .delete("/api/todos")
        .json(&json!({"id": created.id}))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({"success": true}));

    let todos: Vec<TodoItem> = server.get("/api/todos").await.json();
    assert!(todos.is_empty());
}

#[tokio::test]
async fn list_is_in_creation_order() {
    let (server, _repo) = server();
    for content in ["first", "second", "third"] {
        server
            .post("/api/todos")
            .json(&json!({"content": content}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let todos: Vec<TodoItem> = server.get("/api/todos").await.json();
    let contents: Vec<_> = todos.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, ["first", "second", "third"]);
    assert!(todos.iter().all(|t| t.priority == Priority::Medium));
}

#[tokio::test]
async fn wire_format_uses_legacy_field_names() {
    let (server, _repo) = server();
    let response = server
        .post("/api/todos")
        .json(&json!({"content": "Call mom", "submitDate": "2024-10-01", "priority": "HIGH"}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["tickonoff"], json!(false));
    assert_eq!(body["priority"], json!("high"));
    assert!(body["submitDate"].as_str().unwrap().starts_with("2024-10-01T00:00:00"));
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn invalid_create_requests_are_rejected() {
    let (server, repo) = server();

    for body in [
        json!({"content": "   "}),
        json!({}),
        json!({"content": "x", "priority": "urgent"}),
        json!({"content": "x", "submitDate": "next tuesday"}),
    ] {
        let response = server.post("/api/todos").json(&body).await;
        response.assert_status_bad_request();
        let error: ErrorBody = response.json();
        assert_eq!(error.code, "VALIDATION_ERROR", "body: {body}");
    }

    assert!(repo.is_empty().unwrap());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (server, _repo) = server();
    let response = server
        .post("/api/todos")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn update_requires_an_existing_id() {
    let (server, _repo) = server();

    server
        .patch("/api/todos")
        .json(&json!({"tickonoff": true}))
        .await
        .assert_status_bad_request();

    let response = server
        .patch("/api/todos")
        .json(&json!({"id": 42, "tickonoff": true}))
        .await;
    response.assert_status_not_found();
    let error: ErrorBody = response.json();
    assert_eq!(error.code, "NOT_FOUND");
}

#[tokio::test]
async fn edit_content_keeps_completion() {
    let (server, _repo) = server();
    let created: TodoItem = server
        .post("/api/todos")
        .json(&json!({"content": "draft"}))
        .await
        .json();

    let updated: TodoItem = server
        .patch("/api/todos")
        .json(&json!({"id": created.id, "content": "  final  "}))
        .await
        .json();
    assert_eq!(updated.content, "final");
    assert!(!updated.completed);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn delete_validates_id_but_tolerates_missing_rows() {
    let (server, _repo) = server();

    server
        .delete("/api/todos")
        .json(&json!({"id": 0}))
        .await
        .assert_status_bad_request();

    let response = server.delete("/api/todos").json(&json!({"id": 99})).await;
    response.assert_status_ok();
    response.assert_json(&json!({"success": true}));
}

#[tokio::test]
async fn storage_failures_are_internal_errors() {
    let (server, repo) = server();
    repo.set_unavailable(true);

    let response = server.get("/api/todos").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = response.json();
    assert_eq!(error.code, "INTERNAL_SERVER_ERROR");

    server
        .get("/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);

    repo.set_unavailable(false);
    server.get("/ready").await.assert_status_ok();
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (server, _repo) = server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-123"),
        )
        .await;
    response.assert_status_ok();
    response.assert_text("ok");
    assert_eq!(response.header("x-request-id"), "req-123");
}

#[tokio::test]
async fn metrics_are_disabled_without_recorder() {
    let (server, _repo) = server();
    server.get("/metrics").await.assert_status_not_found();
}

#[tokio::test]
async fn client_controller_drives_a_live_server() {
    let repo = Arc::new(InMemoryTodoRepository::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = app(&repo);
    tokio::spawn(async move { axum::serve(listener, app).await });

    let http = HttpTodoRepository::new(format!("http://{address}")).unwrap();
    let env = ClientEnvironment::new(Arc::new(http)).with_error_timeout(None);
    let store = Store::new(ClientState::new(), ClientReducer::new(), env);

    let dispatch = |action| {
        let store = store.clone();
        async move {
            let mut handle = store.send(action).await.unwrap();
            handle
                .wait_with_timeout(Duration::from_secs(5))
                .await
                .unwrap();
        }
    };

    dispatch(ClientAction::Load).await;
    dispatch(ClientAction::Create {
        request: CreateTodoRequest {
            content: Some("Buy milk".to_string()),
            submit_date: None,
            priority: Some("low".to_string()),
        },
    })
    .await;

    let id = store.state(|s| s.todos[0].id).await;
    dispatch(ClientAction::ToggleCompletion { id }).await;
    assert_eq!(store.state(ClientState::completed_count).await, 1);
    assert!(store.state(|s| s.error.is_none()).await);

    // Removed behind the controller's back: the server answers 404 and the
    // optimistic toggle is rolled back.
    repo.delete(id).await.unwrap();
    dispatch(ClientAction::ToggleCompletion { id }).await;
    assert!(store.state(|s| s.todos[0].completed).await);
    let error = store.state(|s| s.error.clone()).await.unwrap();
    assert!(error.contains("not found"), "{error}");

    dispatch(ClientAction::Delete { id }).await;
    assert_eq!(store.state(ClientState::count).await, 0);
    assert!(repo.is_empty().unwrap());
}
