//! Router configuration.

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use todo::TodoRepository;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::handlers::{
    create_todo, delete_todo, health_check, list_todos, metrics, readiness_check, update_todo,
};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// - `/api/todos`: GET list, POST create, PATCH update, DELETE delete
/// - `/health`, `/ready`, `/metrics`
///
/// Every request gets a request id and an HTTP trace span. CORS headers are
/// only added when `config.cors_allow_origin` is set.
pub fn build_router<R>(state: AppState<R>, config: &ServerConfig) -> Router
where
    R: TodoRepository + 'static,
{
    let router = Router::new()
        .route(
            "/api/todos",
            get(list_todos::<R>)
                .post(create_todo::<R>)
                .patch(update_todo::<R>)
                .delete(delete_todo::<R>),
        )
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check::<R>))
        .route("/metrics", get(metrics::<R>))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let router = match config.cors_allow_origin.as_deref().map(cors_layer) {
        Some(Some(cors)) => router.layer(cors),
        Some(None) => {
            tracing::warn!(
                origin = config.cors_allow_origin.as_deref().unwrap_or_default(),
                "Ignoring invalid CORS origin"
            );
            router
        },
        None => router,
    };

    router.layer(request_id_layer())
}

/// CORS layer for `origin`, or `None` if it is not a valid header value
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origin.trim() == "*" {
        return Some(cors.allow_origin(Any));
    }
    HeaderValue::from_str(origin.trim())
        .ok()
        .map(|origin| cors.allow_origin(origin))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use todo::InMemoryTodoRepository;
    use tower::ServiceExt;

    fn app(cors: Option<&str>) -> Router {
        let mut config = Config::from_lookup(|_| None).server;
        config.cors_allow_origin = cors.map(str::to_string);
        build_router(AppState::new(Arc::new(InMemoryTodoRepository::new())), &config)
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = app(None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_method_is_rejected() {
        let response = app(None)
            .oneshot(Request::put("/api/todos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 405);
    }

    #[tokio::test]
    async fn test_cors_headers_when_configured() {
        let request = Request::get("/api/todos")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app(Some("http://localhost:5173")).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_no_cors_headers_by_default() {
        let request = Request::get("/api/todos")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app(None).oneshot(request).await.unwrap();
        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }
}
