//! Request id middleware.
//!
//! 1. **Extract** the id from the `x-request-id` header (or generate a UUID)
//! 2. **Store** it in request extensions for the [`RequestId`] extractor
//! 3. **Create** a tracing span carrying the id
//! 4. **Echo** the id in the response `x-request-id` header
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/todos", get(list_todos))
//!     .layer(request_id_layer());
//! ```

use axum::{extract::Request, http::HeaderValue, response::Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

use crate::extractors::RequestId;

/// Header name for request ids.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied id that is accepted as-is
const MAX_REQUEST_ID_LEN: usize = 128;

/// Create a layer that assigns a request id to every request.
#[must_use]
pub const fn request_id_layer() -> RequestIdLayer {
    RequestIdLayer
}

/// Layer for request id tracking.
#[derive(Clone, Copy, Debug)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Middleware service for request id tracking.
#[derive(Clone, Debug)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

/// Client-supplied id if it is printable and short, otherwise a fresh UUID
fn request_id_from(req: &Request) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string)
}

impl<S> Service<Request> for RequestIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let request_id = request_id_from(&req);
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            uri = %req.uri(),
        );

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                response
                    .headers_mut()
                    .insert(REQUEST_ID_HEADER, header_value);
            }

            Ok(response)
        })
    }
}
