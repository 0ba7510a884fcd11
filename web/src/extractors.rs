//! Custom Axum extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::fmt;
use uuid::Uuid;

use crate::middleware::REQUEST_ID_HEADER;

/// Id of the current request.
///
/// Set by [`request_id_layer`](crate::middleware::request_id_layer); without
/// the layer it is read from the `x-request-id` header, or generated.
///
/// ```ignore
/// async fn handler(request_id: RequestId) -> String {
///     format!("Request ID: {request_id}")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(id.clone());
        }

        let id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

        Ok(Self(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_reads_header_without_middleware() {
        let (mut parts, ()) = Request::builder()
            .header(REQUEST_ID_HEADER, "abc")
            .body(())
            .unwrap()
            .into_parts();

        let id = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id.to_string(), "abc");
    }

    #[tokio::test]
    async fn test_prefers_extension() {
        let (mut parts, ()) = Request::builder()
            .header(REQUEST_ID_HEADER, "from-header")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(RequestId("from-layer".to_string()));

        let id = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id.0, "from-layer");
    }
}
