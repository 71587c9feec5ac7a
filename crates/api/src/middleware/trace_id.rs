//! Request tracing middleware.
//!
//! Provides request ID extraction and generation for log correlation.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

lazy_static! {
    /// Client-supplied IDs are echoed into logs and headers, so only short
    /// token-like values are accepted.
    static ref VALID_REQUEST_ID: Regex = Regex::new(r"^[A-Za-z0-9._\-]{1,64}$").unwrap();
}

/// Request ID stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Returns the client's request ID if it is acceptable, or a new UUID v4.
pub fn resolve_request_id(header: Option<&HeaderValue>) -> String {
    header
        .and_then(|v| v.to_str().ok())
        .filter(|s| VALID_REQUEST_ID.is_match(s))
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Middleware that extracts or generates a request ID.
///
/// The request ID is stored in request extensions, echoed in the response
/// headers and recorded on a span wrapping the rest of the request.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = resolve_request_id(req.headers().get(REQUEST_ID_HEADER));
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let start = std::time::Instant::now();
        let mut response = next.run(req).await;

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-request-id"), header_value);
        }
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_request_id_is_kept() {
        let header = HeaderValue::from_static("req-123_abc.xyz");
        assert_eq!(resolve_request_id(Some(&header)), "req-123_abc.xyz");
    }

    #[test]
    fn test_missing_request_id_is_generated() {
        let id = resolve_request_id(None);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_unacceptable_request_ids_are_replaced() {
        for raw in ["has space", "semi;colon", ""] {
            let header = HeaderValue::from_str(raw).unwrap();
            let id = resolve_request_id(Some(&header));
            assert_ne!(id, raw);
            assert!(Uuid::parse_str(&id).is_ok());
        }

        let long = HeaderValue::from_str(&"a".repeat(65)).unwrap();
        assert_eq!(resolve_request_id(Some(&long)).len(), 36);
    }

    #[test]
    fn test_request_id_header_constant() {
        assert_eq!(REQUEST_ID_HEADER, "X-Request-ID");
    }
}
