//! `x-request-id` handling for the API surface.
//!
//! A caller-supplied id is kept when it is short printable ASCII; anything
//! else is replaced by a fresh UUID. The id is stored in request extensions,
//! scoped as the task-local used by error rendering, and echoed back.

use crate::tracing::RequestId;
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

fn accepted_id(headers: &HeaderMap) -> Option<RequestId> {
    let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let printable = raw.bytes().all(|b| b.is_ascii_graphic());
    (!raw.is_empty() && raw.len() <= MAX_REQUEST_ID_LEN && printable).then(|| RequestId::new(raw))
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = accepted_id(request.headers()).unwrap_or_default();
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    // Accepted ids are graphic ASCII and generated ones are UUIDs
    let header_value = HeaderValue::from_str(request_id.as_str()).ok();
    if let Some(value) = header_value.clone() {
        request.headers_mut().insert(header.clone(), value);
    }
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "api_request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = crate::tracing::scope_request_id(request_id, next.run(request))
        .instrument(span)
        .await;

    if let Some(value) = header_value {
        response.headers_mut().insert(header, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::Extension,
        http::Request as HttpRequest,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn echo_id(Extension(request_id): Extension<RequestId>) -> String {
        format!("request-id:{}", request_id)
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo_id))
            .layer(axum::middleware::from_fn(request_id_middleware))
    }

    async fn send(header: Option<&str>) -> (Option<String>, String) {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let echoed = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (echoed, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn generated_id_reaches_handler_and_response() {
        let (echoed, body) = send(None).await;
        let echoed = echoed.expect("response carries an id");
        assert!(uuid::Uuid::parse_str(&echoed).is_ok());
        assert_eq!(body, format!("request-id:{}", echoed));
    }

    #[tokio::test]
    async fn caller_supplied_id_is_echoed() {
        let (echoed, body) = send(Some("bom-req-1")).await;
        assert_eq!(echoed.as_deref(), Some("bom-req-1"));
        assert_eq!(body, "request-id:bom-req-1");
    }

    #[tokio::test]
    async fn oversized_or_blank_ids_are_replaced() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        for supplied in [long.as_str(), "   ", "has space"] {
            let (echoed, _) = send(Some(supplied)).await;
            let echoed = echoed.expect("response carries an id");
            assert_ne!(echoed, supplied);
            assert!(uuid::Uuid::parse_str(&echoed).is_ok());
        }
    }
}
