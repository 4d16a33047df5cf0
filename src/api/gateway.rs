//! Hop 1: `POST /zipcode` with `{"cep": "<8 chars>"}`
//!
//! Validates the payload, forwards the code to the orchestrator and relays
//! whatever it answers (status, content type and body bytes) untouched.

use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
    response::Response,
    routing::{get, post},
};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{Instrument, Span, debug, field, info_span};

use super::{MAX_BODY_BYTES, health, method_not_allowed};
use crate::config::AppConfig;
use crate::error::RelayError;
use crate::lookup::{http_client, read_body, send};
use crate::models::{PostalCodeRequest, ZipCode};
use crate::propagation::TracePropagation;

/// Dependencies of the gateway handler
#[derive(Clone)]
pub struct GatewayState {
    client: Client,
    orchestrator_url: String,
    propagation: TracePropagation,
}

impl GatewayState {
    pub fn new(
        client: Client,
        orchestrator_url: impl Into<String>,
        propagation: TracePropagation,
    ) -> Self {
        Self {
            client,
            orchestrator_url: orchestrator_url.into(),
            propagation,
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            http_client()?,
            config.gateway.orchestrator_url.clone(),
            TracePropagation::new(),
        ))
    }

    fn temperature_url(&self) -> String {
        format!("{}/temperature", self.orchestrator_url.trim_end_matches('/'))
    }

    /// Decode and validate an inbound body.
    ///
    /// Only the first JSON value is read; anything after it is ignored. A
    /// top-level `null` reads as a request without `cep`.
    pub fn parse_request(body: &[u8]) -> Result<ZipCode, RelayError> {
        let request = serde_json::Deserializer::from_slice(body)
            .into_iter::<Option<PostalCodeRequest>>()
            .next()
            .unwrap_or_else(|| serde_json::from_slice(body))
            .map_err(|source| RelayError::InvalidPayload { source })?
            .unwrap_or_default();
        ZipCode::try_from(request)
    }

    /// Call the orchestrator and mirror its answer
    async fn forward(
        &self,
        zipcode: &ZipCode,
        cancel: &CancellationToken,
    ) -> Result<Response, RelayError> {
        let mut headers = HeaderMap::new();
        self.propagation.inject(&Span::current(), &mut headers);

        let request = self
            .client
            .get(self.temperature_url())
            .query(&[("zipcode", zipcode.as_str())])
            .headers(headers);

        let upstream = send(request, cancel)
            .await
            .map_err(|source| RelayError::UpstreamUnavailable { source })?;

        let status = upstream.status();
        let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
        let body = read_body(upstream, cancel)
            .await
            .map_err(|source| RelayError::UpstreamUnavailable { source })?;

        Span::current().record("upstream_status", status.as_u16());
        debug!(%status, bytes = body.len(), "Relaying orchestrator response");

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        if let Some(content_type) = content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Ok(response)
    }
}

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/zipcode", post(handle_zipcode).fallback(method_not_allowed))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_zipcode(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, RelayError> {
    let span = info_span!(
        "handle_zipcode_request",
        zipcode = field::Empty,
        upstream_status = field::Empty
    );

    // Dropping the handler future (caller gone) cancels the forwarded call
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    async {
        let zipcode = GatewayState::parse_request(&body)?;
        Span::current().record("zipcode", zipcode.as_str());
        state.forward(&zipcode, &cancel).await
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use httpmock::prelude::*;
    use rstest::rstest;
    use tower::ServiceExt;

    fn app(orchestrator_url: &str) -> Router {
        router(GatewayState::new(
            http_client().unwrap(),
            orchestrator_url,
            TracePropagation::new(),
        ))
    }

    async fn post_zipcode(app: Router, body: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/zipcode")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[rstest]
    #[case(r#"{"cep": "01001000"}"#, true)]
    #[case(r#"{"cep": "01001000"} trailing"#, true)]
    #[case(r#"{"cep": "01001000"}{"cep": "1"}"#, true)]
    #[case(r#"{"cep": "123"}"#, false)]
    #[case(r#"{}"#, false)]
    fn test_parse_request_length(#[case] body: &str, #[case] ok: bool) {
        assert_eq!(GatewayState::parse_request(body.as_bytes()).is_ok(), ok);
    }

    #[test]
    fn test_null_body_is_invalid_zipcode() {
        let err = GatewayState::parse_request(b"null").unwrap_err();
        assert!(matches!(err, RelayError::InvalidZipcode { length: 0 }));
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"cep": 1001000}"#)]
    #[case("")]
    #[case("   ")]
    fn test_parse_request_bad_payload(#[case] body: &str) {
        let err = GatewayState::parse_request(body.as_bytes()).unwrap_err();
        assert!(matches!(err, RelayError::InvalidPayload { .. }));
    }

    #[tokio::test]
    async fn test_relays_success_verbatim() {
        let server = MockServer::start();
        let upstream_body = r#"{"city":"São Paulo","temp_c":25.0,"temp_f":77.0,"temp_k":298.15}"#;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/temperature")
                .query_param("zipcode", "01001000");
            then.status(200)
                .header("content-type", "application/json")
                .body(upstream_body);
        });

        let (status, content_type, body) =
            post_zipcode(app(&server.base_url()), r#"{"cep":"01001000"}"#).await;

        mock.assert();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, upstream_body);
    }

    #[rstest]
    #[case(404, "Can not find zipcode")]
    #[case(422, "Invalid zipcode")]
    #[case(500, "Failed to get temperature")]
    #[tokio::test]
    async fn test_relays_failures_verbatim(#[case] upstream_status: u16, #[case] message: &str) {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/temperature");
            then.status(upstream_status).body(message);
        });

        let (status, _, body) =
            post_zipcode(app(&server.base_url()), r#"{"cep":"99999999"}"#).await;

        assert_eq!(status.as_u16(), upstream_status);
        assert_eq!(body, message);
    }

    #[tokio::test]
    async fn test_short_zipcode_never_reaches_orchestrator() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/temperature");
            then.status(200);
        });

        let (status, _, body) = post_zipcode(app(&server.base_url()), r#"{"cep":"123"}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "Invalid zipcode");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_trailing_data_is_forwarded() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/temperature")
                .query_param("zipcode", "01001000");
            then.status(200).body("{}");
        });

        let (status, _, _) =
            post_zipcode(app(&server.base_url()), r#"{"cep":"01001000"} x"#).await;

        assert_eq!(status, StatusCode::OK);
        mock.assert();
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (status, _, body) = post_zipcode(app("http://127.0.0.1:1"), "{cep: 01001000").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid request payload");
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let response = app("http://127.0.0.1:1")
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/zipcode")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Method not allowed");
    }

    #[tokio::test]
    async fn test_unreachable_orchestrator_is_500() {
        let (status, _, body) =
            post_zipcode(app("http://127.0.0.1:1"), r#"{"cep":"01001000"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to get temperature");
    }
}
