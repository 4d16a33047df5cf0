//! Shared plumbing for outbound calls
//!
//! Every outbound call is one GET raced against the inbound request's
//! cancellation token. There is no timeout, retry or cache here:
//! a failed call is final for the request that made it.

use axum::body::Bytes;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::LookupError;

/// User agent sent on every outbound call
pub const USER_AGENT: &str = concat!("zipweather/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by a service's outbound calls.
///
/// No timeout is configured; the inbound request's cancellation token bounds
/// every call instead.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).build()
}

/// Send `request`, giving up as soon as `cancel` fires
pub(crate) async fn send(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<Response, LookupError> {
    let response = cancel
        .run_until_cancelled(request.send())
        .await
        .ok_or(LookupError::Cancelled)??;
    debug!(status = %response.status(), path = response.url().path(), "Outbound call answered");
    Ok(response)
}

/// Read the whole body of `response`, giving up as soon as `cancel` fires
pub(crate) async fn read_body(
    response: Response,
    cancel: &CancellationToken,
) -> Result<Bytes, LookupError> {
    let body = cancel
        .run_until_cancelled(response.bytes())
        .await
        .ok_or(LookupError::Cancelled)??;
    Ok(body)
}

/// Send `request` and decode a successful JSON body into `T`
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<T, LookupError> {
    let response = send(request, cancel).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status { status });
    }

    let body = read_body(response, cancel).await?;
    Ok(serde_json::from_slice(&body)?)
}
