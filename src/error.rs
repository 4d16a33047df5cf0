//! Error types and handling for the zipweather services

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A setting is present but unusable
    #[error("Configuration error: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Create a new invalid-setting error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Failure of a single external lookup (postal or weather)
#[derive(Error, Debug)]
pub enum LookupError {
    /// The request could not be sent or the body could not be read
    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// The lookup answered with a non-success status
    #[error("lookup responded with status {status}")]
    Status { status: StatusCode },

    /// The body was not the JSON shape we expect
    #[error("failed to decode lookup response: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },

    /// Postal lookup answered, but without a city
    #[error("city not found for zipcode {zipcode}")]
    CityNotFound { zipcode: String },

    /// Weather lookup answered, but `current.temp_c` was absent
    #[error("weather response is missing {field}")]
    MissingTemperature { field: &'static str },

    /// The inbound request went away before the lookup finished
    #[error("lookup cancelled")]
    Cancelled,
}

/// Caller-visible failure of a relay request.
///
/// Every variant is terminal for the request and maps to exactly one status
/// code and one short message. Sources are logged, never sent to the caller.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Inbound body was not a decodable postal code request
    #[error("invalid request payload: {source}")]
    InvalidPayload {
        #[source]
        source: serde_json::Error,
    },

    /// Postal code does not have exactly 8 characters
    #[error("invalid zipcode of length {length}")]
    InvalidZipcode { length: usize },

    /// Postal lookup failed or returned no city
    #[error("location not found: {source}")]
    LocationNotFound {
        #[source]
        source: LookupError,
    },

    /// Weather lookup failed or returned unusable data
    #[error("temperature unavailable: {source}")]
    TemperatureUnavailable {
        #[source]
        source: LookupError,
    },

    /// The orchestrator hop could not be reached
    #[error("upstream unavailable: {source}")]
    UpstreamUnavailable {
        #[source]
        source: LookupError,
    },
}

impl RelayError {
    /// HTTP status this error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            RelayError::InvalidZipcode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            RelayError::TemperatureUnavailable { .. } | RelayError::UpstreamUnavailable { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the message shown to the caller
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            RelayError::InvalidPayload { .. } => "Invalid request payload",
            RelayError::InvalidZipcode { .. } => "Invalid zipcode",
            RelayError::LocationNotFound { .. } => "Can not find zipcode",
            RelayError::TemperatureUnavailable { .. } | RelayError::UpstreamUnavailable { .. } => {
                "Failed to get temperature"
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, self.user_message()).into_response()
    }
}
