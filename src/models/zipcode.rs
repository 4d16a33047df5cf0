//! Postal code payload and validation

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Required length of a postal code
pub const ZIPCODE_LEN: usize = 8;

/// Body accepted by the gateway
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PostalCodeRequest {
    /// Postal code as sent by the caller; absent decodes to empty
    #[serde(rename = "cep", default)]
    pub code: String,
}

/// A postal code that passed the length check
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipCode(String);

impl ZipCode {
    /// Validate a raw postal code. Only the byte length is checked.
    pub fn parse(raw: impl Into<String>) -> Result<Self, RelayError> {
        let raw = raw.into();
        if raw.len() == ZIPCODE_LEN {
            Ok(Self(raw))
        } else {
            Err(RelayError::InvalidZipcode { length: raw.len() })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZipCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<PostalCodeRequest> for ZipCode {
    type Error = RelayError;

    fn try_from(request: PostalCodeRequest) -> Result<Self, Self::Error> {
        Self::parse(request.code)
    }
}
