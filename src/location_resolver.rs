//! Location Resolution Module
//!
//! Resolves a validated postal code into the city it belongs to by asking the
//! postal lookup service (`GET <base>/<code>/json/`).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{Span, debug, field, instrument};

use crate::error::LookupError;
use crate::lookup::fetch_json;
use crate::models::{Location, ZipCode};

/// Anything that can turn a postal code into a city
#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// Resolve `zipcode`, failing when the lookup fails or knows no city
    async fn resolve(
        &self,
        zipcode: &ZipCode,
        cancel: &CancellationToken,
    ) -> Result<Location, LookupError>;
}

/// Postal lookup response; only the city is used
#[derive(Debug, Deserialize)]
struct PostalLookupResponse {
    #[serde(default)]
    localidade: Option<String>,
}

/// Client for the postal lookup service
#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    base_url: String,
}

impl LocationResolver {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn lookup_url(&self, zipcode: &ZipCode) -> String {
        format!("{}/{}/json/", self.base_url.trim_end_matches('/'), zipcode)
    }
}

#[async_trait]
impl LocationLookup for LocationResolver {
    #[instrument(name = "get_location", skip(self, zipcode, cancel), fields(zipcode = %zipcode, city = field::Empty))]
    async fn resolve(
        &self,
        zipcode: &ZipCode,
        cancel: &CancellationToken,
    ) -> Result<Location, LookupError> {
        debug!("Resolving postal code");

        let response: PostalLookupResponse =
            fetch_json(self.client.get(self.lookup_url(zipcode)), cancel).await?;

        let location = response
            .localidade
            .and_then(Location::new)
            .ok_or_else(|| LookupError::CityNotFound {
                zipcode: zipcode.to_string(),
            })?;

        Span::current().record("city", location.city.as_str());
        debug!(city = %location.city, "Resolved postal code");

        Ok(location)
    }
}
