//! Google Geocoding API client.

use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{GeocodeResult, ReverseGeocoder};
use crate::config::GeocoderConfig;
use crate::error::{PipelineError, Result};

const USER_AGENT: &str = concat!("wayside/", env!("CARGO_PKG_VERSION"));

/// Reverse geocoder backed by the Google Geocoding web service
pub struct GoogleGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocoderConfig, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid geocoder endpoint: {}", config.endpoint))?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn request_url(&self, latitude: f64, longitude: f64) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("latlng", &format!("{},{}", latitude, longitude))
            .append_pair("key", &self.api_key);
        url
    }
}

impl ReverseGeocoder for GoogleGeocoder {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Vec<GeocodeResult>> {
        let unavailable = |reason: String| PipelineError::GeocodeUnavailable {
            latitude,
            longitude,
            reason,
        };

        debug!("Reverse geocoding ({}, {})", latitude, longitude);

        // without_url() keeps the API key out of error messages
        let response = self
            .client
            .get(self.request_url(latitude, longitude))
            .send()
            .await
            .map_err(|e| unavailable(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("invalid response: {}", e.without_url())))?;

        interpret(body).map_err(|reason| {
            warn!("Geocoder rejected ({}, {}): {}", latitude, longitude, reason);
            unavailable(reason)
        })
    }
}

/// Map the service status onto results or an error reason
fn interpret(body: GeocodeResponse) -> std::result::Result<Vec<GeocodeResult>, String> {
    match body.status.as_str() {
        "OK" => Ok(body.results),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(match body.error_message {
            Some(message) => format!("{}: {}", status, message),
            None => status.to_string(),
        }),
    }
}
