//! Reverse geocoding: service trait, HTTP client and address resolution.

mod google;
mod resolver;

use std::future::Future;

use serde::Deserialize;

use crate::error::Result;

pub use google::GoogleGeocoder;
pub use resolver::AddressResolver;

/// One candidate returned by a reverse lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl GeocodeResult {
    /// Result with a single component, handy for stubs
    pub fn from_long_name(long_name: impl Into<String>) -> Self {
        Self {
            address_components: vec![AddressComponent {
                long_name: long_name.into(),
                ..Default::default()
            }],
            formatted_address: None,
        }
    }
}

/// Resolves `(latitude, longitude)` into candidate addresses, best first
pub trait ReverseGeocoder {
    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Vec<GeocodeResult>>>;
}
