use tracing::debug;

use super::ReverseGeocoder;
use crate::error::{PipelineError, Result};
use crate::models::StreetAddress;

/// Produces the display address of a feature.
///
/// Inline source addresses win; the geocoder is only consulted when the
/// feature has none.
pub struct AddressResolver<G> {
    geocoder: G,
}

impl<G: ReverseGeocoder> AddressResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub async fn resolve(
        &self,
        address: Option<&StreetAddress>,
        longitude: f64,
        latitude: f64,
    ) -> Result<String> {
        if let Some(address) = address {
            return Ok(address.display());
        }

        let results = self.geocoder.reverse_geocode(latitude, longitude).await?;
        let name = results
            .into_iter()
            .next()
            .and_then(|r| r.address_components.into_iter().next())
            .map(|c| c.long_name)
            .ok_or_else(|| PipelineError::GeocodeUnavailable {
                latitude,
                longitude,
                reason: "no results".to_string(),
            })?;

        debug!("Geocoded ({}, {}) -> {}", latitude, longitude, name);
        Ok(name)
    }
}
