//! Per-feature conversion into `PointOfInterest` records.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::geocode::{AddressResolver, ReverseGeocoder};
use crate::geometry::first_coordinate;
use crate::models::{Category, PointOfInterest, SourceFeature};

/// Converts the features of one dataset, all sharing a category
pub struct PoiNormalizer<'a, G> {
    category: Category,
    resolver: &'a AddressResolver<G>,
    concurrency: usize,
    progress: bool,
}

impl<'a, G: ReverseGeocoder> PoiNormalizer<'a, G> {
    pub fn new(category: Category, resolver: &'a AddressResolver<G>) -> Self {
        Self {
            category,
            resolver,
            concurrency: 1,
            progress: true,
        }
    }

    /// Allow up to `n` features to be resolved at once. Output order is unaffected.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Build the record for a single feature
    pub async fn normalize(&self, feature: &SourceFeature) -> Result<PointOfInterest> {
        let raw_id = feature
            .identifier()
            .ok_or_else(|| PipelineError::MissingField(feature.id_field.to_string()))?;
        let id = parse_identifier(raw_id)?;

        let (longitude, latitude) = first_coordinate(&feature.points)?;
        let name = self
            .resolver
            .resolve(feature.address.as_ref(), longitude, latitude)
            .await?;

        Ok(PointOfInterest::new(
            id,
            self.category,
            name,
            longitude,
            latitude,
        ))
    }

    /// Convert every feature, keeping source order. The first failure aborts.
    pub async fn normalize_all(&self, features: &[SourceFeature]) -> Result<Vec<PointOfInterest>> {
        let pb = if self.progress {
            progress_bar(features.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        // buffered() yields in submission order even when requests finish out of order
        let mut results = stream::iter(features.iter().enumerate())
            .map(|(index, feature)| async move {
                self.normalize(feature)
                    .await
                    .map_err(|err| err.at_feature(index))
            })
            .buffered(self.concurrency);

        let mut pois = Vec::with_capacity(features.len());
        while let Some(result) = results.next().await {
            let poi = match result {
                Ok(poi) => poi,
                Err(err) => {
                    pb.abandon();
                    return Err(err);
                }
            };
            debug!("{} {} -> {}", self.category, poi.id, poi.name);
            pb.inc(1);
            pois.push(poi);
        }

        pb.finish_and_clear();
        Ok(pois)
    }
}

/// Accept integers, integral floats and numeric strings
pub fn parse_identifier(value: &Value) -> Result<i64> {
    let invalid = || PipelineError::InvalidIdentifier(value.to_string());

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                n.as_f64().and_then(integral).ok_or_else(invalid)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{pos}/{len}] [{bar:40.cyan/blue}] ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
