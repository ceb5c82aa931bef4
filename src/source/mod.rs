//! Source dataset readers.

mod reader;

use std::path::Path;

use crate::error::Result;
use crate::models::SourceFeature;

pub use self::reader::GeoJsonReader;

/// Loads a dataset into an ordered list of features
pub trait FeatureSource {
    fn read_features(&self, path: &Path) -> Result<Vec<SourceFeature>>;
}
