//! Normalized point-of-interest record written to the output files.

use serde::{Deserialize, Serialize};

/// Street-furniture category, assigned per source dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Bench,
    PublicWashroom,
    TransitShelter,
    WayfindingStructure,
    LitterReceptacle,
}

impl Category {
    /// Human-readable label emitted in the `type` field
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bench => "Bench",
            Category::PublicWashroom => "Public washroom",
            Category::TransitShelter => "Transit shelter",
            Category::WayfindingStructure => "Wayfinding structure",
            Category::LitterReceptacle => "Litter receptacle",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Bench,
            Category::PublicWashroom,
            Category::TransitShelter,
            Category::WayfindingStructure,
            Category::LitterReceptacle,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Output record. Field order is the key order of the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Source feature identifier
    #[serde(rename = "placeID")]
    pub id: i64,

    /// Category label, e.g. "Bench"
    #[serde(rename = "type")]
    pub kind: String,

    /// Resolved street address, used as the display name
    pub name: String,

    pub longitude: f64,
    pub latitude: f64,
}

impl PointOfInterest {
    pub fn new(id: i64, category: Category, name: String, longitude: f64, latitude: f64) -> Self {
        Self {
            id,
            kind: category.label().to_string(),
            name,
            longitude,
            latitude,
        }
    }
}
