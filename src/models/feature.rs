//! Source feature as seen by the normalizer, after loading-time cleanup.

use geo_types::Point;
use serde::Deserialize;
use serde_json::Value;

/// Selects a feature property by position or by name
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldRef {
    Index(usize),
    Name(String),
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRef::Index(i) => write!(f, "#{}", i),
            FieldRef::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

/// Two-part street address taken from the source attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetAddress {
    pub number: String,
    pub street: String,
}

impl StreetAddress {
    /// Joined with a single space, e.g. "123 Main St"
    pub fn display(&self) -> String {
        format!("{} {}", self.number, self.street)
    }
}

/// One record of a source dataset
#[derive(Debug, Clone)]
pub struct SourceFeature {
    /// Property values in source order
    pub attributes: Vec<(String, Value)>,

    /// Which attribute holds the identifier
    pub id_field: FieldRef,

    /// Present only when both address components were present in the source
    pub address: Option<StreetAddress>,

    /// Points of the feature geometry, in source order
    pub points: Vec<Point<f64>>,
}

impl SourceFeature {
    /// Attribute by position or name
    pub fn attribute(&self, field: &FieldRef) -> Option<&Value> {
        match field {
            FieldRef::Index(i) => self.attributes.get(*i).map(|(_, v)| v),
            FieldRef::Name(name) => self
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v),
        }
    }

    /// Raw identifier value
    pub fn identifier(&self) -> Option<&Value> {
        self.attribute(&self.id_field)
    }
}
