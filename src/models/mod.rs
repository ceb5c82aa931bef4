//! Core data models for the ingest pipeline.

pub mod feature;
pub mod poi;

pub use feature::{FieldRef, SourceFeature, StreetAddress};
pub use poi::{Category, PointOfInterest};
