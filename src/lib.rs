//! Wayside - street-furniture point-of-interest ingest
//!
//! This library converts municipal street-furniture GeoJSON into normalized
//! point-of-interest JSON, reverse geocoding records that lack an address.

pub mod config;
pub mod error;
pub mod geocode;
pub mod geometry;
pub mod models;
pub mod pipeline;
pub mod source;

pub use error::PipelineError;
pub use models::{Category, PointOfInterest};
