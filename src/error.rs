//! Error types for the ingest pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything that can stop a record or a job
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read source {}: {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("feature geometry contains no points")]
    EmptyGeometry,

    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("coordinate out of range: ({longitude}, {latitude})")]
    CoordinateOutOfRange { longitude: f64, latitude: f64 },

    #[error("missing field {0}")]
    MissingField(String),

    #[error("identifier is not an integer: {0}")]
    InvalidIdentifier(String),

    #[error("reverse geocoding failed at ({latitude}, {longitude}): {reason}")]
    GeocodeUnavailable {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("feature #{index}: {source}")]
    Feature {
        index: usize,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Tag an error with the position of the feature that produced it
    pub fn at_feature(self, index: usize) -> Self {
        match self {
            // already tagged
            err @ PipelineError::Feature { .. } => err,
            err => PipelineError::Feature {
                index,
                source: Box::new(err),
            },
        }
    }

    /// Strip the feature tag, if any
    pub fn root(&self) -> &PipelineError {
        match self {
            PipelineError::Feature { source, .. } => source.root(),
            err => err,
        }
    }
}
