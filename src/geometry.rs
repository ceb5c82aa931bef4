//! Coordinate extraction from feature geometry.

use geo_types::Point;

use crate::error::{PipelineError, Result};

/// Return `(longitude, latitude)` of the first point in the collection.
///
/// Any further points are ignored.
pub fn first_coordinate(points: &[Point<f64>]) -> Result<(f64, f64)> {
    let point = points.first().ok_or(PipelineError::EmptyGeometry)?;
    let (longitude, latitude) = point.x_y();

    if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
        return Err(PipelineError::CoordinateOutOfRange {
            longitude,
            latitude,
        });
    }

    Ok((longitude, latitude))
}
