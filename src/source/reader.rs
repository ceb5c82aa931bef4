//! GeoJSON reader for street-furniture datasets.

use std::fs;
use std::path::Path;

use geo_types::Point;
use geojson::{Feature, GeoJson, Geometry};
use serde_json::Value;
use tracing::{debug, info};

use super::FeatureSource;
use crate::config::FieldMap;
use crate::error::{PipelineError, Result};
use crate::models::{FieldRef, SourceFeature, StreetAddress};

/// Reads a `FeatureCollection`, a single `Feature`, or newline-delimited features
#[derive(Debug, Clone)]
pub struct GeoJsonReader {
    fields: FieldMap,
    missing_sentinel: String,
}

impl GeoJsonReader {
    pub fn new(fields: FieldMap, missing_sentinel: impl Into<String>) -> Self {
        Self {
            fields,
            missing_sentinel: missing_sentinel.into(),
        }
    }

    /// Parse an in-memory document. `path` is only used in error messages.
    pub fn parse_str(&self, content: &str, path: &Path) -> Result<Vec<SourceFeature>> {
        let raw = match content.parse::<GeoJson>() {
            Ok(geojson) => flatten(geojson),
            Err(primary) => parse_sequence(content).map_err(|sequence| {
                PipelineError::SourceUnreadable {
                    path: path.to_path_buf(),
                    reason: format!(
                        "not a GeoJSON document ({primary}) nor a GeoJSON sequence ({sequence})"
                    ),
                }
            })?,
        };

        raw.into_iter()
            .enumerate()
            .map(|(index, feature)| {
                self.convert(feature)
                    .map_err(|err| err.at_feature(index))
            })
            .collect()
    }

    fn convert(&self, feature: Feature) -> Result<SourceFeature> {
        let points = match &feature.geometry {
            Some(geometry) => {
                let mut points = Vec::new();
                collect_points(geometry, &mut points)?;
                points
            }
            None => Vec::new(),
        };

        let attributes: Vec<(String, Value)> = feature
            .properties
            .unwrap_or_default()
            .into_iter()
            .collect();

        let mut source = SourceFeature {
            attributes,
            id_field: self.fields.id.clone(),
            address: None,
            points,
        };

        let number = self.component(&source, &self.fields.number);
        let street = self.component(&source, &self.fields.street);
        source.address = match (number, street) {
            (Some(number), Some(street)) => Some(StreetAddress { number, street }),
            _ => None,
        };

        Ok(source)
    }

    /// Address component, or `None` when missing, null, blank or the sentinel
    fn component(&self, feature: &SourceFeature, field: &FieldRef) -> Option<String> {
        let text = match feature.attribute(field)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        if text.is_empty() || text == self.missing_sentinel {
            None
        } else {
            Some(text)
        }
    }
}

impl FeatureSource for GeoJsonReader {
    fn read_features(&self, path: &Path) -> Result<Vec<SourceFeature>> {
        let content = fs::read_to_string(path).map_err(|err| PipelineError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let features = self.parse_str(&content, path)?;
        let with_address = features.iter().filter(|f| f.address.is_some()).count();
        info!(
            "Loaded {} features from {} ({} with inline address)",
            features.len(),
            path.display(),
            with_address
        );
        Ok(features)
    }
}

fn flatten(geojson: GeoJson) -> Vec<Feature> {
    match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    }
}

fn parse_sequence(content: &str) -> std::result::Result<Vec<Feature>, String> {
    let mut features = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let geojson = line
            .parse::<GeoJson>()
            .map_err(|err| format!("line {}: {}", line_idx + 1, err))?;
        features.extend(flatten(geojson));
    }

    if features.is_empty() {
        return Err("no features found".to_string());
    }
    debug!("Parsed {} features as a GeoJSON sequence", features.len());
    Ok(features)
}

fn collect_points(geometry: &Geometry, out: &mut Vec<Point<f64>>) -> Result<()> {
    use geojson::Value as Shape;

    match &geometry.value {
        Shape::Point(position) => out.push(to_point(position)?),
        Shape::MultiPoint(positions) => {
            for position in positions {
                out.push(to_point(position)?);
            }
        }
        Shape::GeometryCollection(members) => {
            for member in members {
                collect_points(member, out)?;
            }
        }
        Shape::LineString(_) => return Err(unsupported("LineString")),
        Shape::MultiLineString(_) => return Err(unsupported("MultiLineString")),
        Shape::Polygon(_) => return Err(unsupported("Polygon")),
        Shape::MultiPolygon(_) => return Err(unsupported("MultiPolygon")),
    }
    Ok(())
}

fn to_point(position: &[f64]) -> Result<Point<f64>> {
    match position {
        [x, y, ..] => Ok(Point::new(*x, *y)),
        _ => Err(PipelineError::UnsupportedGeometry(format!(
            "position with {} coordinate(s)",
            position.len()
        ))),
    }
}

fn unsupported(kind: &str) -> PipelineError {
    PipelineError::UnsupportedGeometry(kind.to_string())
}
