use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::models::PointOfInterest;

/// Write records as a pretty-printed JSON array, replacing any existing file.
///
/// The parent directory must already exist.
pub fn write_pois(path: &Path, pois: &[PointOfInterest]) -> Result<()> {
    let write_error = |source: io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut output = serde_json::to_string_pretty(pois).map_err(|e| write_error(e.into()))?;
    output.push('\n');
    fs::write(path, output).map_err(write_error)?;

    info!("Wrote {} records to {}", pois.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_pretty_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benches.json");
        let pois = vec![PointOfInterest::new(
            42,
            Category::Bench,
            "123 Main St".into(),
            -79.38,
            43.65,
        )];

        write_pois(&path, &pois).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            r#"[
  {
    "placeID": 42,
    "type": "Bench",
    "name": "123 Main St",
    "longitude": -79.38,
    "latitude": 43.65
  }
]
"#
        );
    }

    #[test]
    fn test_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "stale content that is much longer than an empty array").unwrap();

        write_pois(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.json");

        let err = write_pois(&path, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Write { .. }));
    }
}
