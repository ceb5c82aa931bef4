use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::models::{Category, FieldRef};

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_MISSING_SENTINEL: &str = "None";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub source: SourceConfig,
    pub jobs: Vec<JobConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Maximum reverse-geocoding requests in flight within one job
    pub concurrency: usize,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            api_key: None,
            concurrency: 1,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    /// Attribute value that marks an address component as absent
    pub missing_sentinel: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            missing_sentinel: DEFAULT_MISSING_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobConfig {
    pub source: PathBuf,
    pub category: Category,
    pub output: PathBuf,
    #[serde(default)]
    pub fields: FieldMap,
}

impl JobConfig {
    pub fn new(source: impl Into<PathBuf>, category: Category, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            category,
            output: output.into(),
            fields: FieldMap::default(),
        }
    }

    /// Short name used in logs and for `--only` filtering
    pub fn name(&self) -> String {
        self.output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Which properties hold the identifier and the two address components
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FieldMap {
    pub id: FieldRef,
    pub number: FieldRef,
    pub street: FieldRef,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            id: FieldRef::Index(0),
            number: FieldRef::Index(3),
            street: FieldRef::Index(4),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// The fixed five-dataset batch used when no config file is given
    pub fn reference() -> Self {
        Self {
            geocoder: GeocoderConfig::default(),
            source: SourceConfig::default(),
            jobs: vec![
                JobConfig::new("data/benches.geojson", Category::Bench, "output/benches.json"),
                JobConfig::new(
                    "data/washrooms.geojson",
                    Category::PublicWashroom,
                    "output/washrooms.json",
                ),
                JobConfig::new(
                    "data/transit_shelters.geojson",
                    Category::TransitShelter,
                    "output/transit_shelters.json",
                ),
                JobConfig::new(
                    "data/wayfinding.geojson",
                    Category::WayfindingStructure,
                    "output/wayfinding.json",
                ),
                JobConfig::new(
                    "data/litter_receptacles.geojson",
                    Category::LitterReceptacle,
                    "output/litter_receptacles.json",
                ),
            ],
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.geocoder.endpoint)
            .with_context(|| format!("Invalid geocoder endpoint: {}", self.geocoder.endpoint))?;
        ensure!(
            self.geocoder.concurrency >= 1,
            "geocoder.concurrency must be at least 1"
        );
        ensure!(!self.jobs.is_empty(), "No jobs configured");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal() {
        let config: Config = toml::from_str(
            r#"
            [[jobs]]
            source = "data/benches.geojson"
            category = "bench"
            output = "out/benches.json"
            "#,
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.geocoder.endpoint, DEFAULT_GEOCODER_ENDPOINT);
        assert_eq!(config.geocoder.concurrency, 1);
        assert_eq!(config.source.missing_sentinel, "None");
        assert_eq!(config.jobs[0].category, Category::Bench);
        assert_eq!(config.jobs[0].fields, FieldMap::default());
        assert_eq!(config.jobs[0].name(), "benches");
    }

    #[test]
    fn test_parse_named_fields() {
        let config: Config = toml::from_str(
            r#"
            [geocoder]
            api_key = "secret"
            concurrency = 4

            [source]
            missing_sentinel = "N/A"

            [[jobs]]
            source = "a.geojson"
            category = "litter-receptacle"
            output = "a.json"
            fields = { id = "_id", number = "ADDRESSNUMBERTEXT", street = 4 }
            "#,
        )
        .unwrap();

        assert_eq!(config.geocoder.api_key.as_deref(), Some("secret"));
        assert_eq!(config.geocoder.concurrency, 4);
        assert_eq!(config.source.missing_sentinel, "N/A");
        let fields = &config.jobs[0].fields;
        assert_eq!(fields.id, FieldRef::Name("_id".into()));
        assert_eq!(fields.number, FieldRef::Name("ADDRESSNUMBERTEXT".into()));
        assert_eq!(fields.street, FieldRef::Index(4));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::reference();
        config.geocoder.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::reference();
        config.geocoder.endpoint = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reference_has_five_jobs() {
        let config = Config::reference();
        config.validate().unwrap();
        let categories: Vec<Category> = config.jobs.iter().map(|j| j.category).collect();
        assert_eq!(categories, Category::all());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[jobs]]\nsource = \"s.geojson\"\ncategory = \"transit-shelter\"\noutput = \"o.json\""
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.jobs.len(), 1);
        assert_eq!(config.jobs[0].category, Category::TransitShelter);
    }
}
