//! Runs the configured category jobs one after another.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{error, info};

use super::normalize::PoiNormalizer;
use super::writer::write_pois;
use crate::config::{Config, JobConfig, SourceConfig};
use crate::error::{PipelineError, Result};
use crate::geocode::{AddressResolver, ReverseGeocoder};
use crate::source::{FeatureSource, GeoJsonReader};

#[derive(Debug)]
pub enum JobOutcome {
    Completed { records: usize },
    Failed { error: PipelineError },
}

#[derive(Debug)]
pub struct JobReport {
    pub name: String,
    pub output: PathBuf,
    pub outcome: JobOutcome,
}

/// Result of a whole batch, one entry per job in run order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    pub fn failed(&self) -> impl Iterator<Item = &JobReport> {
        self.jobs
            .iter()
            .filter(|j| matches!(j.outcome, JobOutcome::Failed { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn total_records(&self) -> usize {
        self.jobs
            .iter()
            .map(|j| match j.outcome {
                JobOutcome::Completed { records } => records,
                JobOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// Drives read → normalize → write for each job.
///
/// A failing job is reported and the remaining jobs still run.
pub struct CategoryBatchRunner<G> {
    resolver: AddressResolver<G>,
    source: SourceConfig,
    concurrency: usize,
    progress: bool,
}

impl<G: ReverseGeocoder> CategoryBatchRunner<G> {
    pub fn new(geocoder: G, config: &Config) -> Self {
        Self {
            resolver: AddressResolver::new(geocoder),
            source: config.source.clone(),
            concurrency: config.geocoder.concurrency,
            progress: true,
        }
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn resolver(&self) -> &AddressResolver<G> {
        &self.resolver
    }

    pub async fn run(&self, jobs: &[JobConfig]) -> BatchReport {
        info!("Starting batch of {} jobs", jobs.len());
        let mut report = BatchReport::default();

        for job in jobs {
            let name = job.name();
            info!(
                "Starting job {} ({} from {})",
                name,
                job.category,
                job.source.display()
            );

            let start = Instant::now();
            let outcome = match self.run_job(job).await {
                Ok(records) => {
                    info!(
                        "Job {} complete: {} records in {:.1}s",
                        name,
                        records,
                        start.elapsed().as_secs_f64()
                    );
                    JobOutcome::Completed { records }
                }
                Err(err) => {
                    error!("Job {} failed: {}", name, err);
                    JobOutcome::Failed { error: err }
                }
            };

            report.jobs.push(JobReport {
                name,
                output: job.output.clone(),
                outcome,
            });
        }

        report
    }

    /// Run one job with the GeoJSON reader configured for it
    pub async fn run_job(&self, job: &JobConfig) -> Result<usize> {
        let reader = GeoJsonReader::new(job.fields.clone(), self.source.missing_sentinel.clone());
        self.run_job_with(&reader, job).await
    }

    pub async fn run_job_with<S: FeatureSource>(&self, source: &S, job: &JobConfig) -> Result<usize> {
        let features = source.read_features(&job.source)?;

        let pois = PoiNormalizer::new(job.category, &self.resolver)
            .with_concurrency(self.concurrency)
            .with_progress(self.progress)
            .normalize_all(&features)
            .await?;

        write_pois(&job.output, &pois)?;
        Ok(pois.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::GeocodeResult;
    use crate::models::{Category, FieldRef, SourceFeature};
    use geo_types::Point;
    use serde_json::json;
    use std::path::Path;

    struct NoGeocoder;

    impl ReverseGeocoder for NoGeocoder {
        async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Vec<GeocodeResult>> {
            Err(PipelineError::GeocodeUnavailable {
                latitude,
                longitude,
                reason: "offline".into(),
            })
        }
    }

    /// Yields `count` features with inline addresses
    struct FixedSource {
        count: usize,
    }

    impl FeatureSource for FixedSource {
        fn read_features(&self, _path: &Path) -> Result<Vec<SourceFeature>> {
            Ok((0..self.count)
                .map(|i| SourceFeature {
                    attributes: vec![("_id".into(), json!(i))],
                    id_field: FieldRef::Index(0),
                    address: Some(crate::models::StreetAddress {
                        number: format!("{}", i + 1),
                        street: "Bloor St W".into(),
                    }),
                    points: vec![Point::new(-79.4, 43.67)],
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_record_count_matches_features() {
        let dir = tempfile::tempdir().unwrap();
        let job = JobConfig::new("benches.geojson", Category::Bench, dir.path().join("benches.json"));
        let runner = CategoryBatchRunner::new(NoGeocoder, &Config::reference()).with_progress(false);

        let written = runner
            .run_job_with(&FixedSource { count: 5 }, &job)
            .await
            .unwrap();
        assert_eq!(written, 5);

        let output: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&job.output).unwrap()).unwrap();
        assert_eq!(output.len(), 5);
        assert_eq!(output[4]["name"], "5 Bloor St W");
    }

    #[tokio::test]
    async fn test_failed_job_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good_source = dir.path().join("litter.geojson");
        std::fs::write(
            &good_source,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {"_id": 1, "a": "x", "b": "y", "n": "10", "s": "Dundas St"},
                    "geometry": {"type": "MultiPoint", "coordinates": [[-79.39, 43.65]]}
                }]
            })
            .to_string(),
        )
        .unwrap();

        let jobs = vec![
            JobConfig::new(
                dir.path().join("missing.geojson"),
                Category::Bench,
                dir.path().join("benches.json"),
            ),
            JobConfig::new(
                good_source,
                Category::LitterReceptacle,
                dir.path().join("litter.json"),
            ),
        ];

        let runner = CategoryBatchRunner::new(NoGeocoder, &Config::reference()).with_progress(false);
        let report = runner.run(&jobs).await;

        assert!(!report.is_success());
        assert_eq!(report.jobs.len(), 2);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.failed().next().unwrap().name, "benches");
        assert!(matches!(
            report.jobs[1].outcome,
            JobOutcome::Completed { records: 1 }
        ));
        assert_eq!(report.total_records(), 1);
        assert!(dir.path().join("litter.json").exists());
        assert!(!dir.path().join("benches.json").exists());
    }
}
