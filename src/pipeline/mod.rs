//! Ingest pipeline: normalization, output and the batch driver.

mod batch;
mod normalize;
mod writer;

pub use batch::{BatchReport, CategoryBatchRunner, JobOutcome, JobReport};
pub use normalize::{parse_identifier, PoiNormalizer};
pub use writer::write_pois;
