//! Configuration, per-day driver and output files

pub mod config;
mod driver;
mod extractor;
mod writer;

pub use self::config::{parse_days, ConfigOverrides, PipelineConfig};
pub use self::driver::{DayOutcome, DayPipeline, RunSummary};
pub use self::extractor::{DayExtraction, PatchExtractor};
pub use self::writer::PatchWriter;
