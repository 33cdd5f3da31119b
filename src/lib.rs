pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod coordinate;
pub mod patch;
pub mod pipeline;
pub mod commands;
pub mod cli;
pub mod errors;

pub use errors::{PatchError, PatchResult};
pub use tiff::TiffReader;
pub use extractor::{GeoRaster, Region};
pub use coordinate::{clip_window, BoundingBox, GeoTransform, Point};
pub use patch::{normalize, tile_grid, NormalizedGrid, PatchParams, PatchSet, ValueRange};
pub use pipeline::{DayExtraction, DayOutcome, DayPipeline, PatchExtractor, PatchWriter, PipelineConfig, RunSummary};
