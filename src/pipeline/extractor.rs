//! Per-file extraction: load, clip, normalize, tile and label

use log::{debug, info, warn};
use std::path::Path;

use crate::coordinate::{clip_window, BoundingBox};
use crate::errors::PatchResult;
use crate::extractor::{GeoRaster, Region};
use crate::io::seekable::SeekableReader;
use crate::patch::{normalize, tile_grid, PatchParams, PatchSet, ValueRange};

/// Result of extracting one raster
#[derive(Debug, Clone)]
pub enum DayExtraction {
    /// The window held valid readings and was tiled
    Patches {
        window: Region,
        range: ValueRange,
        patches: PatchSet,
    },
    /// Every cell of the window was invalid
    NoValidPixels { window: Region },
}

/// Runs the extraction steps for one raster, without writing anything
#[derive(Debug, Clone)]
pub struct PatchExtractor {
    bbox: BoundingBox,
    params: PatchParams,
}

impl PatchExtractor {
    pub fn new(bbox: BoundingBox, params: PatchParams) -> Self {
        PatchExtractor { bbox, params }
    }

    /// Opens `path` and extracts its patches; the file is closed on return
    pub fn extract_file(&self, path: &Path) -> PatchResult<DayExtraction> {
        let mut raster = GeoRaster::open(path)?;
        self.extract(&mut raster)
    }

    /// Extracts the patches of an already opened raster
    pub fn extract<R: SeekableReader>(&self, raster: &mut GeoRaster<R>) -> PatchResult<DayExtraction> {
        let window = clip_window(raster.transform(), &self.bbox, raster.width(), raster.height())?;
        info!("Reading window {} for {}", window, self.bbox);

        let data = raster.read_window(window)?;
        let nodata = raster.layout().nodata.map(|v| v as f32);

        let grid = match normalize(&data, nodata) {
            Some(grid) => grid,
            None => {
                warn!("Window {} has no valid pixels", window);
                return Ok(DayExtraction::NoValidPixels { window });
            }
        };
        debug!("{} of {} cells valid, range {}", grid.valid_count(), window.pixel_count(), grid.range);

        let patches = tile_grid(&grid, &self.params);
        Ok(DayExtraction::Patches { window, range: grid.range, patches })
    }
}
