//! Raster inspection command
//!
//! Shows the structure, georeferencing and clip window of one raster
//! without writing anything.

use log::{debug, info, warn};
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::compression::CompressionFactory;
use crate::coordinate::clip_window;
use crate::errors::PatchResult;
use crate::extractor::GeoRaster;
use crate::patch::tile_starts;
use crate::pipeline::PipelineConfig;
use crate::tiff::constants::compression_name;

/// Command for inspecting a single raster against the configured region
pub struct InspectCommand {
    input_file: PathBuf,
    config: PipelineConfig,
}

impl InspectCommand {
    pub fn new(input_file: PathBuf, config: PipelineConfig) -> Self {
        InspectCommand { input_file, config }
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> PatchResult<()> {
        let raster = GeoRaster::open(&self.input_file)?;
        let layout = raster.layout();

        info!("Raster: {}", self.input_file.display());
        info!("  Format: {}", if raster.tiff().is_big_tiff { "BigTIFF" } else { "TIFF" });
        info!("  Byte order: {}", raster.tiff().byte_order.name());
        info!("  IFDs: {} ({} overviews)", raster.tiff().ifd_count(), raster.tiff().overviews().len());
        info!("  Layout: {}", layout);
        if let Some(ifd) = raster.tiff().full_resolution_ifd() {
            info!("  Tags: {}", ifd.entry_count());
        }
        debug!("{}", raster.tiff());

        let supported = CompressionFactory::create_handler(layout.compression).is_ok();
        info!("  Compression: {} ({}){}", layout.compression, compression_name(layout.compression),
              if supported { "" } else { " - not supported for extraction" });

        info!("  Georeferencing: {}", raster.geo_info());
        info!("  Geotransform: {}", raster.transform());

        match clip_window(raster.transform(), &self.config.bbox, raster.width(), raster.height()) {
            Ok(window) => {
                let p = self.config.params.patch_size;
                let rows = tile_starts(window.height as usize, p).count();
                let cols = tile_starts(window.width as usize, p).count();
                info!("  Window for {}: {}", self.config.bbox, window);
                info!("  Candidate {}x{} tiles: {} ({} x {})", p, p, rows * cols, rows, cols);
            }
            Err(e) => warn!("  Region {} cannot be clipped: {}", self.config.bbox, e),
        }

        Ok(())
    }
}
