//! An opened, georeferenced single-band raster

use log::{debug, info};
use ndarray::Array2;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::coordinate::GeoTransform;
use crate::errors::PatchResult;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::TiffError;
use crate::tiff::geo_key_parser::{GeoInfo, GeoKeyParser};
use crate::tiff::layout::RasterLayout;
use crate::tiff::types::TIFF;
use crate::tiff::TiffReader;

use super::region::Region;
use super::window_reader::WindowReader;

/// A GeoTIFF ready for windowed reads
///
/// Owns its stream; a raster opened from a path releases the file when
/// dropped.
pub struct GeoRaster<R: SeekableReader> {
    reader: R,
    tiff_reader: TiffReader,
    tiff: TIFF,
    layout: RasterLayout,
    geo_info: GeoInfo,
    transform: GeoTransform,
}

impl GeoRaster<BufReader<File>> {
    /// Opens a GeoTIFF file
    pub fn open(path: &Path) -> PatchResult<Self> {
        info!("Opening raster {}", path.display());
        let file = File::open(path).map_err(TiffError::from)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: SeekableReader> GeoRaster<R> {
    /// Parses the header, layout and georeferencing of the full-resolution image
    pub fn from_reader(mut reader: R) -> PatchResult<Self> {
        let mut tiff_reader = TiffReader::new();
        let tiff = tiff_reader.read(&mut reader)?;

        let ifd = tiff.full_resolution_ifd()
            .ok_or_else(|| TiffError::GenericError("No image in TIFF file".to_string()))?;
        let layout = RasterLayout::from_ifd(&tiff_reader, &mut reader, ifd)?;
        let geo_info = GeoKeyParser::extract_geo_info(&tiff_reader, &mut reader, ifd)?;
        let transform = GeoTransform::from_geotiff(&geo_info)?;
        debug!("Geotransform: {}", transform);

        Ok(GeoRaster {
            reader,
            tiff_reader,
            tiff,
            layout,
            geo_info,
            transform,
        })
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    pub fn layout(&self) -> &RasterLayout {
        &self.layout
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn geo_info(&self) -> &GeoInfo {
        &self.geo_info
    }

    pub fn tiff(&self) -> &TIFF {
        &self.tiff
    }

    /// Reads the first band inside `region` as a `[row, col]` float array
    pub fn read_window(&mut self, region: Region) -> PatchResult<Array2<f32>> {
        let handler = self.tiff_reader.handler()?;
        let window = WindowReader::new(&self.layout, handler).read(&mut self.reader, region)?;
        debug!("Read window {} ({} samples)", region, window.len());
        Ok(window)
    }
}
