//! Picks the strip or tile strategy for a layout

use ndarray::Array2;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::layout::{BlockLayout, RasterLayout};

use super::region::Region;
use super::strip_reader::StripReader;
use super::tile_reader::TileReader;

/// Reads a pixel window of the first band, whatever the block organisation
pub struct WindowReader<'a> {
    layout: &'a RasterLayout,
    byte_order_handler: &'a dyn ByteOrderHandler,
}

impl<'a> WindowReader<'a> {
    pub fn new(layout: &'a RasterLayout, byte_order_handler: &'a dyn ByteOrderHandler) -> Self {
        WindowReader { layout, byte_order_handler }
    }

    /// Reads `region`; it must lie entirely inside the image
    pub fn read(&self, reader: &mut dyn SeekableReader, region: Region) -> TiffResult<Array2<f32>> {
        if !region.fits_within(self.layout.width, self.layout.height) {
            return Err(TiffError::GenericError(format!(
                "Region {} is outside the {}x{} image",
                region, self.layout.width, self.layout.height
            )));
        }

        match self.layout.blocks {
            BlockLayout::Strips { .. } => StripReader::new(self.layout, self.byte_order_handler).read(reader, region),
            BlockLayout::Tiles { .. } => TileReader::new(self.layout, self.byte_order_handler).read(reader, region),
        }
    }
}
