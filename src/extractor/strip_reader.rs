//! Strip-based image data extraction
//!
//! Stripped TIFFs organize image data in horizontal strips spanning the
//! full image width. Only the strips overlapping the region's rows are read.

use log::debug;
use ndarray::Array2;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::layout::{BlockLayout, RasterLayout};

use super::block_decoder::{BlockDecoder, BlockPosition};
use super::region::Region;

/// Reads windows from stripped TIFF files
pub struct StripReader<'a> {
    layout: &'a RasterLayout,
    byte_order_handler: &'a dyn ByteOrderHandler,
}

impl<'a> StripReader<'a> {
    pub fn new(layout: &'a RasterLayout, byte_order_handler: &'a dyn ByteOrderHandler) -> Self {
        StripReader { layout, byte_order_handler }
    }

    fn rows_per_strip(&self) -> TiffResult<u32> {
        match self.layout.blocks {
            BlockLayout::Strips { rows_per_strip } => Ok(rows_per_strip),
            BlockLayout::Tiles { .. } => Err(TiffError::GenericError("Image is tiled, not stripped".to_string())),
        }
    }

    /// Strips overlapping the rows of `region`, top to bottom
    pub fn strips_for(&self, region: Region) -> TiffResult<Vec<BlockPosition>> {
        let rows_per_strip = self.rows_per_strip()?;
        let start_strip = region.y / rows_per_strip;
        let end_strip = region.end_y().div_ceil(rows_per_strip);

        Ok((start_strip..end_strip)
            .map(|strip| {
                let start_y = strip * rows_per_strip;
                BlockPosition {
                    index: strip as usize,
                    start_x: 0,
                    start_y,
                    rows: rows_per_strip.min(self.layout.height - start_y),
                }
            })
            .collect())
    }

    /// Reads the first band inside `region` as a `[row, col]` array
    pub fn read(&self, reader: &mut dyn SeekableReader, region: Region) -> TiffResult<Array2<f32>> {
        let strips = self.strips_for(region)?;
        if let (Some(first), Some(last)) = (strips.first(), strips.last()) {
            debug!("Processing strips {} to {} for region {}", first.index, last.index, region);
        }

        let decoder = BlockDecoder::new(self.layout, self.byte_order_handler, reader)?;
        let mut window = Array2::<f32>::zeros((region.height as usize, region.width as usize));
        for strip in strips {
            decoder.copy_into(reader, strip, region, &mut window)?;
        }

        Ok(window)
    }
}
