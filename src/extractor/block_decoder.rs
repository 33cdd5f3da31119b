//! Decoding of a single strip or tile
//!
//! Shared by the strip and tile readers: fetches the stored bytes of one
//! block, decompresses them, undoes the predictor row by row and copies the
//! first band's samples that fall inside the requested region.

use log::{debug, trace};
use ndarray::Array2;
use std::io::SeekFrom;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::layout::RasterLayout;
use crate::tiff::validation;

use super::region::Region;

/// Position and size of one block in image pixels
#[derive(Debug, Clone, Copy)]
pub struct BlockPosition {
    /// Index into the layout's offset and byte count arrays
    pub index: usize,
    pub start_x: u32,
    pub start_y: u32,
    /// Rows actually stored in this block (the last strip may be short)
    pub rows: u32,
}

/// Decodes blocks of one image into a window array
pub struct BlockDecoder<'a> {
    layout: &'a RasterLayout,
    byte_order_handler: &'a dyn ByteOrderHandler,
    compression_handler: Box<dyn CompressionHandler>,
    file_size: u64,
}

impl<'a> BlockDecoder<'a> {
    pub fn new(
        layout: &'a RasterLayout,
        byte_order_handler: &'a dyn ByteOrderHandler,
        reader: &mut dyn SeekableReader,
    ) -> TiffResult<Self> {
        let compression_handler = CompressionFactory::create_handler(layout.compression)?;
        debug!("Using compression: {}", compression_handler.name());

        Ok(BlockDecoder {
            layout,
            byte_order_handler,
            compression_handler,
            file_size: validation::get_file_size(reader)?,
        })
    }

    /// Reads, decompresses and un-predicts one block
    fn decode(&self, reader: &mut dyn SeekableReader, block: BlockPosition) -> TiffResult<Option<Vec<u8>>> {
        let offset = self.layout.block_offsets[block.index];
        let byte_count = self.layout.block_byte_counts[block.index];

        // GDAL leaves blocks without data unwritten in sparse files
        if offset == 0 && byte_count == 0 {
            debug!("Block {} is sparse", block.index);
            return Ok(None);
        }

        validation::validate_block(offset, byte_count, self.file_size)?;
        reader.seek(SeekFrom::Start(offset))?;
        let mut stored = vec![0u8; byte_count as usize];
        reader.read_exact(&mut stored)?;

        let mut data = self.compression_handler.decompress(&stored)?;

        let row_bytes = self.layout.block_row_bytes();
        let expected = row_bytes * block.rows as usize;
        if data.len() < expected {
            return Err(TiffError::GenericError(format!(
                "Block {} decoded to {} bytes, expected {}",
                block.index, data.len(), expected
            )));
        }
        data.truncate(expected);

        let bytes_per_sample = self.layout.sample_type.bytes();
        let samples_per_pixel = self.layout.block_samples_per_pixel();
        match self.layout.predictor {
            predictor::HORIZONTAL_DIFFERENCING => {
                for row in data.chunks_exact_mut(row_bytes) {
                    self.byte_order_handler.undo_horizontal_differencing(row, bytes_per_sample, samples_per_pixel);
                }
            }
            predictor::FLOATING_POINT => {
                for row in data.chunks_exact_mut(row_bytes) {
                    self.byte_order_handler.undo_floating_point_predictor(row, bytes_per_sample, samples_per_pixel);
                }
            }
            _ => {}
        }

        trace!("Block {} decoded: {} -> {} bytes", block.index, byte_count, data.len());
        Ok(Some(data))
    }

    /// Decodes `block` and copies its overlap with `region` into `window`
    ///
    /// `window` is indexed `[row, col]` relative to the region's top-left
    /// corner. Sparse blocks are filled with zero.
    pub fn copy_into(
        &self,
        reader: &mut dyn SeekableReader,
        block: BlockPosition,
        region: Region,
        window: &mut Array2<f32>,
    ) -> TiffResult<()> {
        let data = self.decode(reader, block)?;

        let (block_width, _) = self.layout.block_dimensions();
        let row_bytes = self.layout.block_row_bytes();
        let bytes_per_sample = self.layout.sample_type.bytes();
        let pixel_stride = bytes_per_sample * self.layout.block_samples_per_pixel();

        let y_start = block.start_y.max(region.y);
        let y_end = (block.start_y + block.rows).min(region.end_y());
        let x_start = block.start_x.max(region.x);
        let x_end = (block.start_x + block_width).min(region.end_x()).min(self.layout.width);

        for y in y_start..y_end {
            let row_offset = (y - block.start_y) as usize * row_bytes;
            for x in x_start..x_end {
                let value = match &data {
                    Some(bytes) => {
                        let at = row_offset + (x - block.start_x) as usize * pixel_stride;
                        self.byte_order_handler.decode_sample(&bytes[at..at + bytes_per_sample], self.layout.sample_type)
                    }
                    None => 0.0,
                };
                window[[(y - region.y) as usize, (x - region.x) as usize]] = value;
            }
        }

        Ok(())
    }
}
