//! Tile-based image data extraction
//!
//! Tiled TIFF files organize image data in rectangular tiles of equal
//! size. Edge tiles are stored padded to the full tile size.

use log::debug;
use ndarray::Array2;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::layout::{BlockLayout, RasterLayout};

use super::block_decoder::{BlockDecoder, BlockPosition};
use super::region::Region;

/// Reads windows from tiled TIFF files
pub struct TileReader<'a> {
    layout: &'a RasterLayout,
    byte_order_handler: &'a dyn ByteOrderHandler,
}

impl<'a> TileReader<'a> {
    pub fn new(layout: &'a RasterLayout, byte_order_handler: &'a dyn ByteOrderHandler) -> Self {
        TileReader { layout, byte_order_handler }
    }

    /// Tiles overlapping `region` in row-major order
    pub fn tiles_for(&self, region: Region) -> TiffResult<Vec<BlockPosition>> {
        let (tile_width, tile_height) = match self.layout.blocks {
            BlockLayout::Tiles { tile_width, tile_height } => (tile_width, tile_height),
            BlockLayout::Strips { .. } => {
                return Err(TiffError::GenericError("Image is stripped, not tiled".to_string()))
            }
        };
        let (tiles_across, _) = self.layout.block_grid();

        let start_tile_x = region.x / tile_width;
        let start_tile_y = region.y / tile_height;
        let end_tile_x = region.end_x().div_ceil(tile_width);
        let end_tile_y = region.end_y().div_ceil(tile_height);

        let mut tiles = Vec::new();
        for tile_y in start_tile_y..end_tile_y {
            for tile_x in start_tile_x..end_tile_x {
                tiles.push(BlockPosition {
                    index: (tile_y * tiles_across + tile_x) as usize,
                    start_x: tile_x * tile_width,
                    start_y: tile_y * tile_height,
                    rows: tile_height,
                });
            }
        }

        Ok(tiles)
    }

    /// Reads the first band inside `region` as a `[row, col]` array
    pub fn read(&self, reader: &mut dyn SeekableReader, region: Region) -> TiffResult<Array2<f32>> {
        let tiles = self.tiles_for(region)?;
        debug!("Processing {} tiles for region {}", tiles.len(), region);

        let decoder = BlockDecoder::new(self.layout, self.byte_order_handler, reader)?;
        let mut window = Array2::<f32>::zeros((region.height as usize, region.width as usize));
        for tile in tiles {
            decoder.copy_into(reader, tile, region, &mut window)?;
        }

        Ok(window)
    }
}
