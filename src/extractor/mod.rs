//! Windowed sample reading from GeoTIFF rasters
//!
//! Only the strips or tiles that intersect the requested window are read
//! and decoded.

mod region;
mod block_decoder;
mod strip_reader;
mod tile_reader;
mod window_reader;
mod raster;

pub use region::Region;
pub use block_decoder::BlockPosition;
pub use strip_reader::StripReader;
pub use tile_reader::TileReader;
pub use window_reader::WindowReader;
pub use raster::GeoRaster;
