//! Geographic coordinates and their mapping onto raster pixels

mod bbox;
mod point;
mod transform;

pub use self::bbox::{clip_window, BoundingBox};
pub use self::point::{PixelPosition, Point};
pub use self::transform::GeoTransform;
