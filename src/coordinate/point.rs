//! Point types on both sides of the geotransform

/// A point in geographic (or projected) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate (longitude in geographic systems)
    pub x: f64,
    /// Y coordinate (latitude in geographic systems)
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Integer pixel position; may be negative or beyond the raster extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPosition {
    pub col: i64,
    pub row: i64,
}

impl PixelPosition {
    pub fn new(col: i64, row: i64) -> Self {
        PixelPosition { col, row }
    }
}
