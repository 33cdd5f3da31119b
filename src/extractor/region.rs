//! Pixel window of a raster read
//!
//! A Region specifies the rectangular area of an image that is decoded. The coordinates are in pixels and
//! follow the typical image coordinate system where (0,0) is the top-left
//! corner of the image.

use std::fmt;

/// Region for image extraction (in pixel coordinates)
///
/// Represents a rectangular area defined by its top-left corner coordinates
/// and dimensions. Only the strips or tiles intersecting it are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// X-coordinate of the top-left corner (pixels from left)
    pub x: u32,

    /// Y-coordinate of the top-left corner (pixels from top)
    pub y: u32,

    /// Width of the region in pixels
    pub width: u32,

    /// Height of the region in pixels
    pub height: u32,
}

impl Region {
    /// Create a new region
    ///
    /// # Arguments
    /// * `x` - X-coordinate of the top-left corner
    /// * `y` - Y-coordinate of the top-left corner
    /// * `width` - Width of the region in pixels
    /// * `height` - Height of the region in pixels
    ///
    /// # Returns
    /// A new Region instance with the specified coordinates and dimensions
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region { x, y, width, height }
    }

    /// Get the rightmost X coordinate (exclusive)
    ///
    /// Returns the X-coordinate immediately to the right of the region.
    /// This is useful for boundary checks in extraction loops.
    ///
    /// # Returns
    /// The X-coordinate immediately after the rightmost pixel in the region
    pub fn end_x(&self) -> u32 {
        self.x + self.width
    }

    /// Get the bottommost Y coordinate (exclusive)
    ///
    /// Returns the Y-coordinate immediately below the region.
    /// This is useful for boundary checks in extraction loops.
    ///
    /// # Returns
    /// The Y-coordinate immediately after the bottommost pixel in the region
    pub fn end_y(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the region lies entirely inside an image of the given size
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= image_width as u64
            && self.y as u64 + self.height as u64 <= image_height as u64
    }

    /// Number of pixels in the region
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} y={} {}x{}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_within_checks_exclusive_end() {
        let region = Region::new(10, 20, 30, 40);
        assert_eq!((region.end_x(), region.end_y()), (40, 60));
        assert!(region.fits_within(40, 60));
        assert!(!region.fits_within(39, 60));
        assert!(!Region::new(0, 0, 0, 5).fits_within(10, 10));
    }
}
