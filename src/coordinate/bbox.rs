//! Geographic bounding box and its pixel window

use std::fmt;

use super::point::Point;
use super::transform::GeoTransform;
use crate::errors::{PatchError, PatchResult};
use crate::extractor::Region;

/// A bounding box in the raster's geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge (minimum longitude)
    pub west: f64,
    /// Eastern edge (maximum longitude)
    pub east: f64,
    /// Southern edge (minimum latitude)
    pub south: f64,
    /// Northern edge (maximum latitude)
    pub north: f64,
}

impl Default for BoundingBox {
    /// Washington, DC metro area
    fn default() -> Self {
        BoundingBox::new(-77.12, -76.90, 38.80, 39.00)
    }
}

impl BoundingBox {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        BoundingBox { west, east, south, north }
    }

    /// Parse a bounding box from "west,east,south,north"
    pub fn from_string(bbox_str: &str) -> PatchResult<Self> {
        let parts: Vec<&str> = bbox_str.split(',').collect();
        if parts.len() != 4 {
            return Err(PatchError::InvalidConfig(
                "Bounding box must have 4 comma-separated values (west,east,south,north)".to_string(),
            ));
        }

        let mut values = [0.0f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.trim().parse::<f64>()
                .map_err(|_| PatchError::InvalidConfig(format!("Invalid bounding box value '{}'", part.trim())))?;
        }

        let bbox = BoundingBox::new(values[0], values[1], values[2], values[3]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Rejects non-finite edges and inverted boxes
    pub fn validate(&self) -> PatchResult<()> {
        let edges = [self.west, self.east, self.south, self.north];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(PatchError::InvalidConfig(format!("Bounding box {} has non-finite edges", self)));
        }
        if self.west >= self.east {
            return Err(PatchError::InvalidConfig(format!("Bounding box {} has west >= east", self)));
        }
        if self.south >= self.north {
            return Err(PatchError::InvalidConfig(format!("Bounding box {} has south >= north", self)));
        }
        Ok(())
    }

    pub fn north_west(&self) -> Point {
        Point::new(self.west, self.north)
    }

    pub fn south_east(&self) -> Point {
        Point::new(self.east, self.south)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[W {}, E {}, S {}, N {}]", self.west, self.east, self.south, self.north)
    }
}

/// Pixel window covered by `bbox` on a raster of the given size
///
/// The north-west corner gives the window's first column and row, the
/// south-east corner its exclusive end. Image rows grow southwards, so the
/// north edge maps to the minimum row. A window with non-positive width or
/// height is rejected, as is one that does not lie entirely inside the raster.
pub fn clip_window(transform: &GeoTransform, bbox: &BoundingBox, raster_width: u32, raster_height: u32) -> PatchResult<Region> {
    let north_west = transform.geo_to_pixel(bbox.north_west());
    let south_east = transform.geo_to_pixel(bbox.south_east());
    let (x_min, y_min) = (north_west.col, north_west.row);
    let (x_max, y_max) = (south_east.col, south_east.row);

    let width = x_max - x_min;
    let height = y_max - y_min;
    if width <= 0 || height <= 0 {
        return Err(PatchError::DegenerateWindow { width, height });
    }

    let fits = x_min >= 0
        && y_min >= 0
        && x_max <= raster_width as i64
        && y_max <= raster_height as i64;
    if !fits {
        return Err(PatchError::WindowOutOfBounds {
            x: x_min,
            y: y_min,
            width,
            height,
            raster_width,
            raster_height,
        });
    }

    Ok(Region::new(x_min as u32, y_min as u32, width as u32, height as u32))
}
