//! Affine mapping between pixel indices and map coordinates

use std::fmt;

use super::point::{PixelPosition, Point};
use crate::errors::{PatchError, PatchResult};
use crate::tiff::geo_key_parser::GeoInfo;

/// Affine geotransform in GDAL coefficient order
///
/// ```text
/// x = origin_x + col * pixel_width  + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// `(col, row)` are fractional pixel coordinates measured from the top-left
/// corner of the top-left pixel, so pixel `(c, r)` covers `[c, c+1) x [r, r+1)`.
/// For north-up rasters `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Builds a transform from the six GDAL coefficients, rejecting
    /// non-finite or non-invertible ones
    pub fn from_gdal(coefficients: [f64; 6]) -> PatchResult<Self> {
        let transform = GeoTransform {
            origin_x: coefficients[0],
            pixel_width: coefficients[1],
            row_rotation: coefficients[2],
            origin_y: coefficients[3],
            col_rotation: coefficients[4],
            pixel_height: coefficients[5],
        };
        transform.validate()?;
        Ok(transform)
    }

    /// Transform read from a GeoTIFF's model tags
    pub fn from_geotiff(geo_info: &GeoInfo) -> PatchResult<Self> {
        Self::from_gdal(geo_info.transform)
    }

    /// North-up transform without rotation
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> PatchResult<Self> {
        Self::from_gdal([origin_x, pixel_width, 0.0, origin_y, 0.0, -pixel_height.abs()])
    }

    /// The six coefficients in GDAL order
    pub fn to_gdal(&self) -> [f64; 6] {
        [self.origin_x, self.pixel_width, self.row_rotation,
         self.origin_y, self.col_rotation, self.pixel_height]
    }

    fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    fn validate(&self) -> PatchResult<()> {
        if self.to_gdal().iter().any(|c| !c.is_finite()) {
            return Err(PatchError::InvalidGeoTransform(format!("non-finite coefficients {:?}", self.to_gdal())));
        }
        if self.determinant() == 0.0 {
            return Err(PatchError::InvalidGeoTransform(format!("singular matrix {:?}", self.to_gdal())));
        }
        Ok(())
    }

    /// Map coordinates of fractional pixel position `(col, row)`
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> Point {
        Point::new(
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Fractional pixel position of a map coordinate (exact inverse of `pixel_to_geo`)
    pub fn geo_to_fractional_pixel(&self, point: Point) -> (f64, f64) {
        let det = self.determinant();
        let dx = point.x - self.origin_x;
        let dy = point.y - self.origin_y;
        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (self.pixel_width * dy - self.col_rotation * dx) / det;
        (col, row)
    }

    /// Pixel containing a map coordinate
    ///
    /// Fractional positions are floored, so a point on a pixel's top-left
    /// edge belongs to that pixel.
    pub fn geo_to_pixel(&self, point: Point) -> PixelPosition {
        let (col, row) = self.geo_to_fractional_pixel(point);
        PixelPosition::new(col.floor() as i64, row.floor() as i64)
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}, {}, {}]",
               self.origin_x, self.pixel_width, self.row_rotation,
               self.origin_y, self.col_rotation, self.pixel_height)
    }
}
