//! GeoTIFF georeferencing
//!
//! Reads the GeoKey directory and derives the six-coefficient affine
//! transform from either the ModelTransformationTag or the
//! ModelPixelScaleTag + ModelTiepointTag pair.

use log::{debug, warn};
use std::fmt;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{geo_keys, raster_type, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// A single GeoKey entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    /// 0 when the value is stored in `value_offset`, otherwise the tag
    /// holding it
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

impl GeoKeyEntry {
    /// Short value of a key stored inline in the directory
    pub fn inline_value(&self) -> Option<u16> {
        (self.tiff_tag_location == 0).then_some(self.value_offset)
    }
}

/// Name of the GeoKeys this crate interprets
pub fn get_key_name(key_id: u16) -> &'static str {
    match key_id {
        geo_keys::MODEL_TYPE => "GTModelType",
        geo_keys::RASTER_TYPE => "GTRasterType",
        geo_keys::GEOGRAPHIC_TYPE => "GeographicType",
        geo_keys::PROJECTED_CS_TYPE => "ProjectedCSType",
        _ => "Unknown",
    }
}

/// Georeferencing of one image
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    /// Affine coefficients in GDAL order
    /// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`
    pub transform: [f64; 6],
    /// Whether the tie point refers to pixel centres (PixelIsPoint)
    pub pixel_is_point: bool,
    /// EPSG code of the geographic or projected CRS, when declared
    pub epsg_code: Option<u32>,
}

impl fmt::Display for GeoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform {:?}", self.transform)?;
        if let Some(code) = self.epsg_code {
            write!(f, ", EPSG:{}", code)?;
        }
        if self.pixel_is_point {
            write!(f, ", PixelIsPoint")?;
        }
        Ok(())
    }
}

/// Parser for GeoTIFF geographic metadata
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parse the GeoKey directory from an IFD
    ///
    /// The directory is a SHORT array: a four-value header (version,
    /// revision, minor revision, key count) followed by four values per key.
    /// An IFD without the tag yields no keys.
    pub fn parse_geo_key_directory(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> TiffResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new());
        }

        let values = tiff_reader.read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
        if values.len() < 4 {
            return Err(TiffError::GenericError("Invalid GeoKey directory header".to_string()));
        }

        let num_keys = values[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               values[0], values[1], values[2], num_keys);

        let available = (values.len() - 4) / 4;
        if available < num_keys {
            warn!("GeoKey directory declares {} keys but holds {}", num_keys, available);
        }

        let geo_keys = values[4..]
            .chunks_exact(4)
            .take(num_keys)
            .map(|key| GeoKeyEntry {
                key_id: key[0] as u16,
                tiff_tag_location: key[1] as u16,
                count: key[2] as u16,
                value_offset: key[3] as u16,
            })
            .inspect(|key| debug!("GeoKey: id={} ({}), location={}, count={}, value={}",
                                  key.key_id, get_key_name(key.key_id), key.tiff_tag_location,
                                  key.count, key.value_offset))
            .collect();

        Ok(geo_keys)
    }

    /// Extract the georeferencing of an IFD
    ///
    /// ModelTransformationTag takes precedence over the pixel scale and tie
    /// point pair. A PixelIsPoint raster has its origin moved half a pixel
    /// up and left so that the transform addresses pixel corners.
    pub fn extract_geo_info(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> TiffResult<GeoInfo> {
        let keys = Self::parse_geo_key_directory(tiff_reader, reader, ifd)?;
        let key_value = |id: u16| keys.iter().find(|k| k.key_id == id).and_then(GeoKeyEntry::inline_value);

        let pixel_is_point = key_value(geo_keys::RASTER_TYPE) == Some(raster_type::PIXEL_IS_POINT);
        let epsg_code = key_value(geo_keys::PROJECTED_CS_TYPE)
            .or_else(|| key_value(geo_keys::GEOGRAPHIC_TYPE))
            .filter(|&code| code != 0 && code != 32767)
            .map(u32::from);

        let mut transform = if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
            let matrix = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
            Self::transform_from_matrix(&matrix)?
        } else if ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) && ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
            let scale = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
            let tiepoints = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;
            Self::transform_from_tiepoint(&scale, &tiepoints)?
        } else {
            return Err(TiffError::MissingGeoreference);
        };

        if pixel_is_point {
            transform[0] -= 0.5 * transform[1] + 0.5 * transform[2];
            transform[3] -= 0.5 * transform[4] + 0.5 * transform[5];
        }

        let geo_info = GeoInfo { transform, pixel_is_point, epsg_code };
        debug!("Georeferencing: {}", geo_info);
        Ok(geo_info)
    }

    /// Coefficients from a row-major 4x4 model transformation matrix
    pub fn transform_from_matrix(matrix: &[f64]) -> TiffResult<[f64; 6]> {
        if matrix.len() < 16 {
            return Err(TiffError::GenericError(format!(
                "ModelTransformationTag needs 16 values, found {}", matrix.len()
            )));
        }
        Ok([matrix[3], matrix[0], matrix[1], matrix[7], matrix[4], matrix[5]])
    }

    /// Coefficients from the first tie point and the pixel scale
    ///
    /// Tie point `(i, j, k, x, y, z)` places raster position `(i, j)` at
    /// `(x, y)`; the Y scale is positive for north-up rasters.
    pub fn transform_from_tiepoint(scale: &[f64], tiepoints: &[f64]) -> TiffResult<[f64; 6]> {
        if scale.len() < 2 {
            return Err(TiffError::GenericError(format!(
                "ModelPixelScaleTag needs at least 2 values, found {}", scale.len()
            )));
        }
        if tiepoints.len() < 6 {
            return Err(TiffError::GenericError(format!(
                "ModelTiepointTag needs at least 6 values, found {}", tiepoints.len()
            )));
        }
        if tiepoints.len() > 6 {
            warn!("Using the first of {} tie points", tiepoints.len() / 6);
        }

        let (scale_x, scale_y) = (scale[0], scale[1]);
        let (i, j, x, y) = (tiepoints[0], tiepoints[1], tiepoints[3], tiepoints[4]);
        Ok([x - i * scale_x, scale_x, 0.0, y + j * scale_y, 0.0, -scale_y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiepoint_at_origin_gives_north_up_transform() {
        let transform = GeoKeyParser::transform_from_tiepoint(
            &[0.01, 0.01, 0.0],
            &[0.0, 0.0, 0.0, -78.0, 40.0, 0.0],
        ).unwrap();
        assert_eq!(transform, [-78.0, 0.01, 0.0, 40.0, 0.0, -0.01]);
    }

    #[test]
    fn tiepoint_away_from_origin_is_moved_back() {
        let transform = GeoKeyParser::transform_from_tiepoint(
            &[2.0, 3.0],
            &[10.0, 20.0, 0.0, 100.0, 500.0, 0.0],
        ).unwrap();
        assert_eq!(transform, [80.0, 2.0, 0.0, 560.0, 0.0, -3.0]);
    }

    #[test]
    fn matrix_coefficients_are_reordered() {
        let matrix = [
            30.0, 1.0, 0.0, 500.0,
            2.0, -30.0, 0.0, 900.0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let transform = GeoKeyParser::transform_from_matrix(&matrix).unwrap();
        assert_eq!(transform, [500.0, 30.0, 1.0, 900.0, 2.0, -30.0]);
    }

    #[test]
    fn short_tag_arrays_are_rejected() {
        assert!(GeoKeyParser::transform_from_matrix(&[1.0; 6]).is_err());
        assert!(GeoKeyParser::transform_from_tiepoint(&[1.0], &[0.0; 6]).is_err());
        assert!(GeoKeyParser::transform_from_tiepoint(&[1.0, 1.0], &[0.0; 3]).is_err());
    }
}
