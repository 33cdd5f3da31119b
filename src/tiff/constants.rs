//! TIFF format constants
//!
//! Tag numbers and code values used by the parser and the raster readers.

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// BigTIFF version number (43)
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// BigTIFF offset size (8 bytes)
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
    pub const LONG8: u16 = 16;     // BigTIFF 64-bit unsigned integer
    pub const SLONG8: u16 = 17;    // BigTIFF 64-bit signed integer
    pub const IFD8: u16 = 18;      // BigTIFF 64-bit IFD offset
}

/// Standard TIFF tags
pub mod tags {
    pub const NEW_SUBFILE_TYPE: u16 = 254;
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    pub const PLANAR_CONFIGURATION: u16 = 284;
    pub const PREDICTOR: u16 = 317;
    pub const TILE_WIDTH: u16 = 322;
    pub const TILE_LENGTH: u16 = 323;
    pub const TILE_OFFSETS: u16 = 324;
    pub const TILE_BYTE_COUNTS: u16 = 325;
    pub const SAMPLE_FORMAT: u16 = 339;

    // GeoTIFF tags
    pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;   // Pixel size in map units
    pub const MODEL_TIEPOINT_TAG: u16 = 33922;      // Links raster to world coordinates
    pub const MODEL_TRANSFORMATION_TAG: u16 = 34264; // 4x4 transformation matrix
    pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;   // GeoTIFF keys structure

    // GDAL specific tags
    pub const GDAL_NODATA: u16 = 42113;             // NoData marker value (ASCII)
}

/// Compression types
pub mod compression {
    pub const NONE: u64 = 1;
    pub const LZW: u64 = 5;
    pub const DEFLATE: u64 = 8;
    pub const ZSTD: u64 = 14;
    pub const ZSTD_GDAL: u64 = 50000;
    pub const PACKBITS: u64 = 32773;
    pub const DEFLATE_OLD: u64 = 32946;
}

/// Planar configuration values
pub mod planar_config {
    pub const CHUNKY: u64 = 1;            // Components stored interleaved (RGBRGBRGB)
    pub const PLANAR: u64 = 2;            // Components stored separately (RRR...GGG...BBB)
}

/// Sample format values
pub mod sample_format {
    pub const UNSIGNED: u16 = 1;
    pub const SIGNED: u16 = 2;
    pub const IEEEFP: u16 = 3;
}

/// Predictor values
pub mod predictor {
    pub const NONE: u64 = 1;
    pub const HORIZONTAL_DIFFERENCING: u64 = 2;
    pub const FLOATING_POINT: u64 = 3;
}

/// GeoKey identifiers read from the GeoKeyDirectoryTag
pub mod geo_keys {
    pub const MODEL_TYPE: u16 = 1024;
    pub const RASTER_TYPE: u16 = 1025;
    pub const GEOGRAPHIC_TYPE: u16 = 2048;
    pub const PROJECTED_CS_TYPE: u16 = 3072;
}

/// GTRasterTypeGeoKey values
pub mod raster_type {
    pub const PIXEL_IS_POINT: u16 = 2;
}

/// Human-readable name of a compression code
pub fn compression_name(code: u64) -> &'static str {
    match code {
        compression::NONE => "None",
        compression::LZW => "LZW",
        compression::DEFLATE | compression::DEFLATE_OLD => "Deflate",
        compression::ZSTD | compression::ZSTD_GDAL => "ZSTD",
        compression::PACKBITS => "PackBits",
        _ => "Unknown",
    }
}
