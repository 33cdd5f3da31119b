//! Errors raised by the extraction pipeline

use std::fmt;
use std::io;

use ndarray_npy::WriteNpyError;

use crate::tiff::errors::TiffError;

/// Pipeline error types
///
/// Every variant aborts the run when it reaches the day driver. The
/// recoverable per-day conditions (missing input, no valid pixels) are
/// reported as `DayOutcome` values instead.
#[derive(Debug)]
pub enum PatchError {
    /// Failure while parsing or decoding the raster file
    Tiff(TiffError),
    /// I/O error outside TIFF parsing (output directory, array files)
    Io(io::Error),
    /// Failure while writing a `.npy` array
    Npy(WriteNpyError),
    /// Affine transform that cannot be inverted or contains non-finite values
    InvalidGeoTransform(String),
    /// Bounding box maps to a window with non-positive width or height
    DegenerateWindow { width: i64, height: i64 },
    /// Window does not lie inside the raster
    WindowOutOfBounds {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        raster_width: u32,
        raster_height: u32,
    },
    /// Configuration rejected during validation or parsing
    InvalidConfig(String),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::Tiff(e) => write!(f, "{}", e),
            PatchError::Io(e) => write!(f, "I/O error: {}", e),
            PatchError::Npy(e) => write!(f, "Failed to write array: {}", e),
            PatchError::InvalidGeoTransform(msg) => write!(f, "Invalid geotransform: {}", msg),
            PatchError::DegenerateWindow { width, height } => write!(
                f,
                "Bounding box maps to a degenerate pixel window ({}x{}); check west < east and south < north",
                width, height
            ),
            PatchError::WindowOutOfBounds { x, y, width, height, raster_width, raster_height } => write!(
                f,
                "Pixel window x={} y={} {}x{} lies outside the {}x{} raster",
                x, y, width, height, raster_width, raster_height
            ),
            PatchError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::Tiff(e) => Some(e),
            PatchError::Io(e) => Some(e),
            PatchError::Npy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TiffError> for PatchError {
    fn from(error: TiffError) -> Self {
        PatchError::Tiff(error)
    }
}

impl From<io::Error> for PatchError {
    fn from(error: io::Error) -> Self {
        PatchError::Io(error)
    }
}

impl From<WriteNpyError> for PatchError {
    fn from(error: WriteNpyError) -> Self {
        PatchError::Npy(error)
    }
}

/// Result type for pipeline operations
pub type PatchResult<T> = Result<T, PatchError>;
