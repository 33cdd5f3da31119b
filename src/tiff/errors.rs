//! Custom error types for TIFF processing

use std::fmt;
use std::io;

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported combination of SampleFormat and BitsPerSample
    UnsupportedSampleFormat { format: u16, bits: u16 },
    /// Unsupported predictor value
    UnsupportedPredictor(u64),
    /// Image dimensions not found
    MissingDimensions,
    /// No usable georeferencing tags
    MissingGeoreference,
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::UnsupportedSampleFormat { format, bits } => {
                write!(f, "Unsupported sample format {} with {} bits per sample", format, bits)
            }
            TiffError::UnsupportedPredictor(p) => write!(f, "Unsupported predictor: {}", p),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::MissingGeoreference => {
                write!(f, "No ModelTransformation or ModelPixelScale/ModelTiepoint tags found")
            }
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
