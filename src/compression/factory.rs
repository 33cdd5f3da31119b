//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::DeflateHandler;
use super::zstd::ZstdHandler;
use super::lzw::LzwHandler;
use super::packbits::PackBitsHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        match code {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE | compression::DEFLATE_OLD => Ok(Box::new(DeflateHandler::new(code))),
            compression::ZSTD | compression::ZSTD_GDAL => Ok(Box::new(ZstdHandler::new(code))),
            compression::LZW => Ok(Box::new(LzwHandler)),
            compression::PACKBITS => Ok(Box::new(PackBitsHandler)),
            _ => Err(TiffError::UnsupportedCompression(code))
        }
    }
}
