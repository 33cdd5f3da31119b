//! Handler for Deflate compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Zlib-wrapped Deflate handler
///
/// Serves both the Adobe code (8) and the older PKZIP code (32946); the
/// stream format is the same.
pub struct DeflateHandler {
    code: u64,
}

impl DeflateHandler {
    pub fn new(code: u64) -> Self {
        DeflateHandler { code }
    }
}

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed_data = Vec::new();
        match decoder.read_to_end(&mut decompressed_data) {
            Ok(_) => Ok(decompressed_data),
            Err(e) => Err(TiffError::IoError(e))
        }
    }

    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn code(&self) -> u64 {
        self.code
    }
}
