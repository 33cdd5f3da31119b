//! Handler for LZW compressed data

use weezl::{decode::Decoder, BitOrder, LzwStatus};
use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use log::debug;

/// TIFF-flavoured LZW handler
///
/// TIFF packs codes MSB first and widens them one code early; some writers
/// omit the end-of-information code, so running out of input also ends
/// the stream.
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut decoder = Decoder::with_tiff_size_switch(BitOrder::Msb, 8);
        let mut decompressed_data = Vec::with_capacity(data.len() * 2);
        let mut chunk = vec![0u8; 64 * 1024];
        let mut input = data;

        loop {
            let result = decoder.decode_bytes(input, &mut chunk);
            input = &input[result.consumed_in..];
            decompressed_data.extend_from_slice(&chunk[..result.consumed_out]);

            match result.status {
                Ok(LzwStatus::Done) => break,
                Ok(LzwStatus::NoProgress) if input.is_empty() => break,
                Ok(LzwStatus::NoProgress) => {
                    return Err(TiffError::GenericError("LZW decoder stalled".to_string()));
                }
                Ok(LzwStatus::Ok) => {}
                Err(e) => return Err(TiffError::GenericError(format!("LZW decompression error: {}", e))),
            }
        }

        debug!("LZW decompressed {} bytes to {}", data.len(), decompressed_data.len());
        Ok(decompressed_data)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u64 {
        compression::LZW
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weezl::encode::Encoder;

    #[test]
    fn decodes_tiff_lzw_stream() {
        let payload: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8 ^ (i / 97) as u8).collect();
        let compressed = Encoder::with_tiff_size_switch(BitOrder::Msb, 8)
            .encode(&payload)
            .unwrap();

        assert_eq!(LzwHandler.decompress(&compressed).unwrap(), payload);
    }

    #[test]
    fn stream_without_end_code_is_accepted() {
        // Clear code (256) then the 9-bit codes for 'a' and 'b', no EOI
        let mut bits: u32 = (256 << 18) | ((b'a' as u32) << 9) | b'b' as u32;
        bits <<= 5;
        let stream = bits.to_be_bytes();

        assert_eq!(LzwHandler.decompress(&stream).unwrap(), b"ab");
    }

    #[test]
    fn invalid_code_is_an_error() {
        assert!(LzwHandler.decompress(&[0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }
}
