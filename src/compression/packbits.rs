//! Handler for PackBits run-length data

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Apple PackBits handler
///
/// Each header byte `n` is either a literal run (`0..=127`, copy `n + 1`
/// bytes), a repeat (`-127..=-1`, repeat the next byte `1 - n` times) or a
/// no-op (`-128`).
pub struct PackBitsHandler;

impl CompressionHandler for PackBitsHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut decompressed_data = Vec::with_capacity(data.len() * 2);
        let mut pos = 0;

        while pos < data.len() {
            let header = data[pos] as i8;
            pos += 1;

            match header {
                0..=127 => {
                    let len = header as usize + 1;
                    let literal = data.get(pos..pos + len).ok_or_else(|| {
                        TiffError::GenericError(format!("PackBits literal run of {} bytes is truncated", len))
                    })?;
                    decompressed_data.extend_from_slice(literal);
                    pos += len;
                }
                -128 => {}
                _ => {
                    let value = *data.get(pos).ok_or_else(|| {
                        TiffError::GenericError("PackBits repeat run is truncated".to_string())
                    })?;
                    let len = 1 - header as isize;
                    decompressed_data.extend(std::iter::repeat(value).take(len as usize));
                    pos += 1;
                }
            }
        }

        Ok(decompressed_data)
    }

    fn name(&self) -> &'static str {
        "PackBits"
    }

    fn code(&self) -> u64 {
        compression::PACKBITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_literal_and_repeat_runs() {
        // Sample stream from the TIFF 6.0 PackBits section
        let packed = [
            0xFE, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22, 0xF7, 0xAA,
        ];
        let expected = [
            0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22,
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
        ];
        assert_eq!(PackBitsHandler.decompress(&packed).unwrap(), expected);
    }

    #[test]
    fn noop_header_is_skipped() {
        assert_eq!(PackBitsHandler.decompress(&[0x80, 0x00, 0x07]).unwrap(), vec![7]);
    }

    #[test]
    fn truncated_literal_is_an_error() {
        assert!(PackBitsHandler.decompress(&[0x03, 1, 2]).is_err());
        assert!(PackBitsHandler.decompress(&[0xFD]).is_err());
    }
}
