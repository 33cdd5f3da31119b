//! Sanity checks applied while walking a TIFF file

use log::{debug, error, warn};
use std::io::SeekFrom;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Validates an IFD offset to ensure it's within reasonable bounds
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < 8 {
        return Err(TiffError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }

    Ok(())
}

/// Gets the stream length, restoring the current position
///
/// Returns `u64::MAX` when the length cannot be determined.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Validates the rest of a BigTIFF header after the version number
///
/// BigTIFF stores an offset byte size (always 8) and a reserved zero.
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let zeros = byte_order_handler.read_u16(reader)?;

    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, zeros);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(TiffError::InvalidBigTIFFHeader);
    }

    Ok(())
}

/// Checks that a data block lies entirely inside the file
pub fn validate_block(offset: u64, byte_count: u64, file_size: u64) -> TiffResult<()> {
    match offset.checked_add(byte_count) {
        Some(end) if end <= file_size => Ok(()),
        _ => Err(TiffError::GenericError(format!(
            "Data block at offset {} with {} bytes exceeds file size {}",
            offset, byte_count, file_size
        ))),
    }
}
