//! TIFF file reader implementation
//!
//! Parses the header and IFD chain of TIFF/BigTIFF files and reads tag
//! values. The reader keeps only format state (byte order, BigTIFF flag);
//! the stream is always passed in, so one open file handle serves the
//! header, the tag arrays and later the raster blocks.

use log::{debug, info, warn};
use std::io::{Cursor, SeekFrom};

use byteorder::ReadBytesExt;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFDEntry, IFD};
use crate::tiff::types::TIFF;
use crate::tiff::validation;

/// Upper bound on IFDs followed in one chain
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
        }
    }

    /// Returns the byte order handler once the header has been read
    pub fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Reads the header and the whole IFD chain
    ///
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Read all IFDs (Image File Directories)
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let handler = self.handler()?;
        let version = handler.read_u16(reader)?;
        let is_big_tiff = match version {
            header::BIG_TIFF_VERSION => {
                validation::validate_bigtiff_header(reader, handler)?;
                true
            }
            header::TIFF_VERSION => false,
            _ => return Err(TiffError::UnsupportedVersion(version)),
        };
        debug!("TIFF version {} ({})", version, if is_big_tiff { "BigTIFF" } else { "classic" });

        let first_ifd_offset = if is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };
        self.is_big_tiff = is_big_tiff;

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::GenericError("No IFDs found in TIFF file".to_string()));
        }

        info!("Read {} IFDs from TIFF file", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// A broken link ends the chain with a warning; the IFDs read so far
    /// are kept.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // read_ifd leaves the stream right after the last entry
            let next_ifd_offset = match self.read_offset(reader) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };
            debug!("Next IFD offset: {}", next_ifd_offset);

            ifds.push(ifd);

            if next_ifd_offset != 0 && (next_ifd_offset >= file_size || next_ifd_offset < 8) {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads an IFD at `offset`
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} entry count: {}", number, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(reader)?);
        }

        Ok(ifd)
    }

    /// Reads an offset-sized unsigned value (4 bytes, or 8 for BigTIFF)
    fn read_offset(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u32(reader)? as u64)
        }
    }

    /// Reads a single IFD entry
    ///
    /// Inline values narrower than the value field are decoded from its
    /// start, where TIFF left-justifies them regardless of byte order.
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let field_len = if self.is_big_tiff { 8 } else { 4 };
        let mut raw_value = [0u8; 8];
        reader.read_exact(&mut raw_value[..field_len])?;

        let mut probe = IFDEntry::with_raw(tag, field_type, count, 0, raw_value);
        let mut field = Cursor::new(&raw_value[..field_len]);
        probe.value_offset = match field_type {
            field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED
                if count == 1 => raw_value[0] as u64,
            field_types::SHORT | field_types::SSHORT
                if probe.is_value_inline(self.is_big_tiff) => handler.read_u16(&mut field)? as u64,
            field_types::LONG | field_types::SLONG
                if self.is_big_tiff && probe.is_value_inline(true) => handler.read_u32(&mut field)? as u64,
            _ if self.is_big_tiff => handler.read_u64(&mut field)?,
            _ => handler.read_u32(&mut field)? as u64,
        };

        Ok(probe)
    }

    /// Positions a cursor over a tag's value bytes
    ///
    /// Inline values are served from the entry's raw bytes; others are
    /// read from the file at the entry's offset.
    fn value_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        let len = entry.get_field_type_size() as u64 * entry.count;
        if entry.is_value_inline(self.is_big_tiff) {
            return Ok(entry.raw_value[..len as usize].to_vec());
        }

        let file_size = validation::get_file_size(reader)?;
        validation::validate_block(entry.value_offset, len, file_size)?;

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let mut buffer = vec![0u8; len as usize];
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads an integer-typed tag as a vector of u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.value_bytes(reader, entry)?;
        let handler = self.handler()?;
        let mut cursor = Cursor::new(bytes);

        let mut values = Vec::with_capacity(entry.count as usize);
        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => cursor.read_u8()? as u64,
                field_types::SHORT | field_types::SSHORT => handler.read_u16(&mut cursor)? as u64,
                field_types::LONG | field_types::SLONG => handler.read_u32(&mut cursor)? as u64,
                field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => handler.read_u64(&mut cursor)?,
                _ => return Err(TiffError::UnsupportedFieldType(entry.field_type)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads a DOUBLE (or FLOAT) tag as a vector of f64
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.value_bytes(reader, entry)?;
        let handler = self.handler()?;
        let mut cursor = Cursor::new(bytes);

        let mut values = Vec::with_capacity(entry.count as usize);
        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::DOUBLE => handler.read_f64(&mut cursor)?,
                field_types::FLOAT => handler.read_f32(&mut cursor)? as f64,
                _ => return Err(TiffError::UnsupportedFieldType(entry.field_type)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads an ASCII tag, with trailing NULs removed
    pub fn read_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        if entry.field_type != field_types::ASCII {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        let mut buffer = self.value_bytes(reader, entry)?;
        while buffer.last() == Some(&0) {
            buffer.pop();
        }

        String::from_utf8(buffer)
            .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string: {}", e)))
    }
}
