//! Byte order handling for TIFF files
//!
//! TIFF files declare their byte order in the first two header bytes.
//! Everything read afterwards (header fields, IFD entries, tag arrays and
//! the raster samples themselves) goes through a `ByteOrderHandler`
//! selected from that marker.

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::layout::SampleType;

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let marker = reader.read_u16::<LittleEndian>()?;
        match marker {
            0x4949 => Ok(ByteOrder::LittleEndian), // "II"
            0x4D4D => Ok(ByteOrder::BigEndian),    // "MM"
            _ => Err(TiffError::InvalidByteOrder(marker)),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler {
    /// Which byte order this handler implements
    fn byte_order(&self) -> ByteOrder;

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// Decode one raw sample into an `f32`
    ///
    /// `bytes` must hold at least `sample.bytes()` bytes.
    fn decode_sample(&self, bytes: &[u8], sample: SampleType) -> f32;

    /// Undo horizontal differencing (TIFF predictor 2) on one row
    ///
    /// Differences are accumulated per sample in the sample's own integer
    /// width, wrapping on overflow.
    fn undo_horizontal_differencing(&self, row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize);

    /// Undo the floating point predictor (TIFF predictor 3) on one row
    ///
    /// The row is left in this handler's byte order so `decode_sample`
    /// can be applied afterwards.
    fn undo_floating_point_predictor(&self, row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize);
}

fn decode<E: Endian>(bytes: &[u8], sample: SampleType) -> f32 {
    match sample {
        SampleType::U8 => bytes[0] as f32,
        SampleType::I8 => bytes[0] as i8 as f32,
        SampleType::U16 => E::read_u16(bytes) as f32,
        SampleType::I16 => E::read_i16(bytes) as f32,
        SampleType::U32 => E::read_u32(bytes) as f32,
        SampleType::I32 => E::read_i32(bytes) as f32,
        SampleType::F32 => E::read_f32(bytes),
        SampleType::F64 => E::read_f64(bytes) as f32,
    }
}

fn undo_differencing<E: Endian>(row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize) {
    let stride = bytes_per_sample * samples_per_pixel;
    let mut pos = stride;
    while pos + bytes_per_sample <= row.len() {
        let prev = pos - stride;
        match bytes_per_sample {
            1 => row[pos] = row[pos].wrapping_add(row[prev]),
            2 => {
                let value = E::read_u16(&row[pos..]).wrapping_add(E::read_u16(&row[prev..]));
                E::write_u16(&mut row[pos..], value);
            }
            4 => {
                let value = E::read_u32(&row[pos..]).wrapping_add(E::read_u32(&row[prev..]));
                E::write_u32(&mut row[pos..], value);
            }
            8 => {
                let value = E::read_u64(&row[pos..]).wrapping_add(E::read_u64(&row[prev..]));
                E::write_u64(&mut row[pos..], value);
            }
            _ => return,
        }
        pos += bytes_per_sample;
    }
}

/// Byte-plane accumulation followed by reassembly into samples.
///
/// The encoder stores the most significant byte plane first, independent of
/// the file's byte order. `most_significant_last` selects little-endian
/// reassembly.
fn undo_floating_point(row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize, most_significant_last: bool) {
    for i in samples_per_pixel..row.len() {
        row[i] = row[i].wrapping_add(row[i - samples_per_pixel]);
    }

    let count = row.len() / bytes_per_sample;
    let planes = row.to_vec();
    for sample in 0..count {
        for byte in 0..bytes_per_sample {
            let plane = if most_significant_last { bytes_per_sample - byte - 1 } else { byte };
            row[sample * bytes_per_sample + byte] = planes[plane * count + sample];
        }
    }
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::LittleEndian
    }

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<LittleEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }

    fn decode_sample(&self, bytes: &[u8], sample: SampleType) -> f32 {
        decode::<LittleEndian>(bytes, sample)
    }

    fn undo_horizontal_differencing(&self, row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize) {
        undo_differencing::<LittleEndian>(row, bytes_per_sample, samples_per_pixel)
    }

    fn undo_floating_point_predictor(&self, row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize) {
        undo_floating_point(row, bytes_per_sample, samples_per_pixel, true)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<BigEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }

    fn decode_sample(&self, bytes: &[u8], sample: SampleType) -> f32 {
        decode::<BigEndian>(bytes, sample)
    }

    fn undo_horizontal_differencing(&self, row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize) {
        undo_differencing::<BigEndian>(row, bytes_per_sample, samples_per_pixel)
    }

    fn undo_floating_point_predictor(&self, row: &mut [u8], bytes_per_sample: usize, samples_per_pixel: usize) {
        undo_floating_point(row, bytes_per_sample, samples_per_pixel, false)
    }
}
