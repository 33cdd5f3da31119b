//! Tests for the byte order module

extern crate std;

use std::io::Cursor;
use byteorder::{LittleEndian, BigEndian, WriteBytesExt};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler, LittleEndianHandler, BigEndianHandler};
use crate::tiff::layout::SampleType;

#[test]
fn test_byte_order_detection_little_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_ok());
    std::assert_eq!(result.unwrap(), ByteOrder::LittleEndian);
}

#[test]
fn test_byte_order_detection_big_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x4D4D).unwrap(); // MM
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_ok());
    std::assert_eq!(result.unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap(); // Invalid
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_err());
}

#[test]
fn test_little_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u32::<LittleEndian>(0x12345678).unwrap();
    buffer.write_u64::<LittleEndian>(0x1234567890ABCDEF).unwrap();
    buffer.write_f64::<LittleEndian>(-77.12).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
    std::assert_eq!(handler.read_f64(&mut cursor).unwrap(), -77.12);
}

#[test]
fn test_big_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_u64::<BigEndian>(0x1234567890ABCDEF).unwrap();
    buffer.write_f32::<BigEndian>(305.5).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
    std::assert_eq!(handler.read_f32(&mut cursor).unwrap(), 305.5);
}

#[test]
fn test_decode_sample_types() {
    let le = LittleEndianHandler;
    let be = BigEndianHandler;

    std::assert_eq!(le.decode_sample(&[0xFF], SampleType::U8), 255.0);
    std::assert_eq!(le.decode_sample(&[0xFF], SampleType::I8), -1.0);
    std::assert_eq!(le.decode_sample(&[0x34, 0x12], SampleType::U16), 4660.0);
    std::assert_eq!(be.decode_sample(&[0x12, 0x34], SampleType::U16), 4660.0);
    std::assert_eq!(be.decode_sample(&[0xFF, 0xFE], SampleType::I16), -2.0);
    std::assert_eq!(le.decode_sample(&310.5f32.to_le_bytes(), SampleType::F32), 310.5);
    std::assert_eq!(be.decode_sample(&310.5f64.to_be_bytes(), SampleType::F64), 310.5);
}

#[test]
fn test_undo_horizontal_differencing_u16() {
    // Values 1000, 1010, 990 stored as 1000, +10, -20
    let mut row = Vec::new();
    for delta in [1000u16, 10, 0u16.wrapping_sub(20)] {
        row.write_u16::<LittleEndian>(delta).unwrap();
    }

    LittleEndianHandler.undo_horizontal_differencing(&mut row, 2, 1);

    let decoded: Vec<f32> = row.chunks(2).map(|b| LittleEndianHandler.decode_sample(b, SampleType::U16)).collect();
    std::assert_eq!(decoded, vec![1000.0, 1010.0, 990.0]);
}

#[test]
fn test_undo_horizontal_differencing_interleaved_bytes() {
    // Two samples per pixel are accumulated independently
    let mut row = vec![10u8, 200, 5, 100, 1, 255];
    BigEndianHandler.undo_horizontal_differencing(&mut row, 1, 2);
    std::assert_eq!(row, vec![10, 200, 15, 44, 16, 43]);
}

/// Applies the floating point predictor the way an encoder does
///
/// Byte planes are written most significant first whatever the file's
/// byte order.
fn encode_floating_point(values: &[f32]) -> Vec<u8> {
    let count = values.len();
    let mut planes = vec![0u8; count * 4];
    for (s, value) in values.iter().enumerate() {
        let be = value.to_be_bytes();
        for plane in 0..4 {
            planes[plane * count + s] = be[plane];
        }
    }
    for i in (1..planes.len()).rev() {
        planes[i] = planes[i].wrapping_sub(planes[i - 1]);
    }
    planes
}

#[test]
fn test_undo_floating_point_predictor() {
    let values = [300.0f32, 305.25, -1.5, 0.0, 1e-3];

    let mut le_row = encode_floating_point(&values);
    LittleEndianHandler.undo_floating_point_predictor(&mut le_row, 4, 1);
    let le: Vec<f32> = le_row.chunks(4).map(|b| LittleEndianHandler.decode_sample(b, SampleType::F32)).collect();
    std::assert_eq!(le, values.to_vec());

    let mut be_row = encode_floating_point(&values);
    BigEndianHandler.undo_floating_point_predictor(&mut be_row, 4, 1);
    let be: Vec<f32> = be_row.chunks(4).map(|b| BigEndianHandler.decode_sample(b, SampleType::F32)).collect();
    std::assert_eq!(be, values.to_vec());
}
