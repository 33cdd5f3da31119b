//! Tests for header, IFD, layout and georeferencing parsing

extern crate std;

use ndarray::array;

use super::test_utils::{create_big_endian_geotiff, create_test_bigtiff_buffer, create_test_tiff_buffer};
use crate::extractor::{GeoRaster, Region};
use crate::io::byte_order::ByteOrder;
use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::layout::{BlockLayout, RasterLayout, SampleType};
use crate::tiff::reader::TiffReader;
use crate::tiff::errors::TiffError;

#[test]
fn test_read_classic_tiff() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();

    let tiff = reader.read(&mut cursor).unwrap();
    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.byte_order, ByteOrder::LittleEndian);
    std::assert_eq!(tiff.ifds.len(), 1);
    std::assert_eq!(tiff.ifds[0].get_dimensions(), Some((800, 600)));
}

#[test]
fn test_read_bigtiff() {
    let mut cursor = create_test_bigtiff_buffer();
    let mut reader = TiffReader::new();

    let tiff = reader.read(&mut cursor).unwrap();
    std::assert!(tiff.is_big_tiff);
    std::assert!(reader.is_big_tiff());
    std::assert_eq!(tiff.ifds[0].get_dimensions(), Some((1024, 768)));
}

#[test]
fn test_layout_without_sample_tags_is_an_error() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    let result = RasterLayout::from_ifd(&reader, &mut cursor, &tiff.ifds[0]);
    std::assert!(matches!(result, Err(TiffError::UnsupportedSampleFormat { format: 1, bits: 1 })));
}

#[test]
fn test_invalid_version_is_rejected() {
    let mut cursor = create_test_tiff_buffer();
    cursor.get_mut()[2] = 41;
    let result = TiffReader::new().read(&mut cursor);
    std::assert!(matches!(result, Err(TiffError::UnsupportedVersion(41))));
}

#[test]
fn test_big_endian_inline_shorts() {
    let mut cursor = create_big_endian_geotiff();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    let ifd = &tiff.ifds[0];
    std::assert_eq!(tiff.byte_order, ByteOrder::BigEndian);
    std::assert_eq!(ifd.get_dimensions(), Some((3, 2)));

    let layout = RasterLayout::from_ifd(&reader, &mut cursor, ifd).unwrap();
    std::assert_eq!(layout.sample_type, SampleType::F32);
    std::assert_eq!(layout.blocks, BlockLayout::Strips { rows_per_strip: 2 });
    std::assert_eq!(layout.block_byte_counts, vec![24]);
    std::assert_eq!(layout.nodata, Some(-9999.0));
}

#[test]
fn test_pixel_scale_and_tiepoint_georeferencing() {
    let mut cursor = create_big_endian_geotiff();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    let geo_info = GeoKeyParser::extract_geo_info(&reader, &mut cursor, &tiff.ifds[0]).unwrap();
    std::assert_eq!(geo_info.transform, [-78.0, 0.5, 0.0, 40.0, 0.0, -0.5]);
    std::assert!(!geo_info.pixel_is_point);
    std::assert_eq!(geo_info.epsg_code, None);
}

#[test]
fn test_missing_georeferencing_is_reported() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    let result = GeoKeyParser::extract_geo_info(&reader, &mut cursor, &tiff.ifds[0]);
    std::assert!(matches!(result, Err(TiffError::MissingGeoreference)));
}

#[test]
fn test_big_endian_window_read() {
    let mut raster = GeoRaster::from_reader(create_big_endian_geotiff()).unwrap();
    std::assert_eq!((raster.width(), raster.height()), (3, 2));

    let full = raster.read_window(Region::new(0, 0, 3, 2)).unwrap();
    std::assert_eq!(full, array![[300.0, 301.5, 0.0], [-9999.0, 310.25, 299.0]]);

    let corner = raster.read_window(Region::new(1, 1, 2, 1)).unwrap();
    std::assert_eq!(corner, array![[310.25, 299.0]]);
}

#[test]
fn test_window_outside_image_is_rejected() {
    let mut raster = GeoRaster::from_reader(create_big_endian_geotiff()).unwrap();
    std::assert!(raster.read_window(Region::new(2, 0, 2, 2)).is_err());
}
