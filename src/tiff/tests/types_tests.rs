//! Tests for the TIFF types module

extern crate std;

use crate::io::byte_order::ByteOrder;
use crate::tiff::types::TIFF;
use crate::tiff::ifd::{IFD, IFDEntry};

#[test]
fn test_tiff_creation() {
    let tiff = TIFF::new(false, ByteOrder::LittleEndian);
    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.ifd_count(), 0);
    std::assert!(tiff.main_ifd().is_none());
    std::assert!(tiff.full_resolution_ifd().is_none());
}

#[test]
fn test_tiff_with_overview_first() {
    let mut tiff = TIFF::new(true, ByteOrder::BigEndian);

    // Some writers put a reduced-resolution image first
    let mut overview_ifd = IFD::new(0, 16);
    overview_ifd.add_entry(IFDEntry::new(254, 4, 1, 1));
    overview_ifd.add_entry(IFDEntry::new(256, 4, 1, 512));
    overview_ifd.add_entry(IFDEntry::new(257, 4, 1, 384));
    tiff.ifds.push(overview_ifd);

    let mut main_ifd = IFD::new(1, 100);
    main_ifd.add_entry(IFDEntry::new(256, 4, 1, 1024));
    main_ifd.add_entry(IFDEntry::new(257, 4, 1, 768));
    tiff.ifds.push(main_ifd);

    std::assert_eq!(tiff.ifd_count(), 2);
    std::assert_eq!(tiff.overviews().len(), 1);
    std::assert_eq!(tiff.full_resolution_ifd().and_then(|ifd| ifd.get_dimensions()), Some((1024, 768)));
}

#[test]
fn test_mask_only_file_falls_back_to_first_ifd() {
    let mut tiff = TIFF::new(false, ByteOrder::LittleEndian);
    let mut mask_ifd = IFD::new(0, 8);
    mask_ifd.add_entry(IFDEntry::new(254, 4, 1, 4));
    tiff.ifds.push(mask_ifd);

    std::assert_eq!(tiff.full_resolution_ifd().map(|ifd| ifd.number), Some(0));
}
