//! TIFF file format parsing module
//!
//! This module provides structures and functions for reading
//! TIFF and BigTIFF format files.

pub mod errors;
pub mod ifd;
pub mod types;
pub mod reader;
pub mod layout;
pub mod geo_key_parser;
pub mod constants;
pub(crate) mod validation;
#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use layout::{BlockLayout, RasterLayout, SampleType};
pub use geo_key_parser::{GeoInfo, GeoKeyEntry, GeoKeyParser};
