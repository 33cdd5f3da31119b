//! Low-level reading helpers shared by the TIFF parser and the window readers.

pub mod seekable;
pub mod byte_order;
