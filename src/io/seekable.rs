//! Reader abstraction used when walking TIFF structures.

use std::io::{Read, Seek};

/// Anything we can both read from and reposition.
///
/// Raster files are walked non-linearly (header, IFD chain, tag arrays,
/// then strip or tile blocks), so every parser entry point takes this
/// instead of a concrete `File`. Tests pass a `Cursor<Vec<u8>>`.
pub trait SeekableReader: Read + Seek {}

impl<T: Read + Seek> SeekableReader for T {}
