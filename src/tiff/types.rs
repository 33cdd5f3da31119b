//! Core TIFF data structures

use std::fmt;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::tags;
use crate::tiff::ifd::IFD;

/// Represents a TIFF file with its Image File Directories (IFDs)
#[derive(Debug)]
pub struct TIFF {
    /// Image File Directories in file order
    pub ifds: Vec<IFD>,
    /// Whether this is a BigTIFF format
    pub is_big_tiff: bool,
    /// Byte order declared in the header
    pub byte_order: ByteOrder,
}

impl TIFF {
    /// Creates a new empty TIFF structure
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// Returns the main (first) IFD if available
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    /// First IFD that is not a reduced-resolution overview or a mask
    ///
    /// Falls back to the first IFD when every directory carries a subfile
    /// flag.
    pub fn full_resolution_ifd(&self) -> Option<&IFD> {
        self.ifds.iter()
            .find(|ifd| ifd.get_tag_value(tags::NEW_SUBFILE_TYPE).unwrap_or(0) & 0b101 == 0)
            .or_else(|| self.main_ifd())
    }

    /// Returns the number of IFDs in the TIFF file
    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// Returns all overview IFDs (reduced resolution subfiles)
    pub fn overviews(&self) -> Vec<&IFD> {
        self.ifds.iter()
            .filter(|ifd| ifd.get_tag_value(tags::NEW_SUBFILE_TYPE).unwrap_or(0) & 1 == 1)
            .collect()
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  Number of IFDs: {}", self.ifds.len())?;
        writeln!(f, "  Overviews: {}", self.overviews().len())?;

        if let Some(ifd) = self.full_resolution_ifd() {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}
