//! Image File Directory (IFD) structures and methods
//!
//! An IFD is the metadata block of one image in a TIFF file: a list of
//! tagged entries whose values are either stored inline in the entry or at
//! an offset elsewhere in the file.

use std::collections::HashMap;
use std::fmt;
use log::{debug, trace};

use crate::tiff::constants::{field_types, tags};

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD, in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Index into `entries` by tag
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// `value_offset` holds the decoded scalar when a single value fits inline,
/// otherwise the file offset of the value array. `raw_value` keeps the
/// undecoded 4 (TIFF) or 8 (BigTIFF) bytes of the value field so that small
/// inline arrays can still be read in the file's byte order.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value or offset to values
    pub value_offset: u64,
    /// Raw bytes of the value/offset field
    pub raw_value: [u8; 8],
}

impl IFDEntry {
    /// Creates a new IFD entry from an already decoded value/offset
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        Self::with_raw(tag, field_type, count, value_offset, value_offset.to_le_bytes())
    }

    /// Creates a new IFD entry that also remembers the raw value bytes
    pub fn with_raw(tag: u16, field_type: u16, count: u64, value_offset: u64, raw_value: [u8; 8]) -> Self {
        trace!("IFD entry: tag={} ({}), type={} ({}), count={}, value/offset={}",
               tag, tag_name(tag), field_type, field_type_name(field_type), count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
            raw_value,
        }
    }

    /// Get the size in bytes for this entry's field type
    pub fn get_field_type_size(&self) -> usize {
        field_type_size(self.field_type)
    }

    /// Whether the value is stored in the entry itself rather than at an offset
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let total_size = self.get_field_type_size() as u64 * self.count;
        let inline_size = if is_big_tiff { 8 } else { 4 };
        total_size <= inline_size
    }
}

impl IFD {
    /// Creates a new empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        debug!("Creating IFD #{} at offset {}", number, offset);

        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry, replacing the lookup for an already present tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets a tag value (value_offset) directly
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag).map(|entry| entry.value_offset)
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&idx| &self.entries[idx])
    }

    /// Width and height of the image if both tags are present
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Returns number of samples per pixel (default 1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Whether image data is organised in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_LENGTH)
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }

        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;
        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            writeln!(f, "    {} ({}): {} x{} [{}]",
                     entry.tag, tag_name(entry.tag), entry.value_offset, entry.count,
                     field_type_name(entry.field_type))?;
        }

        Ok(())
    }
}

/// Size in bytes of one value of a TIFF field type
pub fn field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,
    }
}

/// Human-readable name of the tags this crate cares about
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::PREDICTOR => "Predictor",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::SAMPLE_FORMAT => "SampleFormat",
        tags::MODEL_PIXEL_SCALE_TAG => "ModelPixelScale",
        tags::MODEL_TIEPOINT_TAG => "ModelTiepoint",
        tags::MODEL_TRANSFORMATION_TAG => "ModelTransformation",
        tags::GEO_KEY_DIRECTORY_TAG => "GeoKeyDirectory",
        tags::GDAL_NODATA => "GDALNoData",
        _ => "Unknown",
    }
}

/// Human-readable name of a TIFF field type
pub fn field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}
