//! Raster layout description
//!
//! Collects everything needed to decode pixel data from an IFD: dimensions,
//! sample encoding, compression, predictor and the strip or tile block
//! index.

use log::{debug, warn};
use std::fmt;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{planar_config, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Encoding of a single sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

impl SampleType {
    /// Maps SampleFormat + BitsPerSample to a sample type
    pub fn from_tags(format: u16, bits: u16) -> TiffResult<Self> {
        match (format, bits) {
            (sample_format::UNSIGNED, 8) => Ok(SampleType::U8),
            (sample_format::UNSIGNED, 16) => Ok(SampleType::U16),
            (sample_format::UNSIGNED, 32) => Ok(SampleType::U32),
            (sample_format::SIGNED, 8) => Ok(SampleType::I8),
            (sample_format::SIGNED, 16) => Ok(SampleType::I16),
            (sample_format::SIGNED, 32) => Ok(SampleType::I32),
            (sample_format::IEEEFP, 32) => Ok(SampleType::F32),
            (sample_format::IEEEFP, 64) => Ok(SampleType::F64),
            _ => Err(TiffError::UnsupportedSampleFormat { format, bits }),
        }
    }

    /// Size of one sample in bytes
    pub fn bytes(&self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }
}

/// How image data blocks are organised in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLayout {
    /// Horizontal strips spanning the full image width
    Strips { rows_per_strip: u32 },
    /// Rectangular tiles
    Tiles { tile_width: u32, tile_height: u32 },
}

/// Decoding parameters and block index of one image
#[derive(Debug, Clone)]
pub struct RasterLayout {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: usize,
    pub sample_type: SampleType,
    pub planar_configuration: u64,
    pub compression: u64,
    pub predictor: u64,
    pub blocks: BlockLayout,
    /// File offset of each strip or tile
    pub block_offsets: Vec<u64>,
    /// Stored (possibly compressed) size of each strip or tile
    pub block_byte_counts: Vec<u64>,
    /// Value of the GDAL_NODATA tag, if present and numeric
    pub nodata: Option<f64>,
}

impl RasterLayout {
    /// Reads the layout of `ifd`
    pub fn from_ifd(tiff_reader: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        if width == 0 || height == 0 || width > u32::MAX as u64 || height > u32::MAX as u64 {
            return Err(TiffError::GenericError(format!("Invalid image dimensions {}x{}", width, height)));
        }

        let samples_per_pixel = ifd.get_samples_per_pixel().max(1) as usize;

        // Band 1 decides the sample type; mixed-width bands are rejected
        let bits = match ifd.get_entry(tags::BITS_PER_SAMPLE) {
            Some(_) => tiff_reader.read_tag_values(reader, ifd, tags::BITS_PER_SAMPLE)?,
            None => vec![1],
        };
        if bits.iter().any(|&b| b != bits[0]) {
            return Err(TiffError::GenericError(format!("Mixed bits per sample: {:?}", bits)));
        }
        let format = ifd.get_tag_value(tags::SAMPLE_FORMAT).unwrap_or(sample_format::UNSIGNED as u64);
        let sample_type = SampleType::from_tags(format as u16, bits[0] as u16)?;

        let predictor = ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE);
        match predictor {
            predictor::NONE | predictor::HORIZONTAL_DIFFERENCING => {}
            predictor::FLOATING_POINT if sample_type.is_float() => {}
            other => return Err(TiffError::UnsupportedPredictor(other)),
        }

        let (blocks, offsets_tag, counts_tag) = if ifd.is_tiled() {
            let tile_width = ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(256) as u32;
            let tile_height = ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(256) as u32;
            if tile_width == 0 || tile_height == 0 {
                return Err(TiffError::GenericError("Zero tile dimensions".to_string()));
            }
            (BlockLayout::Tiles { tile_width, tile_height }, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            let rows_per_strip = ifd.get_tag_value(tags::ROWS_PER_STRIP)
                .unwrap_or(height)
                .clamp(1, height) as u32;
            (BlockLayout::Strips { rows_per_strip }, tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
        };

        let block_offsets = tiff_reader.read_tag_values(reader, ifd, offsets_tag)?;
        let block_byte_counts = tiff_reader.read_tag_values(reader, ifd, counts_tag)?;
        if block_offsets.len() != block_byte_counts.len() {
            return Err(TiffError::GenericError(format!(
                "{} block offsets but {} byte counts",
                block_offsets.len(), block_byte_counts.len()
            )));
        }

        let nodata = Self::read_nodata(tiff_reader, reader, ifd);

        let layout = RasterLayout {
            width: width as u32,
            height: height as u32,
            samples_per_pixel,
            sample_type,
            planar_configuration: ifd.get_tag_value(tags::PLANAR_CONFIGURATION).unwrap_or(planar_config::CHUNKY),
            compression: ifd.get_tag_value(tags::COMPRESSION).unwrap_or(1),
            predictor,
            blocks,
            block_offsets,
            block_byte_counts,
            nodata,
        };

        if layout.block_offsets.len() < layout.blocks_per_band() {
            return Err(TiffError::GenericError(format!(
                "Expected at least {} data blocks, found {}",
                layout.blocks_per_band(), layout.block_offsets.len()
            )));
        }

        debug!("Raster layout: {}", layout);
        Ok(layout)
    }

    fn read_nodata(tiff_reader: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD) -> Option<f64> {
        if !ifd.has_tag(tags::GDAL_NODATA) {
            return None;
        }

        match tiff_reader.read_ascii(reader, ifd, tags::GDAL_NODATA) {
            Ok(text) => match text.trim().parse::<f64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring non-numeric GDAL_NODATA value '{}'", text);
                    None
                }
            },
            Err(e) => {
                warn!("Could not read GDAL_NODATA tag: {}", e);
                None
            }
        }
    }

    /// Whether bands are stored in separate planes
    pub fn is_planar(&self) -> bool {
        self.planar_configuration == planar_config::PLANAR && self.samples_per_pixel > 1
    }

    /// Number of interleaved samples per pixel within one block
    pub fn block_samples_per_pixel(&self) -> usize {
        if self.is_planar() { 1 } else { self.samples_per_pixel }
    }

    /// Width and height of one block in pixels
    pub fn block_dimensions(&self) -> (u32, u32) {
        match self.blocks {
            BlockLayout::Strips { rows_per_strip } => (self.width, rows_per_strip),
            BlockLayout::Tiles { tile_width, tile_height } => (tile_width, tile_height),
        }
    }

    /// Blocks across and down the image
    pub fn block_grid(&self) -> (u32, u32) {
        let (block_width, block_height) = self.block_dimensions();
        (self.width.div_ceil(block_width), self.height.div_ceil(block_height))
    }

    /// Number of blocks holding the first band
    pub fn blocks_per_band(&self) -> usize {
        let (across, down) = self.block_grid();
        across as usize * down as usize
    }

    /// Bytes in one decompressed row of a block
    pub fn block_row_bytes(&self) -> usize {
        let (block_width, _) = self.block_dimensions();
        block_width as usize * self.block_samples_per_pixel() * self.sample_type.bytes()
    }
}

impl fmt::Display for RasterLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {:?} x{} samples, compression {}, predictor {}, ",
               self.width, self.height, self.sample_type, self.samples_per_pixel,
               self.compression, self.predictor)?;
        match self.blocks {
            BlockLayout::Strips { rows_per_strip } => write!(f, "{} rows per strip", rows_per_strip)?,
            BlockLayout::Tiles { tile_width, tile_height } => write!(f, "{}x{} tiles", tile_width, tile_height)?,
        }
        if let Some(nodata) = self.nodata {
            write!(f, ", nodata {}", nodata)?;
        }
        Ok(())
    }
}
