//! In-memory GeoTIFF writer for the integration tests
//!
//! Produces single-band float32 rasters in the layouts the reader has to
//! cope with: strips or tiles, plain or compressed blocks, either byte
//! order and classic or BigTIFF headers.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression as DeflateLevel;

/// Block organisation of the written image
#[derive(Debug, Clone, Copy)]
pub enum Blocks {
    Strips { rows_per_strip: u32 },
    Tiles { tile_width: u32, tile_height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Codec {
    None,
    Deflate,
    Zstd,
    Lzw,
    PackBits,
}

impl Codec {
    fn code(&self) -> u16 {
        match self {
            Codec::None => 1,
            Codec::Deflate => 8,
            Codec::Zstd => 50000,
            Codec::Lzw => 5,
            Codec::PackBits => 32773,
        }
    }
}

/// How the image is tied to map coordinates
#[derive(Debug, Clone, Copy)]
pub enum Georef {
    /// ModelPixelScale + ModelTiepoint with the tie point on pixel (0, 0)
    Tiepoint { x: f64, y: f64, pixel_size: f64 },
    /// ModelTransformation with a north-up matrix
    Matrix { x: f64, y: f64, pixel_size: f64 },
}

pub struct GeoTiffBuilder {
    width: u32,
    height: u32,
    data: Vec<f32>,
    blocks: Blocks,
    codec: Codec,
    float_predictor: bool,
    big_endian: bool,
    big_tiff: bool,
    georef: Georef,
    pixel_is_point: bool,
    nodata: Option<String>,
    sparse_blocks: Vec<usize>,
}

/// Origin of the test grid: a 0.01 degree raster starting at 78W, 40N
pub const ORIGIN_X: f64 = -78.0;
pub const ORIGIN_Y: f64 = 40.0;
pub const PIXEL_SIZE: f64 = 0.01;

impl GeoTiffBuilder {
    /// A `width` x `height` raster with `value(row, col)` in every cell
    pub fn new(width: u32, height: u32, value: impl Fn(u32, u32) -> f32) -> Self {
        let mut data = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                data.push(value(row, col));
            }
        }

        GeoTiffBuilder {
            width,
            height,
            data,
            blocks: Blocks::Strips { rows_per_strip: 16 },
            codec: Codec::None,
            float_predictor: false,
            big_endian: false,
            big_tiff: false,
            georef: Georef::Tiepoint { x: ORIGIN_X, y: ORIGIN_Y, pixel_size: PIXEL_SIZE },
            pixel_is_point: false,
            nodata: None,
            sparse_blocks: Vec::new(),
        }
    }

    pub fn blocks(mut self, blocks: Blocks) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn float_predictor(mut self) -> Self {
        self.float_predictor = true;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn big_tiff(mut self) -> Self {
        self.big_tiff = true;
        self
    }

    pub fn georef(mut self, georef: Georef) -> Self {
        self.georef = georef;
        self
    }

    /// Marks the raster PixelIsPoint; the tie point then names a pixel centre
    pub fn pixel_is_point(mut self) -> Self {
        self.pixel_is_point = true;
        self
    }

    pub fn nodata(mut self, nodata: &str) -> Self {
        self.nodata = Some(nodata.to_string());
        self
    }

    /// Leaves block `index` unwritten (offset and byte count zero)
    pub fn sparse_block(mut self, index: usize) -> Self {
        self.sparse_blocks.push(index);
        self
    }

    pub fn cursor(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.build())
    }

    pub fn write_to(&self, path: &Path) {
        let mut file = fs::File::create(path).unwrap();
        file.write_all(&self.build()).unwrap();
    }

    fn put_u16(&self, buf: &mut Vec<u8>, value: u16) {
        if self.big_endian {
            buf.write_u16::<BigEndian>(value).unwrap();
        } else {
            buf.write_u16::<LittleEndian>(value).unwrap();
        }
    }

    fn put_u32(&self, buf: &mut Vec<u8>, value: u32) {
        if self.big_endian {
            buf.write_u32::<BigEndian>(value).unwrap();
        } else {
            buf.write_u32::<LittleEndian>(value).unwrap();
        }
    }

    fn put_u64(&self, buf: &mut Vec<u8>, value: u64) {
        if self.big_endian {
            buf.write_u64::<BigEndian>(value).unwrap();
        } else {
            buf.write_u64::<LittleEndian>(value).unwrap();
        }
    }

    fn put_f32(&self, buf: &mut Vec<u8>, value: f32) {
        if self.big_endian {
            buf.write_f32::<BigEndian>(value).unwrap();
        } else {
            buf.write_f32::<LittleEndian>(value).unwrap();
        }
    }

    fn put_f64(&self, buf: &mut Vec<u8>, value: f64) {
        if self.big_endian {
            buf.write_f64::<BigEndian>(value).unwrap();
        } else {
            buf.write_f64::<LittleEndian>(value).unwrap();
        }
    }

    fn put_offset(&self, buf: &mut Vec<u8>, value: u64) {
        if self.big_tiff {
            self.put_u64(buf, value);
        } else {
            self.put_u32(buf, value as u32);
        }
    }

    fn sample(&self, row: u32, col: u32) -> f32 {
        if row < self.height && col < self.width {
            self.data[(row * self.width + col) as usize]
        } else {
            0.0
        }
    }

    /// Rows of uncompressed bytes for a block, predictor applied
    fn encode_block(&self, start_x: u32, start_y: u32, block_width: u32, rows: u32) -> Vec<u8> {
        let mut block = Vec::new();
        for y in start_y..start_y + rows {
            let mut row = Vec::with_capacity(block_width as usize * 4);
            for x in start_x..start_x + block_width {
                self.put_f32(&mut row, self.sample(y, x));
            }
            if self.float_predictor {
                row = floating_point_encode(&row, self.big_endian);
            }
            block.extend_from_slice(&row);
        }

        match self.codec {
            Codec::None => block,
            Codec::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), DeflateLevel::default());
                encoder.write_all(&block).unwrap();
                encoder.finish().unwrap()
            }
            Codec::Zstd => zstd::encode_all(&block[..], 0).unwrap(),
            Codec::Lzw => weezl::encode::Encoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
                .encode(&block)
                .unwrap(),
            Codec::PackBits => packbits_encode(&block),
        }
    }

    fn encode_blocks(&self) -> Vec<Vec<u8>> {
        let mut blocks = Vec::new();
        match self.blocks {
            Blocks::Strips { rows_per_strip } => {
                let mut y = 0;
                while y < self.height {
                    let rows = rows_per_strip.min(self.height - y);
                    blocks.push(self.encode_block(0, y, self.width, rows));
                    y += rows_per_strip;
                }
            }
            Blocks::Tiles { tile_width, tile_height } => {
                for ty in (0..self.height).step_by(tile_height as usize) {
                    for tx in (0..self.width).step_by(tile_width as usize) {
                        blocks.push(self.encode_block(tx, ty, tile_width, tile_height));
                    }
                }
            }
        }
        blocks
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if self.big_endian {
            buf.extend_from_slice(b"MM");
        } else {
            buf.extend_from_slice(b"II");
        }
        if self.big_tiff {
            self.put_u16(&mut buf, 43);
            self.put_u16(&mut buf, 8);
            self.put_u16(&mut buf, 0);
            self.put_u64(&mut buf, 0);
        } else {
            self.put_u16(&mut buf, 42);
            self.put_u32(&mut buf, 0);
        }
        let header_len = buf.len();

        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        for (index, block) in self.encode_blocks().into_iter().enumerate() {
            if self.sparse_blocks.contains(&index) {
                offsets.push(0u64);
                counts.push(0u64);
                continue;
            }
            offsets.push(buf.len() as u64);
            counts.push(block.len() as u64);
            buf.extend_from_slice(&block);
        }

        let entries = self.entries(&offsets, &counts);

        // Out-of-line values follow the image data
        let inline_size = if self.big_tiff { 8 } else { 4 };
        let mut fields = Vec::new();
        for entry in &entries {
            if entry.bytes.len() > inline_size {
                if buf.len() % 2 == 1 {
                    buf.push(0);
                }
                let offset = buf.len() as u64;
                buf.extend_from_slice(&entry.bytes);
                let mut field = Vec::new();
                self.put_offset(&mut field, offset);
                fields.push(field);
            } else {
                let mut field = entry.bytes.clone();
                field.resize(inline_size, 0);
                fields.push(field);
            }
        }

        if buf.len() % 2 == 1 {
            buf.push(0);
        }
        let ifd_offset = buf.len() as u64;
        if self.big_tiff {
            self.put_u64(&mut buf, entries.len() as u64);
        } else {
            self.put_u16(&mut buf, entries.len() as u16);
        }
        for (entry, field) in entries.iter().zip(&fields) {
            self.put_u16(&mut buf, entry.tag);
            self.put_u16(&mut buf, entry.field_type);
            self.put_offset(&mut buf, entry.count);
            buf.extend_from_slice(field);
        }
        self.put_offset(&mut buf, 0);

        let mut header_offset = Vec::new();
        self.put_offset(&mut header_offset, ifd_offset);
        let at = header_len - header_offset.len();
        buf[at..header_len].copy_from_slice(&header_offset);

        buf
    }

    fn entries(&self, offsets: &[u64], counts: &[u64]) -> Vec<Entry> {
        let mut entries = vec![
            self.longs(256, &[self.width]),
            self.longs(257, &[self.height]),
            self.shorts(258, &[32]),
            self.shorts(259, &[self.codec.code()]),
            self.shorts(262, &[1]),
            self.shorts(277, &[1]),
            self.shorts(284, &[1]),
        ];
        if self.float_predictor {
            entries.push(self.shorts(317, &[3]));
        }

        match self.blocks {
            Blocks::Strips { rows_per_strip } => {
                entries.push(self.block_index(273, offsets));
                entries.push(self.longs(278, &[rows_per_strip]));
                entries.push(self.block_index(279, counts));
            }
            Blocks::Tiles { tile_width, tile_height } => {
                entries.push(self.longs(322, &[tile_width]));
                entries.push(self.longs(323, &[tile_height]));
                entries.push(self.block_index(324, offsets));
                entries.push(self.block_index(325, counts));
            }
        }
        entries.push(self.shorts(339, &[3]));

        match self.georef {
            Georef::Tiepoint { x, y, pixel_size } => {
                entries.push(self.doubles(33550, &[pixel_size, pixel_size, 0.0]));
                entries.push(self.doubles(33922, &[0.0, 0.0, 0.0, x, y, 0.0]));
            }
            Georef::Matrix { x, y, pixel_size } => {
                entries.push(self.doubles(34264, &[
                    pixel_size, 0.0, 0.0, x,
                    0.0, -pixel_size, 0.0, y,
                    0.0, 0.0, 0.0, 0.0,
                    0.0, 0.0, 0.0, 1.0,
                ]));
            }
        }

        let raster_type = if self.pixel_is_point { 2 } else { 1 };
        entries.push(self.shorts(34735, &[
            1, 1, 0, 3,
            1024, 0, 1, 2,
            1025, 0, 1, raster_type,
            2048, 0, 1, 4326,
        ]));

        if let Some(nodata) = &self.nodata {
            let mut bytes = nodata.as_bytes().to_vec();
            bytes.push(0);
            entries.push(Entry { tag: 42113, field_type: 2, count: bytes.len() as u64, bytes });
        }

        entries.sort_by_key(|e| e.tag);
        entries
    }

    fn shorts(&self, tag: u16, values: &[u16]) -> Entry {
        let mut bytes = Vec::new();
        for &v in values {
            self.put_u16(&mut bytes, v);
        }
        Entry { tag, field_type: 3, count: values.len() as u64, bytes }
    }

    fn longs(&self, tag: u16, values: &[u32]) -> Entry {
        let mut bytes = Vec::new();
        for &v in values {
            self.put_u32(&mut bytes, v);
        }
        Entry { tag, field_type: 4, count: values.len() as u64, bytes }
    }

    fn doubles(&self, tag: u16, values: &[f64]) -> Entry {
        let mut bytes = Vec::new();
        for &v in values {
            self.put_f64(&mut bytes, v);
        }
        Entry { tag, field_type: 12, count: values.len() as u64, bytes }
    }

    /// Block offsets or byte counts: LONG in classic files, LONG8 in BigTIFF
    fn block_index(&self, tag: u16, values: &[u64]) -> Entry {
        if self.big_tiff {
            let mut bytes = Vec::new();
            for &v in values {
                self.put_u64(&mut bytes, v);
            }
            Entry { tag, field_type: 16, count: values.len() as u64, bytes }
        } else {
            let values: Vec<u32> = values.iter().map(|&v| v as u32).collect();
            self.longs(tag, &values)
        }
    }
}

struct Entry {
    tag: u16,
    field_type: u16,
    count: u64,
    bytes: Vec<u8>,
}

/// Floating point predictor for one row of 4-byte samples
///
/// Splits the samples into byte planes, most significant first, then
/// differences consecutive bytes.
fn floating_point_encode(row: &[u8], big_endian: bool) -> Vec<u8> {
    let count = row.len() / 4;
    let mut planes = vec![0u8; row.len()];
    for sample in 0..count {
        for plane in 0..4 {
            let byte = if big_endian { plane } else { 3 - plane };
            planes[plane * count + sample] = row[sample * 4 + byte];
        }
    }
    for i in (1..planes.len()).rev() {
        planes[i] = planes[i].wrapping_sub(planes[i - 1]);
    }
    planes
}

/// Bounding box "west,east,south,north" selecting pixel columns
/// `col_min..col_max` and rows `row_min..row_max` of the test grid
///
/// Edges sit on pixel centres so that flooring lands on the intended index.
pub fn bbox_for_pixels(col_min: u32, col_max: u32, row_min: u32, row_max: u32) -> lstpatch::BoundingBox {
    let half = PIXEL_SIZE / 2.0;
    lstpatch::BoundingBox::new(
        ORIGIN_X + col_min as f64 * PIXEL_SIZE + half,
        ORIGIN_X + col_max as f64 * PIXEL_SIZE + half,
        ORIGIN_Y - row_max as f64 * PIXEL_SIZE - half,
        ORIGIN_Y - row_min as f64 * PIXEL_SIZE - half,
    )
}

/// Run-length encodes bytes as PackBits, repeats of three or more as runs
fn packbits_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut literal: Vec<u8> = Vec::new();
    let mut i = 0;

    let flush = |literal: &mut Vec<u8>, out: &mut Vec<u8>| {
        for chunk in literal.chunks(128) {
            out.push((chunk.len() - 1) as u8);
            out.extend_from_slice(chunk);
        }
        literal.clear();
    };

    while i < data.len() {
        let mut run = 1;
        while i + run < data.len() && data[i + run] == data[i] && run < 128 {
            run += 1;
        }
        if run >= 3 {
            flush(&mut literal, &mut out);
            out.push((1 - run as i16) as i8 as u8);
            out.push(data[i]);
        } else {
            literal.extend_from_slice(&data[i..i + run]);
        }
        i += run;
    }
    flush(&mut literal, &mut out);
    out
}
