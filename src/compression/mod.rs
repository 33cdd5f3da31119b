//! Compression handling for TIFF files
//!
//! This module implements strategies for handling different compression methods.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;
mod lzw;
mod packbits;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::DeflateHandler;
pub use factory::CompressionFactory;
pub use self::zstd::ZstdHandler;
pub use lzw::LzwHandler;
pub use packbits::PackBitsHandler;
