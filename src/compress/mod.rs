//! Compression-side building blocks.
//!
//! The DEFLATE encoder composes the sliding-window match finder with the
//! canonical Huffman builder; the gzip module frames its output.

pub mod crc32;
pub mod deflate;
pub mod gzip;
pub mod huffman;
pub mod matchfinder;

pub use crc32::{crc32, Crc32};
pub use deflate::{deflate, Deflater};
pub use gzip::{gzip_compress, gzip_compress_with};
