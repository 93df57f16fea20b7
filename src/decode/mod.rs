//! Decompression-side building blocks.

pub mod bit_reader;
pub mod gunzip;
pub mod inflate;

pub use gunzip::gzip_decompress;
pub use inflate::inflate;
