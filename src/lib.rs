//! # flato
//!
//! A DEFLATE (RFC 1951) and gzip (RFC 1952) compression engine built from
//! two hand-implemented coders: an LZSS longest-match finder over a sliding
//! window and a canonical Huffman coder with a length-limited tree builder.
//!
//! The same building blocks also power two standalone single-stage codecs:
//! a frequency-header Huffman byte codec and a marker-based LZSS text
//! codec.
//!
//! ## Example
//!
//! ```rust
//! let mut data = Vec::new();
//! for i in 0..120 {
//!     data.extend_from_slice(format!("record {i} holds a handful of bytes\n").as_bytes());
//! }
//!
//! let framed = flato::gzip_compress(&data).unwrap();
//! assert!(framed.len() < data.len());
//! assert_eq!(flato::gzip_decompress(&framed).unwrap(), data);
//! ```
//!
//! Every codec is also available as a paired streaming writer/reader, see
//! [`stream`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod compress;
pub mod decode;
pub mod error;
pub mod standalone;
pub mod stream;

pub use compress::deflate::{deflate, Deflater};
pub use compress::gzip::{gzip_compress, gzip_compress_with};
pub use decode::gunzip::gzip_decompress;
pub use decode::inflate::inflate;
pub use error::{Error, Result};
pub use stream::Algorithm;
