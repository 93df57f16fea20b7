//! Standalone single-stage codecs.
//!
//! These reuse the core coders outside the DEFLATE wire format: a
//! frequency-header Huffman byte codec and a marker-based LZSS text codec.
//! Both are self-describing formats of this crate, not standard ones.

pub mod huffman;
pub mod lzss;
