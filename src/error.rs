//! Error types for the flato library.

use std::fmt;

/// Result type alias for flato operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during compression or decompression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input stream ended in the middle of a field.
    Truncated,
    /// Block type other than dynamic Huffman (BTYPE = 10).
    UnsupportedBlockType(u8),
    /// A Huffman code would exceed its length limit.
    HuffmanTreeTooDeep {
        /// Depth of the deepest leaf in the frequency-built tree.
        depth: u8,
        /// Maximum code length permitted for this alphabet.
        limit: u8,
    },
    /// Code-length symbol 16 (repeat previous) with no previous length.
    InvalidRepeat,
    /// A back-reference whose length exceeds its distance. The match
    /// finder reports these for short-period repeats, but the encoder
    /// refuses to emit matches that overlap their own output.
    EncoderSelfOverlap {
        /// Match length in positions.
        length: usize,
        /// Backward distance in positions.
        distance: usize,
    },
    /// Decoded distance reaches further back than the available output.
    DistanceOutOfRange {
        /// Distance requested by the stream.
        distance: usize,
        /// Bytes of output history available.
        available: usize,
    },
    /// gzip trailer CRC-32 does not match the decompressed data.
    CrcMismatch {
        /// CRC stored in the trailer.
        expected: u32,
        /// CRC computed over the output.
        actual: u32,
    },
    /// gzip trailer ISIZE does not match the decompressed length.
    SizeMismatch {
        /// Size stored in the trailer (modulo 2^32).
        expected: u32,
        /// Size of the output (modulo 2^32).
        actual: u32,
    },
    /// The consuming end of a stream pair was dropped.
    BrokenPipe,
    /// Malformed compressed data outside the more specific kinds above.
    InvalidStream(String),
    /// An underlying byte source or sink failed.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated => {
                write!(f, "compressed stream ended unexpectedly")
            }
            Error::UnsupportedBlockType(btype) => {
                write!(
                    f,
                    "unsupported block type {}: only dynamic Huffman (2) is implemented",
                    btype
                )
            }
            Error::HuffmanTreeTooDeep { depth, limit } => {
                write!(
                    f,
                    "Huffman tree depth {} exceeds the {}-bit code length limit",
                    depth, limit
                )
            }
            Error::InvalidRepeat => {
                write!(f, "code-length repeat symbol with no previous length")
            }
            Error::EncoderSelfOverlap { length, distance } => {
                write!(
                    f,
                    "match of length {} overlaps its own output at distance {}",
                    length, distance
                )
            }
            Error::DistanceOutOfRange {
                distance,
                available,
            } => {
                write!(
                    f,
                    "distance {} exceeds the {} bytes of output history",
                    distance, available
                )
            }
            Error::CrcMismatch { expected, actual } => {
                write!(
                    f,
                    "gzip CRC mismatch: trailer {:08x}, computed {:08x}",
                    expected, actual
                )
            }
            Error::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "gzip size mismatch: trailer {}, decompressed {}",
                    expected, actual
                )
            }
            Error::BrokenPipe => {
                write!(f, "stream consumer disappeared")
            }
            Error::InvalidStream(msg) => {
                write!(f, "invalid compressed stream: {}", msg)
            }
            Error::Io(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::Truncated => std::io::ErrorKind::UnexpectedEof,
            Error::BrokenPipe => std::io::ErrorKind::BrokenPipe,
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err.to_string())
    }
}
