//! gzip framing for decompression (RFC 1952).

use crate::compress::crc32::Crc32;
use crate::compress::gzip::{GZIP_HEADER, GZIP_TRAILER_LEN};
use crate::decode::inflate::inflate;
use crate::error::{Error, Result};

/// Decompress a gzip member.
///
/// Skips the fixed header, inflates the payload, and verifies the trailer's
/// CRC-32 and ISIZE against the decompressed output. No output escapes on a
/// trailer mismatch.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < GZIP_HEADER.len() + GZIP_TRAILER_LEN {
        return Err(Error::Truncated);
    }
    if data[0] != 0x1f || data[1] != 0x8b {
        return Err(Error::InvalidStream("not a gzip stream".into()));
    }
    if data[2] != 0x08 {
        return Err(Error::InvalidStream(format!(
            "unsupported gzip compression method {}",
            data[2]
        )));
    }

    let (payload, trailer) = data[GZIP_HEADER.len()..].split_at(
        data.len() - GZIP_HEADER.len() - GZIP_TRAILER_LEN,
    );

    let output = inflate(payload)?;

    let mut digest = Crc32::new();
    digest.update(&output);
    let actual_crc = digest.finalize();

    let expected_crc = u32::from_le_bytes(trailer[..4].try_into().expect("trailer is 8 bytes"));
    let expected_size = u32::from_le_bytes(trailer[4..].try_into().expect("trailer is 8 bytes"));

    if expected_crc != actual_crc {
        return Err(Error::CrcMismatch {
            expected: expected_crc,
            actual: actual_crc,
        });
    }
    let actual_size = output.len() as u32;
    if expected_size != actual_size {
        return Err(Error::SizeMismatch {
            expected: expected_size,
            actual: actual_size,
        });
    }

    Ok(output)
}
