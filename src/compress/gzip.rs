//! gzip framing for compression (RFC 1952).
//!
//! gzip is a thin wrapper around a DEFLATE payload: a fixed 10-byte header
//! followed by the compressed stream and an 8-byte trailer holding the
//! CRC-32 and the original size, both little-endian.

use crate::compress::crc32::Crc32;
use crate::compress::deflate::Deflater;
use crate::error::Result;

/// Fixed gzip header: ID1, ID2, CM=8 (deflate), FLG=0, MTIME=0, XFL=0,
/// OS=0xff (unknown).
pub(crate) const GZIP_HEADER: [u8; 10] = [0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff];

/// Length of the CRC-32 + ISIZE trailer.
pub(crate) const GZIP_TRAILER_LEN: usize = 8;

/// Compress data into a gzip member with default DEFLATE settings.
pub fn gzip_compress(data: &[u8]) -> Result<Vec<u8>> {
    gzip_compress_with(data, &Deflater::new())
}

/// Compress data into a gzip member using the given DEFLATE encoder.
pub fn gzip_compress_with(data: &[u8], deflater: &Deflater) -> Result<Vec<u8>> {
    let mut digest = Crc32::new();
    digest.update(data);
    let size = data.len() as u32;

    let payload = deflater.encode(data)?;

    let mut out = Vec::with_capacity(GZIP_HEADER.len() + payload.len() + GZIP_TRAILER_LEN);
    out.extend_from_slice(&GZIP_HEADER);
    out.extend_from_slice(&payload);
    out.extend_from_slice(&digest.finalize().to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::crc32::crc32;

    #[test]
    fn test_frame_layout() {
        let data = b"framed payload";
        let framed = gzip_compress(data).unwrap();

        assert_eq!(&framed[..10], &GZIP_HEADER);
        let trailer = &framed[framed.len() - 8..];
        assert_eq!(&trailer[..4], &crc32(data).to_le_bytes());
        assert_eq!(&trailer[4..], &(data.len() as u32).to_le_bytes());
    }

    #[test]
    fn test_empty_payload_still_framed() {
        let framed = gzip_compress(b"").unwrap();
        assert!(framed.len() > 18);
        let trailer = &framed[framed.len() - 8..];
        assert_eq!(trailer, &[0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
