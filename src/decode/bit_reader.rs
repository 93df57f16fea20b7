//! Bit-level input for DEFLATE decoding.

use crate::error::{Error, Result};

/// Bit reader for LSB-first bit streams.
///
/// Maintains a 64-bit buffer refilled from the input byte slice. The first
/// bit read from a byte is its least significant bit, mirroring
/// [`crate::bits::BitWriter`].
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buf: u64,
    bits_in_buf: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader over a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_buf: 0,
            bits_in_buf: 0,
        }
    }

    /// Refill the buffer until at least `count` bits are available.
    #[inline]
    fn ensure(&mut self, count: u8) -> Result<()> {
        while self.bits_in_buf < count {
            let Some(&byte) = self.data.get(self.pos) else {
                return Err(Error::Truncated);
            };
            self.bit_buf |= (byte as u64) << self.bits_in_buf;
            self.pos += 1;
            self.bits_in_buf += 8;
        }
        Ok(())
    }

    /// Read `count` bits; the first bit read lands in bit 0 of the result.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32);
        self.ensure(count)?;
        let mask = if count == 32 {
            u64::from(u32::MAX)
        } else {
            (1u64 << count) - 1
        };
        let value = (self.bit_buf & mask) as u32;
        self.bit_buf >>= count;
        self.bits_in_buf -= count;
        Ok(value)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u32> {
        self.read_bits(1)
    }

    /// True once every bit of the input has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len() && self.bits_in_buf == 0
    }
}
