//! Standalone Huffman byte codec.
//!
//! A single-stage entropy codec whose header carries the symbol frequency
//! table. The decoder rebuilds the code lengths by rerunning the tree
//! builder over the transmitted frequencies, which is only sound because
//! the builder is fully deterministic.
//!
//! Wire format, all integers little-endian:
//!
//! ```text
//! u32                 distinct symbol count S
//! S x (u8, u32)       symbol, frequency, in ascending symbol order
//! u32                 original input length
//! ...                 canonical Huffman codes, bit-reversed, LSB-first
//! ```

use crate::bits::{reverse_bits, BitWriter};
use crate::compress::huffman::{build_code_lengths, canonical_codes, MAX_CODE_LENGTH};
use crate::decode::bit_reader::BitReader;
use crate::decode::inflate::DecoderTree;
use crate::error::{Error, Result};

/// Compress bytes into the frequency-header Huffman format.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let mut frequencies = [0u32; 256];
    for &byte in data {
        frequencies[byte as usize] += 1;
    }

    let distinct = frequencies.iter().filter(|&&f| f > 0).count() as u32;
    let mut out = Vec::with_capacity(12 + distinct as usize * 5 + data.len() / 2);
    out.extend_from_slice(&distinct.to_le_bytes());
    for (symbol, &frequency) in frequencies.iter().enumerate() {
        if frequency > 0 {
            out.push(symbol as u8);
            out.extend_from_slice(&frequency.to_le_bytes());
        }
    }
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());

    let lengths = build_code_lengths(&frequencies, MAX_CODE_LENGTH)?;
    let codes = canonical_codes(&lengths);

    let mut writer = BitWriter::with_capacity(data.len() / 2 + 16);
    for &byte in data {
        let code = codes[byte as usize];
        writer.write_bits(reverse_bits(code.code, code.length), code.length);
    }
    out.extend_from_slice(&writer.finish());
    Ok(out)
}

/// Decompress the frequency-header Huffman format.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut header = HeaderReader { data, pos: 0 };

    let distinct = header.read_u32()? as usize;
    if distinct > 256 {
        return Err(Error::InvalidStream(format!(
            "{distinct} distinct symbols in a byte alphabet"
        )));
    }
    let mut frequencies = [0u32; 256];
    for _ in 0..distinct {
        let symbol = header.read_u8()?;
        let frequency = header.read_u32()?;
        if frequency == 0 {
            return Err(Error::InvalidStream(
                "frequency table lists an absent symbol".into(),
            ));
        }
        frequencies[symbol as usize] = frequency;
    }
    let total = header.read_u32()? as usize;

    let lengths = build_code_lengths(&frequencies, MAX_CODE_LENGTH)?;
    let tree = DecoderTree::from_lengths(&lengths)?;

    let mut reader = BitReader::new(&data[header.pos..]);
    let mut out = Vec::with_capacity(total);
    for _ in 0..total {
        let symbol = tree.decode(&mut reader)?;
        out.push(symbol as u8);
    }
    Ok(out)
}

/// Plain byte-wise header cursor.
struct HeaderReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl HeaderReader<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(Error::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let end = self.pos + 4;
        let bytes = self.data.get(self.pos..end).ok_or(Error::Truncated)?;
        self.pos = end;
        Ok(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }
}
