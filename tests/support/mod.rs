//! Shared corpus generators for integration tests.
//!
//! The DEFLATE encoder refuses matches that overlap their own output, so
//! compressible fixtures keep every repetition shorter than its distance
//! (the counter in each line breaks the period) and incompressible
//! fixtures avoid short periodic runs entirely.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Numbered-line text: highly compressible, never self-overlapping.
pub fn numbered_text(at_least: usize) -> Vec<u8> {
    let mut text = Vec::with_capacity(at_least + 80);
    let mut line = 0u32;
    while text.len() < at_least {
        text.extend_from_slice(
            format!("line {line} of the corpus repeats this sentence about sliding windows\n")
                .as_bytes(),
        );
        line += 1;
    }
    text
}

/// Random-looking bytes where no byte equals either of its two
/// predecessors, so neither a run nor a period-one or period-two repeat
/// can form.
pub fn incompressible(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data: Vec<u8> = Vec::with_capacity(len);
    while data.len() < len {
        let byte: u8 = rng.gen();
        let filled = data.len();
        if filled >= 1 && data[filled - 1] == byte {
            continue;
        }
        if filled >= 2 && data[filled - 2] == byte {
            continue;
        }
        data.push(byte);
    }
    data
}
