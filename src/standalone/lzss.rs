//! Standalone LZSS text codec.
//!
//! Replaces repeated runs of text with `<distance,length>` markers pointing
//! back into the already-emitted output. The codec works on Unicode code
//! points, so distances and lengths count characters, not bytes. The four
//! marker characters `<`, `>`, `,` and `\` are escaped with a leading
//! backslash before match finding, and unescaped last when decoding, so
//! marker expansion operates on the same character positions the match
//! finder saw.

use crate::compress::matchfinder::{find_references, Reference};
use crate::error::{Error, Result};

const OPENING: char = '<';
const CLOSING: char = '>';
const SEPARATOR: char = ',';
const ESCAPE: char = '\\';

/// Backward search window, in characters.
const WINDOW: usize = 4096;

/// Longest run a single marker may cover.
const MAX_RUN: usize = 4096;

fn needs_escape(c: char) -> bool {
    matches!(c, OPENING | CLOSING | SEPARATOR | ESCAPE)
}

/// Compress UTF-8 text into the marker format.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(data)
        .map_err(|_| Error::InvalidStream("LZSS text codec requires UTF-8 input".into()))?;

    let mut escaped = Vec::with_capacity(text.len());
    for c in text.chars() {
        if needs_escape(c) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }

    let references = find_references(&escaped, WINDOW, MAX_RUN);

    let mut out = String::with_capacity(text.len());
    let mut skip = 0usize;
    // Trailing escape run of the positions consumed so far. The decoder
    // sees the same parity while expanding, so a marker may only open where
    // the run is even; on the payload half of an escape pair the character
    // goes out as a literal instead.
    let mut escape_run = 0usize;
    for (pos, reference) in references.iter().enumerate() {
        if skip == 0 {
            match *reference {
                Reference::Match { length, distance } if escape_run % 2 == 0 => {
                    let marker = format!("{OPENING}{distance}{SEPARATOR}{length}{CLOSING}");
                    // A marker only earns its place when shorter than the
                    // run it replaces.
                    if marker.chars().count() < length {
                        out.push_str(&marker);
                        skip = length;
                    } else {
                        out.push(escaped[pos]);
                    }
                }
                _ => out.push(escaped[pos]),
            }
        }
        if skip > 0 {
            skip -= 1;
        }
        if escaped[pos] == ESCAPE {
            escape_run += 1;
        } else {
            escape_run = 0;
        }
    }

    Ok(out.into_bytes())
}

/// Decompress the marker format back into UTF-8 text.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(data)
        .map_err(|_| Error::InvalidStream("LZSS text codec requires UTF-8 input".into()))?;
    let chars: Vec<char> = text.chars().collect();

    // Pass 1: expand markers against the still-escaped output.
    let mut expanded: Vec<char> = Vec::with_capacity(chars.len());
    let mut i = 0usize;
    while i < chars.len() {
        if chars[i] == OPENING && escapes_before(&expanded) % 2 == 0 {
            let (distance, length, consumed) = parse_marker(&chars[i..])?;
            let start = expanded
                .len()
                .checked_sub(distance)
                .ok_or(Error::DistanceOutOfRange {
                    distance,
                    available: expanded.len(),
                })?;
            for offset in 0..length {
                let c = expanded[start + offset];
                expanded.push(c);
            }
            i += consumed;
        } else {
            expanded.push(chars[i]);
            i += 1;
        }
    }

    // Pass 2: strip escapes; a bare marker character means corrupt input.
    let mut out = String::with_capacity(expanded.len());
    let mut i = 0usize;
    while i < expanded.len() {
        let c = expanded[i];
        if c == ESCAPE {
            let next = *expanded
                .get(i + 1)
                .ok_or_else(|| Error::InvalidStream("dangling escape".into()))?;
            if !needs_escape(next) {
                return Err(Error::InvalidStream(format!(
                    "escape before non-marker character {next:?}"
                )));
            }
            out.push(next);
            i += 2;
        } else if needs_escape(c) {
            return Err(Error::InvalidStream(format!(
                "unescaped marker character {c:?}"
            )));
        } else {
            out.push(c);
            i += 1;
        }
    }

    Ok(out.into_bytes())
}

/// Consecutive escape characters at the end of the expanded output. An odd
/// count means the next character is escaped.
fn escapes_before(expanded: &[char]) -> usize {
    expanded.iter().rev().take_while(|&&c| c == ESCAPE).count()
}

/// Parse `<distance,length>` at the head of `chars`; returns the two values
/// and the number of characters consumed.
fn parse_marker(chars: &[char]) -> Result<(usize, usize, usize)> {
    debug_assert_eq!(chars.first(), Some(&OPENING));
    let mut i = 1usize;
    let distance = parse_number(chars, &mut i, SEPARATOR)?;
    i += 1;
    let length = parse_number(chars, &mut i, CLOSING)?;
    i += 1;
    if distance == 0 || length == 0 {
        return Err(Error::InvalidStream("marker with zero field".into()));
    }
    Ok((distance, length, i))
}

fn parse_number(chars: &[char], i: &mut usize, terminator: char) -> Result<usize> {
    let mut value = 0usize;
    let mut digits = 0usize;
    loop {
        let c = *chars.get(*i).ok_or(Error::Truncated)?;
        if c == terminator {
            break;
        }
        let digit = c
            .to_digit(10)
            .ok_or_else(|| Error::InvalidStream(format!("non-digit {c:?} in marker")))?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as usize))
            .ok_or_else(|| Error::InvalidStream("marker field overflows".into()))?;
        digits += 1;
        *i += 1;
    }
    if digits == 0 {
        return Err(Error::InvalidStream("empty marker field".into()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) {
        let encoded = encode(text.as_bytes()).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, text.as_bytes(), "failed for {text:?}");
    }

    #[test]
    fn test_round_trip_plain() {
        round_trip("");
        round_trip("no repeats here!");
        round_trip("the quick brown fox jumps over the lazy dog the quick brown fox");
    }

    #[test]
    fn test_round_trip_marker_characters() {
        round_trip("a < b, b > c \\ d");
        round_trip("<<<<>>>>,,,,\\\\\\\\");
        round_trip("<1,2> literal marker text <3,4>");
    }

    #[test]
    fn test_round_trip_multibyte() {
        round_trip("héhé héhé héhé héhé héhé héhé héhé héhé");
        round_trip("こんにちは世界こんにちは世界こんにちは世界こんにちは世界");
    }

    #[test]
    fn test_repeated_text_shrinks() {
        let text = "a longer phrase that repeats. ".repeat(24);
        let encoded = encode(text.as_bytes()).unwrap();
        assert!(encoded.len() < text.len());
    }

    #[test]
    fn test_markers_emitted() {
        let text = "abcdefghijklmnop".repeat(8);
        let encoded = String::from_utf8(encode(text.as_bytes()).unwrap()).unwrap();
        assert!(encoded.contains(OPENING));
    }

    #[test]
    fn test_non_utf8_input_rejected() {
        assert!(matches!(
            encode(&[0xFF, 0xFE, 0x80]),
            Err(Error::InvalidStream(_))
        ));
    }

    #[test]
    fn test_unescaped_marker_character_rejected() {
        assert!(matches!(decode(b"a>b"), Err(Error::InvalidStream(_))));
    }

    #[test]
    fn test_malformed_marker_rejected() {
        assert!(matches!(decode(b"<abc,3>"), Err(Error::InvalidStream(_))));
        assert_eq!(decode(b"<12").unwrap_err(), Error::Truncated);
    }

    #[test]
    fn test_marker_distance_beyond_output_rejected() {
        assert!(matches!(
            decode(b"<9,3>"),
            Err(Error::DistanceOutOfRange { .. })
        ));
    }
}
