//! LZSS longest-match search over a sliding window.
//!
//! Every input position gets exactly one [`Reference`]: a literal, or the
//! longest back-reference into the window preceding it. Positions are
//! independent, so the search fans out one task per position and collects
//! the results in index order.
//!
//! The finder is generic over the symbol type. The DEFLATE encoder runs it
//! over bytes; the marker-based text codec runs the same search over
//! Unicode code points.

/// Maximum backward distance (32 KiB window).
pub const MAX_WINDOW: usize = 32768;

/// Maximum match length a DEFLATE token can carry.
pub const MAX_MATCH: usize = 258;

/// Minimum match length worth a DEFLATE token.
pub const MIN_MATCH: usize = 3;

/// Result of the longest-match search at one input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// No usable match; the symbol at this position stands alone.
    Literal,
    /// Longest match found in the window before this position. A match
    /// that starts near the window edge may run past it into the
    /// look-ahead itself, so `length` can exceed `distance`; whether such
    /// a self-overlapping reference is usable is the consumer's call.
    Match {
        /// Number of positions matched.
        length: usize,
        /// Backward distance to the start of the match.
        distance: usize,
    },
}

/// Find the best reference for every position of `data`.
///
/// `window` bounds the backward search, `max_match` the reported length.
/// The output has exactly one entry per input position, in position order.
#[cfg(feature = "parallel")]
pub fn find_references<T>(data: &[T], window: usize, max_match: usize) -> Vec<Reference>
where
    T: Copy + Eq + Sync,
{
    use rayon::prelude::*;

    (0..data.len())
        .into_par_iter()
        .map(|pos| best_reference(data, pos, window, max_match))
        .collect()
}

/// Find the best reference for every position of `data`.
///
/// `window` bounds the backward search, `max_match` the reported length.
/// The output has exactly one entry per input position, in position order.
#[cfg(not(feature = "parallel"))]
pub fn find_references<T>(data: &[T], window: usize, max_match: usize) -> Vec<Reference>
where
    T: Copy + Eq + Sync,
{
    (0..data.len())
        .map(|pos| best_reference(data, pos, window, max_match))
        .collect()
}

/// Search the window before `pos` for the longest match of the look-ahead.
fn best_reference<T: Copy + Eq>(
    data: &[T],
    pos: usize,
    window: usize,
    max_match: usize,
) -> Reference {
    let start = pos.saturating_sub(window);
    let search = &data[start..pos];
    let lookahead_end = (pos + max_match).min(data.len());
    let pattern = &data[pos..lookahead_end];
    if search.is_empty() || pattern.is_empty() {
        return Reference::Literal;
    }

    match kmp_longest(search, pattern) {
        // A one-symbol match carries no information beyond the literal.
        Some((length, offset)) if length > 1 => Reference::Match {
            length,
            distance: search.len() - offset,
        },
        _ => Reference::Literal,
    }
}

/// KMP scan of the search buffer for the longest prefix of `pattern`.
///
/// Returns `(length, start_offset)` of the best match, preferring the
/// earliest occurrence on ties. A candidate still alive at the buffer edge
/// continues into the look-ahead itself: past the edge, position `k` of
/// the pattern is compared against position `k - distance`, so a match can
/// grow longer than its distance.
fn kmp_longest<T: Copy + Eq>(search: &[T], pattern: &[T]) -> Option<(usize, usize)> {
    let failure = failure_function(pattern);
    let mut matched = 0usize;
    let mut best_length = 0usize;
    let mut best_start = 0usize;
    let mut full_match = false;

    for (i, &symbol) in search.iter().enumerate() {
        while matched > 0 && symbol != pattern[matched] {
            matched = failure[matched - 1];
        }
        if symbol == pattern[matched] {
            matched += 1;
        }
        if matched > best_length {
            best_length = matched;
            best_start = i + 1 - matched;
        }
        if matched == pattern.len() {
            full_match = true;
            break;
        }
    }

    // The border chain of the final state holds every candidate touching
    // the buffer edge; such a candidate has distance equal to its matched
    // prefix and keeps growing while the pattern repeats at that period.
    // The scan above already recorded each border's earliest occurrence,
    // so a strict improvement is the only reason to move the start.
    if !full_match {
        let mut border = matched;
        while border > 0 && best_length < pattern.len() {
            let mut length = border;
            while length < pattern.len() && pattern[length] == pattern[length - border] {
                length += 1;
            }
            if length > best_length {
                best_length = length;
                best_start = search.len() - border;
            }
            border = failure[border - 1];
        }
    }

    (best_length > 0).then_some((best_length, best_start))
}

/// KMP failure function: `failure[i]` is the length of the longest proper
/// prefix of `pattern[..=i]` that is also a suffix of it.
fn failure_function<T: Copy + Eq>(pattern: &[T]) -> Vec<usize> {
    let mut failure = vec![0usize; pattern.len()];
    for i in 1..pattern.len() {
        let mut j = failure[i - 1];
        while j > 0 && pattern[i] != pattern[j] {
            j = failure[j - 1];
        }
        if pattern[i] == pattern[j] {
            j += 1;
        }
        failure[i] = j;
    }
    failure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(data: &[u8]) -> Vec<Reference> {
        find_references(data, MAX_WINDOW, MAX_MATCH)
    }

    #[test]
    fn test_empty_input() {
        assert!(refs(b"").is_empty());
    }

    #[test]
    fn test_all_distinct_symbols() {
        let references = refs(b"abcdefgh");
        assert_eq!(references.len(), 8);
        assert!(references.iter().all(|r| *r == Reference::Literal));
    }

    #[test]
    fn test_identical_run_extends_past_window_edge() {
        // Position 1 sees a single symbol behind it, but the match keeps
        // going through the look-ahead: seven symbols at distance one.
        let references = refs(b"AAAAAAAA");
        assert_eq!(references[0], Reference::Literal);
        assert_eq!(
            references[1],
            Reference::Match {
                length: 7,
                distance: 1
            }
        );
        assert_eq!(
            references[3],
            Reference::Match {
                length: 5,
                distance: 3
            }
        );
    }

    #[test]
    fn test_period_two_pattern() {
        let references = refs(b"ABABABAB");
        assert_eq!(references[0], Reference::Literal);
        assert_eq!(references[1], Reference::Literal);
        // The whole remaining input repeats at period two.
        assert_eq!(
            references[2],
            Reference::Match {
                length: 6,
                distance: 2
            }
        );
        assert_eq!(
            references[4],
            Reference::Match {
                length: 4,
                distance: 4
            }
        );
    }

    #[test]
    fn test_repeated_phrase() {
        let data = b"abcdefghijabcdefghij";
        let references = refs(data);
        assert_eq!(
            references[10],
            Reference::Match {
                length: 10,
                distance: 10
            }
        );
    }

    #[test]
    fn test_earliest_occurrence_wins_tie() {
        // "xyz" occurs at offsets 0 and 4 of the window; both give length 3.
        let data = b"xyzqxyzqxyz";
        let references = refs(data);
        assert_eq!(
            references[8],
            Reference::Match {
                length: 3,
                distance: 8
            }
        );
    }

    #[test]
    fn test_partial_match_at_end_of_input() {
        // Look-ahead at position 8 is only "ab": shorter than the window copy.
        let data = b"abcdefghab";
        let references = refs(data);
        assert_eq!(
            references[8],
            Reference::Match {
                length: 2,
                distance: 8
            }
        );
    }

    #[test]
    fn test_window_bound() {
        // With a 4-position window the first "abc" falls out of reach.
        let data = b"abcdefghabc";
        let references = find_references(data, 4, MAX_MATCH);
        assert_eq!(references[8], Reference::Literal);
    }

    #[test]
    fn test_char_symbols() {
        let chars: Vec<char> = "héhé".chars().collect();
        let references = find_references(&chars, MAX_WINDOW, MAX_MATCH);
        assert_eq!(references.len(), 4);
        assert_eq!(
            references[2],
            Reference::Match {
                length: 2,
                distance: 2
            }
        );
    }

    #[test]
    fn test_length_capped_at_max_match() {
        let data = vec![7u8; 1024];
        let references = find_references(&data, MAX_WINDOW, MAX_MATCH);
        for r in &references {
            if let Reference::Match { length, .. } = *r {
                assert!(length <= MAX_MATCH);
            }
        }
        // Far enough in, the full maximum is reachable without overlap.
        assert_eq!(
            references[512],
            Reference::Match {
                length: MAX_MATCH,
                distance: 512
            }
        );
    }
}
