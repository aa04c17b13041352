//! Compact path encoding: the flag-prefixed, nibble-packed byte layout
//! used to describe Extension and Leaf paths (§6).
//!
//! | high-nibble flag | meaning                      | low-nibble of first byte |
//! |---|---|---|
//! | 0 | Extension, even path length   | zero-padding nibble |
//! | 1 | Extension, odd path length    | first path nibble |
//! | 2 | Leaf, even path length        | zero-padding nibble |
//! | 3 | Leaf, odd path length         | first path nibble |

use crate::nibble::TERMINATOR;

const FLAG_TERMINATOR: u8 = 2;
const FLAG_ODD: u8 = 1;

/// Encode a nibble sequence, optionally terminated by [`TERMINATOR`], into
/// its compact byte form.
pub fn compact_encode(nibbles: &[u8]) -> Vec<u8> {
    let (is_leaf, body) = match nibbles.split_last() {
        Some((&TERMINATOR, rest)) => (true, rest),
        _ => (false, nibbles),
    };
    let odd = body.len() % 2 == 1;
    let mut expanded = Vec::with_capacity(body.len() + 2);
    let flag = (if is_leaf { FLAG_TERMINATOR } else { 0 }) | (if odd { FLAG_ODD } else { 0 });
    expanded.push(flag);
    if !odd {
        expanded.push(0);
    }
    expanded.extend_from_slice(body);

    pack_nibbles(&expanded)
}

/// Decode a compact-encoded byte sequence back into its nibble sequence.
/// The returned sequence never includes the terminator; callers distinguish
/// Leaf from Extension via [`is_leaf_flag`] on the first byte.
pub fn compact_decode(bytes: &[u8]) -> Vec<u8> {
    let expanded = unpack_bytes(bytes);
    if expanded.is_empty() {
        return Vec::new();
    }
    let flag = expanded[0];
    let even = flag & FLAG_ODD == 0;
    let skip = if even { 2 } else { 1 };
    expanded[skip..].to_vec()
}

/// True iff the high nibble of `flag_byte` marks a Leaf (flag >= 2).
pub fn is_leaf_flag(flag_byte: u8) -> bool {
    (flag_byte >> 4) >= FLAG_TERMINATOR
}

fn pack_nibbles(nibbles: &[u8]) -> Vec<u8> {
    nibbles
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => (hi << 4) | lo,
            [hi] => hi << 4,
            _ => unreachable!(),
        })
        .collect()
}

fn unpack_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(b >> 4);
        out.push(b & 0x0f);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_even_length_extension() {
        let nibbles = vec![1, 2, 3, 4, 5, 6];
        let encoded = compact_encode(&nibbles);
        assert_eq!(compact_decode(&encoded), nibbles);
        assert!(!is_leaf_flag(encoded[0]));
    }

    #[test]
    fn round_trips_odd_length_extension() {
        let nibbles = vec![1, 2, 3, 4, 5];
        let encoded = compact_encode(&nibbles);
        assert_eq!(compact_decode(&encoded), nibbles);
        assert!(!is_leaf_flag(encoded[0]));
    }

    #[test]
    fn round_trips_leaf_path_stripping_terminator() {
        let with_term = vec![0, 15, 1, 12, 11, 8, TERMINATOR];
        let encoded = compact_encode(&with_term);
        assert_eq!(compact_decode(&encoded), vec![0, 15, 1, 12, 11, 8]);
        assert!(is_leaf_flag(encoded[0]));
    }

    #[test]
    fn scenario_two_from_spec() {
        let a = vec![1, 2, 3, 4, 5];
        assert_eq!(compact_decode(&compact_encode(&a)), a);

        let b = vec![0, 1, 2, 3, 4, 5];
        assert_eq!(compact_decode(&compact_encode(&b)), b);

        let c = vec![0, 15, 1, 12, 11, 8, TERMINATOR];
        assert_eq!(compact_decode(&compact_encode(&c)), vec![0, 15, 1, 12, 11, 8]);
    }

    #[test]
    fn empty_path_round_trips() {
        let empty: Vec<u8> = vec![];
        assert_eq!(compact_decode(&compact_encode(&empty)), empty);
        let just_terminator = vec![TERMINATOR];
        assert_eq!(compact_decode(&compact_encode(&just_terminator)), Vec::<u8>::new());
    }
}
