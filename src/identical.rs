//! The identical level: NFD code points in binary-ordered compression (BOCSU).
//!
//! Each code point is written as the difference to a slope base derived from
//! the previous one, in one to four bytes of `0x03..=0xFF`, so keys keep code
//! point order and never contain the separator bytes.

use unicode_normalization::UnicodeNormalization;

use crate::ce_ty::MERGE_SEPARATOR_BYTE;
use crate::sort_key::ByteSink;

const SLOPE_MIN: i32 = 3;
const SLOPE_MAX: i32 = 0xff;
const SLOPE_MIDDLE: i32 = 0x81;
const SLOPE_TAIL_COUNT: i32 = SLOPE_MAX - SLOPE_MIN + 1;
const SLOPE_SINGLE: i32 = 80;
const SLOPE_LEAD_2: i32 = 42;
const SLOPE_LEAD_3: i32 = 3;

const SLOPE_REACH_POS_1: i32 = SLOPE_SINGLE;
const SLOPE_REACH_NEG_1: i32 = -SLOPE_SINGLE;
const SLOPE_REACH_POS_2: i32 = SLOPE_LEAD_2 * SLOPE_TAIL_COUNT + (SLOPE_LEAD_2 - 1);
const SLOPE_REACH_NEG_2: i32 = -SLOPE_REACH_POS_2 - 1;
const SLOPE_REACH_POS_3: i32 = SLOPE_LEAD_3 * SLOPE_TAIL_COUNT * SLOPE_TAIL_COUNT
    + (SLOPE_LEAD_3 - 1) * SLOPE_TAIL_COUNT
    + (SLOPE_TAIL_COUNT - 1);
const SLOPE_REACH_NEG_3: i32 = -SLOPE_REACH_POS_3 - 1;

const SLOPE_START_POS_2: i32 = SLOPE_MIDDLE + SLOPE_SINGLE + 1;
const SLOPE_START_POS_3: i32 = SLOPE_START_POS_2 + SLOPE_LEAD_2;
const SLOPE_START_NEG_2: i32 = SLOPE_MIDDLE + SLOPE_REACH_NEG_1;
const SLOPE_START_NEG_3: i32 = SLOPE_START_NEG_2 - SLOPE_LEAD_2;

/// Trailing byte and quotient of a floor division by the tail count.
#[inline]
fn tail(diff: &mut i32) -> u8 {
    let m = diff.rem_euclid(SLOPE_TAIL_COUNT);
    *diff = diff.div_euclid(SLOPE_TAIL_COUNT);
    (SLOPE_MIN + m) as u8
}

fn write_diff(mut diff: i32, out: &mut Vec<u8>) {
    if diff >= SLOPE_REACH_NEG_1 {
        if diff <= SLOPE_REACH_POS_1 {
            out.push((SLOPE_MIDDLE + diff) as u8);
        } else if diff <= SLOPE_REACH_POS_2 {
            out.push((SLOPE_START_POS_2 + diff / SLOPE_TAIL_COUNT) as u8);
            out.push((SLOPE_MIN + diff % SLOPE_TAIL_COUNT) as u8);
        } else if diff <= SLOPE_REACH_POS_3 {
            let b2 = tail(&mut diff);
            let b1 = tail(&mut diff);
            out.extend_from_slice(&[(SLOPE_START_POS_3 + diff) as u8, b1, b2]);
        } else {
            let b3 = tail(&mut diff);
            let b2 = tail(&mut diff);
            let b1 = tail(&mut diff);
            out.extend_from_slice(&[SLOPE_MAX as u8, b1, b2, b3]);
        }
    } else if diff >= SLOPE_REACH_NEG_2 {
        let b1 = tail(&mut diff);
        out.extend_from_slice(&[(SLOPE_START_NEG_2 + diff) as u8, b1]);
    } else if diff >= SLOPE_REACH_NEG_3 {
        let b2 = tail(&mut diff);
        let b1 = tail(&mut diff);
        out.extend_from_slice(&[(SLOPE_START_NEG_3 + diff) as u8, b1, b2]);
    } else {
        let b3 = tail(&mut diff);
        let b2 = tail(&mut diff);
        let b1 = tail(&mut diff);
        out.extend_from_slice(&[SLOPE_MIN as u8, b1, b2, b3]);
    }
}

/// Append the BOCSU form of `code_points`, continuing from `prev`. Returns the new `prev`.
///
/// U+FFFE is written as the merge separator and restarts the slope.
pub fn write_identical_level_run(
    prev: i32,
    code_points: impl IntoIterator<Item = u32>,
    sink: &mut impl ByteSink,
) -> i32 {
    let mut prev = prev;
    let mut buffer = Vec::new();
    for c in code_points {
        let c = c as i32;
        prev = if !(0x4e00..0xa000).contains(&prev) {
            (prev & !0x7f) - SLOPE_REACH_NEG_1
        } else {
            // Unihan: two-byte steps down from the top of the block
            0x9fff - SLOPE_REACH_POS_2
        };
        if c == 0xfffe {
            buffer.push(MERGE_SEPARATOR_BYTE);
            prev = 0;
        } else {
            write_diff(c - prev, &mut buffer);
            prev = c;
        }
    }
    sink.append(&buffer);
    prev
}

/// Append the identical level for `text`: its NFD in BOCSU.
pub fn write_identical_level_str(text: &str, sink: &mut impl ByteSink) {
    write_identical_level_run(0, text.nfd().map(u32::from), sink);
}

/// Append the identical level for UTF-16 text. Unpaired surrogates are written as themselves.
pub fn write_identical_level_utf16(units: &[u16], sink: &mut impl ByteSink) {
    write_identical_level_run(0, nfd_utf16(units), sink);
}

/// NFD code points of UTF-16 text, unpaired surrogates passed through.
pub(crate) fn nfd_utf16(units: &[u16]) -> Vec<u32> {
    let mut out = Vec::with_capacity(units.len());
    let mut run = String::new();
    for r in char::decode_utf16(units.iter().copied()) {
        match r {
            Ok(ch) => run.push(ch),
            Err(e) => {
                out.extend(run.nfd().map(u32::from));
                run.clear();
                out.push(e.unpaired_surrogate() as u32);
            }
        }
    }
    out.extend(run.nfd().map(u32::from));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bocsu(s: &str) -> Vec<u8> {
        let mut out = Vec::new();
        write_identical_level_str(s, &mut out);
        out
    }

    #[test]
    fn test_single_bytes() {
        // prev 0 -> base 80; '0' = 0x30 -> diff -32
        assert_eq!(vec![0x61], bocsu("0"));
        // base 0x50 after '1' (0x31 & !0x7f = 0) again
        assert_eq!(vec![0x62, 0x61, 0x62, 0x61], bocsu("1010"));
        assert!(bocsu("0100") < bocsu("100"));
    }

    #[test]
    fn test_multi_byte_diffs() {
        // U+4E00: diff from 80 is 19888 -> three bytes
        let han = bocsu("\u{4e00}");
        assert_eq!(3, han.len());
        // inside Unihan the base is 0x9fff - 10667 -> two bytes
        let two = bocsu("\u{4e00}\u{4e01}");
        assert_eq!(5, two.len());
        let supplementary = bocsu("\u{10ffff}");
        assert_eq!(4, supplementary.len());
        assert_eq!(0xff, supplementary[0]);
        assert!(han < supplementary);
    }

    #[test]
    fn test_no_separator_bytes() {
        let s: String = ['\u{0}', 'a', '\u{7ff}', '\u{4e00}', '\u{0}', '\u{10000}', '\u{1}']
            .iter()
            .collect();
        assert!(bocsu(&s).iter().all(|&b| b >= 3));
    }

    #[test]
    fn test_order_matches_code_points() {
        let mut strings = vec!["", "\u{0}", "a", "ab", "b", "\u{7f}", "\u{80}", "\u{4e00}", "\u{9fff}", "\u{a000}", "\u{10000}"];
        strings.sort();
        for w in strings.windows(2) {
            assert!(bocsu(w[0]) < bocsu(w[1]), "{:?} < {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn test_merge_separator_and_nfd() {
        assert_eq!(vec![0x61, MERGE_SEPARATOR_BYTE, 0x61], bocsu("0\u{fffe}0"));
        assert_eq!(bocsu("a\u{301}"), bocsu("\u{e1}"));
        let units: Vec<u16> = "\u{e1}".encode_utf16().chain([0xd800]).collect();
        let mut out = Vec::new();
        write_identical_level_utf16(&units, &mut out);
        let mut expected = Vec::new();
        write_identical_level_run(0, [0x61, 0x301, 0xd800], &mut expected);
        assert_eq!(expected, out);
        assert_eq!(vec![0x61, 0x301, 0xd800], nfd_utf16(&units));
    }
}
