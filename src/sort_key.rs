//! Sort key encoding.
//!
//! A sort key holds one byte run per level, separated by `0x01`. Runs of the
//! common weight are compressed into a count byte, and consecutive primaries
//! with the same compressible lead byte write it only once.

use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::ce_ty::{
    COMMON_BYTE, COMMON_WEIGHT16, LEVEL_SEPARATOR_BYTE, MERGE_SEPARATOR_BYTE, MERGE_SEPARATOR_PRIMARY,
    NO_CE_PRIMARY, NO_CE_WEIGHT16, PRIMARY_COMPRESSION_HIGH_BYTE, PRIMARY_COMPRESSION_LOW_BYTE,
};
use crate::iter::CollationIterator;
use crate::settings::{CaseFirst, CollationSettings, Strength};
use crate::text::CollationText;

/// Receives sort key bytes.
pub trait ByteSink {
    /// Append `bytes`.
    fn append(&mut self, bytes: &[u8]);

    /// Append one byte.
    fn append_byte(&mut self, b: u8) {
        self.append(&[b]);
    }
}

impl ByteSink for Vec<u8> {
    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    fn append_byte(&mut self, b: u8) {
        self.push(b);
    }
}

const PRIMARY_LEVEL_FLAG: u32 = 0x02;
const SECONDARY_LEVEL_FLAG: u32 = 0x04;
const CASE_LEVEL_FLAG: u32 = 0x08;
const TERTIARY_LEVEL_FLAG: u32 = 0x10;
const QUATERNARY_LEVEL_FLAG: u32 = 0x20;

const SEC_COMMON_LOW: u32 = COMMON_BYTE;
const SEC_COMMON_MIDDLE: u32 = 0x25;
const SEC_COMMON_HIGH: u32 = 0x45;
const SEC_COMMON_MAX_COUNT: u32 = 0x21;

const CASE_LOWER_FIRST_COMMON_LOW: u32 = 1;
const CASE_LOWER_FIRST_COMMON_MIDDLE: u32 = 7;
const CASE_LOWER_FIRST_COMMON_HIGH: u32 = 13;
const CASE_LOWER_FIRST_COMMON_MAX_COUNT: u32 = 7;

const CASE_UPPER_FIRST_COMMON_LOW: u32 = 3;
const CASE_UPPER_FIRST_COMMON_MAX_COUNT: u32 = 13;

const TER_ONLY_COMMON_LOW: u32 = COMMON_BYTE;
const TER_ONLY_COMMON_MIDDLE: u32 = 0x65;
const TER_ONLY_COMMON_HIGH: u32 = 0xc5;
const TER_ONLY_COMMON_MAX_COUNT: u32 = 0x61;

const TER_LOWER_FIRST_COMMON_LOW: u32 = COMMON_BYTE;
const TER_LOWER_FIRST_COMMON_MIDDLE: u32 = 0x25;
const TER_LOWER_FIRST_COMMON_HIGH: u32 = 0x45;
const TER_LOWER_FIRST_COMMON_MAX_COUNT: u32 = 0x21;

const TER_UPPER_FIRST_COMMON_LOW: u32 = 0x85;
const TER_UPPER_FIRST_COMMON_MIDDLE: u32 = 0xa5;
const TER_UPPER_FIRST_COMMON_HIGH: u32 = 0xc5;
const TER_UPPER_FIRST_COMMON_MAX_COUNT: u32 = 0x21;

const QUAT_COMMON_LOW: u32 = 0x1c;
const QUAT_COMMON_MIDDLE: u32 = 0x8c;
const QUAT_COMMON_HIGH: u32 = 0xfc;
const QUAT_COMMON_MAX_COUNT: u32 = 0x71;
/// Written before shifted primaries whose lead byte reaches the common range.
const QUAT_SHIFTED_LIMIT_BYTE: u32 = QUAT_COMMON_LOW - 1;

fn level_mask(strength: Strength) -> u32 {
    match strength {
        Strength::Primary => PRIMARY_LEVEL_FLAG,
        Strength::Secondary => PRIMARY_LEVEL_FLAG | SECONDARY_LEVEL_FLAG,
        Strength::Tertiary => PRIMARY_LEVEL_FLAG | SECONDARY_LEVEL_FLAG | TERTIARY_LEVEL_FLAG,
        Strength::Quaternary | Strength::Identical => {
            PRIMARY_LEVEL_FLAG | SECONDARY_LEVEL_FLAG | TERTIARY_LEVEL_FLAG | QUATERNARY_LEVEL_FLAG
        }
    }
}

/// Bytes of one level above the primary, ending with the NO_CE weight.
#[derive(Default)]
struct SortKeyLevel {
    buffer: SmallVec<[u8; 64]>,
}

impl SortKeyLevel {
    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn append_byte(&mut self, b: u32) {
        self.buffer.push(b as u8);
    }

    fn append_weight16(&mut self, w: u32) {
        debug_assert!(w <= 0xffff);
        self.buffer.push((w >> 8) as u8);
        if w & 0xff != 0 {
            self.buffer.push(w as u8);
        }
    }

    fn append_weight32(&mut self, w: u32) {
        let bytes = w.to_be_bytes();
        let length = if bytes[1] == 0 {
            1
        } else if bytes[2] == 0 {
            2
        } else if bytes[3] == 0 {
            3
        } else {
            4
        };
        self.buffer.extend_from_slice(&bytes[..length]);
    }

    fn append_reverse_weight16(&mut self, w: u32) {
        debug_assert!(w <= 0xffff);
        let b0 = (w >> 8) as u8;
        let b1 = w as u8;
        if b1 != 0 {
            self.buffer.push(b1);
        }
        self.buffer.push(b0);
    }

    /// Write all but the trailing level separator.
    fn append_to(&self, sink: &mut impl ByteSink) {
        debug_assert_eq!(Some(&LEVEL_SEPARATOR_BYTE), self.buffer.last());
        sink.append(&self.buffer[..self.buffer.len() - 1]);
    }
}

/// Append common-weight count bytes: the run of `count` common weights
/// followed by a weight below (`low`) or above (`high`) the common weight.
fn append_common_run(level: &mut SortKeyLevel, count: u32, below: bool, low: u32, middle: u32, high: u32, max_count: u32) {
    let mut count = count - 1;
    while count >= max_count {
        level.append_byte(middle);
        count -= max_count;
    }
    level.append_byte(if below { low + count } else { high - count });
}

/// Write the sort key levels up to quaternary for the rest of `iter`'s text.
///
/// The identical level needs the text itself and is written by the caller.
pub fn write_sort_key<T: CollationText>(
    iter: &mut CollationIterator<'_, T>,
    settings: &CollationSettings,
    sink: &mut impl ByteSink,
) {
    let data = iter.data();
    let options = settings.options();
    let mut levels = level_mask(options.strength);
    if options.case_level {
        levels |= CASE_LEVEL_FLAG;
    }
    let upper_first = options.case_first == CaseFirst::UpperFirst;
    let backward_secondary = options.backward_secondary;
    let shifted = settings.is_shifted();
    // +1 so that primary ignorables fail `p < variable_top` early
    let variable_top = if shifted { settings.variable_top() + 1 } else { 0 };
    let tertiary_mask = settings.tertiary_mask();

    let mut cases = SortKeyLevel::default();
    let mut secondaries = SortKeyLevel::default();
    let mut tertiaries = SortKeyLevel::default();
    let mut quaternaries = SortKeyLevel::default();

    // 0 = no compression
    let mut prev_reordered_primary = 0u32;
    let mut common_cases = 0;
    let mut common_secondaries = 0;
    let mut common_tertiaries = 0;
    let mut common_quaternaries = 0;

    let mut prev_secondary = 0;
    let mut sec_segment_start = 0;

    loop {
        iter.clear_ces_if_none_remaining();
        let mut ce = iter.next_ce();
        let mut p = ce.primary();
        if p < variable_top && p > MERGE_SEPARATOR_PRIMARY {
            // variable: shift to the quaternary level along with following primary ignorables
            if common_quaternaries != 0 {
                // shifted primaries are below the common weight
                append_common_run(
                    &mut quaternaries,
                    common_quaternaries,
                    true,
                    QUAT_COMMON_LOW,
                    QUAT_COMMON_MIDDLE,
                    QUAT_COMMON_HIGH,
                    QUAT_COMMON_MAX_COUNT,
                );
                common_quaternaries = 0;
            }
            loop {
                if levels & QUATERNARY_LEVEL_FLAG != 0 {
                    let p = settings.reorder(p);
                    if p >> 24 >= QUAT_SHIFTED_LIMIT_BYTE {
                        quaternaries.append_byte(QUAT_SHIFTED_LIMIT_BYTE);
                    }
                    quaternaries.append_weight32(p);
                }
                loop {
                    ce = iter.next_ce();
                    p = ce.primary();
                    if p != 0 {
                        break;
                    }
                }
                if !(p < variable_top && p > MERGE_SEPARATOR_PRIMARY) {
                    break;
                }
            }
        }

        // ce is primary ignorable, NO_CE, the merge separator or a regular non-variable CE
        if p > NO_CE_PRIMARY && levels & PRIMARY_LEVEL_FLAG != 0 {
            // compressibility goes by the original lead byte
            let is_compressible = data.is_compressible_primary(p);
            let p = settings.reorder(p);
            let p1 = p >> 24;
            if !is_compressible || p1 != prev_reordered_primary >> 24 {
                if prev_reordered_primary != 0 {
                    if p < prev_reordered_primary {
                        // no terminator before the end of the level or a merged segment
                        if p1 > MERGE_SEPARATOR_BYTE as u32 {
                            sink.append_byte(PRIMARY_COMPRESSION_LOW_BYTE);
                        }
                    } else {
                        sink.append_byte(PRIMARY_COMPRESSION_HIGH_BYTE);
                    }
                }
                sink.append_byte(p1 as u8);
                prev_reordered_primary = if is_compressible { p } else { 0 };
            }
            let rest = [(p >> 16) as u8, (p >> 8) as u8, p as u8];
            if rest[0] != 0 {
                let length = if rest[1] == 0 {
                    1
                } else if rest[2] == 0 {
                    2
                } else {
                    3
                };
                sink.append(&rest[..length]);
            }
        }

        let lower32 = ce.lower32();
        if lower32 == 0 {
            continue;
        }

        if levels & SECONDARY_LEVEL_FLAG != 0 {
            let s = lower32 >> 16;
            if s == 0 {
                // secondary ignorable
            } else if s == COMMON_WEIGHT16 && (!backward_secondary || p != MERGE_SEPARATOR_PRIMARY) {
                common_secondaries += 1;
            } else if !backward_secondary {
                if common_secondaries != 0 {
                    append_common_run(
                        &mut secondaries,
                        common_secondaries,
                        s < COMMON_WEIGHT16,
                        SEC_COMMON_LOW,
                        SEC_COMMON_MIDDLE,
                        SEC_COMMON_HIGH,
                        SEC_COMMON_MAX_COUNT,
                    );
                    common_secondaries = 0;
                }
                secondaries.append_weight16(s);
            } else {
                if common_secondaries != 0 {
                    // written reversed; the segment is flipped at its end
                    common_secondaries -= 1;
                    let remainder = common_secondaries % SEC_COMMON_MAX_COUNT;
                    let b = if prev_secondary < COMMON_WEIGHT16 {
                        SEC_COMMON_LOW + remainder
                    } else {
                        SEC_COMMON_HIGH - remainder
                    };
                    secondaries.append_byte(b);
                    common_secondaries -= remainder;
                    while common_secondaries > 0 {
                        secondaries.append_byte(SEC_COMMON_MIDDLE);
                        common_secondaries -= SEC_COMMON_MAX_COUNT;
                    }
                }
                if 0 < p && p <= MERGE_SEPARATOR_PRIMARY {
                    // segments end at merge separators and at the end of the text
                    secondaries.buffer[sec_segment_start..].reverse();
                    secondaries.append_byte(if p == NO_CE_PRIMARY {
                        LEVEL_SEPARATOR_BYTE as u32
                    } else {
                        MERGE_SEPARATOR_BYTE as u32
                    });
                    prev_secondary = 0;
                    sec_segment_start = secondaries.buffer.len();
                } else {
                    secondaries.append_reverse_weight16(s);
                    prev_secondary = s;
                }
            }
        }

        if levels & CASE_LEVEL_FLAG != 0 {
            let ignorable = if options.strength == Strength::Primary {
                p == 0
            } else {
                lower32 <= 0xffff
            };
            if !ignorable {
                // case bits and tertiary lead byte
                let mut c = (lower32 >> 8) & 0xff;
                debug_assert_ne!(0xc0, c & 0xc0);
                if c & 0xc0 == 0 && c > LEVEL_SEPARATOR_BYTE as u32 {
                    common_cases += 1;
                } else {
                    if !upper_first {
                        // lowercase nibbles 1..7..13, mixed 14, upper 15
                        if common_cases != 0 && (c > LEVEL_SEPARATOR_BYTE as u32 || !cases.is_empty()) {
                            common_cases -= 1;
                            while common_cases >= CASE_LOWER_FIRST_COMMON_MAX_COUNT {
                                cases.append_byte(CASE_LOWER_FIRST_COMMON_MIDDLE << 4);
                                common_cases -= CASE_LOWER_FIRST_COMMON_MAX_COUNT;
                            }
                            let b = if c <= LEVEL_SEPARATOR_BYTE as u32 {
                                CASE_LOWER_FIRST_COMMON_LOW + common_cases
                            } else {
                                CASE_LOWER_FIRST_COMMON_HIGH - common_cases
                            };
                            cases.append_byte(b << 4);
                            common_cases = 0;
                        }
                        if c > LEVEL_SEPARATOR_BYTE as u32 {
                            c = (CASE_LOWER_FIRST_COMMON_HIGH + (c >> 6)) << 4;
                        }
                    } else {
                        // lowercase nibbles 3..15, mixed 2, upper 1
                        if common_cases != 0 {
                            common_cases -= 1;
                            while common_cases >= CASE_UPPER_FIRST_COMMON_MAX_COUNT {
                                cases.append_byte(CASE_UPPER_FIRST_COMMON_LOW << 4);
                                common_cases -= CASE_UPPER_FIRST_COMMON_MAX_COUNT;
                            }
                            cases.append_byte((CASE_UPPER_FIRST_COMMON_LOW + common_cases) << 4);
                            common_cases = 0;
                        }
                        if c > LEVEL_SEPARATOR_BYTE as u32 {
                            c = (CASE_UPPER_FIRST_COMMON_LOW - (c >> 6)) << 4;
                        }
                    }
                    // a separator or a nibble in the high half
                    cases.append_byte(c);
                }
            }
        }

        if levels & TERTIARY_LEVEL_FLAG != 0 {
            let mut t = lower32 & tertiary_mask;
            debug_assert_ne!(0xc000, lower32 & 0xc000);
            if t == COMMON_WEIGHT16 {
                common_tertiaries += 1;
            } else if tertiary_mask & 0x8000 == 0 {
                // no case bits: lead bytes 06..3F move to C6..FF
                if common_tertiaries != 0 {
                    append_common_run(
                        &mut tertiaries,
                        common_tertiaries,
                        t < COMMON_WEIGHT16,
                        TER_ONLY_COMMON_LOW,
                        TER_ONLY_COMMON_MIDDLE,
                        TER_ONLY_COMMON_HIGH,
                        TER_ONLY_COMMON_MAX_COUNT,
                    );
                    common_tertiaries = 0;
                }
                if t > COMMON_WEIGHT16 {
                    t += 0xc000;
                }
                tertiaries.append_weight16(t);
            } else if !upper_first {
                // lower first: lead bytes 06..BF move to 46..FF
                if common_tertiaries != 0 {
                    append_common_run(
                        &mut tertiaries,
                        common_tertiaries,
                        t < COMMON_WEIGHT16,
                        TER_LOWER_FIRST_COMMON_LOW,
                        TER_LOWER_FIRST_COMMON_MIDDLE,
                        TER_LOWER_FIRST_COMMON_HIGH,
                        TER_LOWER_FIRST_COMMON_MAX_COUNT,
                    );
                    common_tertiaries = 0;
                }
                if t > COMMON_WEIGHT16 {
                    t += 0x4000;
                }
                tertiaries.append_weight16(t);
            } else {
                // upper first:
                // separator 01 stays, lowercase 02..04 -> 82..84, common 05 -> 85..C5,
                // lowercase 06..3F -> C6..FF, mixed 42..7F stays, uppercase 82..BF -> 02..3F,
                // tertiary CEs 86..BF -> C6..FF
                if t <= NO_CE_WEIGHT16 {
                    // separators
                } else if lower32 > 0xffff {
                    t ^= 0xc000;
                    if t < TER_UPPER_FIRST_COMMON_HIGH << 8 {
                        t -= 0x4000;
                    }
                } else {
                    // tertiary CEs keep their uppercase bits
                    debug_assert!((0x8600..=0xbfff).contains(&t));
                    t += 0x4000;
                }
                if common_tertiaries != 0 {
                    append_common_run(
                        &mut tertiaries,
                        common_tertiaries,
                        t < TER_UPPER_FIRST_COMMON_LOW << 8,
                        TER_UPPER_FIRST_COMMON_LOW,
                        TER_UPPER_FIRST_COMMON_MIDDLE,
                        TER_UPPER_FIRST_COMMON_HIGH,
                        TER_UPPER_FIRST_COMMON_MAX_COUNT,
                    );
                    common_tertiaries = 0;
                }
                tertiaries.append_weight16(t);
            }
        }

        if levels & QUATERNARY_LEVEL_FLAG != 0 {
            let mut q = lower32 & 0xffff;
            if q & 0xc0 == 0 && q > NO_CE_WEIGHT16 {
                common_quaternaries += 1;
            } else if q == NO_CE_WEIGHT16 && !shifted && quaternaries.is_empty() {
                // only common weights, nothing to write
                quaternaries.append_byte(LEVEL_SEPARATOR_BYTE as u32);
            } else {
                q = if q == NO_CE_WEIGHT16 {
                    LEVEL_SEPARATOR_BYTE as u32
                } else {
                    0xfc + ((q >> 6) & 3)
                };
                if common_quaternaries != 0 {
                    append_common_run(
                        &mut quaternaries,
                        common_quaternaries,
                        q < QUAT_COMMON_LOW,
                        QUAT_COMMON_LOW,
                        QUAT_COMMON_MIDDLE,
                        QUAT_COMMON_HIGH,
                        QUAT_COMMON_MAX_COUNT,
                    );
                    common_quaternaries = 0;
                }
                quaternaries.append_byte(q);
            }
        }

        // NO_CE
        if lower32 >> 24 == LEVEL_SEPARATOR_BYTE as u32 {
            break;
        }
    }

    if levels & SECONDARY_LEVEL_FLAG != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);
        secondaries.append_to(sink);
    }

    if levels & CASE_LEVEL_FLAG != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);
        // nibble pairs as bytes, without the trailing NO_CE
        let length = cases.buffer.len().saturating_sub(1);
        let mut b = 0u8;
        for &c in &cases.buffer[..length] {
            debug_assert!(c & 0xf == 0 && c != 0);
            if b == 0 {
                b = c;
            } else {
                sink.append_byte(b | (c >> 4));
                b = 0;
            }
        }
        if b != 0 {
            sink.append_byte(b);
        }
    }

    if levels & TERTIARY_LEVEL_FLAG != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);
        tertiaries.append_to(sink);
    }

    if levels & QUATERNARY_LEVEL_FLAG != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);
        quaternaries.append_to(sink);
    }
}

/// An owned sort key. Keys compare as unsigned bytes.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(Box<[u8]>);

impl SortKey {
    /// Key from raw bytes.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        SortKey(bytes.into())
    }

    /// The key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Join keys level by level with the merge separator.
    ///
    /// The result orders like the sort key of the texts joined with U+FFFE.
    pub fn merge(keys: &[&SortKey]) -> SortKey {
        let mut keys = keys.iter();
        let first = match keys.next() {
            Some(first) => first.0.to_vec(),
            None => return SortKey::default(),
        };
        let merged = keys.fold(first, |merged, key| merge_two(&merged, &key.0));
        SortKey(merged.into_boxed_slice())
    }
}

fn merge_two(left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(left.len() + right.len() + 8);
    let (mut i, mut j) = (0, 0);
    loop {
        // copy one level of each, up to the separator or the end
        while i < left.len() && left[i] > LEVEL_SEPARATOR_BYTE {
            out.push(left[i]);
            i += 1;
        }
        out.push(MERGE_SEPARATOR_BYTE);
        while j < right.len() && right[j] > LEVEL_SEPARATOR_BYTE {
            out.push(right[j]);
            j += 1;
        }
        if i < left.len() && j < right.len() {
            // both have another level
            i += 1;
            j += 1;
            out.push(LEVEL_SEPARATOR_BYTE);
        } else {
            break;
        }
    }
    // levels only the longer key has
    if i < left.len() {
        out.extend_from_slice(&left[i..]);
    } else {
        out.extend_from_slice(&right[j..]);
    }
    out
}

impl Deref for SortKey {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SortKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SortKey {
    fn from(bytes: Vec<u8>) -> Self {
        SortKey(bytes.into_boxed_slice())
    }
}

impl fmt::Debug for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SortKey[")?;
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Alternate, CollatorOptions};
    use crate::test_data::root;
    use crate::text::Utf8Text;

    fn key_with(s: &str, options: CollatorOptions) -> Vec<u8> {
        let settings = CollationSettings::new(root(), options).unwrap();
        let mut iter = CollationIterator::new(root(), Utf8Text::new(s), settings.numeric());
        let mut key = Vec::new();
        write_sort_key(&mut iter, &settings, &mut key);
        key
    }

    fn key(s: &str) -> Vec<u8> {
        key_with(s, CollatorOptions::default())
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(vec![0x0a, 0x10, 0x01, 0x05, 0x01, 0x05], key("a"));
        // compressible lead byte written once
        assert_eq!(vec![0x0a, 0x10, 0x14, 0x01, 0x06, 0x01, 0x06], key("ab"));
        assert_eq!(vec![0x0a, 0x10, 0x01, 0x05, 0x01, 0xcf], key("A"));
        assert_eq!(vec![0x01, 0x01], key(""));
    }

    #[test]
    fn test_primary_compression_terminators() {
        // a (0A) then space (03) then a: low terminator before going down, none at the end
        assert_eq!(&[0x0a, 0x10, 0x03, 0x03, 0x05, 0x0a, 0x10][..], &key("a a")[..7]);
        // a then Greek (0D): high terminator
        let greek = key("a\u{3b1}");
        assert_eq!(&[0x0a, 0x10, 0xff, 0x0d][..], &greek[..4]);
    }

    #[test]
    fn test_order() {
        let words = ["", " ", "-", "a", "A", "\u{e1}", "ab", "b", "d", "ch", "\u{3b1}", "\u{4e00}"];
        for w in words.windows(2) {
            assert!(key(w[0]) < key(w[1]), "{:?} < {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn test_strength_levels() {
        let primary = CollatorOptions::with_strength(Strength::Primary);
        assert_eq!(vec![0x0a, 0x10], key_with("A", primary.clone()));
        assert_eq!(key_with("\u{e1}", primary.clone()), key_with("a", primary));
        let secondary = CollatorOptions::with_strength(Strength::Secondary);
        assert_eq!(key_with("A", secondary.clone()), key_with("a", secondary.clone()));
        assert_ne!(key_with("\u{e1}", secondary.clone()), key_with("a", secondary));
    }

    #[test]
    fn test_common_secondary_runs() {
        // 40 commons followed by a higher weight: a middle byte then high - rest
        let s = "a".repeat(40) + "\u{301}";
        let k = key(&s);
        let sec_start = k.iter().position(|&b| b == 0x01).unwrap() + 1;
        assert_eq!(&[0x25, 0x45 - 6, 0x8c][..], &k[sec_start..sec_start + 3]);
    }

    #[test]
    fn test_shifted_quaternary() {
        let options = CollatorOptions {
            strength: Strength::Quaternary,
            alternate: Alternate::Shifted,
            ..Default::default()
        };
        let with_dash = key_with("-a", options.clone());
        let plain = key_with("a", options.clone());
        // identical through tertiary
        let tertiary_len = plain.len() - 2;
        assert_eq!(plain[..tertiary_len], with_dash[..tertiary_len]);
        assert_eq!(&[0x01, 0x1c][..], &plain[tertiary_len..]);
        assert_eq!(&[0x01, 0x04, 0x05, 0x1c][..], &with_dash[tertiary_len..]);
        assert!(with_dash < plain);
        // not shifted: only common quaternaries, empty level
        let non_ignorable = key_with("a", CollatorOptions::with_strength(Strength::Quaternary));
        assert_eq!(vec![0x0a, 0x10, 0x01, 0x05, 0x01, 0x05, 0x01], non_ignorable);
    }

    #[test]
    fn test_case_first_and_case_level() {
        let upper_first = CollatorOptions {
            case_first: CaseFirst::UpperFirst,
            ..Default::default()
        };
        assert_eq!(vec![0x0a, 0x10, 0x01, 0x05, 0x01, 0x85], key_with("a", upper_first.clone()));
        assert_eq!(vec![0x0a, 0x10, 0x01, 0x05, 0x01, 0x0f], key_with("A", upper_first.clone()));
        assert!(key_with("A", upper_first.clone()) < key_with("a", upper_first));

        let case_level = CollatorOptions {
            strength: Strength::Primary,
            case_level: true,
            ..Default::default()
        };
        assert_eq!(vec![0x0a, 0x10, 0x01], key_with("a", case_level.clone()));
        assert_eq!(vec![0x0a, 0x10, 0x01, 0xf0], key_with("A", case_level.clone()));
        // lowercase nibble D, uppercase nibble F
        assert_eq!(vec![0x0a, 0x10, 0x14, 0x01, 0xdf], key_with("aB", case_level));
    }

    #[test]
    fn test_backward_secondary() {
        let french = CollatorOptions {
            backward_secondary: true,
            ..Default::default()
        };
        // accent on the last letter weighs more than on the first
        let first = key_with("\u{e1}b", french.clone());
        let last = key_with("ab\u{301}", french.clone());
        assert!(last > first);
        assert!(key("ab\u{301}") < key("\u{e1}b"));
    }

    #[test]
    fn test_merge() {
        let a = SortKey::from(key("a"));
        let b = SortKey::from(key("b"));
        let merged = SortKey::merge(&[&a, &b]);
        assert_eq!(
            &[0x0a, 0x10, 0x02, 0x0a, 0x14, 0x01, 0x05, 0x02, 0x05, 0x01, 0x05, 0x02, 0x05][..],
            &merged[..]
        );
        assert_eq!(a, SortKey::merge(&[&a]));
        assert!(SortKey::merge(&[]).is_empty());
        // a shorter first key keeps merged order
        let ab = SortKey::from(key("ab"));
        assert!(SortKey::merge(&[&a, &b]) < SortKey::merge(&[&ab, &a]));
    }

    #[test]
    fn test_debug_is_hex() {
        assert_eq!("SortKey[0a 10 01 05]", format!("{:?}", SortKey::from(vec![0x0a, 0x10, 0x01, 0x05])));
    }
}
