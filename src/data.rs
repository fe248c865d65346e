//! Runtime collation data: the trie and the arrays its special values index into.

use std::sync::Arc;

use icu_collections::codepointinvlist::CodePointInversionList;

use crate::ce_ty::{Ce, Ce32, Ce32Kind, Tag, TRAIL_WEIGHT_BYTE};
use crate::error::{Error, Result};
use crate::fcd;
use crate::settings::reorder_code;
use crate::trie::CodePointTrie;
use crate::weights;

/// Immutable collation data: the code point trie plus the arenas its special
/// CE32s point into.
///
/// A tailoring maps only what it changes and marks everything else with the
/// fallback CE32, which sends lookups to `base`.
#[derive(Debug)]
pub struct CollationData {
    pub(crate) trie: CodePointTrie,
    pub(crate) ce32s: Box<[u32]>,
    pub(crate) ces: Box<[u64]>,
    pub(crate) contexts: Box<[u32]>,
    pub(crate) base: Option<Arc<CollationData>>,
    pub(crate) jamo_ce32s: [u32; hangul::JAMO_CE32S_LENGTH],
    pub(crate) lead_ce32s: Box<[u32]>,
    pub(crate) numeric_primary: u32,
    pub(crate) compressible_bytes: [bool; 256],
    pub(crate) unsafe_backward: CodePointInversionList<'static>,
    pub(crate) num_scripts: usize,
    pub(crate) scripts_index: Box<[u16]>,
    pub(crate) script_starts: Box<[u16]>,
}

/// Hangul syllable arithmetic and the layout of the Jamo CE32 cache.
pub(crate) mod hangul {
    pub const SYLLABLE_BASE: u32 = 0xac00;
    pub const SYLLABLE_END: u32 = 0xd7a3;
    pub const JAMO_L_BASE: u32 = 0x1100;
    pub const JAMO_V_BASE: u32 = 0x1161;
    pub const JAMO_T_BASE: u32 = 0x11a7;
    pub const JAMO_L_COUNT: u32 = 19;
    pub const JAMO_V_COUNT: u32 = 21;
    pub const JAMO_T_COUNT: u32 = 28;
    /// L, V, then T without the "no trailing consonant" slot.
    pub const JAMO_CE32S_LENGTH: usize = (JAMO_L_COUNT + JAMO_V_COUNT + JAMO_T_COUNT - 1) as usize;

    #[inline]
    pub fn is_syllable(c: u32) -> bool {
        (SYLLABLE_BASE..=SYLLABLE_END).contains(&c)
    }

    /// Cache slot for a conjoining Jamo.
    pub fn jamo_index(c: u32) -> Option<usize> {
        if (JAMO_L_BASE..JAMO_L_BASE + JAMO_L_COUNT).contains(&c) {
            Some((c - JAMO_L_BASE) as usize)
        } else if (JAMO_V_BASE..JAMO_V_BASE + JAMO_V_COUNT).contains(&c) {
            Some((JAMO_L_COUNT + c - JAMO_V_BASE) as usize)
        } else if (JAMO_T_BASE + 1..JAMO_T_BASE + JAMO_T_COUNT).contains(&c) {
            Some((JAMO_L_COUNT + JAMO_V_COUNT + c - JAMO_T_BASE - 1) as usize)
        } else {
            None
        }
    }

    /// L, V and T indices of a syllable; T is 0 without a trailing consonant.
    pub fn decompose(c: u32) -> (u32, u32, u32) {
        let s = c - SYLLABLE_BASE;
        let t = s % JAMO_T_COUNT;
        let s = s / JAMO_T_COUNT;
        (s / JAMO_V_COUNT, s % JAMO_V_COUNT, t)
    }
}

impl CollationData {
    /// Raw CE32 from the trie, possibly the fallback CE32.
    #[inline]
    pub fn get_ce32(&self, c: u32) -> Ce32 {
        Ce32(self.trie.get(c))
    }

    /// The data this tailoring falls back to.
    #[inline]
    pub fn base(&self) -> Option<&Arc<CollationData>> {
        self.base.as_ref()
    }

    /// The data that actually maps `c`, following fallback links, and its CE32.
    pub fn resolve(&self, c: u32) -> (&CollationData, Ce32) {
        let mut d = self;
        let mut ce32 = d.get_ce32(c);
        while ce32 == Ce32::FALLBACK {
            match d.base.as_deref() {
                Some(base) => {
                    d = base;
                    ce32 = d.get_ce32(c);
                }
                None => panic!("fallback CE32 for U+{:04X} in data without a base", c),
            }
        }
        (d, ce32)
    }

    /// CE32 at `index` of the CE32 arena.
    #[inline]
    pub fn ce32_at(&self, index: usize) -> Ce32 {
        Ce32(self.ce32s[index])
    }

    /// CE at `index` of the CE arena.
    #[inline]
    pub fn ce_at(&self, index: usize) -> Ce {
        Ce(self.ces[index])
    }

    /// Default CE32 of the context entry at `index`.
    #[inline]
    pub fn get_ce32_from_contexts(&self, index: usize) -> Ce32 {
        Ce32(self.contexts[index])
    }

    /// The contexts arena.
    #[inline]
    pub fn contexts(&self) -> &[u32] {
        &self.contexts
    }

    /// Replace a digit, lead-surrogate or U+0000 CE32 with the CE32 used outside those roles.
    pub fn get_indirect_ce32(&self, ce32: Ce32) -> Ce32 {
        match ce32.decode() {
            Ce32Kind::Digit { index, .. } => self.ce32_at(index),
            Ce32Kind::LeadSurrogate { .. } => Ce32::UNASSIGNED,
            Ce32Kind::U0000 => self.ce32_at(0),
            _ => ce32,
        }
    }

    /// [`Self::get_indirect_ce32`] for special CE32s, identity otherwise.
    #[inline]
    pub fn get_final_ce32(&self, ce32: Ce32) -> Ce32 {
        if ce32.is_special() {
            self.get_indirect_ce32(ce32)
        } else {
            ce32
        }
    }

    /// CE32 for a UTF-16 lead surrogate code unit when reading UTF-16 text.
    #[inline]
    pub fn lead_surrogate_ce32(&self, unit: u16) -> Ce32 {
        Ce32(self.lead_ce32s[(unit as usize) & 0x3ff])
    }

    /// CE32 cached for the Jamo at cache slot `index`.
    #[inline]
    pub fn jamo_ce32(&self, index: usize) -> Ce32 {
        Ce32(self.jamo_ce32s[index])
    }

    /// Whether `c` is a decimal digit with a digit CE32.
    pub fn is_digit(&self, c: u32) -> bool {
        if c < 0x660 {
            (0x30..=0x39).contains(&c)
        } else {
            self.resolve(c).1.has_tag(Tag::Digit)
        }
    }

    /// Whether backward iteration must not start a lookup at `c`.
    pub fn is_unsafe_backward(&self, c: u32, numeric: bool) -> bool {
        self.unsafe_backward.contains32(c) || fcd::lccc(c) != 0 || (numeric && self.is_digit(c))
    }

    /// Whether primaries with this lead byte compress in sort keys.
    #[inline]
    pub fn is_compressible_lead_byte(&self, b: u32) -> bool {
        self.compressible_bytes[(b & 0xff) as usize]
    }

    /// Whether `p`'s lead byte is compressible.
    #[inline]
    pub fn is_compressible_primary(&self, p: u32) -> bool {
        self.is_compressible_lead_byte(p >> 24)
    }

    /// First primary of the numeric digit range.
    #[inline]
    pub fn numeric_primary(&self) -> u32 {
        self.numeric_primary
    }

    /// CE for `c` in an offset range described by `ce32`.
    pub fn get_ce_from_offset_ce32(&self, c: u32, ce32: Ce32) -> Ce {
        let data_ce = self.ce_at(ce32.index());
        Ce::from_primary(weights::three_byte_primary_for_offset_data(c, data_ce))
    }

    /// The one CE `c` maps to.
    ///
    /// Fails for mappings that need the iterator: expansions of more than one CE,
    /// contexts, Hangul syllables and lead surrogates.
    pub fn get_single_ce(&self, c: u32) -> Result<Ce> {
        let (d, mut ce32) = self.resolve(c);
        loop {
            match ce32.decode() {
                Ce32Kind::Simple => return Ok(ce32.simple_to_ce()),
                Ce32Kind::LatinExpansion
                | Ce32Kind::Prefix { .. }
                | Ce32Kind::Contraction { .. }
                | Ce32Kind::Hangul { .. }
                | Ce32Kind::LeadSurrogate { .. } => return Err(Error::NotSingleCe(c)),
                Ce32Kind::Fallback | Ce32Kind::Reserved3 | Ce32Kind::BuilderData => {
                    return Err(Error::internal(format!(
                        "unexpected {:?} for U+{:04X}",
                        ce32.tag(),
                        c
                    )))
                }
                Ce32Kind::LongPrimary(_) | Ce32Kind::LongSecondary(_) => return Ok(ce32.to_ce()),
                Ce32Kind::Expansion32 { index, length: 1 } => ce32 = d.ce32_at(index),
                Ce32Kind::Expansion { index, length: 1 } => return Ok(d.ce_at(index)),
                Ce32Kind::Expansion32 { .. } | Ce32Kind::Expansion { .. } => {
                    return Err(Error::NotSingleCe(c))
                }
                Ce32Kind::Digit { index, .. } => ce32 = d.ce32_at(index),
                Ce32Kind::U0000 => ce32 = d.ce32_at(0),
                Ce32Kind::Offset { .. } => return Ok(d.get_ce_from_offset_ce32(c, ce32)),
                Ce32Kind::Implicit => return Ok(weights::unassigned_ce(c as i32)),
            }
        }
    }

    fn script_index(&self, code: i32) -> usize {
        let index = if code < 0 {
            0
        } else if (code as usize) < self.num_scripts {
            self.scripts_index[code as usize]
        } else if code < reorder_code::FIRST {
            0
        } else {
            let special = (code - reorder_code::FIRST) as usize;
            if special < reorder_code::NUM_SPECIAL_SLOTS {
                self.scripts_index.get(self.num_scripts + special).copied().unwrap_or(0)
            } else {
                0
            }
        };
        index as usize
    }

    /// First primary of a script or special group, 0 if the data has no such group.
    pub fn get_first_primary_for_group(&self, code: i32) -> u32 {
        match self.script_index(code) {
            0 => 0,
            index => (self.script_starts[index] as u32) << 16,
        }
    }

    /// Last primary of a script or special group, 0 if the data has no such group.
    pub fn get_last_primary_for_group(&self, code: i32) -> u32 {
        match self.script_index(code) {
            0 => 0,
            index => ((self.script_starts[index + 1] as u32) << 16) - 1,
        }
    }

    /// The script or special group containing primary `p`.
    pub fn get_group_for_primary(&self, p: u32) -> Option<i32> {
        let p = (p >> 16) as u16;
        let starts = &self.script_starts;
        if starts.len() < 2 || p < starts[1] || starts[starts.len() - 1] <= p {
            return None;
        }
        let mut index = 1;
        while p >= starts[index + 1] {
            index += 1;
        }
        let index = index as u16;
        if let Some(script) = self.scripts_index[..self.num_scripts].iter().position(|&i| i == index) {
            return Some(script as i32);
        }
        self.scripts_index[self.num_scripts..]
            .iter()
            .take(reorder_code::MAX_NUM_SPECIAL)
            .position(|&i| i == index)
            .map(|special| reorder_code::FIRST + special as i32)
    }

    /// Lead byte permutation for the given group order, as `(limit << 16) | offset` pairs.
    ///
    /// An empty result means no reordering.
    pub fn make_reorder_ranges(&self, codes: &[i32]) -> Result<Vec<u32>> {
        self.make_reorder_ranges_impl(codes, false)
    }

    fn make_reorder_ranges_impl(&self, codes: &[i32], latin_must_move: bool) -> Result<Vec<u32>> {
        let mut ranges = Vec::new();
        if codes.is_empty() || (codes.len() == 1 && codes[0] == reorder_code::NONE) {
            return Ok(ranges);
        }
        let starts = &self.script_starts;
        if starts.len() < 2 {
            return Err(Error::invalid_groups("data has no reorder groups"));
        }
        let num_starts = starts.len();

        // new lead byte per range; 0 = not yet placed, 0xff = reserved "don't care"
        let mut table = vec![0u8; num_starts];
        for reserved in [reorder_code::RESERVED_BEFORE_LATIN, reorder_code::RESERVED_AFTER_LATIN] {
            let index = self.scripts_index[self.num_scripts + (reserved - reorder_code::FIRST) as usize];
            if index != 0 {
                table[index as usize] = 0xff;
            }
        }

        let mut low_start = starts[1] as u32;
        let mut high_limit = starts[num_starts - 1] as u32;
        debug_assert_eq!(TRAIL_WEIGHT_BYTE << 8, high_limit);

        let mut specials = 0u32;
        for &code in codes {
            let special = code - reorder_code::FIRST;
            if (0..reorder_code::MAX_NUM_SPECIAL as i32).contains(&special) {
                specials |= 1 << special;
            }
        }

        // special groups not named move to the bottom
        for i in 0..reorder_code::MAX_NUM_SPECIAL {
            let index = self.scripts_index[self.num_scripts + i] as usize;
            if index != 0 && specials & (1 << i) == 0 {
                low_start = self.add_low_script_range(&mut table, index, low_start);
            }
        }

        let mut skipped_reserved = 0;
        if specials == 0 && codes[0] == reorder_code::LATIN && !latin_must_move {
            let index = self.script_index(reorder_code::LATIN);
            if index != 0 {
                let start = starts[index] as u32;
                skipped_reserved = start - low_start;
                low_start = start;
            }
        }

        let mut has_reorder_to_end = false;
        let mut length = codes.len();
        let mut i = 0;
        while i < length {
            let code = codes[i];
            i += 1;
            if code == reorder_code::NONE {
                has_reorder_to_end = true;
                while i < length {
                    length -= 1;
                    let code = codes[length];
                    if code == reorder_code::NONE || code == reorder_code::DEFAULT {
                        return Err(Error::invalid_reorder_codes(format!(
                            "{} after the others marker",
                            code
                        )));
                    }
                    let index = self.script_index(code);
                    if index == 0 {
                        continue;
                    }
                    if table[index] != 0 {
                        return Err(Error::invalid_reorder_codes(format!("duplicate group {}", code)));
                    }
                    high_limit = self.add_high_script_range(&mut table, index, high_limit);
                }
                break;
            }
            if code == reorder_code::DEFAULT {
                return Err(Error::invalid_reorder_codes("default code combined with others"));
            }
            let index = self.script_index(code);
            if index == 0 {
                continue;
            }
            if table[index] != 0 {
                return Err(Error::invalid_reorder_codes(format!("duplicate group {}", code)));
            }
            low_start = self.add_low_script_range(&mut table, index, low_start);
        }

        // everything else keeps its place where possible
        for i in 1..num_starts - 1 {
            if table[i] != 0 {
                continue;
            }
            let start = starts[i] as u32;
            if !has_reorder_to_end && start > low_start {
                low_start = start;
            }
            low_start = self.add_low_script_range(&mut table, i, low_start);
        }
        if low_start > high_limit {
            if low_start - (skipped_reserved & 0xff00) <= high_limit {
                tracing::warn!("reordering moves the reserved range before Latin");
                return self.make_reorder_ranges_impl(codes, true);
            }
            return Err(Error::ReorderOverflow);
        }

        let mut offset: i32 = 0;
        let mut i = 1;
        loop {
            let mut next_offset = offset;
            while i < num_starts - 1 {
                let new_lead_byte = table[i];
                if new_lead_byte != 0xff {
                    next_offset = new_lead_byte as i32 - (starts[i] >> 8) as i32;
                    if next_offset != offset {
                        break;
                    }
                }
                i += 1;
            }
            if offset != 0 || i < num_starts - 1 {
                ranges.push(((starts[i] as u32) << 16) | (offset as u32 & 0xffff));
            }
            if i == num_starts - 1 {
                break;
            }
            offset = next_offset;
            i += 1;
        }
        Ok(ranges)
    }

    fn add_low_script_range(&self, table: &mut [u8], index: usize, low_start: u32) -> u32 {
        let start = self.script_starts[index] as u32;
        let mut low_start = low_start;
        if (start & 0xff) < (low_start & 0xff) {
            low_start += 0x100;
        }
        table[index] = (low_start >> 8) as u8;
        let limit = self.script_starts[index + 1] as u32;
        ((low_start & 0xff00) + ((limit & 0xff00) - (start & 0xff00))) | (limit & 0xff)
    }

    fn add_high_script_range(&self, table: &mut [u8], index: usize, high_limit: u32) -> u32 {
        let limit = self.script_starts[index + 1] as u32;
        let mut high_limit = high_limit;
        if (limit & 0xff) > (high_limit & 0xff) {
            high_limit -= 0x100;
        }
        let start = self.script_starts[index] as u32;
        let high_limit = ((high_limit & 0xff00) - ((limit & 0xff00) - (start & 0xff00))) | (start & 0xff);
        table[index] = (high_limit >> 8) as u8;
        high_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{root, root_with_few_lead_bytes, tailoring};

    #[test]
    fn test_unsafe_backward() {
        let data = root();
        // contraction suffixes
        assert!(data.unsafe_backward.contains32('h' as u32));
        assert!(data.is_unsafe_backward('h' as u32, false));
        assert!(!data.is_unsafe_backward('c' as u32, false));
        assert!(data.is_unsafe_backward(0x301, false));
        assert!(!data.is_unsafe_backward('7' as u32, false));
        assert!(data.is_unsafe_backward('7' as u32, true));
        assert!(tailoring().unsafe_backward.contains32('h' as u32));
        assert!(!tailoring().unsafe_backward.contains32('b' as u32));
    }

    #[test]
    fn test_hangul_decompose() {
        // U+AC01 = L 1100, V 1161, T 11A8
        assert_eq!((0, 0, 1), hangul::decompose(0xac01));
        assert_eq!((0, 0, 0), hangul::decompose(0xac00));
        // U+D7A3 = L 1112, V 1175, T 11C2
        assert_eq!((18, 20, 27), hangul::decompose(0xd7a3));
        assert_eq!(Some(40), hangul::jamo_index(0x11a8));
        assert_eq!(None, hangul::jamo_index(0x11a7));
        assert_eq!(Some(66), hangul::jamo_index(0x11c2));
    }

    #[test]
    fn test_single_ce() {
        let data = root();
        assert_eq!(Ce::from_primary(0x0a14_0000), data.get_single_ce('b' as u32).unwrap());
        assert_eq!(
            weights::unassigned_ce(0x50000),
            data.get_single_ce(0x50000).unwrap()
        );
        assert_eq!(
            Ce::from_primary(0x1002_0300),
            data.get_single_ce(0x4e01).unwrap()
        );
        assert_eq!(Err(Error::NotSingleCe(0x63)), data.get_single_ce('c' as u32));
        assert_eq!(Err(Error::NotSingleCe(0xac00)), data.get_single_ce(0xac00));
        assert_eq!(Err(Error::NotSingleCe(0xe6)), data.get_single_ce(0xe6));
        assert_eq!(
            data.get_single_ce('5' as u32),
            Ok(Ce::from_primary(0x0715_0000))
        );
    }

    #[test]
    fn test_group_lookups() {
        let data = root();
        assert_eq!(0x0d00_0000, data.get_first_primary_for_group(reorder_code::GREEK));
        assert_eq!(0x0d7f_ffff, data.get_last_primary_for_group(reorder_code::GREEK));
        assert_eq!(0x0400_0000, data.get_first_primary_for_group(reorder_code::PUNCTUATION));
        assert_eq!(0, data.get_first_primary_for_group(reorder_code::ARABIC));
        assert_eq!(Some(reorder_code::LATIN), data.get_group_for_primary(0x0a14_0000));
        assert_eq!(Some(reorder_code::SPACE), data.get_group_for_primary(0x0305_0000));
        assert_eq!(None, data.get_group_for_primary(0x0200_0000));
        assert_eq!(None, data.get_group_for_primary(0xff00_0000));
    }

    #[test]
    fn test_reorder_ranges_greek_first() {
        let data = root();
        let ranges = data.make_reorder_ranges(&[reorder_code::GREEK]).unwrap();
        assert_eq!(vec![0x0d00_0000, 0x0d80_fffb], ranges);
        assert!(data.make_reorder_ranges(&[]).unwrap().is_empty());
        assert!(data.make_reorder_ranges(&[reorder_code::NONE]).unwrap().is_empty());
    }

    #[test]
    fn test_reorder_latin_first_is_identity() {
        let data = root();
        assert!(data.make_reorder_ranges(&[reorder_code::LATIN]).unwrap().is_empty());
    }

    #[test]
    fn test_reorder_code_errors() {
        let data = root();
        assert!(matches!(
            data.make_reorder_ranges(&[reorder_code::GREEK, reorder_code::GREEK]),
            Err(Error::InvalidReorderCodes(_))
        ));
        assert!(matches!(
            data.make_reorder_ranges(&[reorder_code::GREEK, reorder_code::DEFAULT]),
            Err(Error::InvalidReorderCodes(_))
        ));
    }

    #[test]
    fn test_reorder_overflow() {
        let data = root_with_few_lead_bytes();
        assert!(data.make_reorder_ranges(&[reorder_code::GREEK]).is_ok());
        assert_eq!(
            Err(Error::ReorderOverflow),
            data.make_reorder_ranges(&[reorder_code::CYRILLIC, reorder_code::GREEK])
        );
    }
}
