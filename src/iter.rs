//! The collation element iterator.

use smallvec::SmallVec;

use crate::ce_ty::{
    Ce, Ce32, Ce32Kind, Tag, CONTRACT_NEXT_CCC, CONTRACT_SINGLE_CP_NO_MATCH, CONTRACT_TRAILING_CCC,
    LEAD_ALL_UNASSIGNED,
};
use crate::contexts::ContextCursor;
use crate::data::{hangul, CollationData};
use crate::fcd;
use crate::numeric;
use crate::skipped::SkippedState;
use crate::text::CollationText;
use crate::weights;

/// Code point passed along with CE32s that are not tied to one code point.
const NO_CP: u32 = u32::MAX;

type CeBuffer = SmallVec<[Ce; 32]>;

/// Turns text into collation elements.
///
/// Forward iteration reads CEs out of a buffer filled one mapping at a time.
/// Backward iteration pops from the same buffer, so call
/// [`reset_to_offset`](Self::reset_to_offset) before switching direction.
#[derive(Debug)]
pub struct CollationIterator<'d, T> {
    data: &'d CollationData,
    text: T,
    numeric: bool,
    ces: CeBuffer,
    ces_index: usize,
    skipped: SkippedState,
    /// Code points left to read before a backward replay stops, -1 if unlimited.
    num_cp_fwd: i32,
}

impl<'d, T: CollationText> CollationIterator<'d, T> {
    /// Iterator at the text's current position.
    pub fn new(data: &'d CollationData, text: T, numeric: bool) -> Self {
        CollationIterator {
            data,
            text,
            numeric,
            ces: CeBuffer::new(),
            ces_index: 0,
            skipped: SkippedState::default(),
            num_cp_fwd: -1,
        }
    }

    /// The data being collated against.
    pub fn data(&self) -> &'d CollationData {
        self.data
    }

    /// The text cursor.
    pub fn text(&self) -> &T {
        &self.text
    }

    /// Text offset of the cursor. Buffered CEs may belong to text before it.
    pub fn offset(&self) -> usize {
        self.text.offset()
    }

    /// Drop all buffered state and move the text cursor.
    pub fn reset_to_offset(&mut self, offset: usize) {
        self.ces.clear();
        self.ces_index = 0;
        self.skipped.clear();
        self.num_cp_fwd = -1;
        self.text.reset_to_offset(offset);
    }

    /// CEs buffered so far; after [`fetch_ces`](Self::fetch_ces) this is the whole text
    /// followed by [`Ce::NO_CE`].
    pub fn ces(&self) -> &[Ce] {
        &self.ces
    }

    /// Read CEs to the end of the text. Returns the buffer length.
    pub fn fetch_ces(&mut self) -> usize {
        while self.next_ce() != Ce::NO_CE {
            // the rest of an expansion is already buffered
            self.ces_index = self.ces.len();
        }
        self.ces.len()
    }

    /// Empty the buffer once every buffered CE has been returned.
    pub fn clear_ces_if_none_remaining(&mut self) {
        if self.ces_index == self.ces.len() {
            self.ces.clear();
            self.ces_index = 0;
        }
    }

    /// Next CE, or [`Ce::NO_CE`] at the end of the text.
    pub fn next_ce(&mut self) -> Ce {
        if self.ces_index < self.ces.len() {
            let ce = self.ces[self.ces_index];
            self.ces_index += 1;
            return ce;
        }
        let data = self.data;
        let (c, ce32) = match self.text.handle_next_ce32(data) {
            Some(next) => next,
            None => {
                // one NO_CE marks the end however often it is asked for
                if self.ces.last() != Some(&Ce::NO_CE) {
                    self.ces.push(Ce::NO_CE);
                }
                self.ces_index = self.ces.len();
                return Ce::NO_CE;
            }
        };
        let (d, ce32) = if ce32 == Ce32::FALLBACK {
            data.resolve(c)
        } else {
            (data, ce32)
        };
        if ce32.is_simple_or_long() {
            let ce = ce32.to_ce();
            self.ces.push(ce);
            self.ces_index += 1;
            return ce;
        }
        self.append_ces_from_ce32(d, c, ce32, true);
        let ce = self.ces[self.ces_index];
        self.ces_index += 1;
        ce
    }

    /// Previous CE, or [`Ce::NO_CE`] at the start of the text.
    pub fn previous_ce(&mut self) -> Ce {
        if let Some(ce) = self.ces.pop() {
            return ce;
        }
        let c = match self.text.previous_code_point() {
            Some(c) => c,
            None => return Ce::NO_CE,
        };
        if self.data.is_unsafe_backward(c, self.numeric) {
            return self.previous_ce_unsafe();
        }
        // safe code point: prefixes apply, contractions do not start here
        let data = self.data;
        let (d, ce32) = data.resolve(c);
        if ce32.is_simple_or_long() {
            return ce32.to_ce();
        }
        self.append_ces_from_ce32(d, c, ce32, false);
        self.pop_buffered()
    }

    fn pop_buffered(&mut self) -> Ce {
        match self.ces.pop() {
            Some(ce) => ce,
            None => unreachable!("mapping produced no collation elements"),
        }
    }

    /// Back up to a safe code point, then collect CEs forward up to where we were.
    fn previous_ce_unsafe(&mut self) -> Ce {
        let mut num_backward = 1;
        while let Some(c) = self.text.previous_code_point() {
            num_backward += 1;
            if !self.data.is_unsafe_backward(c, self.numeric) {
                break;
            }
        }
        self.num_cp_fwd = num_backward;
        self.ces_index = 0;
        debug_assert!(self.ces.is_empty());
        while self.num_cp_fwd > 0 {
            // one code point per round unless a contraction or digit run reads more
            self.num_cp_fwd -= 1;
            self.next_ce();
            self.ces_index = self.ces.len();
        }
        self.num_cp_fwd = -1;
        self.text.backward_num_code_points(num_backward as usize);
        self.ces_index = 0;
        self.pop_buffered()
    }

    fn append_ces_from_ce32(&mut self, d: &'d CollationData, c: u32, ce32: Ce32, forward: bool) {
        let mut d = d;
        let mut c = c;
        let mut ce32 = ce32;
        loop {
            match ce32.decode() {
                Ce32Kind::Simple => {
                    self.ces.push(ce32.simple_to_ce());
                    return;
                }
                Ce32Kind::Fallback | Ce32Kind::Reserved3 | Ce32Kind::BuilderData => {
                    panic!("illegal {:?} CE32 {:?} at runtime", ce32.tag(), ce32)
                }
                Ce32Kind::LongPrimary(_) | Ce32Kind::LongSecondary(_) => {
                    self.ces.push(ce32.to_ce());
                    return;
                }
                Ce32Kind::LatinExpansion => {
                    self.ces.push(ce32.latin_ce0());
                    self.ces.push(ce32.latin_ce1());
                    return;
                }
                Ce32Kind::Expansion32 { index, length } => {
                    self.ces
                        .extend(d.ce32s[index..index + length].iter().map(|&e| Ce32(e).to_ce()));
                    return;
                }
                Ce32Kind::Expansion { index, length } => {
                    self.ces.extend(d.ces[index..index + length].iter().map(|&e| Ce(e)));
                    return;
                }
                Ce32Kind::Prefix { index } => {
                    if forward {
                        self.text.backward_num_code_points(1);
                    }
                    ce32 = self.get_ce32_from_prefix(d, index);
                    if forward {
                        self.text.forward_num_code_points(1);
                    }
                }
                Ce32Kind::Contraction { index, flags } => {
                    let default_ce32 = d.get_ce32_from_contexts(index);
                    if !forward {
                        // contractions going backward are resolved by replaying forward
                        ce32 = default_ce32;
                        continue;
                    }
                    ce32 = self.contraction_ce32(d, index, flags, default_ce32);
                    if ce32 == Ce32::NO_CE32 {
                        // discontiguous match, CEs are appended already
                        return;
                    }
                }
                Ce32Kind::Digit { index, .. } => {
                    if self.numeric {
                        self.append_numeric_ces(ce32, forward);
                        return;
                    }
                    ce32 = d.ce32_at(index);
                }
                Ce32Kind::U0000 => {
                    ce32 = d.ce32_at(0);
                }
                Ce32Kind::Hangul { no_special_jamo } => {
                    let (l, v, t) = hangul::decompose(c);
                    let v_slot = (hangul::JAMO_L_COUNT + v) as usize;
                    let t_slot = (hangul::JAMO_L_COUNT + hangul::JAMO_V_COUNT - 1 + t) as usize;
                    if no_special_jamo {
                        self.ces.push(d.jamo_ce32(l as usize).simple_to_ce());
                        self.ces.push(d.jamo_ce32(v_slot).simple_to_ce());
                        if t != 0 {
                            self.ces.push(d.jamo_ce32(t_slot).simple_to_ce());
                        }
                        return;
                    }
                    self.append_ces_from_ce32(d, hangul::JAMO_L_BASE + l, d.jamo_ce32(l as usize), forward);
                    self.append_ces_from_ce32(d, hangul::JAMO_V_BASE + v, d.jamo_ce32(v_slot), forward);
                    if t == 0 {
                        return;
                    }
                    c = hangul::JAMO_T_BASE + t;
                    ce32 = d.jamo_ce32(t_slot);
                }
                Ce32Kind::LeadSurrogate { lead_type } => {
                    debug_assert!(forward);
                    match self.text.handle_get_trail_surrogate() {
                        Some(trail) => {
                            c = 0x1_0000 + ((c - 0xd800) << 10) + (trail as u32 - 0xdc00);
                            if lead_type == LEAD_ALL_UNASSIGNED {
                                ce32 = Ce32::UNASSIGNED;
                            } else {
                                let data = self.data;
                                let (resolved_d, resolved_ce32) = data.resolve(c);
                                d = resolved_d;
                                ce32 = resolved_ce32;
                            }
                        }
                        // unpaired lead surrogate
                        None => ce32 = Ce32::UNASSIGNED,
                    }
                }
                Ce32Kind::Offset { .. } => {
                    self.ces.push(d.get_ce_from_offset_ce32(c, ce32));
                    return;
                }
                Ce32Kind::Implicit => {
                    if (0xd800..0xe000).contains(&c) && self.text.forbid_surrogate_code_points() {
                        ce32 = Ce32::FFFD;
                    } else {
                        self.ces.push(weights::unassigned_ce(c as i32));
                        return;
                    }
                }
            }
        }
    }

    /// Match a prefix by reading backward from just before the current code point.
    fn get_ce32_from_prefix(&mut self, d: &'d CollationData, index: usize) -> Ce32 {
        let mut ce32 = d.get_ce32_from_contexts(index);
        let mut prefixes = ContextCursor::new(d.contexts(), index);
        let mut look_behind = 0;
        while let Some(c) = self.text.previous_code_point() {
            look_behind += 1;
            let result = prefixes.next_for_code_point(c);
            if let Some(value) = result.value() {
                ce32 = Ce32(value);
            }
            if !result.has_next() {
                break;
            }
        }
        self.text.forward_num_code_points(look_behind);
        ce32
    }

    fn contraction_ce32(&mut self, d: &'d CollationData, index: usize, flags: u32, default_ce32: Ce32) -> Ce32 {
        let next_cp = if self.skipped.is_empty() && self.num_cp_fwd < 0 {
            match self.text.next_code_point() {
                None => return default_ce32,
                Some(n) if flags & CONTRACT_NEXT_CCC != 0 && fcd::lccc(n) == 0 => {
                    // every suffix starts with a combining mark
                    self.text.backward_num_code_points(1);
                    return default_ce32;
                }
                Some(n) => n,
            }
        } else {
            match self.next_skipped_code_point() {
                None => return default_ce32,
                Some(n) if flags & CONTRACT_NEXT_CCC != 0 && fcd::lccc(n) == 0 => {
                    self.backward_num_skipped(1);
                    return default_ce32;
                }
                Some(n) => n,
            }
        };
        self.next_ce32_from_contraction(d, index, flags, default_ce32, next_cp)
    }

    /// Longest contiguous match of the suffixes after the contraction's first code point.
    ///
    /// `c` is the code point following it.
    fn next_ce32_from_contraction(
        &mut self,
        d: &'d CollationData,
        index: usize,
        flags: u32,
        ce32: Ce32,
        c: u32,
    ) -> Ce32 {
        // code points read beyond the first one, and since the last match
        let mut look_ahead = 1;
        let mut since_match = 1;
        let mut ce32 = ce32;
        let mut c = c;
        let mut suffixes = ContextCursor::new(d.contexts(), index);
        if !self.skipped.is_empty() {
            self.skipped.save_trie_state(suffixes.save_state());
        }
        let mut result = suffixes.first_for_code_point(c);
        loop {
            if let Some(value) = result.value() {
                ce32 = Ce32(value);
                if !result.has_next() {
                    return ce32;
                }
                match self.next_skipped_code_point() {
                    Some(next) => c = next,
                    None => return ce32,
                }
                if !self.skipped.is_empty() {
                    self.skipped.save_trie_state(suffixes.save_state());
                }
                since_match = 1;
            } else {
                let next = if result.has_next() {
                    self.next_skipped_code_point()
                } else {
                    None
                };
                match next {
                    Some(next) => {
                        // partial match, keep reading
                        c = next;
                        since_match += 1;
                    }
                    None => {
                        if flags & CONTRACT_TRAILING_CCC != 0
                            && (flags & CONTRACT_SINGLE_CP_NO_MATCH == 0 || since_match < look_ahead)
                        {
                            if since_match > 1 {
                                // return to just after the last match
                                self.backward_num_skipped(since_match);
                                if let Some(next) = self.next_skipped_code_point() {
                                    c = next;
                                }
                                look_ahead -= since_match - 1;
                                since_match = 1;
                            }
                            if fcd::lccc(c) != 0 {
                                return self.next_ce32_from_discontiguous_contraction(
                                    d,
                                    &mut suffixes,
                                    ce32,
                                    look_ahead,
                                    c,
                                );
                            }
                        }
                        break;
                    }
                }
            }
            look_ahead += 1;
            result = suffixes.next_for_code_point(c);
        }
        self.backward_num_skipped(since_match);
        ce32
    }

    /// Try to extend the match with combining marks after the non-matching mark `c`.
    ///
    /// A mark is blocked when a mark of the same or zero combining class lies
    /// between it and the match. Returns [`Ce32::NO_CE32`] when a discontiguous
    /// match was found and its CEs, plus those of the skipped marks, were appended.
    fn next_ce32_from_discontiguous_contraction(
        &mut self,
        d: &'d CollationData,
        suffixes: &mut ContextCursor<'d>,
        ce32: Ce32,
        look_ahead: i32,
        c: u32,
    ) -> Ce32 {
        let mut ce32 = ce32;
        let mut fcd16 = fcd::fcd16(c);
        debug_assert!(fcd16 > 0xff);
        let next_cp = match self.next_skipped_code_point() {
            Some(next) => next,
            None => {
                self.backward_num_skipped(1);
                return ce32;
            }
        };
        let look_ahead = look_ahead + 1;
        let mut prev_cc = fcd16 as u8;
        fcd16 = fcd::fcd16(next_cp);
        if fcd16 <= 0xff {
            // a starter follows: nothing to skip over
            self.backward_num_skipped(2);
            return ce32;
        }

        if self.skipped.is_empty() {
            suffixes.reset();
            if look_ahead > 2 {
                // replay the partial match read so far
                self.text.backward_num_code_points(look_ahead as usize);
                if let Some(first) = self.text.next_code_point() {
                    suffixes.first_for_code_point(first);
                }
                for _ in 3..look_ahead {
                    if let Some(next) = self.text.next_code_point() {
                        suffixes.next_for_code_point(next);
                    }
                }
                // step over c and next_cp again
                self.text.forward_num_code_points(2);
            }
            self.skipped.save_trie_state(suffixes.save_state());
        } else {
            suffixes.reset_to_state(self.skipped.trie_state());
        }

        self.skipped.set_first_skipped(c);
        let mut since_match = 2;
        let mut c = next_cp;
        loop {
            let matched = if prev_cc < (fcd16 >> 8) as u8 {
                Some(suffixes.next_for_code_point(c)).filter(|r| r.has_value())
            } else {
                None
            };
            match matched {
                Some(result) => {
                    // S + C matches: C is consumed, prev_cc stays
                    if let Some(value) = result.value() {
                        ce32 = Ce32(value);
                    }
                    since_match = 0;
                    self.skipped.record_match();
                    if !result.has_next() {
                        break;
                    }
                    self.skipped.save_trie_state(suffixes.save_state());
                }
                None => {
                    self.skipped.skip(c);
                    suffixes.reset_to_state(self.skipped.trie_state());
                    prev_cc = fcd16 as u8;
                }
            }
            match self.next_skipped_code_point() {
                Some(next) => c = next,
                None => break,
            }
            since_match += 1;
            fcd16 = fcd::fcd16(c);
            if fcd16 <= 0xff {
                break;
            }
        }
        self.backward_num_skipped(since_match);
        let is_top_discontiguous = self.skipped.is_empty();
        self.skipped.replace_match();
        if is_top_discontiguous && !self.skipped.is_empty() {
            // the contraction's CEs, then those of the marks skipped before the match
            let mut d = d;
            let mut c = NO_CP;
            loop {
                self.append_ces_from_ce32(d, c, ce32, true);
                if !self.skipped.has_next() {
                    break;
                }
                c = self.skipped.next();
                let data = self.data;
                let (resolved_d, resolved_ce32) = data.resolve(c);
                d = resolved_d;
                ce32 = resolved_ce32;
            }
            self.skipped.clear();
            ce32 = Ce32::NO_CE32;
        }
        ce32
    }

    fn next_skipped_code_point(&mut self) -> Option<u32> {
        if self.skipped.has_next() {
            return Some(self.skipped.next());
        }
        if self.num_cp_fwd == 0 {
            return None;
        }
        let c = self.text.next_code_point()?;
        if !self.skipped.is_empty() {
            self.skipped.inc_beyond();
        }
        if self.num_cp_fwd > 0 {
            self.num_cp_fwd -= 1;
        }
        Some(c)
    }

    fn backward_num_skipped(&mut self, n: i32) {
        let mut n = n as usize;
        if !self.skipped.is_empty() {
            n = self.skipped.backward_num_code_points(n);
        }
        self.text.backward_num_code_points(n);
        if self.num_cp_fwd >= 0 {
            self.num_cp_fwd += n as i32;
        }
    }

    fn append_numeric_ces(&mut self, ce32: Ce32, forward: bool) {
        let data = self.data;
        let mut digits: SmallVec<[u8; 64]> = SmallVec::new();
        let mut ce32 = ce32;
        if forward {
            loop {
                digits.push(ce32.digit());
                if self.num_cp_fwd == 0 {
                    break;
                }
                let c = match self.text.next_code_point() {
                    Some(c) => c,
                    None => break,
                };
                ce32 = data.resolve(c).1;
                if !ce32.has_tag(Tag::Digit) {
                    self.text.backward_num_code_points(1);
                    break;
                }
                if self.num_cp_fwd > 0 {
                    self.num_cp_fwd -= 1;
                }
            }
        } else {
            loop {
                digits.push(ce32.digit());
                let c = match self.text.previous_code_point() {
                    Some(c) => c,
                    None => break,
                };
                ce32 = data.resolve(c).1;
                if !ce32.has_tag(Tag::Digit) {
                    self.text.forward_num_code_points(1);
                    break;
                }
            }
            digits.reverse();
        }
        numeric::append_numeric_ces(data.numeric_primary(), &digits, &mut self.ces);
    }
}

impl<T: CollationText> Iterator for CollationIterator<'_, T> {
    type Item = Ce;

    fn next(&mut self) -> Option<Ce> {
        match self.next_ce() {
            ce if ce == Ce::NO_CE => None,
            ce => Some(ce),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{self, p, root};
    use crate::text::{Utf16Text, Utf8Text};

    fn forward(s: &str) -> Vec<Ce> {
        CollationIterator::new(root(), Utf8Text::new(s), false).collect()
    }

    fn forward_numeric(s: &str) -> Vec<Ce> {
        CollationIterator::new(root(), Utf8Text::new(s), true).collect()
    }

    fn backward(s: &str, numeric: bool) -> Vec<Ce> {
        let mut iter = CollationIterator::new(root(), Utf8Text::new(s), numeric);
        iter.reset_to_offset(s.len());
        let mut ces = Vec::new();
        loop {
            let ce = iter.previous_ce();
            if ce == Ce::NO_CE {
                break;
            }
            ces.push(ce);
        }
        ces.reverse();
        ces
    }

    fn primaries(ces: &[Ce]) -> Vec<u32> {
        ces.iter().map(|ce| ce.primary()).filter(|&p| p != 0).collect()
    }

    #[test]
    fn test_simple_letters() {
        assert_eq!(vec![Ce::from_primary(p('a')), Ce::from_primary(p('b'))], forward("ab"));
        let upper = forward("A");
        assert_eq!(p('a'), upper[0].primary());
        assert_eq!(2, upper[0].case_bits());
    }

    #[test]
    fn test_contraction_and_default() {
        assert_eq!(vec![test_data::CH_PRIMARY], primaries(&forward("ch")));
        assert_eq!(vec![p('c'), p('d')], primaries(&forward("cd")));
        assert_eq!(vec![p('c')], primaries(&forward("c")));
        assert_eq!(vec![test_data::CH_PRIMARY], primaries(&backward("ch", false)));
    }

    #[test]
    fn test_prefix() {
        assert_eq!(vec![p('a'), test_data::X_AFTER_A_PRIMARY], primaries(&forward("ax")));
        assert_eq!(vec![p('b'), p('x')], primaries(&forward("bx")));
        assert_eq!(vec![p('x')], primaries(&forward("x")));
        assert_eq!(forward("ax"), backward("ax", false));
    }

    #[test]
    fn test_discontiguous_contraction() {
        // a + ring above contracts; dot below (ccc 220) does not block the ring (230)
        let contiguous = forward("a\u{30a}");
        assert_eq!(vec![test_data::A_RING_PRIMARY], primaries(&contiguous));
        let discontiguous = forward("a\u{323}\u{30a}");
        assert_eq!(vec![test_data::A_RING_PRIMARY], primaries(&discontiguous));
        // contraction CEs first, then the skipped mark
        assert_eq!(contiguous[0], discontiguous[0]);
        assert_eq!(forward("\u{323}")[0], discontiguous[1]);
        // acute (230) blocks the ring (230)
        let blocked = forward("a\u{301}\u{30a}");
        assert_eq!(vec![p('a')], primaries(&blocked));
        assert_eq!(3, blocked.len());
    }

    #[test]
    fn test_discontiguous_backward_matches_forward() {
        for s in ["a\u{323}\u{30a}", "a\u{301}\u{30a}", "xa\u{327}\u{323}\u{30a}b", "ch\u{323}"] {
            assert_eq!(forward(s), backward(s, false), "{:?}", s);
        }
    }

    #[test]
    fn test_latin_expansion_and_long_expansion() {
        assert_eq!(vec![p('a'), p('e')], primaries(&forward("\u{e6}")));
        assert_eq!(test_data::LONG_EXPANSION_LENGTH, forward("\u{fb03}").len());
        assert_eq!(forward("\u{fb03}"), backward("\u{fb03}", false));
    }

    #[test]
    fn test_hangul() {
        // U+AC01 = 1100 1161 11A8
        let syllable = forward("\u{ac01}");
        let jamo = forward("\u{1100}\u{1161}\u{11a8}");
        assert_eq!(3, syllable.len());
        assert_eq!(jamo, syllable);
        assert_eq!(syllable, backward("\u{ac01}", false));
        assert_eq!(2, forward("\u{ac00}").len());
    }

    #[test]
    fn test_offset_and_implicit() {
        assert_eq!(vec![Ce::from_primary(0x1002_0200)], forward("\u{4e00}"));
        assert_eq!(vec![Ce::from_primary(0x1002_0300)], forward("\u{4e01}"));
        let unassigned = forward("\u{50000}\u{50001}");
        assert_eq!(weights::unassigned_ce(0x50000), unassigned[0]);
        assert!(unassigned[0].primary() < unassigned[1].primary());
    }

    #[test]
    fn test_utf16_surrogates() {
        let units: Vec<u16> = "a\u{50000}".encode_utf16().collect();
        let ces: Vec<Ce> = CollationIterator::new(root(), Utf16Text::new(&units), false).collect();
        assert_eq!(forward("a\u{50000}"), ces);
        let unpaired = [0xd800u16, 0x61];
        let ces: Vec<Ce> = CollationIterator::new(root(), Utf16Text::new(&unpaired), false).collect();
        assert_eq!(vec![weights::unassigned_ce(0xd800), Ce::from_primary(p('a'))], ces);
        let mut iter = CollationIterator::new(root(), Utf16Text::new(&unpaired), false);
        iter.reset_to_offset(2);
        assert_eq!(Ce::from_primary(p('a')), iter.previous_ce());
        assert_eq!(weights::unassigned_ce(0xd800), iter.previous_ce());
        assert_eq!(Ce::NO_CE, iter.previous_ce());
    }

    #[test]
    fn test_numeric_runs() {
        let nine = primaries(&forward_numeric("9"));
        let ten = primaries(&forward_numeric("10"));
        let hundred = primaries(&forward_numeric("100"));
        assert!(nine < ten && ten < hundred);
        assert_eq!(hundred, primaries(&forward_numeric("0100")));
        assert_eq!(
            vec![root().numeric_primary() | (2 + 12) << 16, p('a'), root().numeric_primary() | (2 + 7) << 16],
            primaries(&forward_numeric("12a007"))
        );
        assert_eq!(forward_numeric("x12a007"), backward("x12a007", true));
        // digits collate one by one without numeric mode
        assert_eq!(2, forward("12").len());
    }

    #[test]
    fn test_fetch_ces_is_idempotent() {
        let mut iter = CollationIterator::new(root(), Utf8Text::new("abc"), false);
        assert_eq!(4, iter.fetch_ces());
        assert_eq!(Some(&Ce::NO_CE), iter.ces().last());
        for _ in 0..100 {
            assert_eq!(Ce::NO_CE, iter.next_ce());
        }
        assert_eq!(4, iter.ces().len());
        assert_eq!(4, iter.fetch_ces());
        iter.reset_to_offset(0);
        assert_eq!(Ce::from_primary(p('a')), iter.next_ce());
    }

    #[test]
    fn test_tailoring_falls_back_to_base() {
        let tailoring = test_data::tailoring();
        let ces: Vec<Ce> = CollationIterator::new(tailoring, Utf8Text::new("bq\u{ac01}"), false).collect();
        assert_eq!(test_data::TAILORED_B_PRIMARY, ces[0].primary());
        assert_eq!(p('q'), ces[1].primary());
        assert_eq!(forward("\u{ac01}"), ces[2..].to_vec());
    }
}
