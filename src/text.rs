//! Text cursors the collation iterator reads from.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::ce_ty::Ce32;
use crate::data::CollationData;
use crate::fcd;

/// A bidirectional code point cursor over one text.
///
/// Offsets are in the text's own code units.
pub trait CollationText {
    /// Current position.
    fn offset(&self) -> usize;

    /// Move to `offset`, which must be on a code point boundary.
    fn reset_to_offset(&mut self, offset: usize);

    /// Read forward, `None` at the end.
    fn next_code_point(&mut self) -> Option<u32>;

    /// Read backward, `None` at the start.
    fn previous_code_point(&mut self) -> Option<u32>;

    /// Skip `n` code points forward, stopping at the end.
    fn forward_num_code_points(&mut self, n: usize) {
        for _ in 0..n {
            if self.next_code_point().is_none() {
                break;
            }
        }
    }

    /// Skip `n` code points backward, stopping at the start.
    fn backward_num_code_points(&mut self, n: usize) {
        for _ in 0..n {
            if self.previous_code_point().is_none() {
                break;
            }
        }
    }

    /// Read forward and look up the CE32 for what was read.
    ///
    /// The returned value may be a lead surrogate code unit with a
    /// lead-surrogate CE32 rather than a full code point.
    fn handle_next_ce32(&mut self, data: &CollationData) -> Option<(u32, Ce32)> {
        let c = self.next_code_point()?;
        Some((c, data.get_ce32(c)))
    }

    /// Consume and return a trail surrogate unit following a lead surrogate.
    fn handle_get_trail_surrogate(&mut self) -> Option<u16> {
        None
    }

    /// Whether surrogate code points cannot occur and map to U+FFFD.
    fn forbid_surrogate_code_points(&self) -> bool {
        false
    }
}

/// UTF-16 text. Unpaired surrogates are collated as surrogate code points.
#[derive(Debug, Clone)]
pub struct Utf16Text<'a> {
    units: Cow<'a, [u16]>,
    pos: usize,
}

impl<'a> Utf16Text<'a> {
    /// Cursor at the start of `units`.
    pub fn new(units: &'a [u16]) -> Self {
        Utf16Text {
            units: Cow::Borrowed(units),
            pos: 0,
        }
    }

    /// Like [`Self::new`], but substitutes an NFD copy when the text is not FCD.
    pub fn with_fcd_check(units: &'a [u16]) -> Self {
        let code_points = char::decode_utf16(units.iter().copied())
            .map(|r| r.map(u32::from).unwrap_or_else(|e| e.unpaired_surrogate() as u32));
        if fcd::is_fcd(code_points) {
            return Self::new(units);
        }
        Utf16Text {
            units: Cow::Owned(nfd_utf16(units)),
            pos: 0,
        }
    }

    /// The units being read, after any normalization.
    pub fn units(&self) -> &[u16] {
        &self.units
    }
}

fn nfd_utf16(units: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(units.len() + 8);
    let mut run = String::new();
    fn flush(run: &mut String, out: &mut Vec<u16>) {
        out.extend(run.nfd().collect::<String>().encode_utf16());
        run.clear();
    }
    for r in char::decode_utf16(units.iter().copied()) {
        match r {
            Ok(ch) => run.push(ch),
            Err(e) => {
                flush(&mut run, &mut out);
                out.push(e.unpaired_surrogate());
            }
        }
    }
    flush(&mut run, &mut out);
    out
}

#[inline]
fn is_lead(u: u16) -> bool {
    (0xd800..0xdc00).contains(&u)
}

#[inline]
fn is_trail(u: u16) -> bool {
    (0xdc00..0xe000).contains(&u)
}

#[inline]
fn supplementary(lead: u16, trail: u16) -> u32 {
    0x1_0000 + (((lead as u32) - 0xd800) << 10) + ((trail as u32) - 0xdc00)
}

impl CollationText for Utf16Text<'_> {
    fn offset(&self) -> usize {
        self.pos
    }

    fn reset_to_offset(&mut self, offset: usize) {
        self.pos = offset.min(self.units.len());
    }

    fn next_code_point(&mut self) -> Option<u32> {
        let u = *self.units.get(self.pos)?;
        self.pos += 1;
        if is_lead(u) {
            if let Some(&t) = self.units.get(self.pos) {
                if is_trail(t) {
                    self.pos += 1;
                    return Some(supplementary(u, t));
                }
            }
        }
        Some(u as u32)
    }

    fn previous_code_point(&mut self) -> Option<u32> {
        if self.pos == 0 {
            return None;
        }
        self.pos -= 1;
        let u = self.units[self.pos];
        if is_trail(u) && self.pos > 0 {
            let l = self.units[self.pos - 1];
            if is_lead(l) {
                self.pos -= 1;
                return Some(supplementary(l, u));
            }
        }
        Some(u as u32)
    }

    fn handle_next_ce32(&mut self, data: &CollationData) -> Option<(u32, Ce32)> {
        let u = *self.units.get(self.pos)?;
        self.pos += 1;
        if is_lead(u) {
            Some((u as u32, data.lead_surrogate_ce32(u)))
        } else {
            Some((u as u32, data.get_ce32(u as u32)))
        }
    }

    fn handle_get_trail_surrogate(&mut self) -> Option<u16> {
        let t = *self.units.get(self.pos)?;
        if is_trail(t) {
            self.pos += 1;
            Some(t)
        } else {
            None
        }
    }
}

/// UTF-8 text from a `str`.
#[derive(Debug, Clone)]
pub struct Utf8Text<'a> {
    text: Cow<'a, str>,
    pos: usize,
}

impl<'a> Utf8Text<'a> {
    /// Cursor at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Utf8Text {
            text: Cow::Borrowed(text),
            pos: 0,
        }
    }

    /// Like [`Self::new`], but substitutes an NFD copy when the text is not FCD.
    pub fn with_fcd_check(text: &'a str) -> Self {
        if fcd::is_fcd(text.chars().map(u32::from)) {
            Self::new(text)
        } else {
            Utf8Text {
                text: Cow::Owned(text.nfd().collect()),
                pos: 0,
            }
        }
    }

    /// The text being read, after any normalization.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl CollationText for Utf8Text<'_> {
    fn offset(&self) -> usize {
        self.pos
    }

    fn reset_to_offset(&mut self, offset: usize) {
        self.pos = offset.min(self.text.len());
    }

    fn next_code_point(&mut self) -> Option<u32> {
        let ch = self.text[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch as u32)
    }

    fn previous_code_point(&mut self) -> Option<u32> {
        let ch = self.text[..self.pos].chars().next_back()?;
        self.pos -= ch.len_utf8();
        Some(ch as u32)
    }

    fn forbid_surrogate_code_points(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_pairs_and_unpaired() {
        let units = [0x61, 0xd83d, 0xde00, 0xdc00, 0xd800];
        let mut text = Utf16Text::new(&units);
        assert_eq!(Some(0x61), text.next_code_point());
        assert_eq!(Some(0x1f600), text.next_code_point());
        assert_eq!(Some(0xdc00), text.next_code_point());
        assert_eq!(Some(0xd800), text.next_code_point());
        assert_eq!(None, text.next_code_point());
        assert_eq!(5, text.offset());
        assert_eq!(Some(0xd800), text.previous_code_point());
        assert_eq!(Some(0xdc00), text.previous_code_point());
        assert_eq!(Some(0x1f600), text.previous_code_point());
        assert_eq!(1, text.offset());
        text.backward_num_code_points(5);
        assert_eq!(0, text.offset());
    }

    #[test]
    fn test_utf16_trail_handling() {
        let units = [0xd83d, 0xde00, 0xd83d, 0x62];
        let mut text = Utf16Text::new(&units);
        text.reset_to_offset(1);
        assert_eq!(Some(0xde00), text.handle_get_trail_surrogate());
        assert_eq!(2, text.offset());
        text.reset_to_offset(3);
        assert_eq!(None, text.handle_get_trail_surrogate());
        assert_eq!(3, text.offset());
    }

    #[test]
    fn test_utf8_both_directions() {
        let mut text = Utf8Text::new("aé😀");
        text.forward_num_code_points(2);
        assert_eq!(3, text.offset());
        assert_eq!(Some(0x1f600), text.next_code_point());
        assert_eq!(None, text.next_code_point());
        assert_eq!(Some(0x1f600), text.previous_code_point());
        assert_eq!(Some(0xe9), text.previous_code_point());
        assert!(text.forbid_surrogate_code_points());
    }

    #[test]
    fn test_fcd_check_normalizes() {
        let text = Utf8Text::with_fcd_check("a\u{301}\u{323}");
        assert_eq!("a\u{323}\u{301}", text.as_str());
        let text = Utf8Text::with_fcd_check("\u{e0}");
        assert_eq!("\u{e0}", text.as_str());
        let units: Vec<u16> = "x\u{301}\u{323}".encode_utf16().chain([0xd800]).collect();
        let text = Utf16Text::with_fcd_check(&units);
        assert_eq!(&[0x78, 0x323, 0x301, 0xd800][..], text.units());
    }
}
