//! Combining-class queries over canonical decompositions.
//!
//! The FCD value of a code point packs the combining class of the first
//! character of its canonical decomposition (lccc) into the high byte and that
//! of the last character (tccc) into the low byte.

use unicode_normalization::char::{canonical_combining_class, decompose_canonical};

/// `(lccc << 8) | tccc`. Surrogates and non-characters are 0.
pub fn fcd16(c: u32) -> u16 {
    // nothing below U+00C0 decomposes or combines
    if c < 0xc0 {
        return 0;
    }
    let ch = match char::from_u32(c) {
        Some(ch) => ch,
        None => return 0,
    };
    let mut first = None;
    let mut last = 0u8;
    decompose_canonical(ch, |d| {
        let ccc = canonical_combining_class(d);
        first.get_or_insert(ccc);
        last = ccc;
    });
    ((first.unwrap_or(0) as u16) << 8) | last as u16
}

/// Leading combining class.
#[inline]
pub fn lccc(c: u32) -> u8 {
    (fcd16(c) >> 8) as u8
}

/// Trailing combining class.
#[inline]
pub fn tccc(c: u32) -> u8 {
    fcd16(c) as u8
}

/// Combining class of `c` itself.
pub fn ccc(c: u32) -> u8 {
    char::from_u32(c).map_or(0, canonical_combining_class)
}

/// Whether the code points are in FCD form: the canonical decompositions can be
/// concatenated without reordering.
pub fn is_fcd(code_points: impl IntoIterator<Item = u32>) -> bool {
    let mut prev_tccc = 0;
    for c in code_points {
        let fcd = fcd16(c);
        let lccc = (fcd >> 8) as u8;
        if lccc != 0 && prev_tccc > lccc {
            return false;
        }
        prev_tccc = fcd as u8;
    }
    true
}
