//! A small root collation and a tailoring of it, shared by the unit tests.
//!
//! Lead bytes: 03 space, 04 punctuation, 05 symbols, 06 currency, 07 digits,
//! 0A..0B Latin, 0D Greek and Cyrillic, 0E Hangul Jamo, 10 Han.

use std::sync::{Arc, OnceLock};

use crate::ce_ty::Ce;
use crate::data::CollationData;
use crate::data_builder::{CollationDataBuilder, ReorderGroup};
use crate::settings::reorder_code;

/// Primary of the "ch" contraction, sorted between h and i.
pub const CH_PRIMARY: u32 = 0x0a2e_0000;
/// Primary of x after a.
pub const X_AFTER_A_PRIMARY: u32 = 0x0a6e_0000;
/// Primary of a with ring above, sorted after z.
pub const A_RING_PRIMARY: u32 = 0x0a78_0000;
/// Number of CEs of U+FB03 LATIN SMALL LIGATURE FFI.
pub const LONG_EXPANSION_LENGTH: usize = 3;
/// Primary of b in the tailoring, between a and b of the root.
pub const TAILORED_B_PRIMARY: u32 = 0x0a12_0000;

const UPPER_TERTIARY: u32 = 0x8f00;

/// Root primary of a letter, digit or the few punctuation characters in the data.
pub fn p(c: char) -> u32 {
    let c = c as u32;
    let p16 = match c {
        0x61..=0x7a => 0x0a10 + 4 * (c - 0x61),
        0x41..=0x5a => 0x0a10 + 4 * (c - 0x41),
        0x30..=0x39 => 0x0710 + (c - 0x30),
        0x3b1..=0x3c9 => 0x0d10 + 2 * (c - 0x3b1),
        0x430..=0x44f => 0x0d90 + 2 * (c - 0x430),
        0x20 => 0x0305,
        0x2d => 0x0405,
        0x2c => 0x0406,
        0x2e => 0x0407,
        0x2b => 0x0505,
        0x24 => 0x0605,
        _ => panic!("no test primary for U+{:04X}", c),
    };
    p16 << 16
}

fn primary_ce(c: char) -> Ce {
    Ce::from_primary(p(c))
}

fn mark(secondary: u32) -> Ce {
    Ce::new(0, secondary << 8, 0x0500, 0)
}

fn groups() -> Vec<ReorderGroup> {
    vec![
        ReorderGroup::new([reorder_code::SPACE], 0x0300),
        ReorderGroup::new([reorder_code::PUNCTUATION], 0x0400),
        ReorderGroup::new([reorder_code::SYMBOL], 0x0500),
        ReorderGroup::new([reorder_code::CURRENCY], 0x0600),
        ReorderGroup::new([reorder_code::DIGIT], 0x0700),
        ReorderGroup::new([reorder_code::RESERVED_BEFORE_LATIN], 0x0800),
        ReorderGroup::new([reorder_code::LATIN], 0x0a00),
        ReorderGroup::new([reorder_code::RESERVED_AFTER_LATIN], 0x0c00),
        ReorderGroup::new([reorder_code::GREEK], 0x0d00),
        ReorderGroup::new([reorder_code::CYRILLIC], 0x0d80),
        ReorderGroup::new([reorder_code::HANGUL], 0x0e00),
        ReorderGroup::new([reorder_code::HAN], 0x1000),
        ReorderGroup::new([reorder_code::UNKNOWN], 0xfe00),
    ]
}

fn build_root() -> CollationData {
    let mut b = CollationDataBuilder::new();
    let mut add = |s: &str, ces: &[Ce]| b.add("", s, ces).unwrap();

    add("\u{0}", &[]);
    for c in [' ', '-', ',', '.', '+', '$'] {
        add(&c.to_string(), &[primary_ce(c)]);
    }
    for c in ('0'..='9').chain('a'..='z') {
        add(&c.to_string(), &[primary_ce(c)]);
    }
    for c in 'A'..='Z' {
        add(&c.to_string(), &[Ce::new(p(c), 0x0500, UPPER_TERTIARY, 0)]);
    }
    for (c, secondary) in [(0x300, 0x8a), (0x301, 0x8c), (0x30a, 0x8e), (0x323, 0x90), (0x327, 0x92), (0x308, 0x94)] {
        add(&char::from_u32(c).unwrap().to_string(), &[mark(secondary)]);
    }
    for c in ('\u{3b1}'..='\u{3c9}').chain('\u{430}'..='\u{44f}') {
        add(&c.to_string(), &[primary_ce(c)]);
    }

    add("ch", &[Ce::from_primary(CH_PRIMARY)]);
    add("a\u{30a}", &[Ce::from_primary(A_RING_PRIMARY)]);
    add("\u{e6}", &[primary_ce('a'), primary_ce('e')]);
    add("\u{e0}", &[primary_ce('a'), mark(0x8a)]);
    add("\u{e1}", &[primary_ce('a'), mark(0x8c)]);
    add("\u{fb03}", &[primary_ce('f'), primary_ce('f'), primary_ce('i')]);

    for (base, count, first) in [(0x1100, 19, 0x0e10), (0x1161, 21, 0x0e30), (0x11a8, 27, 0x0e50)] {
        for i in 0..count {
            let c = char::from_u32(base + i).unwrap();
            add(&c.to_string(), &[Ce::from_primary((first + i) << 16)]);
        }
    }

    b.add("a", "x", &[Ce::from_primary(X_AFTER_A_PRIMARY)]).unwrap();
    b.add_offset_range(0x4e00, 0x9fff, 0x1002_0200, 1).unwrap();
    b.set_numeric_primary(0x0700_0000);
    for lead in [0x0a, 0x0b, 0xfe] {
        b.set_compressible_lead_byte(lead);
    }
    b.set_reorder_groups(&groups()).unwrap();
    b.build().unwrap()
}

fn root_arc() -> &'static Arc<CollationData> {
    static ROOT: OnceLock<Arc<CollationData>> = OnceLock::new();
    ROOT.get_or_init(|| Arc::new(build_root()))
}

/// The shared root data.
pub fn root() -> &'static CollationData {
    root_arc()
}

/// Data whose groups leave no room for moving two scripts at once.
pub fn root_with_few_lead_bytes() -> &'static CollationData {
    static FEW: OnceLock<CollationData> = OnceLock::new();
    FEW.get_or_init(|| {
        let mut b = CollationDataBuilder::new();
        b.set_reorder_groups(&[
            ReorderGroup::new([reorder_code::SPACE], 0x0300),
            ReorderGroup::new([reorder_code::GREEK], 0x0380),
            ReorderGroup::new([reorder_code::LATIN], 0x0400),
            ReorderGroup::new([reorder_code::CYRILLIC], 0x0480),
            ReorderGroup::new([reorder_code::HAN], 0x0500),
        ])
        .unwrap();
        b.build().unwrap()
    })
}

/// A tailoring of [`root`] that moves b right after a.
pub fn tailoring() -> &'static CollationData {
    static TAILORING: OnceLock<CollationData> = OnceLock::new();
    TAILORING.get_or_init(|| {
        let mut b = CollationDataBuilder::tailoring(root_arc().clone());
        b.add("", "b", &[Ce::from_primary(TAILORED_B_PRIMARY)]).unwrap();
        b.add("", "B", &[Ce::new(TAILORED_B_PRIMARY, 0x0500, UPPER_TERTIARY, 0)])
            .unwrap();
        b.build().unwrap()
    })
}

/// The root as shared data, for collators.
pub fn root_shared() -> Arc<CollationData> {
    root_arc().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries_are_simple() {
        for c in ['b', 'B', '\u{3b1}', '\u{430}', ' '] {
            assert!(!root().get_ce32(c as u32).is_special(), "{:?}", c);
        }
        assert_eq!(Ok(Ce::from_primary(p('q'))), tailoring().get_single_ce('q' as u32));
    }
}
