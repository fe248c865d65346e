//! Collation elements and their 32-bit encodings.

use std::fmt;

/// A 64-bit collation element.
///
/// Bit layout, most significant first:
/// `pppppppp pppppppp pppppppp pppppppp ssssssss ssssssss cctttttt qqtttttt`
/// with a 32-bit primary, a 16-bit secondary, two case bits, a tertiary weight
/// and two quaternary bits in the middle of the tertiary field.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Ce(pub u64);

/// A compact 32-bit stand-in for one or more collation elements.
///
/// A *simple* CE32 (`pppppppp pppppppp ssssssss tttttttt`) unpacks into one CE
/// with fixed shifts. A CE32 whose low byte is `0xC0` or higher is *special*:
/// its low nibble is a [`Tag`] telling how to interpret the other bits.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Ce32(pub u32);

pub(crate) const NO_CE_PRIMARY: u32 = 1;
pub(crate) const NO_CE_WEIGHT16: u32 = 0x0100;
pub(crate) const MERGE_SEPARATOR_PRIMARY: u32 = 0x0200_0000;
pub(crate) const MERGE_SEPARATOR_BYTE: u8 = 2;
pub(crate) const LEVEL_SEPARATOR_BYTE: u8 = 1;
pub(crate) const PRIMARY_COMPRESSION_LOW_BYTE: u8 = 3;
pub(crate) const PRIMARY_COMPRESSION_HIGH_BYTE: u8 = 0xff;
pub(crate) const COMMON_BYTE: u32 = 5;
pub(crate) const COMMON_WEIGHT16: u32 = 0x0500;
pub(crate) const COMMON_SECONDARY_CE: u64 = 0x0500_0000;
pub(crate) const COMMON_TERTIARY_CE: u64 = 0x0500;
pub(crate) const COMMON_SEC_AND_TER_CE: u64 = 0x0500_0500;
pub(crate) const TRAIL_WEIGHT_BYTE: u32 = 0xff;
pub(crate) const UNASSIGNED_IMPLICIT_BYTE: u32 = 0xfe;

pub(crate) const SPECIAL_CE32_LOW_BYTE: u32 = 0xc0;
pub(crate) const LONG_PRIMARY_CE32_LOW_BYTE: u32 = 0xc1;

/// Largest index a special CE32 can carry.
pub const MAX_INDEX: u32 = 0x7ffff;
/// Largest number of CEs in one expansion.
pub const MAX_EXPANSION_LENGTH: usize = 31;

/// Contraction flag: the code point alone has no context-free mapping.
pub const CONTRACT_SINGLE_CP_NO_MATCH: u32 = 0x100;
/// Contraction flag: every suffix starts with a character with lccc != 0.
pub const CONTRACT_NEXT_CCC: u32 = 0x200;
/// Contraction flag: at least one suffix ends with a character with lccc != 0.
pub const CONTRACT_TRAILING_CCC: u32 = 0x400;

/// Hangul flag: none of the Jamo CE32s is special.
pub const HANGUL_NO_SPECIAL_JAMO: u32 = 0x100;

/// Lead surrogate types: what the 1024 supplementary code points behind a lead unit map to.
pub const LEAD_ALL_UNASSIGNED: u32 = 0;
/// All supplementary code points for this lead unit have simple CE32s.
pub const LEAD_ALL_SIMPLE: u32 = 0x100;
/// Mixed mappings for this lead unit.
pub const LEAD_MIXED: u32 = 0x200;
pub(crate) const LEAD_TYPE_MASK: u32 = 0x300;

/// The tag of a special CE32. The numeric values are part of the data format.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    /// Look the code point up in the base data.
    Fallback = 0,
    /// A three-byte primary with common secondary and tertiary weights.
    LongPrimary = 1,
    /// A secondary and tertiary weight with primary 0.
    LongSecondary = 2,
    /// Unused.
    Reserved3 = 3,
    /// Two Latin CEs packed into the CE32 bits.
    LatinExpansion = 4,
    /// Index and length into the CE32 arena.
    Expansion32 = 5,
    /// Index and length into the CE arena.
    Expansion = 6,
    /// Only used while building data.
    BuilderData = 7,
    /// Index of a prefix sub-trie in the contexts arena.
    Prefix = 8,
    /// Index of a contraction sub-trie in the contexts arena, plus flags.
    Contraction = 9,
    /// A decimal digit for numeric collation.
    Digit = 10,
    /// U+0000.
    U0000 = 11,
    /// A precomposed Hangul syllable.
    Hangul = 12,
    /// A UTF-16 lead surrogate code unit.
    LeadSurrogate = 13,
    /// A code point in a dense range with computed primaries.
    Offset = 14,
    /// An unassigned code point with a synthesized primary.
    Implicit = 15,
}

impl Tag {
    fn from_nibble(n: u32) -> Tag {
        match n & 0xf {
            0 => Tag::Fallback,
            1 => Tag::LongPrimary,
            2 => Tag::LongSecondary,
            3 => Tag::Reserved3,
            4 => Tag::LatinExpansion,
            5 => Tag::Expansion32,
            6 => Tag::Expansion,
            7 => Tag::BuilderData,
            8 => Tag::Prefix,
            9 => Tag::Contraction,
            10 => Tag::Digit,
            11 => Tag::U0000,
            12 => Tag::Hangul,
            13 => Tag::LeadSurrogate,
            14 => Tag::Offset,
            _ => Tag::Implicit,
        }
    }
}

/// A decoded CE32.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ce32Kind {
    /// Unpacks into one CE.
    Simple,
    /// Consult the base data.
    Fallback,
    /// The payload is a three-byte primary.
    LongPrimary(u32),
    /// The payload is the low 32 bits of a CE with primary 0.
    LongSecondary(u32),
    /// Illegal.
    Reserved3,
    /// Two CEs packed in the CE32.
    LatinExpansion,
    /// CE32s at `index..index + length` of the CE32 arena.
    Expansion32 {
        /// arena index
        index: usize,
        /// number of CE32s
        length: usize,
    },
    /// CEs at `index..index + length` of the CE arena.
    Expansion {
        /// arena index
        index: usize,
        /// number of CEs
        length: usize,
    },
    /// Illegal at runtime.
    BuilderData,
    /// Prefix sub-trie at `index` of the contexts arena.
    Prefix {
        /// contexts offset
        index: usize,
    },
    /// Contraction sub-trie at `index` of the contexts arena.
    Contraction {
        /// contexts offset
        index: usize,
        /// `CONTRACT_*` bits
        flags: u32,
    },
    /// A digit; `index` is the CE32 used when numeric collation is off.
    Digit {
        /// CE32 arena index
        index: usize,
        /// decimal value 0..=9
        digit: u8,
    },
    /// U+0000, real CE32 at index 0 of the CE32 arena.
    U0000,
    /// A Hangul syllable.
    Hangul {
        /// no Jamo CE32 is special
        no_special_jamo: bool,
    },
    /// A UTF-16 lead surrogate unit.
    LeadSurrogate {
        /// one of `LEAD_ALL_UNASSIGNED`, `LEAD_ALL_SIMPLE`, `LEAD_MIXED`
        lead_type: u32,
    },
    /// Offset-range data CE at `index` of the CE arena.
    Offset {
        /// CE arena index
        index: usize,
    },
    /// Synthesize an unassigned-implicit CE.
    Implicit,
}

impl Ce {
    /// Marks the end of the input.
    pub const NO_CE: Ce = Ce(0x1_0100_0100);

    /// The completely ignorable CE.
    pub const IGNORABLE: Ce = Ce(0);

    /// A CE with the given primary and common secondary and tertiary weights.
    #[inline]
    pub const fn from_primary(p: u32) -> Ce {
        Ce(((p as u64) << 32) | COMMON_SEC_AND_TER_CE)
    }

    /// A CE from all of its weights.
    #[inline]
    pub const fn new(p: u32, s: u32, t: u32, q: u32) -> Ce {
        Ce(((p as u64) << 32) | ((s as u64) << 16) | (t as u64) | ((q as u64) << 6))
    }

    /// Primary weight.
    #[inline]
    pub const fn primary(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Secondary weight.
    #[inline]
    pub const fn secondary(self) -> u32 {
        (self.0 as u32) >> 16
    }

    /// The low 16 bits: case, tertiary and quaternary bits.
    #[inline]
    pub const fn tertiary_with_case(self) -> u32 {
        (self.0 as u32) & 0xffff
    }

    /// Case bits, 0 = lowercase/uncased, 1 = mixed, 2 = uppercase.
    #[inline]
    pub const fn case_bits(self) -> u32 {
        ((self.0 as u32) >> 14) & 3
    }

    /// Secondary, case and tertiary weights.
    #[inline]
    pub const fn lower32(self) -> u32 {
        self.0 as u32
    }

    /// Whether the CE has zero weight on all levels.
    #[inline]
    pub const fn is_ignorable(self) -> bool {
        self.0 == 0
    }

    /// Encode as a simple CE32 if the weights fit, used for round trips and by the builder.
    pub fn to_simple_ce32(self) -> Option<Ce32> {
        let p = self.primary();
        let lower32 = self.lower32();
        let t = lower32 & 0xffff;
        // primary: top 16 bits, secondary: one byte, tertiary: one byte below 0xc0
        if p & 0xffff != 0 || lower32 & 0x00ff_00ff != 0 || (t >> 8) >= SPECIAL_CE32_LOW_BYTE {
            return None;
        }
        Some(Ce32(p | ((lower32 >> 16) & 0xff00) | (t >> 8)))
    }
}

impl Ce32 {
    /// Mapped to the base data.
    pub const FALLBACK: Ce32 = Ce32(SPECIAL_CE32_LOW_BYTE);
    /// Unassigned: implicit tag with all other bits set.
    pub const UNASSIGNED: Ce32 = Ce32(0xffff_ffff);
    /// Internal marker, never stored in data. It is a simple CE32 value that
    /// no mapping uses (primary 0, secondary 0, tertiary 1).
    pub const NO_CE32: Ce32 = Ce32(1);
    /// U+FFFE.
    pub const MERGE_SEPARATOR: Ce32 = Ce32(0x0200_0505);
    /// U+FFFF.
    pub const MAX_REGULAR: Ce32 = Ce32(0xffff_0505);
    /// U+FFFD.
    pub const FFFD: Ce32 = Ce32(0xfffd_0505);

    /// A simple CE32 from a two-byte primary (`pppp0000`), secondary byte and tertiary byte.
    #[inline]
    pub const fn simple(p: u32, s: u8, t: u8) -> Ce32 {
        Ce32((p & 0xffff_0000) | ((s as u32) << 8) | (t as u32))
    }

    /// A special CE32 with an index payload.
    #[inline]
    pub const fn from_tag_index(tag: Tag, index: u32) -> Ce32 {
        Ce32((index << 13) | SPECIAL_CE32_LOW_BYTE | tag as u32)
    }

    /// A special CE32 with index and length (or flags) payloads.
    #[inline]
    pub const fn from_tag_index_length(tag: Tag, index: u32, length: u32) -> Ce32 {
        Ce32((index << 13) | (length << 8) | SPECIAL_CE32_LOW_BYTE | tag as u32)
    }

    /// A long-primary CE32 for a three-byte primary `pppppp00`.
    #[inline]
    pub const fn long_primary(p: u32) -> Ce32 {
        Ce32(p | LONG_PRIMARY_CE32_LOW_BYTE)
    }

    /// A long-secondary CE32 for the low 32 bits of a primary-ignorable CE.
    #[inline]
    pub const fn long_secondary(lower32: u32) -> Ce32 {
        Ce32(lower32 | SPECIAL_CE32_LOW_BYTE | Tag::LongSecondary as u32)
    }

    /// A Latin-expansion CE32 for `[pp, 05, tt][00, ss, 05]`.
    #[inline]
    pub const fn latin_expansion(p_byte: u8, t_byte: u8, s_byte: u8) -> Ce32 {
        Ce32(
            ((p_byte as u32) << 24)
                | ((t_byte as u32) << 16)
                | ((s_byte as u32) << 8)
                | SPECIAL_CE32_LOW_BYTE
                | Tag::LatinExpansion as u32,
        )
    }

    /// The raw value.
    #[inline]
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// Whether the low byte marks a special CE32.
    #[inline]
    pub const fn is_special(self) -> bool {
        (self.0 & 0xff) >= SPECIAL_CE32_LOW_BYTE
    }

    /// The tag of a special CE32.
    #[inline]
    pub fn tag(self) -> Tag {
        Tag::from_nibble(self.0)
    }

    /// Whether this is a special CE32 with the given tag.
    #[inline]
    pub fn has_tag(self, tag: Tag) -> bool {
        self.is_special() && self.tag() == tag
    }

    /// Index payload, bits 31..13.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 >> 13) as usize
    }

    /// Length payload, bits 12..8.
    #[inline]
    pub const fn length(self) -> usize {
        ((self.0 >> 8) & 31) as usize
    }

    /// Digit value of a digit CE32.
    #[inline]
    pub const fn digit(self) -> u8 {
        ((self.0 >> 8) & 0xf) as u8
    }

    /// Simple, long-primary or long-secondary: one CE without any lookup.
    #[inline]
    pub fn is_simple_or_long(self) -> bool {
        !self.is_special() || matches!(self.tag(), Tag::LongPrimary | Tag::LongSecondary)
    }

    /// Resolvable without any data arrays.
    #[inline]
    pub fn is_self_contained(self) -> bool {
        !self.is_special()
            || matches!(
                self.tag(),
                Tag::LongPrimary | Tag::LongSecondary | Tag::LatinExpansion
            )
    }

    /// Decode the CE32 into its tagged form.
    pub fn decode(self) -> Ce32Kind {
        if !self.is_special() {
            return Ce32Kind::Simple;
        }
        match self.tag() {
            Tag::Fallback => Ce32Kind::Fallback,
            Tag::LongPrimary => Ce32Kind::LongPrimary(self.0 & 0xffff_ff00),
            Tag::LongSecondary => Ce32Kind::LongSecondary(self.0 & 0xffff_ff00),
            Tag::Reserved3 => Ce32Kind::Reserved3,
            Tag::LatinExpansion => Ce32Kind::LatinExpansion,
            Tag::Expansion32 => Ce32Kind::Expansion32 {
                index: self.index(),
                length: self.length(),
            },
            Tag::Expansion => Ce32Kind::Expansion {
                index: self.index(),
                length: self.length(),
            },
            Tag::BuilderData => Ce32Kind::BuilderData,
            Tag::Prefix => Ce32Kind::Prefix { index: self.index() },
            Tag::Contraction => Ce32Kind::Contraction {
                index: self.index(),
                flags: self.0 & 0xf00,
            },
            Tag::Digit => Ce32Kind::Digit {
                index: self.index(),
                digit: self.digit(),
            },
            Tag::U0000 => Ce32Kind::U0000,
            Tag::Hangul => Ce32Kind::Hangul {
                no_special_jamo: self.0 & HANGUL_NO_SPECIAL_JAMO != 0,
            },
            Tag::LeadSurrogate => Ce32Kind::LeadSurrogate {
                lead_type: self.0 & LEAD_TYPE_MASK,
            },
            Tag::Offset => Ce32Kind::Offset { index: self.index() },
            Tag::Implicit => Ce32Kind::Implicit,
        }
    }

    /// Unpack a simple CE32.
    #[inline]
    pub const fn simple_to_ce(self) -> Ce {
        let ce32 = self.0 as u64;
        Ce(((ce32 & 0xffff_0000) << 32) | ((ce32 & 0xff00) << 16) | ((ce32 & 0xff) << 8))
    }

    /// Unpack a simple, long-primary or long-secondary CE32.
    ///
    /// # Panics
    ///
    /// Panics on any other special CE32.
    pub fn to_ce(self) -> Ce {
        let t = self.0 & 0xff;
        if t < SPECIAL_CE32_LOW_BYTE {
            return self.simple_to_ce();
        }
        let rest = (self.0 - t) as u64;
        match Tag::from_nibble(t) {
            Tag::LongPrimary => Ce((rest << 32) | COMMON_SEC_AND_TER_CE),
            Tag::LongSecondary => Ce(rest),
            tag => panic!("CE32 {:?} with tag {:?} is not self-describing", self, tag),
        }
    }

    /// First CE of a Latin expansion.
    #[inline]
    pub const fn latin_ce0(self) -> Ce {
        let ce32 = self.0 as u64;
        Ce(((ce32 & 0xff00_0000) << 32) | COMMON_SECONDARY_CE | ((ce32 & 0xff_0000) >> 8))
    }

    /// Second CE of a Latin expansion.
    #[inline]
    pub const fn latin_ce1(self) -> Ce {
        let ce32 = self.0 as u64;
        Ce(((ce32 & 0xff00) << 16) | COMMON_TERTIARY_CE)
    }
}

impl fmt::Debug for Ce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ce({:08x}.{:04x}.{:04x})",
            self.primary(),
            self.secondary(),
            self.tertiary_with_case()
        )
    }
}

impl fmt::Debug for Ce32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_special() {
            write!(f, "Ce32({:08x} {:?})", self.0, self.tag())
        } else {
            write!(f, "Ce32({:08x})", self.0)
        }
    }
}

impl From<Ce> for u64 {
    fn from(ce: Ce) -> u64 {
        ce.0
    }
}

impl From<Ce32> for u32 {
    fn from(ce32: Ce32) -> u32 {
        ce32.0
    }
}
