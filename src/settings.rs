//! Comparison options and their resolution against collation data.

use crate::data::CollationData;
use crate::error::Result;

/// Script codes and special reorder group codes.
///
/// Script values follow the Unicode script code numbering; special groups
/// start at [`FIRST`].
pub mod reorder_code {
    /// Use the data's default order.
    pub const DEFAULT: i32 = -1;
    /// Everything not named, or no reordering when used alone.
    pub const NONE: i32 = 103;
    /// Unassigned code points and other ungrouped characters.
    pub const UNKNOWN: i32 = 103;

    /// First special group code.
    pub const FIRST: i32 = 0x1000;
    /// Whitespace.
    pub const SPACE: i32 = 0x1000;
    /// Punctuation.
    pub const PUNCTUATION: i32 = 0x1001;
    /// Symbols other than currency.
    pub const SYMBOL: i32 = 0x1002;
    /// Currency symbols.
    pub const CURRENCY: i32 = 0x1003;
    /// Decimal digits.
    pub const DIGIT: i32 = 0x1004;

    /// Arabic.
    pub const ARABIC: i32 = 2;
    /// Cyrillic.
    pub const CYRILLIC: i32 = 8;
    /// Greek.
    pub const GREEK: i32 = 14;
    /// Han.
    pub const HAN: i32 = 17;
    /// Hangul.
    pub const HANGUL: i32 = 18;
    /// Latin.
    pub const LATIN: i32 = 25;

    /// Special groups that take part in reordering.
    pub const MAX_NUM_SPECIAL: usize = 8;
    /// Slots for special groups after the script entries of the scripts index.
    pub const NUM_SPECIAL_SLOTS: usize = 16;
    /// Lead bytes kept free below Latin.
    pub const RESERVED_BEFORE_LATIN: i32 = FIRST + 14;
    /// Lead bytes kept free above Latin.
    pub const RESERVED_AFTER_LATIN: i32 = FIRST + 15;
}

/// Number of levels compared.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strength {
    /// Base letters.
    Primary,
    /// Accents.
    Secondary,
    /// Case and variants.
    #[default]
    Tertiary,
    /// Shifted variable characters.
    Quaternary,
    /// Code point order of the NFD text as a tie breaker.
    Identical,
}

/// Handling of variable characters: spaces, punctuation and, depending on
/// [`MaxVariable`], symbols.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Alternate {
    /// Variable characters have ordinary weights.
    #[default]
    NonIgnorable,
    /// Variable characters are ignored up to the quaternary level.
    Shifted,
}

/// Highest special group treated as variable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaxVariable {
    /// Spaces.
    Space,
    /// Spaces and punctuation.
    #[default]
    Punct,
    /// Spaces, punctuation and symbols.
    Symbol,
    /// Spaces, punctuation, symbols and currency symbols.
    Currency,
}

impl MaxVariable {
    /// The special reorder group this setting ends with.
    pub fn group(self) -> i32 {
        reorder_code::FIRST + self as i32
    }
}

/// Order of upper- and lowercase variants.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CaseFirst {
    /// Case differences are ordinary tertiary differences.
    #[default]
    Off,
    /// Lowercase sorts before uppercase.
    LowerFirst,
    /// Uppercase sorts before lowercase.
    UpperFirst,
}

/// User-facing comparison options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollatorOptions {
    /// Number of levels compared.
    pub strength: Strength,
    /// Handling of variable characters.
    pub alternate: Alternate,
    /// Last group of variable characters.
    pub max_variable: MaxVariable,
    /// Order of case variants.
    pub case_first: CaseFirst,
    /// Insert a level with only case bits after the secondary level.
    pub case_level: bool,
    /// Compare secondary weights from the end of the string (French).
    pub backward_secondary: bool,
    /// Collate digit runs by numeric value.
    pub numeric: bool,
    /// Normalize input that is not FCD before collating.
    pub normalization: bool,
    /// Script and group codes in the desired order.
    pub reorder_codes: Vec<i32>,
}

impl CollatorOptions {
    /// Options with the given strength and all else default.
    pub fn with_strength(strength: Strength) -> Self {
        CollatorOptions {
            strength,
            ..Default::default()
        }
    }
}

/// Options resolved against one [`CollationData`].
#[derive(Clone, Debug)]
pub struct CollationSettings {
    pub(crate) options: CollatorOptions,
    /// Primaries at or below this are variable when shifted.
    pub(crate) variable_top: u32,
    /// New lead byte per old one; 0 means the byte is split and needs `reorder_ranges`.
    reorder_table: Option<Box<[u8; 256]>>,
    reorder_ranges: Box<[u32]>,
    min_high_no_reorder: u32,
}

/// Case and tertiary bits of the 16-bit tertiary field.
pub(crate) const CASE_AND_TERTIARY_MASK: u32 = 0xff3f;
/// Tertiary bits only.
pub(crate) const ONLY_TERTIARY_MASK: u32 = 0x3f3f;

impl CollationSettings {
    /// Resolve `options` against `data`.
    pub fn new(data: &CollationData, options: CollatorOptions) -> Result<Self> {
        let variable_top = data.get_last_primary_for_group(options.max_variable.group());
        let mut settings = CollationSettings {
            options,
            variable_top,
            reorder_table: None,
            reorder_ranges: Box::new([]),
            min_high_no_reorder: 0,
        };
        let codes = settings.options.reorder_codes.clone();
        settings.set_reordering(data, &codes)?;
        tracing::debug!(
            strength = ?settings.options.strength,
            variable_top = format_args!("{:#010x}", variable_top),
            reorder_ranges = ?settings.reorder_ranges,
            "resolved collation settings"
        );
        Ok(settings)
    }

    fn set_reordering(&mut self, data: &CollationData, codes: &[i32]) -> Result<()> {
        if codes.is_empty() || (codes.len() == 1 && codes[0] == reorder_code::NONE) {
            return Ok(());
        }
        let ranges = data.make_reorder_ranges(codes)?;
        let last = match ranges.last() {
            Some(&last) => last,
            None => return Ok(()),
        };
        self.min_high_no_reorder = last & 0xffff_0000;

        let mut table = Box::new([0u8; 256]);
        let mut b = 0usize;
        let mut first_split = None;
        for (i, &pair) in ranges.iter().enumerate() {
            let limit1 = (pair >> 24) as usize;
            while b < limit1 {
                table[b] = (b as u32).wrapping_add(pair) as u8;
                b += 1;
            }
            // a limit inside a lead byte splits it
            if pair & 0xff_0000 != 0 {
                table[limit1] = 0;
                b = limit1 + 1;
                first_split.get_or_insert(i);
            }
        }
        while b <= 0xff {
            table[b] = b as u8;
            b += 1;
        }
        self.reorder_ranges = match first_split {
            Some(i) => ranges[i..].into(),
            None => Box::new([]),
        };
        self.reorder_table = Some(table);
        Ok(())
    }

    /// The options these settings were resolved from.
    pub fn options(&self) -> &CollatorOptions {
        &self.options
    }

    /// Compared levels.
    #[inline]
    pub fn strength(&self) -> Strength {
        self.options.strength
    }

    /// Whether variable primaries move to the quaternary level.
    #[inline]
    pub fn is_shifted(&self) -> bool {
        self.options.alternate == Alternate::Shifted
    }

    /// Highest variable primary.
    #[inline]
    pub fn variable_top(&self) -> u32 {
        self.variable_top
    }

    /// Whether digit runs collate numerically.
    #[inline]
    pub fn numeric(&self) -> bool {
        self.options.numeric
    }

    /// Whether non-FCD input is normalized first.
    #[inline]
    pub fn normalization(&self) -> bool {
        self.options.normalization
    }

    /// Whether primaries are permuted.
    #[inline]
    pub fn has_reordering(&self) -> bool {
        self.reorder_table.is_some()
    }

    /// Mask for the tertiary field: case bits stay only when they act as tertiary weights.
    pub(crate) fn tertiary_mask(&self) -> u32 {
        if !self.options.case_level && self.options.case_first != CaseFirst::Off {
            CASE_AND_TERTIARY_MASK
        } else {
            ONLY_TERTIARY_MASK
        }
    }

    /// Map a primary into the reordered primary space.
    pub fn reorder(&self, p: u32) -> u32 {
        let table = match &self.reorder_table {
            Some(table) => table,
            None => return p,
        };
        let b = table[(p >> 24) as usize] as u32;
        if b != 0 || p <= 1 {
            return (b << 24) | (p & 0xff_ffff);
        }
        if p >= self.min_high_no_reorder {
            return p;
        }
        // round up past any offset bits
        let q = p | 0xffff;
        self.reorder_ranges
            .iter()
            .find(|&&r| q < r)
            .map_or(p, |&r| p.wrapping_add(r << 24))
    }
}
