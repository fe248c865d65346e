//! Shared data plus resolved settings: the entry point for comparing strings.

use std::cmp::Ordering;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::ce_ty::LEVEL_SEPARATOR_BYTE;
use crate::compare::compare_ces;
use crate::data::CollationData;
use crate::error::Result;
use crate::identical;
use crate::iter::CollationIterator;
use crate::settings::{CollationSettings, CollatorOptions, Strength};
use crate::sort_key::{write_sort_key, ByteSink, SortKey};
use crate::text::{CollationText, Utf16Text, Utf8Text};

/// Compares strings and builds sort keys for one set of options.
///
/// Cloning is cheap: the data is shared.
#[derive(Debug, Clone)]
pub struct Collator {
    data: Arc<CollationData>,
    settings: CollationSettings,
}

impl Collator {
    /// Resolve `options` against `data`.
    pub fn new(data: Arc<CollationData>, options: CollatorOptions) -> Result<Self> {
        let settings = CollationSettings::new(&data, options)?;
        tracing::debug!(
            strength = ?settings.strength(),
            shifted = settings.is_shifted(),
            reordering = settings.has_reordering(),
            "created collator"
        );
        Ok(Collator { data, settings })
    }

    /// The collation data.
    pub fn data(&self) -> &Arc<CollationData> {
        &self.data
    }

    /// The resolved settings.
    pub fn settings(&self) -> &CollationSettings {
        &self.settings
    }

    /// The options this collator was created with.
    pub fn options(&self) -> &CollatorOptions {
        self.settings.options()
    }

    /// Collation elements of `text`.
    pub fn iter_str<'a>(&'a self, text: &'a str) -> CollationIterator<'a, Utf8Text<'a>> {
        let text = if self.settings.normalization() {
            Utf8Text::with_fcd_check(text)
        } else {
            Utf8Text::new(text)
        };
        CollationIterator::new(&self.data, text, self.settings.numeric())
    }

    /// Collation elements of UTF-16 `units`.
    pub fn iter_utf16<'a>(&'a self, units: &'a [u16]) -> CollationIterator<'a, Utf16Text<'a>> {
        let text = if self.settings.normalization() {
            Utf16Text::with_fcd_check(units)
        } else {
            Utf16Text::new(units)
        };
        CollationIterator::new(&self.data, text, self.settings.numeric())
    }

    /// Append the sort key of `text` to `sink`.
    pub fn write_sort_key(&self, text: &str, sink: &mut impl ByteSink) {
        write_sort_key(&mut self.iter_str(text), &self.settings, sink);
        if self.settings.strength() == Strength::Identical {
            sink.append_byte(LEVEL_SEPARATOR_BYTE);
            identical::write_identical_level_str(text, sink);
        }
    }

    /// Append the sort key of UTF-16 `units` to `sink`.
    pub fn write_sort_key_utf16(&self, units: &[u16], sink: &mut impl ByteSink) {
        write_sort_key(&mut self.iter_utf16(units), &self.settings, sink);
        if self.settings.strength() == Strength::Identical {
            sink.append_byte(LEVEL_SEPARATOR_BYTE);
            identical::write_identical_level_utf16(units, sink);
        }
    }

    /// Sort key of `text`.
    pub fn sort_key(&self, text: &str) -> SortKey {
        let mut key = Vec::new();
        self.write_sort_key(text, &mut key);
        SortKey::from(key)
    }

    /// Sort key of UTF-16 `units`.
    pub fn sort_key_utf16(&self, units: &[u16]) -> SortKey {
        let mut key = Vec::new();
        self.write_sort_key_utf16(units, &mut key);
        SortKey::from(key)
    }

    /// Compare two strings. Agrees with comparing their sort keys.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        if left == right {
            return Ordering::Equal;
        }
        let order = self.compare_iters(self.iter_str(left), self.iter_str(right));
        if order != Ordering::Equal || self.settings.strength() != Strength::Identical {
            return order;
        }
        left.nfd().cmp(right.nfd())
    }

    /// Compare two UTF-16 strings. Agrees with comparing their sort keys.
    pub fn compare_utf16(&self, left: &[u16], right: &[u16]) -> Ordering {
        if left == right {
            return Ordering::Equal;
        }
        let order = self.compare_iters(self.iter_utf16(left), self.iter_utf16(right));
        if order != Ordering::Equal || self.settings.strength() != Strength::Identical {
            return order;
        }
        identical::nfd_utf16(left).cmp(&identical::nfd_utf16(right))
    }

    fn compare_iters<L: CollationText, R: CollationText>(
        &self,
        mut left: CollationIterator<'_, L>,
        mut right: CollationIterator<'_, R>,
    ) -> Ordering {
        left.fetch_ces();
        right.fetch_ces();
        compare_ces(&self.settings, left.ces(), right.ces())
    }
}
