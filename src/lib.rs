#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, missing_debug_implementations)]
//! Runtime core of the Unicode Collation Algorithm.
//!
//! Text is turned into a sequence of 64-bit collation elements (CEs) by a
//! [`CollationIterator`] reading from [`CollationData`]: a code point trie whose
//! values are either simple CEs packed into 32 bits or special values that point
//! into expansion arrays, context tries, offset ranges and the like.
//!
//! From the CEs, [`write_sort_key`] builds a binary sort key and [`compare_ces`]
//! compares two sequences directly. Both honor the same [`CollationSettings`]:
//! strength, alternate handling, case ordering, backward secondaries, numeric
//! collation and script reordering. A [`Collator`] ties data and settings
//! together for everyday use.
//!
//! # Building data
//!
//! [`CollationDataBuilder`] encodes explicit mappings from strings (optionally
//! with a prefix) to CEs, offset ranges of implicit-like primaries and the
//! script groups used for reordering. A builder created from base data builds a
//! tailoring that falls back to its base for everything it does not map.
//!
//! # Example
//!
//! ```
//! use std::cmp::Ordering;
//! use std::sync::Arc;
//! use ucacore::{Ce, CollationDataBuilder, Collator, CollatorOptions};
//!
//! let mut builder = CollationDataBuilder::new();
//! builder.add("", "a", &[Ce::from_primary(0x2000_0000)]).unwrap();
//! builder.add("", "b", &[Ce::from_primary(0x2100_0000)]).unwrap();
//! let data = Arc::new(builder.build().unwrap());
//!
//! let collator = Collator::new(data, CollatorOptions::default()).unwrap();
//! assert_eq!(Ordering::Less, collator.compare("a", "b"));
//! assert!(collator.sort_key("a") < collator.sort_key("b"));
//! ```

pub mod ce_ty;

pub mod weights;

pub mod trie;

pub mod contexts;

pub mod data;

pub mod data_builder;

pub mod fcd;

pub mod text;

pub(crate) mod skipped;

pub mod numeric;

pub mod iter;

pub mod settings;

pub mod sort_key;

pub mod identical;

pub mod compare;

pub mod collator;

pub mod error;

pub use ce_ty::{Ce, Ce32, Ce32Kind, Tag};

pub use error::{Error, Result};

pub use data::CollationData;

pub use data_builder::{CollationDataBuilder, ReorderGroup};

pub use text::{CollationText, Utf16Text, Utf8Text};

pub use iter::CollationIterator;

pub use settings::{
    reorder_code, Alternate, CaseFirst, CollationSettings, CollatorOptions, MaxVariable, Strength,
};

pub use sort_key::{write_sort_key, ByteSink, SortKey};

pub use compare::compare_ces;

pub use collator::Collator;

#[cfg(test)]
mod test_data;

#[cfg(test)]
mod proptests;
