//! Building [`CollationData`] from explicit mappings.
//!
//! Mappings are collected per code point and encoded in one pass by
//! [`CollationDataBuilder::build`], which picks the most compact CE32 form for
//! every CE sequence and shares identical expansions.

use std::collections::BTreeMap;
use std::sync::Arc;

use icu_collections::codepointinvlist::CodePointInversionListBuilder;

use crate::ce_ty::{
    Ce, Ce32, Ce32Kind, Tag, COMMON_SEC_AND_TER_CE, CONTRACT_NEXT_CCC, CONTRACT_SINGLE_CP_NO_MATCH,
    CONTRACT_TRAILING_CCC, HANGUL_NO_SPECIAL_JAMO, LEAD_ALL_SIMPLE, LEAD_ALL_UNASSIGNED, LEAD_MIXED,
    MAX_EXPANSION_LENGTH, MAX_INDEX,
};
use crate::contexts::{read_context, write_context};
use crate::data::{hangul, CollationData};
use crate::error::{Error, Result};
use crate::fcd;
use crate::settings::reorder_code;
use crate::trie::TrieBuilder;
use crate::weights;

/// Prefix and contraction suffix of one mapping. Both empty for the plain mapping.
type ContextKey = (Vec<u32>, Vec<u32>);

/// A script or special group and the 16-bit primary prefix it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderGroup {
    /// Script codes and special group codes that name this group.
    pub codes: Vec<i32>,
    /// Top 16 bits of the group's first primary.
    pub start: u16,
}

impl ReorderGroup {
    /// A group named by `codes` starting at `start`.
    pub fn new(codes: impl Into<Vec<i32>>, start: u16) -> Self {
        ReorderGroup {
            codes: codes.into(),
            start,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OffsetRange {
    start: u32,
    end: u32,
    primary: u32,
    step: u8,
}

#[derive(Debug, Clone, Default)]
struct GroupTable {
    num_scripts: usize,
    scripts_index: Vec<u16>,
    script_starts: Vec<u16>,
}

/// Collects mappings for root data or for a tailoring of a base.
#[derive(Debug)]
pub struct CollationDataBuilder {
    base: Option<Arc<CollationData>>,
    mappings: BTreeMap<u32, BTreeMap<ContextKey, Vec<Ce>>>,
    offset_ranges: Vec<OffsetRange>,
    digits: BTreeMap<u32, u8>,
    numeric_primary: u32,
    compressible_bytes: [bool; 256],
    groups: GroupTable,
}

impl CollationDataBuilder {
    /// Builder for root data: unmapped code points get implicit weights.
    pub fn new() -> Self {
        CollationDataBuilder {
            base: None,
            mappings: BTreeMap::new(),
            offset_ranges: Vec::new(),
            digits: BTreeMap::new(),
            numeric_primary: 0,
            compressible_bytes: [false; 256],
            groups: GroupTable::default(),
        }
    }

    /// Builder for a tailoring: unmapped code points fall back to `base`.
    ///
    /// The numeric primary, compressible lead bytes and reorder groups are
    /// taken from the base.
    pub fn tailoring(base: Arc<CollationData>) -> Self {
        let groups = GroupTable {
            num_scripts: base.num_scripts,
            scripts_index: base.scripts_index.to_vec(),
            script_starts: base.script_starts.to_vec(),
        };
        CollationDataBuilder {
            numeric_primary: base.numeric_primary,
            compressible_bytes: base.compressible_bytes,
            groups,
            base: Some(base),
            ..Self::new()
        }
    }

    /// Map `s`, when preceded by `prefix`, to `ces`.
    ///
    /// The first code point of `s` carries the mapping; the rest of `s` is a
    /// contraction suffix. A later mapping for the same strings replaces an earlier one.
    pub fn add(&mut self, prefix: &str, s: &str, ces: &[Ce]) -> Result<()> {
        let mut chars = s.chars().map(u32::from);
        let c = chars
            .next()
            .ok_or_else(|| Error::invalid_mapping("empty string"))?;
        if hangul::is_syllable(c) {
            return Err(Error::invalid_mapping(format!(
                "Hangul syllable U+{:04X} is collated through its Jamo",
                c
            )));
        }
        if c == 0xfffe || c == 0xffff {
            return Err(Error::invalid_mapping(format!("U+{:04X} has a fixed mapping", c)));
        }
        if ces.len() > MAX_EXPANSION_LENGTH {
            return Err(Error::ExpansionTooLong(ces.len()));
        }
        if let Some(ce) = ces.iter().find(|ce| ce.tertiary_with_case() & 0xc000 == 0xc000) {
            return Err(Error::invalid_mapping(format!("{:?} has invalid case bits", ce)));
        }
        let key: ContextKey = (prefix.chars().map(u32::from).collect(), chars.collect());
        tracing::trace!(c, ?key, len = ces.len(), "add mapping");
        self.mappings.entry(c).or_default().insert(key, ces.to_vec());
        Ok(())
    }

    /// Give `start..=end` computed three-byte primaries from `primary` on, `step` apart.
    ///
    /// Explicit mappings inside the range take precedence.
    pub fn add_offset_range(&mut self, start: u32, end: u32, primary: u32, step: u8) -> Result<()> {
        if end > 0x10_ffff || start > end {
            return Err(Error::InvalidCodePoint(end));
        }
        if primary & 0xff != 0 || primary & 0xff00 == 0 || step == 0 || step > 0x7f {
            return Err(Error::invalid_mapping(format!(
                "offset range primary {:08x} step {}",
                primary, step
            )));
        }
        self.offset_ranges.push(OffsetRange {
            start,
            end,
            primary,
            step,
        });
        Ok(())
    }

    /// Mark `c` as a decimal digit with `value` for numeric collation.
    ///
    /// ASCII digits are marked automatically.
    pub fn set_digit(&mut self, c: u32, value: u8) -> Result<()> {
        if c > 0x10_ffff || (0xd800..0xe000).contains(&c) {
            return Err(Error::InvalidCodePoint(c));
        }
        if value > 9 {
            return Err(Error::invalid_mapping(format!("digit value {}", value)));
        }
        self.digits.insert(c, value);
        Ok(())
    }

    /// First primary of the numeric collation range; its second byte must be 0.
    pub fn set_numeric_primary(&mut self, p: u32) {
        self.numeric_primary = p & 0xff00_0000;
    }

    /// Let sort keys compress runs of primaries with lead byte `b`.
    pub fn set_compressible_lead_byte(&mut self, b: u8) {
        self.compressible_bytes[b as usize] = true;
    }

    /// Define the script and special groups in ascending primary order.
    pub fn set_reorder_groups(&mut self, groups: &[ReorderGroup]) -> Result<()> {
        let low_start = 0x0300u16;
        let high_limit = 0xff00u16;
        let mut starts = vec![0u16];
        for group in groups {
            let prev = starts[starts.len() - 1];
            if group.start < low_start || group.start >= high_limit || group.start <= prev {
                return Err(Error::invalid_groups(format!(
                    "group start {:04x} out of order or range",
                    group.start
                )));
            }
            if group.codes.is_empty() {
                return Err(Error::invalid_groups("group without codes"));
            }
            starts.push(group.start);
        }
        starts.push(high_limit);

        let num_scripts = groups
            .iter()
            .flat_map(|g| g.codes.iter())
            .filter(|&&code| (0..reorder_code::FIRST).contains(&code))
            .map(|&code| code as usize + 1)
            .max()
            .unwrap_or(0);
        let mut scripts_index = vec![0u16; num_scripts + reorder_code::NUM_SPECIAL_SLOTS];
        for (i, group) in groups.iter().enumerate() {
            for &code in &group.codes {
                let slot = if (0..reorder_code::FIRST).contains(&code) {
                    code as usize
                } else if (reorder_code::FIRST..reorder_code::FIRST + reorder_code::NUM_SPECIAL_SLOTS as i32)
                    .contains(&code)
                {
                    num_scripts + (code - reorder_code::FIRST) as usize
                } else {
                    return Err(Error::invalid_groups(format!("invalid group code {}", code)));
                };
                if scripts_index[slot] != 0 {
                    return Err(Error::invalid_groups(format!("duplicate group code {}", code)));
                }
                scripts_index[slot] = (i + 1) as u16;
            }
        }
        self.groups = GroupTable {
            num_scripts,
            scripts_index,
            script_starts: starts,
        };
        Ok(())
    }

    /// Encode everything into immutable data.
    pub fn build(&self) -> Result<CollationData> {
        let initial = match self.base {
            Some(_) => Ce32::FALLBACK,
            None => Ce32::UNASSIGNED,
        };
        let mut trie = TrieBuilder::new(initial.into_inner(), Ce32::FFFD.into_inner());
        let mut encoder = Encoder::new();

        for range in &self.offset_ranges {
            let compressible = self.compressible_bytes[(range.primary >> 24) as usize];
            let data_ce = weights::offset_data_ce(range.primary, range.start, compressible, range.step);
            let index = encoder.push_ces(&[data_ce])?;
            trie.set_range(range.start, range.end, Ce32::from_tag_index(Tag::Offset, index).into_inner());
        }

        let mappings = self.effective_mappings()?;
        let mut unsafe_code_points = Vec::new();
        for (&c, entries) in &mappings {
            let ce32 = encoder.encode_code_point(c, entries, self.digit_value(c))?;
            trie.set(c, ce32.into_inner());
            for (_, suffix) in entries.keys() {
                unsafe_code_points.extend_from_slice(suffix);
            }
        }

        if self.base.is_none() {
            // U+FFFE is the merge separator, U+FFFF sorts above every other character
            trie.set(0xfffe, Ce32::MERGE_SEPARATOR.into_inner());
            trie.set(0xffff, Ce32::MAX_REGULAR.into_inner());
        }

        let mut jamo_ce32s = [Ce32::UNASSIGNED.into_inner(); hangul::JAMO_CE32S_LENGTH];
        let maps_jamo = mappings.keys().any(|&c| hangul::jamo_index(c).is_some());
        if self.base.is_none() || maps_jamo {
            let mut no_special_jamo = true;
            for (c, slot) in jamo_code_points() {
                let ces = match mappings.get(&c).and_then(|entries| entries.get(&(Vec::new(), Vec::new()))) {
                    Some(ces) => ces.clone(),
                    None => match &self.base {
                        Some(base) => ces_for_code_point(base, c)?,
                        None => vec![weights::unassigned_ce(c as i32)],
                    },
                };
                let ce32 = encoder.encode_ces(&ces)?;
                no_special_jamo &= !ce32.is_special();
                jamo_ce32s[slot] = ce32.into_inner();
            }
            let mut hangul_ce32 = Ce32::from_tag_index(Tag::Hangul, 0).into_inner();
            if no_special_jamo {
                hangul_ce32 |= HANGUL_NO_SPECIAL_JAMO;
            }
            trie.set_range(hangul::SYLLABLE_BASE, hangul::SYLLABLE_END, hangul_ce32);
        }

        let u0000 = trie.get(0);
        if u0000 != Ce32::FALLBACK.into_inner() {
            encoder.ce32s[0] = u0000;
            trie.set(0, Ce32::from_tag_index(Tag::U0000, 0).into_inner());
        }

        let lead_ce32s: Vec<u32> = (0..0x400u32)
            .map(|lead| Ce32::from_tag_index(Tag::LeadSurrogate, 0).into_inner() | lead_type(&trie, lead))
            .collect();

        let mut unsafe_backward = CodePointInversionListBuilder::new();
        if let Some(base) = &self.base {
            unsafe_backward.add_set(&base.unsafe_backward);
        }
        for c in unsafe_code_points {
            unsafe_backward.add32(c);
        }
        let unsafe_backward = unsafe_backward.build();

        let trie = trie.build();
        tracing::debug!(
            mappings = mappings.len(),
            ce32s = encoder.ce32s.len(),
            ces = encoder.ces.len(),
            contexts = encoder.contexts.len(),
            trie_size = trie.size(),
            tailoring = self.base.is_some(),
            "built collation data"
        );
        Ok(CollationData {
            trie,
            ce32s: encoder.ce32s.into_boxed_slice(),
            ces: encoder.ces.into_boxed_slice(),
            contexts: encoder.contexts.into_boxed_slice(),
            base: self.base.clone(),
            jamo_ce32s,
            lead_ce32s: lead_ce32s.into_boxed_slice(),
            numeric_primary: self.numeric_primary,
            compressible_bytes: self.compressible_bytes,
            unsafe_backward,
            num_scripts: self.groups.num_scripts,
            scripts_index: self.groups.scripts_index.clone().into_boxed_slice(),
            script_starts: self.groups.script_starts.clone().into_boxed_slice(),
        })
    }

    fn digit_value(&self, c: u32) -> Option<u8> {
        match c {
            0x30..=0x39 => Some((c - 0x30) as u8),
            _ => self.digits.get(&c).copied(),
        }
    }

    /// Own mappings plus, for a tailoring, every base mapping of the same code
    /// points that is not overridden, so that base contexts survive.
    fn effective_mappings(&self) -> Result<BTreeMap<u32, BTreeMap<ContextKey, Vec<Ce>>>> {
        let base = match &self.base {
            Some(base) => base,
            None => return Ok(self.mappings.clone()),
        };
        let mut mappings = self.mappings.clone();
        for (&c, entries) in mappings.iter_mut() {
            let (d, ce32) = base.resolve(c);
            let mut inherited = Vec::new();
            base_mappings(d, c, ce32, &mut inherited)?;
            for (key, ces) in inherited {
                entries.entry(key).or_insert(ces);
            }
        }
        Ok(mappings)
    }
}

impl Default for CollationDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn jamo_code_points() -> impl Iterator<Item = (u32, usize)> {
    let l = hangul::JAMO_L_BASE..hangul::JAMO_L_BASE + hangul::JAMO_L_COUNT;
    let v = hangul::JAMO_V_BASE..hangul::JAMO_V_BASE + hangul::JAMO_V_COUNT;
    let t = hangul::JAMO_T_BASE + 1..hangul::JAMO_T_BASE + hangul::JAMO_T_COUNT;
    l.chain(v).chain(t).enumerate().map(|(slot, c)| (c, slot))
}

/// How the supplementary code points behind lead surrogate `lead` are mapped.
fn lead_type(trie: &TrieBuilder, lead: u32) -> u32 {
    let start = 0x1_0000 + (lead << 10);
    let mut all_unassigned = true;
    let mut all_simple = true;
    for c in start..start + 0x400 {
        let ce32 = Ce32(trie.get(c));
        all_unassigned &= ce32 == Ce32::UNASSIGNED;
        all_simple &= !ce32.is_special();
        if !all_unassigned && !all_simple {
            return LEAD_MIXED;
        }
    }
    if all_unassigned {
        LEAD_ALL_UNASSIGNED
    } else {
        LEAD_ALL_SIMPLE
    }
}

/// Every context mapping stored for `c` in `d`, with its CEs.
fn base_mappings(d: &CollationData, c: u32, ce32: Ce32, out: &mut Vec<(ContextKey, Vec<Ce>)>) -> Result<()> {
    match ce32.decode() {
        Ce32Kind::Prefix { index } => {
            let (default, entries) = read_context(d.contexts(), index);
            base_contractions(d, c, Vec::new(), Ce32(default), out)?;
            for (reversed, value) in entries {
                let prefix = reversed.into_iter().rev().collect();
                base_contractions(d, c, prefix, Ce32(value), out)?;
            }
            Ok(())
        }
        _ => base_contractions(d, c, Vec::new(), ce32, out),
    }
}

fn base_contractions(
    d: &CollationData,
    c: u32,
    prefix: Vec<u32>,
    ce32: Ce32,
    out: &mut Vec<(ContextKey, Vec<Ce>)>,
) -> Result<()> {
    if let Ce32Kind::Contraction { index, .. } = ce32.decode() {
        let (default, entries) = read_context(d.contexts(), index);
        for (suffix, value) in entries {
            out.push(((prefix.clone(), suffix), ces_for_ce32(d, c, Ce32(value))?));
        }
        out.push(((prefix, Vec::new()), ces_for_ce32(d, c, Ce32(default))?));
    } else {
        out.push(((prefix, Vec::new()), ces_for_ce32(d, c, ce32)?));
    }
    Ok(())
}

/// CEs of `c` alone, without any context.
fn ces_for_code_point(data: &CollationData, c: u32) -> Result<Vec<Ce>> {
    let (d, ce32) = data.resolve(c);
    ces_for_ce32(d, c, ce32)
}

/// Expand a CE32 of `d` into CEs; contexts contribute their default.
pub(crate) fn ces_for_ce32(d: &CollationData, c: u32, ce32: Ce32) -> Result<Vec<Ce>> {
    let mut ce32 = ce32;
    loop {
        match ce32.decode() {
            Ce32Kind::Simple | Ce32Kind::LongPrimary(_) | Ce32Kind::LongSecondary(_) => return Ok(vec![ce32.to_ce()]),
            Ce32Kind::LatinExpansion => return Ok(vec![ce32.latin_ce0(), ce32.latin_ce1()]),
            Ce32Kind::Expansion32 { index, length } => {
                return Ok(d.ce32s[index..index + length].iter().map(|&e| Ce32(e).to_ce()).collect())
            }
            Ce32Kind::Expansion { index, length } => {
                return Ok(d.ces[index..index + length].iter().map(|&e| Ce(e)).collect())
            }
            Ce32Kind::Prefix { index } | Ce32Kind::Contraction { index, .. } => ce32 = d.get_ce32_from_contexts(index),
            Ce32Kind::Digit { index, .. } => ce32 = d.ce32_at(index),
            Ce32Kind::U0000 => ce32 = d.ce32_at(0),
            Ce32Kind::Offset { .. } => return Ok(vec![d.get_ce_from_offset_ce32(c, ce32)]),
            Ce32Kind::Implicit => return Ok(vec![weights::unassigned_ce(c as i32)]),
            Ce32Kind::Fallback => match d.base() {
                Some(base) => return ces_for_code_point(base, c),
                None => return Err(Error::internal(format!("fallback for U+{:04X} without base", c))),
            },
            Ce32Kind::Hangul { .. }
            | Ce32Kind::LeadSurrogate { .. }
            | Ce32Kind::Reserved3
            | Ce32Kind::BuilderData => {
                return Err(Error::internal(format!(
                    "cannot expand {:?} CE32 of U+{:04X}",
                    ce32.tag(),
                    c
                )))
            }
        }
    }
}

/// The arenas under construction.
#[derive(Debug)]
struct Encoder {
    ce32s: Vec<u32>,
    ces: Vec<u64>,
    contexts: Vec<u32>,
}

impl Encoder {
    fn new() -> Self {
        // index 0 of the CE32 arena is reserved for U+0000
        Encoder {
            ce32s: vec![0],
            ces: Vec::new(),
            contexts: Vec::new(),
        }
    }

    fn encode_code_point(&mut self, c: u32, entries: &BTreeMap<ContextKey, Vec<Ce>>, digit: Option<u8>) -> Result<Ce32> {
        let bare_key = (Vec::new(), Vec::new());
        if entries.len() == 1 {
            if let Some(ces) = entries.get(&bare_key) {
                let ce32 = self.encode_ces(ces)?;
                return match digit {
                    Some(value) => {
                        let index = self.push_ce32s(&[ce32.into_inner()])?;
                        Ok(Ce32::from_tag_index_length(Tag::Digit, index, value as u32))
                    }
                    None => Ok(ce32),
                };
            }
        }

        let mut by_prefix: BTreeMap<&[u32], BTreeMap<&[u32], &[Ce]>> = BTreeMap::new();
        for ((prefix, suffix), ces) in entries {
            by_prefix
                .entry(prefix.as_slice())
                .or_default()
                .insert(suffix.as_slice(), ces.as_slice());
        }
        let bare_ce32 = match entries.get(&bare_key) {
            Some(ces) => Some(self.encode_ces(ces)?),
            None => None,
        };
        let mut no_prefix_ce32 = None;
        let mut prefix_entries = Vec::new();
        for (prefix, suffixes) in &by_prefix {
            let ce32 = self.encode_contractions(c, suffixes, bare_ce32)?;
            if prefix.is_empty() {
                no_prefix_ce32 = Some(ce32);
            } else {
                prefix_entries.push((prefix.iter().rev().copied().collect::<Vec<u32>>(), ce32.into_inner()));
            }
        }
        if prefix_entries.is_empty() {
            return no_prefix_ce32.ok_or_else(|| Error::internal("code point without mappings"));
        }
        let default = no_prefix_ce32.unwrap_or(Ce32::UNASSIGNED);
        prefix_entries.sort();
        let index = self.push_context(default.into_inner(), &prefix_entries)?;
        Ok(Ce32::from_tag_index(Tag::Prefix, index))
    }

    /// CE32 for the mappings that share one prefix: plain, or a contraction entry.
    fn encode_contractions(&mut self, c: u32, suffixes: &BTreeMap<&[u32], &[Ce]>, bare_ce32: Option<Ce32>) -> Result<Ce32> {
        let own = match suffixes.get(&[][..]) {
            Some(ces) => Some(self.encode_ces(ces)?),
            None => None,
        };
        let contractions: Vec<(&[u32], &[Ce])> = suffixes
            .iter()
            .filter(|(suffix, _)| !suffix.is_empty())
            .map(|(&suffix, &ces)| (suffix, ces))
            .collect();
        if contractions.is_empty() {
            return own.ok_or_else(|| Error::internal(format!("no mapping for U+{:04X}", c)));
        }
        let mut flags = 0;
        let default = match own {
            Some(ce32) => ce32,
            None => {
                flags |= CONTRACT_SINGLE_CP_NO_MATCH;
                bare_ce32.unwrap_or(Ce32::UNASSIGNED)
            }
        };
        if contractions.iter().all(|(suffix, _)| fcd::lccc(suffix[0]) != 0) {
            flags |= CONTRACT_NEXT_CCC;
        }
        if contractions.iter().any(|(suffix, _)| fcd::lccc(suffix[suffix.len() - 1]) != 0) {
            flags |= CONTRACT_TRAILING_CCC;
        }
        let mut context_entries = Vec::with_capacity(contractions.len());
        for (suffix, ces) in contractions {
            context_entries.push((suffix.to_vec(), self.encode_ces(ces)?.into_inner()));
        }
        let index = self.push_context(default.into_inner(), &context_entries)?;
        Ok(Ce32(Ce32::from_tag_index(Tag::Contraction, index).into_inner() | flags))
    }

    /// The most compact CE32 for a CE sequence.
    fn encode_ces(&mut self, ces: &[Ce]) -> Result<Ce32> {
        if ces.len() > MAX_EXPANSION_LENGTH {
            return Err(Error::ExpansionTooLong(ces.len()));
        }
        match ces {
            [] => return Ok(Ce32(0)),
            [ce] => {
                if let Some(ce32) = encode_single(*ce) {
                    return Ok(ce32);
                }
            }
            [ce0, ce1] => {
                if let Some(ce32) = encode_latin(*ce0, *ce1) {
                    return Ok(ce32);
                }
            }
            _ => {}
        }
        let single: Option<Vec<u32>> = ces.iter().map(|&ce| encode_single(ce).map(Ce32::into_inner)).collect();
        match single {
            Some(ce32s) => {
                let index = self.push_ce32s(&ce32s)?;
                Ok(Ce32::from_tag_index_length(Tag::Expansion32, index, ce32s.len() as u32))
            }
            None => {
                let index = self.push_ces(ces)?;
                Ok(Ce32::from_tag_index_length(Tag::Expansion, index, ces.len() as u32))
            }
        }
    }

    fn push_ce32s(&mut self, values: &[u32]) -> Result<u32> {
        let found = self.ce32s[1..]
            .windows(values.len())
            .position(|w| w == values)
            .map(|i| i + 1);
        let index = found.unwrap_or_else(|| {
            self.ce32s.extend_from_slice(values);
            self.ce32s.len() - values.len()
        });
        check_index(index)
    }

    fn push_ces(&mut self, values: &[Ce]) -> Result<u32> {
        let raw: Vec<u64> = values.iter().map(|ce| ce.0).collect();
        let found = self.ces.windows(raw.len()).position(|w| w == raw.as_slice());
        let index = found.unwrap_or_else(|| {
            self.ces.extend_from_slice(&raw);
            self.ces.len() - raw.len()
        });
        check_index(index)
    }

    fn push_context(&mut self, default: u32, entries: &[(Vec<u32>, u32)]) -> Result<u32> {
        let index = write_context(&mut self.contexts, default, entries)?;
        check_index(index)
    }
}

fn check_index(index: usize) -> Result<u32> {
    if index > MAX_INDEX as usize {
        return Err(Error::IndexOverflow(index));
    }
    Ok(index as u32)
}

/// Simple, long-primary or long-secondary CE32 for one CE.
fn encode_single(ce: Ce) -> Option<Ce32> {
    if let Some(ce32) = ce.to_simple_ce32() {
        return Some(ce32);
    }
    let p = ce.primary();
    let lower32 = ce.lower32();
    if lower32 == COMMON_SEC_AND_TER_CE as u32 && p & 0xff == 0 {
        return Some(Ce32::long_primary(p));
    }
    if p == 0 && lower32 & 0xff == 0 {
        return Some(Ce32::long_secondary(lower32));
    }
    None
}

/// `[pp, 05, tt][00, ss, 05]` packed into one CE32.
fn encode_latin(ce0: Ce, ce1: Ce) -> Option<Ce32> {
    let p = ce0.primary();
    let lower0 = ce0.lower32();
    let lower1 = ce1.lower32();
    let first_fits = p != 0 && p & 0x00ff_ffff == 0 && lower0 & 0xffff_00ff == 0x0500_0000;
    let second_fits = ce1.primary() == 0 && lower1 & 0x00ff_ffff == 0x0500 && lower1 >> 24 != 0;
    if first_fits && second_fits {
        Some(Ce32::latin_expansion((p >> 24) as u8, (lower0 >> 8) as u8, (lower1 >> 24) as u8))
    } else {
        None
    }
}
