//! Context sub-tries for prefix and contraction mappings.
//!
//! All context tries live in one flat `u32` arena and are addressed by offset.
//! An entry starts with the default CE32, used when no context matches,
//! followed by the root node of a branch trie. A node is
//! `[(count << 1) | has_value, value?, (code point, child offset) * count]`
//! with the branches sorted by code point. Prefix keys are stored reversed.

use crate::error::{Error, Result};

/// Outcome of feeding one code point to a [`ContextCursor`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrieResult {
    /// The input does not continue any stored string.
    NoMatch,
    /// The input is a proper prefix of a stored string and has no value itself.
    NoValue,
    /// The input matched a stored string and no longer string continues it.
    FinalValue(u32),
    /// The input matched a stored string and longer strings continue it.
    Intermediate(u32),
}

impl TrieResult {
    /// Whether a value was matched.
    #[inline]
    pub fn has_value(self) -> bool {
        matches!(self, TrieResult::FinalValue(_) | TrieResult::Intermediate(_))
    }

    /// Whether more input can continue the match.
    #[inline]
    pub fn has_next(self) -> bool {
        matches!(self, TrieResult::NoValue | TrieResult::Intermediate(_))
    }

    /// The matched value.
    #[inline]
    pub fn value(self) -> Option<u32> {
        match self {
            TrieResult::FinalValue(v) | TrieResult::Intermediate(v) => Some(v),
            _ => None,
        }
    }
}

/// Saved position of a [`ContextCursor`].
pub type CursorState = Option<usize>;

/// A walk through one context trie.
#[derive(Clone, Debug)]
pub struct ContextCursor<'a> {
    arena: &'a [u32],
    root: usize,
    node: CursorState,
}

impl<'a> ContextCursor<'a> {
    /// Cursor over the trie of the entry at `index`.
    pub fn new(arena: &'a [u32], index: usize) -> Self {
        ContextCursor {
            arena,
            root: index + 1,
            node: Some(index + 1),
        }
    }

    /// Default CE32 of the entry at `index`.
    #[inline]
    pub fn default_value(arena: &[u32], index: usize) -> u32 {
        arena[index]
    }

    /// Restart from the root and consume `c`.
    pub fn first_for_code_point(&mut self, c: u32) -> TrieResult {
        self.node = Some(self.root);
        self.next_for_code_point(c)
    }

    /// Consume `c`. After [`TrieResult::NoMatch`] every further call also fails.
    pub fn next_for_code_point(&mut self, c: u32) -> TrieResult {
        let node = match self.node {
            Some(node) => node,
            None => return TrieResult::NoMatch,
        };
        let header = self.arena[node];
        let count = (header >> 1) as usize;
        let branches = node + 1 + (header & 1) as usize;
        let pairs = &self.arena[branches..branches + 2 * count];
        let (mut lo, mut hi) = (0, count);
        while lo < hi {
            let mid = (lo + hi) / 2;
            let key = pairs[2 * mid];
            if key == c {
                let child = pairs[2 * mid + 1] as usize;
                self.node = Some(child);
                return self.node_result(child);
            } else if key < c {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        self.node = None;
        TrieResult::NoMatch
    }

    fn node_result(&self, node: usize) -> TrieResult {
        let header = self.arena[node];
        let has_next = header >> 1 != 0;
        match (header & 1 != 0, has_next) {
            (true, true) => TrieResult::Intermediate(self.arena[node + 1]),
            (true, false) => TrieResult::FinalValue(self.arena[node + 1]),
            (false, _) => TrieResult::NoValue,
        }
    }

    /// Current position, for [`Self::reset_to_state`].
    #[inline]
    pub fn save_state(&self) -> CursorState {
        self.node
    }

    /// Return to a position saved with [`Self::save_state`].
    #[inline]
    pub fn reset_to_state(&mut self, state: CursorState) {
        self.node = state;
    }

    /// Return to the root.
    #[inline]
    pub fn reset(&mut self) {
        self.node = Some(self.root);
    }
}

/// Append a context entry to `arena` and return its index.
///
/// `entries` must be sorted by key, without duplicates or empty keys.
pub fn write_context(arena: &mut Vec<u32>, default_ce32: u32, entries: &[(Vec<u32>, u32)]) -> Result<usize> {
    if entries.iter().any(|(key, _)| key.is_empty()) {
        return Err(Error::internal("empty context string"));
    }
    if entries.windows(2).any(|w| w[0].0 >= w[1].0) {
        return Err(Error::internal("context strings not sorted and unique"));
    }
    let index = arena.len();
    arena.push(default_ce32);
    write_node(arena, entries, 0);
    Ok(index)
}

fn write_node(arena: &mut Vec<u32>, entries: &[(Vec<u32>, u32)], depth: usize) -> usize {
    let (value, rest) = match entries.first() {
        Some((key, value)) if key.len() == depth => (Some(*value), &entries[1..]),
        _ => (None, entries),
    };
    let mut groups: Vec<&[(Vec<u32>, u32)]> = Vec::new();
    let mut start = 0;
    for i in 1..=rest.len() {
        if i == rest.len() || rest[i].0[depth] != rest[start].0[depth] {
            groups.push(&rest[start..i]);
            start = i;
        }
    }
    let node = arena.len();
    arena.push(((groups.len() as u32) << 1) | value.is_some() as u32);
    if let Some(value) = value {
        arena.push(value);
    }
    let branches = arena.len();
    for group in &groups {
        arena.push(group[0].0[depth]);
        arena.push(0);
    }
    for (i, group) in groups.iter().enumerate() {
        let child = write_node(arena, group, depth + 1);
        arena[branches + 2 * i + 1] = child as u32;
    }
    node
}

/// The default CE32 and all `(key, value)` pairs of the entry at `index`, keys in sorted order.
pub fn read_context(arena: &[u32], index: usize) -> (u32, Vec<(Vec<u32>, u32)>) {
    let mut entries = Vec::new();
    let mut key = Vec::new();
    read_node(arena, index + 1, &mut key, &mut entries);
    (arena[index], entries)
}

fn read_node(arena: &[u32], node: usize, key: &mut Vec<u32>, out: &mut Vec<(Vec<u32>, u32)>) {
    let header = arena[node];
    if header & 1 != 0 && !key.is_empty() {
        out.push((key.clone(), arena[node + 1]));
    }
    let branches = node + 1 + (header & 1) as usize;
    for i in 0..(header >> 1) as usize {
        key.push(arena[branches + 2 * i]);
        read_node(arena, arena[branches + 2 * i + 1] as usize, key, out);
        key.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<u32>, usize) {
        let mut arena = vec![0xdead];
        let entries = vec![
            (vec![0x68], 10),
            (vec![0x68, 0x68], 11),
            (vec![0x6c, 0x6c, 0x6c], 12),
            (vec![0x302], 13),
        ];
        let index = write_context(&mut arena, 1, &entries).unwrap();
        (arena, index)
    }

    #[test]
    fn test_default_and_walk() {
        let (arena, index) = sample();
        assert_eq!(1, index);
        assert_eq!(1, ContextCursor::default_value(&arena, index));
        let mut cursor = ContextCursor::new(&arena, index);
        assert_eq!(TrieResult::Intermediate(10), cursor.first_for_code_point(0x68));
        assert_eq!(TrieResult::FinalValue(11), cursor.next_for_code_point(0x68));
        assert_eq!(TrieResult::NoMatch, cursor.next_for_code_point(0x68));
        assert_eq!(TrieResult::NoMatch, cursor.next_for_code_point(0x6c));
        assert_eq!(TrieResult::FinalValue(13), cursor.first_for_code_point(0x302));
    }

    #[test]
    fn test_save_and_reset() {
        let (arena, index) = sample();
        let mut cursor = ContextCursor::new(&arena, index);
        assert_eq!(TrieResult::NoValue, cursor.first_for_code_point(0x6c));
        let state = cursor.save_state();
        assert_eq!(TrieResult::NoMatch, cursor.next_for_code_point(0x41));
        cursor.reset_to_state(state);
        assert_eq!(TrieResult::NoValue, cursor.next_for_code_point(0x6c));
        assert_eq!(TrieResult::FinalValue(12), cursor.next_for_code_point(0x6c));
        cursor.reset();
        assert_eq!(TrieResult::NoMatch, cursor.next_for_code_point(0x41));
    }

    #[test]
    fn test_read_back() {
        let (arena, index) = sample();
        let (default, entries) = read_context(&arena, index);
        assert_eq!(1, default);
        assert_eq!(
            vec![
                (vec![0x68], 10),
                (vec![0x68, 0x68], 11),
                (vec![0x6c, 0x6c, 0x6c], 12),
                (vec![0x302], 13),
            ],
            entries
        );
    }

    #[test]
    fn test_rejects_unsorted() {
        let mut arena = Vec::new();
        let entries = vec![(vec![0x69], 1), (vec![0x68], 2)];
        assert!(write_context(&mut arena, 1, &entries).is_err());
        assert!(write_context(&mut arena, 1, &[(vec![], 1)]).is_err());
    }

    #[test]
    fn test_result_flags() {
        assert!(TrieResult::Intermediate(1).has_next());
        assert!(TrieResult::Intermediate(1).has_value());
        assert!(!TrieResult::NoValue.has_value());
        assert!(!TrieResult::FinalValue(1).has_next());
        assert_eq!(None, TrieResult::NoMatch.value());
    }
}
