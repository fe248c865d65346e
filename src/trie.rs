//! Code point trie mapping every code point to a `u32` value.
//!
//! Three arrays: `index1` is indexed by `c >> 11`, yields the start of a block
//! of 64 entries in `index2`, indexed by `(c >> 5) & 63`, which yields the
//! start of a block of 32 values in `data`. Identical blocks are shared.

use std::collections::HashMap;

const SHIFT_1: u32 = 11;
const SHIFT_2: u32 = 5;
const INDEX_2_BLOCK_LENGTH: usize = 1 << (SHIFT_1 - SHIFT_2);
const INDEX_2_MASK: u32 = INDEX_2_BLOCK_LENGTH as u32 - 1;
const DATA_BLOCK_LENGTH: usize = 1 << SHIFT_2;
const DATA_MASK: u32 = DATA_BLOCK_LENGTH as u32 - 1;

/// One past the largest code point.
pub const CODE_POINT_LIMIT: u32 = 0x11_0000;
const NUM_DATA_BLOCKS: usize = (CODE_POINT_LIMIT >> SHIFT_2) as usize;
const NUM_INDEX_1: usize = (CODE_POINT_LIMIT >> SHIFT_1) as usize;

/// Immutable lookup table from code points to values.
#[derive(Clone, PartialEq, Eq)]
pub struct CodePointTrie {
    index1: Box<[u32]>,
    index2: Box<[u32]>,
    data: Box<[u32]>,
    error_value: u32,
}

impl CodePointTrie {
    /// Value for `c`, or the error value when `c` is not a code point.
    #[inline]
    pub fn get(&self, c: u32) -> u32 {
        if c >= CODE_POINT_LIMIT {
            return self.error_value;
        }
        let i2 = self.index1[(c >> SHIFT_1) as usize] + ((c >> SHIFT_2) & INDEX_2_MASK);
        let block = self.index2[i2 as usize];
        self.data[(block + (c & DATA_MASK)) as usize]
    }

    /// Value for a `char`.
    #[inline]
    pub fn get_char(&self, c: char) -> u32 {
        self.get(u32::from(c))
    }

    /// Number of `u32` slots the three arrays occupy.
    pub fn size(&self) -> usize {
        self.index1.len() + self.index2.len() + self.data.len()
    }
}

impl std::fmt::Debug for CodePointTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodePointTrie")
            .field("index2_len", &self.index2.len())
            .field("data_len", &self.data.len())
            .field("error_value", &self.error_value)
            .finish()
    }
}

/// Mutable trie under construction.
///
/// Only blocks with at least one explicitly set value are materialized.
#[derive(Debug, Clone)]
pub struct TrieBuilder {
    blocks: Vec<Option<Box<[u32; DATA_BLOCK_LENGTH]>>>,
    initial_value: u32,
    error_value: u32,
}

impl TrieBuilder {
    /// Every code point starts out mapped to `initial_value`.
    pub fn new(initial_value: u32, error_value: u32) -> Self {
        TrieBuilder {
            blocks: vec![None; NUM_DATA_BLOCKS],
            initial_value,
            error_value,
        }
    }

    /// Current value for `c`.
    pub fn get(&self, c: u32) -> u32 {
        if c >= CODE_POINT_LIMIT {
            return self.error_value;
        }
        match &self.blocks[(c >> SHIFT_2) as usize] {
            Some(block) => block[(c & DATA_MASK) as usize],
            None => self.initial_value,
        }
    }

    /// Map `c` to `value`. Out-of-range code points are ignored.
    pub fn set(&mut self, c: u32, value: u32) {
        if c >= CODE_POINT_LIMIT {
            return;
        }
        let initial_value = self.initial_value;
        let block = self.blocks[(c >> SHIFT_2) as usize]
            .get_or_insert_with(|| Box::new([initial_value; DATA_BLOCK_LENGTH]));
        block[(c & DATA_MASK) as usize] = value;
    }

    /// Map every code point in `start..=end` to `value`.
    pub fn set_range(&mut self, start: u32, end: u32, value: u32) {
        for c in start..=end.min(CODE_POINT_LIMIT - 1) {
            self.set(c, value);
        }
    }

    /// Compact the builder into an immutable trie.
    pub fn build(&self) -> CodePointTrie {
        let mut data: Vec<u32> = Vec::new();
        let mut data_blocks: HashMap<[u32; DATA_BLOCK_LENGTH], u32> = HashMap::new();
        let mut block_start = |values: &[u32; DATA_BLOCK_LENGTH]| -> u32 {
            *data_blocks.entry(*values).or_insert_with(|| {
                let start = data.len() as u32;
                data.extend_from_slice(values);
                start
            })
        };
        let initial_block = [self.initial_value; DATA_BLOCK_LENGTH];

        let mut index2: Vec<u32> = Vec::new();
        let mut index2_blocks: HashMap<[u32; INDEX_2_BLOCK_LENGTH], u32> = HashMap::new();
        let mut index1 = Vec::with_capacity(NUM_INDEX_1);
        for chunk in self.blocks.chunks(INDEX_2_BLOCK_LENGTH) {
            let mut i2_block = [0u32; INDEX_2_BLOCK_LENGTH];
            for (slot, block) in i2_block.iter_mut().zip(chunk) {
                *slot = block_start(block.as_deref().unwrap_or(&initial_block));
            }
            let start = *index2_blocks.entry(i2_block).or_insert_with(|| {
                let start = index2.len() as u32;
                index2.extend_from_slice(&i2_block);
                start
            });
            index1.push(start);
        }
        CodePointTrie {
            index1: index1.into_boxed_slice(),
            index2: index2.into_boxed_slice(),
            data: data.into_boxed_slice(),
            error_value: self.error_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_and_error_values() {
        let trie = TrieBuilder::new(7, 9).build();
        assert_eq!(7, trie.get(0));
        assert_eq!(7, trie.get(0x10_ffff));
        assert_eq!(9, trie.get(0x11_0000));
        assert_eq!(9, trie.get(u32::MAX));
        assert_eq!(NUM_INDEX_1 + INDEX_2_BLOCK_LENGTH + DATA_BLOCK_LENGTH, trie.size());
    }

    #[test]
    fn test_set_and_range() {
        let mut builder = TrieBuilder::new(0, 1);
        builder.set(0x41, 0x41);
        builder.set_range(0xd800, 0xdfff, 5);
        builder.set(0x1_0000, 6);
        builder.set(0x11_0000, 99);
        assert_eq!(5, builder.get(0xdc00));
        let trie = builder.build();
        assert_eq!(0x41, trie.get_char('A'));
        assert_eq!(0, trie.get(0x42));
        assert_eq!(0, trie.get(0xd7ff));
        assert_eq!(5, trie.get(0xd800));
        assert_eq!(5, trie.get(0xdfff));
        assert_eq!(0, trie.get(0xe000));
        assert_eq!(6, trie.get(0x1_0000));
        assert_eq!(1, trie.get(0x11_0000));
    }

    #[test]
    fn test_shared_blocks() {
        let mut builder = TrieBuilder::new(0, 0);
        builder.set_range(0xd800, 0xdfff, 5);
        let trie = builder.build();
        // one block of zeros, one of fives
        assert_eq!(2 * DATA_BLOCK_LENGTH, trie.data.len());
        assert_eq!(2 * INDEX_2_BLOCK_LENGTH, trie.index2.len());
    }
}
