//! Combining marks skipped during discontiguous contraction matching.

use smallvec::SmallVec;

use crate::contexts::CursorState;

type MarkBuffer = SmallVec<[u32; 8]>;

/// Marks passed over while trying to extend a contraction match.
///
/// `old` holds marks skipped by an earlier, already matched attempt that are
/// read again before the text; `new` collects marks skipped by the current
/// attempt. `pos` counts code points read from `old`, then beyond it.
#[derive(Debug, Clone, Default)]
pub(crate) struct SkippedState {
    old: MarkBuffer,
    new: MarkBuffer,
    pos: usize,
    skip_length_at_match: usize,
    state: CursorState,
}

impl SkippedState {
    pub(crate) fn clear(&mut self) {
        self.old.clear();
        self.pos = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.old.is_empty()
    }

    pub(crate) fn has_next(&self) -> bool {
        self.pos < self.old.len()
    }

    pub(crate) fn next(&mut self) -> u32 {
        let c = self.old[self.pos];
        self.pos += 1;
        c
    }

    /// Count one more code point read from the text past the buffered marks.
    pub(crate) fn inc_beyond(&mut self) {
        debug_assert!(!self.has_next());
        self.pos += 1;
    }

    /// Back up `n` code points. Returns how many of them must be backed up in the text.
    pub(crate) fn backward_num_code_points(&mut self, n: usize) -> usize {
        let length = self.old.len();
        if self.pos > length {
            let beyond = self.pos - length;
            if beyond >= n {
                self.pos -= n;
                n
            } else {
                self.pos = length - (n - beyond);
                beyond
            }
        } else {
            self.pos -= n;
            0
        }
    }

    pub(crate) fn set_first_skipped(&mut self, c: u32) {
        self.skip_length_at_match = 0;
        self.new.clear();
        self.new.push(c);
    }

    pub(crate) fn skip(&mut self, c: u32) {
        self.new.push(c);
    }

    pub(crate) fn record_match(&mut self) {
        self.skip_length_at_match = self.new.len();
    }

    /// Replace the marks consumed so far with those skipped up to the last match.
    pub(crate) fn replace_match(&mut self) {
        let consumed = self.pos.min(self.old.len());
        let kept: MarkBuffer = self.new[..self.skip_length_at_match]
            .iter()
            .chain(&self.old[consumed..])
            .copied()
            .collect();
        self.old = kept;
        self.pos = 0;
    }

    pub(crate) fn save_trie_state(&mut self, state: CursorState) {
        self.state = state;
    }

    pub(crate) fn trie_state(&self) -> CursorState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_match_keeps_skipped_prefix() {
        let mut skipped = SkippedState::default();
        assert!(skipped.is_empty());
        skipped.set_first_skipped(0x323);
        skipped.skip(0x327);
        skipped.record_match();
        skipped.skip(0x300);
        skipped.replace_match();
        assert!(!skipped.is_empty());
        assert_eq!(0x323, skipped.next());
        assert_eq!(0x327, skipped.next());
        assert!(!skipped.has_next());
    }

    #[test]
    fn test_backward_across_buffer_end() {
        let mut skipped = SkippedState::default();
        skipped.set_first_skipped(0x323);
        skipped.skip(0x327);
        skipped.record_match();
        skipped.replace_match();
        skipped.next();
        skipped.next();
        skipped.inc_beyond();
        skipped.inc_beyond();
        // two read past the buffer, one backed up inside it
        assert_eq!(2, skipped.backward_num_code_points(3));
        assert!(skipped.has_next());
        assert_eq!(0x327, skipped.next());
        skipped.inc_beyond();
        assert_eq!(1, skipped.backward_num_code_points(1));
        assert_eq!(0, skipped.backward_num_code_points(1));
        assert_eq!(0x327, skipped.next());
    }

    #[test]
    fn test_replace_match_with_partially_read_old() {
        let mut skipped = SkippedState::default();
        skipped.set_first_skipped(0x301);
        skipped.skip(0x302);
        skipped.record_match();
        skipped.replace_match();
        skipped.next();
        skipped.set_first_skipped(0x323);
        skipped.record_match();
        skipped.replace_match();
        assert_eq!(0x323, skipped.next());
        assert_eq!(0x302, skipped.next());
        assert!(!skipped.has_next());
    }
}
