//! Three-row ring buffer for sliding-window neighbour reuse.
//!
//! Computing row `r` needs rows `r - 1`, `r` and `r + 1`. Each row of the
//! source bank is read into the ring once and reused for the three output
//! rows that depend on it, so a generation costs one read per source word
//! instead of nine per cell.

use crate::bank::Word;

const SLOTS: usize = 3;

pub struct RowWindow {
    rows: [Vec<Word>; SLOTS],
}

impl RowWindow {
    #[must_use]
    pub fn new(words_per_row: usize) -> Self {
        Self {
            rows: std::array::from_fn(|_| vec![0; words_per_row]),
        }
    }

    /// Store one word of grid row `row`.
    pub fn store(&mut self, row: u32, word: usize, data: Word) {
        self.rows[Self::slot(row)][word] = data;
    }

    /// Words of grid row `row`, as last stored.
    #[must_use]
    pub fn row(&self, row: u32) -> &[Word] {
        &self.rows[Self::slot(row)]
    }

    fn slot(row: u32) -> usize {
        row as usize % SLOTS
    }
}
