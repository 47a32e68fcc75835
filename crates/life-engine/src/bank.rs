//! Grid storage: two single-port banks and the role selector between them.
//!
//! Cells are packed one bit each into 16-bit words. Bit `b` of word `w` in a
//! row is column `w * 16 + b`. Rows are padded to a whole number of words and
//! padding bits are always dead.
//!
//! Each bank has one read port and one write port. A port may be used at
//! most once per memory cycle; in debug builds a second use in the same cycle
//! panics. Only the arbiter drives the ports; outside this crate a bank can
//! only be observed:
//!
//! ```compile_fail
//! use life_engine::{BankId, BankPair, GridShape};
//!
//! let mut banks = BankPair::new(GridShape::new(16, 1));
//! banks.bank_mut(BankId::A).write(0, 1);
//! ```
//!
//! ```
//! use life_engine::{BankId, BankPair, GridShape};
//!
//! let banks = BankPair::new(GridShape::new(16, 1));
//! assert_eq!(banks.bank(BankId::A).peek(0), 0);
//! ```

/// One memory word.
pub type Word = u16;

/// Cells per memory word.
pub const WORD_BITS: u32 = Word::BITS;

/// Names one of the two banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankId {
    A,
    B,
}

impl BankId {
    /// The other bank.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// Grid geometry, fixed for the lifetime of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub width: u32,
    pub height: u32,
}

impl GridShape {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn words_per_row(&self) -> usize {
        self.width.div_ceil(WORD_BITS) as usize
    }

    /// Words needed to hold one generation.
    #[must_use]
    pub const fn total_words(&self) -> usize {
        self.words_per_row() * self.height as usize
    }

    #[must_use]
    pub const fn cells(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    #[must_use]
    pub const fn contains(&self, row: u32, column: u32) -> bool {
        row < self.height && column < self.width
    }

    /// Bank address of a word.
    #[must_use]
    pub const fn word_address(&self, row: u32, word: usize) -> usize {
        row as usize * self.words_per_row() + word
    }

    /// Bank address and bit index of a cell.
    #[must_use]
    pub const fn cell_address(&self, row: u32, column: u32) -> (usize, u32) {
        (
            self.word_address(row, (column / WORD_BITS) as usize),
            column % WORD_BITS,
        )
    }

    /// Mask of the bits in `word` that are inside the grid.
    #[must_use]
    pub const fn word_mask(&self, word: usize) -> Word {
        let first = word as u32 * WORD_BITS;
        if first >= self.width {
            return 0;
        }
        let valid = self.width - first;
        if valid >= WORD_BITS {
            Word::MAX
        } else {
            (1 << valid) - 1
        }
    }
}

/// One full-grid store with a single read and a single write port.
pub struct Bank {
    words: Vec<Word>,
    read_busy: bool,
    write_busy: bool,
}

impl Bank {
    fn new(words: usize) -> Self {
        Self {
            words: vec![0; words],
            read_busy: false,
            write_busy: false,
        }
    }

    /// Read a word through the read port.
    pub(crate) fn read(&mut self, address: usize) -> Word {
        debug_assert!(!self.read_busy, "read port used twice in one cycle");
        self.read_busy = true;
        self.words[address]
    }

    /// Write a word through the write port.
    pub(crate) fn write(&mut self, address: usize, data: Word) {
        debug_assert!(!self.write_busy, "write port used twice in one cycle");
        self.write_busy = true;
        self.words[address] = data;
    }

    /// Read a word without using a port (observation only).
    #[must_use]
    pub fn peek(&self, address: usize) -> Word {
        self.words[address]
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    fn end_cycle(&mut self) {
        self.read_busy = false;
        self.write_busy = false;
    }
}

/// The two generation banks.
pub struct BankPair {
    banks: [Bank; 2],
    shape: GridShape,
}

impl BankPair {
    /// Allocate both banks, all cells dead.
    #[must_use]
    pub fn new(shape: GridShape) -> Self {
        let words = shape.total_words();
        Self {
            banks: [Bank::new(words), Bank::new(words)],
            shape,
        }
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[must_use]
    pub fn bank(&self, id: BankId) -> &Bank {
        &self.banks[id.index()]
    }

    pub(crate) fn bank_mut(&mut self, id: BankId) -> &mut Bank {
        &mut self.banks[id.index()]
    }

    /// Release every port for the next memory cycle.
    pub fn end_cycle(&mut self) {
        for bank in &mut self.banks {
            bank.end_cycle();
        }
    }

    /// Read one cell without using a port. Off-grid cells are dead.
    #[must_use]
    pub fn cell(&self, id: BankId, row: u32, column: u32) -> bool {
        if !self.shape.contains(row, column) {
            return false;
        }
        let (address, bit) = self.shape.cell_address(row, column);
        (self.bank(id).peek(address) >> bit) & 1 != 0
    }

    /// Set one cell directly. Used for power-up initialisation only.
    pub(crate) fn load_cell(&mut self, id: BankId, row: u32, column: u32, alive: bool) {
        let (address, bit) = self.shape.cell_address(row, column);
        let word = &mut self.banks[id.index()].words[address];
        if alive {
            *word |= 1 << bit;
        } else {
            *word &= !(1 << bit);
        }
    }

    /// Fill a bank word by word. Used for power-up initialisation only.
    pub(crate) fn load_words(&mut self, id: BankId, mut fill: impl FnMut() -> Word) {
        let shape = self.shape;
        let words_per_row = shape.words_per_row();
        for (i, word) in self.banks[id.index()].words.iter_mut().enumerate() {
            *word = fill() & shape.word_mask(i % words_per_row);
        }
    }

    /// All live cells in a bank, in raster order.
    #[must_use]
    pub fn live_cells(&self, id: BankId) -> Vec<(u32, u32)> {
        let mut cells = Vec::new();
        for row in 0..self.shape.height {
            for column in 0..self.shape.width {
                if self.cell(id, row, column) {
                    cells.push((row, column));
                }
            }
        }
        cells
    }

    /// Number of live cells in a bank.
    #[must_use]
    pub fn population(&self, id: BankId) -> u64 {
        self.bank(id)
            .words()
            .iter()
            .map(|w| u64::from(w.count_ones()))
            .sum()
    }
}

/// The single role-selector bit: which bank is "current".
///
/// "Current" is read by the display and by the advancer as its neighbour
/// source; "next" is the advancer's write target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankRoles {
    current: BankId,
}

impl BankRoles {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: BankId::A }
    }

    #[must_use]
    pub const fn current(&self) -> BankId {
        self.current
    }

    #[must_use]
    pub const fn next(&self) -> BankId {
        self.current.other()
    }

    /// Invert the roles: next becomes current.
    pub fn swap(&mut self) {
        self.current = self.current.other();
    }
}

impl Default for BankRoles {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pad_to_whole_words() {
        let shape = GridShape::new(4, 4);
        assert_eq!(shape.words_per_row(), 1);
        assert_eq!(shape.total_words(), 4);
        assert_eq!(shape.word_mask(0), 0b1111);

        let shape = GridShape::new(1280, 720);
        assert_eq!(shape.words_per_row(), 80);
        assert_eq!(shape.total_words(), 57_600);

        let shape = GridShape::new(20, 1);
        assert_eq!(shape.word_mask(0), 0xFFFF);
        assert_eq!(shape.word_mask(1), 0x000F);
        assert_eq!(shape.word_mask(2), 0);
    }

    #[test]
    fn cell_address_is_lsb_first() {
        let shape = GridShape::new(40, 3);
        assert_eq!(shape.cell_address(0, 0), (0, 0));
        assert_eq!(shape.cell_address(0, 17), (1, 1));
        assert_eq!(shape.cell_address(2, 39), (2 * 3 + 2, 7));
    }

    #[test]
    fn cells_round_trip_through_words() {
        let mut banks = BankPair::new(GridShape::new(20, 2));
        banks.load_cell(BankId::B, 1, 17, true);
        assert!(banks.cell(BankId::B, 1, 17));
        assert!(!banks.cell(BankId::A, 1, 17));
        assert_eq!(banks.bank(BankId::B).peek(3), 0b10);
        assert_eq!(banks.live_cells(BankId::B), vec![(1, 17)]);

        banks.load_cell(BankId::B, 1, 17, false);
        assert_eq!(banks.population(BankId::B), 0);
    }

    #[test]
    fn off_grid_cells_read_dead() {
        let mut banks = BankPair::new(GridShape::new(4, 4));
        banks.load_words(BankId::A, || 0xFFFF);
        assert!(banks.cell(BankId::A, 3, 3));
        assert!(!banks.cell(BankId::A, 3, 4));
        assert!(!banks.cell(BankId::A, 4, 0));
        // Padding bits are masked off at load time.
        assert_eq!(banks.population(BankId::A), 16);
    }

    #[test]
    fn ports_release_at_end_of_cycle() {
        let mut banks = BankPair::new(GridShape::new(16, 2));
        let bank = banks.bank_mut(BankId::A);
        bank.write(1, 0xBEEF);
        assert_eq!(bank.read(1), 0xBEEF);
        banks.end_cycle();
        let bank = banks.bank_mut(BankId::A);
        bank.write(0, 0x1234);
        assert_eq!(bank.read(0), 0x1234);
    }

    #[test]
    #[should_panic(expected = "read port used twice")]
    #[cfg(debug_assertions)]
    fn second_read_in_a_cycle_panics() {
        let mut banks = BankPair::new(GridShape::new(16, 2));
        let bank = banks.bank_mut(BankId::A);
        let _ = bank.read(0);
        let _ = bank.read(1);
    }

    #[test]
    fn roles_swap_atomically() {
        let mut roles = BankRoles::new();
        assert_eq!((roles.current(), roles.next()), (BankId::A, BankId::B));
        roles.swap();
        assert_eq!((roles.current(), roles.next()), (BankId::B, BankId::A));
        roles.swap();
        assert_eq!(roles.current(), BankId::A);
    }
}
