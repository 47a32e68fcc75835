//! The Life rule.
//!
//! A live cell with two or three live neighbours survives; a dead cell with
//! exactly three live neighbours is born; every other cell is dead in the
//! next generation. Cells outside the grid are permanently dead: there is no
//! wraparound at any edge.

use crate::bank::{WORD_BITS, Word};

/// A 3x3 neighbourhood packed into nine bits.
///
/// Rows are stacked top to bottom, three bits each, left column in the low
/// bit. Bit 4 is the cell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbourhood(u16);

impl Neighbourhood {
    pub const SELF_BIT: u16 = 1 << 4;
    const MASK: u16 = 0x1FF;

    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Build from three 3-bit rows (left, centre, right in bits 0, 1, 2).
    #[must_use]
    pub const fn from_rows(top: u16, middle: u16, bottom: u16) -> Self {
        Self::from_bits((top & 7) | (middle & 7) << 3 | (bottom & 7) << 6)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_alive(self) -> bool {
        self.0 & Self::SELF_BIT != 0
    }

    /// Live cells among the eight neighbours.
    #[must_use]
    pub const fn live_neighbours(self) -> u32 {
        (self.0 & !Self::SELF_BIT).count_ones()
    }
}

/// Next state of the centre cell.
#[must_use]
pub const fn next_state(n: Neighbourhood) -> bool {
    matches!((n.is_alive(), n.live_neighbours()), (true, 2 | 3) | (false, 3))
}

/// Next state of the 16 cells in `word` of a row.
///
/// `above` and `below` are the neighbouring rows; pass an empty slice for a
/// row outside the grid. `mask` selects the bits that lie inside the grid;
/// the rest are forced dead.
#[must_use]
pub fn next_word(above: &[Word], row: &[Word], below: &[Word], word: usize, mask: Word) -> Word {
    let mut out = 0;
    for bit in 0..WORD_BITS {
        if (mask >> bit) & 1 == 0 {
            continue;
        }
        let column = word as i64 * i64::from(WORD_BITS) + i64::from(bit);
        let n = Neighbourhood::from_rows(
            triple(above, column),
            triple(row, column),
            triple(below, column),
        );
        if next_state(n) {
            out |= 1 << bit;
        }
    }
    out
}

/// Cells at `column - 1`, `column`, `column + 1` as a 3-bit row.
fn triple(row: &[Word], column: i64) -> u16 {
    sample(row, column - 1) | sample(row, column) << 1 | sample(row, column + 1) << 2
}

fn sample(row: &[Word], column: i64) -> u16 {
    if column < 0 {
        return 0;
    }
    let column = column as usize;
    let bits = WORD_BITS as usize;
    row.get(column / bits)
        .map_or(0, |w| (w >> (column % bits)) & 1)
}
