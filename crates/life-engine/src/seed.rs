//! Power-up patterns.
//!
//! The seed is loaded into the bank that starts as "current" before the
//! first cycle runs. It is the only write to bank storage that does not
//! pass through the arbiter.

use std::fmt;
use std::str::FromStr;

use crate::bank::{BankId, BankPair, GridShape};
use crate::config::ConfigError;
use crate::lfsr::RandomWords;

/// Small named patterns, placed at the centre of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Period-2 oscillator, horizontal phase.
    Blinker,
    /// 2x2 still life.
    Block,
    Glider,
    RPentomino,
    Acorn,
}

impl Pattern {
    pub const ALL: [Self; 5] = [
        Self::Blinker,
        Self::Block,
        Self::Glider,
        Self::RPentomino,
        Self::Acorn,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blinker => "blinker",
            Self::Block => "block",
            Self::Glider => "glider",
            Self::RPentomino => "r-pentomino",
            Self::Acorn => "acorn",
        }
    }

    /// Live cells as (row, column) offsets from the pattern's top-left.
    #[must_use]
    pub const fn cells(self) -> &'static [(u32, u32)] {
        match self {
            Self::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Self::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Self::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
            Self::RPentomino => &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
            Self::Acorn => &[(0, 1), (1, 3), (2, 0), (2, 1), (2, 4), (2, 5), (2, 6)],
        }
    }

    /// Bounding box as (height, width).
    #[must_use]
    pub fn size(self) -> (u32, u32) {
        self.cells()
            .iter()
            .fold((0, 0), |(h, w), &(r, c)| (h.max(r + 1), w.max(c + 1)))
    }

    /// Cells translated to the centre of a grid.
    #[must_use]
    pub fn centred(self, shape: GridShape) -> Vec<(u32, u32)> {
        let (height, width) = self.size();
        let top = shape.height.saturating_sub(height) / 2;
        let left = shape.width.saturating_sub(width) / 2;
        self.cells()
            .iter()
            .map(|&(r, c)| (top + r, left + c))
            .collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|p| p.name().replace('-', "") == wanted)
            .ok_or_else(|| ConfigError::UnknownPattern(s.to_string()))
    }
}

/// The starting pattern of generation 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Seed {
    /// Every cell dead.
    #[default]
    Empty,
    /// Pseudo-random fill from the LFSR word generator.
    Random(u32),
    /// Explicit live cells as (row, column).
    Cells(Vec<(u32, u32)>),
    /// A named pattern at the centre of the grid.
    Pattern(Pattern),
}

impl Seed {
    /// Live cells this seed places on `shape`, or `None` for a random fill.
    fn placed_cells(&self, shape: GridShape) -> Option<Vec<(u32, u32)>> {
        match self {
            Self::Empty => Some(Vec::new()),
            Self::Random(_) => None,
            Self::Cells(cells) => Some(cells.clone()),
            Self::Pattern(pattern) => Some(pattern.centred(shape)),
        }
    }

    /// Starting value for the random word generator used by reseed
    /// passes. Random fills reuse their own seed.
    #[must_use]
    pub fn lfsr_seed(&self) -> u32 {
        match self {
            Self::Random(seed) => *seed,
            _ => 1,
        }
    }

    /// Reject seeds that place a cell outside the grid.
    pub fn check(&self, shape: GridShape) -> Result<(), ConfigError> {
        if let Some(cells) = self.placed_cells(shape) {
            if let Some(&(row, column)) = cells.iter().find(|&&(r, c)| !shape.contains(r, c)) {
                return Err(ConfigError::SeedOutOfBounds { row, column });
            }
        }
        Ok(())
    }

    /// Write the seed into bank `id`.
    pub(crate) fn apply(&self, banks: &mut BankPair, id: BankId) -> Result<(), ConfigError> {
        let shape = banks.shape();
        self.check(shape)?;
        match self {
            Self::Random(seed) => {
                let mut words = RandomWords::new(*seed);
                banks.load_words(id, || words.next_word());
            }
            _ => {
                for (row, column) in self.placed_cells(shape).unwrap_or_default() {
                    banks.load_cell(id, row, column, true);
                }
            }
        }
        Ok(())
    }
}

impl From<Pattern> for Seed {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}
