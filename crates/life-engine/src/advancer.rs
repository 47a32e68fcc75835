//! Generation advancer.
//!
//! One pass reads every word of "current" exactly once, in raster order,
//! into a three-row window, and writes every word of "next" once. Loads run
//! one row ahead of writes:
//!
//! ```text
//! Load 0, Load 1, Write 0, Load 2, Write 1, ... Load H-1, Write H-2, Write H-1
//! ```
//!
//! Row `r` is written only after row `r + 1` is in the window, and row
//! `r + 2` overwrites the slot of row `r - 1` only after row `r` is written.
//! The advancer issues at most one request per cycle and re-issues a
//! deferred request unchanged, so a pass may take any number of cycles.

use std::fmt;

use life_core::{Observable, Value};
use log::debug;

use crate::arbiter::{Grant, MemoryRequest};
use crate::bank::{BankRoles, GridShape, Word};
use crate::lfsr::RandomWords;
use crate::rules::next_word;
use crate::window::RowWindow;

/// How the next generation is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Apply the Life rule to "current".
    Evolve,
    /// Fill "next" with pseudo-random words. No loads.
    Reseed,
}

/// Where the advancer is in its pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No pass started yet.
    Idle,
    Load { row: u32, word: usize },
    Write { row: u32, word: usize },
    /// Every word of "next" written; waiting for the swap.
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Load { row, word } => write!(f, "load {row}:{word}"),
            Self::Write { row, word } => write!(f, "write {row}:{word}"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassStats {
    pub reads: u64,
    pub writes: u64,
    /// Cycles from the first request to the last grant, deferrals included.
    pub cycles: u64,
}

pub struct GenerationAdvancer {
    shape: GridShape,
    window: RowWindow,
    random: RandomWords,
    phase: Phase,
    mode: PassMode,
    current: PassStats,
    last: Option<PassStats>,
    passes: u64,
}

impl GenerationAdvancer {
    #[must_use]
    pub fn new(shape: GridShape, random_seed: u32) -> Self {
        Self {
            shape,
            window: RowWindow::new(shape.words_per_row()),
            random: RandomWords::new(random_seed),
            phase: Phase::Idle,
            mode: PassMode::Evolve,
            current: PassStats::default(),
            last: None,
            passes: 0,
        }
    }

    /// Reset the cursor to the origin and begin a pass.
    pub fn start_pass(&mut self, mode: PassMode) {
        debug_assert!(
            matches!(self.phase, Phase::Idle | Phase::Complete),
            "pass restarted before completion"
        );
        self.mode = mode;
        self.current = PassStats::default();
        self.phase = match mode {
            PassMode::Evolve => Phase::Load { row: 0, word: 0 },
            PassMode::Reseed => Phase::Write { row: 0, word: 0 },
        };
    }

    /// This cycle's request, if the pass is running.
    #[must_use]
    pub fn request(&self, roles: BankRoles) -> Option<MemoryRequest> {
        match self.phase {
            Phase::Load { row, word } => Some(MemoryRequest::ComputeRead {
                bank: roles.current(),
                address: self.shape.word_address(row, word),
            }),
            Phase::Write { row, word } => Some(MemoryRequest::ComputeWrite {
                bank: roles.next(),
                address: self.shape.word_address(row, word),
                data: self.output_word(row, word),
            }),
            Phase::Idle | Phase::Complete => None,
        }
    }

    /// Consume the arbiter's answer to this cycle's request. Returns `true`
    /// on the cycle the pass completes.
    pub fn complete(&mut self, grant: Grant) -> bool {
        self.current.cycles += 1;
        match (self.phase, grant) {
            (_, Grant::Deferred) => return false,
            (Phase::Load { row, word }, Grant::Read(data)) => {
                self.window.store(row, word, data);
                self.current.reads += 1;
            }
            (Phase::Write { .. }, Grant::Written) => {
                if self.mode == PassMode::Reseed {
                    self.random.advance();
                }
                self.current.writes += 1;
            }
            (phase, grant) => unreachable!("{grant:?} does not answer {phase}"),
        }
        self.phase = self.following();
        if self.phase == Phase::Complete {
            self.passes += 1;
            self.last = Some(self.current);
            debug!(
                "pass {} complete ({:?}): {} reads, {} writes, {} cycles",
                self.passes, self.mode, self.current.reads, self.current.writes, self.current.cycles
            );
            return true;
        }
        false
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> PassMode {
        self.mode
    }

    /// Position (row, word) of the next output word, while a pass runs.
    #[must_use]
    pub fn cursor(&self) -> Option<(u32, usize)> {
        match self.phase {
            Phase::Load { row, .. } if row == 0 => Some((0, 0)),
            Phase::Load { row, .. } => Some((row - 1, 0)),
            Phase::Write { row, word } => Some((row, word)),
            Phase::Idle | Phase::Complete => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Counters of the pass in progress.
    #[must_use]
    pub fn current_pass(&self) -> PassStats {
        self.current
    }

    /// Counters of the most recently completed pass.
    #[must_use]
    pub fn last_pass(&self) -> Option<PassStats> {
        self.last
    }

    /// Passes completed since power-up.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn output_word(&self, row: u32, word: usize) -> Word {
        let mask = self.shape.word_mask(word);
        match self.mode {
            PassMode::Reseed => self.random.current() & mask,
            PassMode::Evolve => {
                let above: &[Word] = if row > 0 { self.window.row(row - 1) } else { &[] };
                let below: &[Word] = if row + 1 < self.shape.height {
                    self.window.row(row + 1)
                } else {
                    &[]
                };
                next_word(above, self.window.row(row), below, word, mask)
            }
        }
    }

    fn following(&self) -> Phase {
        let last_word = self.shape.words_per_row() - 1;
        let height = self.shape.height;
        match self.phase {
            Phase::Load { row, word } if word < last_word => Phase::Load { row, word: word + 1 },
            Phase::Write { row, word } if word < last_word => Phase::Write { row, word: word + 1 },
            Phase::Load { row: 0, .. } if height > 1 => Phase::Load { row: 1, word: 0 },
            Phase::Load { row: 0, .. } => Phase::Write { row: 0, word: 0 },
            Phase::Load { row, .. } => Phase::Write {
                row: row - 1,
                word: 0,
            },
            Phase::Write { row, .. } if self.mode == PassMode::Evolve && row + 2 < height => {
                Phase::Load {
                    row: row + 2,
                    word: 0,
                }
            }
            Phase::Write { row, .. } if row + 1 < height => Phase::Write {
                row: row + 1,
                word: 0,
            },
            Phase::Write { .. } | Phase::Complete => Phase::Complete,
            Phase::Idle => Phase::Idle,
        }
    }
}

impl Observable for GenerationAdvancer {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "phase" => Some(self.phase.to_string().into()),
            "mode" => Some(
                match self.mode {
                    PassMode::Evolve => "evolve",
                    PassMode::Reseed => "reseed",
                }
                .into(),
            ),
            "passes" => Some(self.passes.into()),
            "reads" => Some(self.current.reads.into()),
            "writes" => Some(self.current.writes.into()),
            "cycles" => Some(self.current.cycles.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["phase", "mode", "passes", "reads", "writes", "cycles"]
    }
}
