//! Memory arbiter: a priority multiplexer evaluated once per cycle.
//!
//! Every cycle the display read, if there is one, is served first and
//! unconditionally. The compute request is then served only if it targets
//! the other bank; any compute access to the bank being displayed that
//! cycle is deferred, and the advancer re-issues it next cycle.
//!
//! Since the display only reads "current" and compute only writes "next",
//! compute writes never contend with the display. Compute reads of
//! "current" proceed in blanking, and in active cycles whose pixel lies
//! outside the grid.

use life_core::{Observable, Value};
use log::trace;

use crate::bank::{BankId, BankPair, Word};

/// A bank port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    Read,
    Write,
}

/// One request for a memory cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRequest {
    DisplayRead {
        bank: BankId,
        address: usize,
    },
    ComputeRead {
        bank: BankId,
        address: usize,
    },
    ComputeWrite {
        bank: BankId,
        address: usize,
        data: Word,
    },
}

impl MemoryRequest {
    #[must_use]
    pub const fn bank(&self) -> BankId {
        match *self {
            Self::DisplayRead { bank, .. }
            | Self::ComputeRead { bank, .. }
            | Self::ComputeWrite { bank, .. } => bank,
        }
    }

    #[must_use]
    pub const fn address(&self) -> usize {
        match *self {
            Self::DisplayRead { address, .. }
            | Self::ComputeRead { address, .. }
            | Self::ComputeWrite { address, .. } => address,
        }
    }

    #[must_use]
    pub const fn port(&self) -> Port {
        match self {
            Self::DisplayRead { .. } | Self::ComputeRead { .. } => Port::Read,
            Self::ComputeWrite { .. } => Port::Write,
        }
    }
}

/// What happened to a compute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Read(Word),
    Written,
    Deferred,
}

/// Results of one memory cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleOutcome {
    /// Data for the display read, available to the formatter this cycle.
    pub display: Option<Word>,
    pub compute: Option<Grant>,
}

/// Running totals since power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArbiterStats {
    pub display_reads: u64,
    pub compute_reads: u64,
    pub compute_writes: u64,
    /// Compute requests refused because the display held their bank.
    pub compute_deferred: u64,
    /// Deferred compute writes that targeted the very address being read.
    pub hazards: u64,
}

#[derive(Debug, Default)]
pub struct MemoryArbiter {
    stats: ArbiterStats,
}

impl MemoryArbiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> ArbiterStats {
        self.stats
    }

    /// Run one memory cycle.
    pub fn cycle(
        &mut self,
        banks: &mut BankPair,
        display: Option<MemoryRequest>,
        compute: Option<MemoryRequest>,
    ) -> CycleOutcome {
        let mut held: Option<(BankId, usize)> = None;

        let display = display.map(|request| {
            debug_assert!(
                matches!(request, MemoryRequest::DisplayRead { .. }),
                "display slot only carries display reads"
            );
            let (bank, address) = (request.bank(), request.address());
            held = Some((bank, address));
            self.stats.display_reads += 1;
            banks.bank_mut(bank).read(address)
        });

        let compute = compute.map(|request| {
            if let Some((bank, address)) = held {
                if bank == request.bank() {
                    self.stats.compute_deferred += 1;
                    if request.port() == Port::Write && address == request.address() {
                        self.stats.hazards += 1;
                        trace!("deferred {request:?}: read-during-write on {bank:?}");
                    } else {
                        trace!("deferred {request:?}: display holds bank {bank:?}");
                    }
                    return Grant::Deferred;
                }
            }
            let bank = banks.bank_mut(request.bank());
            match request {
                MemoryRequest::ComputeWrite { address, data, .. } => {
                    self.stats.compute_writes += 1;
                    bank.write(address, data);
                    Grant::Written
                }
                MemoryRequest::ComputeRead { address, .. }
                | MemoryRequest::DisplayRead { address, .. } => {
                    self.stats.compute_reads += 1;
                    Grant::Read(bank.read(address))
                }
            }
        });

        banks.end_cycle();
        CycleOutcome { display, compute }
    }
}

impl Observable for MemoryArbiter {
    fn query(&self, path: &str) -> Option<Value> {
        let s = &self.stats;
        match path {
            "display_reads" => Some(s.display_reads.into()),
            "compute_reads" => Some(s.compute_reads.into()),
            "compute_writes" => Some(s.compute_writes.into()),
            "compute_deferred" => Some(s.compute_deferred.into()),
            "hazards" => Some(s.hazards.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "display_reads",
            "compute_reads",
            "compute_writes",
            "compute_deferred",
            "hazards",
        ]
    }
}
