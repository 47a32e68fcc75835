//! Galois linear feedback shift registers and a random word source.
//!
//! An LFSR steps in constant time regardless of width, which is why the
//! hardware uses them in place of counters and random number generators.
//! Here they make the pseudo-random starting pattern reproducible from a
//! single seed value.

/// Feedback taps for maximal-length Galois LFSRs, indexed by bit width.
const POLYNOMIALS: [u32; 29] = [
    0x9,         // 4
    0x12,        // 5
    0x21,        // 6
    0x41,        // 7
    0x8E,        // 8
    0x108,       // 9
    0x204,       // 10
    0x402,       // 11
    0x829,       // 12
    0x100D,      // 13
    0x2015,      // 14
    0x4001,      // 15
    0x8016,      // 16
    0x1_0004,    // 17
    0x2_0013,    // 18
    0x4_0013,    // 19
    0x8_0004,    // 20
    0x10_0002,   // 21
    0x20_0001,   // 22
    0x40_0010,   // 23
    0x80_000D,   // 24
    0x100_0004,  // 25
    0x200_0023,  // 26
    0x400_0013,  // 27
    0x800_0004,  // 28
    0x1000_0002, // 29
    0x2000_0029, // 30
    0x4000_0004, // 31
    0x8000_0057, // 32
];

const MIN_BITS: u32 = 4;
const MAX_BITS: u32 = 32;

/// A Galois LFSR that restarts after a fixed number of steps.
///
/// With `steps == 2^bits - 1` this is the usual maximal-length sequence;
/// shorter periods cut the sequence early and restart.
#[derive(Debug, Clone)]
pub struct Lfsr {
    polynomial: u32,
    restart_value: u32,
    steps: u32,
    value: u32,
    step: u32,
}

impl Lfsr {
    /// An LFSR that repeats every `steps` steps.
    ///
    /// # Panics
    ///
    /// Panics if `steps` is zero or needs more than 32 bits.
    #[must_use]
    pub fn with_steps(steps: u32, restart_value: u32) -> Self {
        assert!(steps > 0, "an LFSR needs at least one step");
        let bits = (u32::BITS - steps.leading_zeros()).max(MIN_BITS);
        assert!(bits <= MAX_BITS);
        let polynomial = POLYNOMIALS[(bits - MIN_BITS) as usize];
        // Fold the restart value into 1..=steps; zero is a lock-up state.
        let restart_value = (restart_value.max(1) - 1) % steps + 1;
        Self {
            polynomial,
            restart_value,
            steps,
            value: restart_value,
            step: 0,
        }
    }

    /// A maximal-length LFSR of the given width.
    #[must_use]
    pub fn maximal(bits: u32, restart_value: u32) -> Self {
        let steps = if bits >= 32 { u32::MAX } else { (1 << bits) - 1 };
        Self::with_steps(steps, restart_value)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Advance one step.
    pub fn step(&mut self) {
        self.step += 1;
        if self.step >= self.steps {
            self.restart();
            return;
        }
        let feedback = if self.value & 1 != 0 { self.polynomial } else { 0 };
        self.value = (self.value >> 1) ^ feedback;
    }

    pub fn restart(&mut self) {
        self.value = self.restart_value;
        self.step = 0;
    }
}

/// Generates a pseudo-random 16-bit word per step.
///
/// Each output bit comes from its own short LFSR with a distinct period, so
/// the combined sequence repeats far less often than any single register.
#[derive(Debug, Clone)]
pub struct RandomWords {
    lfsrs: Vec<Lfsr>,
}

impl RandomWords {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        let lfsrs = (0..u16::BITS)
            .map(|i| Lfsr::with_steps(501 + 7 * i, seed.wrapping_add(i)))
            .collect();
        Self { lfsrs }
    }

    /// The word the generator currently presents.
    #[must_use]
    pub fn current(&self) -> u16 {
        self.lfsrs
            .iter()
            .enumerate()
            .fold(0, |word, (i, lfsr)| word | ((lfsr.value() & 1) as u16) << i)
    }

    /// Move to the next word.
    pub fn advance(&mut self) {
        for lfsr in &mut self.lfsrs {
            lfsr.step();
        }
    }

    /// Return the current word and advance.
    pub fn next_word(&mut self) -> u16 {
        let word = self.current();
        self.advance();
        word
    }
}
