//! Pixel clock cycle counts.

use core::fmt;

/// A count of pixel clock ticks. One tick emits one pixel (or blanking
/// slot) and is one memory cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    /// Cycles in a raster of `width` by `height` clocks.
    #[must_use]
    pub const fn raster(width: u32, height: u32) -> Self {
        Self(width as u64 * height as u64)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Cycles left over after `used` of them, never negative.
    #[must_use]
    pub const fn remaining_after(self, used: u64) -> u64 {
        self.0.saturating_sub(used)
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ticks", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_counts_every_slot() {
        assert_eq!(Ticks::raster(1630, 750), Ticks::new(1_222_500));
        assert_eq!(Ticks::raster(0, 750), Ticks::ZERO);
    }

    #[test]
    fn remaining_saturates() {
        assert_eq!(Ticks::new(10).remaining_after(4), 6);
        assert_eq!(Ticks::new(10).remaining_after(40), 0);
        assert_eq!(Ticks::new(5).to_string(), "5 ticks");
    }
}
