//! Pixel clock configuration.

#![allow(clippy::cast_precision_loss)] // Rates only feed reports.

use crate::Ticks;

/// The pixel clock driving a pipeline instance.
///
/// The clock source itself lives outside the pipeline; this only records the
/// rate it was built for, so frame rates and memory bandwidth can be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelClock {
    /// Pixel clock frequency in Hz (e.g. `73_500_000` for 720p).
    pub frequency_hz: u64,
}

impl PixelClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Build a clock from a rate in kHz, the precision PLL tables use.
    #[must_use]
    pub const fn from_khz(khz: u64) -> Self {
        Self::new(khz * 1_000)
    }

    /// Frequency in MHz.
    #[must_use]
    pub fn mhz(&self) -> f64 {
        self.frequency_hz as f64 / 1_000_000.0
    }

    /// Frames per second for a frame of `frame_clocks` pixel clocks.
    #[must_use]
    pub fn frames_per_second(&self, frame_clocks: Ticks) -> f64 {
        if frame_clocks.get() == 0 {
            return 0.0;
        }
        self.frequency_hz as f64 / frame_clocks.get() as f64
    }

    /// Wall-clock duration of `ticks` pixel clocks, in nanoseconds.
    #[must_use]
    pub fn nanos(&self, ticks: Ticks) -> u128 {
        if self.frequency_hz == 0 {
            return 0;
        }
        u128::from(ticks.get()) * 1_000_000_000 / u128::from(self.frequency_hz)
    }
}
