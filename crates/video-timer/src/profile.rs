//! Static timing profiles.
//!
//! A profile fixes the raster geometry and the pixel clock a pipeline is
//! built for. Values follow the standard CEA/VESA timings, with pixel clocks
//! rounded to what an iCE40 PLL can actually synthesise.

use life_core::{PixelClock, Ticks};
use thiserror::Error;

/// One raster axis: active region followed by front porch, sync pulse and
/// back porch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    pub active: u32,
    pub front_porch: u32,
    pub sync: u32,
    pub back_porch: u32,
}

impl Axis {
    #[must_use]
    pub const fn new(active: u32, front_porch: u32, sync: u32, back_porch: u32) -> Self {
        Self {
            active,
            front_porch,
            sync,
            back_porch,
        }
    }

    /// First position of the sync pulse.
    #[must_use]
    pub const fn sync_start(&self) -> u32 {
        self.active + self.front_porch
    }

    /// First position after the sync pulse.
    #[must_use]
    pub const fn sync_end(&self) -> u32 {
        self.sync_start() + self.sync
    }

    /// Positions per wrap of this axis.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.sync_end() + self.back_porch
    }

    /// Positions outside the active region.
    #[must_use]
    pub const fn blanking(&self) -> u32 {
        self.total() - self.active
    }
}

/// Which level the sync outputs take while the pulse is asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolarity {
    /// Sync lines idle low and pulse high.
    Positive,
    /// Sync lines idle high and pulse low.
    Negative,
}

impl SyncPolarity {
    /// Wire level for a sync output given whether the pulse is asserted.
    #[must_use]
    pub const fn level(self, asserted: bool) -> bool {
        match self {
            Self::Positive => asserted,
            Self::Negative => !asserted,
        }
    }
}

/// Which axis a profile error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisName {
    Horizontal,
    Vertical,
}

impl core::fmt::Display for AxisName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("{0} active region is empty")]
    ZeroActive(AxisName),
    #[error("{0} sync pulse has zero width")]
    ZeroSync(AxisName),
    #[error("pixel clock frequency is zero")]
    ZeroClock,
}

/// Complete timing description for one output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    pub horizontal: Axis,
    pub vertical: Axis,
    pub polarity: SyncPolarity,
    pub pixel_clock: PixelClock,
}

impl TimingProfile {
    #[must_use]
    pub const fn new(
        horizontal: Axis,
        vertical: Axis,
        polarity: SyncPolarity,
        pixel_clock: PixelClock,
    ) -> Self {
        Self {
            horizontal,
            vertical,
            polarity,
            pixel_clock,
        }
    }

    /// The same raster driven from a different pixel clock.
    #[must_use]
    pub const fn with_pixel_clock(mut self, pixel_clock: PixelClock) -> Self {
        self.pixel_clock = pixel_clock;
        self
    }

    /// Pixel clocks per frame.
    #[must_use]
    pub const fn frame_clocks(&self) -> Ticks {
        Ticks::raster(self.horizontal.total(), self.vertical.total())
    }

    /// Visible pixels per frame.
    #[must_use]
    pub const fn active_pixels(&self) -> u64 {
        Ticks::raster(self.horizontal.active, self.vertical.active).get()
    }

    /// Pixel clocks per frame in which no pixel is displayed.
    #[must_use]
    pub const fn blanking_cycles(&self) -> u64 {
        self.frame_clocks().remaining_after(self.active_pixels())
    }

    #[must_use]
    pub fn frames_per_second(&self) -> f64 {
        self.pixel_clock.frames_per_second(self.frame_clocks())
    }

    /// Move `n` pixel clocks (possibly negative) from `(x, y)`, wrapping
    /// around the frame.
    #[must_use]
    pub fn add_clocks(&self, x: u32, y: u32, n: i64) -> (u32, u32) {
        let ht = i64::from(self.horizontal.total());
        let frame = self.frame_clocks().get() as i64;
        let t = (i64::from(y) * ht + i64::from(x) + n).rem_euclid(frame);
        ((t % ht) as u32, (t / ht) as u32)
    }

    /// Check that the profile describes a runnable raster.
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (axis, name) in [
            (self.horizontal, AxisName::Horizontal),
            (self.vertical, AxisName::Vertical),
        ] {
            if axis.active == 0 {
                return Err(ProfileError::ZeroActive(name));
            }
            if axis.sync == 0 {
                return Err(ProfileError::ZeroSync(name));
            }
        }
        if self.pixel_clock.frequency_hz == 0 {
            return Err(ProfileError::ZeroClock);
        }
        Ok(())
    }
}

/// Built-in profiles by name. The `test*` profiles are tiny rasters for
/// simulation; the rest are standard monitor modes.
pub const PROFILES: &[(&str, TimingProfile)] = &[
    (
        "test",
        TimingProfile::new(
            Axis::new(13, 3, 5, 7),
            Axis::new(17, 3, 5, 7),
            SyncPolarity::Positive,
            PixelClock::from_khz(25_125),
        ),
    ),
    (
        "test16",
        TimingProfile::new(
            Axis::new(64, 10, 16, 10),
            Axis::new(7, 1, 1, 1),
            SyncPolarity::Positive,
            PixelClock::from_khz(25_125),
        ),
    ),
    (
        "testbig",
        TimingProfile::new(
            Axis::new(64, 10, 16, 10),
            Axis::new(44, 1, 3, 2),
            SyncPolarity::Positive,
            PixelClock::from_khz(25_125),
        ),
    ),
    (
        "640x480",
        TimingProfile::new(
            Axis::new(640, 16, 96, 48),
            Axis::new(480, 10, 2, 33),
            SyncPolarity::Positive,
            PixelClock::from_khz(25_125),
        ),
    ),
    (
        "800x600",
        TimingProfile::new(
            Axis::new(800, 40, 128, 88),
            Axis::new(600, 1, 4, 23),
            SyncPolarity::Positive,
            PixelClock::from_khz(39_750),
        ),
    ),
    (
        "1280x720",
        TimingProfile::new(
            Axis::new(1280, 110, 40, 200),
            Axis::new(720, 5, 5, 20),
            SyncPolarity::Positive,
            PixelClock::from_khz(73_500),
        ),
    ),
    (
        // 30 fps: the PLL tops out well short of the 148.5 MHz 60 Hz mode.
        "1920x1080",
        TimingProfile::new(
            Axis::new(1920, 88, 44, 148),
            Axis::new(1080, 4, 5, 36),
            SyncPolarity::Positive,
            PixelClock::from_khz(73_500),
        ),
    ),
];

/// Look up a built-in profile by name (case-insensitive).
#[must_use]
pub fn profile(name: &str) -> Option<TimingProfile> {
    PROFILES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, p)| p)
}

/// Names of all built-in profiles.
pub fn profile_names() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|&(n, _)| n)
}
