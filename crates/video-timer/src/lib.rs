//! Raster timing generator.
//!
//! The timer is two nested free-running counters: the column counter wraps
//! at the horizontal total and steps the row counter, which wraps at the
//! vertical total and marks the frame boundary. Nothing outside the timer
//! ever perturbs these counters once running; every other part of the
//! pipeline follows them.
//!
//! # Raster layout
//!
//! ```text
//!  column: 0 ........ active | front porch | sync | back porch | (wrap)
//!  row:    0 ........ active | front porch | sync | back porch | (wrap)
//! ```
//!
//! Vertical blanking starts on the first blanking pixel of the last active
//! row, not at the start of the next row. That is the earliest point after
//! which no pixel of the frame will be read again, and the point at which a
//! frame buffer may safely change underneath the display.

mod profile;

pub use profile::{
    Axis, AxisName, PROFILES, ProfileError, SyncPolarity, TimingProfile, profile, profile_names,
};

use life_core::{Observable, Tickable, Value};

/// Timing outputs for one pixel clock cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Beam {
    pub column: u32,
    pub row: u32,
    /// Frames completed since power-up.
    pub frame: u64,
    /// Inside the visible region.
    pub active: bool,
    /// Horizontal sync wire level (polarity applied).
    pub hsync: bool,
    /// Vertical sync wire level (polarity applied).
    pub vsync: bool,
    /// From the end of the last active pixel until the frame wraps.
    pub vertical_blanking: bool,
    /// First cycle of vertical blanking.
    pub vblank_start: bool,
    /// First cycle of the frame (column 0, row 0).
    pub frame_start: bool,
}

/// Raster timing generator.
pub struct VideoTimer {
    profile: TimingProfile,
    column: u32,
    row: u32,
    frame: u64,
    /// Frame wrapped, auto-clears on read.
    frame_complete: bool,
}

impl VideoTimer {
    #[must_use]
    pub fn new(profile: TimingProfile) -> Self {
        Self {
            profile,
            column: 0,
            row: 0,
            frame: 0,
            frame_complete: false,
        }
    }

    /// Timing outputs for the current cycle.
    #[must_use]
    pub fn beam(&self) -> Beam {
        let h = &self.profile.horizontal;
        let v = &self.profile.vertical;
        let (x, y) = (self.column, self.row);
        let last_active_row = v.active - 1;

        Beam {
            column: x,
            row: y,
            frame: self.frame,
            active: x < h.active && y < v.active,
            hsync: self
                .profile
                .polarity
                .level((h.sync_start()..h.sync_end()).contains(&x)),
            vsync: self
                .profile
                .polarity
                .level((v.sync_start()..v.sync_end()).contains(&y)),
            vertical_blanking: (y == last_active_row && x >= h.active) || y >= v.active,
            vblank_start: y == last_active_row && x == h.active,
            frame_start: x == 0 && y == 0,
        }
    }

    /// Has the frame wrapped since the last call? Auto-clears on read.
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    #[must_use]
    pub fn profile(&self) -> &TimingProfile {
        &self.profile
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[must_use]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Frames completed since power-up.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Position the beam directly (for testing).
    #[doc(hidden)]
    pub fn set_position(&mut self, column: u32, row: u32) {
        self.column = column % self.profile.horizontal.total();
        self.row = row % self.profile.vertical.total();
    }
}

impl Tickable for VideoTimer {
    fn tick(&mut self) {
        self.column += 1;
        if self.column >= self.profile.horizontal.total() {
            self.column = 0;
            self.row += 1;
            if self.row >= self.profile.vertical.total() {
                self.row = 0;
                self.frame += 1;
                self.frame_complete = true;
            }
        }
    }
}

impl Observable for VideoTimer {
    fn query(&self, path: &str) -> Option<Value> {
        let beam = self.beam();
        match path {
            "column" => Some(beam.column.into()),
            "row" => Some(beam.row.into()),
            "frame" => Some(beam.frame.into()),
            "active" => Some(beam.active.into()),
            "hsync" => Some(beam.hsync.into()),
            "vsync" => Some(beam.vsync.into()),
            "vertical_blanking" => Some(beam.vertical_blanking.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "column",
            "row",
            "frame",
            "active",
            "hsync",
            "vsync",
            "vertical_blanking",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::{PixelClock, Ticks};

    fn test_profile() -> TimingProfile {
        profile("test").expect("test profile")
    }

    #[test]
    fn starts_at_origin_in_active_video() {
        let timer = VideoTimer::new(test_profile());
        let beam = timer.beam();
        assert_eq!((beam.column, beam.row, beam.frame), (0, 0, 0));
        assert!(beam.active);
        assert!(beam.frame_start);
        assert!(!beam.vertical_blanking);
    }

    #[test]
    fn signals_match_closed_form_for_three_frames() {
        let p = test_profile();
        let (h, v) = (p.horizontal, p.vertical);
        let mut timer = VideoTimer::new(p);

        let cycles = p.frame_clocks().get() * 3 + 100;
        for cycle in 0..cycles {
            let x = (cycle % u64::from(h.total())) as u32;
            let y = (cycle / u64::from(h.total()) % u64::from(v.total())) as u32;
            let beam = timer.beam();

            assert_eq!((beam.column, beam.row), (x, y), "cycle {cycle}");
            assert_eq!(beam.frame, cycle / p.frame_clocks().get());
            assert_eq!(beam.active, x < h.active && y < v.active);
            assert_eq!(beam.hsync, h.sync_start() <= x && x < h.sync_end());
            assert_eq!(beam.vsync, v.sync_start() <= y && y < v.sync_end());
            assert_eq!(
                beam.vertical_blanking,
                (y == v.active - 1 && x >= h.active) || y >= v.active
            );
            assert_eq!(beam.vblank_start, y == v.active - 1 && x == h.active);
            assert_eq!(beam.frame_start, x == 0 && y == 0);

            timer.tick();
        }
    }

    #[test]
    fn negative_polarity_inverts_sync_levels() {
        let p = TimingProfile {
            polarity: SyncPolarity::Negative,
            ..test_profile()
        };
        let mut timer = VideoTimer::new(p);
        assert!(timer.beam().hsync, "idle level is high");

        timer.set_position(p.horizontal.sync_start(), 0);
        assert!(!timer.beam().hsync, "pulse is low");

        timer.set_position(0, p.vertical.sync_start());
        assert!(!timer.beam().vsync);
    }

    #[test]
    fn frame_complete_once_per_frame() {
        let p = test_profile();
        let mut timer = VideoTimer::new(p);

        for _ in 0..p.frame_clocks().get() - 1 {
            timer.tick();
            assert!(!timer.take_frame_complete());
        }
        timer.tick();
        assert!(timer.take_frame_complete());
        assert!(!timer.take_frame_complete(), "auto-clears");
        assert_eq!(timer.frame(), 1);
        assert_eq!((timer.column(), timer.row()), (0, 0));
    }

    #[test]
    fn vblank_start_once_per_frame() {
        let p = test_profile();
        let mut timer = VideoTimer::new(p);
        let mut seen = 0;
        for _ in 0..p.frame_clocks().get() * 4 {
            if timer.beam().vblank_start {
                seen += 1;
            }
            timer.tick();
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn tick_n_matches_single_ticks() {
        let p = test_profile().with_pixel_clock(PixelClock::new(12_000_000));
        let mut a = VideoTimer::new(p);
        let mut b = VideoTimer::new(p);
        a.tick_n(Ticks::new(1_234));
        for _ in 0..1_234 {
            b.tick();
        }
        assert_eq!(a.beam(), b.beam());
    }

    #[test]
    fn observable_paths() {
        let mut timer = VideoTimer::new(test_profile());
        timer.set_position(4, 2);
        assert_eq!(timer.query("column"), Some(Value::U32(4)));
        assert_eq!(timer.query("row"), Some(Value::U32(2)));
        assert_eq!(timer.query("active"), Some(Value::Bool(true)));
        assert_eq!(timer.query("nonsense"), None);
        for path in timer.query_paths() {
            assert!(timer.query(path).is_some(), "{path}");
        }
    }
}
