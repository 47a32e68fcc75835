//! Memory bandwidth arithmetic for a grid on a timing profile.
//!
//! Per frame the current bank's read port serves one display read per
//! active pixel inside the grid and is free for the rest of the frame. A
//! generation needs one compute read per grid word, which can only use the
//! free read cycles, and one compute write per grid word into the other
//! bank, which can use any cycle. The advancer issues one request per
//! cycle, so reads plus writes must also fit in the frame.
//!
//! This is a steady-state bound; a pass that fits still swaps only at the
//! next vertical blank.

#![allow(clippy::cast_precision_loss)] // Rates only feed reports.

use video_timer::TimingProfile;

use crate::bank::GridShape;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bandwidth {
    pub frame_clocks: u64,
    pub active_pixels: u64,
    pub blanking_cycles: u64,
    /// Display reads per frame (active pixels inside the grid).
    pub display_reads: u64,
    /// Cycles per frame in which the current bank's read port is idle.
    pub free_read_cycles: u64,
    pub grid_words: u64,
    pub frames_per_second: f64,
}

impl Bandwidth {
    #[must_use]
    pub fn new(profile: &TimingProfile, shape: GridShape) -> Self {
        let frame_clocks = profile.frame_clocks();
        let display_reads = shape.cells();
        Self {
            frame_clocks: frame_clocks.get(),
            active_pixels: profile.active_pixels(),
            blanking_cycles: profile.blanking_cycles(),
            display_reads,
            free_read_cycles: frame_clocks.remaining_after(display_reads),
            grid_words: shape.total_words() as u64,
            frames_per_second: profile.frames_per_second(),
        }
    }

    /// Compute requests per generation (reads plus writes).
    #[must_use]
    pub fn compute_accesses(&self) -> u64 {
        2 * self.grid_words
    }

    /// Can a new generation be shown every frame?
    #[must_use]
    pub fn generation_per_frame(&self) -> bool {
        self.grid_words <= self.free_read_cycles && self.compute_accesses() <= self.frame_clocks
    }

    /// Frames a pass spans in the steady state, at least one.
    #[must_use]
    pub fn frames_per_generation(&self) -> u64 {
        let by_reads = self.grid_words.div_ceil(self.free_read_cycles.max(1));
        let by_requests = self.compute_accesses().div_ceil(self.frame_clocks.max(1));
        by_reads.max(by_requests).max(1)
    }

    /// Generations shown per second.
    #[must_use]
    pub fn generations_per_second(&self) -> f64 {
        self.frames_per_second / self.frames_per_generation() as f64
    }

    /// Bank accesses per second, display and compute together.
    #[must_use]
    pub fn accesses_per_second(&self) -> f64 {
        let per_generation = self.compute_accesses() as f64;
        self.display_reads as f64 * self.frames_per_second
            + per_generation * self.generations_per_second()
    }

    /// Fraction of the current bank's read cycles in use.
    #[must_use]
    pub fn read_port_load(&self) -> f64 {
        let reads = self.display_reads as f64
            + self.grid_words as f64 / self.frames_per_generation() as f64;
        reads / self.frame_clocks as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::PixelClock;
    use video_timer::profile;

    #[test]
    fn hd_generation_fits_in_blanking() {
        let timing = profile("1280x720").unwrap();
        let bw = Bandwidth::new(&timing, GridShape::new(1280, 720));
        assert_eq!(bw.frame_clocks, 1_222_500);
        assert_eq!(bw.blanking_cycles, 300_900);
        assert_eq!(bw.free_read_cycles, 300_900);
        assert_eq!(bw.grid_words, 57_600);
        assert!(bw.generation_per_frame());
        assert_eq!(bw.frames_per_generation(), 1);
        assert!((bw.generations_per_second() - bw.frames_per_second).abs() < 1e-9);
    }

    #[test]
    fn smaller_grid_frees_active_cycles() {
        let timing = profile("640x480").unwrap();
        let bw = Bandwidth::new(&timing, GridShape::new(320, 240));
        assert_eq!(bw.display_reads, 76_800);
        assert_eq!(bw.free_read_cycles, bw.frame_clocks - 76_800);
    }

    #[test]
    fn starved_read_port_spans_frames() {
        // A 16x4 raster with a single blanking pixel per line and a
        // one-line vertical blank.
        let timing = video_timer::TimingProfile::new(
            video_timer::Axis::new(16, 0, 1, 0),
            video_timer::Axis::new(4, 0, 1, 0),
            video_timer::SyncPolarity::Positive,
            PixelClock::new(1_000),
        );
        let bw = Bandwidth::new(&timing, GridShape::new(16, 4));
        assert_eq!(bw.frame_clocks, 85);
        assert_eq!(bw.free_read_cycles, 21);
        assert!(bw.generation_per_frame());

        let bw = Bandwidth {
            free_read_cycles: 2,
            ..bw
        };
        assert!(!bw.generation_per_frame());
        assert_eq!(bw.frames_per_generation(), 2);
    }

    #[test]
    fn faster_clock_raises_access_rate_not_ratio() {
        let slow = profile("640x480").unwrap();
        let fast = slow.with_pixel_clock(PixelClock::new(2 * slow.pixel_clock.frequency_hz));
        let shape = GridShape::new(640, 480);
        let a = Bandwidth::new(&slow, shape);
        let b = Bandwidth::new(&fast, shape);
        assert_eq!(a.frames_per_generation(), b.frames_per_generation());
        assert!((b.accesses_per_second() / a.accesses_per_second() - 2.0).abs() < 1e-9);
        assert!((a.read_port_load() - b.read_port_load()).abs() < 1e-12);
    }
}
