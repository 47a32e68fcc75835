//! JSON summary of a run: what was configured, what happened, and the
//! memory bandwidth arithmetic behind it.

use std::path::Path;

use life_engine::{Bandwidth, LifeVideo};
use serde::Serialize;

use crate::error::RunnerError;

#[derive(Debug, Clone, Serialize)]
pub struct TimingReport {
    pub profile: String,
    pub active_width: u32,
    pub active_height: u32,
    pub horizontal_total: u32,
    pub vertical_total: u32,
    pub pixel_clock_hz: u64,
    pub frames_per_second: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridReport {
    pub width: u32,
    pub height: u32,
    pub words_per_bank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArbiterReport {
    pub display_reads: u64,
    pub compute_reads: u64,
    pub compute_writes: u64,
    pub compute_deferred: u64,
    pub hazards: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub reads: u64,
    pub writes: u64,
    pub cycles: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandwidthReport {
    pub frame_clocks: u64,
    pub active_pixels: u64,
    pub blanking_cycles: u64,
    pub display_reads: u64,
    pub free_read_cycles: u64,
    pub grid_words: u64,
    pub generation_per_frame: bool,
    pub frames_per_generation: u64,
    pub generations_per_second: f64,
    pub accesses_per_second: f64,
    pub read_port_load: f64,
}

impl From<Bandwidth> for BandwidthReport {
    fn from(bw: Bandwidth) -> Self {
        Self {
            frame_clocks: bw.frame_clocks,
            active_pixels: bw.active_pixels,
            blanking_cycles: bw.blanking_cycles,
            display_reads: bw.display_reads,
            free_read_cycles: bw.free_read_cycles,
            grid_words: bw.grid_words,
            generation_per_frame: bw.generation_per_frame(),
            frames_per_generation: bw.frames_per_generation(),
            generations_per_second: bw.generations_per_second(),
            accesses_per_second: bw.accesses_per_second(),
            read_port_load: bw.read_port_load(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timing: TimingReport,
    pub grid: GridReport,
    pub frames: u64,
    pub generation: u64,
    pub population: u64,
    pub swaps: u64,
    pub arbiter: ArbiterReport,
    pub last_pass: Option<PassReport>,
    pub bandwidth: BandwidthReport,
}

impl RunReport {
    #[must_use]
    pub fn new(video: &LifeVideo, profile: &str, frames: u64) -> Self {
        let timing = video.timer().profile();
        let shape = video.shape();
        let stats = video.arbiter().stats();
        Self {
            timing: TimingReport {
                profile: profile.to_string(),
                active_width: timing.horizontal.active,
                active_height: timing.vertical.active,
                horizontal_total: timing.horizontal.total(),
                vertical_total: timing.vertical.total(),
                pixel_clock_hz: timing.pixel_clock.frequency_hz,
                frames_per_second: timing.frames_per_second(),
            },
            grid: GridReport {
                width: shape.width,
                height: shape.height,
                words_per_bank: shape.total_words(),
            },
            frames,
            generation: video.generation(),
            population: video.population(),
            swaps: video.swap_controller().swaps(),
            arbiter: ArbiterReport {
                display_reads: stats.display_reads,
                compute_reads: stats.compute_reads,
                compute_writes: stats.compute_writes,
                compute_deferred: stats.compute_deferred,
                hazards: stats.hazards,
            },
            last_pass: video.advancer().last_pass().map(|pass| PassReport {
                reads: pass.reads,
                writes: pass.writes,
                cycles: pass.cycles,
            }),
            bandwidth: video.bandwidth().into(),
        }
    }

    pub fn to_json(&self) -> Result<String, RunnerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), RunnerError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
