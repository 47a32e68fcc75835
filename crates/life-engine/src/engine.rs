//! The complete pipeline, advanced one pixel clock at a time.
//!
//! Each cycle, in order:
//!
//! 1. Sample the timing generator's beam.
//! 2. On the first cycle of vertical blank, let the swap controller invert
//!    the bank roles and restart the advancer.
//! 3. Collect the display read (active pixel inside the grid) and the
//!    advancer's request, and let the arbiter run the memory cycle.
//! 4. Format the pixel from the same-cycle display data.
//! 5. Hand the compute grant back to the advancer.
//! 6. Step the timing generator.

use life_core::{Observable, Tickable, Value};
use log::info;
use video_timer::{Beam, VideoTimer};

use crate::advancer::{GenerationAdvancer, PassMode};
use crate::arbiter::{MemoryArbiter, MemoryRequest};
use crate::bandwidth::Bandwidth;
use crate::bank::{BankId, BankPair, BankRoles, GridShape, WORD_BITS};
use crate::config::{ConfigError, EngineConfig};
use crate::formatter::{PixelFormatter, rgb444_to_argb32};
use crate::swap::BankSwapController;

/// The video transport tuple for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoOut {
    /// RGB444 colour word.
    pub colour: u16,
    pub hsync: bool,
    pub vsync: bool,
    pub active: bool,
}

/// A double-buffered Life display engine.
pub struct LifeVideo {
    timer: VideoTimer,
    banks: BankPair,
    roles: BankRoles,
    arbiter: MemoryArbiter,
    advancer: GenerationAdvancer,
    swap: BankSwapController,
    formatter: PixelFormatter,
    reseed_interval: Option<u64>,
    /// Generation held by the current bank. The seed is generation 0.
    generation: u64,
    /// ARGB32 pixels of the active area, row-major.
    framebuffer: Vec<u32>,
}

impl LifeVideo {
    /// Validate the configuration, allocate and seed the banks, and start
    /// computing generation 1.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let shape = config.validate()?;
        let mut banks = BankPair::new(shape);
        let roles = BankRoles::new();
        config.seed.apply(&mut banks, roles.current())?;

        let profile = config.profile;
        let active = profile.horizontal.active as usize * profile.vertical.active as usize;
        let mut engine = Self {
            timer: VideoTimer::new(profile),
            banks,
            roles,
            arbiter: MemoryArbiter::new(),
            advancer: GenerationAdvancer::new(shape, config.seed.lfsr_seed()),
            swap: BankSwapController::new(),
            formatter: PixelFormatter::new(config.palette),
            reseed_interval: config.reseed_interval,
            generation: 0,
            framebuffer: vec![rgb444_to_argb32(config.palette.dead); active],
        };
        engine.advancer.start_pass(engine.mode_for(1));

        info!(
            "life engine: {}x{} grid ({} words per bank) on {}x{} raster at {:.3} MHz, {} live cells",
            shape.width,
            shape.height,
            shape.total_words(),
            profile.horizontal.total(),
            profile.vertical.total(),
            profile.pixel_clock.mhz(),
            engine.banks.population(roles.current()),
        );
        Ok(engine)
    }

    fn mode_for(&self, generation: u64) -> PassMode {
        match self.reseed_interval {
            Some(n) if generation % n == 0 => PassMode::Reseed,
            _ => PassMode::Evolve,
        }
    }

    /// Run one pixel clock cycle.
    pub fn step(&mut self) -> VideoOut {
        let beam = self.timer.beam();

        if beam.vblank_start && self.swap.at_vblank(&mut self.roles, beam.frame) {
            self.generation += 1;
            let mode = self.mode_for(self.generation + 1);
            self.advancer.start_pass(mode);
        }

        let display = self.display_request(&beam);
        let compute = self.advancer.request(self.roles);
        let outcome = self.arbiter.cycle(&mut self.banks, display, compute);

        let sample = outcome
            .display
            .map(|word| (word >> (beam.column % WORD_BITS)) & 1 != 0);
        let colour = self.formatter.format(beam.active, sample);
        if beam.active {
            let width = self.timer.profile().horizontal.active as usize;
            self.framebuffer[beam.row as usize * width + beam.column as usize] =
                rgb444_to_argb32(colour);
        }

        if let Some(grant) = outcome.compute {
            if self.advancer.complete(grant) {
                self.swap.pass_complete();
            }
        }

        self.timer.tick();
        VideoOut {
            colour,
            hsync: beam.hsync,
            vsync: beam.vsync,
            active: beam.active,
        }
    }

    fn display_request(&self, beam: &Beam) -> Option<MemoryRequest> {
        let shape = self.banks.shape();
        if !beam.active || !shape.contains(beam.row, beam.column) {
            return None;
        }
        Some(MemoryRequest::DisplayRead {
            bank: self.roles.current(),
            address: shape.cell_address(beam.row, beam.column).0,
        })
    }

    /// Run to the end of the current frame.
    pub fn run_frame(&mut self) {
        loop {
            self.step();
            if self.timer.take_frame_complete() {
                break;
            }
        }
    }

    /// Run whole frames until `generation` is displayed, giving up after
    /// `max_frames`. Returns whether the generation was reached.
    pub fn run_until_generation(&mut self, generation: u64, max_frames: u64) -> bool {
        for _ in 0..max_frames {
            if self.generation >= generation {
                return true;
            }
            self.run_frame();
        }
        self.generation >= generation
    }

    /// Generation currently on display.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.banks.shape()
    }

    #[must_use]
    pub fn current_bank(&self) -> BankId {
        self.roles.current()
    }

    /// A cell of the displayed generation.
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> bool {
        self.banks.cell(self.roles.current(), row, column)
    }

    /// Live cells of the displayed generation, in raster order.
    #[must_use]
    pub fn live_cells(&self) -> Vec<(u32, u32)> {
        self.banks.live_cells(self.roles.current())
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.banks.population(self.roles.current())
    }

    #[must_use]
    pub fn banks(&self) -> &BankPair {
        &self.banks
    }

    #[must_use]
    pub fn timer(&self) -> &VideoTimer {
        &self.timer
    }

    #[must_use]
    pub fn arbiter(&self) -> &MemoryArbiter {
        &self.arbiter
    }

    #[must_use]
    pub fn advancer(&self) -> &GenerationAdvancer {
        &self.advancer
    }

    #[must_use]
    pub fn swap_controller(&self) -> &BankSwapController {
        &self.swap
    }

    /// ARGB32 pixels of the active area as last scanned.
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    /// Framebuffer size as (width, height).
    #[must_use]
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let profile = self.timer.profile();
        (profile.horizontal.active, profile.vertical.active)
    }

    #[must_use]
    pub fn bandwidth(&self) -> Bandwidth {
        Bandwidth::new(self.timer.profile(), self.banks.shape())
    }
}

impl Tickable for LifeVideo {
    fn tick(&mut self) {
        self.step();
    }
}

impl Observable for LifeVideo {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("timer.") {
            self.timer.query(rest)
        } else if let Some(rest) = path.strip_prefix("swap.") {
            self.swap.query(rest)
        } else if let Some(rest) = path.strip_prefix("arbiter.") {
            self.arbiter.query(rest)
        } else if let Some(rest) = path.strip_prefix("advancer.") {
            self.advancer.query(rest)
        } else if let Some(rest) = path.strip_prefix("cell.") {
            let (row, column) = rest.split_once('.')?;
            Some(self.cell(row.parse().ok()?, column.parse().ok()?).into())
        } else {
            match path {
                "generation" => Some(self.generation.into()),
                "population" => Some(self.population().into()),
                "banks.current" => Some(self.roles.current().name().into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "generation",
            "population",
            "banks.current",
            "cell.<row>.<column>",
            "timer.<timer_paths>",
            "swap.<swap_paths>",
            "arbiter.<arbiter_paths>",
            "advancer.<advancer_paths>",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Pattern, Seed};
    use video_timer::profile;

    fn engine(width: u32, height: u32, seed: Seed) -> LifeVideo {
        let config = EngineConfig::new(width, height, profile("test").unwrap()).with_seed(seed);
        LifeVideo::new(&config).unwrap()
    }

    #[test]
    fn seed_is_generation_zero_in_bank_a() {
        let video = engine(4, 4, Seed::Cells(vec![(1, 1), (1, 2), (1, 3)]));
        assert_eq!(video.generation(), 0);
        assert_eq!(video.current_bank(), BankId::A);
        assert_eq!(video.live_cells(), vec![(1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn first_frame_swaps_in_generation_one() {
        let mut video = engine(4, 4, Seed::Pattern(Pattern::Block));
        video.run_frame();
        assert_eq!(video.generation(), 1);
        assert_eq!(video.current_bank(), BankId::B);
        assert_eq!(video.swap_controller().last_swap_frame(), Some(0));
    }

    #[test]
    fn swap_happens_on_vblank_start_cycle() {
        let mut video = engine(4, 4, Seed::Empty);
        let timing = *video.timer().profile();
        let mut swapped_at = None;
        loop {
            let beam = video.timer().beam();
            let before = video.current_bank();
            video.step();
            if video.current_bank() != before {
                swapped_at = Some((beam.row, beam.column));
                break;
            }
        }
        assert_eq!(
            swapped_at,
            Some((timing.vertical.active - 1, timing.horizontal.active))
        );
    }

    #[test]
    fn outputs_blank_outside_active_area() {
        let mut video = engine(4, 4, Seed::Empty);
        let timing = *video.timer().profile();
        for _ in 0..timing.frame_clocks().get() {
            let out = video.step();
            if !out.active {
                assert_eq!(out.colour, crate::formatter::BLANK);
            }
        }
    }

    #[test]
    fn framebuffer_shows_displayed_generation() {
        let mut video = engine(4, 4, Seed::Cells(vec![(0, 0)]));
        // The framebuffer fills during frame 0, before the first swap.
        video.run_frame();
        let (width, _) = video.framebuffer_size();
        assert_eq!(video.framebuffer()[0], 0xFFFF_FFFF);
        assert_eq!(video.framebuffer()[1], 0xFF00_0000);
        assert_eq!(video.framebuffer()[width as usize], 0xFF00_0000);
    }

    #[test]
    fn observable_routes_by_prefix() {
        let mut video = engine(4, 4, Seed::Cells(vec![(2, 3)]));
        assert_eq!(video.query("cell.2.3"), Some(Value::Bool(true)));
        assert_eq!(video.query("cell.2.2"), Some(Value::Bool(false)));
        assert_eq!(video.query("cell.x.2"), None);
        assert_eq!(video.query("banks.current"), Some(Value::from("A")));
        video.run_frame();
        assert_eq!(video.query("generation"), Some(Value::U64(1)));
        assert_eq!(video.query("swap.count"), Some(Value::U64(1)));
        assert_eq!(video.query("timer.frame"), Some(Value::U64(1)));
        assert!(video.query("arbiter.display_reads").is_some());
        assert_eq!(video.query("nonsense"), None);
    }
}
