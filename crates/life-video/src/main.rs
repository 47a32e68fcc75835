//! Life video engine runner.
//!
//! Runs the pipeline headless for a number of frames and prints the
//! bandwidth summary. Set `RUST_LOG=debug` to follow swaps and passes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use life_video::config::PaletteConfig;
use life_video::{Outputs, RunConfig, RunReport, RunnerError, run};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// TOML run configuration; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Timing profile [default: 1280x720]
    #[arg(long)]
    profile: Option<String>,

    /// Grid width in cells [default: profile active width]
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in cells [default: profile active height]
    #[arg(long)]
    height: Option<u32>,

    /// Run the profile from a different pixel clock
    #[arg(long)]
    pixel_clock_mhz: Option<f64>,

    /// Random fill seed [default: 1]
    #[arg(long, conflicts_with = "pattern")]
    seed: Option<u32>,

    /// Named starting pattern: blinker, block, glider, r-pentomino, acorn
    #[arg(long)]
    pattern: Option<String>,

    /// Replace every N-th generation with random data
    #[arg(long)]
    reseed_interval: Option<u64>,

    /// Number of frames to run [default: 60]
    #[arg(long)]
    frames: Option<u64>,

    /// Alive colour as RGB444, e.g. 0xFFF
    #[arg(long, value_parser = parse_rgb444, requires = "dead")]
    alive: Option<u16>,

    /// Dead colour as RGB444, e.g. 0x000
    #[arg(long, value_parser = parse_rgb444, requires = "alive")]
    dead: Option<u16>,

    /// Save a PNG of the last frame
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Save every frame as a numbered PNG in this directory
    #[arg(long)]
    record: Option<PathBuf>,

    /// Save a JSON run report
    #[arg(long)]
    report: Option<PathBuf>,

    /// List the built-in timing profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

fn parse_rgb444(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches('#');
    match u16::from_str_radix(digits, 16) {
        Ok(colour) if colour <= 0xFFF => Ok(colour),
        _ => Err(format!("{s:?} is not a 12-bit RGB colour")),
    }
}

impl Args {
    fn overrides(&self) -> RunConfig {
        RunConfig {
            profile: self.profile.clone(),
            width: self.width,
            height: self.height,
            pixel_clock_mhz: self.pixel_clock_mhz,
            seed: self.seed,
            pattern: self.pattern.clone(),
            cells: None,
            reseed_interval: self.reseed_interval,
            frames: self.frames,
            palette: self
                .alive
                .zip(self.dead)
                .map(|(alive, dead)| PaletteConfig { alive, dead }),
        }
    }

    fn outputs(&self) -> Outputs {
        Outputs {
            screenshot: self.screenshot.clone(),
            record: self.record.clone(),
            report: self.report.clone(),
        }
    }
}

fn print_summary(report: &RunReport) {
    let bw = &report.bandwidth;
    println!(
        "{} grid {}x{} ({} words/bank), {} frames at {:.2} fps",
        report.timing.profile,
        report.grid.width,
        report.grid.height,
        report.grid.words_per_bank,
        report.frames,
        report.timing.frames_per_second,
    );
    println!(
        "generation {}, population {}, {} swaps",
        report.generation, report.population, report.swaps
    );
    println!(
        "read port: {} free cycles/frame for {} words/generation, {:.1}% load; {} frame(s) per generation",
        bw.free_read_cycles,
        bw.grid_words,
        bw.read_port_load * 100.0,
        bw.frames_per_generation,
    );
    println!(
        "compute deferred {} times, {} hazards",
        report.arbiter.compute_deferred, report.arbiter.hazards
    );
}

fn try_main(args: &Args) -> Result<(), RunnerError> {
    if args.list_profiles {
        for name in video_timer::profile_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => RunConfig::load(path)?.merge(args.overrides()),
        None => args.overrides(),
    };
    let report = run(&config, &args.outputs())?;
    print_summary(&report);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match try_main(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
