//! Headless runner for the Life video engine.
//!
//! Builds a pipeline from a [`RunConfig`], runs it for a number of frames,
//! and optionally writes a screenshot of the last frame, a numbered PNG per
//! frame, and a JSON report.

pub mod capture;
pub mod config;
pub mod error;
pub mod report;

use std::path::PathBuf;

use life_engine::LifeVideo;
use log::info;

pub use config::RunConfig;
pub use error::RunnerError;
pub use report::RunReport;

/// Where a run writes its results.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub screenshot: Option<PathBuf>,
    pub record: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Run a configured pipeline and write the requested outputs.
pub fn run(config: &RunConfig, outputs: &Outputs) -> Result<RunReport, RunnerError> {
    let mut video = LifeVideo::new(&config.engine_config()?)?;
    let frames = config.frames();

    if let Some(dir) = &outputs.record {
        capture::save_frame_sequence(&mut video, dir, frames)?;
        info!("saved {frames} frames to {}", dir.display());
    } else {
        for _ in 0..frames {
            video.run_frame();
        }
    }
    info!(
        "ran {frames} frames: generation {}, population {}",
        video.generation(),
        video.population()
    );

    if let Some(path) = &outputs.screenshot {
        capture::save_screenshot(&video, path)?;
        info!("screenshot saved to {}", path.display());
    }

    let report = RunReport::new(&video, config.profile_name(), frames);
    if let Some(path) = &outputs.report {
        report.write(path)?;
        info!("report saved to {}", path.display());
    }
    Ok(report)
}
