//! Headless capture: PNG screenshots and numbered frame dumps.

#![allow(clippy::cast_possible_truncation)]

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use life_engine::LifeVideo;
use log::debug;

use crate::error::RunnerError;

/// Save the active area as last scanned out as a PNG file.
///
/// The framebuffer is ARGB32; the encoder takes RGBA bytes.
pub fn save_screenshot(video: &LifeVideo, path: &Path) -> Result<(), RunnerError> {
    let (width, height) = video.framebuffer_size();

    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut rgba = Vec::with_capacity(video.framebuffer().len() * 4);
    for &pixel in video.framebuffer() {
        rgba.extend_from_slice(&[
            (pixel >> 16) as u8,
            (pixel >> 8) as u8,
            pixel as u8,
            (pixel >> 24) as u8,
        ]);
    }

    writer.write_image_data(&rgba)?;
    Ok(())
}

/// Run `frames` frames, saving each as `dir/000001.png`, `dir/000002.png`
/// and so on.
pub fn save_frame_sequence(
    video: &mut LifeVideo,
    dir: &Path,
    frames: u64,
) -> Result<(), RunnerError> {
    fs::create_dir_all(dir)?;

    for i in 1..=frames {
        video.run_frame();
        let path = dir.join(format!("{i:06}.png"));
        save_screenshot(video, &path)?;
        debug!("frame {i} (generation {}) -> {}", video.generation(), path.display());
    }

    Ok(())
}
