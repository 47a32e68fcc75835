//! Run configuration: a TOML file, overridden field by field by the
//! command line.
//!
//! ```toml
//! profile = "1280x720"
//! pattern = "acorn"
//! frames = 120
//! reseed-interval = 4096
//!
//! [palette]
//! alive = 0x0F0
//! dead = 0x000
//! ```

use std::path::Path;

use life_core::PixelClock;
use life_engine::{EngineConfig, Palette, Pattern, Seed};
use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

pub const DEFAULT_PROFILE: &str = "1280x720";
pub const DEFAULT_FRAMES: u64 = 60;
pub const DEFAULT_RANDOM_SEED: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub alive: u16,
    pub dead: u16,
}

/// Everything a run needs. Absent fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RunConfig {
    /// Built-in timing profile name.
    pub profile: Option<String>,
    /// Grid width; defaults to the profile's active width.
    pub width: Option<u32>,
    /// Grid height; defaults to the profile's active height.
    pub height: Option<u32>,
    /// Re-clock the profile.
    pub pixel_clock_mhz: Option<f64>,
    /// Random fill seed.
    pub seed: Option<u32>,
    /// Named pattern at the grid centre.
    pub pattern: Option<String>,
    /// Explicit live cells as `[row, column]`.
    pub cells: Option<Vec<[u32; 2]>>,
    pub reseed_interval: Option<u64>,
    pub frames: Option<u64>,
    pub palette: Option<PaletteConfig>,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let text = std::fs::read_to_string(path).map_err(|source| RunnerError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| RunnerError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    fn sets_seed(&self) -> bool {
        self.seed.is_some() || self.pattern.is_some() || self.cells.is_some()
    }

    /// Fields set in `overrides` replace ours. The starting pattern is one
    /// setting: if `overrides` names any of `seed`, `pattern` or `cells`,
    /// all three come from `overrides`.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        let seeds = if overrides.sets_seed() {
            (overrides.seed, overrides.pattern, overrides.cells)
        } else {
            (self.seed, self.pattern, self.cells)
        };
        Self {
            profile: overrides.profile.or(self.profile),
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            pixel_clock_mhz: overrides.pixel_clock_mhz.or(self.pixel_clock_mhz),
            seed: seeds.0,
            pattern: seeds.1,
            cells: seeds.2,
            reseed_interval: overrides.reseed_interval.or(self.reseed_interval),
            frames: overrides.frames.or(self.frames),
            palette: overrides.palette.or(self.palette),
        }
    }

    #[must_use]
    pub fn profile_name(&self) -> &str {
        self.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames.unwrap_or(DEFAULT_FRAMES)
    }

    /// Starting pattern: explicit cells, then a named pattern, then a
    /// random fill.
    pub fn seed(&self) -> Result<Seed, RunnerError> {
        if let Some(cells) = &self.cells {
            return Ok(Seed::Cells(cells.iter().map(|&[r, c]| (r, c)).collect()));
        }
        if let Some(name) = &self.pattern {
            return Ok(Seed::Pattern(name.parse::<Pattern>()?));
        }
        Ok(Seed::Random(self.seed.unwrap_or(DEFAULT_RANDOM_SEED)))
    }

    /// Build the engine configuration. Validation happens when the engine
    /// is constructed.
    pub fn engine_config(&self) -> Result<EngineConfig, RunnerError> {
        let mut config = EngineConfig::for_profile(self.profile_name())?;
        if let Some(mhz) = self.pixel_clock_mhz {
            if !(mhz.is_finite() && mhz > 0.0) {
                return Err(RunnerError::PixelClock(mhz));
            }
            let hz = (mhz * 1_000_000.0).round() as u64;
            config.profile = config.profile.with_pixel_clock(PixelClock::new(hz));
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(palette) = self.palette {
            config = config.with_palette(Palette::new(palette.alive, palette.dead));
        }
        Ok(config
            .with_seed(self.seed()?)
            .with_reseed_interval(self.reseed_interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_engine::ConfigError;

    #[test]
    fn parses_kebab_case_toml() {
        let config: RunConfig = toml::from_str(
            r#"
            profile = "640x480"
            width = 320
            pixel-clock-mhz = 24.0
            reseed-interval = 4096
            cells = [[1, 1], [1, 2]]

            [palette]
            alive = 0x0F0
            dead = 0x001
            "#,
        )
        .unwrap();
        assert_eq!(config.profile.as_deref(), Some("640x480"));
        assert_eq!(config.width, Some(320));
        assert_eq!(config.height, None);
        assert_eq!(config.reseed_interval, Some(4096));
        assert_eq!(config.cells, Some(vec![[1, 1], [1, 2]]));
        assert_eq!(
            config.palette,
            Some(PaletteConfig {
                alive: 0x0F0,
                dead: 0x001
            })
        );
    }

    #[test]
    fn overrides_win() {
        let file = RunConfig {
            profile: Some("640x480".into()),
            frames: Some(10),
            seed: Some(4),
            ..RunConfig::default()
        };
        let cli = RunConfig {
            frames: Some(3),
            ..RunConfig::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.frames(), 3);
        assert_eq!(merged.profile_name(), "640x480");
        assert_eq!(merged.seed, Some(4));
    }

    #[test]
    fn seed_flag_replaces_file_pattern_and_cells() {
        let file = RunConfig {
            pattern: Some("block".into()),
            cells: Some(vec![[0, 0]]),
            ..RunConfig::default()
        };
        let cli = RunConfig {
            seed: Some(3),
            ..RunConfig::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.seed().unwrap(), Seed::Random(3));
        assert_eq!((merged.pattern, merged.cells), (None, None));
    }

    #[test]
    fn pattern_flag_replaces_file_cells() {
        let file = RunConfig {
            cells: Some(vec![[0, 0]]),
            seed: Some(9),
            ..RunConfig::default()
        };
        let cli = RunConfig {
            pattern: Some("glider".into()),
            ..RunConfig::default()
        };
        assert_eq!(
            file.merge(cli).seed().unwrap(),
            Seed::Pattern(Pattern::Glider)
        );
    }

    #[test]
    fn file_seed_survives_unrelated_flags() {
        let file = RunConfig {
            pattern: Some("acorn".into()),
            ..RunConfig::default()
        };
        let cli = RunConfig {
            frames: Some(2),
            ..RunConfig::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.seed().unwrap(), Seed::Pattern(Pattern::Acorn));
        assert_eq!(merged.frames(), 2);
    }

    #[test]
    fn defaults() {
        let config = RunConfig::default();
        assert_eq!(config.profile_name(), DEFAULT_PROFILE);
        assert_eq!(config.frames(), DEFAULT_FRAMES);
        assert_eq!(config.seed().unwrap(), Seed::Random(DEFAULT_RANDOM_SEED));
        let engine = config.engine_config().unwrap();
        assert_eq!((engine.width, engine.height), (1280, 720));
    }

    #[test]
    fn seed_precedence() {
        let config = RunConfig {
            seed: Some(3),
            pattern: Some("glider".into()),
            ..RunConfig::default()
        };
        assert_eq!(config.seed().unwrap(), Seed::Pattern(Pattern::Glider));
        let config = RunConfig {
            cells: Some(vec![[0, 0]]),
            ..config
        };
        assert_eq!(config.seed().unwrap(), Seed::Cells(vec![(0, 0)]));
    }

    #[test]
    fn unknown_names_are_errors() {
        let config = RunConfig {
            profile: Some("320x200".into()),
            ..RunConfig::default()
        };
        assert!(matches!(
            config.engine_config(),
            Err(RunnerError::Config(ConfigError::UnknownProfile(_)))
        ));
        let config = RunConfig {
            pattern: Some("puffer".into()),
            ..RunConfig::default()
        };
        assert!(matches!(
            config.engine_config(),
            Err(RunnerError::Config(ConfigError::UnknownPattern(_)))
        ));
    }

    #[test]
    fn pixel_clock_override() {
        let config = RunConfig {
            profile: Some("640x480".into()),
            pixel_clock_mhz: Some(12.0),
            ..RunConfig::default()
        };
        let engine = config.engine_config().unwrap();
        assert_eq!(engine.profile.pixel_clock, PixelClock::new(12_000_000));

        let config = RunConfig {
            pixel_clock_mhz: Some(0.0),
            ..config
        };
        assert!(matches!(
            config.engine_config(),
            Err(RunnerError::PixelClock(_))
        ));
    }
}
