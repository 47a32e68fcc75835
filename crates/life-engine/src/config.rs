//! Engine configuration and validation.
//!
//! `{width, height, timing profile, seed}` fully specifies an instance.
//! Everything is checked before any storage is allocated; an invalid
//! configuration is rejected whole, never truncated to fit.

use thiserror::Error;
use video_timer::{ProfileError, TimingProfile};

use crate::bank::GridShape;
use crate::formatter::Palette;
use crate::seed::Seed;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid needs {required} words per bank but only {available} are available")]
    CapacityExceeded { required: usize, available: usize },
    #[error("grid {width}x{height} exceeds the {active_width}x{active_height} display area")]
    GridExceedsDisplay {
        width: u32,
        height: u32,
        active_width: u32,
        active_height: u32,
    },
    #[error("grid has no cells")]
    EmptyGrid,
    #[error("invalid timing profile: {0}")]
    InvalidProfile(#[from] ProfileError),
    #[error("seed cell ({row}, {column}) lies outside the grid")]
    SeedOutOfBounds { row: u32, column: u32 },
    #[error("unknown timing profile {0:?}")]
    UnknownProfile(String),
    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),
    #[error("reseed interval must be at least one generation")]
    ZeroReseedInterval,
}

/// Storage available to each bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBudget {
    pub words_per_bank: usize,
}

impl MemoryBudget {
    /// One 16-bit single-port RAM of 64K words per bank.
    pub const DEFAULT: Self = Self {
        words_per_bank: 65_536,
    };
}

impl Default for MemoryBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Build-time parameters of a pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub profile: TimingProfile,
    pub seed: Seed,
    pub palette: Palette,
    /// Replace every N-th generation with random data.
    pub reseed_interval: Option<u64>,
    pub memory: MemoryBudget,
}

impl EngineConfig {
    #[must_use]
    pub fn new(width: u32, height: u32, profile: TimingProfile) -> Self {
        Self {
            width,
            height,
            profile,
            seed: Seed::Empty,
            palette: Palette::default(),
            reseed_interval: None,
            memory: MemoryBudget::DEFAULT,
        }
    }

    /// A grid filling the active area of a built-in profile.
    pub fn for_profile(name: &str) -> Result<Self, ConfigError> {
        let profile =
            video_timer::profile(name).ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
        Ok(Self::new(
            profile.horizontal.active,
            profile.vertical.active,
            profile,
        ))
    }

    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = seed.into();
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_reseed_interval(mut self, interval: Option<u64>) -> Self {
        self.reseed_interval = interval;
        self
    }

    #[must_use]
    pub fn with_memory(mut self, memory: MemoryBudget) -> Self {
        self.memory = memory;
        self
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        GridShape::new(self.width, self.height)
    }

    /// Check the configuration and return the grid shape it describes.
    pub fn validate(&self) -> Result<GridShape, ConfigError> {
        self.profile.validate()?;
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let (h, v) = (&self.profile.horizontal, &self.profile.vertical);
        if self.width > h.active || self.height > v.active {
            return Err(ConfigError::GridExceedsDisplay {
                width: self.width,
                height: self.height,
                active_width: h.active,
                active_height: v.active,
            });
        }
        let shape = self.shape();
        let required = shape.total_words();
        if required > self.memory.words_per_bank {
            return Err(ConfigError::CapacityExceeded {
                required,
                available: self.memory.words_per_bank,
            });
        }
        if self.reseed_interval == Some(0) {
            return Err(ConfigError::ZeroReseedInterval);
        }
        self.seed.check(shape)?;
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Pattern;
    use video_timer::{AxisName, profile};

    #[test]
    fn hd_grid_fits_two_banks() {
        let config = EngineConfig::for_profile("1280x720").unwrap();
        let shape = config.validate().unwrap();
        assert_eq!(shape.total_words(), 57_600);
    }

    #[test]
    fn full_hd_grid_exceeds_capacity() {
        let config = EngineConfig::for_profile("1920x1080").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::CapacityExceeded {
                required: 129_600,
                available: 65_536,
            })
        );
    }

    #[test]
    fn larger_memory_admits_full_hd() {
        let config = EngineConfig::for_profile("1920x1080")
            .unwrap()
            .with_memory(MemoryBudget {
                words_per_bank: 131_072,
            });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn grid_must_fit_display() {
        let config = EngineConfig::new(14, 4, profile("test").unwrap());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridExceedsDisplay { width: 14, .. })
        ));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = EngineConfig::new(0, 4, profile("test").unwrap());
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));
    }

    #[test]
    fn broken_profile_is_rejected() {
        let mut timing = profile("test").unwrap();
        timing.vertical.sync = 0;
        let config = EngineConfig::new(4, 4, timing);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProfile(ProfileError::ZeroSync(
                AxisName::Vertical
            )))
        );
    }

    #[test]
    fn unknown_profile() {
        assert_eq!(
            EngineConfig::for_profile("320x200"),
            Err(ConfigError::UnknownProfile("320x200".into()))
        );
    }

    #[test]
    fn zero_reseed_interval_is_rejected() {
        let config = EngineConfig::new(4, 4, profile("test").unwrap()).with_reseed_interval(Some(0));
        assert_eq!(config.validate(), Err(ConfigError::ZeroReseedInterval));
    }

    #[test]
    fn seed_is_checked_against_grid() {
        let config = EngineConfig::new(4, 4, profile("test").unwrap()).with_seed(Pattern::Glider);
        assert!(config.validate().is_ok());
        let config = config.with_seed(Seed::Cells(vec![(0, 9)]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::SeedOutOfBounds { row: 0, column: 9 })
        );
    }
}
