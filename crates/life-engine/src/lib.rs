//! Double-buffered Life automaton engine sharing memory with a video scan.
//!
//! The grid lives in two banks of 16-bit words, one bit per cell. One bank
//! is "current": the display scans it and the advancer reads it as the
//! neighbour source. The other is "next", where the advancer writes the
//! following generation. Each bank has one read and one write port, and
//! every access goes through the [`MemoryArbiter`], which gives display
//! reads absolute priority. When a pass completes, the
//! [`BankSwapController`] swaps the roles at the next vertical blank.
//!
//! Everything advances one pixel clock per [`LifeVideo::step`]; there are
//! no threads and nothing blocks.
//!
//! ```
//! use life_engine::{EngineConfig, LifeVideo, Pattern};
//! use video_timer::profile;
//!
//! let timing = profile("test").unwrap();
//! let config = EngineConfig::new(4, 4, timing).with_seed(Pattern::Block);
//! let mut video = LifeVideo::new(&config).unwrap();
//! video.run_frame();
//! assert_eq!(video.generation(), 1);
//! assert_eq!(video.population(), 4);
//! ```

pub mod advancer;
pub mod arbiter;
pub mod bandwidth;
pub mod bank;
pub mod config;
mod engine;
pub mod formatter;
pub mod lfsr;
pub mod rules;
pub mod seed;
pub mod swap;
mod window;

pub use advancer::{GenerationAdvancer, PassMode, PassStats, Phase};
pub use arbiter::{ArbiterStats, CycleOutcome, Grant, MemoryArbiter, MemoryRequest, Port};
pub use bandwidth::Bandwidth;
pub use bank::{BankId, BankPair, BankRoles, GridShape, Word};
pub use config::{ConfigError, EngineConfig, MemoryBudget};
pub use engine::{LifeVideo, VideoOut};
pub use formatter::{Palette, PixelFormatter};
pub use rules::{Neighbourhood, next_state};
pub use seed::{Pattern, Seed};
pub use swap::{BankSwapController, SwapState};
