//! Core traits and types for the cycle-accurate Life video pipeline.
//!
//! Everything ticks at the pixel clock. Timing, memory arbitration and
//! generation compute all advance in lockstep with it.

mod clock;
mod observable;
mod tickable;
mod ticks;

pub use clock::PixelClock;
pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
