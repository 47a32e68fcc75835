//! Trait for components that advance once per pixel clock.

use crate::Ticks;

/// A component advanced by the pixel clock.
///
/// The timing generator and the whole pipeline implement this. A tick is one
/// pixel slot: one display pixel (or blanking slot) and one memory cycle.
pub trait Tickable {
    /// Advance by one pixel clock tick.
    fn tick(&mut self);

    /// Advance by multiple ticks.
    ///
    /// Default implementation calls `tick()` in a loop. Implementations may
    /// override for efficiency, but must produce identical results.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
