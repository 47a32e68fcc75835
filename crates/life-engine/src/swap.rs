//! Bank swap controller.
//!
//! ```text
//!            pass complete
//! COMPUTING ---------------> READY
//!     ^                        |
//!     +------------------------+
//!      vblank_start: swap roles, restart advancer
//! ```
//!
//! Swapping only at the first cycle of vertical blanking means the display
//! never sees a frame drawn half from one generation and half from the
//! next, and at most one generation transition is shown per frame.

use std::fmt;

use life_core::{Observable, Value};
use log::debug;

use crate::bank::BankRoles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapState {
    /// The pass into "next" is still running.
    Computing,
    /// "Next" holds a complete generation; waiting for vertical blank.
    Ready,
}

impl fmt::Display for SwapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computing => write!(f, "computing"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

pub struct BankSwapController {
    state: SwapState,
    swaps: u64,
    last_swap_frame: Option<u64>,
}

impl BankSwapController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SwapState::Computing,
            swaps: 0,
            last_swap_frame: None,
        }
    }

    /// The advancer has written the last word of "next".
    pub fn pass_complete(&mut self) {
        debug_assert_eq!(self.state, SwapState::Computing);
        self.state = SwapState::Ready;
    }

    /// Called on the first cycle of vertical blanking. Swaps the bank roles
    /// if a generation is ready and returns whether it did.
    pub fn at_vblank(&mut self, roles: &mut BankRoles, frame: u64) -> bool {
        if self.state != SwapState::Ready {
            return false;
        }
        debug_assert_ne!(self.last_swap_frame, Some(frame), "second swap in frame");
        roles.swap();
        self.state = SwapState::Computing;
        self.swaps += 1;
        self.last_swap_frame = Some(frame);
        debug!(
            "frame {frame}: swapped banks, {} now current",
            roles.current().name()
        );
        true
    }

    #[must_use]
    pub fn state(&self) -> SwapState {
        self.state
    }

    /// Swaps performed since power-up.
    #[must_use]
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    #[must_use]
    pub fn last_swap_frame(&self) -> Option<u64> {
        self.last_swap_frame
    }
}

impl Default for BankSwapController {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for BankSwapController {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "state" => Some(self.state.to_string().into()),
            "count" => Some(self.swaps.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["state", "count"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::BankId;

    #[test]
    fn no_swap_while_computing() {
        let mut swap = BankSwapController::new();
        let mut roles = BankRoles::new();
        assert!(!swap.at_vblank(&mut roles, 0));
        assert_eq!(roles.current(), BankId::A);
        assert_eq!(swap.swaps(), 0);
    }

    #[test]
    fn ready_swaps_at_next_vblank_only() {
        let mut swap = BankSwapController::new();
        let mut roles = BankRoles::new();
        swap.pass_complete();
        assert_eq!(swap.state(), SwapState::Ready);
        assert_eq!(roles.current(), BankId::A, "completion alone does not swap");

        assert!(swap.at_vblank(&mut roles, 3));
        assert_eq!(roles.current(), BankId::B);
        assert_eq!(roles.next(), BankId::A);
        assert_eq!(swap.state(), SwapState::Computing);
        assert_eq!(swap.last_swap_frame(), Some(3));

        assert!(!swap.at_vblank(&mut roles, 4), "no pass completed since");
        assert_eq!(roles.current(), BankId::B);
    }

    #[test]
    fn observable_state() {
        let mut swap = BankSwapController::new();
        assert_eq!(swap.query("state"), Some(Value::from("computing")));
        swap.pass_complete();
        assert_eq!(swap.query("state"), Some(Value::from("ready")));
        swap.at_vblank(&mut BankRoles::new(), 0);
        assert_eq!(swap.query("count"), Some(Value::U64(1)));
    }
}
