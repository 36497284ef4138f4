//! The adaptive estimation loop: state, adjustment, and stopping rules.
//!
//! Each round narrows a `[low, high]` search interval around the working
//! multiplier:
//!
//! 1. **State** ([`state`]): caller-owned round history and bounds. No
//!    ambient globals, so multiple sessions can run side by side and tests
//!    stay deterministic.
//! 2. **Adjustment** ([`adjust`]): damped bisection. Overshoot pulls the
//!    upper bound down to the current multiplier and steps toward `low`;
//!    undershoot mirrors it. Steps take only a 0.4 fraction of the
//!    available half-interval and shrink further as the run matures.
//! 3. **Convergence** ([`convergence`]): stop once the recent in-effect
//!    multipliers stabilize, or force-stop at the round cap.

mod adjust;
mod convergence;
mod state;

pub use adjust::{adjust, round_multiplier};
pub use convergence::{check_completion, Completion};
pub use state::{Bounds, CalibrationState, RoundEntry};
