//! Attempt analysis: classify each attempt's movement pattern.
//!
//! Every attempt record is reduced to one of three coarse signals:
//!
//! 1. **Overshoot**: the cursor repeatedly swept past the target at close
//!    range and moved away. Control gain is too high.
//! 2. **Undershoot**: the cursor never closed in, or the attempt timed out.
//!    Control gain is too low.
//! 3. **Neutral**: nothing actionable (clean hit, or too little trail data
//!    to infer a direction change).
//!
//! This is a heuristic two-threshold classifier, not a statistical model:
//! the detection algorithm is transition-based (proximity turning from
//! decreasing to increasing and back), and the thresholds are tunable
//! per proximity unit.

mod classify;

pub use classify::{analyze, Analysis, AttemptClass};
