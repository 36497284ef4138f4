//! Damped bisection over the multiplier search interval.

use crate::adaptive::state::Bounds;
use crate::analysis::{Analysis, AttemptClass};
use crate::config::Config;

/// Round a multiplier to the estimation precision floor of two decimals.
///
/// Finer resolution is not distinguishable above the classifier's noise
/// level, and the convergence window compares these rounded values.
pub fn round_multiplier(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the next multiplier and bounds from one round's analysis.
///
/// This is not classic bisection: instead of jumping to the interval
/// midpoint, the step covers only `step_factor` (0.4 by default) of the
/// available half-interval, scaled down further by a damping factor
/// `1 - damping_slope * round / max_rounds` as the run matures. A neutral
/// analysis leaves everything unchanged.
///
/// `round` is the number of completed rounds including the one just
/// analyzed. The result is rounded to two decimals and clamped to the
/// global domain; callers only invoke this while the session is incomplete.
pub fn adjust(
    analysis: &Analysis,
    multiplier: f64,
    bounds: Bounds,
    round: u32,
    config: &Config,
) -> (f64, Bounds) {
    let max_rounds = config.policy.max_rounds();
    let progress = f64::from(round) / f64::from(max_rounds);
    let damping = 1.0 - config.damping_slope * progress;

    let (mut next, next_bounds) = match analysis.class {
        AttemptClass::Overshoot => {
            // The optimum is below the current multiplier.
            let bounds = Bounds {
                low: bounds.low,
                high: multiplier,
            };
            let step = (multiplier - bounds.low) * config.step_factor * damping;
            (f64::max(bounds.low, multiplier - step), bounds)
        }
        AttemptClass::Undershoot => {
            let bounds = Bounds {
                low: multiplier,
                high: bounds.high,
            };
            let step = (bounds.high - multiplier) * config.step_factor * damping;
            (f64::min(bounds.high, multiplier + step), bounds)
        }
        AttemptClass::Neutral => return (multiplier, bounds),
    };

    next = round_multiplier(next).clamp(config.mult_min, config.mult_max);
    debug_assert!(next_bounds.contains(next));

    (next, next_bounds)
}
