//! Stopping rules for the calibration loop.

use crate::adaptive::state::CalibrationState;
use crate::config::{Config, TerminationPolicy};

/// Whether a run should stop, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The run is over; the multiplier is frozen.
    pub complete: bool,

    /// The run stopped because the estimate stabilized, as opposed to
    /// running out of its round budget.
    pub converged: bool,
}

impl Completion {
    /// Keep running.
    pub const CONTINUE: Self = Self {
        complete: false,
        converged: false,
    };
}

/// Decide whether the run is over.
///
/// Under the adaptive policy a run converges when the in-effect multipliers
/// of the last `stable_window` rounds span no more than `stable_threshold`,
/// once at least `min_rounds` rounds are recorded; it is force-terminated
/// at `max_rounds` regardless. The fixed-length policy simply runs its full
/// count and never reports convergence.
pub fn check_completion(state: &CalibrationState, config: &Config) -> Completion {
    match config.policy {
        TerminationPolicy::Adaptive {
            min_rounds,
            max_rounds,
            stable_window,
            stable_threshold,
        } => {
            let converged = state.round >= min_rounds
                && window_is_stable(state, stable_window as usize, stable_threshold);
            let forced = state.round >= max_rounds;
            Completion {
                complete: converged || forced,
                converged,
            }
        }
        TerminationPolicy::FixedLength { total_rounds } => Completion {
            complete: state.round >= total_rounds,
            converged: false,
        },
    }
}

/// Stability over the recent window of in-effect multipliers.
///
/// Reads the multiplier recorded *during* each round, not the value the
/// adjuster produced afterwards; comparing the wrong series would change
/// convergence timing.
fn window_is_stable(state: &CalibrationState, window: usize, threshold: f64) -> bool {
    let recent = state.recent_multipliers(window);
    if recent.is_empty() {
        return false;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &m in &recent {
        min = min.min(m);
        max = max.max(m);
    }

    (max - min) <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analysis, AttemptClass};
    use crate::types::{AttemptOutcome, AttemptRecord};

    fn neutral_analysis() -> Analysis {
        Analysis {
            class: AttemptClass::Neutral,
            overshoots: 0,
            corrections: 0,
            score: 0,
            closest_distance: 10.0,
        }
    }

    /// Build a state whose recorded in-effect multipliers are exactly
    /// `multipliers`, in order.
    fn state_with_multipliers(config: &Config, multipliers: &[f64]) -> CalibrationState {
        let mut state = CalibrationState::new(config);
        for &m in multipliers {
            state.multiplier = m;
            let record = AttemptRecord::new(vec![], AttemptOutcome::Hit, 5.0, 300.0, m);
            state.push_round(record, neutral_analysis());
        }
        state
    }

    #[test]
    fn test_never_completes_before_min_rounds() {
        let config = Config::default();
        // Nine perfectly stable rounds: still below min_rounds = 10.
        let state = state_with_multipliers(&config, &[1.0; 9]);
        assert_eq!(check_completion(&state, &config), Completion::CONTINUE);
    }

    #[test]
    fn test_converges_on_stable_window() {
        let config = Config::default();
        let mut multipliers = vec![2.6, 1.4, 2.0, 1.7, 1.9];
        multipliers.extend([1.52, 1.55, 1.5, 1.56, 1.54]); // spread 0.06
        let state = state_with_multipliers(&config, &multipliers);

        let completion = check_completion(&state, &config);
        assert!(completion.complete);
        assert!(completion.converged);
    }

    #[test]
    fn test_unstable_window_keeps_running() {
        let config = Config::default();
        let mut multipliers = vec![1.0; 5];
        multipliers.extend([1.5, 1.3, 1.6, 1.4, 1.7]); // spread 0.4
        let state = state_with_multipliers(&config, &multipliers);

        assert_eq!(check_completion(&state, &config), Completion::CONTINUE);
    }

    #[test]
    fn test_forced_stop_at_max_rounds() {
        let config = Config::default();
        // Alternating wildly: never converges, stops at round 30.
        let multipliers: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 0.5 } else { 3.0 }).collect();
        let state = state_with_multipliers(&config, &multipliers);

        let completion = check_completion(&state, &config);
        assert!(completion.complete);
        assert!(!completion.converged);
    }

    #[test]
    fn test_window_reads_in_effect_series() {
        // The post-adjustment value is deliberately different from what was
        // recorded per round; only the recorded series may be compared.
        let config = Config::default();
        let mut state = state_with_multipliers(&config, &[1.5; 10]);
        state.multiplier = 4.9; // pending adjustment, never played

        let completion = check_completion(&state, &config);
        assert!(completion.converged);
    }

    #[test]
    fn test_fixed_length_policy() {
        let config = Config::fixed_length(12);

        let running = state_with_multipliers(&config, &[1.0; 11]);
        assert_eq!(check_completion(&running, &config), Completion::CONTINUE);

        let done = state_with_multipliers(&config, &[1.0; 12]);
        let completion = check_completion(&done, &config);
        assert!(completion.complete);
        assert!(!completion.converged);
    }
}
