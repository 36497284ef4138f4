//! State owned by one calibration run.
//!
//! All run state lives in an explicitly constructed struct owned by the
//! session, with the history append-only and the bounds only ever
//! narrowing. There are no ambient globals, so multiple sessions can run
//! side by side.

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::config::{Config, INITIAL_MULTIPLIER};
use crate::types::AttemptRecord;

/// The current feasible interval for the optimal multiplier.
///
/// `low` only increases and `high` only decreases across a run; the search
/// interval never widens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound of the feasible interval.
    pub low: f64,
    /// Upper bound of the feasible interval.
    pub high: f64,
}

impl Bounds {
    /// The full search domain from the configuration.
    pub fn full_domain(config: &Config) -> Self {
        Self {
            low: config.mult_min,
            high: config.mult_max,
        }
    }

    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Whether a value lies inside the interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// One completed round: the raw record, its analysis, and the multiplier
/// that was in effect while the attempt was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Raw telemetry for the attempt.
    pub record: AttemptRecord,

    /// Classified movement pattern.
    pub analysis: Analysis,

    /// Multiplier in effect during the attempt (before any adjustment this
    /// round produced). This is the series the convergence check reads.
    pub multiplier: f64,
}

/// Mutable state for one calibration run.
///
/// Exclusively owned by the session; lifecycle is one run. Invariants held
/// between calls: `bounds.low <= multiplier <= bounds.high`, and
/// `history.len() == round as usize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Count of completed attempts.
    pub round: u32,

    /// Current working estimate, frozen once the run completes.
    pub multiplier: f64,

    /// Current feasible interval for the optimum.
    pub bounds: Bounds,

    /// Append-only record of every completed round.
    pub history: Vec<RoundEntry>,
}

impl CalibrationState {
    /// Fresh state over the configured search domain, starting from the
    /// logical "no adjustment" multiplier of 1.0.
    pub fn new(config: &Config) -> Self {
        Self {
            round: 0,
            multiplier: INITIAL_MULTIPLIER,
            bounds: Bounds::full_domain(config),
            history: Vec::new(),
        }
    }

    /// Record a completed round.
    ///
    /// Captures the multiplier currently in effect; callers append before
    /// any adjustment so the stored series reflects what the user actually
    /// played the round at.
    pub fn push_round(&mut self, record: AttemptRecord, analysis: Analysis) {
        self.round += 1;
        self.history.push(RoundEntry {
            record,
            analysis,
            multiplier: self.multiplier,
        });
        debug_assert_eq!(self.history.len(), self.round as usize);
    }

    /// The in-effect multipliers of the most recent `window` rounds.
    ///
    /// Returns an empty slice when fewer than `window` rounds exist: the
    /// convergence check needs a full window before it can say anything.
    pub fn recent_multipliers(&self, window: usize) -> Vec<f64> {
        if window == 0 || self.history.len() < window {
            return Vec::new();
        }
        self.history[self.history.len() - window..]
            .iter()
            .map(|entry| entry.multiplier)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::types::AttemptOutcome;

    fn dummy_record(multiplier: f64) -> AttemptRecord {
        AttemptRecord::new(vec![], AttemptOutcome::Hit, 5.0, 300.0, multiplier)
    }

    fn push(state: &mut CalibrationState, config: &Config) {
        let record = dummy_record(state.multiplier);
        let analysis = analyze(&record, &config.thresholds);
        state.push_round(record, analysis);
    }

    #[test]
    fn test_new_state() {
        let config = Config::default();
        let state = CalibrationState::new(&config);
        assert_eq!(state.round, 0);
        assert_eq!(state.multiplier, 1.0);
        assert_eq!(state.bounds, Bounds { low: 0.2, high: 5.0 });
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_push_round_keeps_count_in_sync() {
        let config = Config::default();
        let mut state = CalibrationState::new(&config);
        for _ in 0..4 {
            push(&mut state, &config);
        }
        assert_eq!(state.round, 4);
        assert_eq!(state.history.len(), 4);
    }

    #[test]
    fn test_push_round_captures_in_effect_multiplier() {
        let config = Config::default();
        let mut state = CalibrationState::new(&config);
        push(&mut state, &config);
        state.multiplier = 0.68;
        push(&mut state, &config);

        assert_eq!(state.history[0].multiplier, 1.0);
        assert_eq!(state.history[1].multiplier, 0.68);
    }

    #[test]
    fn test_recent_multipliers_requires_full_window() {
        let config = Config::default();
        let mut state = CalibrationState::new(&config);
        for _ in 0..3 {
            push(&mut state, &config);
        }
        assert!(state.recent_multipliers(5).is_empty());
        assert_eq!(state.recent_multipliers(3), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_bounds_helpers() {
        let bounds = Bounds { low: 0.5, high: 2.0 };
        assert_eq!(bounds.width(), 1.5);
        assert!(bounds.contains(0.5));
        assert!(bounds.contains(2.0));
        assert!(!bounds.contains(2.01));
    }
}
