//! The calibration session: orchestrates analyze, adjust, and stop checks.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adaptive::{adjust, check_completion, CalibrationState, Completion};
use crate::analysis::{analyze, Analysis};
use crate::config::{Config, ConfigError};
use crate::result::ResultSummary;
use crate::types::AttemptRecord;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Constructed or reset; no attempt submitted yet.
    Idle,
    /// At least one attempt submitted, not yet complete.
    Running,
    /// Terminal: the multiplier is frozen and no further attempts are
    /// accepted until `reset`.
    Complete,
}

/// What the environment gets back after each submitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// The multiplier to apply to all subsequent raw pointer input.
    ///
    /// Unchanged from the attempt's multiplier when the round was neutral
    /// or the session just completed.
    pub next_multiplier: f64,

    /// Number of completed rounds, including this one.
    pub round: u32,

    /// Classification of the submitted attempt.
    pub analysis: Analysis,

    /// The session is over; stop requesting attempts.
    pub complete: bool,

    /// The session stopped because the estimate stabilized.
    pub converged: bool,
}

/// Misuse of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `finalize` was called before the session completed.
    NotComplete,
    /// `submit_attempt` was called on a completed session.
    SessionComplete,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotComplete => {
                write!(f, "session has not completed; keep submitting attempts")
            }
            Self::SessionComplete => {
                write!(f, "session already completed; no further attempts accepted")
            }
        }
    }
}

impl Error for SessionError {}

/// One calibration run: owns the state, drives the round loop.
///
/// The environment submits one [`AttemptRecord`] per target engagement and
/// applies the returned multiplier to subsequent pointer input until the
/// report says the run is complete, then reads the [`ResultSummary`].
///
/// Single-threaded and synchronous by design: no I/O, no background work,
/// no suspension points. Abandoning a run is just dropping the session.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    config: Config,
    state: CalibrationState,
    phase: Phase,
    converged: bool,
}

impl CalibrationSession {
    /// Create a session, refusing inconsistent configurations up front.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = CalibrationState::new(&config);
        Ok(Self {
            config,
            state,
            phase: Phase::Idle,
            converged: false,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current working multiplier.
    pub fn multiplier(&self) -> f64 {
        self.state.multiplier
    }

    /// Number of completed rounds.
    pub fn round(&self) -> u32 {
        self.state.round
    }

    /// The configuration this session runs under.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the run state, for inspection and charting.
    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// Process one completed attempt.
    ///
    /// Appends the record to history, classifies it, checks for
    /// completion, and, only if the run continues, advances the
    /// multiplier by damped bisection. Returns an error once the session
    /// has completed; the multiplier is frozen from that point on.
    pub fn submit_attempt(&mut self, record: AttemptRecord) -> Result<RoundReport, SessionError> {
        if self.phase == Phase::Complete {
            return Err(SessionError::SessionComplete);
        }
        self.phase = Phase::Running;

        let analysis = analyze(&record, &self.config.thresholds);
        self.state.push_round(record, analysis.clone());

        let Completion { complete, converged } = check_completion(&self.state, &self.config);

        if complete {
            self.phase = Phase::Complete;
            self.converged = converged;
        } else {
            let (next, bounds) = adjust(
                &analysis,
                self.state.multiplier,
                self.state.bounds,
                self.state.round,
                &self.config,
            );
            self.state.multiplier = next;
            self.state.bounds = bounds;
        }

        Ok(RoundReport {
            next_multiplier: self.state.multiplier,
            round: self.state.round,
            analysis,
            complete,
            converged,
        })
    }

    /// Aggregate the run into a [`ResultSummary`].
    ///
    /// Only valid once a submitted attempt has reported completion;
    /// calling earlier is a precondition violation. Idempotent: repeated
    /// calls return identical summaries.
    pub fn finalize(&self) -> Result<ResultSummary, SessionError> {
        if self.phase != Phase::Complete {
            return Err(SessionError::NotComplete);
        }
        Ok(ResultSummary::from_history(
            &self.state.history,
            self.state.multiplier,
            self.converged,
        ))
    }

    /// Discard all progress and return to `Idle` with fresh state.
    pub fn reset(&mut self) {
        self.state = CalibrationState::new(&self.config);
        self.phase = Phase::Idle;
        self.converged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerminationPolicy;
    use crate::types::{AttemptOutcome, ProximitySample};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn trail(distances: &[f64]) -> Vec<ProximitySample> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &d)| ProximitySample::new(i as f64 * 8.0, d))
            .collect()
    }

    /// A clean hit with a short trail: always classified neutral.
    fn neutral_record(multiplier: f64) -> AttemptRecord {
        AttemptRecord::new(
            trail(&[150.0, 20.0]),
            AttemptOutcome::Hit,
            10.0,
            350.0,
            multiplier,
        )
    }

    /// Two uncorrected close-range passes: classified overshoot.
    fn overshoot_record(multiplier: f64) -> AttemptRecord {
        AttemptRecord::new(
            trail(&[200.0, 70.0, 110.0, 50.0, 95.0]),
            AttemptOutcome::Miss,
            95.0,
            600.0,
            multiplier,
        )
    }

    /// A timeout far from the target: classified undershoot.
    fn undershoot_record(multiplier: f64) -> AttemptRecord {
        AttemptRecord::new(
            trail(&[400.0, 320.0, 260.0]),
            AttemptOutcome::TimedOut,
            260.0,
            1000.0,
            multiplier,
        )
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = Config::new().policy(TerminationPolicy::Adaptive {
            min_rounds: 40,
            max_rounds: 30,
            stable_window: 5,
            stable_threshold: 0.08,
        });
        assert!(CalibrationSession::new(config).is_err());
    }

    #[test]
    fn test_first_overshoot_round() {
        let mut session = CalibrationSession::new(Config::default()).unwrap();
        assert_eq!(session.phase(), Phase::Idle);

        let report = session.submit_attempt(overshoot_record(1.0)).unwrap();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(report.round, 1);
        assert!(!report.complete);
        // 1.0 - (1.0 - 0.2) * 0.4 * (1 - 0.7/30) rounds to 0.69.
        assert_eq!(report.next_multiplier, 0.69);
        assert_eq!(session.state().bounds.high, 1.0);
    }

    #[test]
    fn test_neutral_rounds_converge_at_min_rounds() {
        let mut session = CalibrationSession::new(Config::default()).unwrap();

        // Neutral rounds never move the multiplier, so the window is
        // perfectly stable the moment min_rounds is reached.
        for round in 1..=9 {
            let report = session.submit_attempt(neutral_record(1.0)).unwrap();
            assert!(!report.complete, "completed early at round {round}");
            assert_eq!(report.next_multiplier, 1.0);
        }

        let report = session.submit_attempt(neutral_record(1.0)).unwrap();
        assert!(report.complete);
        assert!(report.converged);
        assert_eq!(report.round, 10);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_forced_stop_without_convergence() {
        // Round budget equals min_rounds, and an overshoot late in the
        // window keeps the recent multipliers spread wider than the
        // stability threshold: the run ends on budget, not by converging.
        let config = Config::new().policy(TerminationPolicy::Adaptive {
            min_rounds: 10,
            max_rounds: 10,
            stable_window: 5,
            stable_threshold: 0.08,
        });
        let mut session = CalibrationSession::new(config).unwrap();

        let mut last = None;
        for round in 1..=10 {
            let mult = session.multiplier();
            let record = if round == 7 {
                overshoot_record(mult)
            } else {
                neutral_record(mult)
            };
            last = Some(session.submit_attempt(record).unwrap());
        }

        let report = last.unwrap();
        assert!(report.complete);
        assert!(!report.converged);
        assert_eq!(report.round, 10);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_submit_after_complete_is_rejected() {
        let mut session = CalibrationSession::new(Config::fixed_length(2)).unwrap();
        session.submit_attempt(neutral_record(1.0)).unwrap();
        let report = session.submit_attempt(neutral_record(1.0)).unwrap();
        assert!(report.complete);

        let frozen = session.multiplier();
        assert_eq!(
            session.submit_attempt(overshoot_record(frozen)),
            Err(SessionError::SessionComplete)
        );
        assert_eq!(session.multiplier(), frozen);
        assert_eq!(session.round(), 2);
    }

    #[test]
    fn test_finalize_before_complete_is_an_error() {
        let mut session = CalibrationSession::new(Config::default()).unwrap();
        assert_eq!(session.finalize(), Err(SessionError::NotComplete));

        session.submit_attempt(neutral_record(1.0)).unwrap();
        assert_eq!(session.finalize(), Err(SessionError::NotComplete));
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut session = CalibrationSession::new(Config::fixed_length(3)).unwrap();
        session.submit_attempt(overshoot_record(1.0)).unwrap();
        let next = session.multiplier();
        session.submit_attempt(undershoot_record(next)).unwrap();
        session.submit_attempt(neutral_record(session.multiplier())).unwrap();

        let first = session.finalize().unwrap();
        let second = session.finalize().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total_rounds, 3);
        assert_eq!(first.multiplier, session.multiplier());
    }

    #[test]
    fn test_summary_trace_records_in_effect_multipliers() {
        let mut session = CalibrationSession::new(Config::fixed_length(2)).unwrap();
        session.submit_attempt(overshoot_record(1.0)).unwrap();
        session.submit_attempt(neutral_record(session.multiplier())).unwrap();

        let summary = session.finalize().unwrap();
        assert_eq!(summary.trace[0].multiplier, 1.0);
        // Round 2 was played at the adjusted multiplier.
        assert!(summary.trace[1].multiplier < 1.0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = CalibrationSession::new(Config::fixed_length(1)).unwrap();
        session.submit_attempt(neutral_record(1.0)).unwrap();
        assert_eq!(session.phase(), Phase::Complete);

        session.reset();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.round(), 0);
        assert_eq!(session.multiplier(), 1.0);
        assert!(session.state().history.is_empty());
    }

    #[test]
    fn test_invariants_hold_under_random_outcomes() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let config = Config::default();

        for _ in 0..50 {
            let mut session = CalibrationSession::new(config.clone()).unwrap();
            let mut prev_low = config.mult_min;
            let mut prev_high = config.mult_max;

            loop {
                let mult = session.multiplier();
                let record = match rng.gen_range(0..3) {
                    0 => overshoot_record(mult),
                    1 => undershoot_record(mult),
                    _ => neutral_record(mult),
                };
                let report = session.submit_attempt(record).unwrap();

                let state = session.state();
                let bounds = state.bounds;
                assert!(bounds.low <= state.multiplier && state.multiplier <= bounds.high);
                assert!(state.multiplier >= config.mult_min);
                assert!(state.multiplier <= config.mult_max);
                // The interval never widens.
                assert!(bounds.low >= prev_low);
                assert!(bounds.high <= prev_high);
                prev_low = bounds.low;
                prev_high = bounds.high;

                assert_eq!(state.history.len(), state.round as usize);

                if report.complete {
                    break;
                }
                assert!(report.round < config.policy.max_rounds());
            }

            let summary = session.finalize().unwrap();
            assert_eq!(summary.total_rounds, session.round());
        }
    }

    #[test]
    fn test_simulated_shooter_converges_toward_optimum() {
        // Synthetic shooter whose behavior depends on the gain relative to
        // a true optimum: too-high gain overshoots, too-low undershoots,
        // close-enough gain produces clean hits.
        let optimum = 0.75;
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = CalibrationSession::new(Config::default()).unwrap();

        let summary = loop {
            let mult = session.multiplier();
            let noise = rng.gen_range(-0.05..0.05);
            let error = mult - optimum + noise;
            let record = if error > 0.1 {
                overshoot_record(mult)
            } else if error < -0.1 {
                undershoot_record(mult)
            } else {
                neutral_record(mult)
            };
            let report = session.submit_attempt(record).unwrap();
            if report.complete {
                break session.finalize().unwrap();
            }
        };

        assert!(
            (summary.multiplier - optimum).abs() < 0.3,
            "final multiplier {} strayed from optimum {optimum}",
            summary.multiplier
        );
        assert!(summary.total_rounds <= 30);
    }
}
