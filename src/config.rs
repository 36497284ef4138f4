//! Configuration for the adaptive calibration estimator.
//!
//! All numeric knobs of the estimator live here: the round policy, the
//! multiplier search domain, the bisection step parameters, and the
//! proximity thresholds used by the attempt analyzer. Thresholds are tuned
//! per proximity unit (screen pixels vs. radians) and should be treated as
//! tunable constants, not validated ones.

use std::error::Error;
use std::fmt;

/// Default minimum rounds before convergence may be declared.
const DEFAULT_MIN_ROUNDS: u32 = 10;

/// Default maximum rounds before forced termination.
const DEFAULT_MAX_ROUNDS: u32 = 30;

/// Default size of the recent-multiplier window used for convergence.
const DEFAULT_STABLE_WINDOW: u32 = 5;

/// Default maximum spread of the recent-multiplier window for convergence.
const DEFAULT_STABLE_THRESHOLD: f64 = 0.08;

/// Default lower edge of the multiplier search domain.
const DEFAULT_MULT_MIN: f64 = 0.2;

/// Default upper edge of the multiplier search domain.
const DEFAULT_MULT_MAX: f64 = 5.0;

/// The multiplier every session starts from: the "no adjustment" point.
pub const INITIAL_MULTIPLIER: f64 = 1.0;

/// Proximity thresholds used by the attempt analyzer.
///
/// These are scale-dependent: a threshold of 80 makes sense for screen-pixel
/// proximity but not for radians. Use the unit presets and tune from there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Timed-out attempts whose last trail sample is farther than this are
    /// scored as severe undershoot (-3): no real approach was detected.
    pub approach: f64,

    /// An overshoot event is only counted when the cursor turns away from
    /// the target while closer than this.
    pub overshoot: f64,

    /// A correction-free attempt resolving farther than this is scored as
    /// undershoot (-2).
    pub undershoot: f64,

    /// Minimum overshoot events before an attempt is classified overshoot.
    ///
    /// A single overshoot is normal aim behavior (slight correction near
    /// the target); the default of 2 only flags repeated overshooting.
    /// Lower to 1 for a classifier that reacts to every pass.
    pub overshoot_flag_count: u32,
}

impl Thresholds {
    /// Thresholds tuned for screen-pixel proximity.
    pub fn screen_pixels() -> Self {
        Self {
            approach: 50.0,
            overshoot: 80.0,
            undershoot: 30.0,
            overshoot_flag_count: 2,
        }
    }

    /// Thresholds tuned for angular proximity in radians.
    ///
    /// Scaled from the pixel preset assuming roughly 1000 px of screen
    /// travel per radian of view rotation.
    pub fn angular() -> Self {
        Self {
            approach: 0.05,
            overshoot: 0.08,
            undershoot: 0.03,
            overshoot_flag_count: 2,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::screen_pixels()
    }
}

/// When a calibration run stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminationPolicy {
    /// Stop early once the recent multiplier window stabilizes, or at
    /// `max_rounds` if it never does.
    Adaptive {
        /// Minimum rounds before convergence may be declared.
        min_rounds: u32,
        /// Hard round cap; reaching it forces termination.
        max_rounds: u32,
        /// Number of recent rounds inspected for stability.
        stable_window: u32,
        /// Maximum `max - min` spread of in-effect multipliers over the
        /// window for the run to count as converged.
        stable_threshold: f64,
    },

    /// Run exactly this many rounds with no early stop.
    FixedLength {
        /// Total rounds to run.
        total_rounds: u32,
    },
}

impl TerminationPolicy {
    /// The round horizon used for damping progress and forced termination.
    pub fn max_rounds(&self) -> u32 {
        match *self {
            Self::Adaptive { max_rounds, .. } => max_rounds,
            Self::FixedLength { total_rounds } => total_rounds,
        }
    }
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self::Adaptive {
            min_rounds: DEFAULT_MIN_ROUNDS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            stable_window: DEFAULT_STABLE_WINDOW,
            stable_threshold: DEFAULT_STABLE_THRESHOLD,
        }
    }
}

/// Configuration options for a calibration session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Termination policy: adaptive convergence or fixed round count.
    pub policy: TerminationPolicy,

    /// Lower edge of the global multiplier domain. Must be positive.
    pub mult_min: f64,

    /// Upper edge of the global multiplier domain.
    pub mult_max: f64,

    /// Analyzer proximity thresholds.
    pub thresholds: Thresholds,

    /// Fraction of the available half-interval taken per adjustment.
    ///
    /// Classic bisection would use 1.0 (jump to the interval edge); 0.4
    /// intentionally under-corrects so a single noisy attempt cannot cause
    /// violent oscillation.
    pub step_factor: f64,

    /// How much the step shrinks over the run's horizon.
    ///
    /// The damping factor applied to each step is
    /// `1 - damping_slope * round / max_rounds`, so a slope of 0.7 tapers
    /// adjustments from full size down to 0.3x by the final round.
    pub damping_slope: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: TerminationPolicy::default(),
            mult_min: DEFAULT_MULT_MIN,
            mult_max: DEFAULT_MULT_MAX,
            thresholds: Thresholds::screen_pixels(),
            step_factor: 0.4,
            damping_slope: 0.7,
        }
    }
}

impl Config {
    /// Create a configuration with default settings: adaptive termination
    /// and screen-pixel thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration for angular (radian) proximity telemetry.
    pub fn angular() -> Self {
        Self {
            thresholds: Thresholds::angular(),
            ..Default::default()
        }
    }

    /// Create a fixed-length configuration: exactly `total_rounds` rounds,
    /// no early stop.
    pub fn fixed_length(total_rounds: u32) -> Self {
        Self {
            policy: TerminationPolicy::FixedLength { total_rounds },
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the termination policy.
    pub fn policy(mut self, policy: TerminationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the multiplier search domain.
    pub fn multiplier_domain(mut self, min: f64, max: f64) -> Self {
        assert!(min > 0.0, "mult_min must be positive");
        assert!(min < max, "mult_min must be < mult_max");
        self.mult_min = min;
        self.mult_max = max;
        self
    }

    /// Set the analyzer thresholds.
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the bisection step factor.
    pub fn step_factor(mut self, factor: f64) -> Self {
        assert!(
            factor > 0.0 && factor <= 1.0,
            "step_factor must be in (0, 1]"
        );
        self.step_factor = factor;
        self
    }

    /// Set the damping slope.
    pub fn damping_slope(mut self, slope: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&slope),
            "damping_slope must be in [0, 1)"
        );
        self.damping_slope = slope;
        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check cross-field consistency.
    ///
    /// Called by `CalibrationSession::new`; an inconsistent configuration
    /// would run an unreachable termination policy, so it is fatal at
    /// construction rather than degraded at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mult_min > 0.0 && self.mult_min < self.mult_max) {
            return Err(ConfigError::InvalidDomain {
                min: self.mult_min,
                max: self.mult_max,
            });
        }
        if INITIAL_MULTIPLIER < self.mult_min || INITIAL_MULTIPLIER > self.mult_max {
            return Err(ConfigError::InitialOutOfDomain {
                min: self.mult_min,
                max: self.mult_max,
            });
        }
        if self.step_factor <= 0.0 || self.step_factor > 1.0 {
            return Err(ConfigError::InvalidStepFactor(self.step_factor));
        }
        if !(0.0..1.0).contains(&self.damping_slope) {
            return Err(ConfigError::InvalidDampingSlope(self.damping_slope));
        }

        match self.policy {
            TerminationPolicy::Adaptive {
                min_rounds,
                max_rounds,
                stable_window,
                stable_threshold,
            } => {
                if max_rounds == 0 || min_rounds > max_rounds {
                    return Err(ConfigError::RoundOrdering {
                        min_rounds,
                        max_rounds,
                    });
                }
                if stable_window == 0 || stable_window > max_rounds {
                    return Err(ConfigError::WindowTooLarge {
                        stable_window,
                        max_rounds,
                    });
                }
                if stable_threshold < 0.0 {
                    return Err(ConfigError::NegativeStableThreshold(stable_threshold));
                }
            }
            TerminationPolicy::FixedLength { total_rounds } => {
                if total_rounds == 0 {
                    return Err(ConfigError::EmptyRun);
                }
            }
        }

        Ok(())
    }
}

/// A configuration that cannot drive a coherent calibration run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The multiplier domain is empty or non-positive.
    InvalidDomain {
        /// Configured lower edge.
        min: f64,
        /// Configured upper edge.
        max: f64,
    },

    /// The fixed initial multiplier (1.0) lies outside the domain.
    InitialOutOfDomain {
        /// Configured lower edge.
        min: f64,
        /// Configured upper edge.
        max: f64,
    },

    /// The step factor is outside (0, 1].
    InvalidStepFactor(f64),

    /// The damping slope is outside [0, 1).
    InvalidDampingSlope(f64),

    /// `min_rounds` exceeds `max_rounds`, or `max_rounds` is zero.
    RoundOrdering {
        /// Configured minimum rounds.
        min_rounds: u32,
        /// Configured maximum rounds.
        max_rounds: u32,
    },

    /// The stability window is zero or larger than the round budget, so
    /// convergence could never be evaluated.
    WindowTooLarge {
        /// Configured window size.
        stable_window: u32,
        /// Configured maximum rounds.
        max_rounds: u32,
    },

    /// The stability threshold is negative.
    NegativeStableThreshold(f64),

    /// A fixed-length run of zero rounds.
    EmptyRun,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { min, max } => {
                write!(f, "multiplier domain [{min}, {max}] is invalid: need 0 < min < max")
            }
            Self::InitialOutOfDomain { min, max } => {
                write!(
                    f,
                    "initial multiplier {INITIAL_MULTIPLIER} lies outside domain [{min}, {max}]"
                )
            }
            Self::InvalidStepFactor(v) => write!(f, "step_factor {v} must be in (0, 1]"),
            Self::InvalidDampingSlope(v) => write!(f, "damping_slope {v} must be in [0, 1)"),
            Self::RoundOrdering {
                min_rounds,
                max_rounds,
            } => write!(
                f,
                "round policy is unreachable: min_rounds {min_rounds}, max_rounds {max_rounds}"
            ),
            Self::WindowTooLarge {
                stable_window,
                max_rounds,
            } => write!(
                f,
                "stable_window {stable_window} cannot be evaluated within max_rounds {max_rounds}"
            ),
            Self::NegativeStableThreshold(v) => {
                write!(f, "stable_threshold {v} must be non-negative")
            }
            Self::EmptyRun => write!(f, "fixed-length run must have at least one round"),
        }
    }
}

impl Error for ConfigError {}
