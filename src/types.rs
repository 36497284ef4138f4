//! Shared data types for attempt telemetry.
//!
//! An [`AttemptRecord`] is produced by the interactive environment once per
//! target engagement and handed to the calibration session. The core treats
//! the proximity metric opaquely: it is any non-negative scalar distance to
//! the target center where smaller means closer, whether measured in screen
//! pixels or radians of view rotation.

use serde::{Deserialize, Serialize};

/// One proximity measurement taken during an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximitySample {
    /// Monotonic timestamp in milliseconds, relative to target appearance.
    pub t_ms: f64,

    /// Proximity to the target center. Non-negative; smaller is closer.
    pub distance: f64,
}

impl ProximitySample {
    /// Create a sample at the given time and distance.
    pub fn new(t_ms: f64, distance: f64) -> Self {
        Self { t_ms, distance }
    }
}

/// How an attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptOutcome {
    /// The target was clicked within its hit radius.
    Hit,
    /// The user clicked but missed the target.
    Miss,
    /// The per-target time limit expired without a click.
    TimedOut,
}

/// Telemetry for a single completed target engagement.
///
/// Produced externally, immutable once created. The trail may be empty or
/// very short for a trivially fast hit; the analyzer degrades gracefully in
/// that case rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Ordered proximity samples recorded at input-sampling granularity.
    pub trail: Vec<ProximitySample>,

    /// How the attempt resolved.
    pub outcome: AttemptOutcome,

    /// Proximity at the moment of resolution (click or timeout).
    pub final_distance: f64,

    /// Elapsed time from target appearance to resolution, in milliseconds.
    ///
    /// For [`AttemptOutcome::TimedOut`] this is the configured attempt time
    /// limit.
    pub reaction_time_ms: f64,

    /// The multiplier in effect when this attempt occurred.
    ///
    /// Recorded for the historical trace; the analyzer never reads it.
    pub multiplier_at_attempt: f64,
}

impl AttemptRecord {
    /// Create a record from raw telemetry.
    pub fn new(
        trail: Vec<ProximitySample>,
        outcome: AttemptOutcome,
        final_distance: f64,
        reaction_time_ms: f64,
        multiplier_at_attempt: f64,
    ) -> Self {
        Self {
            trail,
            outcome,
            final_distance,
            reaction_time_ms,
            multiplier_at_attempt,
        }
    }

    /// Whether this attempt ended by timeout.
    pub fn timed_out(&self) -> bool {
        self.outcome == AttemptOutcome::TimedOut
    }

    /// Whether this attempt hit the target.
    pub fn is_hit(&self) -> bool {
        self.outcome == AttemptOutcome::Hit
    }
}
