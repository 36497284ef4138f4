//! The attempt analyzer: trajectory to overshoot/undershoot/neutral.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::types::{AttemptRecord, ProximitySample};

/// Severe undershoot: timed out while still far from the target.
const SCORE_NO_APPROACH: i32 = -3;

/// Plain undershoot: timed out mid-approach, or never closed in.
const SCORE_UNDERSHOOT: i32 = -2;

/// Overshoot scores are capped here; beyond five passes the signal
/// saturates.
const SCORE_CAP: u32 = 5;

/// Coarse movement-pattern class for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptClass {
    /// Aim swept past the target repeatedly; gain too high.
    Overshoot,
    /// Aim failed to close in, or the attempt timed out; gain too low.
    Undershoot,
    /// No actionable signal.
    Neutral,
}

/// Classified movement pattern derived from one [`AttemptRecord`].
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Overall class of the attempt.
    pub class: AttemptClass,

    /// Number of overshoot events detected in the trail.
    pub overshoots: u32,

    /// Number of correction events (re-approach after an overshoot).
    pub corrections: u32,

    /// Signed severity in roughly [-3, 5]: positive is overshoot severity,
    /// negative is undershoot severity, zero is neutral.
    pub score: i32,

    /// Minimum proximity observed in the trail, or the final distance when
    /// the trail carries too little data.
    pub closest_distance: f64,
}

impl Analysis {
    fn neutral(closest_distance: f64) -> Self {
        Self {
            class: AttemptClass::Neutral,
            overshoots: 0,
            corrections: 0,
            score: 0,
            closest_distance,
        }
    }
}

/// Classify one attempt record.
///
/// Pure and total: degenerate inputs (empty or near-empty trails) fall
/// through to [`AttemptClass::Neutral`] rather than failing, so attempts
/// with too little information never bias the estimate.
pub fn analyze(record: &AttemptRecord, thresholds: &Thresholds) -> Analysis {
    if record.timed_out() {
        return analyze_timeout(record, thresholds);
    }

    let trail = &record.trail;
    if trail.len() < 3 {
        // Typically an unrealistically fast hit; no direction change to read.
        return Analysis::neutral(min_trail_distance(trail).unwrap_or(record.final_distance));
    }

    let mut overshoots = 0u32;
    let mut corrections = 0u32;
    let mut closest = trail[0].distance;
    let mut passed_target = false;

    for pair in trail.windows(2) {
        let prev = pair[0].distance;
        let curr = pair[1].distance;

        if curr < closest {
            closest = curr;
        }

        // Proximity turning from decreasing to increasing at close range:
        // the cursor swept past the target. Counted once per pass.
        if prev < curr && prev < thresholds.overshoot && !passed_target {
            overshoots += 1;
            passed_target = true;
        }

        // Turning back toward the target clears the pass flag.
        if prev > curr && passed_target {
            corrections += 1;
            passed_target = false;
        }
    }

    let score = if overshoots >= thresholds.overshoot_flag_count {
        overshoots.min(SCORE_CAP) as i32
    } else if corrections == 0 && record.final_distance > thresholds.undershoot {
        SCORE_UNDERSHOOT
    } else {
        0
    };

    let class = match score {
        s if s > 0 => AttemptClass::Overshoot,
        s if s < 0 => AttemptClass::Undershoot,
        _ => AttemptClass::Neutral,
    };

    Analysis {
        class,
        overshoots,
        corrections,
        score,
        closest_distance: closest,
    }
}

/// A timeout is always an undershoot: the user never got close enough in
/// time. The last trail sample distinguishes "still far away" (-3) from
/// "was approaching but ran out of time" (-2).
fn analyze_timeout(record: &AttemptRecord, thresholds: &Thresholds) -> Analysis {
    let trail = &record.trail;

    let (score, closest_distance) = if trail.len() >= 2 {
        let last = trail[trail.len() - 1].distance;
        let score = if last > thresholds.approach {
            SCORE_NO_APPROACH
        } else {
            SCORE_UNDERSHOOT
        };
        // min_trail_distance is Some for any non-empty trail
        let closest = min_trail_distance(trail).unwrap_or(record.final_distance);
        (score, closest)
    } else {
        (SCORE_UNDERSHOOT, record.final_distance)
    };

    Analysis {
        class: AttemptClass::Undershoot,
        overshoots: 0,
        corrections: 0,
        score,
        closest_distance,
    }
}

fn min_trail_distance(trail: &[ProximitySample]) -> Option<f64> {
    trail
        .iter()
        .map(|s| s.distance)
        .fold(None, |acc, d| match acc {
            Some(m) if m <= d => Some(m),
            _ => Some(d),
        })
}
