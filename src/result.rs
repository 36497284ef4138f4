//! Result summary emitted to the presentation layer.
//!
//! Everything here is unit-agnostic: the final multiplier is a pure gain
//! factor. Converting it into an application's sensitivity units (which
//! needs an external parameter such as pointer resolution) is strictly the
//! presentation layer's job.

use serde::{Deserialize, Serialize};

use crate::adaptive::RoundEntry;
use crate::analysis::AttemptClass;

/// One point of the per-round multiplier trace, for charting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// 1-based round number.
    pub round: u32,

    /// Multiplier in effect during that round.
    pub multiplier: f64,
}

/// Aggregate statistics over a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Total attempts recorded.
    pub total_attempts: u32,

    /// Attempts that hit the target.
    pub hits: u32,

    /// Attempts that clicked but missed.
    pub misses: u32,

    /// Attempts that ran out of time.
    pub timeouts: u32,

    /// Hit percentage over all attempts, rounded to the nearest whole
    /// percent. Zero for an empty run.
    pub accuracy_pct: f64,

    /// Mean reaction time in milliseconds over non-timed-out attempts.
    /// Zero when every attempt timed out or the run is empty.
    pub avg_reaction_ms: f64,

    /// Rounds classified as overshoot.
    pub overshoots: u32,

    /// Rounds classified as undershoot.
    pub undershoots: u32,

    /// Rounds classified as neutral.
    pub neutrals: u32,
}

/// Outcome of a completed calibration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// The final calibrated multiplier.
    pub multiplier: f64,

    /// Whether the run stopped by stabilizing (as opposed to exhausting
    /// its round budget).
    pub converged: bool,

    /// Total rounds played.
    pub total_rounds: u32,

    /// Aggregate statistics over the run.
    pub stats: AggregateStats,

    /// Per-round `(round, multiplier)` trace.
    pub trace: Vec<TracePoint>,
}

impl ResultSummary {
    /// Reduce a round history into a summary.
    ///
    /// Pure over its inputs, so repeated calls over the same history yield
    /// identical summaries. An empty history produces zeroed aggregates
    /// rather than failing.
    pub(crate) fn from_history(history: &[RoundEntry], multiplier: f64, converged: bool) -> Self {
        let total = history.len() as u32;

        let mut hits = 0u32;
        let mut misses = 0u32;
        let mut timeouts = 0u32;
        let mut overshoots = 0u32;
        let mut undershoots = 0u32;
        let mut neutrals = 0u32;
        let mut reaction_sum = 0.0;
        let mut reaction_count = 0u32;

        for entry in history {
            if entry.record.timed_out() {
                timeouts += 1;
            } else {
                if entry.record.is_hit() {
                    hits += 1;
                } else {
                    misses += 1;
                }
                reaction_sum += entry.record.reaction_time_ms;
                reaction_count += 1;
            }

            match entry.analysis.class {
                AttemptClass::Overshoot => overshoots += 1,
                AttemptClass::Undershoot => undershoots += 1,
                AttemptClass::Neutral => neutrals += 1,
            }
        }

        let accuracy_pct = if total > 0 {
            (f64::from(hits) / f64::from(total) * 100.0).round()
        } else {
            0.0
        };
        let avg_reaction_ms = if reaction_count > 0 {
            reaction_sum / f64::from(reaction_count)
        } else {
            0.0
        };

        let trace = history
            .iter()
            .enumerate()
            .map(|(i, entry)| TracePoint {
                round: i as u32 + 1,
                multiplier: entry.multiplier,
            })
            .collect();

        Self {
            multiplier,
            converged,
            total_rounds: total,
            stats: AggregateStats {
                total_attempts: total,
                hits,
                misses,
                timeouts,
                accuracy_pct,
                avg_reaction_ms,
                overshoots,
                undershoots,
                neutrals,
            },
            trace,
        }
    }
}
