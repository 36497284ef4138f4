//! # aim-calibrator
//!
//! Estimate a user's aim-control multiplier from target-acquisition
//! telemetry, without ever asking them to self-report a sensitivity value.
//!
//! The estimator is a round-by-round feedback loop over a single scalar:
//! each attempt's mouse trajectory is classified as overshoot, undershoot,
//! or neutral, a bounded search interval is narrowed by damped bisection,
//! and the run stops once the recent estimates stabilize (or a round budget
//! runs out). The final multiplier is a pure gain factor; converting it to
//! an application's sensitivity units is the caller's job.
//!
//! ## Quick Start
//!
//! ```ignore
//! use aim_calibrator::{AttemptRecord, CalibrationSession, Config};
//!
//! let mut session = CalibrationSession::new(Config::default())?;
//!
//! loop {
//!     // The environment runs one target engagement at the current
//!     // multiplier and reports its telemetry.
//!     let record: AttemptRecord = run_attempt(session.multiplier());
//!     let report = session.submit_attempt(record)?;
//!     if report.complete {
//!         break;
//!     }
//!     apply_sensitivity(report.next_multiplier);
//! }
//!
//! let summary = session.finalize()?;
//! println!("{}", aim_calibrator::output::format_summary(&summary));
//! ```
//!
//! ## Telemetry contract
//!
//! The environment submits one [`AttemptRecord`] per completed target
//! engagement, applies the returned multiplier to all subsequent raw
//! pointer input, and stops requesting attempts once a report says the run
//! is complete. The proximity metric in the trail is opaque to the core:
//! screen pixels and angular deviation both work, as long as the analyzer
//! thresholds are tuned to the same scale (see [`Thresholds`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod result;
mod session;
mod types;

// Functional modules
pub mod adaptive;
pub mod analysis;
pub mod output;

// Re-exports for public API
pub use adaptive::{Bounds, CalibrationState, Completion, RoundEntry};
pub use analysis::{analyze, Analysis, AttemptClass};
pub use config::{Config, ConfigError, TerminationPolicy, Thresholds, INITIAL_MULTIPLIER};
pub use result::{AggregateStats, ResultSummary, TracePoint};
pub use session::{CalibrationSession, Phase, RoundReport, SessionError};
pub use types::{AttemptOutcome, AttemptRecord, ProximitySample};
