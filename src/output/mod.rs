//! Human-readable rendering of calibration results.

mod terminal;

pub use terminal::format_summary;
