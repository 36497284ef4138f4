//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::ResultSummary;

/// Format a ResultSummary for human-readable terminal output.
///
/// Uses ANSI colors and Unicode box drawing. The output stays unit-agnostic:
/// the multiplier is shown as a raw gain factor, and any conversion to an
/// application's sensitivity units belongs to the caller.
pub fn format_summary(summary: &ResultSummary) -> String {
    let mut output = String::new();

    // Header: converged vs. round budget exhausted
    let header = if summary.converged {
        format!("{} {}", "\u{2713}".green().bold(), "CALIBRATED".green().bold())
    } else {
        format!(
            "{} {}",
            "\u{26A0}".yellow().bold(),
            "ROUND BUDGET EXHAUSTED".yellow().bold()
        )
    };

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&header));
    output.push_str(&format_box_separator());

    // Final multiplier
    let mult_str = format!("Multiplier: {:.2}x", summary.multiplier)
        .bold()
        .to_string();
    output.push_str(&format_box_line(&mult_str));

    // Round count
    let rounds_str = format!("Rounds: {}", summary.total_rounds);
    output.push_str(&format_box_line(&rounds_str));

    output.push_str(&format_box_separator());

    // Accuracy, colored by band
    let accuracy_str = format!("Accuracy: {:.0}%", summary.stats.accuracy_pct);
    let accuracy_colored = if summary.stats.accuracy_pct >= 70.0 {
        accuracy_str.green()
    } else if summary.stats.accuracy_pct >= 40.0 {
        accuracy_str.yellow()
    } else {
        accuracy_str.red()
    };
    output.push_str(&format_box_line(&accuracy_colored.to_string()));

    let hits_str = format!(
        "Hits: {}  Misses: {}  Timeouts: {}",
        summary.stats.hits, summary.stats.misses, summary.stats.timeouts
    );
    output.push_str(&format_box_line(&hits_str));

    let reaction_str = format!("Avg Reaction: {:.0} ms", summary.stats.avg_reaction_ms);
    output.push_str(&format_box_line(&reaction_str));

    let pattern_str = format!(
        "Overshoots: {}  Undershoots: {}",
        summary.stats.overshoots, summary.stats.undershoots
    );
    output.push_str(&format_box_line(&pattern_str));

    output.push_str(&format_box_bottom());

    if !summary.converged {
        output.push_str(&format!(
            "\n{}\n",
            "Note: the estimate did not stabilize within the round budget."
                .dimmed()
                .italic()
        ));
    }

    output
}

// Box drawing helpers

const BOX_WIDTH: usize = 48;

fn format_box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_line(content: &str) -> String {
    // Strip ANSI codes for length calculation
    let visible_len = strip_ansi_codes(content).chars().count();
    let padding = if visible_len < BOX_WIDTH - 2 {
        BOX_WIDTH - 2 - visible_len
    } else {
        0
    };
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(padding))
}

/// Strip ANSI escape codes for accurate length calculation.
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of ANSI sequence)
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{AggregateStats, TracePoint};

    fn make_summary(converged: bool) -> ResultSummary {
        ResultSummary {
            multiplier: 0.78,
            converged,
            total_rounds: 14,
            stats: AggregateStats {
                total_attempts: 14,
                hits: 10,
                misses: 2,
                timeouts: 2,
                accuracy_pct: 71.0,
                avg_reaction_ms: 482.0,
                overshoots: 3,
                undershoots: 4,
                neutrals: 7,
            },
            trace: vec![
                TracePoint { round: 1, multiplier: 1.0 },
                TracePoint { round: 2, multiplier: 0.69 },
            ],
        }
    }

    #[test]
    fn test_format_converged_summary() {
        let output = format_summary(&make_summary(true));
        assert!(output.contains("CALIBRATED"));
        assert!(output.contains("0.78x"));
        assert!(output.contains("71%"));
        assert!(output.contains("482 ms"));
    }

    #[test]
    fn test_format_forced_summary() {
        let output = format_summary(&make_summary(false));
        assert!(output.contains("ROUND BUDGET EXHAUSTED"));
        assert!(output.contains("did not stabilize"));
    }

    #[test]
    fn test_box_lines_have_constant_width() {
        let output = format_summary(&make_summary(true));
        for line in output.lines().filter(|l| l.starts_with('\u{2502}')) {
            assert_eq!(strip_ansi_codes(line).chars().count(), BOX_WIDTH + 2);
        }
    }

    #[test]
    fn test_strip_ansi_codes() {
        let colored = "\x1b[32mgreen\x1b[0m";
        assert_eq!(strip_ansi_codes(colored), "green");
    }
}
