//! Plain-text rendering of a [`SummaryReport`].
//!
//! Output is written to any `io::Write` so the CLI can target stdout and the
//! tests a buffer.

use super::summary::SummaryReport;
use crate::types::MissingCount;
use std::io::{self, Write};

/// Print the missing-value table of the raw input.
pub fn write_missing_values(out: &mut impl Write, missing: &[MissingCount]) -> io::Result<()> {
    writeln!(out, "Missing values:")?;
    for entry in missing {
        writeln!(out, "  {:<24} {:>8}", entry.column, entry.missing)?;
    }
    writeln!(out)
}

/// Print every aggregate of the report, in the order the stages compute them.
pub fn write_summary(out: &mut impl Write, report: &SummaryReport) -> io::Result<()> {
    writeln!(out, "Average views: {}", format_optional(report.mean_views))?;
    writeln!(
        out,
        "Max likes: {} Min likes: {}",
        format_optional(report.max_likes),
        format_optional(report.min_likes)
    )?;
    writeln!(out)?;

    writeln!(out, "Video count by category:")?;
    for entry in &report.category_counts {
        writeln!(out, "  {:<24} {:>8}", entry.category, entry.count)?;
    }
    writeln!(out)?;

    writeln!(out, "Top videos by net subscribers:")?;
    writeln!(out, "  {:>5}  {:<40} {:>15}", "row", "title", "net_subscribers")?;
    for entry in &report.net_subscriber_ranking {
        writeln!(
            out,
            "  {:>5}  {:<40} {:>15}",
            entry.row,
            truncate_str(&entry.title, 40),
            entry.net_subscribers
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Average views per category:")?;
    for entry in &report.mean_views_by_category {
        writeln!(out, "  {:<24} {:>14.2}", entry.category, entry.mean_views)?;
    }
    writeln!(out)
}

/// Render an optional aggregate; an empty table has none.
fn format_optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| v.to_string())
}

/// Truncate a string to max characters with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
