use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const EMPTY_CELL: &str = "—";

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn format_date_with(raw: Option<&str>, pattern: &str) -> String {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => EMPTY_CELL.to_string(),
        Some(value) => parse_date(value)
            .map(|date| date.format(pattern).to_string())
            .unwrap_or_else(|| value.to_string()),
    }
}

/// `Jan 5`
pub fn format_short_date(raw: Option<&str>) -> String {
    format_date_with(raw, "%b %-d")
}

/// `Jan 5, 2026`
pub fn format_long_date(raw: Option<&str>) -> String {
    format_date_with(raw, "%b %-d, %Y")
}

/// `value / total` as a whole percentage, 0 when there is nothing to divide by.
pub fn percent_of(value: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((value as f64 / total as f64) * 100.0).round() as u32
}

pub fn rounded_average(sum: u64, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u32
}

/// Scores are whole numbers in practice; keep the fraction only when present.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

pub fn write_json_stdout<T: Serialize>(value: &T) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, value).context("failed to serialize json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_dates_accept_plain_and_rfc3339_inputs() {
        assert_eq!(format_short_date(Some("2026-01-05")), "Jan 5");
        assert_eq!(format_short_date(Some("2026-03-14T18:00:00Z")), "Mar 14");
        assert_eq!(format_long_date(Some("2026-01-12T09:30:00+02:00")), "Jan 12, 2026");
        assert_eq!(format_long_date(Some("2026-11-30T23:59:59")), "Nov 30, 2026");
    }

    #[test]
    fn missing_or_unparseable_dates_fall_back() {
        assert_eq!(format_short_date(None), EMPTY_CELL);
        assert_eq!(format_short_date(Some("  ")), EMPTY_CELL);
        assert_eq!(format_long_date(Some("last week")), "last week");
    }

    #[test]
    fn percentages_round_and_tolerate_empty_totals() {
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(1, 2), 50);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(rounded_average(150, 0), 0);
        assert_eq!(rounded_average(250, 3), 83);
    }

    #[test]
    fn scores_drop_trailing_zero_fraction() {
        assert_eq!(format_score(92.0), "92");
        assert_eq!(format_score(87.5), "87.5");
    }
}
