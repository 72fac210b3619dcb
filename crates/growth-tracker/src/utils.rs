//! Shared utilities for the tracker.
//!
//! Small, pure helpers for header normalization, numeric and date parsing,
//! and the polars dtype checks used by several stages.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use polars::prelude::*;

// =============================================================================
// Header Utilities
// =============================================================================

/// Normalize a column header: trim, lowercase, spaces to underscores.
///
/// Inner runs of spaces are replaced one-for-one, so `"Watch  Time"` becomes
/// `"watch__time"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Parse a cell as a finite number.
///
/// Surrounding whitespace is ignored. Anything else that is not a plain
/// number (thousands separators, units, `NaN`, `inf`) yields `None`.
pub fn parse_numeric_value(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a spreadsheet float the way a person would type it.
///
/// Whole numbers lose their fractional part so that `100.0` and `100` in
/// the same column compare equal during deduplication.
pub fn format_float_cell(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Date Utilities
// =============================================================================

/// Day zero of the Excel 1900 date system (with the leap-year bug folded in).
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Highest serial Excel accepts (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Date formats accepted for the upload date, tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Time formats accepted after an ISO date.
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Convert an Excel serial day number to a calendar date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    excel_epoch().checked_add_days(chrono::Days::new(serial.floor() as u64))
}

/// Parse a free-form date cell, discarding any time of day.
///
/// Returns `None` for anything unrecognized; callers store that as null.
pub fn parse_date_value(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    if let Some((date_part, time_part)) = trimmed.split_once(['T', ' '])
        && let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        && TIME_FORMATS
            .iter()
            .any(|format| NaiveTime::parse_from_str(time_part.trim(), format).is_ok())
    {
        return Some(date);
    }

    parse_numeric_value(trimmed).and_then(excel_serial_to_date)
}

/// Days since the Unix epoch, the physical representation of a polars `Date`.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - NaiveDate::from_ymd_opt(1970, 1, 1).map_or(0, |d| d.num_days_from_ce())
}

/// Inverse of [`date_to_epoch_days`].
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days as i64))
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.str()?;
    let filled: Vec<String> = str_series
        .into_iter()
        .map(|opt| opt.unwrap_or(fill_value).to_string())
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Collect a string column as owned values, nulls included.
pub fn collect_strings(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.str()?;
    Ok(str_series
        .into_iter()
        .map(|opt| opt.map(|s| s.to_string()))
        .collect())
}

/// Collect a numeric column as `f64`, nulls included.
pub fn collect_f64(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().collect())
}

/// Collect a numeric column as `i64`, nulls included.
pub fn collect_i64(series: &Series) -> PolarsResult<Vec<Option<i64>>> {
    let casted = series.cast(&DataType::Int64)?;
    Ok(casted.i64()?.into_iter().collect())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Video ID "), "video_id");
        assert_eq!(normalize_column_name("CTR %"), "ctr_%");
        assert_eq!(normalize_column_name("Watch Time (min)"), "watch_time_(min)");
        assert_eq!(normalize_column_name("already_clean"), "already_clean");
    }

    #[test]
    fn test_parse_numeric_value() {
        assert_eq!(parse_numeric_value("42"), Some(42.0));
        assert_eq!(parse_numeric_value(" 3.5 "), Some(3.5));
        assert_eq!(parse_numeric_value("-7"), Some(-7.0));
        assert_eq!(parse_numeric_value("1e3"), Some(1000.0));
        assert_eq!(parse_numeric_value("bad"), None);
        assert_eq!(parse_numeric_value("1,000"), None);
        assert_eq!(parse_numeric_value("NaN"), None);
        assert_eq!(parse_numeric_value("inf"), None);
        assert_eq!(parse_numeric_value(""), None);
    }

    #[test]
    fn test_format_float_cell() {
        assert_eq!(format_float_cell(100.0), "100");
        assert_eq!(format_float_cell(-3.0), "-3");
        assert_eq!(format_float_cell(2.5), "2.5");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date_value("2024-03-09"), Some(expected));
        assert_eq!(parse_date_value("2024/03/09"), Some(expected));
        assert_eq!(parse_date_value("03/09/2024"), Some(expected));
        assert_eq!(parse_date_value("09-Mar-2024"), Some(expected));
        assert_eq!(parse_date_value("Mar 09, 2024"), Some(expected));
        assert_eq!(parse_date_value("March 9, 2024"), Some(expected));
        assert_eq!(parse_date_value("2024-03-09 14:30:00"), Some(expected));
        assert_eq!(parse_date_value("2024-03-09T14:30"), Some(expected));
        assert_eq!(parse_date_value("2024-03-09T14:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date_value("not a date"), None);
        assert_eq!(parse_date_value("2024-13-40"), None);
        assert_eq!(parse_date_value(""), None);
        assert_eq!(parse_date_value("2024-03-09 lunchtime"), None);
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(
            excel_serial_to_date(45000.0),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
        assert_eq!(parse_date_value("45000"), NaiveDate::from_ymd_opt(2023, 3, 15));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-5.0), None);
    }

    #[test]
    fn test_epoch_days_round_trip_anchor() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(epoch), 0);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(date), 19723);
        assert_eq!(epoch_days_to_date(19723), Some(date));
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("title".into(), &[Some("a"), None, Some("c")]);
        let filled = fill_string_nulls(&series, "Untitled").unwrap();
        assert_eq!(filled.null_count(), 0);
        assert_eq!(
            collect_strings(&filled).unwrap(),
            vec![
                Some("a".to_string()),
                Some("Untitled".to_string()),
                Some("c".to_string())
            ]
        );
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Date));
    }
}
