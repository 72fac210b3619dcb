//! Data cleaning for the video metrics table.
//!
//! This module provides functionality for:
//! - Filling missing values with per-column defaults
//! - Parsing the upload date column
//! - Removing duplicate rows
//! - Normalizing column headers
//! - Coercing metric columns to numbers
//!
//! The steps run in that order. None of them fails on bad data: every
//! problem cell is resolved to a default and only counted.

mod converters;

use crate::error::{Result, TrackerError};
use crate::types::{self, ColumnKind, ColumnSpec};
use crate::utils::{fill_string_nulls, normalize_column_name};
use converters::{string_to_date, string_to_numeric};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What the cleaner did to the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    /// Cells filled with a default, per original column header.
    pub filled: Vec<(String, usize)>,
    /// Required columns absent from the input.
    pub absent_columns: Vec<String>,
    /// Upload dates that could not be parsed and were nulled.
    pub dates_nulled: usize,
    pub duplicates_removed: usize,
    /// Headers that changed during normalization, as (before, after).
    pub renamed: Vec<(String, String)>,
    /// Values replaced by zero during numeric coercion, per column.
    pub coerced_to_zero: Vec<(String, usize)>,
}

impl CleaningSummary {
    /// Human-readable list of the actions taken.
    pub fn actions(&self) -> Vec<String> {
        let mut actions = Vec::new();

        let total_filled: usize = self.filled.iter().map(|(_, n)| n).sum();
        if total_filled > 0 {
            actions.push(format!(
                "Filled {} missing values across {} columns",
                total_filled,
                self.filled.iter().filter(|(_, n)| *n > 0).count()
            ));
        } else {
            actions.push("No missing values to fill".to_string());
        }

        if self.dates_nulled > 0 {
            actions.push(format!(
                "Set {} unparseable upload dates to null",
                self.dates_nulled
            ));
        }

        if self.duplicates_removed > 0 {
            let pct = (self.duplicates_removed as f64 / self.rows_before as f64) * 100.0;
            actions.push(format!(
                "Removed {} duplicate rows ({:.1}%)",
                self.duplicates_removed, pct
            ));
        } else {
            actions.push("No duplicate rows found".to_string());
        }

        if !self.renamed.is_empty() {
            actions.push(format!("Normalized {} column names", self.renamed.len()));
        }

        for (column, count) in &self.coerced_to_zero {
            if *count > 0 {
                actions.push(format!(
                    "Coerced {} non-numeric values in '{}' to 0",
                    count, column
                ));
            }
        }

        actions
    }
}

/// Data cleaner for the video metrics table.
pub struct DataCleaner;

impl DataCleaner {
    /// Run every cleaning step in order.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        info!("Performing data cleaning...");

        let mut summary = CleaningSummary {
            rows_before: df.height(),
            ..Default::default()
        };

        let df = self.fill_missing(df, &mut summary)?;
        let df = self.normalize_dates(df, &mut summary)?;
        let df = self.remove_duplicates(df, &mut summary)?;
        let df = self.normalize_headers(df, &mut summary)?;
        let df = self.coerce_numeric(df, &mut summary)?;

        summary.rows_after = df.height();
        for action in summary.actions() {
            debug!("{}", action);
        }

        Ok((df, summary))
    }

    /// Replace nulls in the required columns with their defaults.
    pub fn fill_missing(&self, df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
        let mut df = df;

        for spec in types::required_columns() {
            let Some(col_name) = find_column(&df, spec) else {
                warn!("Column '{}' not present, skipping fill", spec.header);
                summary.absent_columns.push(spec.header.to_string());
                continue;
            };
            let Some(fill) = spec.fill else { continue };

            let series = df.column(&col_name)?.as_materialized_series().clone();
            let nulls = series.null_count();
            if nulls > 0 {
                let as_text = if series.dtype() == &DataType::String {
                    series
                } else {
                    series.cast(&DataType::String)?
                };
                df.replace(&col_name, fill_string_nulls(&as_text, fill)?)?;
                debug!("Filled {} missing values in '{}' with '{}'", nulls, col_name, fill);
            }
            summary.filled.push((col_name, nulls));
        }

        Ok(df)
    }

    /// Parse the upload date column; failures become null, rows are kept.
    pub fn normalize_dates(
        &self,
        df: DataFrame,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let mut df = df;

        for spec in types::SCHEMA.iter().filter(|s| s.kind == ColumnKind::Date) {
            let Some(col_name) = find_column(&df, spec) else {
                warn!("Column '{}' not present, skipping date parsing", spec.header);
                continue;
            };

            let series = df.column(&col_name)?.as_materialized_series().clone();
            let (dates, unparsed) = string_to_date(&series)?;
            df.replace(&col_name, dates)?;
            summary.dates_nulled += unparsed;
            debug!("Parsed '{}' as dates ({} unparseable)", col_name, unparsed);
        }

        Ok(df)
    }

    /// Drop rows identical to an earlier row, keeping the first and the order.
    pub fn remove_duplicates(
        &self,
        df: DataFrame,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let before = df.height();
        let df = df
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;
        let removed = before - df.height();

        summary.duplicates_removed += removed;
        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }

        Ok(df)
    }

    /// Trim, lowercase and underscore every header.
    pub fn normalize_headers(
        &self,
        df: DataFrame,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let mut df = df;
        let column_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        for col_name in &column_names {
            let normalized = normalize_column_name(col_name);
            if normalized != *col_name {
                df.rename(col_name, normalized.as_str().into())?;
                summary.renamed.push((col_name.clone(), normalized));
            }
        }

        Ok(df)
    }

    /// Coerce the metric columns to numbers; anything invalid becomes 0.
    ///
    /// Expects normalized headers.
    pub fn coerce_numeric(
        &self,
        df: DataFrame,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let mut df = df;

        for spec in types::numeric_columns() {
            let series = match df.column(spec.name) {
                Ok(col) => col.as_materialized_series().clone(),
                Err(_) => {
                    warn!("Column '{}' not present, skipping coercion", spec.name);
                    continue;
                }
            };

            let (converted, coerced) = string_to_numeric(&series, spec.kind)?;
            df.replace(spec.name, converted)?;
            summary.coerced_to_zero.push((spec.name.to_string(), coerced));
        }

        Ok(df)
    }
}

/// Find the column holding `spec`, whatever state its header is in.
fn find_column(df: &DataFrame, spec: &ColumnSpec) -> Option<String> {
    df.get_column_names()
        .into_iter()
        .find(|name| normalize_column_name(name) == spec.name)
        .map(|name| name.to_string())
}

/// Check that every required column is present and free of nulls.
pub fn verify_cleaned(df: &DataFrame) -> Result<()> {
    for spec in types::required_columns() {
        let column = df
            .column(spec.name)
            .map_err(|_| TrackerError::ColumnNotFound(spec.name.to_string()))?;
        if column.null_count() > 0 {
            return Err(TrackerError::Internal(format!(
                "column '{}' still has {} nulls after cleaning",
                spec.name,
                column.null_count()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{collect_i64, collect_strings};
    use pretty_assertions::assert_eq;

    fn raw_table() -> DataFrame {
        df![
            "Video ID" => [Some("v1"), None, Some("v3"), Some("v3")],
            "Title" => [Some("Intro"), Some("Deep dive"), None, None],
            "Category" => [Some("Tech"), None, Some("Music"), Some("Music")],
            "Upload Date" => [Some("2024-01-05"), Some("garbage"), None, None],
            "Views" => [Some("100"), Some("200"), Some("bad"), Some("bad")],
            "Likes" => [Some("10"), None, Some("3"), Some("3")],
            "CTR %" => [Some("4.5"), Some("x"), None, None],
            "Watch Time (min)" => [Some("12.5"), None, Some("1"), Some("1")],
            "Subs Gained" => [Some("5"), Some("2"), None, None],
            "Subs Lost" => [Some("1"), Some("4"), Some("0"), Some("0")],
        ]
        .unwrap()
    }

    #[test]
    fn test_clean_fills_every_required_column() {
        let (df, summary) = DataCleaner.clean(raw_table()).unwrap();

        for spec in types::required_columns() {
            assert_eq!(
                df.column(spec.name).unwrap().null_count(),
                0,
                "column {} has nulls",
                spec.name
            );
        }
        assert!(verify_cleaned(&df).is_ok());
        assert!(summary.absent_columns.is_empty());
    }

    #[test]
    fn test_clean_uses_column_defaults() {
        let (df, _) = DataCleaner.clean(raw_table()).unwrap();

        let ids = collect_strings(df.column(types::VIDEO_ID).unwrap().as_materialized_series())
            .unwrap();
        assert_eq!(ids[1].as_deref(), Some("Unknown"));

        let titles =
            collect_strings(df.column(types::TITLE).unwrap().as_materialized_series()).unwrap();
        assert_eq!(titles[2].as_deref(), Some("Untitled"));

        let categories =
            collect_strings(df.column(types::CATEGORY).unwrap().as_materialized_series())
                .unwrap();
        assert_eq!(categories[1].as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_clean_removes_identical_rows() {
        let (df, summary) = DataCleaner.clean(raw_table()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(summary.rows_before, 4);
        assert_eq!(summary.rows_after, 3);
        assert_eq!(summary.duplicates_removed, 1);
    }

    #[test]
    fn test_clean_coerces_views() {
        let (df, _) = DataCleaner.clean(raw_table()).unwrap();
        let views = collect_i64(df.column(types::VIEWS).unwrap().as_materialized_series())
            .unwrap();
        assert_eq!(views, vec![Some(100), Some(200), Some(0)]);
    }

    #[test]
    fn test_clean_nulls_bad_dates_without_dropping_rows() {
        let (df, summary) = DataCleaner.clean(raw_table()).unwrap();
        let dates = df.column(types::UPLOAD_DATE).unwrap();
        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(dates.null_count(), 2);
        assert_eq!(summary.dates_nulled, 1);
    }

    #[test]
    fn test_headers_are_normalized() {
        let (df, summary) = DataCleaner.clean(raw_table()).unwrap();
        for name in df.get_column_names() {
            assert!(!name.chars().any(|c| c.is_uppercase()), "{}", name);
            assert!(!name.contains(' '), "{}", name);
            assert_eq!(name.trim(), name.as_str());
        }
        assert_eq!(summary.renamed.len(), 10);
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let cleaner = DataCleaner;
        let mut summary = CleaningSummary::default();
        let once = cleaner.remove_duplicates(raw_table(), &mut summary).unwrap();
        let twice = cleaner.remove_duplicates(once.clone(), &mut summary).unwrap();
        assert_eq!(once.height(), twice.height());
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_remove_duplicates_keeps_first_and_order() {
        let df = df![
            "id" => ["b", "a", "b", "c", "a"],
            "n" => [1, 2, 1, 3, 2],
        ]
        .unwrap();
        let mut summary = CleaningSummary::default();
        let deduped = DataCleaner.remove_duplicates(df, &mut summary).unwrap();
        let ids = collect_strings(deduped.column("id").unwrap().as_materialized_series()).unwrap();
        assert_eq!(
            ids,
            vec![Some("b".to_string()), Some("a".to_string()), Some("c".to_string())]
        );
        assert_eq!(summary.duplicates_removed, 2);
    }

    #[test]
    fn test_absent_columns_are_skipped() {
        let df = df![
            " Views " => ["1", "x"],
            "Extra Column" => ["keep", "me"],
        ]
        .unwrap();
        let (cleaned, summary) = DataCleaner.clean(df).unwrap();

        assert_eq!(summary.absent_columns.len(), 8);
        assert!(cleaned.column("extra_column").is_ok());
        let views = collect_i64(cleaned.column("views").unwrap().as_materialized_series())
            .unwrap();
        assert_eq!(views, vec![Some(1), Some(0)]);
        assert!(verify_cleaned(&cleaned).is_err());
    }

    #[test]
    fn test_summary_actions() {
        let (_, summary) = DataCleaner.clean(raw_table()).unwrap();
        let actions = summary.actions();
        assert!(actions.iter().any(|a| a.contains("duplicate")));
        assert!(actions.iter().any(|a| a.contains("'views'")));
    }
}
