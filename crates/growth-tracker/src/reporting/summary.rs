use crate::cleaner::CleaningSummary;
use crate::error::{Result, TrackerError};
use crate::types::{
    CATEGORY, CategoryCount, CategoryMean, LIKES, MissingCount, NET_SUBSCRIBERS, RankedVideo,
    TITLE, VIDEO_ID, VIEWS,
};
use crate::utils::{collect_f64, collect_i64, collect_strings};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Every aggregate the tracker reports, in a serializable form.
///
/// The same value backs the console output and the optional JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    pub output_file: String,
    pub rows: usize,
    /// Missing cells per column of the raw input
    pub missing_values: Vec<MissingCount>,
    pub cleaning: CleaningSummary,
    /// `None` on an empty table
    pub mean_views: Option<f64>,
    pub max_likes: Option<i64>,
    pub min_likes: Option<i64>,
    /// Count descending, ties in first-appearance order
    pub category_counts: Vec<CategoryCount>,
    /// Every row, net subscribers descending, stable
    pub net_subscriber_ranking: Vec<RankedVideo>,
    /// Category name ascending
    pub mean_views_by_category: Vec<CategoryMean>,
}

/// Parameters for building a [`SummaryReport`].
pub struct ReportParams<'a> {
    pub input_file: &'a Path,
    pub output_file: &'a Path,
    pub missing_values: Vec<MissingCount>,
    pub cleaning: CleaningSummary,
}

/// Builds and persists summary reports.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Aggregate the cleaned, derived table.
    pub fn build_report(df: &DataFrame, params: ReportParams<'_>) -> Result<SummaryReport> {
        let likes = integer_column(df, LIKES)?;

        Ok(SummaryReport {
            generated_at: Local::now().to_rfc3339(),
            input_file: params.input_file.display().to_string(),
            output_file: params.output_file.display().to_string(),
            rows: df.height(),
            missing_values: params.missing_values,
            cleaning: params.cleaning,
            mean_views: mean_views(df)?,
            max_likes: likes.iter().copied().max(),
            min_likes: likes.iter().copied().min(),
            category_counts: category_counts(df)?,
            net_subscriber_ranking: rank_by_net_subscribers(df)?,
            mean_views_by_category: mean_views_by_category(df)?,
        })
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_report_to_file(report: &SummaryReport, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;
        info!("Report written to: {}", path.display());
        Ok(path.to_path_buf())
    }
}

/// Mean of the views column, `None` on an empty table.
pub fn mean_views(df: &DataFrame) -> Result<Option<f64>> {
    Ok(lookup(df, VIEWS)?.cast(&DataType::Float64)?.mean())
}

/// Rows per category, count descending, ties in first-appearance order.
pub fn category_counts(df: &DataFrame) -> Result<Vec<CategoryCount>> {
    let categories = text_column(df, CATEGORY)?;

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for category in categories {
        let entry = counts.entry(category.clone()).or_insert_with(|| {
            order.push(category);
            0
        });
        *entry += 1;
    }

    let mut result: Vec<CategoryCount> = order
        .into_iter()
        .map(|category| {
            let count = counts.get(&category).copied().unwrap_or(0);
            CategoryCount { category, count }
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(result)
}

/// The `n` most frequent categories; never more than exist.
pub fn top_categories(df: &DataFrame, n: usize) -> Result<Vec<CategoryCount>> {
    let mut counts = category_counts(df)?;
    counts.truncate(n);
    Ok(counts)
}

/// Row positions sorted by net subscribers descending; ties keep table order.
pub fn net_subscriber_order(df: &DataFrame) -> Result<Vec<usize>> {
    let net = integer_column(df, NET_SUBSCRIBERS)?;
    let mut order: Vec<usize> = (0..net.len()).collect();
    order.sort_by(|&a, &b| net[b].cmp(&net[a]));
    Ok(order)
}

/// Every row as (title, net subscribers), best first.
pub fn rank_by_net_subscribers(df: &DataFrame) -> Result<Vec<RankedVideo>> {
    let titles = text_column(df, TITLE)?;
    let net = integer_column(df, NET_SUBSCRIBERS)?;

    Ok(net_subscriber_order(df)?
        .into_iter()
        .map(|row| RankedVideo {
            row,
            title: titles[row].clone(),
            net_subscribers: net[row],
        })
        .collect())
}

/// The `n` best rows as (video id, net subscribers), for the line chart.
pub fn top_videos_by_net_subscribers(df: &DataFrame, n: usize) -> Result<Vec<(String, i64)>> {
    let ids = text_column(df, VIDEO_ID)?;
    let net = integer_column(df, NET_SUBSCRIBERS)?;

    Ok(net_subscriber_order(df)?
        .into_iter()
        .take(n)
        .map(|row| (ids[row].clone(), net[row]))
        .collect())
}

/// Mean views per category, by category name.
pub fn mean_views_by_category(df: &DataFrame) -> Result<Vec<CategoryMean>> {
    let categories = text_column(df, CATEGORY)?;
    let views = numeric_column(df, VIEWS)?;

    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (category, value) in categories.into_iter().zip(views) {
        let entry = groups.entry(category).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(category, (sum, n))| CategoryMean {
            category,
            mean_views: sum / n as f64,
        })
        .collect())
}

// ============================================================================
// Column access
// ============================================================================

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| TrackerError::ColumnNotFound(name.to_string()))
}

/// Text values with nulls rendered empty.
pub(crate) fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(collect_strings(lookup(df, name)?)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Numeric values with nulls skipped.
pub(crate) fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(collect_f64(lookup(df, name)?)?.into_iter().flatten().collect())
}

/// Integer values with nulls read as zero, one per row.
pub(crate) fn integer_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    Ok(collect_i64(lookup(df, name)?)?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect())
}
