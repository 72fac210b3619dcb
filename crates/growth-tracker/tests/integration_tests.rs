//! Integration tests for the growth tracker pipeline.
//!
//! These tests run the whole pipeline over CSV fixtures and check the
//! cleaned output, the console report and the JSON summary.

use growth_tracker::pipeline::COMPLETION_MESSAGE;
use growth_tracker::utils::collect_strings;
use growth_tracker::{
    ChartKind, DataCleaner, Pipeline, PipelineResult, PipelineStage, SummaryReport, TableLoader,
    TrackerConfig, verify_cleaned,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config_for(input: &str, output: &Path) -> TrackerConfig {
    TrackerConfig::builder()
        .input(fixtures_path().join(input))
        .output(output)
        .chart_dir(output.parent().unwrap_or(Path::new(".")).join("charts"))
        .render_charts(false)
        .build()
        .expect("Config should be valid")
}

fn chart_config_for(input: &str, dir: &Path) -> TrackerConfig {
    TrackerConfig {
        render_charts: true,
        ..config_for(input, &dir.join("cleaned.xlsx"))
    }
}

fn assert_all_charts_written(result: &PipelineResult, chart_dir: &Path) {
    let expected: Vec<PathBuf> = ChartKind::ALL
        .iter()
        .map(|kind| chart_dir.join(kind.file_name()))
        .collect();
    assert_eq!(result.charts, expected);
    for path in &expected {
        let size = std::fs::metadata(path)
            .unwrap_or_else(|_| panic!("{} should exist", path.display()))
            .len();
        assert!(size > 0, "{} should not be empty", path.display());
    }
}

fn run(config: TrackerConfig) -> (PipelineResult, String) {
    let mut out = Vec::new();
    let result = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_to(&mut out)
        .expect("Pipeline should complete successfully");
    (result, String::from_utf8(out).unwrap())
}

fn column_strings(df: &DataFrame, name: &str) -> Vec<String> {
    let column = df
        .column(name)
        .unwrap_or_else(|_| panic!("Column '{}' should exist", name));
    collect_strings(column.as_materialized_series())
        .unwrap()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

fn column_ints(df: &DataFrame, name: &str) -> Vec<i64> {
    column_strings(df, name)
        .iter()
        .map(|v| v.parse().expect("Integer cell"))
        .collect()
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_csv_to_csv_cleans_every_column() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cleaned.csv");
    let (result, _) = run(config_for("youtube_metrics.csv", &output));

    assert_eq!(result.report.rows, 7);
    assert_eq!(result.report.cleaning.duplicates_removed, 1);
    assert_eq!(result.report.cleaning.dates_nulled, 1);

    let cleaned = TableLoader::load(&output).unwrap();
    let headers: Vec<String> = cleaned
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(
        headers,
        vec![
            "video_id",
            "title",
            "category",
            "upload_date",
            "views",
            "likes",
            "ctr_%",
            "watch_time_(min)",
            "subs_gained",
            "subs_lost",
            "net_subscribers",
        ]
    );
    for header in &headers {
        assert_eq!(header.trim(), header.as_str());
        assert!(!header.contains(' '));
        assert_eq!(header.to_lowercase(), *header);
    }

    assert_eq!(
        column_strings(&cleaned, "video_id"),
        vec!["V001", "V002", "V003", "V004", "Unknown", "V006", "V007"]
    );
    assert_eq!(column_strings(&cleaned, "title")[2], "Untitled");
    assert_eq!(column_strings(&cleaned, "category")[4], "Unknown");
    assert_eq!(
        column_ints(&cleaned, "views"),
        vec![1200, 800, 0, 5000, 300, 2500, 1800]
    );
    assert_eq!(column_ints(&cleaned, "likes")[4], 0);

    let dates = column_strings(&cleaned, "upload_date");
    assert_eq!(dates[0], "2024-01-05");
    assert_eq!(dates[1], "2024-02-10");
    assert_eq!(dates[2], "");
    assert_eq!(dates[3], "2024-03-15");
}

#[test]
fn test_net_subscribers_matches_gained_minus_lost() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cleaned.csv");
    run(config_for("youtube_metrics.csv", &output));

    let cleaned = TableLoader::load(&output).unwrap();
    let gained = column_ints(&cleaned, "subs_gained");
    let lost = column_ints(&cleaned, "subs_lost");
    let net = column_ints(&cleaned, "net_subscribers");

    for ((g, l), n) in gained.iter().zip(&lost).zip(&net) {
        assert_eq!(g - l, *n);
    }
    assert_eq!(net, vec![28, 7, -2, 100, -1, 42, 52]);
}

#[test]
fn test_summary_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run(config_for("youtube_metrics.csv", &dir.path().join("out.csv")));
    let report = result.report;

    let mean = report.mean_views.unwrap();
    assert!((mean - 11600.0 / 7.0).abs() < 1e-9);
    assert_eq!(report.max_likes, Some(700));
    assert_eq!(report.min_likes, Some(0));

    let counts: Vec<(&str, usize)> = report
        .category_counts
        .iter()
        .map(|c| (c.category.as_str(), c.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Gaming", 2),
            ("Music", 2),
            ("Education", 1),
            ("Food", 1),
            ("Unknown", 1),
        ]
    );

    let means: Vec<(&str, f64)> = report
        .mean_views_by_category
        .iter()
        .map(|c| (c.category.as_str(), c.mean_views))
        .collect();
    assert_eq!(
        means,
        vec![
            ("Education", 1200.0),
            ("Food", 800.0),
            ("Gaming", 1250.0),
            ("Music", 3400.0),
            ("Unknown", 300.0),
        ]
    );
}

#[test]
fn test_net_subscriber_ranking_is_stable_descending() {
    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run(config_for("youtube_metrics.csv", &dir.path().join("out.csv")));

    let ranking: Vec<(&str, i64)> = result
        .report
        .net_subscriber_ranking
        .iter()
        .map(|r| (r.title.as_str(), r.net_subscribers))
        .collect();
    assert_eq!(
        ranking,
        vec![
            ("Top 10 Songs", 100),
            ("Live Set", 52),
            ("Speedrun", 42),
            ("Intro to Rust", 28),
            ("Cooking Pasta", 7),
            ("Unboxing", -1),
            ("Untitled", -2),
        ]
    );
}

#[test]
fn test_console_output_sections() {
    let dir = tempfile::tempdir().unwrap();
    let (_, text) = run(config_for("youtube_metrics.csv", &dir.path().join("out.csv")));

    let sections = [
        "Missing values:",
        "Average views:",
        "Max likes: 700 Min likes: 0",
        "Video count by category:",
        "Top videos by net subscribers:",
        "Average views per category:",
        COMPLETION_MESSAGE,
    ];
    let mut last = 0;
    for section in sections {
        let pos = text[last..]
            .find(section)
            .unwrap_or_else(|| panic!("'{}' missing or out of order", section));
        last += pos;
    }
}

#[test]
fn test_identical_rows_collapse_to_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cleaned.csv");
    let (result, _) = run(config_for("all_duplicates.csv", &output));

    assert_eq!(result.report.rows, 1);
    assert_eq!(result.report.cleaning.duplicates_removed, 2);
    assert_eq!(TableLoader::load(&output).unwrap().height(), 1);
}

#[test]
fn test_cleaning_output_again_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cleaned.csv");
    run(config_for("youtube_metrics.csv", &output));

    let reloaded = TableLoader::load(&output).unwrap();
    let (recleaned, summary) = DataCleaner.clean(reloaded.clone()).unwrap();

    assert_eq!(summary.duplicates_removed, 0);
    assert!(summary.renamed.is_empty());
    assert_eq!(recleaned.height(), reloaded.height());
    verify_cleaned(&recleaned).unwrap();
}

#[test]
fn test_xlsx_output_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nested").join("youtube_data_trackers.xlsx");
    let (result, _) = run(config_for("youtube_metrics.csv", &output));

    assert_eq!(result.output_file, output);
    let cleaned = TableLoader::load(&output).unwrap();
    assert_eq!(cleaned.shape(), (7, 11));
    let dates = column_strings(&cleaned, "upload_date");
    assert_eq!(&dates[..3], &["2024-01-05", "2024-02-10", ""]);
    assert_eq!(column_strings(&cleaned, "ctr_%")[0], "4.5");
    assert_eq!(column_strings(&cleaned, "ctr_%")[2], "0");
}

#[test]
fn test_emit_report_writes_json_beside_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out").join("cleaned.csv");
    let config = TrackerConfig {
        emit_report: true,
        ..config_for("youtube_metrics.csv", &output)
    };
    let (result, _) = run(config);

    let report_path = dir.path().join("out").join("summary_report.json");
    assert_eq!(result.report_file, Some(report_path.clone()));

    let parsed: SummaryReport =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(parsed.rows, 7);
    assert_eq!(parsed.net_subscriber_ranking.len(), 7);
    assert_eq!(parsed.missing_values.len(), 10);
}

// ============================================================================
// Charts
// ============================================================================

#[test]
fn test_charts_are_written_with_fixed_names() {
    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run(chart_config_for("youtube_metrics.csv", dir.path()));

    let chart_dir = dir.path().join("charts");
    assert_all_charts_written(&result, &chart_dir);

    let names: Vec<&str> = ChartKind::ALL.iter().map(|kind| kind.file_name()).collect();
    assert_eq!(
        names,
        vec![
            "bar_chart_categories.png",
            "pie_chart_categories.png",
            "histogram_views.png",
            "scatter_views_likes.png",
            "line_net_subscribers.png",
        ]
    );
}

#[test]
fn test_charts_render_for_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run(chart_config_for("headers_only.csv", dir.path()));

    assert_eq!(result.report.rows, 0);
    assert_eq!(result.report.mean_views, None);
    assert_all_charts_written(&result, &dir.path().join("charts"));
}

#[test]
fn test_extreme_values_do_not_abort_run() {
    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run(chart_config_for("edge_values.csv", dir.path()));

    assert_eq!(result.report.rows, 2);
    assert_eq!(result.report.net_subscriber_ranking[0].net_subscribers, i64::MAX);
    assert_all_charts_written(&result, &dir.path().join("charts"));

    let cleaned = TableLoader::load(&dir.path().join("cleaned.xlsx")).unwrap();
    assert_eq!(
        column_strings(&cleaned, "upload_date"),
        vec!["1850-05-05", "2024-06-01"]
    );
}

// ============================================================================
// Failures and progress
// ============================================================================

#[test]
fn test_unsupported_input_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("metrics.txt");
    std::fs::write(&input, "Video ID\nv1\n").unwrap();

    let config = TrackerConfig::builder()
        .input(&input)
        .output(dir.path().join("out.csv"))
        .render_charts(false)
        .build()
        .unwrap();
    let err = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_to(&mut Vec::<u8>::new())
        .unwrap_err();

    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_progress_reaches_complete() {
    let dir = tempfile::tempdir().unwrap();
    let updates = Arc::new(Mutex::new(Vec::new()));
    let seen = updates.clone();

    Pipeline::builder()
        .config(config_for("youtube_metrics.csv", &dir.path().join("out.csv")))
        .on_progress(move |update| seen.lock().unwrap().push(update))
        .build()
        .unwrap()
        .run_to(&mut Vec::<u8>::new())
        .unwrap();

    let updates = updates.lock().unwrap();
    let last = updates.last().expect("At least one update");
    assert_eq!(last.stage, PipelineStage::Complete);
    assert_eq!(last.progress, 1.0);
    assert!(
        updates
            .windows(2)
            .all(|pair| pair[0].progress <= pair[1].progress),
        "Progress should never go backwards"
    );
}
