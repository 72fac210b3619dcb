//! Configuration types for the growth tracker.
//!
//! Every default reproduces the fixed behaviour of a bare run: read
//! `youtube_growth_tracker.xlsx`, write `youtube_data_trackers.xlsx`, and
//! drop the five charts into the working directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default input spreadsheet.
pub const DEFAULT_INPUT: &str = "youtube_growth_tracker.xlsx";

/// Default cleaned output spreadsheet.
pub const DEFAULT_OUTPUT: &str = "youtube_data_trackers.xlsx";

/// File name of the JSON summary written with `emit_report`.
pub const REPORT_FILE_NAME: &str = "summary_report.json";

/// Configuration for a tracker run.
///
/// Use [`TrackerConfig::builder()`] to create a configuration with the
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use growth_tracker::config::TrackerConfig;
///
/// let config = TrackerConfig::builder()
///     .input("metrics.csv")
///     .output("out/cleaned.xlsx")
///     .render_charts(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Spreadsheet to read.
    /// Default: "youtube_growth_tracker.xlsx"
    pub input: PathBuf,

    /// Where the cleaned table is written. The extension picks the format.
    /// Default: "youtube_data_trackers.xlsx"
    pub output: PathBuf,

    /// Directory receiving the five chart images.
    /// Default: "."
    pub chart_dir: PathBuf,

    /// Whether to render the charts at all.
    /// Default: true
    pub render_charts: bool,

    /// Whether to write the summary as JSON next to the output file.
    /// Default: false
    pub emit_report: bool,

    /// Categories shown in the bar chart.
    /// Default: 10
    pub top_bar_categories: usize,

    /// Categories shown in the pie chart.
    /// Default: 5
    pub top_pie_categories: usize,

    /// Number of bins in the views histogram.
    /// Default: 20
    pub histogram_bins: usize,

    /// Videos shown in the net subscriber line chart.
    /// Default: 20
    pub top_line_videos: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            chart_dir: PathBuf::from("."),
            render_charts: true,
            emit_report: false,
            top_bar_categories: 10,
            top_pie_categories: 5,
            histogram_bins: 20,
            top_line_videos: 20,
        }
    }
}

impl TrackerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.input.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("input".to_string()));
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("output".to_string()));
        }

        let counts = [
            ("top_bar_categories", self.top_bar_categories),
            ("top_pie_categories", self.top_pie_categories),
            ("histogram_bins", self.histogram_bins),
            ("top_line_videos", self.top_line_videos),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount(field.to_string()));
            }
        }

        Ok(())
    }

    /// Path of the JSON summary report, placed beside the output file.
    pub fn report_path(&self) -> PathBuf {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(REPORT_FILE_NAME),
            _ => PathBuf::from(REPORT_FILE_NAME),
        }
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Path for '{0}' must not be empty")]
    EmptyPath(String),

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroCount(String),
}

/// Builder for [`TrackerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct TrackerConfigBuilder {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    chart_dir: Option<PathBuf>,
    render_charts: Option<bool>,
    emit_report: Option<bool>,
    top_bar_categories: Option<usize>,
    top_pie_categories: Option<usize>,
    histogram_bins: Option<usize>,
    top_line_videos: Option<usize>,
}

impl TrackerConfigBuilder {
    /// Set the input spreadsheet.
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Set the cleaned output file.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Set the directory that receives chart images.
    pub fn chart_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_dir = Some(path.into());
        self
    }

    /// Enable or disable chart rendering.
    pub fn render_charts(mut self, render: bool) -> Self {
        self.render_charts = Some(render);
        self
    }

    /// Enable or disable the JSON summary report.
    pub fn emit_report(mut self, emit: bool) -> Self {
        self.emit_report = Some(emit);
        self
    }

    /// Set how many categories the bar chart shows.
    pub fn top_bar_categories(mut self, n: usize) -> Self {
        self.top_bar_categories = Some(n);
        self
    }

    /// Set how many categories the pie chart shows.
    pub fn top_pie_categories(mut self, n: usize) -> Self {
        self.top_pie_categories = Some(n);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set how many videos the line chart shows.
    pub fn top_line_videos(mut self, n: usize) -> Self {
        self.top_line_videos = Some(n);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `TrackerConfig` or an error if validation fails.
    pub fn build(self) -> Result<TrackerConfig, ConfigValidationError> {
        let defaults = TrackerConfig::default();
        let config = TrackerConfig {
            input: self.input.unwrap_or(defaults.input),
            output: self.output.unwrap_or(defaults.output),
            chart_dir: self.chart_dir.unwrap_or(defaults.chart_dir),
            render_charts: self.render_charts.unwrap_or(defaults.render_charts),
            emit_report: self.emit_report.unwrap_or(defaults.emit_report),
            top_bar_categories: self
                .top_bar_categories
                .unwrap_or(defaults.top_bar_categories),
            top_pie_categories: self
                .top_pie_categories
                .unwrap_or(defaults.top_pie_categories),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            top_line_videos: self.top_line_videos.unwrap_or(defaults.top_line_videos),
        };

        config.validate()?;
        Ok(config)
    }
}
