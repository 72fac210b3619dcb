//! Video Growth Tracker Library
//!
//! Cleans, summarizes and charts a spreadsheet of per-video performance
//! metrics, built on Polars.
//!
//! # Overview
//!
//! A run is a straight line of stages:
//!
//! - **Loading**: read an Excel workbook or CSV file into a `DataFrame`
//! - **Cleaning**: fill defaults, parse upload dates, drop duplicate rows,
//!   normalize headers and coerce metrics to numbers
//! - **Deriving**: add `net_subscribers = subs_gained - subs_lost`
//! - **Reporting**: print averages, extremes, category counts and rankings
//! - **Visualizing**: render five PNG charts with `plotters`
//! - **Writing**: save the cleaned table as `.xlsx` or `.csv`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use growth_tracker::{Pipeline, TrackerConfig};
//!
//! let config = TrackerConfig::builder()
//!     .input("youtube_growth_tracker.xlsx")
//!     .output("youtube_data_trackers.xlsx")
//!     .chart_dir("charts")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("Average views: {:?}", result.report.mean_views);
//! ```
//!
//! Each stage is also usable on its own:
//!
//! ```rust,ignore
//! use growth_tracker::{DataCleaner, TableLoader, add_net_subscribers};
//!
//! let raw = TableLoader::load(Path::new("metrics.csv"))?;
//! let (cleaned, summary) = DataCleaner.clean(raw)?;
//! let table = add_net_subscribers(cleaned)?;
//! ```

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod derive;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;
pub mod writer;

// Re-exports for convenient access
pub use charts::{ChartKind, ChartRenderer};
pub use cleaner::{CleaningSummary, DataCleaner, verify_cleaned};
pub use config::{ConfigValidationError, TrackerConfig, TrackerConfigBuilder};
pub use derive::add_net_subscribers;
pub use error::{Result as TrackerResult, ResultExt, TrackerError};
pub use loader::{InputFormat, TableLoader, missing_value_counts};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineResult, PipelineStage,
    ProgressReporter, ProgressUpdate,
};
pub use reporting::{ReportGenerator, ReportParams, SummaryReport};
pub use types::{CategoryCount, CategoryMean, ColumnKind, ColumnSpec, MissingCount, RankedVideo};
pub use writer::{OutputFormat, TableWriter};
