//! Report generation module.
//!
//! Aggregates the cleaned table into a [`SummaryReport`] and renders it as
//! console text or, on request, as a JSON file.
//!
//! # Example
//!
//! ```rust,ignore
//! use growth_tracker::reporting::{ReportGenerator, ReportParams, write_summary};
//!
//! let report = ReportGenerator::build_report(&df, params)?;
//! write_summary(&mut std::io::stdout().lock(), &report)?;
//! ReportGenerator::write_report_to_file(&report, Path::new("summary_report.json"))?;
//! ```

mod console;
mod summary;

pub use console::{write_missing_values, write_summary};
pub use summary::{
    ReportGenerator, ReportParams, SummaryReport, category_counts, mean_views, mean_views_by_category,
    net_subscriber_order, rank_by_net_subscribers, top_categories, top_videos_by_net_subscribers,
};
pub(crate) use summary::{numeric_column, text_column};
