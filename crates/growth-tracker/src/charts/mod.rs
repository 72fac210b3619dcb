//! Chart rendering module.
//!
//! Five independent charts, each written as one PNG into the chart
//! directory. Every chart splits into a `prepare` step that extracts its data
//! from the cleaned table and a `draw` step that renders it with the
//! `plotters` bitmap backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use growth_tracker::charts::ChartRenderer;
//!
//! let written = ChartRenderer::new(&config).render_all(&df)?;
//! ```

pub mod bar;
pub mod density;
pub mod histogram;
pub mod line;
pub mod palette;
pub mod pie;
pub mod scatter;

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use plotters::prelude::*;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of a single `draw`; backend errors are boxed because each
/// drawing area has its own error type.
pub(crate) type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// The five charts, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    CategoryBar,
    CategoryPie,
    ViewsHistogram,
    ViewsLikesScatter,
    NetSubscribersLine,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::CategoryBar,
        ChartKind::CategoryPie,
        ChartKind::ViewsHistogram,
        ChartKind::ViewsLikesScatter,
        ChartKind::NetSubscribersLine,
    ];

    /// File name of the rendered image.
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::CategoryBar => "bar_chart_categories.png",
            ChartKind::CategoryPie => "pie_chart_categories.png",
            ChartKind::ViewsHistogram => "histogram_views.png",
            ChartKind::ViewsLikesScatter => "scatter_views_likes.png",
            ChartKind::NetSubscribersLine => "line_net_subscribers.png",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartKind::CategoryBar => "category bar chart",
            ChartKind::CategoryPie => "category pie chart",
            ChartKind::ViewsHistogram => "views histogram",
            ChartKind::ViewsLikesScatter => "views/likes scatter plot",
            ChartKind::NetSubscribersLine => "net subscribers line chart",
        };
        write!(f, "{}", name)
    }
}

/// Renders the charts of a cleaned, derived table.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    top_bar_categories: usize,
    top_pie_categories: usize,
    histogram_bins: usize,
    top_line_videos: usize,
}

impl ChartRenderer {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            output_dir: config.chart_dir.clone(),
            top_bar_categories: config.top_bar_categories,
            top_pie_categories: config.top_pie_categories,
            histogram_bins: config.histogram_bins,
            top_line_videos: config.top_line_videos,
        }
    }

    /// Path a chart is written to.
    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }

    /// Render every chart, returning the written paths in order.
    pub fn render_all(&self, df: &DataFrame) -> Result<Vec<PathBuf>> {
        if !self.output_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.output_dir)?;
        }

        ChartKind::ALL
            .iter()
            .map(|&kind| self.render(kind, df))
            .collect()
    }

    /// Render a single chart.
    pub fn render(&self, kind: ChartKind, df: &DataFrame) -> Result<PathBuf> {
        let path = self.path_for(kind);
        debug!("Rendering {} to {}", kind, path.display());

        let drawn = match kind {
            ChartKind::CategoryBar => bar::draw(&path, &bar::prepare(df, self.top_bar_categories)?),
            ChartKind::CategoryPie => pie::draw(&path, &pie::prepare(df, self.top_pie_categories)?),
            ChartKind::ViewsHistogram => {
                histogram::draw(&path, &histogram::prepare(df, self.histogram_bins)?)
            }
            ChartKind::ViewsLikesScatter => scatter::draw(&path, &scatter::prepare(df)?),
            ChartKind::NetSubscribersLine => {
                line::draw(&path, &line::prepare(df, self.top_line_videos)?)
            }
        };
        drawn.map_err(|e| TrackerError::chart(kind.file_name(), e))?;

        info!("Chart written to: {}", path.display());
        Ok(path)
    }
}

/// Chart title font.
pub(crate) fn title_font() -> TextStyle<'static> {
    ("sans-serif", 22).into_font().into()
}

/// Bold axis descriptions.
pub(crate) fn axis_desc_font() -> TextStyle<'static> {
    ("sans-serif", 15)
        .into_font()
        .style(FontStyle::Bold)
        .into()
}

/// Tick label of a segmented category axis.
pub(crate) fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => {
            labels.get(*idx as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}
