//! Histogram of views with a density overlay.

use super::density::{Bins, density_curve, histogram_bins};
use super::{DrawResult, axis_desc_font, palette, title_font};
use crate::error::Result;
use crate::reporting::numeric_column;
use crate::types::VIEWS;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::Path;

const SIZE: (u32, u32) = (800, 500);
const TITLE: &str = "Histogram of Distribution of Views";

#[derive(Debug, Clone)]
pub struct ViewsHistogram {
    pub bins: Bins,
    /// Absent when the views have no spread.
    pub curve: Option<Vec<(f64, f64)>>,
}

pub fn prepare(df: &DataFrame, bins: usize) -> Result<ViewsHistogram> {
    let views = numeric_column(df, VIEWS)?;
    let bins = histogram_bins(&views, bins);
    let curve = density_curve(&views, &bins);
    Ok(ViewsHistogram { bins, curve })
}

pub(super) fn draw(path: &Path, histogram: &ViewsHistogram) -> DrawResult {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let bins = &histogram.bins;
    let x_lo = bins.edges.first().copied().unwrap_or(0.0);
    let x_hi = bins.edges.last().copied().unwrap_or(1.0);
    let curve_max = histogram
        .curve
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(0.0, f64::max);
    let y_top = (bins.max_count() as f64).max(curve_max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, title_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_top)?;

    chart
        .configure_mesh()
        .x_desc("Views")
        .y_desc("Frequency")
        .axis_desc_style(axis_desc_font())
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    let bars = bins
        .edges
        .windows(2)
        .zip(&bins.counts)
        .map(|(edge, &count)| (edge[0], edge[1], count as f64));

    chart.draw_series(
        bars.clone()
            .map(|(x0, x1, y)| Rectangle::new([(x0, 0.0), (x1, y)], palette::SKY_BLUE.filled())),
    )?;
    chart.draw_series(
        bars.map(|(x0, x1, y)| Rectangle::new([(x0, 0.0), (x1, y)], BLACK.stroke_width(1))),
    )?;

    if let Some(curve) = &histogram.curve {
        chart.draw_series(LineSeries::new(
            curve.iter().copied(),
            palette::SKY_BLUE.stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_prepare_bins_views() {
        let df = df!["views" => [100i64, 200, 200, 400, 1000]].unwrap();
        let histogram = prepare(&df, 20).unwrap();
        assert_eq!(histogram.bins.counts.len(), 20);
        assert_eq!(histogram.bins.counts.iter().sum::<usize>(), 5);
        assert!(histogram.curve.is_some());
    }

    #[test]
    fn test_prepare_constant_views_has_no_curve() {
        let df = df!["views" => [0i64, 0, 0]].unwrap();
        let histogram = prepare(&df, 20).unwrap();
        assert_eq!(histogram.bins.max_count(), 3);
        assert!(histogram.curve.is_none());
    }
}
