//! Line chart of the best videos by net subscribers.

use super::{DrawResult, axis_desc_font, palette, segment_label, title_font};
use crate::error::Result;
use crate::reporting::top_videos_by_net_subscribers;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::Path;

const SIZE: (u32, u32) = (1000, 500);
const TITLE: &str = "Line Chart of Top 20 Videos by Net Subscribers";

/// (video id, net subscribers) for the `n` best rows, best first.
pub fn prepare(df: &DataFrame, n: usize) -> Result<Vec<(String, i64)>> {
    top_videos_by_net_subscribers(df, n)
}

/// Value range with at least one unit of headroom on each side.
///
/// Computed in `f64` so the full `i64` domain is safe.
fn value_range(values: &[i64]) -> std::ops::Range<f64> {
    let lo = values.iter().copied().min().unwrap_or(0) as f64;
    let hi = values.iter().copied().max().unwrap_or(0) as f64;
    let pad = ((hi - lo) / 10.0).trunc().max(1.0);
    (lo - pad)..(hi + pad)
}

pub(super) fn draw(path: &Path, videos: &[(String, i64)]) -> DrawResult {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = videos.iter().map(|(id, _)| id.clone()).collect();
    let values: Vec<i64> = videos.iter().map(|(_, v)| *v).collect();
    let y_range = value_range(&values);
    let slots = videos.len().max(1) as u32;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, title_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..slots).into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc("Video ID")
        .y_desc("Net Subscribers")
        .axis_desc_style(axis_desc_font())
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    let points: Vec<(SegmentValue<u32>, f64)> = values
        .iter()
        .enumerate()
        .map(|(idx, &v)| (SegmentValue::CenterOf(idx as u32), v as f64))
        .collect();

    chart.draw_series(LineSeries::new(
        points.iter().cloned(),
        palette::DARK_GREEN.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .cloned()
            .map(|point| Circle::new(point, 4, palette::DARK_GREEN.filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_prepare_orders_best_first() {
        let df = df![
            "video_id" => ["a", "b", "c"],
            "net_subscribers" => [1i64, 7, 3],
        ]
        .unwrap();
        let videos = prepare(&df, 20).unwrap();
        let ids: Vec<&str> = videos.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[]), -1.0..1.0);
        assert_eq!(value_range(&[5]), 4.0..6.0);
        assert_eq!(value_range(&[-20, 80]), -30.0..90.0);
    }

    #[test]
    fn test_value_range_at_integer_limits() {
        let range = value_range(&[i64::MAX, 0]);
        assert!(range.start.is_finite() && range.end.is_finite());
        assert!(range.start < 0.0);
        assert!(range.end > i64::MAX as f64);

        let range = value_range(&[i64::MIN, i64::MAX]);
        assert!(range.start < i64::MIN as f64);
        assert!(range.end > i64::MAX as f64);
    }
}
