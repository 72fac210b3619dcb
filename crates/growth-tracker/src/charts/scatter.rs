//! Scatter plot of views against likes, one colour per category.

use super::{DrawResult, axis_desc_font, palette, title_font};
use crate::error::Result;
use crate::reporting::{numeric_column, text_column};
use crate::types::{CATEGORY, LIKES, VIEWS};
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::Path;

const SIZE: (u32, u32) = (800, 500);
const TITLE: &str = "Scatterplot of Views vs Likes by Category";
const POINT_SIZE: i32 = 4;

/// Points of one category, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub category: String,
    pub points: Vec<(f64, f64)>,
}

/// Group (views, likes) points by category, categories in first-appearance
/// order.
pub fn prepare(df: &DataFrame) -> Result<Vec<ScatterGroup>> {
    let categories = text_column(df, CATEGORY)?;
    let views = numeric_column(df, VIEWS)?;
    let likes = numeric_column(df, LIKES)?;

    let mut groups: Vec<ScatterGroup> = Vec::new();
    for ((category, x), y) in categories.into_iter().zip(views).zip(likes) {
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.points.push((x, y)),
            None => groups.push(ScatterGroup {
                category,
                points: vec![(x, y)],
            }),
        }
    }
    Ok(groups)
}

/// Axis range covering `values`, padded so edge points stay visible.
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad)..(hi + pad)
}

pub(super) fn draw(path: &Path, groups: &[ScatterGroup]) -> DrawResult {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let points = || groups.iter().flat_map(|g| g.points.iter().copied());
    let x_range = padded_range(points().map(|(x, _)| x));
    let y_range = padded_range(points().map(|(_, y)| y));

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, title_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Views")
        .y_desc("Likes")
        .axis_desc_style(axis_desc_font())
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    // Markerless first entry acts as the legend heading.
    if !groups.is_empty() {
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label("Category");
    }

    for (idx, group) in groups.iter().enumerate() {
        let color = palette::cycle(&palette::SET2, idx);
        chart
            .draw_series(
                group
                    .points
                    .iter()
                    .map(move |&point| Circle::new(point, POINT_SIZE, color.filled())),
            )?
            .label(group.category.as_str())
            .legend(move |(x, y)| Circle::new((x, y), POINT_SIZE, color.filled()));
    }

    if !groups.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
