//! Bar chart of the most common categories.

use super::{DrawResult, axis_desc_font, palette, segment_label, title_font};
use crate::error::Result;
use crate::reporting::top_categories;
use crate::types::CategoryCount;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::Path;

const SIZE: (u32, u32) = (800, 500);
const TITLE: &str = "Bar Chart of Top 10 Video Categories";

/// Select the `n` most common categories.
pub fn prepare(df: &DataFrame, n: usize) -> Result<Vec<CategoryCount>> {
    top_categories(df, n)
}

pub(super) fn draw(path: &Path, categories: &[CategoryCount]) -> DrawResult {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = categories.iter().map(|c| c.category.clone()).collect();
    let slots = categories.len().max(1) as u32;
    let y_max = categories.iter().map(|c| c.count).max().unwrap_or(0).max(1) as u32;
    let y_top = y_max + (y_max / 10).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, title_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0u32..y_top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc("Category")
        .y_desc("Number of Videos")
        .axis_desc_style(axis_desc_font())
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(palette::BAR.filled())
            .margin(8)
            .data(
                categories
                    .iter()
                    .enumerate()
                    .map(|(idx, c)| (idx as u32, c.count as u32)),
            ),
    )?;

    root.present()?;
    Ok(())
}
