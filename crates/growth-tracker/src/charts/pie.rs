//! Pie chart of the top categories' share.
//!
//! Slices run counter-clockwise from the start angle, measured from the
//! positive x axis.

use super::{DrawResult, palette, title_font};
use crate::error::Result;
use crate::reporting::top_categories;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::f64::consts::PI;
use std::path::Path;

const SIZE: (u32, u32) = (600, 600);
const TITLE: &str = "Pie Chart of Top 5 Categories Distribution";
const START_ANGLE: f64 = 140.0;
/// Arc segments per full turn.
const ARC_STEPS: f64 = 360.0;

/// A labelled slice of the pie.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// Slices for the `n` most common categories.
pub fn prepare(df: &DataFrame, n: usize) -> Result<Vec<Slice>> {
    Ok(top_categories(df, n)?
        .into_iter()
        .map(|c| Slice {
            label: c.category,
            value: c.count as f64,
        })
        .collect())
}

/// (start, end) angle in radians of every slice. Shares are relative to
/// the slices given.
pub fn slice_angles(slices: &[Slice], start_degrees: f64) -> Vec<(f64, f64)> {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = start_degrees.to_radians();
    slices
        .iter()
        .map(|s| {
            let start = angle;
            angle += s.value / total * 2.0 * PI;
            (start, angle)
        })
        .collect()
}

/// Percentage label with one decimal, e.g. `12.5%`.
pub fn percent_label(value: f64, total: f64) -> String {
    format!("{:.1}%", value / total * 100.0)
}

/// Pixel position at `radius` and `angle` around `center`; y grows downwards.
fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

pub(super) fn draw(path: &Path, slices: &[Slice]) -> DrawResult {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(TITLE, title_font())?;

    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let angles = slice_angles(slices, START_ANGLE);

    if angles.is_empty() {
        root.draw(&Text::new(
            "No data",
            center,
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let radius = f64::from(width.min(height)) * 0.35;
    let total: f64 = slices.iter().map(|s| s.value).sum();
    let label_style = ("sans-serif", 16).into_font().color(&BLACK);
    let percent_style = ("sans-serif", 14).into_font().color(&BLACK);

    for (idx, (slice, &(start, end))) in slices.iter().zip(&angles).enumerate() {
        let steps = (((end - start) / (2.0 * PI)) * ARC_STEPS).ceil().max(1.0) as usize;
        let mut outline = vec![center];
        outline.extend((0..=steps).map(|step| {
            let angle = start + (end - start) * step as f64 / steps as f64;
            polar(center, radius, angle)
        }));

        let color = palette::cycle(&palette::PASTEL, idx);
        root.draw(&Polygon::new(outline, color.filled()))?;

        let mid = (start + end) / 2.0;
        root.draw(&Text::new(
            slice.label.clone(),
            polar(center, radius * 1.12, mid),
            label_style.clone(),
        ))?;
        root.draw(&Text::new(
            percent_label(slice.value, total),
            polar(center, radius * 0.6, mid),
            percent_style.clone(),
        ))?;
    }

    root.present()?;
    Ok(())
}
