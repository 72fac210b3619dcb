//! Binning and kernel density estimation for the views histogram.

use serde::Serialize;

/// Points sampled along the density curve.
const DENSITY_SAMPLES: usize = 200;

/// Equal-width histogram bins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bins {
    /// `counts.len() + 1` ascending bin boundaries.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Bins {
    pub fn width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Split `values` into `bins` equal-width bins over their range.
///
/// Every bin is half-open except the last, which is closed so the maximum
/// lands in it. A zero-width range is widened by 0.5 on each side; an empty
/// input bins over `[0, 1]`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Bins {
    let bins = bins.max(1);
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if values.is_empty() {
        lo = 0.0;
        hi = 1.0;
    } else if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for &value in values {
        let idx = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Bins { edges, counts }
}

/// Bandwidth by Scott's rule: `std * n^(-1/5)`, with the sample standard
/// deviation. `None` when fewer than two distinct values exist.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = variance.sqrt();
    if std <= 0.0 || !std.is_finite() {
        return None;
    }
    Some(std * (n as f64).powf(-0.2))
}

/// Gaussian kernel density of `values` at `x`.
pub fn gaussian_kde(values: &[f64], bandwidth: f64, x: f64) -> f64 {
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    values
        .iter()
        .map(|v| {
            let z = (x - v) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum::<f64>()
        * norm
}

/// Density curve over the bin range, scaled to histogram counts
/// (`density * n * bin_width`) so it overlays the bars.
pub fn density_curve(values: &[f64], bins: &Bins) -> Option<Vec<(f64, f64)>> {
    let bandwidth = scott_bandwidth(values)?;
    let lo = *bins.edges.first()?;
    let hi = *bins.edges.last()?;
    let scale = values.len() as f64 * bins.width();
    let step = (hi - lo) / (DENSITY_SAMPLES - 1) as f64;

    Some(
        (0..DENSITY_SAMPLES)
            .map(|i| {
                let x = lo + step * i as f64;
                (x, gaussian_kde(values, bandwidth, x) * scale)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bins_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|v| v as f64).collect();
        let bins = histogram_bins(&values, 20);

        assert_eq!(bins.counts.len(), 20);
        assert_eq!(bins.edges.len(), 21);
        assert_eq!(bins.counts.iter().sum::<usize>(), 100);
        assert_eq!(bins.counts[0], 5);
    }

    #[test]
    fn test_last_bin_is_closed() {
        let bins = histogram_bins(&[0.0, 10.0], 2);
        assert_eq!(bins.counts, vec![1, 1]);
        assert_eq!(bins.edges, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_constant_values_widen_range() {
        let bins = histogram_bins(&[7.0, 7.0, 7.0], 4);
        assert_eq!(bins.edges.first(), Some(&6.5));
        assert_eq!(bins.edges.last(), Some(&7.5));
        assert_eq!(bins.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_empty_input() {
        let bins = histogram_bins(&[], 20);
        assert_eq!(bins.max_count(), 0);
        assert_eq!(bins.width(), 0.05);
    }

    #[test]
    fn test_scott_bandwidth() {
        assert_eq!(scott_bandwidth(&[1.0]), None);
        assert_eq!(scott_bandwidth(&[3.0, 3.0]), None);
        let bw = scott_bandwidth(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let expected = (5.0f64 / 3.0).sqrt() * 4f64.powf(-0.2);
        assert!((bw - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 4.0];
        let bw = scott_bandwidth(&values).unwrap();
        let step = 0.01;
        let area: f64 = (0..2000)
            .map(|i| gaussian_kde(&values, bw, -7.5 + step * i as f64) * step)
            .sum();
        assert!((area - 1.0).abs() < 1e-3, "area was {}", area);
    }

    #[test]
    fn test_density_curve_spans_bins() {
        let values = [10.0, 20.0, 20.0, 30.0, 50.0];
        let bins = histogram_bins(&values, 4);
        let curve = density_curve(&values, &bins).unwrap();
        assert_eq!(curve.len(), 200);
        assert_eq!(curve.first().unwrap().0, 10.0);
        assert!((curve.last().unwrap().0 - 50.0).abs() < 1e-9);
        assert!(curve.iter().all(|(_, y)| *y >= 0.0));
        assert!(density_curve(&[5.0, 5.0], &histogram_bins(&[5.0, 5.0], 4)).is_none());
    }
}
