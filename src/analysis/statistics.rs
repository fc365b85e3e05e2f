//! Descriptive statistics over salary values.
//!
//! Every endpoint that reports statistics goes through this module so the
//! dashboard, the comparison view and the API always agree.
//!
//! Medians and quartiles use floor indexing into the sorted values
//! (`sorted[floor(n * p)]`), not interpolation. For even counts the median is
//! therefore the upper of the two middle values.
//!
//! The mean is summed over the values in their original order; results may
//! differ from other tools in the last floating-point digits.

use crate::models::{Histogram, StatisticsSummary};
use crate::presentation::format_currency;

/// Compute the statistics summary for a list of values.
///
/// An empty list yields the all-zero summary with `count = 0`.
pub fn compute_statistics(values: &[f64]) -> StatisticsSummary {
    let count = values.len();
    if count == 0 {
        return StatisticsSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let sum: f64 = values.iter().sum();

    StatisticsSummary {
        min: sorted[0],
        max: sorted[count - 1],
        avg: sum / count as f64,
        median: sorted[count / 2],
        q1: sorted[quantile_index(count, 0.25)],
        q3: sorted[quantile_index(count, 0.75)],
        count,
    }
}

/// `floor(count * p)`, kept inside the slice.
fn quantile_index(count: usize, p: f64) -> usize {
    ((count as f64 * p).floor() as usize).min(count - 1)
}

/// Bin values into `bin_count` equal-width bins between their min and max.
///
/// The maximum lands in the last bin. When all values are equal every value
/// lands in bin 0. Empty input or `bin_count == 0` yields an empty histogram.
pub fn compute_histogram(values: &[f64], bin_count: usize) -> Histogram {
    if values.is_empty() || bin_count == 0 {
        return Histogram::default();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_width = (max - min) / bin_count as f64;

    let bin_edges: Vec<f64> = (0..bin_count)
        .map(|i| min + i as f64 * bin_width)
        .collect();
    let bin_labels = bin_edges.iter().map(|edge| format_currency(*edge)).collect();

    let mut frequencies = vec![0usize; bin_count];
    for value in values {
        frequencies[bin_index(*value, min, bin_width, bin_count)] += 1;
    }

    Histogram {
        bin_labels,
        bin_edges,
        frequencies,
    }
}

fn bin_index(value: f64, min: f64, bin_width: f64, bin_count: usize) -> usize {
    if bin_width <= 0.0 {
        return 0;
    }
    let index = ((value - min) / bin_width).floor();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(bin_count - 1)
    }
}
