//! Side-by-side comparison of two selections.
//!
//! Each selection is fetched and summarized on its own; the only derived
//! cross-selection value is the pay gap between the two averages.

use super::statistics::{compute_histogram, compute_statistics};
use crate::filter::{translate, FilterCriteria};
use crate::models::{Disparity, Field, Histogram, StatisticsSummary};
use crate::presentation::{format_currency, format_percent};
use crate::store::{RecordStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gap percentage above which disparity is high.
const HIGH_DISPARITY_PERCENT: f64 = 20.0;
/// Gap percentage above which disparity is moderate.
const MODERATE_DISPARITY_PERCENT: f64 = 10.0;

/// One side of a comparison: an agency and an optional job title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
}

impl Selection {
    /// Filter criteria for this selection.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::for_selection(self.agency.as_deref(), self.job_title.as_deref())
    }

    /// Display label, `"<agency> - <job title>"`.
    pub fn label(&self) -> String {
        let agency = self.agency.as_deref().unwrap_or("").trim();
        match self.job_title.as_deref().map(str::trim) {
            Some(job) if !job.is_empty() => format!("{} - {}", agency, job),
            _ => agency.to_string(),
        }
    }
}

/// Statistics for one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub label: String,
    #[serde(flatten)]
    pub stats: StatisticsSummary,
    pub salaries: Vec<f64>,
    pub histogram: Histogram,
}

/// Derived comparison between the two averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Absolute difference between the averages.
    pub pay_gap: f64,
    /// Gap relative to the lower average; `None` when undefined.
    pub pay_gap_percent: Option<f64>,
    /// Formatted gap, e.g. `$5,000 (7.1%)`.
    pub pay_gap_label: String,
    /// Label of the selection with the higher average.
    pub higher_average: String,
    pub disparity: Disparity,
}

/// Result of comparing two selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub selection1: SelectionResult,
    pub selection2: SelectionResult,
    pub insights: Insights,
}

/// Fetch both selections concurrently and summarize each.
///
/// A failure of either fetch fails the whole comparison.
pub async fn compare(
    store: &dyn RecordStore,
    first: &Selection,
    second: &Selection,
    bin_count: usize,
) -> Result<Comparison, StoreError> {
    let clauses_first = translate(&first.criteria());
    let clauses_second = translate(&second.criteria());

    let (rows_first, rows_second) = futures::try_join!(
        store.fetch(&clauses_first, &[Field::Salary]),
        store.fetch(&clauses_second, &[Field::Salary]),
    )?;

    debug!(
        "Comparison fetched {} and {} rows",
        rows_first.len(),
        rows_second.len()
    );

    let selection1 = summarize(first, rows_first.iter().map(|r| r.salary).collect(), bin_count);
    let selection2 = summarize(second, rows_second.iter().map(|r| r.salary).collect(), bin_count);
    let insights = insights(&selection1, &selection2);

    Ok(Comparison {
        selection1,
        selection2,
        insights,
    })
}

fn summarize(selection: &Selection, salaries: Vec<f64>, bin_count: usize) -> SelectionResult {
    SelectionResult {
        label: selection.label(),
        stats: compute_statistics(&salaries),
        histogram: compute_histogram(&salaries, bin_count),
        salaries,
    }
}

/// Compute the pay-gap insights between two summarized selections.
pub fn insights(first: &SelectionResult, second: &SelectionResult) -> Insights {
    let avg_first = first.stats.avg;
    let avg_second = second.stats.avg;

    let pay_gap = (avg_first - avg_second).abs();
    let percent = pay_gap_percent(avg_first, avg_second);

    let higher_average = if avg_first > avg_second {
        first.label.clone()
    } else {
        second.label.clone()
    };

    let pay_gap_label = match percent {
        Some(p) => format!("{} ({})", format_currency(pay_gap), format_percent(p)),
        None => format!("{} (n/a)", format_currency(pay_gap)),
    };

    Insights {
        pay_gap,
        pay_gap_percent: percent,
        pay_gap_label,
        higher_average,
        disparity: classify_disparity(percent),
    }
}

/// `|a - b| / min(a, b) * 100`.
///
/// With a zero denominator the result is `0` when both averages are equal
/// and `None` otherwise.
pub fn pay_gap_percent(avg_first: f64, avg_second: f64) -> Option<f64> {
    let gap = (avg_first - avg_second).abs();
    let denominator = avg_first.min(avg_second);

    if denominator == 0.0 {
        return if gap == 0.0 { Some(0.0) } else { None };
    }

    let percent = gap / denominator * 100.0;
    percent.is_finite().then_some(percent)
}

/// Classify a gap percentage.
pub fn classify_disparity(percent: Option<f64>) -> Disparity {
    match percent {
        Some(p) if p > HIGH_DISPARITY_PERCENT => Disparity::High,
        Some(p) if p > MODERATE_DISPARITY_PERCENT => Disparity::Moderate,
        Some(_) => Disparity::Low,
        None => Disparity::Undetermined,
    }
}
