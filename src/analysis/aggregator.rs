//! Grouping and ranking of salary records.
//!
//! This module groups records by a categorical key (usually the agency),
//! reduces each group to a single metric and ranks the groups.

use crate::models::{AgencyAggregate, SalaryRecord};
use std::collections::{BTreeSet, HashMap};

/// How each group is reduced to its metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceKind {
    /// Number of records in the group.
    Count,
    /// Mean salary of the group.
    Mean,
}

/// Group records by `key_fn` and reduce each group.
///
/// The result is sorted by metric, highest first, with ties ordered by key.
/// Truncation (e.g. top 10) is left to the caller.
pub fn group_and_reduce<F>(
    records: &[SalaryRecord],
    key_fn: F,
    kind: ReduceKind,
) -> Vec<AgencyAggregate>
where
    F: Fn(&SalaryRecord) -> &str,
{
    // (count, salary total) per key
    let mut grouped: HashMap<&str, (usize, f64)> = HashMap::new();

    for record in records {
        let entry = grouped.entry(key_fn(record)).or_default();
        entry.0 += 1;
        entry.1 += record.salary;
    }

    let mut aggregates: Vec<AgencyAggregate> = grouped
        .into_iter()
        .map(|(name, (count, total))| {
            let metric = match kind {
                ReduceKind::Count => count as f64,
                // A group only exists once a record mapped to it, so count >= 1.
                ReduceKind::Mean => total / count as f64,
            };
            AgencyAggregate {
                name: name.to_string(),
                count,
                metric,
            }
        })
        .collect();

    sort_by_metric(&mut aggregates);
    aggregates
}

/// Employee count per agency, largest first.
pub fn agency_counts(records: &[SalaryRecord]) -> Vec<AgencyAggregate> {
    group_and_reduce(records, |r| r.agency.as_str(), ReduceKind::Count)
}

/// Mean salary per agency, highest first, truncated to `n` entries.
pub fn top_agencies_by_average(records: &[SalaryRecord], n: usize) -> Vec<AgencyAggregate> {
    let mut ranked = group_and_reduce(records, |r| r.agency.as_str(), ReduceKind::Mean);
    ranked.truncate(n);
    ranked
}

/// Sort aggregates by metric descending, then by name ascending.
pub fn sort_by_metric(aggregates: &mut [AgencyAggregate]) {
    aggregates.sort_by(|a, b| {
        b.metric
            .total_cmp(&a.metric)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Sorted, de-duplicated values of a string column.
pub fn distinct_sorted<'a, F>(records: &'a [SalaryRecord], value_fn: F) -> Vec<String>
where
    F: Fn(&'a SalaryRecord) -> &'a str,
{
    records
        .iter()
        .map(value_fn)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Number of distinct agencies among the records.
pub fn distinct_agency_count(records: &[SalaryRecord]) -> usize {
    records
        .iter()
        .map(|r| r.agency.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}
