//! Data models for the salary dashboard.
//!
//! This module contains the record type fetched from the record store and
//! the derived values (statistics, histograms, aggregates) that are computed
//! from it on every request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One employee compensation entry as stored in the record store.
///
/// String fields default to empty so that projected fetches (e.g. only
/// `salary`) still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// Employing agency (non-unique).
    #[serde(default)]
    pub agency: String,
    /// Job title as recorded by the agency.
    #[serde(default)]
    pub job_title: String,
    /// Annual salary.
    #[serde(default)]
    pub salary: f64,
    /// Reporting year, absent in some data sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl SalaryRecord {
    /// Creates a record without a reporting year.
    #[cfg(test)]
    pub fn new(agency: &str, job_title: &str, salary: f64) -> Self {
        Self {
            agency: agency.to_string(),
            job_title: job_title.to_string(),
            salary,
            year: None,
        }
    }
}

/// Columns of the salary table that predicates and projections refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Agency,
    JobTitle,
    Salary,
    Year,
}

impl Field {
    /// Column name in the record store.
    pub fn column(&self) -> &'static str {
        match self {
            Field::Agency => "agency",
            Field::JobTitle => "job_title",
            Field::Salary => "salary",
            Field::Year => "year",
        }
    }
}

/// Fixed descriptive statistics over a list of salaries.
///
/// When `count` is zero every numeric field is `0`, never absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub count: usize,
}

/// Binned frequency distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Human-readable lower edge of each bin.
    pub bin_labels: Vec<String>,
    /// Numeric lower edge of each bin.
    pub bin_edges: Vec<f64>,
    /// Number of observations per bin.
    pub frequencies: Vec<usize>,
}

impl Histogram {
    /// Total number of binned observations.
    pub fn total(&self) -> usize {
        self.frequencies.iter().sum()
    }
}

/// A grouped, reduced metric keyed by agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyAggregate {
    /// Group key.
    pub name: String,
    /// Number of records in the group (always at least 1).
    pub count: usize,
    /// Reduced value: the count itself or the mean salary.
    pub metric: f64,
}

/// Entry of the `/api/agencies` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyCount {
    pub name: String,
    pub count: usize,
}

impl From<AgencyAggregate> for AgencyCount {
    fn from(aggregate: AgencyAggregate) -> Self {
        Self {
            name: aggregate.name,
            count: aggregate.count,
        }
    }
}

/// Entry of the dashboard's average-salary ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyAverage {
    pub name: String,
    pub avg: f64,
    pub count: usize,
}

impl From<AgencyAggregate> for AgencyAverage {
    fn from(aggregate: AgencyAggregate) -> Self {
        Self {
            name: aggregate.name,
            avg: aggregate.metric,
            count: aggregate.count,
        }
    }
}

/// Headline numbers for the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub total_agencies: usize,
    pub avg_salary: f64,
    pub top_agencies: Vec<AgencyAverage>,
}

/// How far apart two selections' average salaries are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disparity {
    Low,
    Moderate,
    High,
    /// The gap percentage could not be computed.
    Undetermined,
}

impl fmt::Display for Disparity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disparity::Low => write!(f, "Low"),
            Disparity::Moderate => write!(f, "Moderate"),
            Disparity::High => write!(f, "High"),
            Disparity::Undetermined => write!(f, "Undetermined"),
        }
    }
}
