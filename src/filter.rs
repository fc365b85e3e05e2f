//! Filter criteria and their translation into predicate clauses.
//!
//! User-supplied filters (query strings, request bodies) are parsed into a
//! [`FilterCriteria`], which [`translate`] turns into the ordered list of
//! [`Clause`]s a record store executes. Clauses are ANDed together; the
//! values of a membership clause are ORed.

use crate::models::{Field, SalaryRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// What to do with a numeric filter value that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Reject the request with a validation error.
    #[default]
    Strict,
    /// Treat the bound as absent.
    Lenient,
}

/// Errors raised while parsing raw filter input.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Query intent; absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub agencies: Option<BTreeSet<String>>,
    pub job_title_substring: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub year: Option<i32>,
}

/// One normalized filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field value is one of `values`.
    Membership {
        field: Field,
        values: BTreeSet<String>,
    },
    /// Field contains `text`.
    SubstringMatch {
        field: Field,
        text: String,
        case_insensitive: bool,
    },
    /// Field is greater than or equal to `bound`.
    RangeGte { field: Field, bound: f64 },
    /// Field is less than or equal to `bound`.
    RangeLte { field: Field, bound: f64 },
    /// Field equals `value`.
    Equals { field: Field, value: i64 },
}

impl Clause {
    /// Evaluate the clause against a record held in memory.
    pub fn matches(&self, record: &SalaryRecord) -> bool {
        match self {
            Clause::Membership { field, values } => {
                text_value(record, *field).is_some_and(|v| values.contains(v))
            }
            Clause::SubstringMatch {
                field,
                text,
                case_insensitive,
            } => text_value(record, *field).is_some_and(|v| {
                if *case_insensitive {
                    v.to_lowercase().contains(&text.to_lowercase())
                } else {
                    v.contains(text.as_str())
                }
            }),
            Clause::RangeGte { field, bound } => {
                numeric_value(record, *field).is_some_and(|v| v >= *bound)
            }
            Clause::RangeLte { field, bound } => {
                numeric_value(record, *field).is_some_and(|v| v <= *bound)
            }
            Clause::Equals { field, value } => {
                numeric_value(record, *field).is_some_and(|v| v == *value as f64)
            }
        }
    }

    /// Field the clause constrains.
    pub fn field(&self) -> Field {
        match self {
            Clause::Membership { field, .. }
            | Clause::SubstringMatch { field, .. }
            | Clause::RangeGte { field, .. }
            | Clause::RangeLte { field, .. }
            | Clause::Equals { field, .. } => *field,
        }
    }
}

fn text_value(record: &SalaryRecord, field: Field) -> Option<&str> {
    match field {
        Field::Agency => Some(record.agency.as_str()),
        Field::JobTitle => Some(record.job_title.as_str()),
        Field::Salary | Field::Year => None,
    }
}

fn numeric_value(record: &SalaryRecord, field: Field) -> Option<f64> {
    match field {
        Field::Salary => Some(record.salary),
        Field::Year => record.year.map(f64::from),
        Field::Agency | Field::JobTitle => None,
    }
}

/// Translate criteria into predicate clauses.
///
/// Each present field yields exactly one clause, in the order agency,
/// job title, minimum salary, maximum salary, year. Empty criteria yield no
/// clauses and match every record.
pub fn translate(criteria: &FilterCriteria) -> Vec<Clause> {
    let mut clauses = Vec::new();

    if let Some(ref agencies) = criteria.agencies {
        clauses.push(Clause::Membership {
            field: Field::Agency,
            values: agencies.clone(),
        });
    }

    if let Some(ref text) = criteria.job_title_substring {
        clauses.push(Clause::SubstringMatch {
            field: Field::JobTitle,
            text: text.clone(),
            case_insensitive: true,
        });
    }

    if let Some(bound) = criteria.min_salary {
        clauses.push(Clause::RangeGte {
            field: Field::Salary,
            bound,
        });
    }

    if let Some(bound) = criteria.max_salary {
        clauses.push(Clause::RangeLte {
            field: Field::Salary,
            bound,
        });
    }

    if let Some(year) = criteria.year {
        clauses.push(Clause::Equals {
            field: Field::Year,
            value: i64::from(year),
        });
    }

    clauses
}

/// Raw, string-typed filters as they arrive in a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilters {
    /// Comma-separated agency names.
    pub agency: Option<String>,
    pub job_title: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
    pub year: Option<String>,
}

impl RawFilters {
    /// Parse into criteria. Empty strings count as absent.
    pub fn parse(&self, policy: ParsePolicy) -> Result<FilterCriteria, FilterError> {
        Ok(FilterCriteria {
            agencies: self.agency.as_deref().and_then(split_agencies),
            job_title_substring: non_empty(self.job_title.as_deref()).map(String::from),
            min_salary: parse_salary(self.min_salary.as_deref(), "min_salary", policy)?,
            max_salary: parse_salary(self.max_salary.as_deref(), "max_salary", policy)?,
            year: parse_number(self.year.as_deref(), "year", policy, |_: &i32| true)?,
        })
    }
}

impl FilterCriteria {
    /// Criteria for one exact agency and an optional job title substring.
    pub fn for_selection(agency: Option<&str>, job_title: Option<&str>) -> Self {
        Self {
            agencies: non_empty(agency).map(|a| BTreeSet::from([a.to_string()])),
            job_title_substring: non_empty(job_title).map(String::from),
            ..Self::default()
        }
    }

    /// Whether no constraint is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn split_agencies(raw: &str) -> Option<BTreeSet<String>> {
    let agencies: BTreeSet<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();

    if agencies.is_empty() {
        None
    } else {
        Some(agencies)
    }
}

fn parse_salary(
    raw: Option<&str>,
    field: &'static str,
    policy: ParsePolicy,
) -> Result<Option<f64>, FilterError> {
    // "NaN" and "inf" parse as f64 but are not usable bounds
    parse_number(raw, field, policy, |v: &f64| v.is_finite())
}

fn parse_number<T, F>(
    raw: Option<&str>,
    field: &'static str,
    policy: ParsePolicy,
    accept: F,
) -> Result<Option<T>, FilterError>
where
    T: std::str::FromStr,
    F: Fn(&T) -> bool,
{
    let Some(value) = non_empty(raw) else {
        return Ok(None);
    };

    match value.parse::<T>() {
        Ok(parsed) if accept(&parsed) => Ok(Some(parsed)),
        _ => match policy {
            ParsePolicy::Lenient => Ok(None),
            ParsePolicy::Strict => Err(FilterError::InvalidNumber {
                field,
                value: value.to_string(),
            }),
        },
    }
}
