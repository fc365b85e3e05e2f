//! Statistics, aggregation and comparison over salary records.
//!
//! This module provides the computations shared by every endpoint.

pub mod aggregator;
pub mod comparison;
pub mod statistics;

pub use aggregator::{agency_counts, distinct_agency_count, distinct_sorted, top_agencies_by_average};
pub use comparison::{compare, Comparison, Selection};
pub use statistics::{compute_histogram, compute_statistics};
