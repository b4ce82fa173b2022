//! # Server-Side Filters
//!
//! Filters reduce what a read returns before it leaves the backend. Several
//! filters combine into a [`RowFilter::Chain`], which applies its members in
//! order, each one seeing only the cells the previous one kept:
//!
//! ```text
//! cells ──> RowKeyRegex ──> FamilyRegex ──> LatestN ──> TimestampRange ──> ValueRegex ──> result
//! ```
//!
//! Order is part of the meaning. `family=d version=1` keeps the newest cell of
//! each column in family `d`; it is not the same as taking the newest cells
//! first and then dropping the other families.
//!
//! A chain of one is never built: [`RowFilter::chain`] unwraps it.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    RowKeyRegex(String),
    FamilyRegex(String),
    /// Keep the `n` most recent cells of every column.
    LatestN(u32),
    /// Keep cells written within `[start, end]`. A missing side is unbounded.
    TimestampRange {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    ValueRegex(String),
    Chain(Vec<RowFilter>),
}

impl RowFilter {
    /// Exact family match, anchored so `d` does not match `dd`.
    pub fn family(name: &str) -> Self {
        RowFilter::FamilyRegex(format!("^{}$", regex::escape(name)))
    }

    /// Combines `filters` into one filter. Returns `None` for an empty list and
    /// the filter itself for a list of one.
    pub fn chain(mut filters: Vec<RowFilter>) -> Option<RowFilter> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(RowFilter::Chain(filters)),
        }
    }

    /// Flattened view of the filters applied, in order.
    pub fn steps(&self) -> Vec<&RowFilter> {
        match self {
            RowFilter::Chain(filters) => filters.iter().flat_map(RowFilter::steps).collect(),
            other => vec![other],
        }
    }
}
