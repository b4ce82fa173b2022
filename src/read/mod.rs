//! # Read Requests
//!
//! Translates parsed command options into the request handed to the backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌───────────────┐    ┌────────────────────────────┐
//! │ "k=v" tokens │───>│ ParsedOptions │───>│ ReadRequest                │
//! └──────────────┘    └───────────────┘    │  range:  RowRange          │
//!                                          │  filter: Option<RowFilter> │
//!                                          │  limit:  Option<u64>       │
//!                                          └────────────────────────────┘
//! ```
//!
//! ## Option Mapping
//!
//! | Option         | Becomes                                   |
//! |----------------|-------------------------------------------|
//! | `prefix=P`     | `RowRange::Prefix(P)`                     |
//! | `start`/`end`  | `RowRange::Bounded`                       |
//! | `count=N`      | row limit (`0` means no limit)            |
//! | `regex=R`      | `RowFilter::RowKeyRegex(R)`               |
//! | `family=F`     | `RowFilter::FamilyRegex("^F$")`           |
//! | `version=N`    | `RowFilter::LatestN(N)`                   |
//! | `from`/`to`    | `RowFilter::TimestampRange` (unix secs)   |
//! | `value=V`      | `RowFilter::ValueRegex(V)`                |
//!
//! Filters chain in the fixed order row key → family → version → timestamp →
//! value, regardless of the order the options were typed in.
//!
//! ## Errors
//!
//! `prefix` together with `start` or `end` is rejected rather than resolved.
//! Numeric options that do not parse name themselves in the error. Nothing is
//! sent to the backend when building fails.

pub mod filter;
pub mod options;
pub mod range;

pub use filter::RowFilter;
pub use options::{OptionKey, ParsedOptions};
pub use range::RowRange;

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadRequest {
    pub range: RowRange,
    pub filter: Option<RowFilter>,
    pub limit: Option<u64>,
}

impl ReadRequest {
    pub fn from_options(opts: &ParsedOptions) -> Result<Self> {
        Ok(Self {
            range: row_range(opts)?,
            filter: row_filter(opts)?,
            limit: opts.get_u64(OptionKey::Count)?.filter(|&n| n > 0),
        })
    }
}

pub fn row_range(opts: &ParsedOptions) -> Result<RowRange> {
    let start = opts.get(OptionKey::Start);
    let end = opts.get(OptionKey::End);

    if let Some(prefix) = opts.get(OptionKey::Prefix) {
        if start.is_some() || end.is_some() {
            return Err(Error::ConflictingRange);
        }
        return Ok(RowRange::prefix(prefix.as_bytes()));
    }

    Ok(RowRange::bounded(
        start.map(|s| s.as_bytes().to_vec()),
        end.map(|e| e.as_bytes().to_vec()),
    ))
}

/// Builds the filter for `opts`, or `None` when no filter option is set.
pub fn row_filter(opts: &ParsedOptions) -> Result<Option<RowFilter>> {
    let mut filters = Vec::new();

    if let Some(regex) = opts.get(OptionKey::Regex) {
        filters.push(RowFilter::RowKeyRegex(regex.to_string()));
    }
    if let Some(family) = opts.get(OptionKey::Family) {
        filters.push(RowFilter::family(family));
    }
    if let Some(n) = latest_n(opts)? {
        filters.push(RowFilter::LatestN(n));
    }
    let start = timestamp(opts, OptionKey::From)?;
    let end = timestamp(opts, OptionKey::To)?;
    if start.is_some() || end.is_some() {
        filters.push(RowFilter::TimestampRange { start, end });
    }
    if let Some(value) = opts.get(OptionKey::Value) {
        filters.push(RowFilter::ValueRegex(value.to_string()));
    }

    Ok(RowFilter::chain(filters))
}

fn latest_n(opts: &ParsedOptions) -> Result<Option<u32>> {
    let Some(raw) = opts.get(OptionKey::Version) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(Error::InvalidNumber {
            option: OptionKey::Version.as_str(),
            value: raw.to_string(),
            expected: "positive integer",
        }),
    }
}

fn timestamp(opts: &ParsedOptions, key: OptionKey) -> Result<Option<DateTime<Utc>>> {
    let Some(secs) = opts.get_i64(key)? else {
        return Ok(None);
    };
    DateTime::from_timestamp(secs, 0)
        .map(Some)
        .ok_or_else(|| Error::InvalidNumber {
            option: key.as_str(),
            value: secs.to_string(),
            expected: "unix timestamp",
        })
}
