//! # In-Memory Tables
//!
//! A `Bigtable` implementation backed by ordered maps, used for offline
//! browsing of table dumps and as the backend under test.
//!
//! ## Layout
//!
//! ```text
//! tables: BTreeMap<table, BTreeMap<row key, Vec<Column>>>
//! ```
//!
//! Cells within a row are kept in wire order: family ascending, then
//! qualifier ascending, then newest version first. Reads return them in that
//! order without further sorting.
//!
//! ## Filter Semantics
//!
//! - Regex filters must match the whole key, family or value; `^`/`$` are
//!   implied.
//! - `LatestN(n)` keeps the first `n` cells of each column as they stand when
//!   the filter runs.
//! - `TimestampRange` is inclusive on both ends.
//! - A chain runs its members in order over the surviving cells.
//! - A row left with no cells is not returned and does not count toward the
//!   row limit.
//!
//! ## Dump Format
//!
//! ```json
//! { "tables": { "users": [
//!     { "key": "a", "cells": [
//!         { "family": "d", "qualifier": "d:row", "value": "a1", "timestamp_micros": 0 },
//!         { "family": "d", "qualifier": "d:n", "value": { "int": 7 } }
//!     ] }
//! ] } }
//! ```
//!
//! `value` is a string, `{ "int": n }`, `{ "float": x }` (both stored as 8
//! big-endian bytes) or `{ "bytes": [..] }`. A qualifier without a `:` is
//! prefixed with its family.

use super::{BackendError, BackendResult, Bigtable};
use crate::read::{ReadRequest, RowFilter};
use crate::row::{Column, Row};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{eyre, Result, WrapErr};
use regex::bytes::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Bound;
use std::path::Path;

type Table = BTreeMap<Vec<u8>, Vec<Column>>;

#[derive(Debug, Default, Clone)]
pub struct MemoryBigtable {
    tables: BTreeMap<String, Table>,
}

impl MemoryBigtable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).wrap_err_with(|| format!("failed to open {:?}", path))?;
        Self::from_reader(BufReader::new(file))
            .wrap_err_with(|| format!("failed to load table dump {:?}", path))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let dump: Dump = serde_json::from_reader(reader).wrap_err("malformed table dump")?;
        let mut db = Self::new();

        for (table, rows) in dump.tables {
            db.create_table(&table);
            for row in rows {
                for cell in row.cells {
                    let column = cell
                        .into_column()
                        .wrap_err_with(|| format!("in row {:?} of table {:?}", row.key, table))?;
                    db.insert(&table, row.key.as_bytes(), column);
                }
            }
        }

        Ok(db)
    }

    pub fn create_table(&mut self, name: &str) {
        self.tables.entry(name.to_string()).or_default();
    }

    /// Stores `column` under `key`, creating the table if needed.
    pub fn insert(&mut self, table: &str, key: impl Into<Vec<u8>>, column: Column) {
        let cells = self
            .tables
            .entry(table.to_string())
            .or_default()
            .entry(key.into())
            .or_default();

        let pos = cells
            .binary_search_by(|c| {
                c.family
                    .cmp(&column.family)
                    .then_with(|| c.qualifier.cmp(&column.qualifier))
                    .then_with(|| column.version.cmp(&c.version))
            })
            .unwrap_or_else(|pos| pos);
        cells.insert(pos, column);
    }

    fn table(&self, name: &str) -> BackendResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| BackendError::TableNotFound(name.to_string()))
    }
}

#[async_trait]
impl Bigtable for MemoryBigtable {
    async fn read_row(
        &self,
        table: &str,
        key: &[u8],
        filter: Option<&RowFilter>,
    ) -> BackendResult<Option<Row>> {
        let rows = self.table(table)?;
        let filter = filter.map(CompiledFilter::compile).transpose()?;

        let Some(cells) = rows.get(key) else {
            return Ok(None);
        };
        let cells = apply(filter.as_ref(), key, cells.clone());
        Ok((!cells.is_empty()).then(|| Row::new(key, cells)))
    }

    async fn read_rows(&self, table: &str, request: &ReadRequest) -> BackendResult<Vec<Row>> {
        let rows = self.table(table)?;
        let filter = request
            .filter
            .as_ref()
            .map(CompiledFilter::compile)
            .transpose()?;
        let limit = request
            .limit
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX);

        let start: Bound<&[u8]> = Bound::Included(request.range.start_key());
        let result = rows
            .range::<[u8], _>((start, Bound::Unbounded))
            .take_while(|(key, _)| request.range.contains(key))
            .filter_map(|(key, cells)| {
                let cells = apply(filter.as_ref(), key, cells.clone());
                (!cells.is_empty()).then(|| Row::new(key.clone(), cells))
            })
            .take(limit)
            .collect();

        Ok(result)
    }

    async fn count_rows(&self, table: &str) -> BackendResult<u64> {
        Ok(self.table(table)?.len() as u64)
    }

    async fn tables(&self) -> BackendResult<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }
}

enum CompiledFilter {
    RowKey(Regex),
    Family(Regex),
    LatestN(u32),
    TimestampRange {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    Value(Regex),
    Chain(Vec<CompiledFilter>),
}

impl CompiledFilter {
    fn compile(filter: &RowFilter) -> BackendResult<Self> {
        Ok(match filter {
            RowFilter::RowKeyRegex(re) => CompiledFilter::RowKey(full_match(re)?),
            RowFilter::FamilyRegex(re) => CompiledFilter::Family(full_match(re)?),
            RowFilter::LatestN(n) => CompiledFilter::LatestN(*n),
            RowFilter::TimestampRange { start, end } => CompiledFilter::TimestampRange {
                start: *start,
                end: *end,
            },
            RowFilter::ValueRegex(re) => CompiledFilter::Value(full_match(re)?),
            RowFilter::Chain(filters) => CompiledFilter::Chain(
                filters
                    .iter()
                    .map(CompiledFilter::compile)
                    .collect::<BackendResult<_>>()?,
            ),
        })
    }
}

fn full_match(pattern: &str) -> BackendResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| BackendError::InvalidArgument(format!("bad regex {:?}: {}", pattern, e)))
}

fn apply(filter: Option<&CompiledFilter>, key: &[u8], mut cells: Vec<Column>) -> Vec<Column> {
    let Some(filter) = filter else {
        return cells;
    };

    match filter {
        CompiledFilter::RowKey(re) => {
            if !re.is_match(key) {
                cells.clear();
            }
        }
        CompiledFilter::Family(re) => cells.retain(|c| re.is_match(c.family.as_bytes())),
        CompiledFilter::LatestN(n) => {
            let mut seen: HashMap<(String, String), u32> = HashMap::new();
            cells.retain(|c| {
                let count = seen
                    .entry((c.family.clone(), c.qualifier.clone()))
                    .or_insert(0);
                *count += 1;
                *count <= *n
            });
        }
        CompiledFilter::TimestampRange { start, end } => cells.retain(|c| {
            start.map_or(true, |s| c.version >= s) && end.map_or(true, |e| c.version <= e)
        }),
        CompiledFilter::Value(re) => cells.retain(|c| re.is_match(&c.value)),
        CompiledFilter::Chain(filters) => {
            for f in filters {
                if cells.is_empty() {
                    break;
                }
                cells = apply(Some(f), key, cells);
            }
        }
    }

    cells
}

#[derive(Deserialize)]
struct Dump {
    #[serde(default)]
    tables: BTreeMap<String, Vec<DumpRow>>,
}

#[derive(Deserialize)]
struct DumpRow {
    key: String,
    #[serde(default)]
    cells: Vec<DumpCell>,
}

#[derive(Deserialize)]
struct DumpCell {
    family: String,
    qualifier: String,
    value: DumpValue,
    #[serde(default)]
    timestamp_micros: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DumpValue {
    Text(String),
    Int { int: i64 },
    Float { float: f64 },
    Bytes { bytes: Vec<u8> },
}

impl DumpCell {
    fn into_column(self) -> Result<Column> {
        let version = DateTime::from_timestamp_micros(self.timestamp_micros)
            .ok_or_else(|| eyre!("timestamp out of range: {}", self.timestamp_micros))?;
        let value = match self.value {
            DumpValue::Text(s) => s.into_bytes(),
            DumpValue::Int { int } => int.to_be_bytes().to_vec(),
            DumpValue::Float { float } => float.to_be_bytes().to_vec(),
            DumpValue::Bytes { bytes } => bytes,
        };
        let qualifier = if self.qualifier.contains(':') {
            self.qualifier
        } else {
            format!("{}:{}", self.family, self.qualifier)
        };
        Ok(Column::new(self.family, qualifier, value, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn insert_keeps_wire_order() {
        let mut db = MemoryBigtable::new();
        db.insert("t", "k", Column::new("b", "b:x", "1", at(1)));
        db.insert("t", "k", Column::new("a", "a:y", "2", at(1)));
        db.insert("t", "k", Column::new("a", "a:x", "old", at(1)));
        db.insert("t", "k", Column::new("a", "a:x", "new", at(2)));

        let cells = &db.tables["t"][&b"k".to_vec()];
        let order: Vec<(&str, &[u8])> = cells
            .iter()
            .map(|c| (c.qualifier.as_str(), c.value.as_slice()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a:x", &b"new"[..]),
                ("a:x", &b"old"[..]),
                ("a:y", &b"2"[..]),
                ("b:x", &b"1"[..]),
            ]
        );
    }

    #[test]
    fn loads_dump() {
        let json = r#"{ "tables": {
            "users": [
                { "key": "a", "cells": [
                    { "family": "d", "qualifier": "d:row", "value": "a1", "timestamp_micros": 1000000 },
                    { "family": "d", "qualifier": "n", "value": { "int": 7 } },
                    { "family": "d", "qualifier": "d:f", "value": { "float": 2.0 } },
                    { "family": "d", "qualifier": "d:b", "value": { "bytes": [0, 255] } }
                ] },
                { "key": "empty" }
            ],
            "orders": []
        } }"#;
        let db = MemoryBigtable::from_reader(json.as_bytes()).unwrap();

        let users = &db.tables["users"];
        assert_eq!(users.len(), 1);
        let cells = &users[&b"a".to_vec()];
        let by_qualifier: HashMap<&str, &Column> =
            cells.iter().map(|c| (c.qualifier.as_str(), c)).collect();
        assert_eq!(by_qualifier["d:row"].value, b"a1");
        assert_eq!(by_qualifier["d:row"].version, at(1));
        assert_eq!(by_qualifier["d:n"].value, 7i64.to_be_bytes());
        assert_eq!(by_qualifier["d:f"].value, 2.0f64.to_be_bytes());
        assert_eq!(by_qualifier["d:b"].value, vec![0, 255]);
        assert!(db.tables.contains_key("orders"));
    }

    #[test]
    fn malformed_dump_is_an_error() {
        assert!(MemoryBigtable::from_reader(&b"{ \"tables\": 3 }"[..]).is_err());
        assert!(MemoryBigtable::from_reader(&b"not json"[..]).is_err());
    }

    #[test]
    fn bad_regex_is_invalid_argument() {
        let err = CompiledFilter::compile(&RowFilter::ValueRegex("(".into())).err().unwrap();
        assert!(matches!(err, BackendError::InvalidArgument(_)));
    }

    #[test]
    fn latest_n_counts_per_column() {
        let cells = vec![
            Column::new("d", "d:a", "a3", at(3)),
            Column::new("d", "d:a", "a2", at(2)),
            Column::new("d", "d:a", "a1", at(1)),
            Column::new("d", "d:b", "b1", at(1)),
        ];
        let kept = apply(Some(&CompiledFilter::LatestN(2)), b"k", cells);
        let values: Vec<&[u8]> = kept.iter().map(|c| c.value.as_slice()).collect();
        assert_eq!(values, vec![&b"a3"[..], &b"a2"[..], &b"b1"[..]]);
    }

    #[test]
    fn timestamp_range_is_inclusive() {
        let cells = vec![
            Column::new("d", "d:a", "3", at(3)),
            Column::new("d", "d:a", "2", at(2)),
            Column::new("d", "d:a", "1", at(1)),
        ];
        let filter = CompiledFilter::TimestampRange {
            start: Some(at(2)),
            end: Some(at(3)),
        };
        assert_eq!(apply(Some(&filter), b"k", cells).len(), 2);
    }
}
