//! # Row and Column Values
//!
//! Plain value objects for data fetched from a table. A [`Row`] owns its key
//! and the cells the backend returned for it, in the order the backend
//! returned them. Nothing here sorts; ordering is a backend contract.
//!
//! ```text
//! Row { key: b"user#42" }
//!   ├── Column { family: "d", qualifier: "d:name", value: b"alice", version: 2018-01-01T00:00:00Z }
//!   └── Column { family: "d", qualifier: "d:age",  value: [0,0,0,0,0,0,0,30], version: ... }
//! ```

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: Vec<u8>,
    pub columns: Vec<Column>,
}

impl Row {
    pub fn new(key: impl Into<Vec<u8>>, columns: Vec<Column>) -> Self {
        Self {
            key: key.into(),
            columns,
        }
    }

    /// Key rendered for display. Invalid UTF-8 is replaced, the key itself is opaque.
    pub fn display_key(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One cell: a (qualifier, version) pair and its stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub family: String,
    pub qualifier: String,
    pub value: Vec<u8>,
    pub version: DateTime<Utc>,
}

impl Column {
    pub fn new(
        family: impl Into<String>,
        qualifier: impl Into<String>,
        value: impl Into<Vec<u8>>,
        version: DateTime<Utc>,
    ) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
            version,
        }
    }
}

/// The column name without its family prefix (`d:row` -> `row`).
pub fn local_name(qualifier: &str) -> &str {
    match qualifier.find(':') {
        Some(idx) => &qualifier[idx + 1..],
        None => qualifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_family_prefix() {
        assert_eq!(local_name("d:row"), "row");
        assert_eq!(local_name("d:a:b"), "a:b");
        assert_eq!(local_name("row"), "row");
        assert_eq!(local_name("d:"), "");
    }

    #[test]
    fn display_key_replaces_invalid_utf8() {
        let row = Row::new(vec![b'a', 0xff], vec![]);
        assert_eq!(row.display_key(), "a\u{fffd}");
        assert!(row.is_empty());
    }
}
