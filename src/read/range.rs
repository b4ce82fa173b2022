//! # Row Ranges
//!
//! A scan covers one half-open interval of row keys. Three shapes exist:
//!
//! | Shape    | Built from          | Interval                       |
//! |----------|---------------------|--------------------------------|
//! | Infinite | no range options    | all keys                       |
//! | Prefix   | `prefix=P`          | `[P, successor(P))`            |
//! | Bounded  | `start=S` / `end=E` | `[S, E)`, `[S, ∞)`, `(−∞, E)`  |
//!
//! ## Prefix Successor
//!
//! The exclusive upper bound of a prefix range is the smallest key greater
//! than every key starting with the prefix: drop trailing `0xff` bytes, then
//! increment the last remaining byte.
//!
//! ```text
//! "1"        -> "2"
//! "a\xff"    -> "b"
//! "\xff\xff" -> unbounded
//! ```

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowRange {
    #[default]
    Infinite,
    Prefix(Vec<u8>),
    Bounded {
        start: Option<Vec<u8>>,
        end: Option<Vec<u8>>,
    },
}

impl RowRange {
    pub fn prefix(prefix: impl Into<Vec<u8>>) -> Self {
        RowRange::Prefix(prefix.into())
    }

    /// `[start, end)` with either side optional. Both absent yields `Infinite`.
    pub fn bounded(start: Option<Vec<u8>>, end: Option<Vec<u8>>) -> Self {
        match (start, end) {
            (None, None) => RowRange::Infinite,
            (start, end) => RowRange::Bounded { start, end },
        }
    }

    /// Inclusive lower bound. An empty slice means unbounded.
    pub fn start_key(&self) -> &[u8] {
        match self {
            RowRange::Infinite => &[],
            RowRange::Prefix(prefix) => prefix,
            RowRange::Bounded { start, .. } => start.as_deref().unwrap_or(&[]),
        }
    }

    /// Exclusive upper bound, `None` when unbounded.
    pub fn end_key(&self) -> Option<Cow<'_, [u8]>> {
        match self {
            RowRange::Infinite => None,
            RowRange::Prefix(prefix) => prefix_successor(prefix).map(Cow::Owned),
            RowRange::Bounded { end, .. } => end.as_deref().map(Cow::Borrowed),
        }
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        if let RowRange::Prefix(prefix) = self {
            return key.starts_with(prefix);
        }
        if key < self.start_key() {
            return false;
        }
        match self.end_key() {
            Some(end) => key < end.as_ref(),
            None => true,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, RowRange::Infinite)
    }
}

/// Smallest key greater than every key with `prefix`, or `None` when the
/// prefix is empty or all `0xff`.
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&b| b != 0xff)?;
    let mut successor = prefix[..=last].to_vec();
    successor[last] += 1;
    Some(successor)
}
