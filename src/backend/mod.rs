//! # Database Access
//!
//! The shell talks to its database through [`Bigtable`], a deliberately
//! narrow trait: four reads and nothing else.
//!
//! | Method       | Used by   | Semantics                                   |
//! |--------------|-----------|---------------------------------------------|
//! | `read_row`   | `lookup`  | exact key, optional filter, `None` if absent |
//! | `read_rows`  | `read`    | range scan with filter and row limit        |
//! | `count_rows` | `count`   | number of rows in the table                 |
//! | `tables`     | `ls`      | table names, sorted                         |
//!
//! Implementations are async so a network client can be slotted in; the
//! shell drives them through [`crate::client::Client`], which owns the
//! runtime and bounds every call with a timeout.
//!
//! [`memory::MemoryBigtable`] is the in-process implementation.

pub mod memory;

use crate::read::{ReadRequest, RowFilter};
use crate::row::Row;
use async_trait::async_trait;
use std::time::Duration;

pub use memory::MemoryBigtable;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The backend rejected the request, e.g. a filter regex that does not compile.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("deadline exceeded after {0:?}")]
    Timeout(Duration),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[async_trait]
pub trait Bigtable: Send + Sync {
    async fn read_row(
        &self,
        table: &str,
        key: &[u8],
        filter: Option<&RowFilter>,
    ) -> BackendResult<Option<Row>>;

    async fn read_rows(&self, table: &str, request: &ReadRequest) -> BackendResult<Vec<Row>>;

    async fn count_rows(&self, table: &str) -> BackendResult<u64>;

    async fn tables(&self) -> BackendResult<Vec<String>>;
}
