//! # Client
//!
//! Synchronous front for an async [`Bigtable`] backend. The shell handles one
//! command at a time, so the client owns a current-thread tokio runtime and
//! blocks on each call. Every call is bounded by [`ClientConfig::timeout`];
//! when it expires the in-flight future is dropped and the call fails with
//! [`BackendError::Timeout`]. Nothing is retried.

use crate::backend::{BackendError, BackendResult, Bigtable};
use crate::read::{ReadRequest, RowFilter};
use crate::row::Row;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound on a single backend call.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct Client<B> {
    backend: B,
    runtime: Runtime,
    timeout: Duration,
}

impl<B: Bigtable> Client<B> {
    pub fn new(backend: B, config: ClientConfig) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_time().build()?;
        Ok(Self {
            backend,
            runtime,
            timeout: config.timeout,
        })
    }

    pub fn read_row(
        &self,
        table: &str,
        key: &[u8],
        filter: Option<&RowFilter>,
    ) -> BackendResult<Option<Row>> {
        debug!(table, key = %String::from_utf8_lossy(key), ?filter, "read_row");
        self.call(self.backend.read_row(table, key, filter))
    }

    pub fn read_rows(&self, table: &str, request: &ReadRequest) -> BackendResult<Vec<Row>> {
        debug!(table, ?request, "read_rows");
        let rows = self.call(self.backend.read_rows(table, request))?;
        debug!(table, rows = rows.len(), "read_rows returned");
        Ok(rows)
    }

    pub fn count_rows(&self, table: &str) -> BackendResult<u64> {
        debug!(table, "count_rows");
        self.call(self.backend.count_rows(table))
    }

    pub fn tables(&self) -> BackendResult<Vec<String>> {
        debug!("tables");
        self.call(self.backend.tables())
    }

    fn call<T, F>(&self, fut: F) -> BackendResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        let timeout = self.timeout;
        self.runtime.block_on(async move {
            tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| BackendError::Timeout(timeout))?
        })
    }
}
