//! # btcli - Interactive Bigtable Shell
//!
//! btcli is an interactive shell for browsing a wide-column, Bigtable-style
//! database: list tables, count rows, look up a single row, and scan row
//! ranges with server-side filters. Cell values are raw bytes; 8-byte values
//! can be decoded as big-endian integers or doubles.
//!
//! ## Quick Start
//!
//! ```ignore
//! use btcli::{Client, ClientConfig, CommandHandler, MemoryBigtable};
//!
//! let db = MemoryBigtable::load(Path::new("./users.json"))?;
//! let client = Client::new(db, ClientConfig::default())?;
//! let handler = CommandHandler::new(client, None);
//!
//! handler.execute("read users prefix=user# family=d version=1 decode=int");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     REPL (rustyline) + bin/btcli     │
//! ├─────────────────────────────────────┤
//! │   Command Handler (cli::commands)    │
//! ├──────────────────┬──────────────────┤
//! │  Range & Filter  │  Decode/Printer   │
//! │  Builder (read)  │  (decode,printer) │
//! ├──────────────────┴──────────────────┤
//! │   Client (timeout, tokio runtime)    │
//! ├─────────────────────────────────────┤
//! │   Bigtable trait │ MemoryBigtable    │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`row`]: Row and column value objects
//! - [`read`]: `key=value` option parsing, row ranges, filter chains
//! - [`decode`]: Big-endian value decoding and quoting
//! - [`printer`]: Row rendering
//! - [`backend`]: The `Bigtable` trait and the in-memory implementation
//! - [`client`]: Blocking, timeout-bounded front for a backend
//! - [`cli`]: Command handler, REPL and history
//! - [`config`]: rc-file settings

pub mod backend;
pub mod cli;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod printer;
pub mod read;
pub mod row;

pub use backend::{BackendError, Bigtable, MemoryBigtable};
pub use cli::{CommandHandler, CommandResult};
pub use client::{Client, ClientConfig};
pub use decode::{DecodeConfig, DecodeType};
pub use error::{Error, Result};
pub use read::ReadRequest;
pub use row::{Column, Row};
