//! # btcli Shell
//!
//! Interactive front end: read a line, run it as a command, print the
//! result, repeat.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CLI Entry Point                        │
//! │           (bin/btcli.rs: flags, config, logging)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         REPL Loop                           │
//! │  - Reads input via rustyline                                │
//! │  - Hands each line to the command handler                   │
//! │  - Writes Output to stdout, Error to stderr                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │     Commands          │    Row Printer        │   History   │
//! │  (help, ls, count,    │  decoded cell values  │  Persistent │
//! │   lookup, read, exit) │  (crate::printer)     │  ~/.btcli_* │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Browse a table dump
//! btcli --data ./users.json
//!
//! # Decode 8-byte values as integers by default
//! BTCLI_DECODE_TYPE=int btcli --data ./users.json
//! ```
//!
//! ## Streams
//!
//! Command output and error messages go to separate streams so output can be
//! piped while errors stay on the terminal. [`emit`] is the single place that
//! decides which stream a [`CommandResult`] lands on.
//!
//! ## Module Organization
//!
//! - `repl`: Main read-eval-print loop with rustyline integration
//! - `commands`: Command registry, parsing and execution
//! - `history`: History file path resolution

pub mod commands;
pub mod history;
pub mod repl;

pub use commands::{CommandHandler, CommandResult};
pub use repl::Repl;

use std::io::{self, Write};

pub const FAREWELL: &str = "Bye!";

/// Writes `result` to the matching stream. Returns `false` once the session
/// should end.
pub fn emit(result: CommandResult, out: &mut impl Write, err: &mut impl Write) -> io::Result<bool> {
    match result {
        CommandResult::Output(text) => writeln!(out, "{}", text)?,
        CommandResult::Error(msg) => writeln!(err, "{}", msg)?,
        CommandResult::Continue => {}
        CommandResult::Exit => {
            writeln!(out, "{}", FAREWELL)?;
            return Ok(false);
        }
    }
    Ok(true)
}
