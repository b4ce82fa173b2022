//! # REPL - Read-Eval-Print Loop
//!
//! The main interactive loop for the btcli shell. Handles:
//!
//! - Reading input with rustyline (history, line editing)
//! - Dispatching each line to the [`CommandHandler`]
//! - Routing results to stdout/stderr through [`emit`]
//!
//! ## Execution Flow
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Read Line                             │
//! └──────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │              Blank?  ── yes ──> [Loop]                    │
//! └──────────────────────────────────────────────────────────┘
//!                           │ no
//!                           ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │   Known command? record in history                        │
//! │   Execute, emit result                                    │
//! └──────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!              Exit? ── yes ──> save history, return
//!                           │ no
//!                           ▼
//!                       [Loop]
//! ```
//!
//! ## Error Handling
//!
//! Command errors are displayed but do not terminate the REPL.
//! Use `exit`, `quit` or Ctrl+D to leave.

use crate::backend::Bigtable;
use crate::cli::commands::CommandHandler;
use crate::cli::{emit, FAREWELL};
use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

const PROMPT: &str = "btcli> ";

pub struct Repl<B> {
    handler: CommandHandler<B>,
    editor: DefaultEditor,
    history: Option<PathBuf>,
    target: String,
}

impl<B: Bigtable> Repl<B> {
    /// `target` names what the shell is connected to in the welcome banner.
    pub fn new(handler: CommandHandler<B>, history: Option<PathBuf>, target: String) -> Result<Self> {
        let mut editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;

        if let Some(history_file) = &history {
            if let Err(e) = editor.load_history(history_file) {
                debug!(path = %history_file.display(), error = %e, "no history loaded");
            }
        }

        Ok(Self {
            handler,
            editor,
            history,
            target,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if !self.handle_line(&line)? {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", FAREWELL);
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<bool> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Ok(true);
        }

        if CommandHandler::<B>::is_command(trimmed) {
            self.editor.add_history_entry(trimmed).ok();
        }

        let result = self.handler.execute(trimmed);
        emit(result, &mut io::stdout().lock(), &mut io::stderr().lock())
            .wrap_err("failed to write command result")
    }

    fn print_welcome(&self) {
        println!("btcli version {}", env!("CARGO_PKG_VERSION"));
        println!("Enter \"help\" for usage hints.");
        println!("Connected to: {}", self.target);
        println!();
    }

    fn save_history(&mut self) {
        if let Some(history_file) = &self.history {
            if let Err(e) = self.editor.save_history(history_file) {
                warn!(path = %history_file.display(), error = %e, "could not save history");
            }
        }
    }
}
