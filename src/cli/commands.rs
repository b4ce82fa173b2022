//! # Command Handler
//!
//! Parses and executes shell commands. A line is trimmed, split on
//! whitespace, and its first word looked up by exact name in [`COMMANDS`].
//!
//! ## Supported Commands
//!
//! | Command                       | Description                         |
//! |-------------------------------|-------------------------------------|
//! | `help [<command>]`            | General usage, or one command's     |
//! | `ls`                          | List tables                         |
//! | `count <table>`               | Count table rows                    |
//! | `lookup <table> <row> [k=v]`  | Read a single row                   |
//! | `read <table> [k=v]`          | Scan a range of rows                |
//! | `exit` / `quit`               | Leave the shell                     |
//!
//! ## Results
//!
//! Every command returns a [`CommandResult`]; nothing here touches stdout or
//! ends the process:
//! - Output: text for the output stream
//! - Error: message for the error stream, the session continues
//! - Exit: the caller says goodbye and stops reading
//! - Continue: nothing to print
//!
//! Argument errors are caught before the backend is called.

use crate::backend::Bigtable;
use crate::client::Client;
use crate::decode::{DecodeConfig, DecodeType};
use crate::error::Result;
use crate::printer::render_rows;
use crate::read::{self, OptionKey, ParsedOptions, ReadRequest};
use tracing::debug;

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Output(String),
    Exit,
    Continue,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Help,
    Ls,
    Count,
    Lookup,
    Read,
    Exit,
}

#[derive(Debug)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// Positional arguments required after the command name.
    pub min_args: usize,
    kind: CommandKind,
}

pub const LOOKUP_OPTIONS: &[OptionKey] = &[
    OptionKey::Family,
    OptionKey::Version,
    OptionKey::Decode,
    OptionKey::DecodeColumns,
];

pub static COMMANDS: &[Command] = &[
    Command {
        name: "help",
        description: "Show help for commands",
        usage: "help [<command>]",
        min_args: 0,
        kind: CommandKind::Help,
    },
    Command {
        name: "ls",
        description: "List tables",
        usage: "ls",
        min_args: 0,
        kind: CommandKind::Ls,
    },
    Command {
        name: "count",
        description: "Count table rows",
        usage: "count <table>",
        min_args: 1,
        kind: CommandKind::Count,
    },
    Command {
        name: "lookup",
        description: "Read a single row",
        usage: "lookup <table> <row> [family=<column_family>] [version=<n>] [decode=<type>] [decode_columns=<columns>]
    family         Read only columns of family <column_family>
    version        Read only the latest <n> versions of each column
    decode         Decode 8-byte values as <string|int|float|auto>
    decode_columns Per-column decode types: <column>:<type>[,<column>:<type>...]",
        min_args: 2,
        kind: CommandKind::Lookup,
    },
    Command {
        name: "read",
        description: "Read a range of rows",
        usage: "read <table> [start=<row>] [end=<row>] [prefix=<prefix>] [family=<column_family>] [value=<regex>] [version=<n>] [from=<unixtime>] [to=<unixtime>] [count=<n>] [regex=<regex>] [decode=<type>] [decode_columns=<columns>]
    start          Start reading at this row
    end            Stop reading before this row
    prefix         Read rows with this prefix
    family         Read only columns of family <column_family>
    value          Read only cells whose value matches <regex>
    version        Read only the latest <n> versions of each column
    from           Read cells written at or after this unixtime
    to             Read cells written at or before this unixtime
    count          Read at most <n> rows
    regex          Read rows whose key matches <regex>
    decode         Decode 8-byte values as <string|int|float|auto>
    decode_columns Per-column decode types: <column>:<type>[,<column>:<type>...]",
        min_args: 1,
        kind: CommandKind::Read,
    },
    Command {
        name: "exit",
        description: "Exit this prompt",
        usage: "exit",
        min_args: 0,
        kind: CommandKind::Exit,
    },
    Command {
        name: "quit",
        description: "Exit this prompt",
        usage: "quit",
        min_args: 0,
        kind: CommandKind::Exit,
    },
];

pub fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.name == name)
}

pub struct CommandHandler<B> {
    client: Client<B>,
    default_decode: Option<DecodeType>,
}

impl<B: Bigtable> CommandHandler<B> {
    pub fn new(client: Client<B>, default_decode: Option<DecodeType>) -> Self {
        Self {
            client,
            default_decode,
        }
    }

    /// True if the line starts with a registered command name.
    pub fn is_command(input: &str) -> bool {
        input
            .split_whitespace()
            .next()
            .and_then(find_command)
            .is_some()
    }

    pub fn execute(&self, input: &str) -> CommandResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&name, args)) = parts.split_first() else {
            return CommandResult::Continue;
        };

        let Some(command) = find_command(name) else {
            return CommandResult::Error(format!("Unknown command: {}", name));
        };

        if args.len() < command.min_args {
            return CommandResult::Error(format!("Invalid args: {}", command.usage));
        }

        let result = match command.kind {
            CommandKind::Help => Ok(help(args)),
            CommandKind::Ls => self.list_tables(),
            CommandKind::Count => self.count(args[0]),
            CommandKind::Lookup => self.lookup(args[0], args[1], &args[2..]),
            CommandKind::Read => self.read(args[0], &args[1..]),
            CommandKind::Exit => Ok(CommandResult::Exit),
        };

        result.unwrap_or_else(|err| {
            if !err.is_argument_error() {
                debug!(command = command.name, error = %err, "backend call failed");
            }
            CommandResult::Error(err.to_string())
        })
    }

    fn list_tables(&self) -> Result<CommandResult> {
        let tables = self.client.tables()?;
        if tables.is_empty() {
            return Ok(CommandResult::Continue);
        }
        Ok(CommandResult::Output(tables.join("\n")))
    }

    fn count(&self, table: &str) -> Result<CommandResult> {
        let count = self.client.count_rows(table)?;
        Ok(CommandResult::Output(count.to_string()))
    }

    fn lookup(&self, table: &str, key: &str, tokens: &[&str]) -> Result<CommandResult> {
        let opts = ParsedOptions::parse(tokens.iter().copied(), LOOKUP_OPTIONS)?;
        let filter = read::row_filter(&opts)?;
        let decode = DecodeConfig::from_options(&opts, self.default_decode)?;

        match self.client.read_row(table, key.as_bytes(), filter.as_ref())? {
            Some(row) => Ok(rendered(render_rows(&[row], &decode))),
            None => Ok(CommandResult::Error(format!("Row not found: {}", key))),
        }
    }

    fn read(&self, table: &str, tokens: &[&str]) -> Result<CommandResult> {
        let opts = ParsedOptions::parse(tokens.iter().copied(), OptionKey::ALL)?;
        let request = ReadRequest::from_options(&opts)?;
        let decode = DecodeConfig::from_options(&opts, self.default_decode)?;

        let rows = self.client.read_rows(table, &request)?;
        if rows.is_empty() {
            return Ok(CommandResult::Continue);
        }
        Ok(rendered(render_rows(&rows, &decode)))
    }
}

fn help(args: &[&str]) -> CommandResult {
    let Some(&name) = args.first() else {
        return CommandResult::Output(help_text());
    };
    match find_command(name) {
        Some(command) => CommandResult::Output(command.usage.to_string()),
        None => CommandResult::Error(format!("Unknown command: {}", name)),
    }
}

fn help_text() -> String {
    let width = COMMANDS.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let mut text = String::from("Commands:\n");
    for command in COMMANDS {
        text.push_str(&format!(
            "  {:<width$}  {}\n",
            command.name,
            command.description,
            width = width
        ));
    }
    text.push_str("\nType \"help <command>\" for a command's usage.");
    text
}

fn rendered(mut text: String) -> CommandResult {
    if text.ends_with('\n') {
        text.pop();
    }
    CommandResult::Output(text)
}
