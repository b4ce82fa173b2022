//! # btcli Entry Point
//!
//! Binary entry point for the btcli shell.
//!
//! ## Usage
//!
//! ```bash
//! # Browse a table dump
//! btcli --data ./users.json
//!
//! # Settings from a non-default rc file, verbose logging
//! btcli --config ./dev.btclirc -v
//!
//! # Show help
//! btcli --help
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | normal exit                                               |
//! | 10   | initialization failed (config, data dump, line editor)    |
//! | 11   | command-line flags could not be parsed                    |
//! | 12   | invalid settings (no data source, zero timeout, bad type) |

use btcli::cli::history::history_path;
use btcli::cli::{CommandHandler, Repl};
use btcli::config::{self, Config};
use btcli::{Client, ClientConfig, DecodeType, MemoryBigtable};
use clap::Parser;
use eyre::{bail, Report, Result, WrapErr};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_INIT: i32 = 10;
const EXIT_PARSE: i32 = 11;
const EXIT_INVALID_ARGS: i32 = 12;

/// Interactive shell for Bigtable-style tables.
#[derive(Parser, Debug)]
#[command(name = "btcli", version, about)]
struct Cli {
    /// rc file to read settings from (default: ~/.btclirc).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project the instance belongs to.
    #[arg(long, env = "BTCLI_PROJECT")]
    project: Option<String>,

    /// Instance holding the tables.
    #[arg(long, env = "BTCLI_INSTANCE")]
    instance: Option<String>,

    /// JSON table dump to serve.
    #[arg(long, env = "BTCLI_DATA")]
    data: Option<PathBuf>,

    /// Timeout for each database call, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Default decode type for 8-byte values (string, int, float, auto).
    #[arg(long, env = "BTCLI_DECODE_TYPE")]
    decode: Option<String>,

    /// History file; an empty value disables history. Without it the rc
    /// file, then BTCLI_HISTORY, then ~/.btcli_history apply.
    #[arg(long)]
    history: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// Everything the shell needs, after flags, env and rc file are merged.
#[derive(Debug)]
struct Settings {
    data: PathBuf,
    timeout: Duration,
    decode: Option<DecodeType>,
    history: Option<PathBuf>,
    target: String,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_PARSE } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref()).unwrap_or_else(|e| fail(EXIT_INIT, e));
    let settings = resolve(cli, config).unwrap_or_else(|e| fail(EXIT_INVALID_ARGS, e));

    if let Err(e) = run(settings) {
        fail(EXIT_INIT, e);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path.cloned().or_else(config::default_path) else {
        return Ok(Config::default());
    };
    debug!(path = %path.display(), "loading config");
    Config::load(&path)
}

fn resolve(cli: Cli, config: Config) -> Result<Settings> {
    let Some(data) = cli.data.or(config.data) else {
        bail!("no data source configured (use --data, BTCLI_DATA or the `data` rc key)");
    };

    let timeout = cli
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(config.timeout);
    if timeout.is_zero() {
        bail!("timeout must be at least one second");
    }

    let decode = cli
        .decode
        .or(config.decode)
        .map(|raw| raw.parse::<DecodeType>())
        .transpose()
        .wrap_err("invalid default decode type")?;

    let target = match (cli.project.or(config.project), cli.instance.or(config.instance)) {
        (Some(project), Some(instance)) => format!(
            "projects/{}/instances/{} ({})",
            project,
            instance,
            data.display()
        ),
        _ => data.display().to_string(),
    };

    Ok(Settings {
        history: history_path(cli.history.map(PathBuf::from).or(config.history).as_deref()),
        data,
        timeout,
        decode,
        target,
    })
}

fn run(settings: Settings) -> Result<()> {
    debug!(?settings, "starting shell");

    let db = MemoryBigtable::load(&settings.data)?;
    let client = Client::new(
        db,
        ClientConfig {
            timeout: settings.timeout,
        },
    )
    .wrap_err("failed to start client runtime")?;

    let handler = CommandHandler::new(client, settings.decode);
    let mut repl = Repl::new(handler, settings.history, settings.target)?;
    repl.run()
}

fn fail(code: i32, err: Report) -> ! {
    eprintln!("Error: {}", err);
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
    process::exit(code);
}
