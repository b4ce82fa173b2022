//! # Configuration File
//!
//! Session settings can live in an rc file, `~/.btclirc` by default:
//!
//! ```text
//! # shared dev instance
//! project  = my-project
//! instance = my-instance
//! data     = /var/tmp/users.json
//! timeout  = 5
//! decode   = int
//! ```
//!
//! One `key = value` per line, whitespace around both sides ignored. Blank
//! lines and lines starting with `#` are skipped. Anything else is an error,
//! as is a key not in the table below. A missing file is not an error.
//!
//! | Key        | Meaning                                   | Flag / env                         |
//! |------------|-------------------------------------------|------------------------------------|
//! | `project`  | project the instance belongs to           | `--project` / `BTCLI_PROJECT`      |
//! | `instance` | instance holding the tables               | `--instance` / `BTCLI_INSTANCE`    |
//! | `data`     | JSON table dump served in-process         | `--data` / `BTCLI_DATA`            |
//! | `timeout`  | per-call timeout, whole seconds           | `--timeout-secs`                   |
//! | `decode`   | session default decode type               | `--decode` / `BTCLI_DECODE_TYPE`   |
//! | `history`  | history file                              | `--history` (then `BTCLI_HISTORY`) |
//!
//! Flags and environment variables win over the file, except
//! `BTCLI_HISTORY`, which only applies when neither flag nor file sets a
//! history path. Values are stored as
//! read; semantic checks (zero timeout, unknown decode type) happen once all
//! sources are merged.

use crate::client::DEFAULT_TIMEOUT;
use eyre::{bail, Result, WrapErr};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = ".btclirc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub project: Option<String>,
    pub instance: Option<String>,
    pub data: Option<PathBuf>,
    pub timeout: Duration,
    pub decode: Option<String>,
    pub history: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: None,
            instance: None,
            data: None,
            timeout: DEFAULT_TIMEOUT,
            decode: None,
            history: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .wrap_err_with(|| format!("failed to read config file {}", path.display()))
            }
        };
        Self::parse(&contents, &path.display().to_string())
    }

    /// Parses rc-file text. `source` names the file in error messages.
    pub fn parse(contents: &str, source: &str) -> Result<Self> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                bail!("Bad line in {}: {:?}", source, line);
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "project" => config.project = Some(value.to_string()),
                "instance" => config.instance = Some(value.to_string()),
                "data" => config.data = Some(PathBuf::from(value)),
                "timeout" => {
                    let secs: u64 = value.parse().wrap_err_with(|| {
                        format!("Bad timeout in {}: {:?} is not a number of seconds", source, value)
                    })?;
                    config.timeout = Duration::from_secs(secs);
                }
                "decode" => config.decode = Some(value.to_string()),
                "history" => config.history = Some(PathBuf::from(value)),
                _ => bail!("Unknown key in {}: {:?}", source, key),
            }
        }

        Ok(config)
    }
}

pub fn default_path() -> Option<PathBuf> {
    env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(DEFAULT_CONFIG_FILE))
}
