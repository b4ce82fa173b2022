//! # Command Errors
//!
//! Errors a command can end with. Argument errors are raised while turning
//! `key=value` tokens into a request, before anything reaches the backend.
//! Backend errors wrap whatever the database facade reported.
//!
//! None of these end the session: the dispatcher renders them on the error
//! stream and reads the next line. Startup failures are not modelled here;
//! the binary reports those through `eyre`.

use crate::backend::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid args: {0}")]
    InvalidToken(String),

    #[error("Unknown arg: {0}")]
    UnknownOption(String),

    #[error("Invalid {option}: {value:?} is not a valid {expected}")]
    InvalidNumber {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid range: start/end cannot be combined with prefix")]
    ConflictingRange,

    #[error("Invalid decode type: {0:?} (expected string, int, float or auto)")]
    InvalidDecodeType(String),

    #[error("Invalid decode_columns entry: {0:?} (expected <column>:<type>)")]
    InvalidDecodeColumn(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl Error {
    /// True for errors caused by the command line rather than the backend.
    pub fn is_argument_error(&self) -> bool {
        !matches!(self, Error::Backend(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
