//! Crate error type
//!
//! Constraint violations are not errors: they end a run through
//! [`ExecutionResult::Aborted`](crate::sim::ExecutionResult::Aborted).

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Level data rejected at construction (empty objective, bad radius, ...)
    InvalidLevelConfig(String),
    /// `start` called while a run is still executing
    RunInProgress,
    /// No built-in level with this id
    UnknownLevel(String),
    /// Command name not recognised by [`Command::parse`](crate::sim::Command::parse)
    UnknownCommand(String),
    /// Malformed JSON level or stored data
    Parse(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLevelConfig(reason) => write!(f, "invalid level config: {}", reason),
            Error::RunInProgress => write!(f, "a run is already in progress"),
            Error::UnknownLevel(id) => write!(f, "unknown level '{}'", id),
            Error::UnknownCommand(name) => write!(f, "unknown command '{}'", name),
            Error::Parse(err) => write!(f, "parse error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err)
    }
}
