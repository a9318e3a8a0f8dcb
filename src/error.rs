//! Error types for the beanstalk client
//!
//! Every failure is returned to the immediate caller. Nothing here is
//! retried or logged on the way out.

use std::fmt;

use thiserror::Error;

/// Result type alias using BeanstalkError
pub type Result<T> = std::result::Result<T, BeanstalkError>;

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum BeanstalkError {
    // -------------------------------------------------------------------------
    // Connection Errors (connection is dead afterwards)
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Command Errors (connection stays usable)
    // -------------------------------------------------------------------------
    #[error("{verb}: {status}")]
    Command {
        /// Verb of the command that was rejected
        verb: &'static str,
        /// The server's status word, decoded
        status: CommandStatus,
    },

    // -------------------------------------------------------------------------
    // Body Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Caller Errors (nothing was sent)
    // -------------------------------------------------------------------------
    #[error("Invalid tube name: {0:?}")]
    InvalidName(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BeanstalkError {
    /// The server status carried by a command error, if this is one
    pub fn command_status(&self) -> Option<&CommandStatus> {
        match self {
            BeanstalkError::Command { status, .. } => Some(status),
            _ => None,
        }
    }

    /// True if the connection can no longer be used after this error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BeanstalkError::Transport(_) | BeanstalkError::Protocol(_)
        )
    }
}

/// Semantic failure words the server may send in place of a success reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// `BURIED`; for put the server also reports the id of the buried job
    Buried { id: Option<u64> },
    ExpectedCrlf,
    JobTooBig,
    Draining,
    DeadlineSoon,
    TimedOut,
    NotFound,
    NotIgnored,
    OutOfMemory,
    InternalError,
    BadFormat,
    UnknownCommand,
}

impl CommandStatus {
    /// The exact word the server sent
    pub fn word(&self) -> &'static str {
        match self {
            CommandStatus::Buried { .. } => "BURIED",
            CommandStatus::ExpectedCrlf => "EXPECTED_CRLF",
            CommandStatus::JobTooBig => "JOB_TOO_BIG",
            CommandStatus::Draining => "DRAINING",
            CommandStatus::DeadlineSoon => "DEADLINE_SOON",
            CommandStatus::TimedOut => "TIMED_OUT",
            CommandStatus::NotFound => "NOT_FOUND",
            CommandStatus::NotIgnored => "NOT_IGNORED",
            CommandStatus::OutOfMemory => "OUT_OF_MEMORY",
            CommandStatus::InternalError => "INTERNAL_ERROR",
            CommandStatus::BadFormat => "BAD_FORMAT",
            CommandStatus::UnknownCommand => "UNKNOWN_COMMAND",
        }
    }

    /// Map a status word back to its variant.
    ///
    /// `BURIED` comes back with no id; the decoder fills it in when the
    /// reply carries one.
    pub fn from_word(word: &str) -> Option<Self> {
        let status = match word {
            "BURIED" => CommandStatus::Buried { id: None },
            "EXPECTED_CRLF" => CommandStatus::ExpectedCrlf,
            "JOB_TOO_BIG" => CommandStatus::JobTooBig,
            "DRAINING" => CommandStatus::Draining,
            "DEADLINE_SOON" => CommandStatus::DeadlineSoon,
            "TIMED_OUT" => CommandStatus::TimedOut,
            "NOT_FOUND" => CommandStatus::NotFound,
            "NOT_IGNORED" => CommandStatus::NotIgnored,
            "OUT_OF_MEMORY" => CommandStatus::OutOfMemory,
            "INTERNAL_ERROR" => CommandStatus::InternalError,
            "BAD_FORMAT" => CommandStatus::BadFormat,
            "UNKNOWN_COMMAND" => CommandStatus::UnknownCommand,
            _ => return None,
        };
        Some(status)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Buried { id: Some(id) } => write!(f, "BURIED {}", id),
            other => f.write_str(other.word()),
        }
    }
}
