//! File Shell
//!
//! An interactive command shell that keeps a bounded table of open file handles
//! and dispatches typed commands (create, open, close, read, write, copy, move,
//! rm, ls, cd) to the filesystem. Lines are tokenized, parsed into a typed
//! [`Command`] and executed by the [`CommandEngine`], which owns the
//! [`HandleRegistry`].

pub mod config;
pub mod engine;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod tokenizer;

// Re-export core types for convenience
pub use crate::error::{OsError, Result, ShellError};
pub use config::ShellConfig;
pub use engine::{CommandEngine, CommandReport, DirEntryInfo, DirListing};
pub use parser::{parse_command, Command};
pub use registry::{HandleId, HandleRecord, HandleRegistry};
pub use tokenizer::{tokenize, TokenizedLine};

/// Core error handling types for the shell
pub mod error {
    use crate::registry::HandleId;
    use std::fmt;
    use std::io;

    /// Result type for shell operations
    pub type Result<T> = std::result::Result<T, ShellError>;

    /// Details of a failed filesystem call, captured where the call failed
    #[derive(Debug, Clone, PartialEq)]
    pub struct OsError {
        /// Raw OS error number, when the platform reported one
        pub code: Option<i32>,
        pub kind: io::ErrorKind,
        pub description: String,
    }

    impl OsError {
        pub fn is_not_found(&self) -> bool {
            self.kind == io::ErrorKind::NotFound
        }
    }

    impl From<&io::Error> for OsError {
        fn from(err: &io::Error) -> Self {
            Self {
                code: err.raw_os_error(),
                kind: err.kind(),
                description: err.to_string(),
            }
        }
    }

    impl From<io::Error> for OsError {
        fn from(err: io::Error) -> Self {
            Self::from(&err)
        }
    }

    /// Every failure a command can report. None of them end the process.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ShellError {
        /// Wrong arity or an unparsable argument, detected before any action
        InvalidArgument { position: usize, reason: String },
        /// No open handle carries this id
        HandleNotFound(HandleId),
        /// The registry already holds its maximum number of handles
        CapacityExceeded { capacity: usize },
        /// A filesystem call failed; `argument` is the 1-based argument it concerns
        OsFailure { argument: usize, error: OsError },
        /// The read buffer could not be reserved
        AllocationFailure { requested: usize },
        /// The first token is not a known command
        UnknownCommand(String),
    }

    impl ShellError {
        pub fn invalid_argument(position: usize, reason: impl Into<String>) -> Self {
            ShellError::InvalidArgument {
                position,
                reason: reason.into(),
            }
        }

        pub fn os(argument: usize, err: io::Error) -> Self {
            ShellError::OsFailure {
                argument,
                error: OsError::from(err),
            }
        }
    }

    impl fmt::Display for ShellError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ShellError::InvalidArgument { position, reason } => {
                    write!(f, "Argument {} error: {}", position, reason)
                }
                ShellError::HandleNotFound(id) => write!(f, "Error: handle {} not found.", id),
                ShellError::CapacityExceeded { capacity } => {
                    write!(f, "Error: too many open files (limit {}).", capacity)
                }
                ShellError::OsFailure { argument, error } => write!(
                    f,
                    "Argument {} error: {} ({})",
                    argument,
                    error.code.unwrap_or(-1),
                    error.description
                ),
                ShellError::AllocationFailure { requested } => {
                    write!(f, "Error: could not allocate {} bytes.", requested)
                }
                ShellError::UnknownCommand(name) => write!(f, "Unknown command: {}", name),
            }
        }
    }

    impl std::error::Error for ShellError {}
}
