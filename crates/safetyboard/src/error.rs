//! Error types for safetyboard.
//!
//! Form validation failures are not represented here: they are ordinary form
//! state (a field to message mapping) and never abort anything but the submit.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for safetyboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Seed Data Errors ===
    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    SeedRead {
        /// Path to the seed file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not a valid incident collection.
    #[error("failed to parse seed file {path}: {source}")]
    SeedParse {
        /// Path to the seed file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Two seeded incidents share an id.
    #[error("duplicate incident id {id} in seed data")]
    DuplicateIncidentId {
        /// The repeated id.
        id: u64,
    },

    /// A seeded incident's id is above the accepted range.
    #[error("incident id {id} in seed data is too large (max {max})")]
    IncidentIdTooLarge {
        /// The offending id.
        id: u64,
        /// Largest id accepted from seed data.
        max: u64,
    },

    // === Shell Errors ===
    /// The shell did not recognise a command.
    #[error("unknown command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    /// A shell command was given a bad argument.
    #[error("{command}: {message}")]
    InvalidArgument {
        /// The command being parsed.
        command: &'static str,
        /// What was wrong with the argument.
        message: String,
    },

    // === I/O Errors ===
    /// File system or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for safetyboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid argument error for a shell command.
    #[must_use]
    pub fn invalid_argument(command: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command,
            message: message.into(),
        }
    }

    /// Check if this error came from loading or validating configuration.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad(_) | Self::ConfigValidation { .. })
    }

    /// Check if this error came from user input in the shell.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnknownCommand(_) | Self::InvalidArgument { .. })
    }
}
