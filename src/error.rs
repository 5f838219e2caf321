//! Error types for fulid
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad config, bad identifier, unknown short id)
//! - 4: Operation failed (IO, lock contention, exhausted sequence)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the fulid CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for fulid operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid character '{character}' in '{input}': not part of the alphabet")]
    InvalidCharacter { character: char, input: String },

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("No identifier matches '{0}'")]
    NotFound(String),

    // Operation failures (exit code 4)
    #[error("Sequence exhausted: {0} does not fit in the sequence segment")]
    SequenceExhausted(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidCharacter { .. }
            | Error::InvalidId(_)
            | Error::NotFound(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::SequenceExhausted(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the variant carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InvalidCharacter { character, input } => Some(serde_json::json!({
                "character": character.to_string(),
                "input": input,
            })),
            Error::NotFound(short) => Some(serde_json::json!({ "short_id": short })),
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            _ => None,
        }
    }
}

/// Result type alias for fulid operations
pub type Result<T> = std::result::Result<T, Error>;
