/*!
 * Error types for the sqlid-translator library.
 *
 * This module contains custom error types for the different layers of the
 * translator, using the thiserror crate for ergonomic error definitions.
 * A lookup miss is never an error: stores report it as `Ok(None)`.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while computing a statement's sql_id
#[derive(Error, Debug)]
pub enum SqlIdError {
    /// The statement bytes are not valid UTF-8
    #[error("Unable to read SQL text as UTF-8: {reason}")]
    Encoding {
        /// Decoder diagnostic
        reason: String,
    },
}

/// Errors that can occur while opening, reading or building a mapping store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The structured-text source violates the mapping grammar
    #[error("Invalid mapping format at line {line}: {message}")]
    Format {
        /// 1-based line number of the offending line
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// The store file does not exist
    #[error("Mapping store '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not a mapping store this version understands
    #[error("Incompatible mapping store: {0}")]
    IncompatibleFormat(String),

    /// Error reported by the persistent backend
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A conversion would overwrite an existing file
    #[error("Output file '{}' already exists", .0.display())]
    TargetExists(PathBuf),
}

/// Errors surfaced by the translator facade
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// Invalid or unsupported translator configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error computing the statement's sql_id
    #[error("SQL_ID error: {0}")]
    SqlId(#[from] SqlIdError),

    /// Error from the mapping store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Top-level error of the command-line tool, wrapping the library errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translator facade
    #[error("Translator error: {0}")]
    Translator(#[from] TranslatorError),

    /// Error from a mapping store or conversion
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Alternate form keeps the context chain
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// Result alias used by the store layer
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result alias used by the translator facade
pub type TranslatorResult<T> = std::result::Result<T, TranslatorError>;
