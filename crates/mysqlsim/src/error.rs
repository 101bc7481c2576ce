//! Error types for the replay driver.

use std::path::PathBuf;

use mysqlsim_core::{ParseError, SchemaError};

/// Errors that can occur while driving a replay over migration files.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// IO error reading migration directories or files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A migration file failed to parse.
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// The parse error.
        source: ParseError,
    },

    /// A statement in a migration file broke a schema invariant.
    #[error("Replay failed in '{path}': {source}")]
    Schema {
        /// Path of the offending file.
        path: PathBuf,
        /// The schema error.
        source: SchemaError,
    },

    /// The final schema could not be rendered (e.g. an unknown table was
    /// requested).
    #[error("Cannot render schema: {0}")]
    Render(SchemaError),
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, ReplayError>;
