//! Error types for the schema model.

/// Errors raised by schema model operations.
///
/// These are fail-fast faults in the statement stream: the current
/// statement's remaining edits are abandoned and the error propagates to the
/// caller. Unrecognized-construct conditions are not errors; they travel as
/// [`crate::replay::Warning`] values instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// The named table does not exist.
    #[error("Table \"{0}\" does not exist")]
    TableNotFound(String),

    /// A table with that name already exists.
    #[error("Table \"{0}\" already exists")]
    TableAlreadyExists(String),

    /// The named column does not exist in the table.
    #[error("Column \"{column}\" does not exist in table \"{table}\"")]
    ColumnNotFound {
        /// The table searched.
        table: String,
        /// The missing column.
        column: String,
    },

    /// A foreign key's local and referenced column lists differ in length.
    #[error("Foreign key must have an equal number of local/foreign columns ({local} vs {target})")]
    ColumnCountMismatch {
        /// Number of local columns.
        local: usize,
        /// Number of referenced columns.
        target: usize,
    },

    /// A foreign key pairs two columns of different base types.
    #[error(
        "Type mismatch in foreign key: local/foreign columns have different types. \
         Local column `{local_column}` is `{local_type}`, but `{target_column}` is `{target_type}`."
    )]
    ForeignKeyTypeMismatch {
        /// Qualified local column (`table.column`).
        local_column: String,
        /// Rendered type of the local column.
        local_type: String,
        /// Qualified referenced column (`table.column`).
        target_column: String,
        /// Rendered type of the referenced column.
        target_type: String,
    },

    /// No foreign key with that constraint name exists in the table.
    #[error("Foreign key \"{symbol}\" does not exist in table \"{table}\"")]
    ForeignKeyNotFound {
        /// The table searched.
        table: String,
        /// The missing constraint name.
        symbol: String,
    },

    /// No index with that name exists in the table.
    #[error("Index \"{name}\" does not exist in table \"{table}\"")]
    IndexNotFound {
        /// The table searched.
        table: String,
        /// The missing index name.
        name: String,
    },

    /// A structural invariant of the model was violated.
    #[error("{0}")]
    InvariantViolation(String),
}

/// Result type for schema model operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
