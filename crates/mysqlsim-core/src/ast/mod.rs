//! Typed AST for the MySQL DDL subset.
//!
//! Each category is a closed sum: data types, default-value expressions,
//! statements and `ALTER TABLE` change clauses. Statements the grammar does
//! not model are represented by the `Unsupported` variants rather than a
//! parse failure, so replay can skip them and keep going.

mod expr;
mod statement;
mod types;

pub use expr::{DefaultValue, Literal};
pub use statement::{
    AlterChange, ColumnPosition, ColumnSpec, CreateTableStatement, IndexKind, Reference,
    Statement, TableDefinition,
};
pub use types::{DataType, Precision};
