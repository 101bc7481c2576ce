//! Immutable schema model.
//!
//! A [`Database`] is a persistent value: every mutation operation returns a
//! new snapshot and leaves the receiver untouched, with unaffected tables
//! shared between snapshots. All operations either succeed completely or
//! fail with a typed [`SchemaError`] without observable side effects.

mod database;
mod error;
mod table;

pub use database::Database;
pub use error::{Result, SchemaError};
pub use table::{Column, ForeignKey, Index, PrimaryKey, Table};
