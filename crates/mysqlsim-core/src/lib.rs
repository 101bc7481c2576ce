//! # mysqlsim-core
//!
//! Replays MySQL DDL statements against an in-memory schema model and
//! renders the result as canonical `CREATE TABLE` text — "what does the
//! schema look like after N migration files", without a running database.
//!
//! The crate is organized as a pipeline:
//!
//! - [`parser`] turns raw SQL text into the typed [`ast`] statements,
//!   capturing constructs outside its grammar as `Unsupported` nodes;
//! - [`replay`] folds statements over an immutable [`schema::Database`]
//!   value, preserving cross-table foreign-key invariants under renames and
//!   drops, and reporting skipped constructs as structured warnings;
//! - [`render`] serializes any snapshot back to the dialect's
//!   `SHOW CREATE TABLE`-style output, quirks included.
//!
//! Every `Database` value is persistent: applying a statement returns a new
//! snapshot and shares unaffected tables with the old one, so keeping the
//! whole history of a replay around is cheap.
//!
//! ```rust
//! use mysqlsim_core::{parse_script, apply_statements, render_database};
//! use mysqlsim_core::schema::Database;
//!
//! let statements = parse_script(
//!     "CREATE TABLE `users` (
//!        `id` INT NOT NULL AUTO_INCREMENT,
//!        PRIMARY KEY (`id`)
//!      );",
//! )?;
//! let applied = apply_statements(&Database::new(), &statements)?;
//! let sql = render_database(&applied.database, &[])?;
//! assert!(sql.contains("`id` int(11) NOT NULL AUTO_INCREMENT"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod replay;
pub mod schema;

pub use parser::{parse_script, ParseError};
pub use render::{render_database, render_table};
pub use replay::{apply_statement, apply_statements, Applied, Warning};
pub use schema::{Database, SchemaError};
