//! Replay driver for MySQL DDL migration files.
//!
//! Discovers `*.sql` files, orders them the way migration tools number them
//! (by leading integer, then name), and folds them over an in-memory
//! [`Database`] using `mysqlsim-core`. Engine warnings about unrecognized
//! constructs are logged through `tracing`; the schema text itself goes to
//! stdout so it can be diffed or piped.

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use mysqlsim_core::schema::Database;
use mysqlsim_core::{apply_statements, parse_script, Applied};

pub use error::{ReplayError, Result};

/// Lists a directory's `*.sql` files in natural replay order.
///
/// Files are ordered by the integer prefix of their name (`2.sql` before
/// `10.sql`), with non-numbered files after all numbered ones, ties broken
/// by name. Order is crucial: later migrations depend on earlier ones.
///
/// # Errors
///
/// Fails if the directory cannot be read.
pub fn discover_migrations(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }

    files.sort_by(|a, b| {
        (leading_number(a), a.file_name()).cmp(&(leading_number(b), b.file_name()))
    });
    Ok(files)
}

/// The integer prefix of a file name, used as its replay rank.
fn leading_number(path: &Path) -> u64 {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(u64::MAX)
}

/// Parses one migration file and applies its statements over `db`,
/// returning the next snapshot. Engine warnings are logged with the file
/// as context.
///
/// # Errors
///
/// Fails on unreadable files, parse errors inside recognized statements,
/// and schema invariant violations; the input snapshot stays valid.
pub fn replay_file(db: &Database, path: &Path) -> Result<Applied> {
    let sql = fs::read_to_string(path)?;

    let statements = parse_script(&sql).map_err(|source| ReplayError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let applied = apply_statements(db, &statements).map_err(|source| ReplayError::Schema {
        path: path.to_path_buf(),
        source,
    })?;

    for warning in &applied.warnings {
        warn!(file = %path.display(), "{warning}");
    }

    Ok(applied)
}
