//! Statement interpreter.
//!
//! Folds DDL statements over a [`Database`] value, one statement at a time.
//! Schema model failures abort the statement and propagate; constructs the
//! interpreter does not model are returned as [`Warning`] values alongside
//! the result and replay keeps going.

use core::fmt;

use crate::ast::{AlterChange, CreateTableStatement, IndexKind, Statement, TableDefinition};
use crate::schema::{Column, Database, Result};

/// A non-fatal diagnostic: a statement or change clause the interpreter
/// does not model was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Short label for the skipped construct (e.g. `"INSERT INTO"`).
    pub construct: String,
    /// The raw text of the skipped construct.
    pub detail: String,
}

impl Warning {
    fn new(construct: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            construct: construct.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported construct `{}`: {}", self.construct, self.detail)
    }
}

/// The result of applying one or more statements: the next database value
/// plus any warnings raised along the way.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The resulting database snapshot.
    pub database: Database,
    /// Unrecognized constructs that were skipped.
    pub warnings: Vec<Warning>,
}

/// Applies a single statement, producing the next database value.
///
/// # Errors
///
/// Propagates the first schema model failure; the statement's remaining
/// edits are abandoned and the input database is still valid.
pub fn apply_statement(db: &Database, statement: &Statement) -> Result<Applied> {
    let mut warnings = Vec::new();
    let database = apply(db, statement, &mut warnings)?;
    Ok(Applied { database, warnings })
}

/// Applies an ordered statement sequence as a strict left-to-right fold.
///
/// # Errors
///
/// Stops at the first schema model failure. Warnings collected up to that
/// point are lost with the partial result; callers that need them should
/// fold statement by statement.
pub fn apply_statements<'a>(
    db: &Database,
    statements: impl IntoIterator<Item = &'a Statement>,
) -> Result<Applied> {
    let mut warnings = Vec::new();
    let mut database = db.clone();
    for statement in statements {
        database = apply(&database, statement, &mut warnings)?;
    }
    Ok(Applied { database, warnings })
}

fn apply(db: &Database, statement: &Statement, warnings: &mut Vec<Warning>) -> Result<Database> {
    match statement {
        Statement::CreateTable(stmt) => apply_create_table(db, stmt, warnings),

        Statement::CreateTableLike {
            table,
            source,
            if_not_exists,
        } => {
            if *if_not_exists && db.has(table) {
                return Ok(db.clone());
            }
            db.clone_table(source, table)
        }

        Statement::CreateIndex {
            name,
            kind,
            table,
            columns,
        } => match kind {
            IndexKind::Normal => db.add_index(table, Some(name.clone()), columns.clone(), false),
            IndexKind::Unique => db.add_index(table, Some(name.clone()), columns.clone(), true),
            IndexKind::FullText => {
                warnings.push(Warning::new(
                    "CREATE FULLTEXT INDEX",
                    format!("`{name}` on `{table}`"),
                ));
                Ok(db.clone())
            }
        },

        Statement::DropTable { table, if_exists } => db.remove_table(table, *if_exists),

        Statement::AlterTable { table, changes } => {
            apply_alter_table(db, table, changes, warnings)
        }

        Statement::RenameTable { table, new_name } => db.rename_table(table, new_name),

        Statement::Unsupported { kind, sql } => {
            warnings.push(Warning::new(kind.clone(), sql.clone()));
            Ok(db.clone())
        }
    }
}

/// Applies a `CREATE TABLE` in fixed phases: table, columns, primary keys,
/// indexes, foreign keys. The phase order guarantees that key and index
/// clauses always resolve against already-existing columns.
fn apply_create_table(
    db: &Database,
    stmt: &CreateTableStatement,
    warnings: &mut Vec<Warning>,
) -> Result<Database> {
    if stmt.if_not_exists && db.has(&stmt.table) {
        return Ok(db.clone());
    }

    let table = stmt.table.as_str();
    let mut db = db.create_table(table)?;

    for definition in &stmt.definitions {
        if let TableDefinition::Column { name, spec } = definition {
            db = db.add_column(table, Column::from_spec(name, spec), None)?;
        }
    }

    // Explicit PRIMARY KEY clauses, then the inline column shorthand.
    for definition in &stmt.definitions {
        if let TableDefinition::PrimaryKey { columns } = definition {
            db = db.set_primary_key(table, columns.clone())?;
        }
    }
    for definition in &stmt.definitions {
        if let TableDefinition::Column { name, spec } = definition {
            if spec.primary_key {
                db = db.set_primary_key(table, vec![name.clone()])?;
            }
        }
    }

    // Explicit index clauses, then the inline UNIQUE column shorthand.
    for definition in &stmt.definitions {
        if let TableDefinition::Index {
            name,
            kind,
            columns,
        } = definition
        {
            match kind {
                IndexKind::Normal => {
                    db = db.add_index(table, name.clone(), columns.clone(), false)?;
                }
                IndexKind::Unique => {
                    db = db.add_index(table, name.clone(), columns.clone(), true)?;
                }
                IndexKind::FullText => {
                    warnings.push(Warning::new(
                        "FULLTEXT INDEX",
                        format!("in CREATE TABLE `{table}`"),
                    ));
                }
            }
        }
    }
    for definition in &stmt.definitions {
        if let TableDefinition::Column { name, spec } = definition {
            if spec.unique {
                db = db.add_index(table, None, vec![name.clone()], true)?;
            }
        }
    }

    for definition in &stmt.definitions {
        if let TableDefinition::ForeignKey {
            constraint,
            index,
            columns,
            reference,
        } = definition
        {
            db = db.add_foreign_key(
                table,
                constraint.clone(),
                index.clone(),
                columns.clone(),
                &reference.table,
                reference.columns.clone(),
            )?;
        }
    }

    Ok(db)
}

/// Applies an `ALTER TABLE`'s change clauses.
///
/// Changes are partitioned into two phases, each keeping its original
/// relative order: everything except the destructive drops first, then
/// `DROP FOREIGN KEY`, then `DROP COLUMN`. Additions and renames in a
/// statement therefore never race against drops written before them.
fn apply_alter_table(
    db: &Database,
    table: &str,
    changes: &[AlterChange],
    warnings: &mut Vec<Warning>,
) -> Result<Database> {
    let front = changes.iter().filter(|c| !c.is_deferred_drop());
    let drop_fks = changes
        .iter()
        .filter(|c| matches!(c, AlterChange::DropForeignKey { .. }));
    let drop_columns = changes
        .iter()
        .filter(|c| matches!(c, AlterChange::DropColumn { .. }));

    let mut db = db.clone();
    for change in front.chain(drop_fks).chain(drop_columns) {
        db = apply_alter_change(&db, table, change, warnings)?;
    }
    Ok(db)
}

fn apply_alter_change(
    db: &Database,
    table: &str,
    change: &AlterChange,
    warnings: &mut Vec<Warning>,
) -> Result<Database> {
    match change {
        AlterChange::RenameTable { new_name } => db.rename_table(table, new_name),

        AlterChange::AddColumn {
            name,
            spec,
            position,
        } => {
            let mut db = db.add_column(table, Column::from_spec(name, spec), position.as_ref())?;
            if spec.primary_key {
                db = db.set_primary_key(table, vec![name.clone()])?;
            }
            Ok(db)
        }

        AlterChange::ChangeColumn {
            old_name,
            new_name,
            spec,
            position,
        } => db.replace_column(
            table,
            old_name,
            Column::from_spec(new_name, spec),
            position.as_ref(),
        ),

        AlterChange::DropColumn { name } => db.remove_column(table, name),

        AlterChange::DropDefault { column } => db.drop_default(table, column),

        AlterChange::AddPrimaryKey { columns } => db.set_primary_key(table, columns.clone()),

        AlterChange::DropPrimaryKey => db.drop_primary_key(table),

        AlterChange::AddForeignKey {
            constraint,
            index,
            columns,
            reference,
        } => db.add_foreign_key(
            table,
            constraint.clone(),
            index.clone(),
            columns.clone(),
            &reference.table,
            reference.columns.clone(),
        ),

        AlterChange::DropForeignKey { symbol } => db.drop_foreign_key(table, symbol),

        AlterChange::AddIndex {
            name,
            kind,
            columns,
        } => match kind {
            IndexKind::Normal => db.add_index(table, name.clone(), columns.clone(), false),
            IndexKind::Unique => db.add_index(table, name.clone(), columns.clone(), true),
            IndexKind::FullText => {
                warnings.push(Warning::new(
                    "ADD FULLTEXT INDEX",
                    format!("on `{table}`"),
                ));
                Ok(db.clone())
            }
        },

        AlterChange::DropIndex { name } => db.drop_index(table, name),

        AlterChange::Unsupported { kind, sql } => {
            warnings.push(Warning::new(kind.clone(), sql.clone()));
            Ok(db.clone())
        }
    }
}
