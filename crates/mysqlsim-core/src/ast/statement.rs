//! DDL statement AST types.

use super::expr::DefaultValue;
use super::types::DataType;

/// Where an added or redefined column lands in the table's column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    /// `FIRST`: prepend.
    First,
    /// `AFTER <column>`: insert immediately following the named column.
    After(String),
}

/// The kind of an index clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Plain index.
    Normal,
    /// UNIQUE index.
    Unique,
    /// FULLTEXT index (accepted by the grammar, not simulated).
    FullText,
}

/// Everything declared about a column except its name.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Data type.
    pub data_type: DataType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value, if declared.
    pub default: Option<DefaultValue>,
    /// AUTO_INCREMENT attribute.
    pub auto_increment: bool,
    /// Inline `PRIMARY KEY` shorthand.
    pub primary_key: bool,
    /// Inline `UNIQUE` shorthand.
    pub unique: bool,
}

impl ColumnSpec {
    /// Creates a new column spec with the dialect's defaults: nullable, no
    /// default value, no attributes.
    #[must_use]
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: true,
            default: None,
            auto_increment: false,
            primary_key: false,
            unique: false,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the AUTO_INCREMENT attribute.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as an inline primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as inline unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// The target of a foreign key: a table and its referenced columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Referenced table name.
    pub table: String,
    /// Referenced columns, in order.
    pub columns: Vec<String>,
}

/// One definition inside the parentheses of a `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub enum TableDefinition {
    /// A column definition.
    Column {
        /// Column name.
        name: String,
        /// Everything declared about it.
        spec: ColumnSpec,
    },
    /// A `PRIMARY KEY (…)` clause.
    PrimaryKey {
        /// Key columns, in order.
        columns: Vec<String>,
    },
    /// An `INDEX`/`KEY`/`UNIQUE`/`FULLTEXT` clause.
    Index {
        /// Index name, if declared.
        name: Option<String>,
        /// Index kind.
        kind: IndexKind,
        /// Indexed columns, in order.
        columns: Vec<String>,
    },
    /// A `[CONSTRAINT …] FOREIGN KEY …` clause.
    ForeignKey {
        /// Constraint name from the `CONSTRAINT` clause, if any.
        constraint: Option<String>,
        /// Index name following `FOREIGN KEY`, if any.
        index: Option<String>,
        /// Local columns, in order.
        columns: Vec<String>,
        /// Referenced table and columns.
        reference: Reference,
    },
}

/// A `CREATE TABLE` statement with its body definitions in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// Table name.
    pub table: String,
    /// Body definitions, in source order.
    pub definitions: Vec<TableDefinition>,
    /// `IF NOT EXISTS` clause.
    pub if_not_exists: bool,
}

/// One change clause of an `ALTER TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterChange {
    /// `RENAME TO <name>`.
    RenameTable {
        /// New table name.
        new_name: String,
    },
    /// `ADD COLUMN`.
    AddColumn {
        /// Column name.
        name: String,
        /// Column definition.
        spec: ColumnSpec,
        /// Position directive; `None` appends.
        position: Option<ColumnPosition>,
    },
    /// `CHANGE COLUMN` / `MODIFY COLUMN` (for `MODIFY`, old and new names
    /// are equal).
    ChangeColumn {
        /// Current column name.
        old_name: String,
        /// New column name.
        new_name: String,
        /// New column definition.
        spec: ColumnSpec,
        /// Position directive; `None` keeps the current position.
        position: Option<ColumnPosition>,
    },
    /// `DROP COLUMN`.
    DropColumn {
        /// Column name.
        name: String,
    },
    /// `ALTER COLUMN <name> DROP DEFAULT`.
    DropDefault {
        /// Column name.
        column: String,
    },
    /// `ADD PRIMARY KEY (…)`.
    AddPrimaryKey {
        /// Key columns, in order.
        columns: Vec<String>,
    },
    /// `DROP PRIMARY KEY`.
    DropPrimaryKey,
    /// `ADD [CONSTRAINT …] FOREIGN KEY …`.
    AddForeignKey {
        /// Constraint name, if any.
        constraint: Option<String>,
        /// Index name following `FOREIGN KEY`, if any.
        index: Option<String>,
        /// Local columns, in order.
        columns: Vec<String>,
        /// Referenced table and columns.
        reference: Reference,
    },
    /// `DROP FOREIGN KEY <symbol>`.
    DropForeignKey {
        /// Constraint name.
        symbol: String,
    },
    /// `ADD [UNIQUE|FULLTEXT] INDEX`.
    AddIndex {
        /// Index name, if declared.
        name: Option<String>,
        /// Index kind.
        kind: IndexKind,
        /// Indexed columns, in order.
        columns: Vec<String>,
    },
    /// `DROP INDEX <name>`.
    DropIndex {
        /// Index name.
        name: String,
    },
    /// A change clause the grammar does not model; reported and skipped.
    Unsupported {
        /// A short label for the clause (e.g. its leading keywords).
        kind: String,
        /// The raw clause text.
        sql: String,
    },
}

impl AlterChange {
    /// Returns true for the destructive clauses that are deferred to the
    /// second application phase.
    #[must_use]
    pub const fn is_deferred_drop(&self) -> bool {
        matches!(self, Self::DropForeignKey { .. } | Self::DropColumn { .. })
    }
}

/// A DDL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `CREATE TABLE`.
    CreateTable(CreateTableStatement),
    /// `CREATE TABLE <new> LIKE <old>`.
    CreateTableLike {
        /// New table name.
        table: String,
        /// Source table name.
        source: String,
        /// `IF NOT EXISTS` clause.
        if_not_exists: bool,
    },
    /// `CREATE [UNIQUE|FULLTEXT] INDEX <name> ON <table> (…)`.
    CreateIndex {
        /// Index name.
        name: String,
        /// Index kind.
        kind: IndexKind,
        /// Table the index is created on.
        table: String,
        /// Indexed columns, in order.
        columns: Vec<String>,
    },
    /// `DROP TABLE [IF EXISTS]`.
    DropTable {
        /// Table name.
        table: String,
        /// `IF EXISTS` clause.
        if_exists: bool,
    },
    /// `ALTER TABLE` with its change clauses in source order.
    AlterTable {
        /// Table name.
        table: String,
        /// Change clauses, in source order.
        changes: Vec<AlterChange>,
    },
    /// `RENAME TABLE <old> TO <new>`.
    RenameTable {
        /// Current table name.
        table: String,
        /// New table name.
        new_name: String,
    },
    /// A statement the grammar does not model; reported and skipped.
    Unsupported {
        /// A short label for the statement (e.g. its leading keywords).
        kind: String,
        /// The raw statement text.
        sql: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_spec_builder() {
        let spec = ColumnSpec::new(DataType::BigInt {
            length: None,
            unsigned: false,
        })
        .not_null()
        .auto_increment()
        .primary_key();

        assert!(!spec.nullable);
        assert!(spec.auto_increment);
        assert!(spec.primary_key);
        assert!(!spec.unique);
        assert_eq!(spec.default, None);
    }

    #[test]
    fn test_deferred_drop_classification() {
        assert!(AlterChange::DropColumn {
            name: String::from("a")
        }
        .is_deferred_drop());
        assert!(AlterChange::DropForeignKey {
            symbol: String::from("fk")
        }
        .is_deferred_drop());
        assert!(!AlterChange::DropPrimaryKey.is_deferred_drop());
        assert!(!AlterChange::DropIndex {
            name: String::from("idx")
        }
        .is_deferred_drop());
    }
}
