//! The table value type and its pure edit operations.

use crate::ast::{ColumnPosition, ColumnSpec, DataType, DefaultValue, Reference};

use super::error::{Result, SchemaError};

/// A column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value, if any.
    pub default: Option<DefaultValue>,
    /// AUTO_INCREMENT attribute.
    pub auto_increment: bool,
}

impl Column {
    /// Builds a column from a parsed column definition.
    ///
    /// The inline `PRIMARY KEY`/`UNIQUE` shorthands are table-level
    /// concerns and are handled by the interpreter, not stored here.
    #[must_use]
    pub fn from_spec(name: impl Into<String>, spec: &ColumnSpec) -> Self {
        Self {
            name: name.into(),
            data_type: spec.data_type.clone(),
            nullable: spec.nullable,
            default: spec.default.clone(),
            auto_increment: spec.auto_increment,
        }
    }
}

/// A table's single primary key: an ordered list of column names.
///
/// Uniqueness and non-nullability are implied by the dialect and not modeled
/// as separate constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Key columns, in order.
    pub columns: Vec<String>,
}

/// A secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in order. Checked against the table's columns when
    /// the index is created, not continuously re-validated.
    pub columns: Vec<String>,
    /// Whether this is a UNIQUE index.
    pub unique: bool,
}

/// A foreign key constraint.
///
/// The name is always present on the stored value: an omitted constraint
/// name is resolved to the dialect's generated `<table>_ibfk_<n>` form when
/// the key is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Local columns, in order.
    pub columns: Vec<String>,
    /// Referenced table and columns.
    pub reference: Reference,
}

/// An immutable table value.
///
/// Every edit operation returns a new `Table`, leaving the receiver
/// untouched. Column order is significant: it is the physical order used
/// for rendering and for `FIRST`/`AFTER` positioning.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name, unique within its database.
    pub name: String,
    /// Columns, in physical order.
    pub columns: Vec<Column>,
    /// The primary key, if any. At most one per table.
    pub primary_key: Option<PrimaryKey>,
    /// Secondary indexes, in creation order.
    pub indexes: Vec<Index>,
    /// Foreign keys, in creation order.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Creates a new empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Returns a copy of this table under a new name, keeping columns, keys
    /// and indexes.
    #[must_use]
    pub fn clone_to(&self, new_name: impl Into<String>) -> Self {
        Self {
            name: new_name.into(),
            ..self.clone()
        }
    }

    /// Returns this table renamed. Foreign keys in *other* tables that
    /// reference it are the database's responsibility.
    #[must_use]
    pub fn rename(&self, new_name: impl Into<String>) -> Self {
        self.clone_to(new_name)
    }

    /// Returns true if a column with the given name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: self.name.clone(),
                column: String::from(name),
            })
    }

    /// Computes the insertion index for a position directive.
    fn position_index(&self, position: Option<&ColumnPosition>) -> Result<usize> {
        match position {
            None => Ok(self.columns.len()),
            Some(ColumnPosition::First) => Ok(0),
            Some(ColumnPosition::After(anchor)) => self
                .columns
                .iter()
                .position(|c| c.name == *anchor)
                .map(|i| i + 1)
                .ok_or_else(|| SchemaError::ColumnNotFound {
                    table: self.name.clone(),
                    column: anchor.clone(),
                }),
        }
    }

    /// Returns a new table with the column added at the given position
    /// (appended when `position` is `None`).
    pub fn add_column(&self, column: Column, position: Option<&ColumnPosition>) -> Result<Self> {
        if self.has_column(&column.name) {
            return Err(SchemaError::InvariantViolation(format!(
                "Column \"{}\" already exists in table \"{}\"",
                column.name, self.name
            )));
        }

        let index = self.position_index(position)?;
        let mut next = self.clone();
        next.columns.insert(index, column);
        Ok(next)
    }

    /// Returns a new table with the named column replaced by a new
    /// definition. The name may change. Without a position directive the
    /// column keeps its ordinal position.
    pub fn replace_column(
        &self,
        old_name: &str,
        column: Column,
        position: Option<&ColumnPosition>,
    ) -> Result<Self> {
        let old_index = self
            .columns
            .iter()
            .position(|c| c.name == old_name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: self.name.clone(),
                column: String::from(old_name),
            })?;

        if column.name != old_name && self.has_column(&column.name) {
            return Err(SchemaError::InvariantViolation(format!(
                "Column \"{}\" already exists in table \"{}\"",
                column.name, self.name
            )));
        }

        let mut next = self.clone();
        next.columns.remove(old_index);
        let index = match position {
            None => old_index,
            Some(_) => next.position_index(position)?,
        };
        next.columns.insert(index, column);
        Ok(next)
    }

    /// Returns a new table with the named column removed.
    ///
    /// Foreign keys elsewhere that reference the column are left untouched.
    pub fn remove_column(&self, name: &str) -> Result<Self> {
        let index = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: self.name.clone(),
                column: String::from(name),
            })?;

        let mut next = self.clone();
        next.columns.remove(index);
        Ok(next)
    }

    /// Returns a new table with the named column's default value cleared.
    pub fn drop_default(&self, name: &str) -> Result<Self> {
        self.column(name)?;
        let mut next = self.clone();
        for column in &mut next.columns {
            if column.name == name {
                column.default = None;
            }
        }
        Ok(next)
    }

    /// Returns a new table with the given primary key, replacing any
    /// existing one. Key columns must exist and become NOT NULL, as the
    /// dialect implies.
    pub fn set_primary_key(&self, columns: Vec<String>) -> Result<Self> {
        for name in &columns {
            self.column(name)?;
        }

        let mut next = self.clone();
        for column in &mut next.columns {
            if columns.contains(&column.name) {
                column.nullable = false;
            }
        }
        next.primary_key = Some(PrimaryKey { columns });
        Ok(next)
    }

    /// Returns a new table without a primary key.
    #[must_use]
    pub fn drop_primary_key(&self) -> Self {
        let mut next = self.clone();
        next.primary_key = None;
        next
    }

    /// Picks a free index name following the dialect's convention: the first
    /// column's name, suffixed `_2`, `_3`, … while taken.
    fn generate_index_name(&self, columns: &[String]) -> String {
        let base = columns.first().map_or("index", String::as_str);
        if !self.indexes.iter().any(|i| i.name == base) {
            return String::from(base);
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.indexes.iter().any(|i| i.name == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Returns a new table with an index added. Indexed columns must exist
    /// at creation time. An omitted name is generated from the first column.
    ///
    /// Explicit names are not checked for uniqueness.
    pub fn add_index(
        &self,
        name: Option<String>,
        columns: Vec<String>,
        unique: bool,
    ) -> Result<Self> {
        for column in &columns {
            self.column(column)?;
        }

        let name = name.unwrap_or_else(|| self.generate_index_name(&columns));
        let mut next = self.clone();
        next.indexes.push(Index {
            name,
            columns,
            unique,
        });
        Ok(next)
    }

    /// Returns a new table with the named index removed.
    pub fn drop_index(&self, name: &str) -> Result<Self> {
        let index = self
            .indexes
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| SchemaError::IndexNotFound {
                table: self.name.clone(),
                name: String::from(name),
            })?;

        let mut next = self.clone();
        next.indexes.remove(index);
        Ok(next)
    }

    /// Picks a free constraint name of the generated `<table>_ibfk_<n>`
    /// form.
    fn generate_foreign_key_name(&self) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("{}_ibfk_{}", self.name, n);
            if !self.foreign_keys.iter().any(|fk| fk.name == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Returns a new table with a foreign key appended.
    ///
    /// Cross-table validation (existence, arity, base types) happens in the
    /// database operation; this only resolves the constraint name. A
    /// missing constraint name falls back to the index name, then to the
    /// generated form.
    #[must_use]
    pub fn add_foreign_key(
        &self,
        constraint: Option<String>,
        index: Option<String>,
        columns: Vec<String>,
        reference: Reference,
    ) -> Self {
        let name = constraint
            .or(index)
            .unwrap_or_else(|| self.generate_foreign_key_name());

        let mut next = self.clone();
        next.foreign_keys.push(ForeignKey {
            name,
            columns,
            reference,
        });
        next
    }

    /// Returns a new table with the foreign key of the given constraint
    /// name removed.
    pub fn drop_foreign_key(&self, symbol: &str) -> Result<Self> {
        let index = self
            .foreign_keys
            .iter()
            .position(|fk| fk.name == symbol)
            .ok_or_else(|| SchemaError::ForeignKeyNotFound {
                table: self.name.clone(),
                symbol: String::from(symbol),
            })?;

        let mut next = self.clone();
        next.foreign_keys.remove(index);
        Ok(next)
    }

    /// Returns a new table with every foreign key that referenced table
    /// `from` re-pointed at `to`. Used by table renames.
    #[must_use]
    pub fn rename_reference(&self, from: &str, to: &str) -> Self {
        let mut next = self.clone();
        for fk in &mut next.foreign_keys {
            if fk.reference.table == from {
                fk.reference.table = String::from(to);
            }
        }
        next
    }

    /// Returns a new table with every foreign key reference to
    /// `table.old_column` rewritten to `table.new_column`. Used when a
    /// referenced column is renamed.
    #[must_use]
    pub fn rename_referenced_column(&self, table: &str, old_column: &str, new_column: &str) -> Self {
        let mut next = self.clone();
        for fk in &mut next.foreign_keys {
            if fk.reference.table == table && fk.reference.columns.iter().any(|c| c == old_column)
            {
                for column in &mut fk.reference.columns {
                    if column == old_column {
                        *column = String::from(new_column);
                    }
                }
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> DataType {
        DataType::Int {
            length: None,
            unsigned: false,
        }
    }

    fn column(name: &str) -> Column {
        Column {
            name: String::from(name),
            data_type: int(),
            nullable: true,
            default: None,
            auto_increment: false,
        }
    }

    fn abc_table() -> Table {
        let table = Table::new("t");
        let table = table.add_column(column("a"), None).unwrap();
        let table = table.add_column(column("b"), None).unwrap();
        table.add_column(column("c"), None).unwrap()
    }

    fn column_names(table: &Table) -> Vec<&str> {
        table.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = Table::new("users");
        assert_eq!(table.name, "users");
        assert!(table.columns.is_empty());
        assert!(table.primary_key.is_none());
        assert!(table.indexes.is_empty());
        assert!(table.foreign_keys.is_empty());
    }

    #[test]
    fn test_add_column_positions() {
        let table = abc_table();
        assert_eq!(column_names(&table), vec!["a", "b", "c"]);

        let first = table
            .add_column(column("x"), Some(&ColumnPosition::First))
            .unwrap();
        assert_eq!(column_names(&first), vec!["x", "a", "b", "c"]);

        let after = table
            .add_column(column("x"), Some(&ColumnPosition::After(String::from("a"))))
            .unwrap();
        assert_eq!(column_names(&after), vec!["a", "x", "b", "c"]);
    }

    #[test]
    fn test_add_column_after_missing_anchor() {
        let err = abc_table()
            .add_column(column("x"), Some(&ColumnPosition::After(String::from("nope"))))
            .unwrap_err();
        assert!(matches!(err, SchemaError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_add_duplicate_column_is_rejected() {
        let err = abc_table().add_column(column("b"), None).unwrap_err();
        assert!(matches!(err, SchemaError::InvariantViolation(_)));
    }

    #[test]
    fn test_replace_column_keeps_position() {
        let table = abc_table();
        let replaced = table.replace_column("b", column("b2"), None).unwrap();
        assert_eq!(column_names(&replaced), vec!["a", "b2", "c"]);
    }

    #[test]
    fn test_replace_column_repositions() {
        let table = abc_table();
        let replaced = table
            .replace_column("c", column("c"), Some(&ColumnPosition::First))
            .unwrap();
        assert_eq!(column_names(&replaced), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_remove_column() {
        let table = abc_table().remove_column("b").unwrap();
        assert_eq!(column_names(&table), vec!["a", "c"]);
        assert!(matches!(
            abc_table().remove_column("zzz").unwrap_err(),
            SchemaError::ColumnNotFound { .. }
        ));
    }

    #[test]
    fn test_primary_key_forces_not_null() {
        let table = abc_table()
            .set_primary_key(vec![String::from("a"), String::from("b")])
            .unwrap();
        assert!(!table.column("a").unwrap().nullable);
        assert!(!table.column("b").unwrap().nullable);
        assert!(table.column("c").unwrap().nullable);
        assert_eq!(
            table.primary_key.as_ref().unwrap().columns,
            vec!["a", "b"]
        );

        let cleared = table.drop_primary_key();
        assert!(cleared.primary_key.is_none());
    }

    #[test]
    fn test_generated_index_names() {
        let table = abc_table()
            .add_index(None, vec![String::from("a")], false)
            .unwrap()
            .add_index(None, vec![String::from("a"), String::from("b")], false)
            .unwrap()
            .add_index(None, vec![String::from("a")], true)
            .unwrap();

        let names: Vec<&str> = table.indexes.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a_2", "a_3"]);
    }

    #[test]
    fn test_duplicate_explicit_index_names_are_allowed() {
        let table = abc_table()
            .add_index(Some(String::from("idx")), vec![String::from("a")], false)
            .unwrap()
            .add_index(Some(String::from("idx")), vec![String::from("b")], false)
            .unwrap();
        assert_eq!(table.indexes.len(), 2);
    }

    #[test]
    fn test_generated_foreign_key_names() {
        let reference = Reference {
            table: String::from("other"),
            columns: vec![String::from("id")],
        };
        let table = abc_table()
            .add_foreign_key(None, None, vec![String::from("a")], reference.clone())
            .add_foreign_key(None, None, vec![String::from("b")], reference.clone())
            .add_foreign_key(
                Some(String::from("fk_c")),
                None,
                vec![String::from("c")],
                reference,
            );

        let names: Vec<&str> = table.foreign_keys.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["t_ibfk_1", "t_ibfk_2", "fk_c"]);
    }

    #[test]
    fn test_drop_foreign_key() {
        let reference = Reference {
            table: String::from("other"),
            columns: vec![String::from("id")],
        };
        let table = abc_table().add_foreign_key(
            Some(String::from("fk")),
            None,
            vec![String::from("a")],
            reference,
        );

        let dropped = table.drop_foreign_key("fk").unwrap();
        assert!(dropped.foreign_keys.is_empty());
        assert!(matches!(
            table.drop_foreign_key("missing").unwrap_err(),
            SchemaError::ForeignKeyNotFound { .. }
        ));
    }

    #[test]
    fn test_drop_default() {
        let mut with_default = column("a");
        with_default.default = Some(DefaultValue::Literal(crate::ast::Literal::Int(1)));
        let table = Table::new("t").add_column(with_default, None).unwrap();

        let cleared = table.drop_default("a").unwrap();
        assert_eq!(cleared.column("a").unwrap().default, None);
    }
}
