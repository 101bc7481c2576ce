//! The database value type: a persistent, name-keyed collection of tables.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ast::{ColumnPosition, Reference};

use super::error::{Result, SchemaError};
use super::table::{Column, Table};

/// An immutable database value.
///
/// Every mutator returns a new `Database`; unaffected tables are shared
/// structurally (each table sits behind an `Arc`), so holding many
/// historical snapshots stays cheap. Table names are compared exactly and
/// case-sensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    tables: BTreeMap<String, Arc<Table>>,
}

impl Database {
    /// Creates a new empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a table with the given name exists.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| SchemaError::TableNotFound(String::from(name)))
    }

    /// Iterates over all tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values().map(AsRef::as_ref)
    }

    /// Iterates over all table names in order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the database has no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn assert_table_does_not_exist(&self, name: &str) -> Result<()> {
        if self.has(name) {
            return Err(SchemaError::TableAlreadyExists(String::from(name)));
        }
        Ok(())
    }

    /// Returns a new database with the given table added.
    pub fn add_table(&self, table: Table) -> Result<Self> {
        self.assert_table_does_not_exist(&table.name)?;
        let mut next = self.clone();
        next.tables.insert(table.name.clone(), Arc::new(table));
        Ok(next)
    }

    /// Returns a new database with an empty table of the given name added.
    pub fn create_table(&self, name: &str) -> Result<Self> {
        self.add_table(Table::new(name))
    }

    /// Returns a new database with a copy of `source`'s structure added
    /// under `name`.
    pub fn clone_table(&self, source: &str, name: &str) -> Result<Self> {
        let table = self.table(source)?.clone_to(name);
        self.add_table(table)
    }

    /// Returns a new database with the table renamed and every other
    /// table's foreign keys that pointed at it re-targeted in the same
    /// operation.
    pub fn rename_table(&self, from: &str, to: &str) -> Result<Self> {
        self.table(from)?;
        self.assert_table_does_not_exist(to)?;

        let mut next = Self::new();
        for table in self.tables() {
            let mut table = if table.name == from {
                table.rename(to)
            } else {
                table.clone()
            };
            table = table.rename_reference(from, to);
            next.tables.insert(table.name.clone(), Arc::new(table));
        }
        Ok(next)
    }

    /// Returns a new database with the table removed. With `if_exists`, a
    /// missing table is a silent no-op.
    pub fn remove_table(&self, name: &str, if_exists: bool) -> Result<Self> {
        if !if_exists {
            self.table(name)?;
        }

        let mut next = self.clone();
        next.tables.remove(name);
        Ok(next)
    }

    /// Replaces the named table with `mapper(table)`.
    ///
    /// This is the single primitive every table-level mutator goes through:
    /// database-level identity invariants are checked here, and here only.
    /// The mapper must not change the table's name.
    fn swap_table(&self, name: &str, mapper: impl FnOnce(&Table) -> Result<Table>) -> Result<Self> {
        let table = mapper(self.table(name)?)?;
        if table.name != name {
            return Err(SchemaError::InvariantViolation(String::from(
                "swap_table cannot be used to change the name of a table",
            )));
        }

        let mut next = self.clone();
        next.tables.insert(table.name.clone(), Arc::new(table));
        Ok(next)
    }

    /// Returns a new database with the column added to the named table.
    pub fn add_column(
        &self,
        table: &str,
        column: Column,
        position: Option<&ColumnPosition>,
    ) -> Result<Self> {
        self.swap_table(table, |t| t.add_column(column, position))
    }

    /// Returns a new database with the named column replaced by a new
    /// definition. If the column is renamed, every foreign key anywhere in
    /// the database that referenced `table.old_name` is rewritten to the
    /// new name.
    pub fn replace_column(
        &self,
        table: &str,
        old_name: &str,
        column: Column,
        position: Option<&ColumnPosition>,
    ) -> Result<Self> {
        let new_name = column.name.clone();
        let next = self.swap_table(table, |t| t.replace_column(old_name, column, position))?;

        if new_name == old_name {
            return Ok(next);
        }

        let mut cascaded = Self::new();
        for t in next.tables() {
            let t = t.rename_referenced_column(table, old_name, &new_name);
            cascaded.tables.insert(t.name.clone(), Arc::new(t));
        }
        Ok(cascaded)
    }

    /// Returns a new database with the column removed from the named table.
    pub fn remove_column(&self, table: &str, column: &str) -> Result<Self> {
        self.swap_table(table, |t| t.remove_column(column))
    }

    /// Returns a new database with the column's default value cleared.
    pub fn drop_default(&self, table: &str, column: &str) -> Result<Self> {
        self.swap_table(table, |t| t.drop_default(column))
    }

    /// Returns a new database with the table's primary key replaced.
    pub fn set_primary_key(&self, table: &str, columns: Vec<String>) -> Result<Self> {
        self.swap_table(table, |t| t.set_primary_key(columns))
    }

    /// Returns a new database with the table's primary key cleared.
    pub fn drop_primary_key(&self, table: &str) -> Result<Self> {
        self.swap_table(table, |t| Ok(t.drop_primary_key()))
    }

    /// Returns a new database with a foreign key added to the named table.
    ///
    /// Both tables must exist, the column lists must have equal length, and
    /// every paired local/target column must exist and agree on its base
    /// type. Validation failures leave the receiver unchanged.
    pub fn add_foreign_key(
        &self,
        table: &str,
        constraint: Option<String>,
        index: Option<String>,
        columns: Vec<String>,
        target_table: &str,
        target_columns: Vec<String>,
    ) -> Result<Self> {
        let local = self.table(table)?;
        let target = self.table(target_table)?;

        if columns.len() != target_columns.len() {
            return Err(SchemaError::ColumnCountMismatch {
                local: columns.len(),
                target: target_columns.len(),
            });
        }

        for (local_name, target_name) in columns.iter().zip(&target_columns) {
            let local_column = local.column(local_name)?;
            let target_column = target.column(target_name)?;

            if local_column.data_type.base_type() != target_column.data_type.base_type() {
                return Err(SchemaError::ForeignKeyTypeMismatch {
                    local_column: format!("{}.{}", local.name, local_column.name),
                    local_type: local_column.data_type.to_sql(),
                    target_column: format!("{}.{}", target.name, target_column.name),
                    target_type: target_column.data_type.to_sql(),
                });
            }
        }

        let reference = Reference {
            table: String::from(target_table),
            columns: target_columns,
        };
        self.swap_table(table, |t| {
            Ok(t.add_foreign_key(constraint, index, columns, reference))
        })
    }

    /// Returns a new database with the named foreign key removed from the
    /// table.
    pub fn drop_foreign_key(&self, table: &str, symbol: &str) -> Result<Self> {
        self.swap_table(table, |t| t.drop_foreign_key(symbol))
    }

    /// Returns a new database with an index added to the named table.
    pub fn add_index(
        &self,
        table: &str,
        name: Option<String>,
        columns: Vec<String>,
        unique: bool,
    ) -> Result<Self> {
        self.swap_table(table, |t| t.add_index(name, columns, unique))
    }

    /// Returns a new database with the named index removed from the table.
    pub fn drop_index(&self, table: &str, name: &str) -> Result<Self> {
        self.swap_table(table, |t| t.drop_index(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DataType;

    fn column(name: &str, data_type: DataType) -> Column {
        Column {
            name: String::from(name),
            data_type,
            nullable: true,
            default: None,
            auto_increment: false,
        }
    }

    fn int() -> DataType {
        DataType::Int {
            length: None,
            unsigned: false,
        }
    }

    fn bigint() -> DataType {
        DataType::BigInt {
            length: None,
            unsigned: false,
        }
    }

    /// users(id int) and posts(user_id int) with a named FK posts → users.
    fn linked_db() -> Database {
        let db = Database::new();
        let db = db.create_table("users").unwrap();
        let db = db.add_column("users", column("id", int()), None).unwrap();
        let db = db.create_table("posts").unwrap();
        let db = db
            .add_column("posts", column("user_id", int()), None)
            .unwrap();
        db.add_foreign_key(
            "posts",
            Some(String::from("fk_posts_user")),
            None,
            vec![String::from("user_id")],
            "users",
            vec![String::from("id")],
        )
        .unwrap()
    }

    #[test]
    fn test_create_table_starts_empty() {
        let db = Database::new().create_table("t").unwrap();
        let table = db.table("t").unwrap();
        assert!(table.columns.is_empty());
        assert!(table.primary_key.is_none());
        assert!(table.indexes.is_empty());
        assert!(table.foreign_keys.is_empty());
    }

    #[test]
    fn test_create_table_twice_fails() {
        let db = Database::new().create_table("t").unwrap();
        assert_eq!(
            db.create_table("t").unwrap_err(),
            SchemaError::TableAlreadyExists(String::from("t"))
        );
    }

    #[test]
    fn test_table_names_are_case_sensitive() {
        let db = Database::new().create_table("Users").unwrap();
        assert!(db.has("Users"));
        assert!(!db.has("users"));
        // Same name in a different case is a distinct table.
        db.create_table("users").unwrap();
    }

    #[test]
    fn test_mutators_leave_receiver_unchanged() {
        let db = Database::new().create_table("a").unwrap();
        let _ = db.create_table("b").unwrap();
        let _ = db.remove_table("a", false).unwrap();
        assert!(db.has("a"));
        assert!(!db.has("b"));
    }

    #[test]
    fn test_rename_table_cascades_references() {
        let db = linked_db();
        let renamed = db.rename_table("users", "accounts").unwrap();

        assert!(!renamed.has("users"));
        let accounts = renamed.table("accounts").unwrap();
        assert_eq!(accounts.columns.len(), 1);

        let fk = &renamed.table("posts").unwrap().foreign_keys[0];
        assert_eq!(fk.reference.table, "accounts");
        assert_eq!(fk.reference.columns, vec!["id"]);
    }

    #[test]
    fn test_rename_table_to_existing_fails() {
        let db = linked_db();
        assert_eq!(
            db.rename_table("users", "posts").unwrap_err(),
            SchemaError::TableAlreadyExists(String::from("posts"))
        );
        assert_eq!(
            db.rename_table("ghosts", "x").unwrap_err(),
            SchemaError::TableNotFound(String::from("ghosts"))
        );
    }

    #[test]
    fn test_remove_table_if_exists() {
        let db = Database::new();
        assert_eq!(
            db.remove_table("nope", false).unwrap_err(),
            SchemaError::TableNotFound(String::from("nope"))
        );
        let same = db.remove_table("nope", true).unwrap();
        assert!(same.is_empty());
    }

    #[test]
    fn test_clone_table() {
        let db = linked_db();
        let db = db.clone_table("users", "users_backup").unwrap();
        let backup = db.table("users_backup").unwrap();
        assert_eq!(backup.columns.len(), 1);
        assert!(matches!(
            db.clone_table("ghosts", "x").unwrap_err(),
            SchemaError::TableNotFound(_)
        ));
    }

    #[test]
    fn test_replace_column_rename_cascades_references() {
        let db = linked_db();
        let db = db
            .replace_column("users", "id", column("uid", int()), None)
            .unwrap();

        let fk = &db.table("posts").unwrap().foreign_keys[0];
        assert_eq!(fk.reference.columns, vec!["uid"]);
        // The local side of the key is untouched.
        assert_eq!(fk.columns, vec!["user_id"]);
    }

    #[test]
    fn test_foreign_key_arity_mismatch() {
        let db = linked_db();
        let err = db
            .add_foreign_key(
                "posts",
                None,
                None,
                vec![String::from("user_id")],
                "users",
                vec![],
            )
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::ColumnCountMismatch {
                local: 1,
                target: 0
            }
        );
    }

    #[test]
    fn test_foreign_key_type_mismatch() {
        let db = Database::new()
            .create_table("users")
            .unwrap()
            .add_column("users", column("id", bigint()), None)
            .unwrap()
            .create_table("posts")
            .unwrap()
            .add_column("posts", column("user_id", int()), None)
            .unwrap();

        let err = db
            .add_foreign_key(
                "posts",
                None,
                None,
                vec![String::from("user_id")],
                "users",
                vec![String::from("id")],
            )
            .unwrap_err();

        assert_eq!(
            err,
            SchemaError::ForeignKeyTypeMismatch {
                local_column: String::from("posts.user_id"),
                local_type: String::from("int"),
                target_column: String::from("users.id"),
                target_type: String::from("bigint"),
            }
        );
    }

    #[test]
    fn test_foreign_key_width_difference_is_compatible() {
        // Display width is a rendering quirk, not part of the base type.
        let db = Database::new()
            .create_table("users")
            .unwrap()
            .add_column(
                "users",
                column(
                    "id",
                    DataType::Int {
                        length: Some(11),
                        unsigned: false,
                    },
                ),
                None,
            )
            .unwrap()
            .create_table("posts")
            .unwrap()
            .add_column("posts", column("user_id", int()), None)
            .unwrap();

        db.add_foreign_key(
            "posts",
            None,
            None,
            vec![String::from("user_id")],
            "users",
            vec![String::from("id")],
        )
        .unwrap();
    }

    #[test]
    fn test_drop_column_leaves_foreign_key_reference() {
        // Removing a referenced column does not cascade into foreign keys
        // elsewhere; the dangling reference survives.
        let db = linked_db();
        let db = db.remove_column("users", "id").unwrap();

        let fk = &db.table("posts").unwrap().foreign_keys[0];
        assert_eq!(fk.reference.table, "users");
        assert_eq!(fk.reference.columns, vec!["id"]);
    }

    #[test]
    fn test_drop_foreign_key() {
        let db = linked_db();
        let db = db.drop_foreign_key("posts", "fk_posts_user").unwrap();
        assert!(db.table("posts").unwrap().foreign_keys.is_empty());

        assert!(matches!(
            db.drop_foreign_key("posts", "fk_posts_user").unwrap_err(),
            SchemaError::ForeignKeyNotFound { .. }
        ));
    }

    #[test]
    fn test_add_index_requires_columns() {
        let db = linked_db();
        let err = db
            .add_index("users", None, vec![String::from("missing")], false)
            .unwrap_err();
        assert!(matches!(err, SchemaError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_drop_index() {
        let db = linked_db()
            .add_index(
                "users",
                Some(String::from("idx_id")),
                vec![String::from("id")],
                true,
            )
            .unwrap();
        let db = db.drop_index("users", "idx_id").unwrap();
        assert!(db.table("users").unwrap().indexes.is_empty());
        assert!(matches!(
            db.drop_index("users", "idx_id").unwrap_err(),
            SchemaError::IndexNotFound { .. }
        ));
    }

    #[test]
    fn test_snapshots_share_unaffected_tables() {
        let db = linked_db();
        let next = db.create_table("tags").unwrap();

        let before = db.tables.get("users").map(Arc::as_ptr);
        let after = next.tables.get("users").map(Arc::as_ptr);
        assert_eq!(before, after);
    }
}
