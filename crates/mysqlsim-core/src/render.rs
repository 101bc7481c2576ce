//! Canonical `CREATE TABLE` rendering.
//!
//! Reproduces the dialect's `SHOW CREATE TABLE`-style output, including its
//! non-obvious quirks: display-width substitutions applied only at render
//! time, number defaults quoted as strings, boolean defaults on `tinyint(1)`
//! rendered as `'0'`/`'1'`, and the explicit `NULL` on nullable timestamps.

use crate::ast::{DefaultValue, Literal};
use crate::schema::{Column, Database, Result, Table};

/// Quotes an identifier in backticks, escaping embedded backticks.
fn escape(name: &str) -> String {
    format!("`{}`", name.replace('`', "\\`"))
}

fn escape_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| escape(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a default value against the column's rendered type.
fn default_sql(default: &DefaultValue, type_sql: &str) -> String {
    match default {
        DefaultValue::Literal(Literal::Int(value)) => {
            // The dialect prints number constants as quoted strings, and
            // pads decimal defaults to two fractional digits.
            if type_sql.starts_with("decimal") {
                format!("'{value}.00'")
            } else {
                format!("'{value}'")
            }
        }
        DefaultValue::Literal(Literal::Float(value)) => {
            if type_sql.starts_with("decimal") {
                format!("'{value:.2}'")
            } else {
                format!("'{value}'")
            }
        }
        DefaultValue::Literal(Literal::Bool(value)) => {
            if type_sql == "tinyint(1)" {
                if *value { String::from("'1'") } else { String::from("'0'") }
            } else if *value {
                String::from("TRUE")
            } else {
                String::from("FALSE")
            }
        }
        DefaultValue::Literal(Literal::String(value)) => {
            format!("'{}'", value.replace('\'', "''"))
        }
        DefaultValue::Literal(Literal::Null) => String::from("NULL"),
        DefaultValue::CurrentTimestamp { precision } => match precision {
            Some(p) => format!("CURRENT_TIMESTAMP({p})"),
            None => String::from("CURRENT_TIMESTAMP"),
        },
    }
}

/// Renders one column definition line.
fn column_definition(column: &Column) -> String {
    let mut type_sql = column.data_type.to_sql();

    let default = column
        .default
        .as_ref()
        .map(|d| format!("DEFAULT {}", default_sql(d, &type_sql)));
    let mut default = default.unwrap_or_default();

    let nullable = if column.nullable {
        // Timestamps require an explicit NULL; other types are NULL by
        // default and the dialect omits it.
        if type_sql == "timestamp" {
            "NULL"
        } else {
            ""
        }
    } else {
        "NOT NULL"
    };

    // The dialect never prints DEFAULT NULL for TEXT/BLOB columns, and
    // widens bare integer types only in its output.
    if type_sql == "text" || type_sql == "blob" {
        if default == "DEFAULT NULL" {
            default = String::new();
        }
    } else if type_sql == "int" {
        type_sql = String::from("int(11)");
    } else if type_sql == "smallint" {
        type_sql = String::from("smallint(6)");
    } else if type_sql == "smallint unsigned" {
        type_sql = String::from("smallint(5) unsigned");
    }

    let auto_increment = if column.auto_increment {
        "AUTO_INCREMENT"
    } else {
        ""
    };

    [
        escape(&column.name),
        type_sql,
        String::from(nullable),
        default,
        String::from(auto_increment),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Produces the body lines of a table's `CREATE TABLE`.
fn table_lines(table: &Table) -> Vec<String> {
    let mut lines: Vec<String> = table.columns.iter().map(column_definition).collect();

    if let Some(pk) = &table.primary_key {
        lines.push(format!("PRIMARY KEY ({})", escape_list(&pk.columns)));
    }

    for index in table.indexes.iter().filter(|i| i.unique) {
        lines.push(format!(
            "UNIQUE KEY {} ({})",
            escape(&index.name),
            escape_list(&index.columns)
        ));
    }
    for index in table.indexes.iter().filter(|i| !i.unique) {
        lines.push(format!(
            "KEY {} ({})",
            escape(&index.name),
            escape_list(&index.columns)
        ));
    }

    // Foreign keys render in name order for determinism.
    let mut foreign_keys: Vec<_> = table.foreign_keys.iter().collect();
    foreign_keys.sort_by(|a, b| a.name.cmp(&b.name));
    for fk in foreign_keys {
        lines.push(format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            escape(&fk.name),
            escape_list(&fk.columns),
            escape(&fk.reference.table),
            escape_list(&fk.reference.columns)
        ));
    }

    lines
}

/// Renders a table as canonical `CREATE TABLE` text.
#[must_use]
pub fn table_sql(table: &Table) -> String {
    let body = table_lines(table)
        .iter()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "CREATE TABLE {} (\n{}\n) ENGINE=InnoDB DEFAULT CHARSET=utf8;",
        escape(&table.name),
        body
    )
}

/// Renders the named table from the database.
///
/// # Errors
///
/// Fails with `TableNotFound` if the table does not exist.
pub fn render_table(db: &Database, name: &str) -> Result<String> {
    Ok(table_sql(db.table(name)?))
}

/// Renders the given tables, or every table sorted by name when `tables`
/// is empty.
///
/// # Errors
///
/// Fails with `TableNotFound` if a requested table does not exist.
pub fn render_database(db: &Database, tables: &[String]) -> Result<String> {
    let names: Vec<String> = if tables.is_empty() {
        db.table_names().map(String::from).collect()
    } else {
        tables.to_vec()
    };

    let mut blocks = Vec::with_capacity(names.len());
    for name in &names {
        blocks.push(render_table(db, name)?);
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DataType, Precision};

    fn column(name: &str, data_type: DataType) -> Column {
        Column {
            name: String::from(name),
            data_type,
            nullable: true,
            default: None,
            auto_increment: false,
        }
    }

    #[test]
    fn test_bare_int_widens() {
        let col = Column {
            nullable: false,
            ..column(
                "id",
                DataType::Int {
                    length: None,
                    unsigned: false,
                },
            )
        };
        assert_eq!(column_definition(&col), "`id` int(11) NOT NULL");
    }

    #[test]
    fn test_declared_width_is_kept() {
        let col = column(
            "id",
            DataType::Int {
                length: Some(10),
                unsigned: true,
            },
        );
        assert_eq!(column_definition(&col), "`id` int(10) unsigned");
    }

    #[test]
    fn test_smallint_widening() {
        let plain = column(
            "n",
            DataType::SmallInt {
                length: None,
                unsigned: false,
            },
        );
        assert_eq!(column_definition(&plain), "`n` smallint(6)");

        let unsigned = column(
            "n",
            DataType::SmallInt {
                length: None,
                unsigned: true,
            },
        );
        assert_eq!(column_definition(&unsigned), "`n` smallint(5) unsigned");
    }

    #[test]
    fn test_decimal_default_padded_to_two_digits() {
        let col = Column {
            default: Some(DefaultValue::Literal(Literal::Int(5))),
            ..column(
                "price",
                DataType::Decimal {
                    precision: Some(Precision::new(10, 2)),
                    unsigned: false,
                },
            )
        };
        assert_eq!(
            column_definition(&col),
            "`price` decimal(10,2) DEFAULT '5.00'"
        );
    }

    #[test]
    fn test_numeric_default_quoted() {
        let col = Column {
            default: Some(DefaultValue::Literal(Literal::Int(42))),
            ..column(
                "n",
                DataType::BigInt {
                    length: None,
                    unsigned: false,
                },
            )
        };
        assert_eq!(column_definition(&col), "`n` bigint DEFAULT '42'");
    }

    #[test]
    fn test_tinyint1_boolean_defaults() {
        let base = column(
            "active",
            DataType::TinyInt {
                length: Some(1),
                unsigned: false,
            },
        );

        let yes = Column {
            default: Some(DefaultValue::Literal(Literal::Bool(true))),
            ..base.clone()
        };
        assert_eq!(column_definition(&yes), "`active` tinyint(1) DEFAULT '1'");

        let no = Column {
            default: Some(DefaultValue::Literal(Literal::Bool(false))),
            ..base
        };
        assert_eq!(column_definition(&no), "`active` tinyint(1) DEFAULT '0'");
    }

    #[test]
    fn test_text_null_default_suppressed() {
        let col = Column {
            default: Some(DefaultValue::null()),
            ..column("body", DataType::Text { charset: None })
        };
        assert_eq!(column_definition(&col), "`body` text");

        // Other types keep the explicit DEFAULT NULL.
        let col = Column {
            default: Some(DefaultValue::null()),
            ..column(
                "n",
                DataType::Int {
                    length: Some(11),
                    unsigned: false,
                },
            )
        };
        assert_eq!(column_definition(&col), "`n` int(11) DEFAULT NULL");
    }

    #[test]
    fn test_absent_default_renders_no_clause() {
        let col = column(
            "email",
            DataType::VarChar {
                length: 255,
                charset: None,
            },
        );
        assert_eq!(column_definition(&col), "`email` varchar(255)");
    }

    #[test]
    fn test_nullable_timestamp_renders_explicit_null() {
        let col = column("seen_at", DataType::Timestamp { fsp: None });
        assert_eq!(column_definition(&col), "`seen_at` timestamp NULL");

        // A fractional-seconds timestamp is a different rendered type and
        // does not get the explicit NULL.
        let col = column("seen_at", DataType::Timestamp { fsp: Some(6) });
        assert_eq!(column_definition(&col), "`seen_at` timestamp(6)");
    }

    #[test]
    fn test_current_timestamp_default() {
        let col = Column {
            nullable: false,
            default: Some(DefaultValue::CurrentTimestamp { precision: None }),
            ..column("created_at", DataType::Timestamp { fsp: None })
        };
        assert_eq!(
            column_definition(&col),
            "`created_at` timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_backtick_escaped_in_identifier() {
        let col = column(
            "weird`name",
            DataType::Int {
                length: Some(11),
                unsigned: false,
            },
        );
        assert!(column_definition(&col).starts_with("`weird\\`name`"));
    }

    #[test]
    fn test_full_table_rendering() {
        let db = Database::new();
        let db = db.create_table("users").unwrap();
        let db = db
            .add_column(
                "users",
                Column {
                    nullable: false,
                    auto_increment: true,
                    ..column(
                        "id",
                        DataType::Int {
                            length: None,
                            unsigned: false,
                        },
                    )
                },
                None,
            )
            .unwrap();
        let db = db
            .add_column(
                "users",
                Column {
                    nullable: false,
                    ..column(
                        "name",
                        DataType::VarChar {
                            length: 100,
                            charset: None,
                        },
                    )
                },
                None,
            )
            .unwrap();
        let db = db
            .set_primary_key("users", vec![String::from("id")])
            .unwrap();

        assert_eq!(
            render_table(&db, "users").unwrap(),
            "CREATE TABLE `users` (\n\
             \x20 `id` int(11) NOT NULL AUTO_INCREMENT,\n\
             \x20 `name` varchar(100) NOT NULL,\n\
             \x20 PRIMARY KEY (`id`)\n\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8;"
        );
    }

    #[test]
    fn test_foreign_keys_render_sorted_by_name() {
        let db = Database::new()
            .create_table("a")
            .unwrap()
            .add_column(
                "a",
                column(
                    "id",
                    DataType::Int {
                        length: None,
                        unsigned: false,
                    },
                ),
                None,
            )
            .unwrap()
            .create_table("b")
            .unwrap()
            .add_column(
                "b",
                column(
                    "x",
                    DataType::Int {
                        length: None,
                        unsigned: false,
                    },
                ),
                None,
            )
            .unwrap()
            .add_column(
                "b",
                column(
                    "y",
                    DataType::Int {
                        length: None,
                        unsigned: false,
                    },
                ),
                None,
            )
            .unwrap();

        let db = db
            .add_foreign_key(
                "b",
                Some(String::from("zz_later")),
                None,
                vec![String::from("x")],
                "a",
                vec![String::from("id")],
            )
            .unwrap()
            .add_foreign_key(
                "b",
                Some(String::from("aa_first")),
                None,
                vec![String::from("y")],
                "a",
                vec![String::from("id")],
            )
            .unwrap();

        let sql = render_table(&db, "b").unwrap();
        let aa = sql.find("aa_first").unwrap();
        let zz = sql.find("zz_later").unwrap();
        assert!(aa < zz);
    }

    #[test]
    fn test_render_database_sorts_tables_by_name() {
        let db = Database::new()
            .create_table("zebra")
            .unwrap()
            .create_table("apple")
            .unwrap();
        // Each table still renders a body; give them one column apiece.
        let db = db
            .add_column(
                "zebra",
                column(
                    "id",
                    DataType::Int {
                        length: None,
                        unsigned: false,
                    },
                ),
                None,
            )
            .unwrap()
            .add_column(
                "apple",
                column(
                    "id",
                    DataType::Int {
                        length: None,
                        unsigned: false,
                    },
                ),
                None,
            )
            .unwrap();

        let sql = render_database(&db, &[]).unwrap();
        let apple = sql.find("`apple`").unwrap();
        let zebra = sql.find("`zebra`").unwrap();
        assert!(apple < zebra);
        assert!(sql.ends_with(";\n"));
    }
}
