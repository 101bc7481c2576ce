//! MySQL data type definitions.

use core::fmt;

/// Precision of a fixed- or floating-point type, e.g. `decimal(10,2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Total number of significant digits.
    pub length: u32,
    /// Number of digits after the decimal point.
    pub decimals: u32,
}

impl Precision {
    /// Creates a new precision.
    #[must_use]
    pub const fn new(length: u32, decimals: u32) -> Self {
        Self { length, decimals }
    }
}

/// MySQL data types, one variant per type the DDL grammar accepts.
///
/// Display widths, precisions and character sets are carried verbatim from
/// the declaration; rendering quirks such as `int` → `int(11)` are applied
/// by the serializer, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    // Integer family
    /// 1-byte integer. `tinyint(1)` doubles as MySQL's boolean.
    TinyInt {
        /// Display width, if declared.
        length: Option<u32>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },
    /// 2-byte integer.
    SmallInt {
        /// Display width, if declared.
        length: Option<u32>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },
    /// 3-byte integer.
    MediumInt {
        /// Display width, if declared.
        length: Option<u32>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },
    /// 4-byte integer.
    Int {
        /// Display width, if declared.
        length: Option<u32>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },
    /// 8-byte integer.
    BigInt {
        /// Display width, if declared.
        length: Option<u32>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },

    // Real family
    /// Exact fixed-point number.
    Decimal {
        /// Precision, if declared.
        precision: Option<Precision>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },
    /// 4-byte float.
    Float {
        /// Precision, if declared.
        precision: Option<Precision>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },
    /// 8-byte float.
    Double {
        /// Precision, if declared.
        precision: Option<Precision>,
        /// UNSIGNED attribute.
        unsigned: bool,
    },

    // Temporal family
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Year.
    Year,
    /// Date and time, no timezone semantics.
    DateTime {
        /// Fractional-seconds precision, if declared.
        fsp: Option<u32>,
    },
    /// Unix-epoch timestamp.
    Timestamp {
        /// Fractional-seconds precision, if declared.
        fsp: Option<u32>,
    },

    // Textual family
    /// Fixed-length string.
    Char {
        /// Length in characters, if declared.
        length: Option<u32>,
        /// CHARACTER SET attribute.
        charset: Option<String>,
    },
    /// Variable-length string.
    VarChar {
        /// Maximum length in characters.
        length: u32,
        /// CHARACTER SET attribute.
        charset: Option<String>,
    },
    /// Up to 64KiB of text.
    Text {
        /// CHARACTER SET attribute.
        charset: Option<String>,
    },
    /// Up to 16MiB of text.
    MediumText {
        /// CHARACTER SET attribute.
        charset: Option<String>,
    },
    /// Up to 4GiB of text.
    LongText {
        /// CHARACTER SET attribute.
        charset: Option<String>,
    },
    /// Enumeration; carries at least one value (the grammar requires it).
    Enum {
        /// The allowed values, in declaration order.
        values: Vec<String>,
        /// CHARACTER SET attribute.
        charset: Option<String>,
    },

    // Bytes family
    /// Fixed-length binary string.
    Binary {
        /// Length in bytes, if declared.
        length: Option<u32>,
    },
    /// Variable-length binary string.
    VarBinary {
        /// Maximum length in bytes.
        length: u32,
    },
    /// Up to 255 bytes.
    TinyBlob,
    /// Up to 64KiB.
    Blob {
        /// Length hint, if declared.
        length: Option<u32>,
    },
    /// Up to 16MiB.
    MediumBlob,
    /// Up to 4GiB.
    LongBlob,

    /// JSON document.
    Json,
}

impl DataType {
    /// Returns the fundamental storage category of this type, independent of
    /// display width, precision or character set.
    ///
    /// Foreign-key compatibility is decided on this value.
    #[must_use]
    pub const fn base_type(&self) -> &'static str {
        match self {
            Self::TinyInt { .. } => "tinyint",
            Self::SmallInt { .. } => "smallint",
            Self::MediumInt { .. } => "mediumint",
            Self::Int { .. } => "int",
            Self::BigInt { .. } => "bigint",
            Self::Decimal { .. } => "decimal",
            Self::Float { .. } => "float",
            Self::Double { .. } => "double",
            Self::Date => "date",
            Self::Time => "time",
            Self::Year => "year",
            Self::DateTime { .. } => "datetime",
            Self::Timestamp { .. } => "timestamp",
            Self::Char { .. } => "char",
            Self::VarChar { .. } => "varchar",
            Self::Text { .. } => "text",
            Self::MediumText { .. } => "mediumtext",
            Self::LongText { .. } => "longtext",
            Self::Enum { .. } => "enum",
            Self::Binary { .. } => "binary",
            Self::VarBinary { .. } => "varbinary",
            Self::TinyBlob => "tinyblob",
            Self::Blob { .. } => "blob",
            Self::MediumBlob => "mediumblob",
            Self::LongBlob => "longblob",
            Self::Json => "json",
        }
    }

    /// Renders the type as declared, lower-cased, e.g. `int(10) unsigned`,
    /// `decimal(10,2)` or `enum('a','b')`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::TinyInt { length, unsigned }
            | Self::SmallInt { length, unsigned }
            | Self::MediumInt { length, unsigned }
            | Self::Int { length, unsigned }
            | Self::BigInt { length, unsigned } => {
                integer_sql(self.base_type(), *length, *unsigned)
            }
            Self::Decimal {
                precision,
                unsigned,
            }
            | Self::Float {
                precision,
                unsigned,
            }
            | Self::Double {
                precision,
                unsigned,
            } => {
                let mut sql = String::from(self.base_type());
                if let Some(p) = precision {
                    sql.push_str(&format!("({},{})", p.length, p.decimals));
                }
                if *unsigned {
                    sql.push_str(" unsigned");
                }
                sql
            }
            Self::Date | Self::Time | Self::Year
            | Self::TinyBlob | Self::MediumBlob | Self::LongBlob
            | Self::Json => String::from(self.base_type()),
            Self::DateTime { fsp } | Self::Timestamp { fsp } => match fsp {
                Some(n) => format!("{}({n})", self.base_type()),
                None => String::from(self.base_type()),
            },
            Self::Char { length, .. } | Self::Binary { length } | Self::Blob { length } => {
                match length {
                    Some(n) => format!("{}({n})", self.base_type()),
                    None => String::from(self.base_type()),
                }
            }
            Self::VarChar { length, .. } => format!("varchar({length})"),
            Self::VarBinary { length } => format!("varbinary({length})"),
            Self::Text { .. } | Self::MediumText { .. } | Self::LongText { .. } => {
                String::from(self.base_type())
            }
            Self::Enum { values, .. } => {
                let items: Vec<String> = values
                    .iter()
                    .map(|v| format!("'{}'", v.replace('\'', "''")))
                    .collect();
                format!("enum({})", items.join(","))
            }
        }
    }
}

fn integer_sql(base: &str, length: Option<u32>, unsigned: bool) -> String {
    let mut sql = match length {
        Some(n) => format!("{base}({n})"),
        None => String::from(base),
    };
    if unsigned {
        sql.push_str(" unsigned");
    }
    sql
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
