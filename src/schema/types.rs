/// Column data type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Integer,
    Text,
    Boolean,
    /// `YYYY-MM-DD` stored as text
    Date,
    /// `YYYY-MM-DD HH:MM:SS` stored as text
    Timestamp,
    /// Exact decimal stored as text so no precision is lost
    Decimal,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Text | ColumnType::Date | ColumnType::Timestamp | ColumnType::Decimal => {
                "TEXT"
            }
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }

    /// Named parameter used for this column in statements
    ///
    /// Column names may contain spaces (`Rede Social`), parameter names cannot.
    pub fn param(&self) -> String {
        format!(":{}", self.name.replace(' ', ""))
    }
}

/// Index definition
#[derive(Debug, Clone)]
pub struct Index {
    pub columns: &'static [&'static str],
    pub unique: bool,
}

impl Index {
    /// Create a non-unique index
    pub const fn on(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            unique: false,
        }
    }

    /// Create a unique index
    pub const fn unique(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            unique: true,
        }
    }
}

/// Table schema definition
#[derive(Debug)]
pub struct TableSchema {
    pub name: &'static str,
    /// Integer surrogate key, generated by the database
    pub primary_key: &'static str,
    /// Data columns in insert order (primary key excluded)
    pub columns: &'static [Column],
    pub indexes: &'static [Index],
}

impl TableSchema {
    /// `"schema"."table"` reference for statements
    pub fn qualified(&self, schema: &str) -> String {
        format!("{}.{}", quote_ident(schema), quote_ident(self.name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }
}

/// Quote an identifier for SQLite
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
