//! Schema operations and their SQL rendering
//!
//! Migrations describe schema changes as [`SchemaOp`] values; the
//! interpreter renders them per [`Dialect`] right before execution.

/// SQL dialect a schema operation is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// Portable column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-assigned integer surrogate key
    Serial,
    Integer,
    Varchar(u32),
    Text,
    Double,
    Json,
    /// UTC timestamp
    Timestamp,
}

impl ColumnType {
    fn render(self, dialect: Dialect) -> String {
        match (self, dialect) {
            (Self::Serial, Dialect::Postgres) => "SERIAL".to_string(),
            // INTEGER under a single-column PRIMARY KEY aliases the SQLite rowid
            (Self::Serial, Dialect::Sqlite) | (Self::Integer, _) => "INTEGER".to_string(),
            (Self::Varchar(len), _) => format!("VARCHAR({len})"),
            (Self::Text, _) => "TEXT".to_string(),
            (Self::Double, Dialect::Postgres) => "DOUBLE PRECISION".to_string(),
            (Self::Double, Dialect::Sqlite) => "REAL".to_string(),
            (Self::Json, Dialect::Postgres) => "JSONB".to_string(),
            (Self::Timestamp, Dialect::Postgres) => "TIMESTAMPTZ".to_string(),
            (Self::Json | Self::Timestamp, Dialect::Sqlite) => "TEXT".to_string(),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
}

/// Single-column foreign key; referencing rows go with the referenced row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub ref_table: &'static str,
    pub ref_column: &'static str,
}

impl ForeignKey {
    /// Foreign key whose rows are deleted with the referenced row
    pub fn cascade(column: &'static str, ref_table: &'static str, ref_column: &'static str) -> Self {
        Self {
            column,
            ref_table,
            ref_column,
        }
    }
}

/// Table definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub primary_key: Vec<&'static str>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Add a NOT NULL column
    pub fn column(mut self, name: &'static str, ty: ColumnType) -> Self {
        self.columns.push(Column {
            name,
            ty,
            nullable: false,
        });
        self
    }

    /// Add a nullable column
    pub fn nullable_column(mut self, name: &'static str, ty: ColumnType) -> Self {
        self.columns.push(Column {
            name,
            ty,
            nullable: true,
        });
        self
    }

    pub fn primary_key(mut self, columns: &[&'static str]) -> Self {
        self.primary_key = columns.to_vec();
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }
}

/// Index definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: Vec<&'static str>,
    pub unique: bool,
}

impl Index {
    pub fn new(name: &'static str, table: &'static str, columns: &[&'static str]) -> Self {
        Self {
            name,
            table,
            columns: columns.to_vec(),
            unique: false,
        }
    }

    pub fn unique(name: &'static str, table: &'static str, columns: &[&'static str]) -> Self {
        Self {
            unique: true,
            ..Self::new(name, table, columns)
        }
    }
}

/// One structural schema change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOp {
    CreateTable(Table),
    DropTable(&'static str),
    CreateIndex(Index),
    DropIndex {
        name: &'static str,
        table: &'static str,
    },
}

impl SchemaOp {
    /// The operation undoing this one.
    ///
    /// `None` for drops: the dropped definition is not recoverable from the op.
    pub fn inverse(&self) -> Option<SchemaOp> {
        match self {
            Self::CreateTable(table) => Some(Self::DropTable(table.name)),
            Self::CreateIndex(index) => Some(Self::DropIndex {
                name: index.name,
                table: index.table,
            }),
            Self::DropTable(_) | Self::DropIndex { .. } => None,
        }
    }

    /// Render the operation as a single SQL statement
    pub fn to_sql(&self, dialect: Dialect) -> String {
        match self {
            Self::CreateTable(table) => render_create_table(table, dialect),
            Self::DropTable(name) => format!("DROP TABLE {name}"),
            Self::CreateIndex(index) => format!(
                "CREATE {}INDEX {} ON {} ({})",
                if index.unique { "UNIQUE " } else { "" },
                index.name,
                index.table,
                index.columns.join(", ")
            ),
            Self::DropIndex { name, .. } => format!("DROP INDEX {name}"),
        }
    }
}

fn render_create_table(table: &Table, dialect: Dialect) -> String {
    let mut parts: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            format!(
                "{} {}{}",
                c.name,
                c.ty.render(dialect),
                if c.nullable { "" } else { " NOT NULL" }
            )
        })
        .collect();

    if !table.primary_key.is_empty() {
        parts.push(format!("PRIMARY KEY ({})", table.primary_key.join(", ")));
    }

    for fk in &table.foreign_keys {
        parts.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE CASCADE",
            fk.column, fk.ref_table, fk.ref_column
        ));
    }

    format!("CREATE TABLE {} (\n    {}\n)", table.name, parts.join(",\n    "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        Table::new("users")
            .column("id", ColumnType::Serial)
            .column("email", ColumnType::Varchar(255))
            .nullable_column("nickname", ColumnType::Text)
            .primary_key(&["id"])
    }

    #[test]
    fn test_create_table_postgres() {
        let sql = SchemaOp::CreateTable(users()).to_sql(Dialect::Postgres);
        assert_eq!(
            sql,
            "CREATE TABLE users (\n    id SERIAL NOT NULL,\n    email VARCHAR(255) NOT NULL,\n    nickname TEXT,\n    PRIMARY KEY (id)\n)"
        );
    }

    #[test]
    fn test_create_table_sqlite_uses_rowid_integer() {
        let sql = SchemaOp::CreateTable(users()).to_sql(Dialect::Sqlite);
        assert!(sql.contains("id INTEGER NOT NULL"));
    }

    #[test]
    fn test_foreign_key_rendering() {
        let table = Table::new("datasets")
            .column("id", ColumnType::Serial)
            .column("user_id", ColumnType::Integer)
            .primary_key(&["id"])
            .foreign_key(ForeignKey::cascade("user_id", "users", "id"));
        let sql = SchemaOp::CreateTable(table).to_sql(Dialect::Postgres);
        assert!(sql.contains("FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_index_rendering() {
        let unique = SchemaOp::CreateIndex(Index::unique("ix_users_email", "users", &["email"]));
        assert_eq!(
            unique.to_sql(Dialect::Sqlite),
            "CREATE UNIQUE INDEX ix_users_email ON users (email)"
        );
        let plain = SchemaOp::CreateIndex(Index::new("ix_users_id", "users", &["id"]));
        assert_eq!(plain.to_sql(Dialect::Postgres), "CREATE INDEX ix_users_id ON users (id)");
    }

    #[test]
    fn test_inverse() {
        let create = SchemaOp::CreateTable(users());
        assert_eq!(create.inverse(), Some(SchemaOp::DropTable("users")));
        assert_eq!(SchemaOp::DropTable("users").inverse(), None);
    }

    #[test]
    fn test_type_rendering_per_dialect() {
        assert_eq!(ColumnType::Json.render(Dialect::Postgres), "JSONB");
        assert_eq!(ColumnType::Json.render(Dialect::Sqlite), "TEXT");
        assert_eq!(ColumnType::Double.render(Dialect::Postgres), "DOUBLE PRECISION");
        assert_eq!(ColumnType::Timestamp.render(Dialect::Postgres), "TIMESTAMPTZ");
    }
}
