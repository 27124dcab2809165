// Applies generated DDL to an embedded SQLite database
use crate::error::SchemaGenResult;
use rusqlite::{Batch, Connection};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Owns a SQLite connection and executes generated schema text against it
pub struct SchemaApplier {
    conn: Connection,
}

impl SchemaApplier {
    /// Open (or create) the database file at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> SchemaGenResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened SQLite database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> SchemaGenResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute every statement of `sql` in order and return how many ran.
    /// Rows produced by pragmas are read and discarded.
    pub fn apply(&self, sql: &str) -> SchemaGenResult<usize> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut executed = 0;
        while let Some(mut stmt) = batch.next()? {
            let mut rows = stmt.query([])?;
            while rows.next()?.is_some() {}
            executed += 1;
        }
        debug!(statements = executed, "Applied SQL schema");
        Ok(executed)
    }

    /// User tables, sorted by name
    pub fn table_names(&self) -> SchemaGenResult<Vec<String>> {
        self.object_names("table")
    }

    /// User indexes, sorted by name
    pub fn index_names(&self) -> SchemaGenResult<Vec<String>> {
        self.object_names("index")
    }

    /// Column names of `table` in declaration order
    pub fn column_names(&self, table: &str) -> SchemaGenResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn object_names(&self, object_type: &str) -> SchemaGenResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = ?1 AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([object_type], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
