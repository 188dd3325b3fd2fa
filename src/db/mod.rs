use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// Document persistence keyed by collection and document key.
pub trait Store: Send + Sync {
    /// Create or replace a document.
    fn put(&self, collection: &str, key: &str, document: &serde_json::Value) -> Result<()>;

    /// Fetch a document, `None` when it was never written.
    fn get(&self, collection: &str, key: &str) -> Result<Option<serde_json::Value>>;
}

/// Thread-safe SQLite document store (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite database at the given path.
    /// `:memory:` gives a private in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection mutex poisoned"))
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        self.conn()?.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }
}

impl Store for Database {
    fn put(&self, collection: &str, key: &str, document: &serde_json::Value) -> Result<()> {
        let body = serde_json::to_string(document)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO documents (collection, doc_key, body, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(collection, doc_key) DO UPDATE SET
                body=excluded.body,
                updated_at=excluded.updated_at",
            params![collection, key, body, Utc::now()],
        )
        .with_context(|| format!("Failed to write {}/{}", collection, key))?;
        Ok(())
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection=?1 AND doc_key=?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()?;
        body.map(|b| {
            serde_json::from_str(&b)
                .with_context(|| format!("Corrupt document {}/{}", collection, key))
        })
        .transpose()
    }
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT    NOT NULL,
    doc_key     TEXT    NOT NULL,
    body        TEXT    NOT NULL,
    updated_at  TEXT    NOT NULL,
    PRIMARY KEY (collection, doc_key)
);
"#;
