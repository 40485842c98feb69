// SQLite Database Connection Management
// Provides thread-safe access to the snapshot store

use rusqlite::{Connection, Result as SqliteResult};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use super::schema;

/// Thread-safe database wrapper
/// Uses Arc<Mutex<Connection>> for concurrent access from multiple threads
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open (or create) the snapshot database at the given path
    /// Automatically enables WAL mode and runs migrations
    pub fn new(path: PathBuf) -> Result<Self, String> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create database directory: {}", e))?;
        }

        let conn =
            Connection::open(&path).map_err(|e| format!("Failed to open database: {}", e))?;

        // Configure SQLite for concurrent access
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA busy_timeout=5000;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
            "#,
        )
        .map_err(|e| format!("Failed to configure database: {}", e))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Get database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Get a lock on the connection for executing queries
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, String> {
        self.conn
            .lock()
            .map_err(|e| format!("Failed to acquire database lock: {}", e))
    }

    /// Run all pending migrations
    fn run_migrations(&self) -> Result<(), String> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    /// Execute a function with the database connection
    /// The closure should return Result<T, String> with errors already converted
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&Connection) -> Result<T, String>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a function with the database connection (raw SQLite result)
    /// For operations that want to use rusqlite's error type directly
    pub fn with_connection_raw<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&Connection) -> SqliteResult<T>,
    {
        let conn = self.lock()?;
        f(&conn).map_err(|e| format!("Database error: {}", e))
    }

    /// Get the current schema version
    pub fn schema_version(&self) -> Result<i32, String> {
        self.with_connection_raw(|conn| {
            conn.query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
        })
        .or_else(|_| Ok(0))
    }
}
