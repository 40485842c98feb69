// SQLite Schema Definitions and Migrations
// Contains the snapshot table definition and migration logic

use rusqlite::{params, Connection};

/// Current schema version
pub const CURRENT_VERSION: i32 = 2;

/// Migration struct containing version and SQL statements
struct Migration {
    version: i32,
    description: &'static str,
    up: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial snapshot schema",
        up: r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            );

            -- Dashboard snapshots
            CREATE TABLE IF NOT EXISTS dashboard_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                key TEXT NOT NULL UNIQUE,
                delete_key TEXT NOT NULL UNIQUE,
                org_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                external INTEGER NOT NULL DEFAULT 0,
                external_url TEXT NOT NULL DEFAULT '',
                external_delete_url TEXT NOT NULL DEFAULT '',
                dashboard TEXT NOT NULL,
                expires TEXT NOT NULL,
                created TEXT NOT NULL,
                updated TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_dashboard_snapshots_key ON dashboard_snapshots(key);
            CREATE INDEX IF NOT EXISTS idx_dashboard_snapshots_delete_key ON dashboard_snapshots(delete_key);
        "#,
    },
    Migration {
        version: 2,
        description: "Index for org-scoped snapshot search",
        up: r#"
            CREATE INDEX IF NOT EXISTS idx_dashboard_snapshots_org_created
                ON dashboard_snapshots(org_id, created DESC);
        "#,
    },
];

/// Run all pending migrations on the given connection
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    // Ensure schema_version table exists first
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now')),
            description TEXT
        )
        "#,
        [],
    )
    .map_err(|e| format!("Failed to create schema_version table: {}", e))?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run pending migrations
    for migration in MIGRATIONS {
        if migration.version > current_version {
            log::info!(
                "Running migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)
                .map_err(|e| format!("Migration v{} failed: {}", migration.version, e))?;

            conn.execute(
                "INSERT INTO schema_version (version, description) VALUES (?1, ?2)",
                params![migration.version, migration.description],
            )
            .map_err(|e| format!("Failed to record migration v{}: {}", migration.version, e))?;

            log::info!("Migration v{} completed", migration.version);
        }
    }

    Ok(())
}

/// Get the current schema version
pub fn get_version(conn: &Connection) -> Result<i32, String> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| format!("Failed to get schema version: {}", e))
}

/// Check if a table exists
pub fn table_exists(conn: &Connection, table_name: &str) -> Result<bool, String> {
    let count: i32 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            params![table_name],
            |row| row.get(0),
        )
        .map_err(|e| format!("Failed to check table existence: {}", e))?;
    Ok(count > 0)
}
