// Snapshot Repository
// Handles all database operations for dashboard snapshots

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;
use serde_json::Value;

use crate::models::snapshot::{NewSnapshot, Snapshot, SnapshotSearchQuery};
use crate::utils::database::Database;

/// Columns selected for every snapshot read
const SNAPSHOT_COLUMNS: &str = "id, name, key, delete_key, org_id, user_id, external, \
     external_url, external_delete_url, dashboard, expires, created, updated";

/// TTL applied when no expiry is requested (effectively never)
const NO_EXPIRY_DAYS: i64 = 365 * 50;

/// Repository for snapshot data access
///
/// Lookup by view key and by delete key are distinct operations, and
/// deletion is keyed by delete key only, so a call site can never delete
/// through the wrong credential.
pub struct SnapshotRepository {
    db: Database,
}

impl SnapshotRepository {
    /// Create a new SnapshotRepository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a snapshot record and return it with store-assigned fields
    pub fn insert(&self, snapshot: &NewSnapshot) -> Result<Snapshot, String> {
        let now = Utc::now();
        let expires = if snapshot.expires_secs > 0 {
            now + Duration::seconds(snapshot.expires_secs)
        } else {
            now + Duration::days(NO_EXPIRY_DAYS)
        };

        let dashboard = serde_json::to_string(&snapshot.dashboard)
            .map_err(|e| format!("Failed to serialize dashboard: {}", e))?;

        self.db.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO dashboard_snapshots
                (name, key, delete_key, org_id, user_id, external,
                 external_url, external_delete_url, dashboard, expires, created, updated)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    snapshot.name,
                    snapshot.key,
                    snapshot.delete_key,
                    snapshot.org_id,
                    snapshot.user_id,
                    snapshot.external as i32,
                    snapshot.external_url,
                    snapshot.external_delete_url,
                    dashboard,
                    expires.to_rfc3339(),
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )
            .map_err(|e| format!("Failed to insert snapshot: {}", e))?;

            Ok(Snapshot {
                id: conn.last_insert_rowid(),
                name: snapshot.name.clone(),
                key: snapshot.key.clone(),
                delete_key: snapshot.delete_key.clone(),
                org_id: snapshot.org_id,
                user_id: snapshot.user_id,
                external: snapshot.external,
                external_url: snapshot.external_url.clone(),
                external_delete_url: snapshot.external_delete_url.clone(),
                dashboard: snapshot.dashboard.clone(),
                expires,
                created: now,
                updated: now,
            })
        })
    }

    /// Find a snapshot by its view key
    pub fn find_by_key(&self, key: &str) -> Result<Option<Snapshot>, String> {
        self.find_by_column("key", key)
    }

    /// Find a snapshot by its delete key
    pub fn find_by_delete_key(&self, delete_key: &str) -> Result<Option<Snapshot>, String> {
        self.find_by_column("delete_key", delete_key)
    }

    fn find_by_column(&self, column: &str, value: &str) -> Result<Option<Snapshot>, String> {
        let sql = format!(
            "SELECT {} FROM dashboard_snapshots WHERE {} = ?1",
            SNAPSHOT_COLUMNS, column
        );

        self.db.with_connection(|conn| {
            let result = conn.query_row(&sql, params![value], |row| {
                Ok(SnapshotRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    key: row.get(2)?,
                    delete_key: row.get(3)?,
                    org_id: row.get(4)?,
                    user_id: row.get(5)?,
                    external: row.get(6)?,
                    external_url: row.get(7)?,
                    external_delete_url: row.get(8)?,
                    dashboard: row.get(9)?,
                    expires: row.get(10)?,
                    created: row.get(11)?,
                    updated: row.get(12)?,
                })
            });

            match result {
                Ok(row) => Ok(Some(row.into_snapshot()?)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(format!("Failed to get snapshot: {}", e)),
            }
        })
    }

    /// Delete a snapshot by its delete key, returning whether a row was removed
    pub fn delete_by_delete_key(&self, delete_key: &str) -> Result<bool, String> {
        self.db.with_connection(|conn| {
            let rows_affected = conn
                .execute(
                    "DELETE FROM dashboard_snapshots WHERE delete_key = ?1",
                    params![delete_key],
                )
                .map_err(|e| format!("Failed to delete snapshot: {}", e))?;

            Ok(rows_affected > 0)
        })
    }

    /// Search snapshots scoped to an organization, newest first
    ///
    /// Admins see every snapshot in the org; other roles only their own.
    pub fn search(&self, query: &SnapshotSearchQuery) -> Result<Vec<Snapshot>, String> {
        // 0 disables the user filter (admin scope)
        let user_filter = if query.requester.is_admin() {
            0
        } else {
            query.requester.user_id
        };

        let sql = format!(
            r#"
            SELECT {} FROM dashboard_snapshots
            WHERE org_id = ?1
              AND (?2 = 0 OR user_id = ?2)
              AND (?3 = '' OR name LIKE '%' || ?3 || '%')
            ORDER BY created DESC
            LIMIT ?4
            "#,
            SNAPSHOT_COLUMNS
        );

        self.db.with_connection(|conn| {
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| format!("Failed to prepare statement: {}", e))?;

            let rows = stmt
                .query_map(
                    params![query.org_id, user_filter, query.name, query.limit],
                    |row| {
                        Ok(SnapshotRow {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            key: row.get(2)?,
                            delete_key: row.get(3)?,
                            org_id: row.get(4)?,
                            user_id: row.get(5)?,
                            external: row.get(6)?,
                            external_url: row.get(7)?,
                            external_delete_url: row.get(8)?,
                            dashboard: row.get(9)?,
                            expires: row.get(10)?,
                            created: row.get(11)?,
                            updated: row.get(12)?,
                        })
                    },
                )
                .map_err(|e| format!("Failed to query snapshots: {}", e))?;

            let mut snapshots = Vec::new();
            for row in rows {
                let row = row.map_err(|e| format!("Failed to read row: {}", e))?;
                snapshots.push(row.into_snapshot()?);
            }

            Ok(snapshots)
        })
    }

    /// Remove snapshots whose expiry has passed, returning the number purged
    ///
    /// The lifecycle manager never calls this; it exists for an external
    /// cleanup scheduler. Reads already treat expired rows as missing.
    pub fn delete_expired(&self) -> Result<usize, String> {
        let now = Utc::now().to_rfc3339();

        self.db.with_connection(|conn| {
            conn.execute(
                "DELETE FROM dashboard_snapshots WHERE expires <= ?1",
                params![now],
            )
            .map_err(|e| format!("Failed to delete expired snapshots: {}", e))
        })
    }
}

/// Internal row structure for mapping database rows
struct SnapshotRow {
    id: i64,
    name: String,
    key: String,
    delete_key: String,
    org_id: i64,
    user_id: i64,
    external: i32,
    external_url: String,
    external_delete_url: String,
    dashboard: String,
    expires: String,
    created: String,
    updated: String,
}

impl SnapshotRow {
    fn into_snapshot(self) -> Result<Snapshot, String> {
        let dashboard: Value = serde_json::from_str(&self.dashboard)
            .map_err(|e| format!("Failed to parse stored dashboard: {}", e))?;

        Ok(Snapshot {
            id: self.id,
            name: self.name,
            key: self.key,
            delete_key: self.delete_key,
            org_id: self.org_id,
            user_id: self.user_id,
            external: self.external != 0,
            external_url: self.external_url,
            external_delete_url: self.external_delete_url,
            dashboard,
            expires: parse_timestamp(&self.expires)?,
            created: parse_timestamp(&self.created)?,
            updated: parse_timestamp(&self.updated)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", value, e))
}
