// Snapshot data models
// The snapshot record plus the DTO shapes served to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Organization role of the requesting user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrgRole {
    Admin,
    Editor,
    Viewer,
}

/// Authenticated requester context
///
/// Ownership attributes on created snapshots are always taken from here,
/// never from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub user_id: i64,
    pub org_id: i64,
    pub role: OrgRole,
}

impl Requester {
    pub fn is_admin(&self) -> bool {
        self.role == OrgRole::Admin
    }
}

/// A stored dashboard snapshot
///
/// `key` grants read access, `delete_key` grants deletion. For external
/// snapshots the dashboard body lives only at the remote host and the local
/// `dashboard` document is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Store-assigned row id
    pub id: i64,
    pub name: String,
    pub key: String,
    pub delete_key: String,
    pub org_id: i64,
    pub user_id: i64,
    pub external: bool,
    /// Remote view URL, empty unless `external`
    pub external_url: String,
    /// Remote delete endpoint, empty unless `external`
    pub external_delete_url: String,
    /// Dashboard definition at snapshot time (empty document when external)
    pub dashboard: Value,
    /// Absolute expiry; the snapshot is treated as gone once `now >= expires`
    pub expires: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Snapshot {
    /// Whether the snapshot is logically gone for read operations
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    /// Dashboard id embedded in the snapshot's dashboard document (0 when absent)
    pub fn dashboard_id(&self) -> i64 {
        self.dashboard.get("id").and_then(Value::as_i64).unwrap_or(0)
    }
}

/// A snapshot record ready for insertion, with all identity and ownership
/// fields resolved by the lifecycle manager
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub name: String,
    pub key: String,
    pub delete_key: String,
    pub org_id: i64,
    pub user_id: i64,
    pub external: bool,
    pub external_url: String,
    pub external_delete_url: String,
    pub dashboard: Value,
    /// Requested time-to-live in seconds; values <= 0 mean effectively never
    pub expires_secs: i64,
}

/// Request to create a snapshot
///
/// `key`/`delete_key` may be preset by the caller for local snapshots;
/// empty values are filled with generated keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotCommand {
    #[serde(default)]
    pub name: String,
    pub dashboard: Value,
    /// Requested time-to-live in seconds; 0 means effectively never
    #[serde(default)]
    pub expires: i64,
    #[serde(default)]
    pub external: bool,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub delete_key: String,
}

/// Result of a successful snapshot creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotResult {
    pub key: String,
    pub delete_key: String,
    /// Where the snapshot can be viewed (remote host URL for external snapshots)
    pub url: String,
    /// Delete-key-authorized endpoint, always on the local base URL
    pub delete_url: String,
}

/// Metadata served alongside the dashboard document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotViewMeta {
    #[serde(rename = "type")]
    pub kind: String,
    pub is_snapshot: bool,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// Full snapshot view: dashboard document plus metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub dashboard: Value,
    pub meta: SnapshotViewMeta,
}

impl From<&Snapshot> for SnapshotView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            dashboard: snapshot.dashboard.clone(),
            meta: SnapshotViewMeta {
                kind: "snapshot".to_string(),
                is_snapshot: true,
                created: snapshot.created,
                expires: snapshot.expires,
            },
        }
    }
}

/// Listing row for snapshot search results (no dashboard body)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub id: i64,
    pub name: String,
    pub key: String,
    pub org_id: i64,
    pub user_id: i64,
    pub external: bool,
    pub external_url: String,
    pub expires: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<&Snapshot> for SnapshotSummary {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name.clone(),
            key: snapshot.key.clone(),
            org_id: snapshot.org_id,
            user_id: snapshot.user_id,
            external: snapshot.external,
            external_url: snapshot.external_url.clone(),
            expires: snapshot.expires,
            created: snapshot.created,
            updated: snapshot.updated,
        }
    }
}

/// Snapshot search parameters
#[derive(Debug, Clone)]
pub struct SnapshotSearchQuery {
    /// Optional name substring filter (empty matches everything)
    pub name: String,
    /// Maximum rows to return; values <= 0 fall back to the default of 1000
    pub limit: i64,
    pub org_id: i64,
    pub requester: Requester,
}

/// Acknowledgement returned by the delete operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSnapshotAck {
    pub message: String,
}

/// Sharing configuration exposed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingOptions {
    #[serde(rename = "externalSnapshotURL")]
    pub external_snapshot_url: String,
    #[serde(rename = "externalSnapshotName")]
    pub external_snapshot_name: String,
    #[serde(rename = "externalEnabled")]
    pub external_enabled: bool,
}
