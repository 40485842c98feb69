// Snapshot Lifecycle Service
// Orchestrates create/get/delete/search over local and external snapshots
//
// This module provides:
// - SnapshotService, the lifecycle manager
// - DashboardGuardian trait for the permission seam
// - ExternalSnapshotClient trait and its reqwest implementation
// - Error taxonomy and operation metrics

pub mod error;
pub mod external;
pub mod metrics;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

pub use error::{SnapshotError, SnapshotErrorCode, SnapshotResult};
pub use external::{
    ExternalSnapshotClient, ExternalSnapshotCreated, ExternalSnapshotPayload,
    HttpExternalSnapshotClient, EXTERNAL_TIMEOUT_SECS,
};
pub use metrics::{MetricsCounters, SnapshotMetrics};

use crate::models::snapshot::{
    CreateSnapshotCommand, CreateSnapshotResult, DeleteSnapshotAck, NewSnapshot, Requester,
    SharingOptions, Snapshot, SnapshotSearchQuery, SnapshotSummary, SnapshotView,
};
use crate::repositories::SnapshotRepository;
use crate::utils::keygen::{self, SNAPSHOT_KEY_LENGTH};
use crate::utils::settings::SharingSettings;

/// Name applied when a snapshot is created without one
pub const DEFAULT_SNAPSHOT_NAME: &str = "Unnamed snapshot";

/// Search result cap applied when the caller passes no limit
pub const DEFAULT_SEARCH_LIMIT: i64 = 1000;

/// How long callers may cache a snapshot view (content is immutable)
pub const SNAPSHOT_CACHE_MAX_AGE_SECS: u64 = 3600;

/// User-facing acknowledgement for completed deletions
pub const DELETE_ACK_MESSAGE: &str =
    "Snapshot deleted. It might take an hour before it's cleared from any CDN caches.";

/// Permission seam for dashboard edit rights
///
/// Deleting a snapshot by its view key requires either edit rights on the
/// dashboard it was taken from or being the snapshot's creator.
#[async_trait]
pub trait DashboardGuardian: Send + Sync {
    /// Whether the requester may edit the given dashboard
    async fn can_edit_dashboard(
        &self,
        dashboard_id: i64,
        org_id: i64,
        requester: &Requester,
    ) -> Result<bool, String>;
}

/// Snapshot lifecycle manager
///
/// Shared collaborators (store, external client, guardian) are safe for
/// concurrent use; the service holds no per-request state.
pub struct SnapshotService {
    repo: SnapshotRepository,
    external: Arc<dyn ExternalSnapshotClient>,
    guardian: Arc<dyn DashboardGuardian>,
    settings: SharingSettings,
    metrics: Arc<SnapshotMetrics>,
}

impl SnapshotService {
    pub fn new(
        repo: SnapshotRepository,
        external: Arc<dyn ExternalSnapshotClient>,
        guardian: Arc<dyn DashboardGuardian>,
        settings: SharingSettings,
    ) -> Self {
        Self {
            repo,
            external,
            guardian,
            settings,
            metrics: Arc::new(SnapshotMetrics::default()),
        }
    }

    /// Operation counters
    pub fn metrics(&self) -> &SnapshotMetrics {
        &self.metrics
    }

    /// Sharing configuration exposed to clients
    pub fn sharing_options(&self) -> SharingOptions {
        self.settings.sharing_options()
    }

    /// Create a snapshot, locally or through the external snapshot host
    ///
    /// Ownership comes from the authenticated requester; clients cannot set
    /// it. A failed external handoff leaves no local record behind.
    pub async fn create(
        &self,
        cmd: CreateSnapshotCommand,
        requester: &Requester,
    ) -> SnapshotResult<CreateSnapshotResult> {
        let name = if cmd.name.is_empty() {
            DEFAULT_SNAPSHOT_NAME.to_string()
        } else {
            cmd.name
        };

        let mut record = NewSnapshot {
            name,
            key: cmd.key,
            delete_key: cmd.delete_key,
            org_id: requester.org_id,
            user_id: requester.user_id,
            external: cmd.external,
            external_url: String::new(),
            external_delete_url: String::new(),
            dashboard: cmd.dashboard,
            expires_secs: cmd.expires,
        };

        let url;
        if record.external {
            if !self.settings.external_enabled {
                log::warn!("Rejected external snapshot creation: feature is disabled");
                return Err(SnapshotError::ExternalDisabled);
            }

            let payload = ExternalSnapshotPayload {
                name: record.name.clone(),
                expires: record.expires_secs,
                dashboard: record.dashboard,
            };
            let remote = self.external.create(&payload).await?;

            // The remote's identifiers become this record's identifiers;
            // the content itself lives only at the remote host.
            url = remote.url.clone();
            record.key = remote.key;
            record.delete_key = remote.delete_key;
            record.external_url = remote.url;
            record.external_delete_url = remote.delete_url;
            record.dashboard = Value::Object(serde_json::Map::new());

            self.metrics.inc_external_create();
        } else {
            if record.key.is_empty() {
                record.key = self.generate_key()?;
            }
            if record.delete_key.is_empty() {
                record.delete_key = self.generate_key()?;
            }

            url = self
                .settings
                .to_abs_url(&format!("dashboard/snapshot/{}", record.key));

            self.metrics.inc_local_create();
        }

        let snapshot = self
            .repo
            .insert(&record)
            .map_err(|message| SnapshotError::Store { message })?;

        log::info!(
            "Created {} snapshot '{}' (id {})",
            if snapshot.external { "external" } else { "local" },
            snapshot.name,
            snapshot.id
        );

        let delete_url = self
            .settings
            .to_abs_url(&format!("api/snapshots-delete/{}", snapshot.delete_key));

        Ok(CreateSnapshotResult {
            key: snapshot.key,
            delete_key: snapshot.delete_key,
            url,
            delete_url,
        })
    }

    /// Fetch a snapshot view by its public key
    ///
    /// Expired snapshots are indistinguishable from missing ones.
    pub fn get(&self, key: &str) -> SnapshotResult<SnapshotView> {
        let snapshot = self
            .repo
            .find_by_key(key)
            .map_err(|message| SnapshotError::Store { message })?
            .ok_or(SnapshotError::NotFound)?;

        if snapshot.is_expired(Utc::now()) {
            log::debug!("Snapshot {} has expired", snapshot.id);
            return Err(SnapshotError::NotFound);
        }

        self.metrics.inc_get();
        Ok(SnapshotView::from(&snapshot))
    }

    /// Delete a snapshot by its public key (requires edit rights or authorship)
    pub async fn delete_by_key(
        &self,
        key: &str,
        requester: &Requester,
    ) -> SnapshotResult<DeleteSnapshotAck> {
        let snapshot = self
            .repo
            .find_by_key(key)
            .map_err(|message| SnapshotError::Store { message })?
            .ok_or(SnapshotError::NotFound)?;

        let can_edit = self
            .guardian
            .can_edit_dashboard(snapshot.dashboard_id(), requester.org_id, requester)
            .await
            .map_err(|message| SnapshotError::PermissionCheck { message })?;

        if !can_edit && snapshot.user_id != requester.user_id {
            log::warn!(
                "User {} denied deletion of snapshot {}",
                requester.user_id,
                snapshot.id
            );
            return Err(SnapshotError::Forbidden);
        }

        self.delete_snapshot(&snapshot).await
    }

    /// Delete a snapshot by its delete key
    ///
    /// Possession of the delete key is sufficient authorization; no
    /// ownership check is performed, supporting anonymous-creator flows.
    pub async fn delete_by_delete_key(
        &self,
        delete_key: &str,
    ) -> SnapshotResult<DeleteSnapshotAck> {
        let snapshot = self
            .repo
            .find_by_delete_key(delete_key)
            .map_err(|message| SnapshotError::Store { message })?
            .ok_or(SnapshotError::NotFound)?;

        self.delete_snapshot(&snapshot).await
    }

    /// Search snapshots visible to the requester, newest first
    pub fn search(
        &self,
        mut query: SnapshotSearchQuery,
    ) -> SnapshotResult<Vec<SnapshotSummary>> {
        if query.limit <= 0 {
            query.limit = DEFAULT_SEARCH_LIMIT;
        }

        let snapshots = self
            .repo
            .search(&query)
            .map_err(|message| SnapshotError::Store { message })?;

        Ok(snapshots.iter().map(SnapshotSummary::from).collect())
    }

    /// Shared deletion sequence for both entry points
    ///
    /// Remote state must be gone before the local record is dropped; a
    /// failed remote delete keeps the record around for a later retry.
    async fn delete_snapshot(&self, snapshot: &Snapshot) -> SnapshotResult<DeleteSnapshotAck> {
        if snapshot.external {
            self.external.delete(&snapshot.external_delete_url).await?;
        }

        self.repo
            .delete_by_delete_key(&snapshot.delete_key)
            .map_err(|message| SnapshotError::Store { message })?;

        log::info!("Deleted snapshot {} ('{}')", snapshot.id, snapshot.name);

        Ok(DeleteSnapshotAck {
            message: DELETE_ACK_MESSAGE.to_string(),
        })
    }

    fn generate_key(&self) -> SnapshotResult<String> {
        keygen::random_key(SNAPSHOT_KEY_LENGTH)
            .map_err(|message| SnapshotError::RandomSource { message })
    }
}
