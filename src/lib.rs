// Snapshare - dashboard snapshot sharing library
// Models, repositories, services, and utilities for the snapshot lifecycle

pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

// Re-export the main entry points for consumers
pub use models::snapshot::{
    CreateSnapshotCommand, CreateSnapshotResult, DeleteSnapshotAck, NewSnapshot, OrgRole,
    Requester, SharingOptions, Snapshot, SnapshotSearchQuery, SnapshotSummary, SnapshotView,
};
pub use repositories::SnapshotRepository;
pub use services::snapshot::{
    DashboardGuardian, ExternalSnapshotClient, SnapshotError, SnapshotResult, SnapshotService,
};
pub use utils::database::Database;
pub use utils::settings::SharingSettings;
