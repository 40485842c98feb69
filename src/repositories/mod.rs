// Repository Layer
// Provides data access abstractions for the SQLite snapshot store

pub mod snapshot_repo;

// Re-export commonly used repositories
pub use snapshot_repo::SnapshotRepository;
