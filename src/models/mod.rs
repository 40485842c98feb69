// Data models module
// Rust structs for snapshot records and their wire-facing DTO shapes

pub mod snapshot;

// Re-export all models for convenience
pub use snapshot::*;
