// Snapshot Service Error Types

use thiserror::Error;

/// Snapshot Service Error
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// External snapshot creation requested while the feature is disabled
    #[error("External dashboard snapshot creation is disabled")]
    ExternalDisabled,

    /// Remote snapshot host rejected or failed the create handoff
    #[error("Failed to create external snapshot: {message}")]
    ExternalCreate { message: String },

    /// Remote snapshot host rejected or failed the delete call
    #[error("Failed to delete external snapshot: {message}")]
    ExternalDelete { message: String },

    /// Local persistence failure
    #[error("Snapshot store error: {message}")]
    Store { message: String },

    /// Snapshot absent, or present but expired
    #[error("Dashboard snapshot not found")]
    NotFound,

    /// Requester may not delete this snapshot
    #[error("Access denied to this snapshot")]
    Forbidden,

    /// Dashboard permission lookup failed
    #[error("Error while checking snapshot permissions: {message}")]
    PermissionCheck { message: String },

    /// Key generation failed (entropy source unavailable)
    #[error("Could not generate snapshot key: {message}")]
    RandomSource { message: String },
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot error codes for transport layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotErrorCode {
    ExternalDisabled,
    ExternalCreate,
    ExternalDelete,
    Store,
    NotFound,
    Forbidden,
    PermissionCheck,
    RandomSource,
}

impl SnapshotErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotErrorCode::ExternalDisabled => "SNAPSHOT_EXTERNAL_DISABLED",
            SnapshotErrorCode::ExternalCreate => "SNAPSHOT_EXTERNAL_CREATE_FAILED",
            SnapshotErrorCode::ExternalDelete => "SNAPSHOT_EXTERNAL_DELETE_FAILED",
            SnapshotErrorCode::Store => "SNAPSHOT_STORE_ERROR",
            SnapshotErrorCode::NotFound => "SNAPSHOT_NOT_FOUND",
            SnapshotErrorCode::Forbidden => "SNAPSHOT_FORBIDDEN",
            SnapshotErrorCode::PermissionCheck => "SNAPSHOT_PERMISSION_CHECK_FAILED",
            SnapshotErrorCode::RandomSource => "SNAPSHOT_RANDOM_SOURCE_ERROR",
        }
    }
}

impl SnapshotError {
    pub fn code(&self) -> SnapshotErrorCode {
        match self {
            SnapshotError::ExternalDisabled => SnapshotErrorCode::ExternalDisabled,
            SnapshotError::ExternalCreate { .. } => SnapshotErrorCode::ExternalCreate,
            SnapshotError::ExternalDelete { .. } => SnapshotErrorCode::ExternalDelete,
            SnapshotError::Store { .. } => SnapshotErrorCode::Store,
            SnapshotError::NotFound => SnapshotErrorCode::NotFound,
            SnapshotError::Forbidden => SnapshotErrorCode::Forbidden,
            SnapshotError::PermissionCheck { .. } => SnapshotErrorCode::PermissionCheck,
            SnapshotError::RandomSource { .. } => SnapshotErrorCode::RandomSource,
        }
    }

    /// Whether the caller, rather than this service or a collaborator, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SnapshotError::ExternalDisabled | SnapshotError::NotFound | SnapshotError::Forbidden
        )
    }
}

impl From<SnapshotError> for String {
    fn from(err: SnapshotError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(SnapshotError::ExternalDisabled.is_client_error());
        assert!(SnapshotError::NotFound.is_client_error());
        assert!(SnapshotError::Forbidden.is_client_error());

        assert!(!SnapshotError::ExternalCreate {
            message: "status 503".to_string()
        }
        .is_client_error());
        assert!(!SnapshotError::Store {
            message: "disk full".to_string()
        }
        .is_client_error());
        assert!(!SnapshotError::RandomSource {
            message: "no entropy".to_string()
        }
        .is_client_error());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            SnapshotError::NotFound.code().as_str(),
            "SNAPSHOT_NOT_FOUND"
        );
        assert_eq!(
            SnapshotError::ExternalDelete {
                message: String::new()
            }
            .code()
            .as_str(),
            "SNAPSHOT_EXTERNAL_DELETE_FAILED"
        );
    }
}
