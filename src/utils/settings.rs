// Sharing Settings
// Environment-backed configuration for snapshot sharing

use serde::{Deserialize, Serialize};

use crate::models::snapshot::SharingOptions;

/// Default public snapshot host
pub const DEFAULT_EXTERNAL_SNAPSHOT_URL: &str = "https://snapshots-origin.raintank.io";

/// Display name for the default public snapshot host
pub const DEFAULT_EXTERNAL_SNAPSHOT_NAME: &str = "Publish to snapshot.raintank.io";

/// Snapshot sharing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingSettings {
    /// Base URL of the external snapshot host
    pub external_snapshot_url: String,
    /// Display name shown for the external host
    pub external_snapshot_name: String,
    /// Whether external snapshot creation is allowed
    pub external_enabled: bool,
    /// Base URL of this installation, used for view and delete links
    pub base_url: String,
}

impl Default for SharingSettings {
    fn default() -> Self {
        Self {
            external_snapshot_url: DEFAULT_EXTERNAL_SNAPSHOT_URL.to_string(),
            external_snapshot_name: DEFAULT_EXTERNAL_SNAPSHOT_NAME.to_string(),
            external_enabled: true,
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl SharingSettings {
    /// Load settings from the environment (`.env` supported via dotenvy)
    ///
    /// Recognized variables: SNAPSHOT_EXTERNAL_URL, SNAPSHOT_EXTERNAL_NAME,
    /// SNAPSHOT_EXTERNAL_ENABLED, SNAPSHOT_BASE_URL. Missing variables fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            external_snapshot_url: std::env::var("SNAPSHOT_EXTERNAL_URL")
                .unwrap_or(defaults.external_snapshot_url),
            external_snapshot_name: std::env::var("SNAPSHOT_EXTERNAL_NAME")
                .unwrap_or(defaults.external_snapshot_name),
            external_enabled: std::env::var("SNAPSHOT_EXTERNAL_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.external_enabled),
            base_url: std::env::var("SNAPSHOT_BASE_URL").unwrap_or(defaults.base_url),
        }
    }

    /// Build an absolute URL under the configured base URL
    pub fn to_abs_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The sharing configuration exposed to clients
    pub fn sharing_options(&self) -> SharingOptions {
        SharingOptions {
            external_snapshot_url: self.external_snapshot_url.clone(),
            external_snapshot_name: self.external_snapshot_name.clone(),
            external_enabled: self.external_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abs_url_joins_cleanly() {
        let settings = SharingSettings {
            base_url: "https://grid.example.com/".to_string(),
            ..Default::default()
        };

        assert_eq!(
            settings.to_abs_url("dashboard/snapshot/abc"),
            "https://grid.example.com/dashboard/snapshot/abc"
        );
        assert_eq!(
            settings.to_abs_url("/api/snapshots-delete/xyz"),
            "https://grid.example.com/api/snapshots-delete/xyz"
        );
    }

    #[test]
    fn test_sharing_options_mirror_settings() {
        let settings = SharingSettings {
            external_enabled: false,
            ..Default::default()
        };
        let options = settings.sharing_options();

        assert_eq!(options.external_snapshot_url, settings.external_snapshot_url);
        assert_eq!(options.external_snapshot_name, settings.external_snapshot_name);
        assert!(!options.external_enabled);
    }
}
