// External Snapshot Client
// HTTP handoff to a remote snapshot host for creation and deletion

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::error::{SnapshotError, SnapshotResult};

/// Per-call timeout for the remote snapshot host
pub const EXTERNAL_TIMEOUT_SECS: u64 = 5;

/// The remote host signals "snapshot already gone" as a 500 with this message
const REMOTE_NOT_FOUND_MESSAGE: &str = "Failed to get dashboard snapshot";

/// Payload posted to the remote host on creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSnapshotPayload {
    pub name: String,
    /// Requested time-to-live in seconds
    pub expires: i64,
    pub dashboard: Value,
}

/// Remote host's answer to a successful creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSnapshotCreated {
    pub key: String,
    pub delete_key: String,
    pub url: String,
    pub delete_url: String,
}

/// Client for the remote snapshot host
///
/// Implementations must be safe for concurrent use; the lifecycle manager
/// shares one instance across requests.
#[async_trait]
pub trait ExternalSnapshotClient: Send + Sync {
    /// Hand the snapshot content to the remote host
    async fn create(
        &self,
        payload: &ExternalSnapshotPayload,
    ) -> SnapshotResult<ExternalSnapshotCreated>;

    /// Delete remote state through its delete URL
    ///
    /// Tolerates the host reporting the snapshot as already gone, since a
    /// cleanup process and a user action may race to delete the same
    /// resource.
    async fn delete(&self, delete_url: &str) -> SnapshotResult<()>;
}

/// Production client backed by reqwest
pub struct HttpExternalSnapshotClient {
    /// Long-lived HTTP client, proxy-aware from the environment
    client: reqwest::Client,
    /// Base URL of the remote snapshot host
    base_url: String,
}

impl HttpExternalSnapshotClient {
    /// Create a client for the given remote host
    pub fn new(base_url: String) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(EXTERNAL_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, base_url })
    }

    fn create_url(&self) -> String {
        format!("{}/api/snapshots", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ExternalSnapshotClient for HttpExternalSnapshotClient {
    async fn create(
        &self,
        payload: &ExternalSnapshotPayload,
    ) -> SnapshotResult<ExternalSnapshotCreated> {
        let response = self
            .client
            .post(self.create_url())
            .json(payload)
            .send()
            .await
            .map_err(|e| SnapshotError::ExternalCreate {
                message: format!("request failed: {}", e),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(SnapshotError::ExternalCreate {
                message: format!("response status code {}", status),
            });
        }

        let created: ExternalSnapshotCreated =
            response
                .json()
                .await
                .map_err(|e| SnapshotError::ExternalCreate {
                    message: format!("invalid response body: {}", e),
                })?;

        log::info!("External snapshot created at {}", created.url);
        Ok(created)
    }

    async fn delete(&self, delete_url: &str) -> SnapshotResult<()> {
        let response = self.client.get(delete_url).send().await.map_err(|e| {
            SnapshotError::ExternalDelete {
                message: format!("request failed: {}", e),
            }
        })?;

        let status = response.status().as_u16();
        if status == 200 {
            log::info!("External snapshot deleted via {}", delete_url);
            return Ok(());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SnapshotError::ExternalDelete {
                message: format!("failed to read response body: {}", e),
            })?;

        interpret_delete_failure(status, &body)
    }
}

/// Decide whether a non-200 delete response is tolerable
///
/// The remote host reports "snapshot not found" as a 500 whose JSON body
/// carries a fixed message, indistinguishable from a real server error at
/// the status-code level. That one case counts as success; everything else,
/// including an undecodable 500 body, is an error.
fn interpret_delete_failure(status: u16, body: &[u8]) -> SnapshotResult<()> {
    if status == 500 {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| SnapshotError::ExternalDelete {
                message: format!("undecodable 500 response body: {}", e),
            })?;

        if value.get("message").and_then(Value::as_str) == Some(REMOTE_NOT_FOUND_MESSAGE) {
            log::info!("External snapshot already deleted remotely");
            return Ok(());
        }
    }

    Err(SnapshotError::ExternalDelete {
        message: format!("unexpected response status code {}", status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_wire_names() {
        let payload = ExternalSnapshotPayload {
            name: "Unnamed snapshot".to_string(),
            expires: 3600,
            dashboard: json!({"id": 1}),
        };
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["name"], "Unnamed snapshot");
        assert_eq!(value["expires"], 3600);
        assert_eq!(value["dashboard"]["id"], 1);
    }

    #[test]
    fn test_created_response_decoding() {
        let created: ExternalSnapshotCreated = serde_json::from_value(json!({
            "key": "abc",
            "deleteKey": "def",
            "url": "https://snapshots.example.com/dashboard/snapshot/abc",
            "deleteUrl": "https://snapshots.example.com/api/snapshots-delete/def",
        }))
        .unwrap();

        assert_eq!(created.key, "abc");
        assert_eq!(created.delete_key, "def");
    }

    #[test]
    fn test_delete_tolerates_remote_not_found() {
        let body = serde_json::to_vec(&json!({"message": REMOTE_NOT_FOUND_MESSAGE})).unwrap();
        assert!(interpret_delete_failure(500, &body).is_ok());
    }

    #[test]
    fn test_delete_rejects_other_500_messages() {
        let body = serde_json::to_vec(&json!({"message": "database exploded"})).unwrap();
        let err = interpret_delete_failure(500, &body).unwrap_err();
        assert!(matches!(err, SnapshotError::ExternalDelete { .. }));
    }

    #[test]
    fn test_delete_rejects_500_without_message() {
        let body = serde_json::to_vec(&json!({"error": "oops"})).unwrap();
        assert!(interpret_delete_failure(500, &body).is_err());
    }

    #[test]
    fn test_delete_rejects_undecodable_500_body() {
        let err = interpret_delete_failure(500, b"<html>Internal Server Error</html>").unwrap_err();
        assert!(matches!(err, SnapshotError::ExternalDelete { .. }));
    }

    #[test]
    fn test_delete_rejects_other_statuses() {
        assert!(interpret_delete_failure(404, b"{}").is_err());
        assert!(interpret_delete_failure(503, b"{}").is_err());
    }

    #[test]
    fn test_create_url_joins_cleanly() {
        let client =
            HttpExternalSnapshotClient::new("https://snapshots.example.com/".to_string()).unwrap();
        assert_eq!(
            client.create_url(),
            "https://snapshots.example.com/api/snapshots"
        );
    }
}
