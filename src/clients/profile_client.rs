use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::bridge::{BridgeError, Constraint, Document, DocumentBridge};
use crate::domain::{Profile, ProfilePatch};
use crate::telemetry::track_event;

pub const PROFILE_COLLECTION: &str = "profiles";

const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a user's remote profile document.
///
/// Every bridge call runs under a timeout so a hung remote call surfaces as
/// [`BridgeError::Timeout`] instead of wedging the caller indefinitely.
#[derive(Clone)]
pub struct ProfileClient {
    bridge: Arc<dyn DocumentBridge>,
    timeout: Duration,
}

impl ProfileClient {
    pub fn new(bridge: Arc<dyn DocumentBridge>) -> Self {
        Self::with_timeout(bridge, DEFAULT_REMOTE_TIMEOUT)
    }

    pub fn with_timeout(bridge: Arc<dyn DocumentBridge>, timeout: Duration) -> Self {
        Self { bridge, timeout }
    }

    #[instrument(skip(self))]
    pub async fn load_profile(&self, user_id: &str) -> Result<Option<Profile>, BridgeError> {
        debug!("Sending request");
        let doc = self
            .bounded(self.bridge.get(PROFILE_COLLECTION, user_id))
            .await?;
        doc.map(from_document).transpose()
    }

    #[instrument(skip(self, profile))]
    pub async fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<(), BridgeError> {
        debug!("Sending request");
        let doc = to_document(profile)?;
        self.bounded(self.bridge.create(PROFILE_COLLECTION, user_id, doc))
            .await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: ProfilePatch,
    ) -> Result<(), BridgeError> {
        let doc = to_document(&patch)?;
        if doc.is_empty() {
            debug!("Empty patch, nothing to update");
            return Ok(());
        }
        debug!(field_count = doc.len(), "Sending request");
        self.bounded(self.bridge.update(PROFILE_COLLECTION, user_id, doc))
            .await?;
        track_event("profile_updated", &[("user_id", user_id)]);
        Ok(())
    }

    /// The middleman directory: profiles filtered by declared expertise.
    #[instrument(skip(self))]
    pub async fn find_by_expertise(&self, expertise: &str) -> Result<Vec<Profile>, BridgeError> {
        debug!("Sending request");
        let docs = self
            .bounded(self.bridge.query(
                PROFILE_COLLECTION,
                &[Constraint::field_eq("expertise", expertise)],
            ))
            .await?;
        docs.into_iter().map(from_document).collect()
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, BridgeError>>,
    ) -> Result<T, BridgeError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                error!(timeout_ms = self.timeout.as_millis() as u64, "Remote call timed out");
                Err(BridgeError::Timeout)
            }
        }
    }
}

fn to_document<T: Serialize>(value: &T) -> Result<Document, BridgeError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BridgeError::Serialization(
            "expected an object document".to_string(),
        )),
        Err(e) => Err(BridgeError::Serialization(e.to_string())),
    }
}

fn from_document(doc: Document) -> Result<Profile, BridgeError> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| BridgeError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MemoryDocumentBridge;
    use async_trait::async_trait;

    fn profile() -> Profile {
        Profile {
            display_name: Some("Alice Reyes".to_string()),
            shipping_address: Some("14 Mabini St, Quezon City".to_string()),
            expertise: Some("electronics".to_string()),
            phone: Some("+63 917 555 0100".to_string()),
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let client = ProfileClient::new(Arc::new(MemoryDocumentBridge::default()));

        client.save_profile("u1", &profile()).await.unwrap();
        let loaded = client.load_profile("u1").await.unwrap();

        assert_eq!(loaded, Some(profile()));
    }

    #[tokio::test]
    async fn load_of_missing_profile_is_none() {
        let client = ProfileClient::new(Arc::new(MemoryDocumentBridge::default()));
        assert_eq!(client.load_profile("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_patches_only_the_given_fields() {
        let client = ProfileClient::new(Arc::new(MemoryDocumentBridge::default()));
        client.save_profile("u1", &profile()).await.unwrap();

        client
            .update_profile(
                "u1",
                ProfilePatch {
                    phone: Some("+63 917 555 0199".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let loaded = client.load_profile("u1").await.unwrap().unwrap();
        assert_eq!(loaded.phone.as_deref(), Some("+63 917 555 0199"));
        assert_eq!(loaded.display_name, profile().display_name);
    }

    #[tokio::test]
    async fn update_of_missing_profile_propagates_not_found() {
        let client = ProfileClient::new(Arc::new(MemoryDocumentBridge::default()));

        let err = client
            .update_profile(
                "nobody",
                ProfilePatch {
                    phone: Some("+63 917 555 0199".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn expertise_query_returns_matching_profiles() {
        let client = ProfileClient::new(Arc::new(MemoryDocumentBridge::default()));
        client.save_profile("u1", &profile()).await.unwrap();
        client
            .save_profile(
                "u2",
                &Profile {
                    expertise: Some("apparel".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let middlemen = client.find_by_expertise("electronics").await.unwrap();
        assert_eq!(middlemen, vec![profile()]);
    }

    /// Bridge whose backend is down, for exercising error propagation.
    struct OfflineBridge;

    #[async_trait]
    impl DocumentBridge for OfflineBridge {
        async fn create(&self, _: &str, _: &str, _: Document) -> Result<(), BridgeError> {
            Err(BridgeError::Unavailable("backend offline".to_string()))
        }
        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, BridgeError> {
            Err(BridgeError::Unavailable("backend offline".to_string()))
        }
        async fn update(&self, _: &str, _: &str, _: Document) -> Result<(), BridgeError> {
            Err(BridgeError::Unavailable("backend offline".to_string()))
        }
        async fn delete(&self, _: &str, _: &str) -> Result<(), BridgeError> {
            Err(BridgeError::Unavailable("backend offline".to_string()))
        }
        async fn query(&self, _: &str, _: &[Constraint]) -> Result<Vec<Document>, BridgeError> {
            Err(BridgeError::Unavailable("backend offline".to_string()))
        }
    }

    #[tokio::test]
    async fn remote_failures_propagate_with_their_message() {
        let client = ProfileClient::new(Arc::new(OfflineBridge));

        let err = client.load_profile("u1").await.unwrap_err();
        assert_eq!(err, BridgeError::Unavailable("backend offline".to_string()));
        assert!(err.to_string().contains("backend offline"));
    }

    /// Bridge whose calls never complete, for exercising the timeout path.
    struct StalledBridge;

    #[async_trait]
    impl DocumentBridge for StalledBridge {
        async fn create(&self, _: &str, _: &str, _: Document) -> Result<(), BridgeError> {
            std::future::pending().await
        }
        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, BridgeError> {
            std::future::pending().await
        }
        async fn update(&self, _: &str, _: &str, _: Document) -> Result<(), BridgeError> {
            std::future::pending().await
        }
        async fn delete(&self, _: &str, _: &str) -> Result<(), BridgeError> {
            std::future::pending().await
        }
        async fn query(&self, _: &str, _: &[Constraint]) -> Result<Vec<Document>, BridgeError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hung_remote_call_surfaces_as_timeout() {
        let client =
            ProfileClient::with_timeout(Arc::new(StalledBridge), Duration::from_millis(20));

        let err = client.load_profile("u1").await.unwrap_err();
        assert_eq!(err, BridgeError::Timeout);
    }
}
