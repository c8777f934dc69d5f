//! Remote document bridge.
//!
//! Generic create/read/update/delete/query access to a per-user document
//! collection on an external backend. The backend itself is a collaborator,
//! not part of this crate; [`MemoryDocumentBridge`] stands in for it in the
//! demo and in tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A remote document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Equality constraint for [`DocumentBridge::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub field: String,
    pub equals: Value,
}

impl Constraint {
    pub fn field_eq(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }
}

/// Errors propagated from the remote document service.
#[derive(Debug, Clone, Error, PartialEq)]
#[allow(dead_code)]
pub enum BridgeError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Remote service unavailable: {0}")]
    Unavailable(String),
    #[error("Remote call timed out")]
    Timeout,
    #[error("Document serialization error: {0}")]
    Serialization(String),
}

/// Narrow CRUD/query contract over a remote document collection.
///
/// Every operation either resolves with the requested effect or fails with a
/// propagated [`BridgeError`]; there is no retry layer here.
#[async_trait]
pub trait DocumentBridge: Send + Sync {
    /// Writes the full document under `collection/id`, replacing any
    /// existing one.
    async fn create(&self, collection: &str, id: &str, doc: Document) -> Result<(), BridgeError>;

    /// Returns the document, or `None` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, BridgeError>;

    /// Merges `patch` fields into an existing document. Fails with
    /// [`BridgeError::NotFound`] when the document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), BridgeError>;

    /// Removes the document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), BridgeError>;

    /// Lists documents matching all equality constraints.
    async fn query(
        &self,
        collection: &str,
        constraints: &[Constraint],
    ) -> Result<Vec<Document>, BridgeError>;
}

/// In-memory stand-in for the remote document service.
#[derive(Default)]
pub struct MemoryDocumentBridge {
    collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
}

#[async_trait]
impl DocumentBridge for MemoryDocumentBridge {
    async fn create(&self, collection: &str, id: &str, doc: Document) -> Result<(), BridgeError> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, BridgeError> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), BridgeError> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| BridgeError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        for (field, value) in patch {
            doc.insert(field, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BridgeError> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        constraints: &[Constraint],
    ) -> Result<Vec<Document>, BridgeError> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let docs = match collections.get(collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };
        let matches = docs
            .values()
            .filter(|doc| {
                constraints
                    .iter()
                    .all(|c| doc.get(&c.field) == Some(&c.equals))
            })
            .cloned()
            .collect();
        Ok(matches)
    }
}
