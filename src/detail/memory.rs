use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{CoreId, DetailDocument, DetailRef, PLACEHOLDER_BACK_REF, Result, SyncError};
use crate::detail::{DetailStore, merge_payload};

/// In-memory document store, the reference backend for tests and
/// single-process deployments.
///
/// Collections are created lazily on first insert. References are uuid v4
/// strings, opaque to callers.
pub struct InMemoryDetailStore {
    collections: RwLock<HashMap<String, HashMap<String, DetailDocument>>>,
}

impl InMemoryDetailStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents currently held in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

impl Default for InMemoryDetailStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DetailStore for InMemoryDetailStore {
    async fn create_detail(&self, collection: &str, payload: JsonValue) -> Result<DetailRef> {
        let reference = DetailRef::new(Uuid::new_v4().to_string());
        let document = DetailDocument {
            reference: reference.clone(),
            back_ref: PLACEHOLDER_BACK_REF,
            payload,
        };

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(reference.as_str().to_string(), document);
        Ok(reference)
    }

    async fn attach_back_reference(
        &self,
        collection: &str,
        reference: &DetailRef,
        core_id: CoreId,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(reference.as_str()))
            .ok_or_else(|| SyncError::DetailNotFound {
                collection: collection.to_string(),
                reference: reference.to_string(),
            })?;
        document.back_ref = core_id;
        Ok(())
    }

    async fn read_detail(
        &self,
        collection: &str,
        reference: &DetailRef,
    ) -> Result<DetailDocument> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(reference.as_str()))
            .cloned()
            .ok_or_else(|| SyncError::DetailNotFound {
                collection: collection.to_string(),
                reference: reference.to_string(),
            })
    }

    async fn update_detail(
        &self,
        collection: &str,
        reference: &DetailRef,
        partial: JsonValue,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(reference.as_str()))
            .ok_or_else(|| SyncError::DetailNotFound {
                collection: collection.to_string(),
                reference: reference.to_string(),
            })?;
        document.payload = merge_payload(std::mem::take(&mut document.payload), &partial);
        Ok(())
    }

    async fn delete_detail(&self, collection: &str, reference: &DetailRef) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(reference.as_str());
        }
        // Already absent counts as success.
        Ok(())
    }

    async fn scan_details(&self, collection: &str) -> Result<Vec<DetailDocument>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}
