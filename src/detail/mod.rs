//! Detail Store Adapter
//!
//! Trait contract for the document-store half of an entity, plus the
//! in-memory reference backend. Any document store satisfying this
//! contract is interchangeable; payload shape is never enforced here.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::core::{CoreId, DetailDocument, DetailRef, Result};

pub use memory::InMemoryDetailStore;

/// Document-store contract, parameterized by the entity's collection name.
#[async_trait]
pub trait DetailStore: Send + Sync {
    /// Insert a payload and return the store-assigned reference. The new
    /// document carries the placeholder back-reference until
    /// [`attach_back_reference`](DetailStore::attach_back_reference) runs.
    ///
    /// Fails with `DetailStoreUnavailable` on transport errors.
    async fn create_detail(&self, collection: &str, payload: JsonValue) -> Result<DetailRef>;

    /// Patch a previously created document with the numeric core id.
    /// Idempotent: safe to retry.
    async fn attach_back_reference(
        &self,
        collection: &str,
        reference: &DetailRef,
        core_id: CoreId,
    ) -> Result<()>;

    /// Fails with `DetailNotFound` when the reference does not resolve.
    async fn read_detail(
        &self,
        collection: &str,
        reference: &DetailRef,
    ) -> Result<DetailDocument>;

    /// Merge partial top-level fields into the document; never replaces the
    /// whole payload.
    async fn update_detail(
        &self,
        collection: &str,
        reference: &DetailRef,
        partial: JsonValue,
    ) -> Result<()>;

    /// Idempotent delete: "already absent" is success.
    async fn delete_detail(&self, collection: &str, reference: &DetailRef) -> Result<()>;

    /// Full enumeration of a collection, for the reconciliation scan.
    async fn scan_details(&self, collection: &str) -> Result<Vec<DetailDocument>>;
}

/// Shallow merge of `partial` into `base`.
///
/// When both are JSON objects, top-level keys from `partial` overwrite the
/// matching keys in `base` and unrelated keys survive. Any other shape
/// replaces `base` wholesale.
pub(crate) fn merge_payload(base: JsonValue, partial: &JsonValue) -> JsonValue {
    match (base, partial) {
        (JsonValue::Object(mut base_map), JsonValue::Object(partial_map)) => {
            for (key, value) in partial_map {
                base_map.insert(key.clone(), value.clone());
            }
            JsonValue::Object(base_map)
        }
        (_, partial) => partial.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overwrites_and_preserves() {
        let base = json!({"name": "Central", "wheelchair": true, "reviews": [1]});
        let partial = json!({"reviews": [1, 2], "elevator": false});
        let merged = merge_payload(base, &partial);
        assert_eq!(
            merged,
            json!({"name": "Central", "wheelchair": true, "reviews": [1, 2], "elevator": false})
        );
    }

    #[test]
    fn merge_replaces_non_objects() {
        let merged = merge_payload(json!([1, 2]), &json!({"a": 1}));
        assert_eq!(merged, json!({"a": 1}));
    }
}
