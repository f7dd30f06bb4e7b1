//! Core Record Repository
//!
//! Trait contract for the relational half of an entity, plus the in-memory
//! reference backend. The repository owns identity assignment and the
//! cross-reference column; referential guards across entities are the
//! synchronizer's job.

pub mod filter;
pub mod memory;

use async_trait::async_trait;

use crate::core::{CoreId, CoreRecord, FieldPatch, NewRecord, Result};

pub use filter::{FilterCriteria, Op};
pub use memory::InMemoryCoreRepository;

/// Relational-store contract, parameterized by the entity's table name.
#[async_trait]
pub trait CoreRepository: Send + Sync {
    /// Insert a record, returning the store-assigned id. The new-record
    /// fields include the (nullable) cross-reference.
    async fn create(&self, table: &str, record: NewRecord) -> Result<CoreId>;

    /// Fails with `NotFound` when the id does not resolve.
    async fn read(&self, table: &str, id: CoreId) -> Result<CoreRecord>;

    /// Apply a partial update; untouched fields keep their values.
    async fn update(&self, table: &str, id: CoreId, patch: FieldPatch) -> Result<()>;

    /// Remove a record. Guard checks the repository directly owns (e.g.
    /// constraint violations) surface as `Conflict`; the dependent-rows
    /// guard lives in the synchronizer.
    async fn delete(&self, table: &str, id: CoreId) -> Result<()>;

    /// Filtered scan. Each call re-executes the query against current
    /// state; no cursor is retained between calls. An empty result is a
    /// valid result, not an error.
    async fn find_by_filter(
        &self,
        table: &str,
        criteria: &FilterCriteria,
    ) -> Result<Vec<CoreRecord>>;
}
