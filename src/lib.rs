// ============================================================================
// TransitSync Library
// ============================================================================

pub mod config;
pub mod core;
pub mod detail;
pub mod entities;
pub mod geo;
pub mod prelude;
pub mod record;
pub mod stats;
pub mod sync;

// Re-export main types for convenience
pub use crate::config::SyncConfig;
pub use crate::core::{
    CoreId, CoreRecord, DetailDocument, DetailRef, FieldPatch, HydratedRecord, NewRecord, Result,
    SyncError, Value,
};
pub use crate::detail::{DetailStore, InMemoryDetailStore};
pub use crate::geo::{GeoPoint, ProximityHit};
pub use crate::record::{CoreRepository, FilterCriteria, InMemoryCoreRepository, Op};
pub use crate::stats::{StatsSummary, summarize};
pub use crate::sync::{EntityDescriptor, EntitySynchronizer, ReconciliationReport, Reconciler};

use std::sync::Arc;

// ============================================================================
// High-level engine (composition root)
// ============================================================================

/// Shared store handles plus configuration, constructed once at process
/// start. Hands out one synchronizer per entity descriptor and one
/// reconciler over the same handles — explicit dependency injection, no
/// module-level singletons.
///
/// # Examples
///
/// ```
/// use transitsync::{NewRecord, SyncEngine, entities};
///
/// # async fn demo() -> transitsync::Result<()> {
/// let engine = SyncEngine::in_memory();
/// let stations = engine.synchronizer(entities::station());
///
/// let record = stations
///     .create(
///         NewRecord::new("active")
///             .field("name", "Harbor stop")
///             .field("location", "50.4501,30.5234"),
///         Some(serde_json::json!({"wheelchair": true})),
///     )
///     .await?;
/// assert!(record.detail_ref.is_some());
/// # Ok(())
/// # }
/// ```
pub struct SyncEngine {
    details: Arc<dyn DetailStore>,
    records: Arc<dyn CoreRepository>,
    config: SyncConfig,
}

impl SyncEngine {
    /// Wire the engine to a pair of store adapters.
    pub fn new(details: Arc<dyn DetailStore>, records: Arc<dyn CoreRepository>) -> Self {
        Self::with_config(details, records, SyncConfig::default())
    }

    pub fn with_config(
        details: Arc<dyn DetailStore>,
        records: Arc<dyn CoreRepository>,
        config: SyncConfig,
    ) -> Self {
        Self {
            details,
            records,
            config,
        }
    }

    /// Engine over the bundled in-memory reference backends.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDetailStore::new()),
            Arc::new(InMemoryCoreRepository::new()),
        )
    }

    /// Build the synchronizer for one entity type.
    pub fn synchronizer(&self, descriptor: EntityDescriptor) -> EntitySynchronizer {
        EntitySynchronizer::with_config(
            descriptor,
            Arc::clone(&self.details),
            Arc::clone(&self.records),
            self.config.clone(),
        )
    }

    /// Build the reconciler over the same store handles.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(Arc::clone(&self.details), Arc::clone(&self.records))
    }

    pub fn detail_store(&self) -> &Arc<dyn DetailStore> {
        &self.details
    }

    pub fn core_repository(&self) -> &Arc<dyn CoreRepository> {
        &self.records
    }
}
