//! Entity Synchronizer
//!
//! The two-phase create/update/delete protocol across the relational and
//! document stores. The relational store is the system of record for
//! identity and referential integrity and is never left half-written;
//! document-store failures degrade the operation instead of failing it.
//!
//! Ordering: the document is created *before* the relational row so the
//! row's cross-reference column is populated at insert time rather than by
//! a second relational write; the back-reference is attached *after* the
//! relational id exists. This costs at most one extra non-fatal round trip
//! per operation.

use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value as JsonValue;
use tokio::time::timeout;

use crate::config::SyncConfig;
use crate::core::{
    CoreId, CoreRecord, FieldPatch, HydratedRecord, NewRecord, Result, SyncError, Value,
};
use crate::detail::{DetailStore, merge_payload};
use crate::geo::{self, GeoPoint, ProximityHit};
use crate::record::{CoreRepository, FilterCriteria};
use crate::sync::descriptor::EntityDescriptor;

/// One synchronizer instance per entity type, generic over the two store
/// adapters. Constructed once at process start with explicit store handles
/// and passed by reference wherever the entity is mutated.
pub struct EntitySynchronizer {
    descriptor: EntityDescriptor,
    details: Arc<dyn DetailStore>,
    records: Arc<dyn CoreRepository>,
    config: SyncConfig,
}

impl EntitySynchronizer {
    pub fn new(
        descriptor: EntityDescriptor,
        details: Arc<dyn DetailStore>,
        records: Arc<dyn CoreRepository>,
    ) -> Self {
        Self::with_config(descriptor, details, records, SyncConfig::default())
    }

    pub fn with_config(
        descriptor: EntityDescriptor,
        details: Arc<dyn DetailStore>,
        records: Arc<dyn CoreRepository>,
        config: SyncConfig,
    ) -> Self {
        Self {
            descriptor,
            details,
            records,
            config,
        }
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    /// Create the two halves of an entity.
    ///
    /// A failed document insert degrades to a core record with a null
    /// cross-reference. A failed relational insert fails the operation;
    /// any document already created is left orphaned for reconciliation,
    /// never rolled back.
    pub async fn create(
        &self,
        record: NewRecord,
        detail: Option<JsonValue>,
    ) -> Result<CoreRecord> {
        self.descriptor.validate_status(&record.status)?;
        let mut record = record;

        let created_ref = match detail {
            Some(payload) => {
                match self
                    .detail_call(
                        self.details
                            .create_detail(&self.descriptor.detail_collection, payload),
                    )
                    .await
                {
                    Ok(reference) => Some(reference),
                    Err(err) => {
                        warn!(
                            "detail create degraded: table='{}' collection='{}' error='{}'",
                            self.descriptor.table, self.descriptor.detail_collection, err
                        );
                        None
                    }
                }
            }
            None => None,
        };

        record.detail_ref = created_ref.clone();

        let id = match self
            .core_call(self.records.create(&self.descriptor.table, record))
            .await
        {
            Ok(id) => id,
            Err(err) => {
                if let Some(reference) = &created_ref {
                    warn!(
                        "relational insert failed after document create: table='{}' collection='{}' reference='{}' left orphaned",
                        self.descriptor.table, self.descriptor.detail_collection, reference
                    );
                }
                return Err(SyncError::EntityCreateFailed {
                    table: self.descriptor.table.clone(),
                    reason: err.to_string(),
                });
            }
        };

        if let Some(reference) = &created_ref {
            if let Err(err) = self
                .detail_call(self.details.attach_back_reference(
                    &self.descriptor.detail_collection,
                    reference,
                    id,
                ))
                .await
            {
                warn!(
                    "back-reference attach degraded: table='{}' id={} reference='{}' error='{}'",
                    self.descriptor.table, id, reference, err
                );
            }
        }

        // Re-fetch rather than assembling from partial state.
        self.get(id).await
    }

    /// Apply partial updates to either or both halves of an entity.
    ///
    /// The core-record write is fatal on failure; the detail write is not.
    /// When the descriptor declares a rollup, its value is derived from
    /// the merged payload *before* the detail write is attempted, so a
    /// failed write cannot corrupt the denormalized field.
    pub async fn update(
        &self,
        id: CoreId,
        patch: FieldPatch,
        detail: Option<JsonValue>,
    ) -> Result<CoreRecord> {
        if let Some(status) = &patch.status {
            self.descriptor.validate_status(status)?;
        }

        let current = self.get(id).await?;
        let mut patch = patch;

        match (&current.detail_ref, detail) {
            (Some(reference), Some(partial)) => {
                if let Some(rollup) = &self.descriptor.rollup {
                    let merged = match self
                        .detail_call(
                            self.details
                                .read_detail(&self.descriptor.detail_collection, reference),
                        )
                        .await
                    {
                        Ok(document) => merge_payload(document.payload, &partial),
                        Err(err) => {
                            warn!(
                                "detail read degraded, rollup derived from partial payload alone: table='{}' id={} reference='{}' error='{}'",
                                self.descriptor.table, id, reference, err
                            );
                            partial.clone()
                        }
                    };
                    patch.fields.insert(
                        rollup.target_field.clone(),
                        Value::Float(rollup.mean_of(&merged)),
                    );
                }

                if let Err(err) = self
                    .detail_call(self.details.update_detail(
                        &self.descriptor.detail_collection,
                        reference,
                        partial,
                    ))
                    .await
                {
                    warn!(
                        "detail update degraded: table='{}' id={} reference='{}' error='{}'",
                        self.descriptor.table, id, reference, err
                    );
                }
            }
            (None, Some(_)) => {
                debug!(
                    "table='{}' id={} carries no detail document, detail fields ignored",
                    self.descriptor.table, id
                );
            }
            _ => {}
        }

        self.core_call(self.records.update(&self.descriptor.table, id, patch))
            .await
            .map_err(|err| match err {
                SyncError::NotFound { .. } => err,
                other => SyncError::EntityUpdateFailed {
                    table: self.descriptor.table.clone(),
                    id,
                    reason: other.to_string(),
                },
            })?;

        self.get(id).await
    }

    /// Delete both halves of an entity.
    ///
    /// Dependent rows block the delete before any mutation. The document
    /// cascade runs first and is non-fatal; the relational delete is the
    /// authoritative step.
    pub async fn delete(&self, id: CoreId) -> Result<()> {
        let current = self.get(id).await?;

        for link in &self.descriptor.dependents {
            let criteria = FilterCriteria::new().eq(link.foreign_key_field.clone(), id);
            let dependents = self
                .core_call(self.records.find_by_filter(&link.table, &criteria))
                .await?;
            if !dependents.is_empty() {
                return Err(SyncError::DependentsExist {
                    table: self.descriptor.table.clone(),
                    id,
                    dependent_table: link.table.clone(),
                    count: dependents.len(),
                });
            }
        }

        if let Some(reference) = &current.detail_ref {
            if let Err(err) = self
                .detail_call(
                    self.details
                        .delete_detail(&self.descriptor.detail_collection, reference),
                )
                .await
            {
                warn!(
                    "cascade detail delete degraded, document may remain orphaned: table='{}' id={} reference='{}' error='{}'",
                    self.descriptor.table, id, reference, err
                );
            }
        }

        self.core_call(self.records.delete(&self.descriptor.table, id))
            .await
            .map_err(|err| match err {
                SyncError::NotFound { .. } => err,
                other => SyncError::EntityDeleteFailed {
                    table: self.descriptor.table.clone(),
                    id,
                    reason: other.to_string(),
                },
            })
    }

    /// Read the core record only.
    pub async fn get(&self, id: CoreId) -> Result<CoreRecord> {
        self.core_call(self.records.read(&self.descriptor.table, id))
            .await
    }

    /// Read the core record and hydrate its detail payload. A dangling
    /// cross-reference degrades to a core-only result.
    pub async fn get_hydrated(&self, id: CoreId) -> Result<HydratedRecord> {
        let record = self.get(id).await?;
        let detail = match &record.detail_ref {
            Some(reference) => {
                match self
                    .detail_call(
                        self.details
                            .read_detail(&self.descriptor.detail_collection, reference),
                    )
                    .await
                {
                    Ok(document) => Some(document.payload),
                    Err(err) => {
                        warn!(
                            "hydration degraded: table='{}' id={} reference='{}' error='{}'",
                            self.descriptor.table, id, reference, err
                        );
                        None
                    }
                }
            }
            None => None,
        };
        Ok(HydratedRecord { record, detail })
    }

    /// Filtered scan over the entity's core records.
    pub async fn find(&self, criteria: &FilterCriteria) -> Result<Vec<CoreRecord>> {
        self.core_call(
            self.records
                .find_by_filter(&self.descriptor.table, criteria),
        )
        .await
    }

    /// Filtered scan narrowed to records within `radius_km` of `origin`
    /// (descriptor default when `None`), sorted ascending by distance.
    pub async fn find_nearby(
        &self,
        criteria: &FilterCriteria,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> Result<Vec<ProximityHit>> {
        let field = self.descriptor.coordinate_field.clone().ok_or_else(|| {
            SyncError::UnsupportedOperation(format!(
                "entity '{}' has no coordinate field",
                self.descriptor.table
            ))
        })?;

        let rows = self.find(criteria).await?;
        let radius = radius_km.unwrap_or(self.descriptor.default_radius_km);
        Ok(geo::within_radius(rows, &field, origin, radius))
    }

    async fn detail_call<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.config.detail_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::DetailStoreUnavailable(format!(
                "operation timed out after {:?}",
                self.config.detail_timeout
            ))),
        }
    }

    async fn core_call<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.config.core_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::CoreStoreUnavailable(format!(
                "operation timed out after {:?}",
                self.config.core_timeout
            ))),
        }
    }
}
