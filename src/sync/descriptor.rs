use serde_json::Value as JsonValue;

use crate::core::{Result, SyncError};

/// A table whose rows hold a foreign key to this entity. Rows existing in
/// any dependent table block deletion.
#[derive(Debug, Clone)]
pub struct DependentLink {
    pub table: String,
    pub foreign_key_field: String,
}

impl DependentLink {
    pub fn new(table: impl Into<String>, foreign_key_field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            foreign_key_field: foreign_key_field.into(),
        }
    }
}

/// Mapping for a scalar denormalized from the detail payload onto the core
/// record for searchability, e.g. the mean of embedded review ratings.
#[derive(Debug, Clone)]
pub struct RollupSpec {
    /// Top-level array field in the detail payload.
    pub source_array: String,
    /// Numeric field within each array element.
    pub source_field: String,
    /// Scalar field written onto the core record.
    pub target_field: String,
}

impl RollupSpec {
    pub fn new(
        source_array: impl Into<String>,
        source_field: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            source_array: source_array.into(),
            source_field: source_field.into(),
            target_field: target_field.into(),
        }
    }

    /// Arithmetic mean of the present, numeric source values. Empty or
    /// missing arrays yield 0.0, never NaN.
    pub fn mean_of(&self, payload: &JsonValue) -> f64 {
        let values: Vec<f64> = payload
            .get(&self.source_array)
            .and_then(JsonValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get(&self.source_field).and_then(JsonValue::as_f64))
                    .collect()
            })
            .unwrap_or_default();

        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}

/// Data-only parameterization of the synchronizer for one entity type.
///
/// One generic synchronizer plus one descriptor per entity replaces a
/// hand-written copy of the two-phase protocol per entity service.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// Relational table holding the core records.
    pub table: String,
    /// Document-store collection holding the detail documents.
    pub detail_collection: String,
    /// Core-record field carrying the `"lat,lng"` coordinate, for entities
    /// that participate in proximity search.
    pub coordinate_field: Option<String>,
    /// Default proximity-search radius in kilometers.
    pub default_radius_km: f64,
    /// Allowed lifecycle statuses; empty means any status is accepted.
    pub allowed_statuses: Vec<String>,
    /// Referential guards evaluated before delete.
    pub dependents: Vec<DependentLink>,
    /// Optional denormalized rollup recomputed on detail updates.
    pub rollup: Option<RollupSpec>,
}

impl EntityDescriptor {
    pub fn new(table: impl Into<String>, detail_collection: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            detail_collection: detail_collection.into(),
            coordinate_field: None,
            default_radius_km: 5.0,
            allowed_statuses: Vec::new(),
            dependents: Vec::new(),
            rollup: None,
        }
    }

    /// Name the coordinate field and enable proximity search.
    pub fn coordinate_field(mut self, field: impl Into<String>) -> Self {
        self.coordinate_field = Some(field.into());
        self
    }

    pub fn default_radius_km(mut self, radius: f64) -> Self {
        self.default_radius_km = radius;
        self
    }

    /// Restrict lifecycle statuses to the given set.
    pub fn statuses(mut self, statuses: &[&str]) -> Self {
        self.allowed_statuses = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Register a dependent table blocking deletion.
    pub fn dependent(mut self, table: impl Into<String>, foreign_key_field: impl Into<String>) -> Self {
        self.dependents.push(DependentLink::new(table, foreign_key_field));
        self
    }

    pub fn rollup(mut self, spec: RollupSpec) -> Self {
        self.rollup = Some(spec);
        self
    }

    pub(crate) fn validate_status(&self, status: &str) -> Result<()> {
        if self.allowed_statuses.is_empty()
            || self.allowed_statuses.iter().any(|s| s == status)
        {
            return Ok(());
        }
        Err(SyncError::InvalidStatus {
            table: self.table.clone(),
            status: status.to_string(),
        })
    }
}
