use thiserror::Error;

use crate::core::types::CoreId;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Detail store unavailable: {0}")]
    DetailStoreUnavailable(String),

    #[error("Core store unavailable: {0}")]
    CoreStoreUnavailable(String),

    #[error("Invalid coordinate '{raw}': {reason}")]
    InvalidCoordinate { raw: String, reason: String },

    #[error("Create failed for '{table}': {reason}")]
    EntityCreateFailed { table: String, reason: String },

    #[error("Update failed for '{table}' id {id}: {reason}")]
    EntityUpdateFailed {
        table: String,
        id: CoreId,
        reason: String,
    },

    #[error("Delete failed for '{table}' id {id}: {reason}")]
    EntityDeleteFailed {
        table: String,
        id: CoreId,
        reason: String,
    },

    #[error("Cannot delete '{table}' id {id}: {count} dependent row(s) in '{dependent_table}'")]
    DependentsExist {
        table: String,
        id: CoreId,
        dependent_table: String,
        count: usize,
    },

    #[error("Record {id} not found in '{table}'")]
    NotFound { table: String, id: CoreId },

    #[error("Detail document '{reference}' not found in '{collection}'")]
    DetailNotFound {
        collection: String,
        reference: String,
    },

    #[error("Conflict in '{table}': {reason}")]
    Conflict { table: String, reason: String },

    #[error("Invalid status '{status}' for '{table}'")]
    InvalidStatus { table: String, status: String },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl SyncError {
    /// True for both flavors of missing-entity lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::DetailNotFound { .. }
        )
    }
}
