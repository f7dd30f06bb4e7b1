pub mod error;
pub mod types;
pub mod value;

pub use error::{Result, SyncError};
pub use types::{
    CoreId, CoreRecord, DetailDocument, DetailRef, FieldPatch, HydratedRecord, NewRecord,
    PLACEHOLDER_BACK_REF,
};
pub use value::Value;
