use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::Value;

/// Numeric primary key assigned by the relational store on insert.
pub type CoreId = i64;

/// Back-reference value a detail document carries before the relational id
/// is known.
pub const PLACEHOLDER_BACK_REF: CoreId = 0;

/// Opaque reference to a detail document, held on the relational side as
/// the cross-reference column. The store mints the value; nothing in this
/// crate inspects its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailRef(String);

impl DetailRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DetailRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The relational half of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreRecord {
    pub id: CoreId,
    /// Entity-specific lifecycle value, always present.
    pub status: String,
    /// `None` means "no detail document exists" — a valid, permanent state
    /// for lightweight entities.
    pub detail_ref: Option<DetailRef>,
    /// Entity-specific scalars and foreign keys; round-trip unchanged.
    pub fields: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CoreRecord {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Raw coordinate string, if the record carries one in the named field.
    pub fn coordinate(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_text)
    }
}

/// Fields for a core-record insert; the id and timestamps are assigned by
/// the repository.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub status: String,
    pub detail_ref: Option<DetailRef>,
    pub fields: HashMap<String, Value>,
}

impl NewRecord {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            detail_ref: None,
            fields: HashMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Partial update for a core record; absent members are left untouched.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub status: Option<String>,
    pub fields: HashMap<String, Value>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.fields.is_empty()
    }
}

/// The document-store half of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailDocument {
    pub reference: DetailRef,
    /// Core-record id, written after the relational insert;
    /// [`PLACEHOLDER_BACK_REF`] until then.
    pub back_ref: CoreId,
    /// Free-form nested attributes. Opaque cargo to the synchronizer.
    pub payload: JsonValue,
}

/// A core record together with its hydrated detail payload, when the
/// cross-reference resolved.
#[derive(Debug, Clone)]
pub struct HydratedRecord {
    pub record: CoreRecord,
    pub detail: Option<JsonValue>,
}
