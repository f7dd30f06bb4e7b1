use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::core::{CoreId, CoreRecord, FieldPatch, NewRecord, Result, SyncError};
use crate::record::{CoreRepository, FilterCriteria};

#[derive(Default)]
struct TableState {
    next_id: CoreId,
    /// BTreeMap keeps scans in id order, which makes filtered results
    /// deterministic.
    rows: BTreeMap<CoreId, CoreRecord>,
}

/// In-memory relational store, the reference backend for tests and
/// single-process deployments.
///
/// Tables are created lazily on first insert; reads against a table that
/// was never written behave like an empty table.
pub struct InMemoryCoreRepository {
    tables: RwLock<HashMap<String, TableState>>,
}

impl InMemoryCoreRepository {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |state| state.rows.len())
    }
}

impl Default for InMemoryCoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoreRepository for InMemoryCoreRepository {
    async fn create(&self, table: &str, record: NewRecord) -> Result<CoreId> {
        let mut tables = self.tables.write().await;
        let state = tables.entry(table.to_string()).or_default();

        state.next_id += 1;
        let id = state.next_id;
        let now = Utc::now();

        state.rows.insert(
            id,
            CoreRecord {
                id,
                status: record.status,
                detail_ref: record.detail_ref,
                fields: record.fields,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn read(&self, table: &str, id: CoreId) -> Result<CoreRecord> {
        self.tables
            .read()
            .await
            .get(table)
            .and_then(|state| state.rows.get(&id))
            .cloned()
            .ok_or_else(|| SyncError::NotFound {
                table: table.to_string(),
                id,
            })
    }

    async fn update(&self, table: &str, id: CoreId, patch: FieldPatch) -> Result<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|state| state.rows.get_mut(&id))
            .ok_or_else(|| SyncError::NotFound {
                table: table.to_string(),
                id,
            })?;

        if let Some(status) = patch.status {
            row.status = status;
        }
        for (name, value) in patch.fields {
            row.fields.insert(name, value);
        }
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, table: &str, id: CoreId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let removed = tables
            .get_mut(table)
            .and_then(|state| state.rows.remove(&id));
        if removed.is_none() {
            return Err(SyncError::NotFound {
                table: table.to_string(),
                id,
            });
        }
        Ok(())
    }

    async fn find_by_filter(
        &self,
        table: &str,
        criteria: &FilterCriteria,
    ) -> Result<Vec<CoreRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .get(table)
            .map(|state| {
                state
                    .rows
                    .values()
                    .filter(|row| criteria.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
