//! Reconciliation scan
//!
//! The synchronizer's degrade-not-fail policy accumulates orphaned
//! documents (created, never referenced) and dangling references (core
//! rows pointing at documents that no longer resolve). This module is the
//! read-only detector for both, plus a sweeper for the orphans. Scheduling
//! and retry policy are left to the operator.

use std::collections::HashSet;
use std::sync::Arc;

use log::info;

use crate::core::{CoreId, DetailRef, Result};
use crate::detail::DetailStore;
use crate::record::{CoreRepository, FilterCriteria};
use crate::sync::descriptor::EntityDescriptor;

/// Outcome of one scan over one entity's two stores.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationReport {
    /// Core records whose non-null cross-reference does not resolve.
    pub dangling_references: Vec<(CoreId, DetailRef)>,
    /// Documents no live core record points at (failed relational inserts,
    /// failed cascade deletes).
    pub orphaned_documents: Vec<DetailRef>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_references.is_empty() && self.orphaned_documents.is_empty()
    }
}

/// Cross-store consistency checker, sharing the adapter handles the
/// synchronizers use.
pub struct Reconciler {
    details: Arc<dyn DetailStore>,
    records: Arc<dyn CoreRepository>,
}

impl Reconciler {
    pub fn new(details: Arc<dyn DetailStore>, records: Arc<dyn CoreRepository>) -> Self {
        Self { details, records }
    }

    /// Scan one entity's stores. Read-only and idempotent: scanning twice
    /// without intervening writes reports the same set.
    ///
    /// Either store being unreachable aborts the scan with the transport
    /// error; a partial report would read as cleaner than reality.
    pub async fn scan(&self, descriptor: &EntityDescriptor) -> Result<ReconciliationReport> {
        let rows = self
            .records
            .find_by_filter(&descriptor.table, &FilterCriteria::new())
            .await?;

        let mut referenced: HashSet<String> = HashSet::new();
        let mut dangling_references = Vec::new();

        for row in &rows {
            let Some(reference) = &row.detail_ref else {
                continue;
            };
            referenced.insert(reference.as_str().to_string());

            match self
                .details
                .read_detail(&descriptor.detail_collection, reference)
                .await
            {
                Ok(_) => {}
                Err(err) if err.is_not_found() => {
                    dangling_references.push((row.id, reference.clone()));
                }
                Err(err) => return Err(err),
            }
        }

        let documents = self
            .details
            .scan_details(&descriptor.detail_collection)
            .await?;
        let orphaned_documents = documents
            .into_iter()
            .filter(|document| !referenced.contains(document.reference.as_str()))
            .map(|document| document.reference)
            .collect();

        Ok(ReconciliationReport {
            dangling_references,
            orphaned_documents,
        })
    }

    /// Delete the orphaned documents named by a report. Relies on the
    /// adapter's idempotent delete, so a half-finished sweep can simply be
    /// re-run.
    pub async fn sweep_orphans(
        &self,
        descriptor: &EntityDescriptor,
        report: &ReconciliationReport,
    ) -> Result<usize> {
        let mut swept = 0;
        for reference in &report.orphaned_documents {
            self.details
                .delete_detail(&descriptor.detail_collection, reference)
                .await?;
            swept += 1;
        }
        if swept > 0 {
            info!(
                "swept {} orphaned document(s) from collection='{}'",
                swept, descriptor.detail_collection
            );
        }
        Ok(swept)
    }
}
