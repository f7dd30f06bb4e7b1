#![allow(dead_code)]

//! Failure-injecting store doubles shared by the integration tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use transitsync::{
    CoreId, CoreRecord, CoreRepository, DetailDocument, DetailRef, DetailStore, FieldPatch,
    FilterCriteria, InMemoryCoreRepository, InMemoryDetailStore, NewRecord, Result, SyncError,
};

/// Document store whose individual operations can be switched to fail,
/// simulating transport errors against a live backing store.
pub struct FlakyDetailStore {
    pub inner: InMemoryDetailStore,
    fail_create: AtomicBool,
    fail_attach: AtomicBool,
    fail_read: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
}

impl FlakyDetailStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryDetailStore::new(),
            fail_create: AtomicBool::new(false),
            fail_attach: AtomicBool::new(false),
            fail_read: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn fail_creates(&self, on: bool) {
        self.fail_create.store(on, Ordering::SeqCst);
    }

    pub fn fail_attaches(&self, on: bool) {
        self.fail_attach.store(on, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_read.store(on, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, on: bool) {
        self.fail_update.store(on, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, on: bool) {
        self.fail_delete.store(on, Ordering::SeqCst);
    }

    fn unavailable() -> SyncError {
        SyncError::DetailStoreUnavailable("simulated transport failure".to_string())
    }
}

#[async_trait]
impl DetailStore for FlakyDetailStore {
    async fn create_detail(&self, collection: &str, payload: JsonValue) -> Result<DetailRef> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.create_detail(collection, payload).await
    }

    async fn attach_back_reference(
        &self,
        collection: &str,
        reference: &DetailRef,
        core_id: CoreId,
    ) -> Result<()> {
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner
            .attach_back_reference(collection, reference, core_id)
            .await
    }

    async fn read_detail(
        &self,
        collection: &str,
        reference: &DetailRef,
    ) -> Result<DetailDocument> {
        if self.fail_read.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.read_detail(collection, reference).await
    }

    async fn update_detail(
        &self,
        collection: &str,
        reference: &DetailRef,
        partial: JsonValue,
    ) -> Result<()> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.update_detail(collection, reference, partial).await
    }

    async fn delete_detail(&self, collection: &str, reference: &DetailRef) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.delete_detail(collection, reference).await
    }

    async fn scan_details(&self, collection: &str) -> Result<Vec<DetailDocument>> {
        self.inner.scan_details(collection).await
    }
}

/// Relational store whose inserts can be switched to fail, for exercising
/// the orphaned-document path.
pub struct FlakyCoreRepository {
    pub inner: InMemoryCoreRepository,
    fail_create: AtomicBool,
}

impl FlakyCoreRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryCoreRepository::new(),
            fail_create: AtomicBool::new(false),
        }
    }

    pub fn fail_creates(&self, on: bool) {
        self.fail_create.store(on, Ordering::SeqCst);
    }
}

#[async_trait]
impl CoreRepository for FlakyCoreRepository {
    async fn create(&self, table: &str, record: NewRecord) -> Result<CoreId> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(SyncError::CoreStoreUnavailable(
                "simulated transport failure".to_string(),
            ));
        }
        self.inner.create(table, record).await
    }

    async fn read(&self, table: &str, id: CoreId) -> Result<CoreRecord> {
        self.inner.read(table, id).await
    }

    async fn update(&self, table: &str, id: CoreId, patch: FieldPatch) -> Result<()> {
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: CoreId) -> Result<()> {
        self.inner.delete(table, id).await
    }

    async fn find_by_filter(
        &self,
        table: &str,
        criteria: &FilterCriteria,
    ) -> Result<Vec<CoreRecord>> {
        self.inner.find_by_filter(table, criteria).await
    }
}
