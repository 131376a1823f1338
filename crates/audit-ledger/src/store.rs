//! The audit persistence seam.

use async_trait::async_trait;
use std::sync::Mutex;

use tracker_core::AuditRecord;

use crate::error::AuditResult;

/// Where appended audit records go.
///
/// `append` must be durable before it returns `Ok`; the fan-out engine
/// broadcasts a record only after its append succeeded.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Appends one record.
    async fn append(&self, record: &AuditRecord) -> AuditResult<()>;

    /// Returns up to `limit` records, newest first.
    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditRecord>>;
}

/// In-process store backed by a `Vec`.
///
/// Used by tests and by tooling that inspects what would have been written.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all records in append order.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("lock poisoned").clone()
    }

    /// Number of appended records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("lock poisoned").len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        self.records.lock().expect("lock poisoned").push(record.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditRecord>> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
