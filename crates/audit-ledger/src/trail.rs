//! Record construction and append.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use tracker_core::{AuditAction, AuditId, AuditRecord, UserId};

use crate::error::AuditResult;
use crate::store::AuditStore;

/// Builds and appends audit records.
///
/// Timestamps are issued here, not by the store, and never go backwards
/// within a process: if the wall clock steps back, the previous timestamp
/// is reused.
pub struct AuditTrail {
    store: Arc<dyn AuditStore>,
    last_issued: Mutex<DateTime<Utc>>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self {
            store,
            last_issued: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// The underlying store, for read-side queries.
    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }

    /// Builds a record, appends it durably, and returns it.
    ///
    /// Callers broadcast the returned record only after this succeeds.
    pub async fn record(
        &self,
        action: AuditAction,
        actor: UserId,
        subject: Option<UserId>,
        details: String,
    ) -> AuditResult<AuditRecord> {
        let record = AuditRecord {
            id: AuditId::new(),
            action,
            actor,
            subject,
            details,
            timestamp: self.next_timestamp(),
        };
        self.store.append(&record).await?;
        debug!(action = %record.action, audit_id = %record.id, "audit record appended");
        Ok(record)
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let mut last = self.last_issued.lock().expect("lock poisoned");
        let now = Utc::now();
        let issued = if now > *last { now } else { *last };
        *last = issued;
        issued
    }

    #[cfg(test)]
    fn set_last_issued(&self, ts: DateTime<Utc>) {
        *self.last_issued.lock().expect("lock poisoned") = ts;
    }
}
