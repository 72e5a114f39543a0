//! In-memory lifecycle state store.
//!
//! Records keep insertion order; status changes go through the pure
//! transition function in [`crate::record`], so illegal moves are
//! caught here rather than scattered across the pipeline.

use parking_lot::Mutex;
use tracing::debug;

use grid_core::TradeIntent;
use grid_order::{LimitOrder, SignedOrder};

use crate::error::{EngineError, Result};
use crate::record::{apply, LifecycleEvent, OrderRecord, RecordId, RecordStatus};

/// Thread-safe, insertion-ordered record store.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Mutex<Vec<OrderRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `Ready` record for an intent and return its id.
    pub fn insert(&self, intent: TradeIntent) -> RecordId {
        let record = OrderRecord::new(intent);
        let id = record.id.clone();
        debug!(record_id = %id, "record created");
        self.records.lock().push(record);
        id
    }

    /// Attach a built order, moving the record to `Created`.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownRecord`] for a missing id; transition
    /// errors when the record is not `Ready`.
    pub fn attach_order(&self, id: &RecordId, order: LimitOrder) -> Result<()> {
        self.with_record(id, |record| record.attach_order(order))
    }

    /// Record the signature for a `Created` record.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownRecord`] for a missing id.
    pub fn record_signature(&self, id: &RecordId, signed: &SignedOrder) -> Result<()> {
        self.with_record(id, |record| {
            record.record_signature(signed);
            Ok(())
        })
    }

    /// Mark a record `Submitted`.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownRecord`] for a missing id; transition
    /// errors when the record is not `Created`.
    pub fn mark_submitted(&self, id: &RecordId) -> Result<()> {
        self.with_record(id, |record| {
            record.status = apply(record.status, LifecycleEvent::SubmissionAccepted)?;
            Ok(())
        })
    }

    /// Mark a record `Failed`, recording why.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownRecord`] for a missing id; transition
    /// errors when the record is already terminal.
    pub fn mark_failed(&self, id: &RecordId, reason: impl Into<String>) -> Result<()> {
        let reason = reason.into();
        self.with_record(id, |record| {
            record.status = apply(record.status, LifecycleEvent::StepFailed)?;
            record.error_reason = Some(reason);
            Ok(())
        })
    }

    pub fn get(&self, id: &RecordId) -> Option<OrderRecord> {
        self.records.lock().iter().find(|r| &r.id == id).cloned()
    }

    /// All records, oldest first.
    pub fn snapshot(&self) -> Vec<OrderRecord> {
        self.records.lock().clone()
    }

    pub fn count_with_status(&self, status: RecordStatus) -> usize {
        self.records.lock().iter().filter(|r| r.status == status).count()
    }

    fn with_record<F>(&self, id: &RecordId, f: F) -> Result<()>
    where
        F: FnOnce(&mut OrderRecord) -> Result<()>,
    {
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| EngineError::UnknownRecord(id.to_string()))?;
        f(record)
    }
}
