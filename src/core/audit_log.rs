//! Append-only audit log of transfer attempts
//!
//! The log is shared by every concurrent transfer. Appends are serialized by
//! the log's own mutex, which is always the innermost lock taken: a transfer
//! appends while holding its two account locks, but nothing ever tries to take
//! an account lock while holding the log's lock.
//!
//! Sequence numbers are assigned at append time, so log order is the order in
//! which transfers finished their critical sections, not submission order.

use crate::types::{TransferRecord, TransferRequest, TransferStatus};
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// Concurrent append-only sequence of [`TransferRecord`]s
#[derive(Debug, Default)]
pub struct AuditLog {
    records: Mutex<Vec<TransferRecord>>,
}

impl AuditLog {
    /// Create an empty audit log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record for `request` and return its sequence number
    pub fn append(
        &self,
        request: &TransferRequest,
        status: TransferStatus,
        source_balance: Decimal,
        destination_balance: Decimal,
    ) -> u64 {
        let mut records = self.records.lock();
        let sequence = records.len() as u64;
        records.push(TransferRecord::new(
            sequence,
            request,
            status,
            source_balance,
            destination_balance,
        ));
        sequence
    }

    /// Copy of every record appended so far, in append order
    pub fn snapshot(&self) -> Vec<TransferRecord> {
        self.records.lock().clone()
    }
}
