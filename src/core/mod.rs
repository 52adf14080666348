//! Core ledger module
//!
//! This module contains the components with a correctness argument:
//! - `lock_order` - Deterministic lock acquisition order over accounts
//! - `audit_log` - Concurrent append-only record of transfer attempts
//! - `ledger` - Account ownership and the atomic transfer operation

pub mod audit_log;
pub mod ledger;
pub mod lock_order;

pub use audit_log::AuditLog;
pub use ledger::Ledger;
