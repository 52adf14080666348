//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Accounts, their lock guards and snapshots
//! - `transfer`: Transfer outcomes and audit records
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountGuard, AccountId, AccountSnapshot};
pub use error::LedgerError;
pub use transfer::{TransferOutcome, TransferRecord, TransferRequest, TransferStatus};
