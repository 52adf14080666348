//! Concurrent Ledger Library
//! # Overview
//!
//! This library models a shared ledger of accounts on which many concurrent
//! callers perform pairwise balance transfers without corrupting total funds.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, TransferOutcome, TransferRecord, errors)
//! - [`core`] - The parts with a correctness argument:
//!   - [`core::lock_order`] - Ascending-id lock acquisition order
//!   - [`core::ledger`] - Account ownership and the atomic transfer operation
//!   - [`core::audit_log`] - Concurrent append-only record of transfer attempts
//! - [`driver`] - Workload generation and scheduling strategies
//! - [`io`] - Account setup files and CSV reports
//! - [`cli`] - CLI arguments parsing and the simulator entry point
//!
//! # Transfers
//!
//! A transfer locks both accounts in ascending id order, checks that the
//! source can cover the amount, moves the funds and appends an audit record
//! before releasing either lock. Because every transfer uses the same global
//! order no cycle of waiting callers can form.
//!
//! - **Completed**: funds moved, both new balances reported
//! - **InsufficientFunds**: nothing moved; a normal, audited outcome
//! - **InvalidAmount / UnknownAccount**: rejected before any lock is taken
//!
//! A transfer from an account to itself takes its one lock once and changes
//! nothing.
//!
//! ```
//! use concurrent_ledger::{Ledger, TransferOutcome};
//! use rust_decimal::Decimal;
//!
//! let mut ledger = Ledger::new();
//! ledger.create_account(1, Decimal::from(500)).unwrap();
//! ledger.create_account(2, Decimal::from(300)).unwrap();
//!
//! let outcome = ledger.transfer(1, 2, Decimal::from(200)).unwrap();
//! assert_eq!(
//!     outcome,
//!     TransferOutcome::Completed {
//!         new_source_balance: Decimal::from(300),
//!         new_destination_balance: Decimal::from(500),
//!     }
//! );
//! assert_eq!(ledger.total_balance().unwrap(), Decimal::from(800));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod driver;
pub mod io;
pub mod types;

pub use crate::core::{AuditLog, Ledger};
pub use driver::{
    create_strategy, run_simulation, SimulationSummary, WorkloadConfig, WorkloadReport,
    WorkloadStrategy,
};
pub use io::{write_accounts_csv, write_audit_csv};
pub use types::{
    Account, AccountId, AccountSnapshot, LedgerError, TransferOutcome, TransferRecord,
    TransferRequest, TransferStatus,
};
