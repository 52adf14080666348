//! Error types for the concurrent ledger
//!
//! This module defines every error that can occur while setting up a ledger,
//! transferring funds between accounts, or driving a simulated workload.
//!
//! # Error Categories
//!
//! - **Transfer Errors**: Invalid amount, unknown account, arithmetic overflow.
//!   All of them are raised before any balance is touched.
//! - **Setup Errors**: Duplicate account ids, negative initial balances.
//! - **I/O Errors**: File access and CSV parsing for account setup and reports.
//! - **Driver Errors**: Runtime construction failures, panicking workers and a
//!   failed conservation check.
//!
//! Insufficient funds is deliberately absent: it is a normal transfer outcome
//! (see [`crate::types::TransferOutcome`]), not a fault.

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Transfer amount is zero or negative
    ///
    /// Raised before any lock is taken. The caller may retry with a corrected amount.
    #[error("Invalid transfer amount {amount}: amount must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Account id is not present in the ledger
    ///
    /// Raised before any lock is taken.
    #[error("Unknown account {id}")]
    UnknownAccount {
        /// The id that could not be resolved
        id: AccountId,
    },

    /// An account with this id already exists
    #[error("Account {id} already exists")]
    DuplicateAccount {
        /// The duplicated id
        id: AccountId,
    },

    /// Initial balance for a new account is negative
    #[error("Invalid initial balance {balance} for account {id}")]
    InvalidInitialBalance {
        /// The account being created
        id: AccountId,
        /// The rejected balance
        balance: Decimal,
    },

    /// A new balance would exceed the representable range or lose precision
    ///
    /// Detected while both locks are held but before any delta is applied,
    /// so neither balance changes.
    #[error("Arithmetic overflow transferring {amount} from account {source_id} to account {destination}")]
    ArithmeticOverflow {
        /// Source account id
        source_id: AccountId,
        /// Destination account id
        destination: AccountId,
        /// Amount that could not be applied
        amount: Decimal,
    },

    /// The sum of all balances does not fit in a `Decimal`
    #[error("Total balance exceeds the representable range")]
    TotalBalanceOverflow,

    /// A workload needs at least two accounts to pick distinct pairs
    #[error("Workload requires at least 2 accounts, ledger has {count}")]
    NotEnoughAccounts {
        /// Number of accounts in the ledger
        count: usize,
    },

    /// Total funds changed across a run
    #[error("Conservation violated: total before {before}, total after {after}")]
    ConservationViolated {
        /// Exact total before the workload started
        before: Decimal,
        /// Exact total after the workload finished
        after: Decimal,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The async runtime could not be created
    #[error("Runtime error: {message}")]
    RuntimeError {
        /// Description of the runtime failure
        message: String,
    },

    /// A workload worker panicked before finishing
    #[error("Worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker
        worker: usize,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(id: AccountId) -> Self {
        LedgerError::UnknownAccount { id }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(id: AccountId) -> Self {
        LedgerError::DuplicateAccount { id }
    }

    /// Create an InvalidInitialBalance error
    pub fn invalid_initial_balance(id: AccountId, balance: Decimal) -> Self {
        LedgerError::InvalidInitialBalance { id, balance }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(
        source_id: AccountId,
        destination: AccountId,
        amount: Decimal,
    ) -> Self {
        LedgerError::ArithmeticOverflow {
            source_id,
            destination,
            amount,
        }
    }

    /// Create a ParseError, with the record's line number when known
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line,
            message: message.into(),
        }
    }
}
