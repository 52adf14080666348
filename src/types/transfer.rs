//! Transfer-related types for the concurrent ledger
//!
//! This module defines the outcome returned to a transfer's caller and the
//! audit record appended to the ledger's log for every attempt that reaches
//! the critical section.

use super::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A requested movement of funds between two accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(source: AccountId, destination: AccountId, amount: Decimal) -> Self {
        TransferRequest {
            source,
            destination,
            amount,
        }
    }
}

/// Result of a transfer that passed input validation
///
/// Insufficient funds is a normal business outcome, so it lives here rather
/// than in [`crate::types::LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Funds moved; balances observed while both locks were still held
    Completed {
        new_source_balance: Decimal,
        new_destination_balance: Decimal,
    },

    /// Source balance was lower than the amount; nothing changed
    InsufficientFunds {
        attempted: Decimal,
        available: Decimal,
    },
}

impl TransferOutcome {
    /// Whether the transfer moved (or, for a self-transfer, accepted) the funds
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed { .. })
    }

    /// Status recorded in the audit log for this outcome
    pub fn status(&self) -> TransferStatus {
        match self {
            TransferOutcome::Completed { .. } => TransferStatus::Completed,
            TransferOutcome::InsufficientFunds { .. } => TransferStatus::InsufficientFunds,
        }
    }
}

/// Audited outcome of a transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferStatus {
    Completed,
    InsufficientFunds,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Completed => f.write_str("completed"),
            TransferStatus::InsufficientFunds => f.write_str("insufficient-funds"),
        }
    }
}

/// Immutable audit log entry
///
/// The balances are the values read while both account locks were held, so
/// they form a consistent snapshot of the pair at the end of the transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Position in the audit log, assigned at append time
    pub sequence: u64,
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Decimal,
    pub status: TransferStatus,
    pub source_balance: Decimal,
    pub destination_balance: Decimal,
}

impl TransferRecord {
    /// Build the record for `request` at log position `sequence`
    pub fn new(
        sequence: u64,
        request: &TransferRequest,
        status: TransferStatus,
        source_balance: Decimal,
        destination_balance: Decimal,
    ) -> Self {
        TransferRecord {
            sequence,
            source: request.source,
            destination: request.destination,
            amount: request.amount,
            status,
            source_balance,
            destination_balance,
        }
    }
}

impl fmt::Display for TransferRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            TransferStatus::Completed => write!(
                f,
                "#{} transferred {} from account {} to account {} (balances: {} | {})",
                self.sequence,
                self.amount,
                self.source,
                self.destination,
                self.source_balance,
                self.destination_balance
            ),
            TransferStatus::InsufficientFunds => write!(
                f,
                "#{} failed: insufficient funds in account {} (balance: {}, attempted: {})",
                self.sequence, self.source, self.source_balance, self.amount
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::completed(
        TransferOutcome::Completed { new_source_balance: Decimal::ZERO, new_destination_balance: Decimal::ONE },
        TransferStatus::Completed
    )]
    #[case::insufficient(
        TransferOutcome::InsufficientFunds { attempted: Decimal::TEN, available: Decimal::ONE },
        TransferStatus::InsufficientFunds
    )]
    fn test_outcome_status(#[case] outcome: TransferOutcome, #[case] expected: TransferStatus) {
        assert_eq!(outcome.status(), expected);
        assert_eq!(outcome.is_completed(), expected == TransferStatus::Completed);
    }

    #[rstest]
    #[case::completed(
        TransferRecord {
            sequence: 0,
            source: 1,
            destination: 2,
            amount: Decimal::new(200, 0),
            status: TransferStatus::Completed,
            source_balance: Decimal::new(300, 0),
            destination_balance: Decimal::new(500, 0),
        },
        "#0 transferred 200 from account 1 to account 2 (balances: 300 | 500)"
    )]
    #[case::insufficient(
        TransferRecord {
            sequence: 4,
            source: 1,
            destination: 2,
            amount: Decimal::new(150, 0),
            status: TransferStatus::InsufficientFunds,
            source_balance: Decimal::new(100, 0),
            destination_balance: Decimal::new(300, 0),
        },
        "#4 failed: insufficient funds in account 1 (balance: 100, attempted: 150)"
    )]
    fn test_record_display(#[case] record: TransferRecord, #[case] expected: &str) {
        assert_eq!(record.to_string(), expected);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TransferStatus::InsufficientFunds.to_string(), "insufficient-funds");
    }
}
