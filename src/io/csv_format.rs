//! CSV format handling for account setup and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - AccountCsvRecord structure for deserializing account setup files
//! - Conversion from CSV records to `(id, balance)` pairs
//! - Account state and audit log serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{AccountId, AccountSnapshot, LedgerError, TransferRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for account setup files
///
/// Matches the input CSV format with columns: id, balance
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountCsvRecord {
    pub id: AccountId,
    pub balance: String,
}

/// Convert an AccountCsvRecord to an `(id, initial_balance)` pair
///
/// Range checks on the balance are left to the ledger.
pub fn convert_account_record(record: AccountCsvRecord) -> Result<(AccountId, Decimal), String> {
    let balance_str = record.balance.trim();
    if balance_str.is_empty() {
        return Err(format!("Account {} requires a balance", record.id));
    }

    Decimal::from_str(balance_str)
        .map(|balance| (record.id, balance))
        .map_err(|_| format!("Invalid balance '{}' for account {}", record.balance, record.id))
}

/// Write account states to CSV format
///
/// Writes accounts with columns: id, balance. Accounts are sorted by id for
/// deterministic output and balances use four decimal places.
pub fn write_accounts_csv(
    accounts: &[AccountSnapshot],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer.write_record(&[account.id.to_string(), format!("{:.4}", account.balance)])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the audit log to CSV format
///
/// Records are written in log order with columns: sequence, source,
/// destination, amount, status, source_balance, destination_balance.
pub fn write_audit_csv(
    records: &[TransferRecord],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record([
        "sequence",
        "source",
        "destination",
        "amount",
        "status",
        "source_balance",
        "destination_balance",
    ])?;

    for record in records {
        writer.write_record(&[
            record.sequence.to_string(),
            record.source.to_string(),
            record.destination.to_string(),
            format!("{:.4}", record.amount),
            record.status.to_string(),
            format!("{:.4}", record.source_balance),
            format!("{:.4}", record.destination_balance),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
