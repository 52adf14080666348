//! Streaming reader for account setup files
//!
//! Provides an iterator over `(id, initial_balance)` pairs read from a CSV
//! file with the header `id,balance`. Format concerns are delegated to the
//! csv_format module.
//!
//! ```no_run
//! use concurrent_ledger::io::AccountReader;
//! use std::path::Path;
//!
//! let reader = AccountReader::new(Path::new("accounts.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok((id, balance)) => println!("account {id}: {balance}"),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Failing to open the file is returned from `new()`
//! - Each malformed row is yielded as an `Err` carrying its line number

use crate::io::csv_format::{convert_account_record, AccountCsvRecord};
use crate::types::{AccountId, LedgerError};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;

/// Account setup CSV reader
#[derive(Debug)]
pub struct AccountReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl AccountReader {
    /// Open an account setup file
    ///
    /// Fields are trimmed; the first row must be the header.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self { reader, headers })
    }
}

impl Iterator for AccountReader {
    type Item = Result<(AccountId, Decimal), LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(e.into())),
        }

        // Line in the file, so skipped blank lines are accounted for
        let line = record.position().map(|position| position.line());

        Some(
            record
                .deserialize::<AccountCsvRecord>(Some(&self.headers))
                .map_err(|e| LedgerError::parse_error(line, e.to_string()))
                .and_then(|account| {
                    convert_account_record(account)
                        .map_err(|message| LedgerError::parse_error(line, message))
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_reader_fails_on_missing_file() {
        let result = AccountReader::new(Path::new("nonexistent.csv"));
        let error = result.unwrap_err();
        assert!(error.to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_reader_iterates_accounts() {
        let file = create_temp_csv("id,balance\n1,500\n2, 300.25 \n");

        let records: Vec<_> = AccountReader::new(file.path()).unwrap().collect();

        assert_eq!(
            records,
            vec![Ok((1, Decimal::new(500, 0))), Ok((2, Decimal::new(30025, 2)))]
        );
    }

    #[test]
    fn test_reader_reports_line_numbers() {
        let file = create_temp_csv("id,balance\n1,500\n2,lots\n3,10\n");

        let records: Vec<_> = AccountReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());
        match &records[1] {
            Err(LedgerError::ParseError { line, message }) => {
                assert_eq!(*line, Some(3));
                assert!(message.contains("Invalid balance"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_reader_line_numbers_count_blank_lines() {
        let file = create_temp_csv("id,balance\n1,500\n\n\n2,lots\n");

        let records: Vec<_> = AccountReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 2);
        assert!(matches!(records[1], Err(LedgerError::ParseError { line: Some(5), .. })));
    }

    #[test]
    fn test_reader_rejects_non_numeric_id() {
        let file = create_temp_csv("id,balance\nabc,500\n");

        let records: Vec<_> = AccountReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], Err(LedgerError::ParseError { line: Some(2), .. })));
    }

    #[test]
    fn test_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("id,balance\n");
        assert_eq!(AccountReader::new(file.path()).unwrap().count(), 0);
    }
}
