//! I/O module
//!
//! Handles account setup files and CSV reports.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `account_reader` - Account setup reader with iterator interface

pub mod account_reader;
pub mod csv_format;

pub use account_reader::AccountReader;
pub use csv_format::{
    convert_account_record, write_accounts_csv, write_audit_csv, AccountCsvRecord,
};
