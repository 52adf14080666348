//! Concurrent ledger simulator CLI
//!
//! Builds a ledger of accounts, runs many concurrent workers performing random
//! transfers between them, verifies that total funds were conserved, and prints
//! the final account states as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- > accounts.csv
//! cargo run -- --strategy async --workers 10 --transfers 1000 > accounts.csv
//! cargo run -- --accounts accounts.csv --audit-output audit.csv --seed 42
//! RUST_LOG=debug cargo run -- --strategy sequential
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable account file, conservation failure, etc.)

use concurrent_ledger::cli;
use std::process;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args.log_level);

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
