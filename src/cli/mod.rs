// CLI module
// Command-line interface, argument parsing and the simulator entry point

mod args;

pub use args::{CliArgs, StrategyType};

use crate::driver::{
    create_strategy, log_audit_records, run_simulation, setup, SimulationSummary,
};
use crate::io::{write_accounts_csv, write_audit_csv};
use crate::types::LedgerError;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints a message and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so stdout carries only the account CSV. `RUST_LOG`
/// takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run a full simulation for the parsed arguments
///
/// Builds the ledger, runs the workload with the selected strategy, writes the
/// final account states as CSV to `output` and, if requested, the audit log
/// to its own file and to the log.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<SimulationSummary, LedgerError> {
    let ledger = match &args.accounts_file {
        Some(path) => setup::ledger_from_csv(path)?,
        None => setup::random_ledger(&args.to_setup_config())?,
    };
    let ledger = Arc::new(ledger);

    let strategy = create_strategy(args.strategy.clone(), args.worker_threads);
    let summary = run_simulation(
        Arc::clone(&ledger),
        strategy.as_ref(),
        &args.to_workload_config(),
    )?;

    if args.log_audit {
        log_audit_records(&ledger);
    }

    write_accounts_csv(&ledger.accounts(), output)?;

    if let Some(path) = &args.audit_output {
        let records = ledger.audit_log();
        let mut file = BufWriter::new(File::create(path)?);
        write_audit_csv(&records, &mut file)?;
        info!(records = records.len(), path = %path.display(), "Audit log written");
    }

    Ok(summary)
}
