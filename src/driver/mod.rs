//! Workload driver module
//!
//! This module drives a shared [`Ledger`] with many concurrent callers. It
//! defines the Strategy pattern for how callers are scheduled, so the same
//! workload can run sequentially, on OS threads, or as tokio tasks.
//!
//! # Components
//!
//! - `generator` - Random transfer requests between distinct accounts
//! - `setup` - Building a ledger from random balances or a CSV file
//! - `sequential` - Workers invoked one after another
//! - `threaded` - One OS thread per worker
//! - `async` - One tokio task per worker on a multi-threaded runtime

use crate::cli::StrategyType;
use crate::core::Ledger;
use crate::types::{AccountId, LedgerError, TransferOutcome, TransferStatus};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub mod r#async;
pub mod generator;
pub mod sequential;
pub mod setup;
pub mod threaded;

pub use self::r#async::AsyncStrategy;
pub use generator::TransferGenerator;
pub use sequential::SequentialStrategy;
pub use setup::SetupConfig;
pub use threaded::ThreadedStrategy;

/// Configuration for a generated workload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkloadConfig {
    /// Number of concurrent callers
    pub workers: usize,
    /// Transfers each caller attempts
    pub transfers_per_worker: usize,
    /// Largest whole amount a single transfer moves
    pub max_amount: u64,
    /// Base seed; worker `n` uses `seed + n`
    pub seed: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            transfers_per_worker: 10,
            max_amount: 100,
            seed: None,
        }
    }
}

impl WorkloadConfig {
    /// Create a WorkloadConfig, replacing zero values with defaults
    pub fn new(
        workers: usize,
        transfers_per_worker: usize,
        max_amount: u64,
        seed: Option<u64>,
    ) -> Self {
        let default = Self::default();

        let workers = if workers == 0 {
            warn!(
                "Invalid workers ({}), using default ({})",
                workers, default.workers
            );
            default.workers
        } else {
            workers
        };

        let transfers_per_worker = if transfers_per_worker == 0 {
            warn!(
                "Invalid transfers_per_worker ({}), using default ({})",
                transfers_per_worker, default.transfers_per_worker
            );
            default.transfers_per_worker
        } else {
            transfers_per_worker
        };

        let max_amount = if max_amount == 0 {
            warn!(
                "Invalid max_amount ({}), using default ({})",
                max_amount, default.max_amount
            );
            default.max_amount
        } else {
            max_amount
        };

        Self {
            workers,
            transfers_per_worker,
            max_amount,
            seed,
        }
    }
}

/// Tally of transfer attempts made by one or more workers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkloadReport {
    pub attempted: usize,
    pub completed: usize,
    pub insufficient_funds: usize,
    /// Attempts rejected with an error (invalid amount, unknown account, ...)
    pub rejected: usize,
}

impl WorkloadReport {
    /// Count one transfer result
    pub fn record(&mut self, result: &Result<TransferOutcome, LedgerError>) {
        self.attempted += 1;
        match result.as_ref().map(TransferOutcome::status) {
            Ok(TransferStatus::Completed) => self.completed += 1,
            Ok(TransferStatus::InsufficientFunds) => self.insufficient_funds += 1,
            Err(e) => {
                warn!(error = %e, "transfer rejected");
                self.rejected += 1;
            }
        }
    }

    /// Add another worker's tally to this one
    pub fn merge(&mut self, other: &WorkloadReport) {
        self.attempted += other.attempted;
        self.completed += other.completed;
        self.insufficient_funds += other.insufficient_funds;
        self.rejected += other.rejected;
    }
}

/// Scheduling strategy for a workload
///
/// Implementations run `config.workers` callers, each attempting
/// `config.transfers_per_worker` random transfers against the shared ledger,
/// and return the merged tally once every caller has finished.
pub trait WorkloadStrategy: Send + Sync {
    /// Run the workload to completion
    ///
    /// # Errors
    ///
    /// - `NotEnoughAccounts` if the ledger has fewer than two accounts
    /// - `WorkerPanicked` if a caller panicked
    /// - `RuntimeError` if the strategy's runtime could not be started
    fn run(&self, ledger: Arc<Ledger>, config: &WorkloadConfig)
        -> Result<WorkloadReport, LedgerError>;
}

/// Create a workload strategy for the given strategy type
///
/// `worker_threads` sizes the async runtime and is ignored by the other strategies.
pub fn create_strategy(
    strategy_type: StrategyType,
    worker_threads: Option<usize>,
) -> Box<dyn WorkloadStrategy> {
    match strategy_type {
        StrategyType::Sequential => Box::new(SequentialStrategy),
        StrategyType::Threaded => Box::new(ThreadedStrategy),
        StrategyType::Async => Box::new(AsyncStrategy::new(
            worker_threads.unwrap_or_else(num_cpus::get),
        )),
    }
}

/// Ids a workload can pick from
pub(crate) fn workload_accounts(ledger: &Ledger) -> Result<Vec<AccountId>, LedgerError> {
    let ids = ledger.account_ids();
    if ids.len() < 2 {
        return Err(LedgerError::NotEnoughAccounts { count: ids.len() });
    }
    Ok(ids)
}

/// One caller's loop: generate and submit `transfers` requests
pub(crate) fn run_worker(
    ledger: &Ledger,
    generator: &mut TransferGenerator,
    ids: &[AccountId],
    transfers: usize,
) -> Result<WorkloadReport, LedgerError> {
    let mut report = WorkloadReport::default();
    for _ in 0..transfers {
        let request = generator.next_request(ids)?;
        report.record(&ledger.submit(&request));
    }
    Ok(report)
}

/// Merge per-worker results once every worker has finished
///
/// Consumes all results before deciding, so no worker is abandoned when an
/// earlier one failed. Returns the first failure, if any.
pub(crate) fn merge_worker_results(
    results: impl IntoIterator<Item = (usize, Result<WorkloadReport, LedgerError>)>,
) -> Result<WorkloadReport, LedgerError> {
    let mut total = WorkloadReport::default();
    let mut first_error = None;

    for (worker, result) in results {
        match result {
            Ok(report) => {
                debug!(worker, completed = report.completed, "worker finished");
                total.merge(&report);
            }
            Err(e) => {
                error!(worker, error = %e, "worker failed");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(total),
    }
}

/// Log every audit record at info level, in append order
pub fn log_audit_records(ledger: &Ledger) {
    let records = ledger.audit_log();
    info!(records = records.len(), "Audit log:");
    for record in &records {
        info!("{}", record);
    }
}

/// Totals and tally of a finished simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationSummary {
    pub initial_total: Decimal,
    pub final_total: Decimal,
    pub report: WorkloadReport,
}

/// Run a workload and verify that it conserved the ledger's total funds
///
/// Logs account states before and after the run. Totals are taken with every
/// account locked, so they are exact.
///
/// # Errors
///
/// Any error from the strategy, or `ConservationViolated` if the exact total
/// changed.
pub fn run_simulation(
    ledger: Arc<Ledger>,
    strategy: &dyn WorkloadStrategy,
    config: &WorkloadConfig,
) -> Result<SimulationSummary, LedgerError> {
    info!("Initial account states:");
    for account in ledger.accounts() {
        info!("{}", account);
    }
    let initial_total = ledger.consistent_total_balance()?;
    info!(total = %initial_total, "Initial total balance");

    let report = strategy.run(Arc::clone(&ledger), config)?;

    info!("Final account states:");
    for account in ledger.accounts() {
        info!("{}", account);
    }
    let final_total = ledger.consistent_total_balance()?;
    info!(
        total = %final_total,
        attempted = report.attempted,
        completed = report.completed,
        insufficient_funds = report.insufficient_funds,
        rejected = report.rejected,
        "Final total balance"
    );

    if final_total != initial_total {
        return Err(LedgerError::ConservationViolated {
            before: initial_total,
            after: final_total,
        });
    }

    Ok(SimulationSummary {
        initial_total,
        final_total,
        report,
    })
}
