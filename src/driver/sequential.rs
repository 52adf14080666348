//! Sequential workload strategy
//!
//! Runs each worker to completion before starting the next one. There is no
//! contention, so this is a baseline for reproducible runs (with a seed) rather
//! than a test of the locking discipline.

use crate::core::Ledger;
use crate::driver::{
    run_worker, workload_accounts, TransferGenerator, WorkloadConfig, WorkloadReport,
    WorkloadStrategy,
};
use crate::types::LedgerError;
use std::sync::Arc;
use tracing::debug;

/// Workers invoked one after another on the calling thread
#[derive(Debug, Clone, Copy)]
pub struct SequentialStrategy;

impl WorkloadStrategy for SequentialStrategy {
    fn run(
        &self,
        ledger: Arc<Ledger>,
        config: &WorkloadConfig,
    ) -> Result<WorkloadReport, LedgerError> {
        let ids = workload_accounts(&ledger)?;
        let mut total = WorkloadReport::default();

        for worker in 0..config.workers {
            let mut generator = TransferGenerator::for_worker(config, worker);
            let report = run_worker(&ledger, &mut generator, &ids, config.transfers_per_worker)?;
            debug!(worker, completed = report.completed, "worker finished");
            total.merge(&report);
        }

        Ok(total)
    }
}
