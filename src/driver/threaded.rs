//! Threaded workload strategy
//!
//! Spawns one named OS thread per worker and joins them all. Every worker
//! shares the ledger through an `Arc`, so transfers genuinely race for
//! account locks.

use crate::core::Ledger;
use crate::driver::{
    merge_worker_results, run_worker, workload_accounts, TransferGenerator, WorkloadConfig,
    WorkloadReport, WorkloadStrategy,
};
use crate::types::LedgerError;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::error;

type WorkerHandle = JoinHandle<Result<WorkloadReport, LedgerError>>;

/// One OS thread per worker
#[derive(Debug, Clone, Copy)]
pub struct ThreadedStrategy;

impl WorkloadStrategy for ThreadedStrategy {
    fn run(
        &self,
        ledger: Arc<Ledger>,
        config: &WorkloadConfig,
    ) -> Result<WorkloadReport, LedgerError> {
        let ids: Arc<[_]> = workload_accounts(&ledger)?.into();
        let transfers = config.transfers_per_worker;

        let mut handles = Vec::with_capacity(config.workers);
        let mut spawn_error = None;
        for worker in 0..config.workers {
            let ledger = Arc::clone(&ledger);
            let ids = Arc::clone(&ids);
            let mut generator = TransferGenerator::for_worker(config, worker);
            let spawned = thread::Builder::new()
                .name(format!("transfer-worker-{}", worker))
                .spawn(move || run_worker(&ledger, &mut generator, &ids, transfers));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!(worker, "Failed to spawn worker thread: {}", e);
                    spawn_error = Some(LedgerError::from(e));
                    break;
                }
            }
        }

        // Workers already running finish before any error is reported
        let joined = join_workers(handles);
        match spawn_error {
            Some(e) => Err(e),
            None => joined,
        }
    }
}

/// Join every handle, then merge; a panicked thread becomes `WorkerPanicked`
fn join_workers(handles: Vec<WorkerHandle>) -> Result<WorkloadReport, LedgerError> {
    merge_worker_results(handles.into_iter().enumerate().map(|(worker, handle)| {
        let result = handle
            .join()
            .map_err(|_| LedgerError::WorkerPanicked { worker })
            .and_then(|report| report);
        (worker, result)
    }))
}
