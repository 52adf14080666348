//! Asynchronous workload strategy
//!
//! Runs each worker as a tokio task on a multi-threaded runtime. Tasks yield
//! to the scheduler after every transfer so callers interleave even when there
//! are more workers than runtime threads.
//!
//! # Architecture
//!
//! ```text
//! AsyncStrategy
//!     ├── tokio runtime (worker_threads)
//!     └── one task per worker
//!         ├── TransferGenerator (owned by the task)
//!         └── Arc<Ledger>       (shared)
//! ```
//!
//! Account locks are blocking mutexes. A transfer holds them only for a few
//! arithmetic operations and an audit append, so blocking inside a task is
//! acceptable here.

use crate::core::Ledger;
use crate::driver::{
    merge_worker_results, workload_accounts, TransferGenerator, WorkloadConfig, WorkloadReport,
    WorkloadStrategy,
};
use crate::types::LedgerError;
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::error;

type WorkerTask = JoinHandle<Result<WorkloadReport, LedgerError>>;

/// One tokio task per worker
#[derive(Debug, Clone)]
pub struct AsyncStrategy {
    worker_threads: usize,
}

impl AsyncStrategy {
    /// Create a strategy backed by a runtime with `worker_threads` threads
    ///
    /// Zero falls back to the number of CPU cores.
    pub fn new(worker_threads: usize) -> Self {
        let worker_threads = if worker_threads == 0 {
            num_cpus::get()
        } else {
            worker_threads
        };
        Self { worker_threads }
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }
}

impl WorkloadStrategy for AsyncStrategy {
    fn run(
        &self,
        ledger: Arc<Ledger>,
        config: &WorkloadConfig,
    ) -> Result<WorkloadReport, LedgerError> {
        let ids: Arc<[_]> = workload_accounts(&ledger)?.into();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.worker_threads)
            .build()
            .map_err(|e| LedgerError::RuntimeError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let tasks: Vec<WorkerTask> = (0..config.workers)
                .map(|worker| {
                    let ledger = Arc::clone(&ledger);
                    let ids = Arc::clone(&ids);
                    let mut generator = TransferGenerator::for_worker(config, worker);
                    let transfers = config.transfers_per_worker;

                    tokio::spawn(async move {
                        let mut report = WorkloadReport::default();
                        for _ in 0..transfers {
                            let request = generator.next_request(&ids)?;
                            report.record(&ledger.submit(&request));
                            tokio::task::yield_now().await;
                        }
                        Ok::<_, LedgerError>(report)
                    })
                })
                .collect();

            join_tasks(tasks).await
        })
    }
}

/// Await every task, then merge; a panicked task becomes `WorkerPanicked`
async fn join_tasks(tasks: Vec<WorkerTask>) -> Result<WorkloadReport, LedgerError> {
    let results = join_all(tasks).await;
    merge_worker_results(results.into_iter().enumerate().map(|(worker, result)| {
        let result = result
            .map_err(|e| {
                error!(worker, "Task panicked: {:?}", e);
                LedgerError::WorkerPanicked { worker }
            })
            .and_then(|report| report);
        (worker, result)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_worker_threads_falls_back_to_cpu_count() {
        assert_eq!(AsyncStrategy::new(0).worker_threads(), num_cpus::get());
        assert_eq!(AsyncStrategy::new(3).worker_threads(), 3);
    }

    #[test]
    fn test_more_tasks_than_threads() {
        let mut ledger = Ledger::new();
        for id in 1..=4 {
            ledger.create_account(id, Decimal::from(250)).unwrap();
        }
        let ledger = Arc::new(ledger);
        let config = WorkloadConfig::new(16, 100, 100, Some(8));

        let report = AsyncStrategy::new(2)
            .run(Arc::clone(&ledger), &config)
            .unwrap();

        assert_eq!(report.attempted, 1_600);
        assert_eq!(ledger.consistent_total_balance(), Ok(Decimal::from(1_000)));
        assert_eq!(ledger.audit_log().len(), 1_600);
    }

    async fn failing_worker() -> Result<WorkloadReport, LedgerError> {
        panic!("task 0 failed")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicked_task_does_not_abandon_the_others() {
        let finished = Arc::new(AtomicUsize::new(0));
        let mut tasks: Vec<WorkerTask> = vec![tokio::spawn(failing_worker())];
        tasks.extend((1..4).map(|_| {
            let finished = Arc::clone(&finished);
            tokio::spawn(async move {
                for _ in 0..20 {
                    tokio::task::yield_now().await;
                }
                std::thread::sleep(Duration::from_millis(50));
                finished.fetch_add(1, Ordering::SeqCst);
                Ok(WorkloadReport::default())
            })
        }));

        let result = join_tasks(tasks).await;

        assert_eq!(result, Err(LedgerError::WorkerPanicked { worker: 0 }));
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }
}
