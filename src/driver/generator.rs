//! Pseudo-random transfer generation
//!
//! Each worker owns its own [`TransferGenerator`], so no RNG state is shared
//! between threads. With a seed, worker `n` uses `seed + n`, which makes the
//! request stream of every worker reproducible.

use crate::driver::WorkloadConfig;
use crate::types::{AccountId, LedgerError, TransferRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Produces random transfers between distinct accounts
#[derive(Debug, Clone)]
pub struct TransferGenerator {
    rng: StdRng,
    max_amount: u64,
}

impl TransferGenerator {
    /// Create a generator drawing whole amounts in `1..=max_amount`
    ///
    /// Without a seed the generator is seeded from OS entropy.
    pub fn new(seed: Option<u64>, max_amount: u64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            max_amount: max_amount.max(1),
        }
    }

    /// Generator for one worker of a workload
    pub fn for_worker(config: &WorkloadConfig, worker: usize) -> Self {
        let seed = config.seed.map(|seed| seed.wrapping_add(worker as u64));
        Self::new(seed, config.max_amount)
    }

    /// Pick a source, a different destination and an amount
    ///
    /// # Errors
    ///
    /// `NotEnoughAccounts` if fewer than two ids are given.
    pub fn next_request(&mut self, ids: &[AccountId]) -> Result<TransferRequest, LedgerError> {
        if ids.len() < 2 {
            return Err(LedgerError::NotEnoughAccounts { count: ids.len() });
        }

        let source = self.rng.gen_range(0..ids.len());
        // Draw from the remaining n - 1 slots and skip over the source
        let mut destination = self.rng.gen_range(0..ids.len() - 1);
        if destination >= source {
            destination += 1;
        }
        let amount = Decimal::from(self.rng.gen_range(1..=self.max_amount));

        Ok(TransferRequest::new(ids[source], ids[destination], amount))
    }
}
