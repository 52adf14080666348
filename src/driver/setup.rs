//! Ledger setup
//!
//! Builds the fixed account set before any transfer starts, either with
//! random whole balances or from an account setup CSV file.

use crate::core::Ledger;
use crate::io::AccountReader;
use crate::types::{AccountId, LedgerError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for a randomly initialised ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupConfig {
    /// Accounts are numbered `1..=account_count`
    pub account_count: u32,
    pub min_initial_balance: u64,
    pub max_initial_balance: u64,
    pub seed: Option<u64>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            account_count: 5,
            min_initial_balance: 100,
            max_initial_balance: 1000,
            seed: None,
        }
    }
}

impl SetupConfig {
    /// Create a SetupConfig, replacing invalid values with defaults
    ///
    /// A zero account count or an empty balance range (min > max) falls back
    /// to the default for that setting.
    pub fn new(
        account_count: u32,
        min_initial_balance: u64,
        max_initial_balance: u64,
        seed: Option<u64>,
    ) -> Self {
        let default = Self::default();

        let account_count = if account_count == 0 {
            warn!(
                "Invalid account_count ({}), using default ({})",
                account_count, default.account_count
            );
            default.account_count
        } else {
            account_count
        };

        let (min_initial_balance, max_initial_balance) =
            if min_initial_balance > max_initial_balance {
                warn!(
                    "Invalid initial balance range ({}..={}), using default ({}..={})",
                    min_initial_balance,
                    max_initial_balance,
                    default.min_initial_balance,
                    default.max_initial_balance
                );
                (default.min_initial_balance, default.max_initial_balance)
            } else {
                (min_initial_balance, max_initial_balance)
            };

        Self {
            account_count,
            min_initial_balance,
            max_initial_balance,
            seed,
        }
    }
}

/// Build a ledger with random initial balances
pub fn random_ledger(config: &SetupConfig) -> Result<Ledger, LedgerError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut ledger = Ledger::new();
    for id in 1..=config.account_count {
        let balance = rng.gen_range(config.min_initial_balance..=config.max_initial_balance);
        ledger.create_account(id, Decimal::from(balance))?;
    }

    info!(accounts = ledger.len(), "Created ledger with random balances");
    Ok(ledger)
}

/// Build a ledger from `(id, balance)` pairs
pub fn ledger_from_balances<I>(balances: I) -> Result<Ledger, LedgerError>
where
    I: IntoIterator<Item = (AccountId, Decimal)>,
{
    let mut ledger = Ledger::new();
    for (id, balance) in balances {
        ledger.create_account(id, balance)?;
    }
    Ok(ledger)
}

/// Build a ledger from an account setup CSV file
///
/// Unlike transfer failures, a bad row is fatal: skipping it would silently
/// change the funds the run starts with.
pub fn ledger_from_csv(path: &Path) -> Result<Ledger, LedgerError> {
    let balances = AccountReader::new(path)?.collect::<Result<Vec<_>, _>>()?;
    let ledger = ledger_from_balances(balances)?;
    info!(
        accounts = ledger.len(),
        path = %path.display(),
        "Loaded ledger from account file"
    );
    Ok(ledger)
}
