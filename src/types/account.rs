//! Account-related types for the concurrent ledger
//!
//! An [`Account`] owns its balance behind its own mutual-exclusion primitive.
//! The balance can only be read or changed through an [`AccountGuard`], which
//! exists only while the account's lock is held. Dropping the guard releases
//! the lock, so every exit path of a caller releases it unconditionally.

use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier
///
/// Ids are totally ordered; that order is the global lock acquisition order.
pub type AccountId = u32;

/// A ledger account with a lock-protected balance
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    balance: Mutex<Decimal>,
}

impl Account {
    /// Create a new account with the given initial balance
    pub fn new(id: AccountId, initial_balance: Decimal) -> Self {
        Account {
            id,
            balance: Mutex::new(initial_balance),
        }
    }

    /// The immutable account id
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Acquire this account's exclusive lock, blocking until it is available
    pub fn lock(&self) -> AccountGuard<'_> {
        AccountGuard {
            id: self.id,
            balance: self.balance.lock(),
        }
    }

    /// Read the balance outside of any transfer's critical section
    ///
    /// The lock is held only for the read itself, so the value may be stale by
    /// the time the caller uses it. Intended for reporting.
    pub fn balance_snapshot(&self) -> Decimal {
        *self.balance.lock()
    }

    /// Point-in-time copy of this account for display and export
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id,
            balance: self.balance_snapshot(),
        }
    }
}

/// Exclusive access to an account's balance
///
/// Holding a guard means holding the account's lock.
pub struct AccountGuard<'a> {
    id: AccountId,
    balance: MutexGuard<'a, Decimal>,
}

impl AccountGuard<'_> {
    /// Id of the locked account
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Current balance
    pub fn read_balance(&self) -> Decimal {
        *self.balance
    }

    /// Add a (possibly negative) amount to the balance
    ///
    /// No validation happens here; callers check funds and range first.
    pub fn apply_delta(&mut self, amount: Decimal) {
        *self.balance += amount;
    }
}

impl fmt::Debug for AccountGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountGuard")
            .field("id", &self.id)
            .field("balance", &*self.balance)
            .finish()
    }
}

/// Plain copy of an account's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub balance: Decimal,
}

impl fmt::Display for AccountSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account {} - Balance: {}", self.id, self.balance)
    }
}
