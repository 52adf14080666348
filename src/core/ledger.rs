//! Shared ledger of accounts
//!
//! This module provides the [`Ledger`], which owns a fixed set of accounts and
//! the audit log, and implements the transfer operation.
//!
//! # Phases
//!
//! - **Setup**: accounts are created through `&mut Ledger`. Exclusive access
//!   means no transfer can be running.
//! - **Transfers**: workers share `&Ledger` (usually via `Arc`). The account
//!   set is frozen, so id lookups need no lock.
//!
//! # Transfer state machine
//!
//! 1. Reject non-positive amounts and unknown ids before touching any lock
//! 2. Order the two accounts by id ([`lock_order::order`])
//! 3. Lock the first, then the second
//! 4. Check the source balance covers the amount
//! 5. Apply both deltas (or neither)
//! 6. Append the audit record while both locks are still held
//! 7. Release the second lock, then the first
//!
//! A self-transfer locks its single account once and changes nothing.

use crate::core::audit_log::AuditLog;
use crate::core::lock_order;
use crate::types::{
    Account, AccountGuard, AccountId, AccountSnapshot, LedgerError, TransferOutcome,
    TransferRecord, TransferRequest, TransferStatus,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Fixed set of accounts supporting concurrent pairwise transfers
#[derive(Debug, Default)]
pub struct Ledger {
    /// Accounts in creation order
    accounts: Vec<Account>,
    /// Account id to position in `accounts`
    index: HashMap<AccountId, usize>,
    audit_log: AuditLog,
}

impl Ledger {
    /// Create an empty ledger in its setup phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account during setup
    ///
    /// # Errors
    ///
    /// - `DuplicateAccount` if the id is already in use
    /// - `InvalidInitialBalance` if the balance is negative
    pub fn create_account(
        &mut self,
        id: AccountId,
        initial_balance: Decimal,
    ) -> Result<(), LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_initial_balance(id, initial_balance));
        }
        if self.index.contains_key(&id) {
            return Err(LedgerError::duplicate_account(id));
        }

        self.index.insert(id, self.accounts.len());
        self.accounts.push(Account::new(id, initial_balance));
        debug!(account = id, balance = %initial_balance, "account created");
        Ok(())
    }

    /// Move `amount` from `source` to `destination` atomically
    ///
    /// # Returns
    ///
    /// * `Ok(TransferOutcome::Completed)` with both balances as seen inside the
    ///   critical section
    /// * `Ok(TransferOutcome::InsufficientFunds)` if the source could not cover
    ///   the amount; nothing changed
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for zero or negative amounts (no lock taken)
    /// - `UnknownAccount` for ids not in the ledger (no lock taken)
    /// - `ArithmeticOverflow` if crediting the destination would overflow;
    ///   nothing changed
    pub fn transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Decimal,
    ) -> Result<TransferOutcome, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }
        let source_account = self.account(source)?;
        let destination_account = self.account(destination)?;
        let request = TransferRequest::new(source, destination, amount);

        if source == destination {
            return Ok(self.self_transfer(source_account, &request));
        }

        let (first, second) = lock_order::order(source_account, destination_account);
        let mut first_guard = first.lock();
        let mut second_guard = second.lock();

        let outcome = if first_guard.id() == source {
            self.settle(&request, &mut first_guard, &mut second_guard)
        } else {
            self.settle(&request, &mut second_guard, &mut first_guard)
        };

        drop(second_guard);
        drop(first_guard);
        outcome
    }

    /// Convenience wrapper for [`Ledger::transfer`]
    pub fn submit(&self, request: &TransferRequest) -> Result<TransferOutcome, LedgerError> {
        self.transfer(request.source, request.destination, request.amount)
    }

    /// Validate, mutate and audit while both locks are held
    fn settle(
        &self,
        request: &TransferRequest,
        source: &mut AccountGuard<'_>,
        destination: &mut AccountGuard<'_>,
    ) -> Result<TransferOutcome, LedgerError> {
        let available = source.read_balance();
        let destination_balance = destination.read_balance();
        if available < request.amount {
            let sequence = self.audit_log.append(
                request,
                TransferStatus::InsufficientFunds,
                available,
                destination_balance,
            );
            debug!(
                sequence,
                source = request.source,
                destination = request.destination,
                amount = %request.amount,
                available = %available,
                "transfer rejected: insufficient funds"
            );
            return Ok(TransferOutcome::InsufficientFunds {
                attempted: request.amount,
                available,
            });
        }

        // Both new balances must be exact, or the total would drift
        let (new_source_balance, new_destination_balance) =
            exact_balances(available, destination_balance, request.amount).ok_or_else(|| {
                LedgerError::arithmetic_overflow(
                    request.source,
                    request.destination,
                    request.amount,
                )
            })?;

        source.apply_delta(-request.amount);
        destination.apply_delta(request.amount);
        debug_assert_eq!(source.read_balance(), new_source_balance);
        debug_assert_eq!(destination.read_balance(), new_destination_balance);

        let sequence = self.audit_log.append(
            request,
            TransferStatus::Completed,
            new_source_balance,
            new_destination_balance,
        );
        debug!(
            sequence,
            source = request.source,
            destination = request.destination,
            amount = %request.amount,
            source_balance = %new_source_balance,
            destination_balance = %new_destination_balance,
            "transfer completed"
        );

        Ok(TransferOutcome::Completed {
            new_source_balance,
            new_destination_balance,
        })
    }

    /// Self-transfers take the one lock once and leave the balance untouched
    fn self_transfer(&self, account: &Account, request: &TransferRequest) -> TransferOutcome {
        let guard = account.lock();
        let balance = guard.read_balance();
        let sequence = self
            .audit_log
            .append(request, TransferStatus::Completed, balance, balance);
        debug!(sequence, account = guard.id(), amount = %request.amount, "self-transfer ignored");

        TransferOutcome::Completed {
            new_source_balance: balance,
            new_destination_balance: balance,
        }
    }

    /// Sum of all balances, each read under its own lock
    ///
    /// While transfers are in flight the result can mix states from before and
    /// after a transfer. Use [`Ledger::consistent_total_balance`] for an exact
    /// figure in that situation. A mixed view can exceed the true total, so an
    /// overflowing sum is retried with every account locked.
    ///
    /// # Errors
    ///
    /// `TotalBalanceOverflow` if the balances do not fit in a `Decimal`.
    pub fn total_balance(&self) -> Result<Decimal, LedgerError> {
        checked_sum(self.accounts.iter().map(Account::balance_snapshot))
            .or_else(|_| self.consistent_total_balance())
    }

    /// Sum of all balances with every account locked at once
    ///
    /// Locks are taken in ascending id order, the same order transfers use,
    /// so this cannot deadlock against them.
    ///
    /// # Errors
    ///
    /// `TotalBalanceOverflow` if the balances do not fit in a `Decimal`.
    pub fn consistent_total_balance(&self) -> Result<Decimal, LedgerError> {
        let guards: Vec<AccountGuard<'_>> = lock_order::acquisition_order(&self.accounts)
            .into_iter()
            .map(Account::lock)
            .collect();
        checked_sum(guards.iter().map(AccountGuard::read_balance))
    }

    /// Snapshot of the audit log in append order
    pub fn audit_log(&self) -> Vec<TransferRecord> {
        self.audit_log.snapshot()
    }

    /// Resolve an id to its account
    pub fn account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.index
            .get(&id)
            .map(|&position| &self.accounts[position])
            .ok_or_else(|| LedgerError::unknown_account(id))
    }

    /// Current (possibly stale) balance of one account
    pub fn balance_of(&self, id: AccountId) -> Result<Decimal, LedgerError> {
        self.account(id).map(Account::balance_snapshot)
    }

    /// Account ids in creation order
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.accounts.iter().map(Account::id).collect()
    }

    /// Snapshots of every account in creation order
    pub fn accounts(&self) -> Vec<AccountSnapshot> {
        self.accounts.iter().map(Account::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// New source and destination balances, if both are exactly representable
///
/// `Decimal` rounds results that need more than 28 significant digits, so a
/// sum that does not subtract back to its operand has lost precision.
fn exact_balances(
    source: Decimal,
    destination: Decimal,
    amount: Decimal,
) -> Option<(Decimal, Decimal)> {
    let new_source = source.checked_add(-amount)?;
    let new_destination = destination.checked_add(amount)?;
    let exact = source.checked_sub(new_source) == Some(amount)
        && new_destination.checked_sub(destination) == Some(amount);
    exact.then_some((new_source, new_destination))
}

fn checked_sum(balances: impl IntoIterator<Item = Decimal>) -> Result<Decimal, LedgerError> {
    balances
        .into_iter()
        .try_fold(Decimal::ZERO, |total, balance| total.checked_add(balance))
        .ok_or(LedgerError::TotalBalanceOverflow)
}
