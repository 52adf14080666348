//! Lock ordering policy
//!
//! Every code path that holds more than one account lock acquires them in
//! ascending account id order. With a single global order no cycle of waiting
//! lock holders can form, which is the whole deadlock-avoidance argument.

use crate::types::Account;

/// Order two distinct accounts for lock acquisition
///
/// Returns `(first, second)` with `first.id() < second.id()`, regardless of
/// which one is the source of the transfer. Callers must short-circuit
/// self-transfers before calling this; passing the same id twice is a logic
/// error.
pub fn order<'a>(a: &'a Account, b: &'a Account) -> (&'a Account, &'a Account) {
    debug_assert_ne!(a.id(), b.id(), "lock ordering requires distinct accounts");
    if a.id() < b.id() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Sort any set of accounts into acquisition order (ascending id)
pub fn acquisition_order<'a, I>(accounts: I) -> Vec<&'a Account>
where
    I: IntoIterator<Item = &'a Account>,
{
    let mut ordered: Vec<&Account> = accounts.into_iter().collect();
    ordered.sort_by_key(|account| account.id());
    ordered
}
