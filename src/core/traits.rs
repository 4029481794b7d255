//! The ledger store contract
//!
//! Both concurrency strategies implement [`LedgerStore`], so callers can hold
//! an `Arc<dyn LedgerStore>` without knowing which one is active. They share
//! the per-account invariants (no negative balance, no lost update) but not
//! the cross-account isolation of transfers, see [`TransferIsolation`].

use crate::types::{AccountBalance, AccountId, Outcome};
use rust_decimal::Decimal;
use std::fmt::Debug;

/// How a transfer appears to concurrent readers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferIsolation {
    /// Readers see either the whole transfer or none of it
    Atomic,

    /// Readers may see the debit applied before the credit
    Relaxed,
}

/// Thread-safe in-memory account store
pub trait LedgerStore: Send + Sync + Debug {
    /// Allocate the next handle and insert a zero-balance account
    fn create_account(&self) -> AccountId;

    /// Current balance, or `None` if the handle is unknown
    fn balance(&self, account: AccountId) -> Option<Decimal>;

    /// Apply a signed `delta` unless it would overdraw the account
    fn adjust_balance(&self, account: AccountId, delta: Decimal) -> Outcome;

    /// Move a positive `amount` from one account to another
    fn transfer_money(&self, from: AccountId, to: AccountId, amount: Decimal) -> Outcome;

    /// Balances of all accounts, sorted by handle
    fn accounts(&self) -> Vec<AccountBalance>;

    /// Isolation guarantee this store gives transfers
    fn isolation(&self) -> TransferIsolation;
}

/// Checks every transfer runs before touching any account
///
/// Returns the final outcome when the transfer is decided without looking at
/// balances: a non-positive amount is rejected, and a self-transfer is a
/// no-op success whether or not the account exists. The amount check comes
/// first, so a self-transfer of a non-positive amount is still rejected.
pub fn check_transfer(from: AccountId, to: AccountId, amount: Decimal) -> Option<Outcome> {
    if amount <= Decimal::ZERO {
        return Some(Outcome::InsufficientFunds);
    }
    if from == to {
        return Some(Outcome::Success);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero_amount(1, 2, Decimal::ZERO, Some(Outcome::InsufficientFunds))]
    #[case::negative_amount(1, 2, Decimal::new(-1000, 2), Some(Outcome::InsufficientFunds))]
    #[case::self_transfer(3, 3, Decimal::new(1000, 2), Some(Outcome::Success))]
    #[case::self_transfer_negative(3, 3, Decimal::NEGATIVE_ONE, Some(Outcome::InsufficientFunds))]
    #[case::regular(1, 2, Decimal::new(1000, 2), None)]
    fn test_check_transfer(
        #[case] from: AccountId,
        #[case] to: AccountId,
        #[case] amount: Decimal,
        #[case] expected: Option<Outcome>,
    ) {
        assert_eq!(check_transfer(from, to, amount), expected);
    }
}
