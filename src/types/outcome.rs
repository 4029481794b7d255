//! Operation outcomes returned by every ledger store operation
//!
//! Store operations never fail with an error value or a panic. They always
//! return one of the three outcomes below and leave the store untouched on
//! anything other than `Success`.

use super::account::AccountId;
use super::error::LedgerError;
use rust_decimal::Decimal;

/// Result of a mutating ledger operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The operation was committed
    Success,

    /// A referenced account handle is unknown
    AccountNotFound,

    /// The operation would drive a balance below zero, or the amount is not
    /// a valid amount to move
    InsufficientFunds,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    /// Convert a non-success outcome into the matching `LedgerError`
    ///
    /// `account` and `amount` are only used to give the error some context.
    pub fn into_result(self, account: AccountId, amount: Decimal) -> Result<(), LedgerError> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::AccountNotFound => Err(LedgerError::account_not_found(account)),
            Outcome::InsufficientFunds => Err(LedgerError::insufficient_funds(account, amount)),
        }
    }
}
