//! Account-related types for the ledger
//!
//! The live, mutable account records are private to each store. This module
//! only holds the identifier type, the owned snapshot handed out for output,
//! and the balance arithmetic both stores share.

use rust_decimal::Decimal;

/// Account handle
///
/// Assigned sequentially starting at 1 and never reused.
pub type AccountId = u64;

/// Owned snapshot of one account's balance
///
/// Produced by `LedgerStore::accounts` for output. Holding one never keeps a
/// reference into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    /// The account handle
    pub account: AccountId,

    /// Balance at the time the snapshot was taken, always `>= 0`
    pub balance: Decimal,
}

impl AccountBalance {
    pub fn new(account: AccountId, balance: Decimal) -> Self {
        AccountBalance { account, balance }
    }
}

/// Apply `delta` to `balance` under the overdraft rule
///
/// Returns the new balance, or `None` when the result would be negative or
/// would not fit in a `Decimal`. The input is never modified, so callers can
/// commit the returned value or drop it.
pub fn apply_delta(balance: Decimal, delta: Decimal) -> Option<Decimal> {
    let new_balance = balance.checked_add(delta)?;
    if new_balance < Decimal::ZERO {
        return None;
    }
    Some(new_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[rstest]
    #[case::credit_from_zero("0", "12.34", Some("12.34"))]
    #[case::credit_accumulates("12.34", "12.34", Some("24.68"))]
    #[case::debit_within_balance("24.68", "-12.34", Some("12.34"))]
    #[case::debit_to_exactly_zero("10.00", "-10.00", Some("0.00"))]
    #[case::overdraft("12.34", "-100.00", None)]
    #[case::smallest_overdraft("0.01", "-0.02", None)]
    #[case::zero_delta("5", "0", Some("5"))]
    fn test_apply_delta(#[case] balance: &str, #[case] delta: &str, #[case] expected: Option<&str>) {
        assert_eq!(apply_delta(dec(balance), dec(delta)), expected.map(dec));
    }

    #[test]
    fn test_apply_delta_rejects_overflow() {
        assert_eq!(apply_delta(Decimal::MAX, Decimal::ONE), None);
    }

    #[test]
    fn test_apply_delta_accepts_zero_with_mixed_scales() {
        let result = apply_delta(dec("1.5"), dec("-1.50")).unwrap();
        assert!(result.is_zero());
    }

    #[test]
    fn test_round_trip_is_exact() {
        let start = dec("100.00");
        let delta = dec("0.0000000001");
        let up = apply_delta(start, delta).unwrap();
        let back = apply_delta(up, -delta).unwrap();
        assert_eq!(back, start);
    }
}
