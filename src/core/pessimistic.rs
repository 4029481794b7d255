//! Lock-ordering account store
//!
//! Every account owns its own mutex. Single-account operations take that one
//! lock. A transfer takes both participants' locks, always the smaller handle
//! first, and holds them across the debit and the credit. Since every
//! multi-lock operation acquires in ascending handle order, no two of them
//! can wait on each other in a cycle.
//!
//! # Consistency
//!
//! Transfers are atomic to readers: `balance` takes the account lock, so it
//! sees the account either before or after a transfer touching it, never in
//! between. `accounts` locks every account in handle order and returns a
//! consistent cut of the whole ledger.

use super::ids::IdGenerator;
use super::traits::{check_transfer, LedgerStore, TransferIsolation};
use crate::types::{apply_delta, AccountBalance, AccountId, Outcome};
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Account record guarded by its own lock
#[derive(Debug)]
struct LockedAccount {
    balance: Mutex<Decimal>,
}

impl LockedAccount {
    fn new() -> Self {
        Self {
            balance: Mutex::new(Decimal::ZERO),
        }
    }
}

/// Order in which two accounts must be locked
///
/// Depends only on the handles, never on which one is the sender.
pub fn lock_order(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Ledger store using per-account mutual exclusion
#[derive(Debug, Default)]
pub struct PessimisticStore {
    ids: IdGenerator,
    accounts: DashMap<AccountId, Arc<LockedAccount>>,
}

impl PessimisticStore {
    pub fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
            accounts: DashMap::new(),
        }
    }

    // Clone the record out so no map shard stays locked while we wait on the
    // account's own mutex.
    fn lookup(&self, account: AccountId) -> Option<Arc<LockedAccount>> {
        self.accounts
            .get(&account)
            .map(|entry| Arc::clone(entry.value()))
    }
}

impl LedgerStore for PessimisticStore {
    fn create_account(&self) -> AccountId {
        let account = self.ids.next_id();
        self.accounts.insert(account, Arc::new(LockedAccount::new()));
        debug!(account, "account created");
        account
    }

    fn balance(&self, account: AccountId) -> Option<Decimal> {
        let record = self.lookup(account)?;
        let balance = *record.balance.lock();
        Some(balance)
    }

    fn adjust_balance(&self, account: AccountId, delta: Decimal) -> Outcome {
        let Some(record) = self.lookup(account) else {
            return Outcome::AccountNotFound;
        };

        let mut balance = record.balance.lock();
        match apply_delta(*balance, delta) {
            Some(new_balance) => {
                *balance = new_balance;
                Outcome::Success
            }
            None => Outcome::InsufficientFunds,
        }
    }

    fn transfer_money(&self, from: AccountId, to: AccountId, amount: Decimal) -> Outcome {
        if let Some(outcome) = check_transfer(from, to, amount) {
            return outcome;
        }

        let Some(from_record) = self.lookup(from) else {
            return Outcome::AccountNotFound;
        };
        let Some(to_record) = self.lookup(to) else {
            return Outcome::AccountNotFound;
        };

        let (first_id, _) = lock_order(from, to);
        let from_first = first_id == from;
        let (first, second) = if from_first {
            (&from_record, &to_record)
        } else {
            (&to_record, &from_record)
        };

        let mut first_guard = first.balance.lock();
        let mut second_guard = second.balance.lock();
        let (from_balance, to_balance) = if from_first {
            (&mut *first_guard, &mut *second_guard)
        } else {
            (&mut *second_guard, &mut *first_guard)
        };

        // Both sides are computed before either is written, so a rejected
        // credit (decimal overflow) cannot leave the debit behind.
        let Some(new_from) = apply_delta(*from_balance, -amount) else {
            return Outcome::InsufficientFunds;
        };
        let Some(new_to) = apply_delta(*to_balance, amount) else {
            return Outcome::InsufficientFunds;
        };

        *from_balance = new_from;
        *to_balance = new_to;
        Outcome::Success
    }

    fn accounts(&self) -> Vec<AccountBalance> {
        let mut records: Vec<(AccountId, Arc<LockedAccount>)> = self
            .accounts
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        records.sort_by_key(|(account, _)| *account);

        // Ascending handle order, same as transfers.
        let guards: Vec<_> = records
            .iter()
            .map(|(_, record)| record.balance.lock())
            .collect();

        records
            .iter()
            .zip(guards.iter())
            .map(|((account, _), balance)| AccountBalance::new(*account, **balance))
            .collect()
    }

    fn isolation(&self) -> TransferIsolation {
        TransferIsolation::Atomic
    }
}
