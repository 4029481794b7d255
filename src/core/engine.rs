//! Command processing engine
//!
//! This module provides the `CommandEngine`, the caller side of the store
//! contract. It forwards parsed commands to whichever `LedgerStore` it was
//! built with and turns the returned `Outcome` into a `Result`, so that
//! drivers can log rejected commands and keep going.
//!
//! # Outcome Mapping
//!
//! - `Success` → `Ok(..)`
//! - `AccountNotFound` → `LedgerError::AccountNotFound` (a miss, not fatal)
//! - `InsufficientFunds` → `LedgerError::InsufficientFunds` (a rejection)
//!
//! # Thread Safety
//!
//! The engine is cheap to clone (it only holds an `Arc`) and every method
//! takes `&self`, so clones can be handed to concurrent tasks.

use super::traits::LedgerStore;
use crate::types::{AccountBalance, AccountId, LedgerCommand, LedgerError, Outcome};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// What a successfully processed command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// A new account was opened with this handle
    Created(AccountId),

    /// The balance that was read
    Balance(AccountId, Decimal),

    /// An adjustment or transfer was committed
    Applied,
}

/// Forwards commands to a ledger store
#[derive(Debug, Clone)]
pub struct CommandEngine {
    store: Arc<dyn LedgerStore>,
}

impl CommandEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// The store this engine writes to
    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Process a single command
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `InsufficientFunds` when the store rejects
    /// the command. The store is unchanged in both cases.
    pub fn process(&self, command: LedgerCommand) -> Result<CommandOutput, LedgerError> {
        match command {
            LedgerCommand::Create => {
                let account = self.store.create_account();
                Ok(CommandOutput::Created(account))
            }
            LedgerCommand::Balance { account } => {
                let balance = self
                    .store
                    .balance(account)
                    .ok_or_else(|| LedgerError::account_not_found(account))?;
                info!(account, %balance, "balance read");
                Ok(CommandOutput::Balance(account, balance))
            }
            LedgerCommand::Adjust { account, delta } => {
                self.store
                    .adjust_balance(account, delta)
                    .into_result(account, delta)?;
                debug!(account, %delta, "balance adjusted");
                Ok(CommandOutput::Applied)
            }
            LedgerCommand::Transfer { from, to, amount } => {
                let outcome = self.store.transfer_money(from, to, amount);
                // A missing receiver is reported against the receiver.
                let blamed = if outcome == Outcome::AccountNotFound
                    && self.store.balance(from).is_some()
                {
                    to
                } else {
                    from
                };
                outcome.into_result(blamed, amount)?;
                debug!(from, to, %amount, "transfer committed");
                Ok(CommandOutput::Applied)
            }
        }
    }

    /// Final balances of all accounts, sorted by handle
    pub fn get_accounts(&self) -> Vec<AccountBalance> {
        self.store.accounts()
    }
}
