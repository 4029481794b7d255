//! Ledger command types
//!
//! A command is one parsed input row. Commands are the only way the outer
//! layers (CLI, batch processing) reach the store.

use super::account::AccountId;
use rust_decimal::Decimal;

/// Command types accepted in the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    /// Open a new zero-balance account
    Create,

    /// Read an account's balance
    Balance,

    /// Apply a signed delta to one account
    Adjust,

    /// Move a positive amount between two accounts
    Transfer,
}

/// A validated ledger command
///
/// Handles and amounts are already parsed into the store's types, so the
/// engine can forward them without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    Create,
    Balance {
        account: AccountId,
    },
    Adjust {
        account: AccountId,
        delta: Decimal,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
}

impl LedgerCommand {
    pub fn command_type(&self) -> CommandType {
        match self {
            LedgerCommand::Create => CommandType::Create,
            LedgerCommand::Balance { .. } => CommandType::Balance,
            LedgerCommand::Adjust { .. } => CommandType::Adjust,
            LedgerCommand::Transfer { .. } => CommandType::Transfer,
        }
    }

    /// The account this command reads or debits
    ///
    /// Used to partition commands for concurrent processing. `Create` has no
    /// primary account.
    pub fn primary_account(&self) -> Option<AccountId> {
        match self {
            LedgerCommand::Create => None,
            LedgerCommand::Balance { account } | LedgerCommand::Adjust { account, .. } => {
                Some(*account)
            }
            LedgerCommand::Transfer { from, .. } => Some(*from),
        }
    }

    /// Every account this command reads or writes
    ///
    /// A transfer touches both sides. Commands that share an account must not
    /// be reordered against each other.
    pub fn touched_accounts(&self) -> Vec<AccountId> {
        match self {
            LedgerCommand::Create => Vec::new(),
            LedgerCommand::Balance { account } | LedgerCommand::Adjust { account, .. } => {
                vec![*account]
            }
            LedgerCommand::Transfer { from, to, .. } => vec![*from, *to],
        }
    }
}
