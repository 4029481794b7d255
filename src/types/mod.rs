//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account handles, balance snapshots and the overdraft rule
//! - `outcome`: The three-valued result of every store operation
//! - `command`: Parsed ledger commands
//! - `error`: Error types for everything above the store

pub mod account;
pub mod command;
pub mod error;
pub mod outcome;

pub use account::{apply_delta, AccountBalance, AccountId};
pub use command::{CommandType, LedgerCommand};
pub use error::LedgerError;
pub use outcome::Outcome;
