//! Ledger Store Library
//! # Overview
//!
//! This library keeps an in-memory ledger of monetary accounts and offers two
//! interchangeable concurrency strategies for it, plus a CSV-driven command
//! processor that exercises them.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Outcome, AccountId, LedgerCommand, errors)
//! - [`cli`] - CLI arguments parsing and logging setup
//! - [`core`] - The account stores and the components that drive them:
//!   - [`core::traits`] - The `LedgerStore` contract
//!   - [`core::pessimistic`] - Per-account locks taken in handle order
//!   - [`core::optimistic`] - Compare-and-swap retry loops, never blocking
//!   - [`core::engine`] - Command forwarding and outcome mapping
//!   - [`core::batch_processor`] - Concurrent batch execution
//! - [`io`] - CSV command input and balance output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Operations
//!
//! - **Create**: open a zero-balance account; handles start at 1
//! - **Balance**: read an account's balance
//! - **Adjust**: add a signed delta, rejected if the balance would go negative
//! - **Transfer**: move a positive amount between two accounts, all or nothing
//!
//! # Consistency
//!
//! Both stores guarantee that no balance is ever negative and no update is
//! lost. Only the pessimistic store makes a transfer atomic to concurrent
//! readers; the optimistic store may expose the debit before the credit.
//! Amounts are `rust_decimal::Decimal` throughout, never floating point.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use cli::StoreKind;
pub use crate::core::{
    create_store, CommandEngine, LedgerStore, OptimisticStore, PessimisticStore,
    TransferIsolation,
};
pub use io::write_balances_csv;
pub use types::{AccountBalance, AccountId, LedgerCommand, LedgerError, Outcome};
