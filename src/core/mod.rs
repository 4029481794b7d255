//! Core ledger module
//!
//! This module contains the account store and everything that drives it:
//! - `traits` - The `LedgerStore` contract shared by both strategies
//! - `ids` - Account handle allocation
//! - `pessimistic` - Per-account locks acquired in handle order
//! - `optimistic` - Lock-free compare-and-swap updates
//! - `engine` - Command forwarding and outcome mapping
//! - `batch_processor` - Concurrent execution of command batches

pub mod batch_processor;
pub mod engine;
pub mod ids;
pub mod optimistic;
pub mod pessimistic;
pub mod traits;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::{CommandEngine, CommandOutput};
pub use ids::IdGenerator;
pub use optimistic::OptimisticStore;
pub use pessimistic::{lock_order, PessimisticStore};
pub use traits::{check_transfer, LedgerStore, TransferIsolation};

use crate::cli::StoreKind;
use std::sync::Arc;

/// Create an empty store of the requested kind
pub fn create_store(kind: StoreKind) -> Arc<dyn LedgerStore> {
    match kind {
        StoreKind::Pessimistic => Arc::new(PessimisticStore::new()),
        StoreKind::Optimistic => Arc::new(OptimisticStore::new()),
    }
}
