//! Processing strategy module
//!
//! A processing strategy is a complete pipeline: read commands from a CSV
//! file, apply them to a fresh store, and write the final balances. Strategies
//! differ in how commands are scheduled; the store kind is chosen separately,
//! so every strategy works with every store.

use crate::cli::{StoreKind, StrategyType};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete command pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from input file and write balances to output
    ///
    /// Rejected commands and malformed rows are logged and skipped; they do
    /// not make this method fail.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The async runtime cannot be started
    /// - Output cannot be written
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError>;
}

/// Create a processing strategy
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    store: StoreKind,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(store)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(store, config))
        }
    }
}
