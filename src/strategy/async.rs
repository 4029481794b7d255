//! Asynchronous batch processing strategy
//!
//! Reads commands in batches and runs each batch through the
//! `BatchProcessor` on a tokio multi-threaded runtime, so many commands hit
//! the store at the same time.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (create barriers + account partitioning)
//!         └── CommandEngine
//!             └── Arc<dyn LedgerStore>
//! ```
//!
//! Batches are processed one after another; concurrency happens inside a
//! batch. See `core::batch_processor` for the ordering rules. `balance` rows
//! never change state; the value read is logged at `info` level.

use crate::cli::StoreKind;
use crate::core::{create_store, BatchProcessor, CommandEngine, CommandOutput};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_balances_csv;
use crate::strategy::ProcessingStrategy;
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by the defaults.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid worker count, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    store: StoreKind,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(store: StoreKind, config: BatchConfig) -> Self {
        Self { store, config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()?;

        runtime.block_on(async {
            let engine = CommandEngine::new(create_store(self.store));
            let processor = BatchProcessor::new(engine.clone());

            let file = tokio::fs::File::open(input_path).await.map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    LedgerError::file_not_found(&input_path.display().to_string())
                }
                _ => LedgerError::from(e),
            })?;
            info!(
                store = ?self.store,
                input = %input_path.display(),
                batch_size = self.config.batch_size,
                workers = self.config.max_concurrent_batches,
                "processing commands"
            );

            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut processed = 0usize;
            let mut reads = 0usize;
            let mut rejected = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await?;
                if batch.is_empty() {
                    break;
                }

                for result in processor.process_batch(batch).await {
                    match result.result {
                        Ok(CommandOutput::Balance(..)) => {
                            processed += 1;
                            reads += 1;
                        }
                        Ok(_) => processed += 1,
                        Err(_) => rejected += 1,
                    }
                }
            }

            info!(processed, reads, rejected, "processing finished");
            write_balances_csv(&engine.get_accounts(), output)
        })
    }
}
