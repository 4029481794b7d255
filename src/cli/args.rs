use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply account commands to an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-store")]
#[command(about = "Apply account commands to an in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Concurrency strategy of the account store
    #[arg(
        long = "store",
        value_name = "STORE",
        default_value = "optimistic",
        help = "Account store: 'pessimistic' (ordered locks) or 'optimistic' (compare-and-swap)"
    )]
    pub store: StoreKind,

    /// Processing strategy for the command file
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for file order or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available account store implementations
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Pessimistic,
    Optimistic,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults. Zero values are replaced by
    /// the defaults with a warning (see `BatchConfig::new`).
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        match (self.batch_size, self.max_concurrent_batches) {
            (None, None) => default,
            (batch_size, workers) => BatchConfig::new(
                batch_size.unwrap_or(default.batch_size),
                workers.unwrap_or(default.max_concurrent_batches),
            ),
        }
    }
}
