//! Ledger Store CLI
//!
//! Command-line interface for applying ledger commands from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --store pessimistic --strategy sync commands.csv > balances.csv
//! cargo run -- --store optimistic --strategy async --batch-size 2000 --max-concurrent 8 commands.csv
//! RUST_LOG=debug cargo run -- commands.csv
//! ```
//!
//! The program applies every command in the input file to a fresh in-memory
//! ledger and prints the final balances to stdout. Rejected commands are
//! logged to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use ledger_store::cli;
use ledger_store::strategy;
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    cli::init_logging();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, args.store, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
