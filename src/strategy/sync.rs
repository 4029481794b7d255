//! Synchronous processing strategy
//!
//! Applies commands one at a time, in file order, on the calling thread.
//! Results are fully deterministic, which makes this the reference against
//! which the async strategy is compared in tests.
//!
//! `balance` rows never change state. The value read is logged at `info`
//! level, and a row naming an unknown account is counted as rejected.

use crate::cli::StoreKind;
use crate::core::{create_store, CommandEngine, CommandOutput};
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    store: StoreKind,
}

impl SyncProcessingStrategy {
    pub fn new(store: StoreKind) -> Self {
        Self { store }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let engine = CommandEngine::new(create_store(self.store));
        let reader = SyncReader::new(input_path)?;
        info!(store = ?self.store, input = %input_path.display(), "processing commands");

        let mut processed = 0usize;
        let mut reads = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            match result.and_then(|command| engine.process(command)) {
                Ok(CommandOutput::Balance(..)) => {
                    processed += 1;
                    reads += 1;
                }
                Ok(_) => processed += 1,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    rejected += 1;
                    warn!(error = %e, "command rejected");
                }
            }
        }

        info!(processed, reads, rejected, "processing finished");
        write_balances_csv(&engine.get_accounts(), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[rstest]
    fn test_sync_strategy_adjustment_scenario(
        #[values(StoreKind::Pessimistic, StoreKind::Optimistic)] store: StoreKind,
    ) {
        let file = create_temp_csv(
            "type,account,to,amount\n\
             create,,,\n\
             adjust,1,,12.34\n\
             adjust,1,,12.34\n\
             adjust,1,,-12.34\n\
             adjust,1,,-100.00\n",
        );
        let mut output = Vec::new();

        SyncProcessingStrategy::new(store)
            .process(file.path(), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "account,balance\n1,12.34\n");
    }

    #[rstest]
    fn test_sync_strategy_balance_rows_only_read(
        #[values(StoreKind::Pessimistic, StoreKind::Optimistic)] store: StoreKind,
    ) {
        let file = create_temp_csv(
            "type,account,to,amount\n\
             create,,,\n\
             balance,1,,\n\
             adjust,1,,3.50\n\
             balance,1,,\n\
             balance,2,,\n\
             balance,1,,\n",
        );
        let mut output = Vec::new();

        SyncProcessingStrategy::new(store)
            .process(file.path(), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "account,balance\n1,3.50\n");
    }

    #[rstest]
    fn test_sync_strategy_handles_missing_file(
        #[values(StoreKind::Pessimistic, StoreKind::Optimistic)] store: StoreKind,
    ) {
        let mut output = Vec::new();
        let result = SyncProcessingStrategy::new(store).process(Path::new("nonexistent.csv"), &mut output);
        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
        assert!(output.is_empty());
    }
}
