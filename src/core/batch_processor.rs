//! Concurrent batch processing of ledger commands
//!
//! This module provides the `BatchProcessor`, which runs a batch of commands
//! against a shared store from many tokio tasks at once. This is where the
//! stores' concurrency guarantees are actually exercised.
//!
//! # Ordering
//!
//! - `Create` commands are barriers. All work queued before a create finishes
//!   before the create runs, so handles are issued in file order and a
//!   command after a create can always see the new account.
//! - Between barriers, commands are grouped by the accounts they touch. A
//!   transfer links its sender and receiver into one group, and groups are
//!   closed over chains of transfers. Each group runs in file order on its
//!   own task; groups run concurrently.
//! - Commands in different groups share no account, so the final balances
//!   and every command's outcome match applying the batch in file order.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── CommandEngine
//!             └── Arc<dyn LedgerStore>  (pessimistic or optimistic)
//! ```

use std::collections::HashMap;

use super::engine::{CommandEngine, CommandOutput};
use crate::types::{AccountId, CommandType, LedgerCommand, LedgerError};
use tracing::{error, warn};

/// Result of processing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub command: LedgerCommand,

    /// The result of processing (output or error)
    pub result: Result<CommandOutput, LedgerError>,
}

/// Disjoint sets of accounts, joined by the transfers between them
#[derive(Debug, Default)]
struct AccountGroups {
    parent: HashMap<AccountId, AccountId>,
}

impl AccountGroups {
    /// Representative of the group containing `account`
    fn find(&mut self, account: AccountId) -> AccountId {
        let mut root = account;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }
        self.parent.entry(root).or_insert(root);

        // Path compression
        let mut current = account;
        while current != root {
            let next = self.parent.get(&current).copied().unwrap_or(root);
            self.parent.insert(current, root);
            current = next;
        }
        root
    }

    fn union(&mut self, a: AccountId, b: AccountId) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (low, high) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent.insert(high, low);
        }
    }
}

/// Batch processor with account-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: CommandEngine,
}

impl BatchProcessor {
    pub fn new(engine: CommandEngine) -> Self {
        Self { engine }
    }

    /// Partition commands into groups of connected accounts
    ///
    /// Each command appears in exactly one partition, and commands within a
    /// partition keep their original order. Two commands land in the same
    /// partition whenever they touch a common account, directly or through a
    /// chain of transfers. Partitions are keyed by a representative account.
    /// `Create` commands are not expected here; they are handled as barriers
    /// by `process_batch`.
    pub fn partition_by_account(
        &self,
        commands: Vec<LedgerCommand>,
    ) -> HashMap<AccountId, Vec<LedgerCommand>> {
        let mut groups = AccountGroups::default();
        for command in &commands {
            if let [first, rest @ ..] = command.touched_accounts().as_slice() {
                for other in rest {
                    groups.union(*first, *other);
                }
            }
        }

        let mut partitions: HashMap<AccountId, Vec<LedgerCommand>> = HashMap::new();
        for command in commands {
            let key = command
                .primary_account()
                .map(|account| groups.find(account))
                .unwrap_or_default();
            partitions.entry(key).or_default().push(command);
        }

        partitions
    }

    /// Process one partition's commands in order
    ///
    /// Errors are captured per command and never stop the partition.
    pub fn process_partition(&self, commands: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        commands
            .into_iter()
            .map(|command| {
                let result = self.engine.process(command.clone());
                if let Err(e) = &result {
                    warn!(?command, error = %e, "command rejected");
                }
                ProcessingResult { command, result }
            })
            .collect()
    }

    /// Run partitions concurrently and wait for all of them
    async fn process_segment(&self, segment: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        if segment.is_empty() {
            return Vec::new();
        }

        let mut tasks = Vec::new();
        for (_account, commands) in self.partition_by_account(segment) {
            let processor = self.clone();
            tasks.push(tokio::spawn(
                async move { processor.process_partition(commands) },
            ));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(partition_results) => results.extend(partition_results),
                Err(e) => error!(error = %e, "partition task failed"),
            }
        }

        results
    }

    /// Process a batch of commands
    ///
    /// Results of commands between two creates may come back in any order.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(batch.len());
        let mut segment = Vec::new();

        for command in batch {
            if command.command_type() == CommandType::Create {
                let pending = std::mem::take(&mut segment);
                results.extend(self.process_segment(pending).await);
                results.extend(self.process_partition(vec![command]));
            } else {
                segment.push(command);
            }
        }
        results.extend(self.process_segment(segment).await);

        results
    }
}
