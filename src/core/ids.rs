//! Account handle allocation

use crate::types::AccountId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic handle generator
///
/// The first handle is 1. Every call returns a handle no other call has
/// returned, including under concurrent use.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> AccountId {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}
