use std::sync::atomic::{AtomicU64, Ordering};

use tourguard_application::IdGenerator;
use tourguard_core::{AppResult, RecordId};
use uuid::Uuid;

/// Mints `{prefix}-{uuid}` identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, prefix: &str) -> AppResult<RecordId> {
        RecordId::new(format!("{prefix}-{}", Uuid::new_v4().simple()))
    }
}

/// Mints `{prefix}-{n}` identifiers from a process-wide counter.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl SequentialIdGenerator {
    /// Creates a generator whose first identifier uses `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self, prefix: &str) -> AppResult<RecordId> {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        RecordId::new(format!("{prefix}-{value}"))
    }
}
