//! Id generation. Only uniqueness within the process lifetime is required.

use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies unique ids on demand.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh id, e.g. `company-3f2a...`.
    fn next_id(&self, prefix: &str) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", uuid::Uuid::new_v4())
    }
}

/// Deterministic counter ids (`company-1`, `comm-2`, ...). Used in tests.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{n}")
    }
}
