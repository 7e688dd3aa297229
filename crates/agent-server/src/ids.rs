//! Identifier Generation
//!
//! Correlation identifiers are minted through an injected capability rather
//! than ad hoc wall-clock reads, so the adapter stays deterministic under
//! test while production keeps the legacy `task-<millis>` shape.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Capability for minting prefixed identifiers ("task", "context", "msg",
/// "artifact"). Implementations must be safe to share across requests.
pub trait IdGenerator: Send + Sync {
    fn generate(&self, prefix: &str) -> String;
}

/// Wall-clock generator producing `<prefix>-<unix millis>-<seq>`.
///
/// The sequence suffix keeps ids minted within the same millisecond (the two
/// artifact ids of one response, say) distinct; uniqueness is still never
/// validated anywhere.
#[derive(Debug, Default)]
pub struct ClockIdGenerator {
    seq: AtomicU64,
}

impl ClockIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for ClockIdGenerator {
    fn generate(&self, prefix: &str) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), seq)
    }
}

/// Counter-based generator producing `<prefix>-1`, `<prefix>-2`, ... across
/// all prefixes. Deterministic; meant for tests.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    seq: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self, prefix: &str) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", prefix, seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ids_carry_prefix_and_stay_distinct() {
        let ids = ClockIdGenerator::new();
        let a = ids.generate("task");
        let b = ids.generate("task");
        assert!(a.starts_with("task-"));
        assert_ne!(a, b);
    }

    #[test]
    fn sequential_ids_are_deterministic() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.generate("msg"), "msg-1");
        assert_eq!(ids.generate("task"), "task-2");
    }
}
