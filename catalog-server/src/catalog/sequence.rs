//! Query sequencing
//!
//! Listing requests can overlap when a user changes filters faster than
//! results return. Each request takes a ticket; only the response whose
//! ticket is still the latest may be applied. Earlier responses that
//! arrive late are discarded, never merged.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic ticket dispenser for catalog queries
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: AtomicU64,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a new query, superseding all earlier ones
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the ticket still belongs to the latest query
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let seq = QuerySequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));

        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
