//! Monotonic job identifier allocation.
use std::sync::atomic::{AtomicU64, Ordering};

/// The first identifier handed out by a default sequence.
pub const FIRST_JOB_ID: u64 = 100;

static GLOBAL: IdSequence = IdSequence::starting_at(FIRST_JOB_ID);

/// Hands out strictly increasing job identifiers. Identifiers are never
/// reused, even once the job they were assigned to leaves its queue.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide sequence used by `PrintJob::new` and
    /// `PrintJob::processed`.
    pub fn global() -> &'static IdSequence {
        &GLOBAL
    }

    /// Allocates the next identifier.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the identifier the next call to `next_id` will hand out.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(FIRST_JOB_ID)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_sequence_starts_at_offset() {
        let ids = IdSequence::default();

        assert_eq!(ids.peek(), 100);
        assert_eq!(ids.next_id(), 100);
        assert_eq!(ids.next_id(), 101);
        assert_eq!(ids.peek(), 102);
    }

    #[test]
    fn test_global_is_monotonic() {
        let a = IdSequence::global().next_id();
        let b = IdSequence::global().next_id();

        assert!(a >= FIRST_JOB_ID);
        assert!(b > a);
    }

    #[test]
    fn test_sequence_is_unique_across_threads() {
        let ids = Arc::new(IdSequence::starting_at(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                thread::spawn(move || {
                    (0..250).map(|_| ids.next_id()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();

        assert_eq!(all.len(), 1000);
        assert_eq!(ids.peek(), 1000);
    }
}
