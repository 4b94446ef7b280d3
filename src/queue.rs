//! A fixed-capacity, first-in-first-out queue of print jobs.
use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::job::PrintJob;
use crate::types::protocol::QueueStats;
use crate::types::states::SlotState;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue had no free slot. The job is handed back untouched.
    #[error("queue is full: all {capacity} slots are occupied")]
    Full {
        capacity: usize,
        rejected: Box<PrintJob>,
    },
}

impl QueueError {
    /// Recovers the job that couldn't be admitted.
    pub fn into_rejected(self) -> PrintJob {
        match self {
            Self::Full { rejected, .. } => *rejected,
        }
    }
}

/// Holds up to `capacity` jobs in arrival order.
///
/// Slots are numbered from the front: slot 0 holds the job the next
/// `dequeue_front` removes, and occupied slots always form a prefix of
/// `0..capacity`.
#[derive(Debug)]
pub struct JobQueue {
    slots: VecDeque<PrintJob>,
    capacity: usize,
    total_enqueued: u64,
    total_dequeued: u64,
    total_rejected: u64,
}

impl JobQueue {
    /// Creates an empty queue. A zero capacity is allowed; such a queue is
    /// both empty and full.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
            total_enqueued: 0,
            total_dequeued: 0,
            total_rejected: 0,
        }
    }

    /// Admits `job` into the first free slot, returning its identifier.
    pub fn enqueue(&mut self, job: PrintJob) -> Result<u64, QueueError> {
        if self.is_full() {
            self.total_rejected += 1;
            warn!(id = job.id(), capacity = self.capacity, "queue full");
            return Err(QueueError::Full {
                capacity: self.capacity,
                rejected: Box::new(job),
            });
        }

        let id = job.id();
        self.slots.push_back(job);
        self.total_enqueued += 1;
        debug!(id, slot = self.slots.len() - 1, "job queued");

        Ok(id)
    }

    /// Removes and returns the job at the front of the queue.
    pub fn dequeue_front(&mut self) -> Option<PrintJob> {
        let job = self.slots.pop_front()?;
        self.total_dequeued += 1;
        debug!(id = job.id(), remaining = self.slots.len(), "job dequeued");

        Some(job)
    }

    /// The job the next `dequeue_front` would return.
    pub fn front(&self) -> Option<&PrintJob> {
        self.slots.front()
    }

    /// Looks a job up by identifier.
    pub fn find(&self, id: u64) -> Option<&PrintJob> {
        self.slots.iter().find(|job| job.id() == id)
    }

    /// The job in slot `index`, if that slot is occupied.
    pub fn slot(&self, index: usize) -> Option<&PrintJob> {
        self.slots.get(index)
    }

    pub fn slot_states(&self) -> Vec<SlotState> {
        (0..self.capacity)
            .map(|i| match self.slots.get(i) {
                Some(job) => SlotState::Occupied { id: job.id() },
                None => SlotState::Empty,
            })
            .collect()
    }

    /// Jobs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &PrintJob> {
        self.slots.iter()
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            capacity: self.capacity,
            current_jobs: self.count(),
            free_slots: self.capacity - self.count(),
            full: self.is_full(),
            empty: self.is_empty(),
            total_enqueued: self.total_enqueued,
            total_dequeued: self.total_dequeued,
            total_rejected: self.total_rejected,
            slots: self.slot_states(),
        }
    }
}
