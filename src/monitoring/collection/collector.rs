/*!
 * Event Collector
 * Bounded journal of simulator events
 */

use crate::core::limits::DEFAULT_EVENT_CAPACITY;
use crate::monitoring::events::Event;
use crossbeam_queue::ArrayQueue;

/// Keeps the most recent events, dropping the oldest once full
#[derive(Debug)]
pub struct Collector {
    /// Event ring (bounded)
    queue: ArrayQueue<Event>,
    next_sequence: u64,
    dropped: u64,
}

impl Collector {
    /// Create a collector with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            next_sequence: 1,
            dropped: 0,
        }
    }

    /// Record an event, stamping its sequence number
    pub fn emit(&mut self, event: impl Into<Event>) {
        let mut event = event.into();
        event.sequence = self.next_sequence;
        self.next_sequence += 1;

        if self.queue.force_push(event).is_some() {
            self.dropped += 1;
        }
    }

    /// Take every retained event, oldest first
    pub fn drain(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.queue.pop()).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Events discarded because the journal was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
