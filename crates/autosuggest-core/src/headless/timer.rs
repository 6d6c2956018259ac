//! Virtual-clock timer queue for the headless document.
//!
//! Time only moves when [`HeadlessDocument::advance`](super::HeadlessDocument::advance)
//! drains due timers through [`TimerQueue::pop_due`] and [`TimerQueue::settle`],
//! so tests decide exactly when blur and debounce timers fire.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::SlotMap;

use crate::dom::{TimerCallback, TimerId};
use crate::logging::targets;

/// An entry in the timer queue (min-heap by fire time, FIFO among equals).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Duration,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Pending one-shot timers keyed by [`TimerId`].
pub(crate) struct TimerQueue {
    now: Duration,
    timers: SlotMap<TimerId, TimerCallback>,
    queue: BinaryHeap<TimerQueueEntry>,
    sequence: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `callback` to run `delay` from now.
    pub fn schedule(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = self.timers.insert(callback);
        self.sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: self.now + delay,
            sequence: self.sequence,
        });
        id
    }

    /// Cancel a timer. Returns `true` if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Pop the next timer due at or before `deadline`, moving the clock to its
    /// fire time. Cancelled entries are skipped.
    ///
    /// The caller runs the returned callback after releasing any borrow of the
    /// queue, since callbacks usually schedule or cancel timers themselves.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<(TimerId, TimerCallback)> {
        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > deadline {
                break;
            }
            self.queue.pop();

            let Some(callback) = self.timers.remove(entry.id) else {
                continue;
            };

            self.now = self.now.max(entry.fire_time);
            tracing::trace!(target: targets::HEADLESS, id = ?entry.id, now = ?self.now, "timer fired");
            return Some((entry.id, callback));
        }
        None
    }

    /// Move the clock forward to `deadline` once no more timers are due.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
