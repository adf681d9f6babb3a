//! Discrete-event emulated clock.
//!
//! [`EventClock`] is the reference [`EmulatedClock`]: a time-ordered queue
//! of pending task firings. Running the clock pops the earliest firing,
//! jumps emulated time to it and hands it to the caller's handler, which may
//! schedule more work (including re-arming the task that just fired).
//! Firings due at the same instant run in the order they were scheduled.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::warn;

use crate::app::ports::EmulatedClock;
use crate::scheduler::TaskId;

/// A scheduled firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    at_ms: u64,
    /// Insertion sequence, tie-break for equal times.
    seq: u64,
    task: TaskId,
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at_ms, self.seq).cmp(&(other.at_ms, other.seq))
    }
}

/// Emulated clock driven by a min-heap of pending firings.
#[derive(Debug, Default)]
pub struct EventClock {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<Pending>>,
}

impl EventClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire everything due at or before `until_ms`, in time order, then leave
    /// the clock at `until_ms`. Returns the number of firings delivered.
    pub fn run_until(&mut self, until_ms: u64, mut on_fire: impl FnMut(&mut Self, TaskId)) -> usize {
        let mut fired = 0;
        while let Some(task) = self.pop_due(until_ms) {
            on_fire(self, task);
            fired += 1;
        }
        self.now_ms = self.now_ms.max(until_ms);
        fired
    }

    /// Fire only the next pending task, advancing time to it.
    pub fn step(&mut self, on_fire: impl FnOnce(&mut Self, TaskId)) -> bool {
        match self.pop_due(u64::MAX) {
            Some(task) => {
                on_fire(self, task);
                true
            }
            None => false,
        }
    }

    /// Number of firings waiting in the queue.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Time of the earliest pending firing.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(p)| p.at_ms)
    }

    fn pop_due(&mut self, until_ms: u64) -> Option<TaskId> {
        if self.next_due()? > until_ms {
            return None;
        }
        let Reverse(p) = self.queue.pop()?;
        self.now_ms = p.at_ms;
        Some(p.task)
    }
}

impl EmulatedClock for EventClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_at(&mut self, at_ms: u64, task: TaskId) {
        let at_ms = if at_ms < self.now_ms {
            warn!(
                "EventClock: task {} scheduled in the past ({} < {} ms), firing now",
                task.0, at_ms, self.now_ms
            );
            self.now_ms
        } else {
            at_ms
        };
        self.queue.push(Reverse(Pending {
            at_ms,
            seq: self.seq,
            task,
        }));
        self.seq += 1;
    }
}
