//! Recurring timed tasks on the emulated clock.
//!
//! A task is a plain descriptor (id, label, period, kind) registered with
//! the [`Scheduler`]. Arming hands the first due time to the
//! [`EmulatedClock`]; when the clock fires the task, [`Scheduler::fire`]
//! notifies the [`SchedulerDelegate`] and schedules the next due time before
//! returning to the clock.
//!
//! ```text
//!  EmulatedClock ──fire(id)──▶ Scheduler ──on_task_fired──▶ Delegate
//!        ▲                        │
//!        └────schedule_at(due+period)
//! ```
//!
//! The next due time is computed from the previous due time, not from the
//! moment the handler ran, so periods never accumulate drift, even when the
//! clock delivers a firing late.

use log::{debug, info};

use crate::app::ports::{EmulatedClock, SchedulerDelegate, TaskKind};

/// Maximum number of recurring tasks (stack-allocated).
const MAX_TASKS: usize = 4;

/// Handle the clock carries back to the scheduler when a task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u16);

/// Descriptor of a recurring task.
#[derive(Debug, Clone)]
pub struct RecurringTask {
    /// Human-readable label (e.g., "heartbeat").
    pub label: &'static str,
    pub kind: TaskKind,
    /// Emulated milliseconds between firings.
    pub period_ms: u64,
}

/// Internal bookkeeping for a registered task.
#[derive(Debug, Clone)]
struct TaskEntry {
    task: RecurringTask,
    /// Emulated time of the next expected firing, `None` until armed.
    next_due_ms: Option<u64>,
    /// Emulated time the task was first armed.
    armed_at_ms: u64,
    firings: u64,
}

/// Table of recurring tasks, indexed by [`TaskId`].
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: heapless::Vec<TaskEntry, MAX_TASKS>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Returns its id, or `None` if the table is full.
    pub fn add(&mut self, task: RecurringTask) -> Option<TaskId> {
        let id = TaskId(self.tasks.len() as u16);
        let label = task.label;
        self.tasks
            .push(TaskEntry {
                task,
                next_due_ms: None,
                armed_at_ms: 0,
                firings: 0,
            })
            .ok()?;
        info!("Scheduler: added '{}' as task {}", label, id.0);
        Some(id)
    }

    /// Arm every task that is not armed yet, one period from now.
    pub fn arm_all(&mut self, clock: &mut impl EmulatedClock) {
        let now = clock.now_ms();
        for (i, entry) in self.tasks.iter_mut().enumerate() {
            if entry.next_due_ms.is_some() {
                continue;
            }
            let due = now.saturating_add(entry.task.period_ms);
            entry.armed_at_ms = now;
            entry.next_due_ms = Some(due);
            clock.schedule_at(due, TaskId(i as u16));
            info!(
                "Scheduler: armed '{}' every {} ms (first at {} ms)",
                entry.task.label, entry.task.period_ms, due
            );
        }
    }

    /// Handle a firing delivered by the clock.
    ///
    /// Any firing at or after the task's due time counts. The delegate is
    /// told the time the firing actually ran; the next due time still steps
    /// from the previous due time, skipping whole periods already behind
    /// `now`, and is scheduled before returning. Returns `false` for unknown
    /// ids, unarmed tasks and early firings; those are dropped.
    pub fn fire(
        &mut self,
        id: TaskId,
        clock: &mut impl EmulatedClock,
        delegate: &mut dyn SchedulerDelegate,
    ) -> bool {
        let Some(entry) = self.tasks.get_mut(id.0 as usize) else {
            debug!("Scheduler: firing for unknown task {}", id.0);
            return false;
        };
        let now = clock.now_ms();
        let Some(due) = entry.next_due_ms.filter(|&due| due <= now) else {
            debug!(
                "Scheduler: stale firing of '{}' at {} ms (due {:?})",
                entry.task.label, now, entry.next_due_ms
            );
            return false;
        };

        entry.firings += 1;
        delegate.on_task_fired(entry.task.label, entry.task.kind, now, entry.firings);

        let period = entry.task.period_ms;
        let mut next = due.saturating_add(period);
        if period > 0 && next <= now {
            let missed = (now - next) / period + 1;
            debug!(
                "Scheduler: '{}' ran {} ms late, skipping {} period(s)",
                entry.task.label,
                now - due,
                missed
            );
            next = next.saturating_add(missed.saturating_mul(period));
        }
        entry.next_due_ms = Some(next);
        clock.schedule_at(next, id);
        true
    }

    /// Firings so far of task `id`.
    pub fn firings(&self, id: TaskId) -> u64 {
        self.tasks.get(id.0 as usize).map_or(0, |e| e.firings)
    }

    /// Next due time of task `id`, if armed.
    pub fn next_due(&self, id: TaskId) -> Option<u64> {
        self.tasks.get(id.0 as usize).and_then(|e| e.next_due_ms)
    }

    /// Emulated time task `id` was armed at.
    pub fn armed_at(&self, id: TaskId) -> Option<u64> {
        self.tasks
            .get(id.0 as usize)
            .filter(|e| e.next_due_ms.is_some())
            .map(|e| e.armed_at_ms)
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
