//! Timer abstraction for the round
//!
//! The round never owns a timer. It asks a [`Scheduler`] for repeating or
//! one-shot tasks and is handed each firing through `Round::on_task`. The
//! browser maps tasks onto setInterval / setTimeout / requestAnimationFrame;
//! [`SimScheduler`] steps simulated time for tests and headless runs.

use crate::Params;

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u32);

/// Work the round schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    CountdownTick,
    RoundTimerTick,
    PourFrame,
    FeedbackDone,
}

/// How often a repeating task fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Once per display frame
    Frame,
    /// Fixed period in milliseconds
    Every(f64),
}

pub trait Scheduler {
    /// Register a repeating task
    fn repeat(&mut self, task: Task, cadence: Cadence) -> TaskId;
    /// Register a one-shot task after `delay_ms`
    fn once(&mut self, task: Task, delay_ms: f64) -> TaskId;
    /// Cancel a task. Unknown or already finished ids are ignored.
    fn cancel(&mut self, id: TaskId);
}

#[derive(Debug, Clone)]
struct Pending {
    id: TaskId,
    task: Task,
    due_ms: f64,
    period_ms: Option<f64>,
}

/// Deterministic scheduler driven by simulated time
#[derive(Debug, Clone)]
pub struct SimScheduler {
    now_ms: f64,
    frame_ms: f64,
    next_id: u32,
    pending: Vec<Pending>,
}

impl Default for SimScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SimScheduler {
    pub fn new() -> Self {
        Self::with_frame_ms(Params::FRAME_MS)
    }

    /// Use a custom frame period for `Cadence::Frame`
    pub fn with_frame_ms(frame_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_ms,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of live tasks
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_scheduled(&self, task: Task) -> bool {
        self.pending.iter().any(|p| p.task == task)
    }

    /// Pop the earliest task due at or before `until_ms` and move the clock
    /// to its due time. Ties fire in registration order.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(Task, f64)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(idx, _)| idx)?;

        let Pending {
            task,
            due_ms: at,
            period_ms,
            ..
        } = self.pending[idx];
        self.now_ms = self.now_ms.max(at);

        match period_ms {
            Some(period) => self.pending[idx].due_ms += period,
            None => {
                self.pending.remove(idx);
            }
        }
        Some((task, at))
    }

    /// Fire everything due up to `until_ms`, in time order. The callback may
    /// schedule or cancel tasks.
    pub fn run_until<F>(&mut self, until_ms: f64, mut on_fire: F)
    where
        F: FnMut(&mut Self, Task, f64),
    {
        while let Some((task, at)) = self.pop_due(until_ms) {
            on_fire(self, task, at);
        }
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn push(&mut self, task: Task, delay_ms: f64, period_ms: Option<f64>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            task,
            due_ms: self.now_ms + delay_ms.max(0.0),
            period_ms,
        });
        id
    }
}

impl Scheduler for SimScheduler {
    fn repeat(&mut self, task: Task, cadence: Cadence) -> TaskId {
        let period = match cadence {
            Cadence::Frame => self.frame_ms,
            Cadence::Every(ms) => ms,
        }
        .max(f64::EPSILON);
        self.push(task, period, Some(period))
    }

    fn once(&mut self, task: Task, delay_ms: f64) -> TaskId {
        self.push(task, delay_ms, None)
    }

    fn cancel(&mut self, id: TaskId) {
        self.pending.retain(|p| p.id != id);
    }
}
