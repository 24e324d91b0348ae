//! Deferred work for the page controller.
//!
//! Every timer, interval and animation-frame callback the page needs is a
//! [`Task`]. The controller asks a [`Scheduler`] to run tasks later and the
//! host feeds them back through `PageController::on_task`. The browser host
//! maps these onto `setTimeout`/`setInterval`/`requestAnimationFrame`;
//! [`ManualScheduler`] runs them on a virtual clock.

use super::clock::{civil_from_days, days_from_civil, Clock, LocalStamp};

/// A unit of deferred page work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Typewriter start delay elapsed.
    LetterStart,
    /// Reveal the next letter character.
    LetterStep,
    /// Clear the reassurance note.
    HideNote,
    /// Release the wheel navigation lock.
    WheelUnlock,
    /// "Acquainted since" counter tick.
    AcquaintedTick,
    /// "Together since" counter tick.
    TogetherTick,
    /// Deferred initial visibility check (timeout).
    InitialCheck,
    /// Deferred initial visibility check (animation frame).
    InitialCheckFrame { again: bool },
    /// One fireworks animation frame.
    FireworksFrame,
}

/// Opaque handle used to cancel a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u32);

/// Timer facility the controller schedules against.
pub trait Scheduler: Clock {
    /// Run `task` once after `delay_ms`.
    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle;

    /// Run `task` every `period_ms` until cancelled.
    fn set_interval(&mut self, task: Task, period_ms: u32) -> TaskHandle;

    /// Run `task` before the next repaint.
    fn request_frame(&mut self, task: Task) -> TaskHandle;

    /// Cancel a pending task. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TaskHandle,
    task: Task,
    due_ms: f64,
    period_ms: Option<f64>,
}

/// Deterministic virtual-time scheduler.
///
/// Local time is treated as UTC. Animation frames fire every
/// [`ManualScheduler::FRAME_MS`].
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    now_ms: f64,
    next_handle: u32,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    pub const FRAME_MS: f64 = 16.0;

    /// Start the virtual clock at `start_ms` since the epoch.
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            next_handle: 1,
            pending: Vec::new(),
        }
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Number of tasks still waiting to fire.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether any pending entry carries `task`.
    pub fn is_pending(&self, task: Task) -> bool {
        self.pending.iter().any(|p| p.task == task)
    }

    /// Pop the earliest task due at or before `until_ms`, advancing the clock
    /// to its deadline. Intervals re-arm one period after their deadline.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<Task> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then(a.handle.0.cmp(&b.handle.0))
            })
            .map(|(i, _)| i)?;

        let due = self.pending[idx].due_ms;
        self.now_ms = self.now_ms.max(due);
        let task = self.pending[idx].task;
        match self.pending[idx].period_ms {
            Some(period) => self.pending[idx].due_ms = due + period,
            None => {
                self.pending.remove(idx);
            }
        }
        Some(task)
    }

    fn push(&mut self, task: Task, delay_ms: f64, period_ms: Option<f64>) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Pending {
            handle,
            task,
            due_ms: self.now_ms + delay_ms,
            period_ms,
        });
        handle
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn to_local(&self, epoch_ms: f64) -> LocalStamp {
        let secs = (epoch_ms / 1000.0).floor() as i64;
        let days = secs.div_euclid(86_400);
        let rem = secs.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);
        LocalStamp::new(
            year,
            month,
            day,
            (rem / 3_600) as u32,
            ((rem % 3_600) / 60) as u32,
            (rem % 60) as u32,
        )
    }

    fn from_local(&self, stamp: &LocalStamp) -> f64 {
        let days = days_from_civil(stamp.year, stamp.month, stamp.day);
        let secs = days * 86_400
            + stamp.hour as i64 * 3_600
            + stamp.minute as i64 * 60
            + stamp.second as i64;
        secs as f64 * 1000.0
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle {
        self.push(task, delay_ms as f64, None)
    }

    fn set_interval(&mut self, task: Task, period_ms: u32) -> TaskHandle {
        // A zero period would never let the clock advance.
        let period = (period_ms as f64).max(1.0);
        self.push(task, period, Some(period))
    }

    fn request_frame(&mut self, task: Task) -> TaskHandle {
        self.push(task, Self::FRAME_MS, None)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}
