//! Interval-driven elapsed-time counters.

use crate::core::duration::format_duration;
use crate::core::scheduler::{Scheduler, Task, TaskHandle};

/// An elapsed-time display anchored at a fixed instant.
///
/// Every render recomputes from the anchor, so pausing and resuming never
/// skips or repeats a second relative to wall time.
#[derive(Debug, Clone)]
pub struct Counter {
    task: Task,
    prefix: String,
    period_ms: u32,
    anchor_ms: Option<f64>,
    handle: Option<TaskHandle>,
}

impl Counter {
    pub fn new(task: Task, prefix: impl Into<String>, period_ms: u32) -> Self {
        Self {
            task,
            prefix: prefix.into(),
            period_ms,
            anchor_ms: None,
            handle: None,
        }
    }

    pub fn anchor_ms(&self) -> Option<f64> {
        self.anchor_ms
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Anchor at `anchor_ms`, replace any running interval and return the
    /// text for right now.
    pub fn begin(&mut self, anchor_ms: f64, scheduler: &mut impl Scheduler) -> String {
        self.anchor_ms = Some(anchor_ms);
        self.schedule(scheduler);
        self.render(scheduler.now_ms()).unwrap_or_default()
    }

    /// Stop ticking; the anchor is kept.
    pub fn pause(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
    }

    /// Restart ticking if anchored and paused. Returns the text for right now.
    pub fn resume(&mut self, scheduler: &mut impl Scheduler) -> Option<String> {
        if self.anchor_ms.is_none() || self.handle.is_some() {
            return None;
        }
        self.schedule(scheduler);
        self.render(scheduler.now_ms())
    }

    /// Display text at `now_ms`, or `None` before the counter is anchored.
    pub fn render(&self, now_ms: f64) -> Option<String> {
        let anchor = self.anchor_ms?;
        let elapsed = (now_ms - anchor).floor() as i64;
        Some(format!("{}{}", self.prefix, format_duration(elapsed)))
    }

    fn schedule(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
        self.handle = Some(scheduler.set_interval(self.task, self.period_ms));
    }
}
