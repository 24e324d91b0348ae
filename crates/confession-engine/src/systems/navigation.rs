//! Wheel-driven section-to-section navigation.

use crate::core::scheduler::{Scheduler, Task, TaskHandle};
use crate::input::event::WheelOutcome;

/// Snapshot of everything a wheel decision depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub delta_y: f64,
    pub current: usize,
    pub section_count: usize,
    pub celebrating: bool,
    /// Bottom edge of the timeline section when it is the current section.
    pub timeline_bottom: Option<f64>,
    pub viewport_height: f64,
}

/// Wheel navigation with a cooldown lock.
#[derive(Debug, Clone)]
pub struct WheelNav {
    threshold: f64,
    lock_ms: u32,
    bottom_tolerance: f64,
    unlock: Option<TaskHandle>,
}

impl WheelNav {
    pub fn new(threshold: f64, lock_ms: u32, bottom_tolerance: f64) -> Self {
        Self {
            threshold,
            lock_ms,
            bottom_tolerance,
            unlock: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.unlock.is_some()
    }

    /// Decide what a wheel event does. Pure; see [`WheelNav::lock`].
    pub fn decide(&self, input: &WheelInput) -> WheelOutcome {
        if input.celebrating {
            return WheelOutcome::Ignored;
        }
        if self.is_locked() {
            return WheelOutcome::Suppressed;
        }
        if input.delta_y > 0.0 {
            if let Some(bottom) = input.timeline_bottom {
                // Scroll natively through the timeline until its end is in view.
                if bottom > input.viewport_height + self.bottom_tolerance {
                    return WheelOutcome::Native;
                }
            }
        }
        if input.delta_y.abs() < self.threshold {
            return WheelOutcome::Ignored;
        }
        let target = if input.delta_y > 0.0 {
            input.current.checked_add(1)
        } else {
            input.current.checked_sub(1)
        };
        match target {
            Some(t) if t < input.section_count => WheelOutcome::Jumped(t),
            _ => WheelOutcome::Ignored,
        }
    }

    /// Hold the lock for the cooldown period.
    pub fn lock(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(handle) = self.unlock.take() {
            scheduler.cancel(handle);
        }
        self.unlock = Some(scheduler.set_timeout(Task::WheelUnlock, self.lock_ms));
    }

    /// Cooldown elapsed.
    pub fn on_unlock(&mut self) {
        self.unlock = None;
    }

    pub fn cancel(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(handle) = self.unlock.take() {
            scheduler.cancel(handle);
        }
    }
}
