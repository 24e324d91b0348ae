//! Character-by-character letter reveal.

use crate::core::scheduler::{Scheduler, Task, TaskHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    /// Nothing shown yet.
    Idle,
    /// Start delay pending.
    Waiting,
    /// Revealing one character per step.
    Typing,
    /// Full text shown.
    Complete,
}

/// Reveals `text` one Unicode scalar at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    char_count: usize,
    shown: usize,
    phase: TypewriterPhase,
    pending: Option<TaskHandle>,
    start_delay_ms: u32,
    step_ms: u32,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, start_delay_ms: u32, step_ms: u32) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            shown: 0,
            phase: if char_count == 0 {
                TypewriterPhase::Complete
            } else {
                TypewriterPhase::Idle
            },
            pending: None,
            start_delay_ms,
            step_ms,
        }
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    /// The revealed prefix of the letter.
    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }

    /// The letter section came into view. Schedules the start delay when
    /// idle; does nothing while waiting, typing or complete.
    pub fn begin(&mut self, scheduler: &mut impl Scheduler) -> bool {
        if self.phase != TypewriterPhase::Idle {
            return false;
        }
        self.pending = Some(scheduler.set_timeout(Task::LetterStart, self.start_delay_ms));
        self.phase = TypewriterPhase::Waiting;
        true
    }

    /// Start delay elapsed: clear the text and begin typing.
    pub fn on_start(&mut self, scheduler: &mut impl Scheduler) -> Option<&str> {
        if self.phase != TypewriterPhase::Waiting {
            return None;
        }
        self.type_from_zero(scheduler);
        Some(self.visible())
    }

    /// Reveal the next character.
    pub fn on_step(&mut self, scheduler: &mut impl Scheduler) -> Option<&str> {
        if self.phase != TypewriterPhase::Typing {
            return None;
        }
        self.shown = (self.shown + 1).min(self.char_count);
        if self.shown == self.char_count {
            self.pending = None;
            self.phase = TypewriterPhase::Complete;
        } else {
            self.pending = Some(scheduler.set_timeout(Task::LetterStep, self.step_ms));
        }
        Some(self.visible())
    }

    /// Cancel whatever is in flight and type again from the first character.
    pub fn restart(&mut self, scheduler: &mut impl Scheduler) -> &str {
        self.cancel(scheduler);
        self.type_from_zero(scheduler);
        self.visible()
    }

    /// Drop any pending start or step without changing the visible text.
    pub fn cancel(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        match self.phase {
            TypewriterPhase::Waiting => self.phase = TypewriterPhase::Idle,
            TypewriterPhase::Typing if self.shown == 0 => self.phase = TypewriterPhase::Idle,
            // A half-typed letter stays where it is; `begin` will not resume it.
            TypewriterPhase::Typing => self.phase = TypewriterPhase::Complete,
            _ => {}
        }
    }

    fn type_from_zero(&mut self, scheduler: &mut impl Scheduler) {
        self.shown = 0;
        if self.char_count == 0 {
            self.pending = None;
            self.phase = TypewriterPhase::Complete;
            return;
        }
        self.pending = Some(scheduler.set_timeout(Task::LetterStep, self.step_ms));
        self.phase = TypewriterPhase::Typing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::ManualScheduler;

    fn drain(tw: &mut Typewriter, s: &mut ManualScheduler, until: f64) -> Vec<String> {
        let mut frames = Vec::new();
        while let Some(task) = s.pop_due(until) {
            let text = match task {
                Task::LetterStart => tw.on_start(s).map(str::to_string),
                Task::LetterStep => tw.on_step(s).map(str::to_string),
                other => panic!("unexpected task {:?}", other),
            };
            frames.extend(text);
        }
        frames
    }

    #[test]
    fn types_after_start_delay_at_step_rate() {
        let mut s = ManualScheduler::new(0.0);
        let mut tw = Typewriter::new("你好!", 100, 80);
        assert!(tw.begin(&mut s));

        assert_eq!(drain(&mut tw, &mut s, 99.0), Vec::<String>::new());
        assert_eq!(drain(&mut tw, &mut s, 100.0), vec![""]);
        assert_eq!(drain(&mut tw, &mut s, 179.0), Vec::<String>::new());
        assert_eq!(drain(&mut tw, &mut s, 180.0), vec!["你"]);
        assert_eq!(drain(&mut tw, &mut s, 340.0), vec!["你好", "你好!"]);
        assert_eq!(tw.phase(), TypewriterPhase::Complete);
        assert_eq!(s.pending_len(), 0);
    }

    #[test]
    fn begin_is_noop_while_running_or_complete() {
        let mut s = ManualScheduler::new(0.0);
        let mut tw = Typewriter::new("ab", 100, 80);
        assert!(tw.begin(&mut s));
        assert!(!tw.begin(&mut s));
        drain(&mut tw, &mut s, 150.0);
        assert!(!tw.begin(&mut s));
        drain(&mut tw, &mut s, 10_000.0);
        assert_eq!(tw.visible(), "ab");
        assert!(!tw.begin(&mut s));
        assert_eq!(s.pending_len(), 0);
    }

    #[test]
    fn restart_cancels_and_replays() {
        let mut s = ManualScheduler::new(0.0);
        let mut tw = Typewriter::new("abcd", 100, 80);
        tw.begin(&mut s);
        drain(&mut tw, &mut s, 260.0);
        assert_eq!(tw.visible(), "ab");

        assert_eq!(tw.restart(&mut s), "");
        assert_eq!(s.pending_len(), 1);
        assert_eq!(drain(&mut tw, &mut s, 340.0), vec!["a"]);
        assert_eq!(drain(&mut tw, &mut s, 10_000.0), vec!["ab", "abc", "abcd"]);
    }

    #[test]
    fn restart_during_start_delay_drops_the_delay() {
        let mut s = ManualScheduler::new(0.0);
        let mut tw = Typewriter::new("xy", 100, 80);
        tw.begin(&mut s);
        tw.restart(&mut s);
        assert!(!s.is_pending(Task::LetterStart));
        assert_eq!(drain(&mut tw, &mut s, 80.0), vec!["x"]);
    }

    #[test]
    fn empty_letter_never_schedules() {
        let mut s = ManualScheduler::new(0.0);
        let mut tw = Typewriter::new("", 100, 80);
        assert!(!tw.begin(&mut s));
        assert_eq!(tw.restart(&mut s), "");
        assert_eq!(s.pending_len(), 0);
    }

    #[test]
    fn stale_tasks_are_ignored() {
        let mut s = ManualScheduler::new(0.0);
        let mut tw = Typewriter::new("ab", 100, 80);
        assert_eq!(tw.on_start(&mut s), None);
        assert_eq!(tw.on_step(&mut s), None);
        assert_eq!(s.pending_len(), 0);
    }
}
