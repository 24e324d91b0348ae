use crate::core::scheduler::Task;

/// Clickable controls on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// "Yes": enter the celebration.
    Accept,
    /// "Let me think": show the reassurance note.
    Hesitate,
    /// Replay the letter from the first character.
    RestartLetter,
    BackToTop,
    /// Leave the celebration overlay and return to the timeline.
    BackToStory,
}

/// Everything the host can tell the page controller.
/// Indices refer to document order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// A section crossed its visibility threshold.
    SectionVisible(usize),
    /// A timeline item crossed its visibility threshold.
    TimelineItemVisible(usize),
    /// A wheel gesture on the page container.
    Wheel { delta_y: f64 },
    Click(Button),
    /// Document visibility flipped.
    VisibilityChanged { hidden: bool },
    /// Viewport resized.
    Resize,
    /// A scheduled task came due.
    Task(Task),
}

/// What the host should do with the native wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// Not handled; let the browser do its default.
    Ignored,
    /// Deliberately left to native scrolling (inside the timeline).
    Native,
    /// Swallowed while the wheel lock is held; call `preventDefault`.
    Suppressed,
    /// Jumped to this section; call `preventDefault`.
    Jumped(usize),
}

impl WheelOutcome {
    pub fn prevents_default(self) -> bool {
        matches!(self, WheelOutcome::Suppressed | WheelOutcome::Jumped(_))
    }
}
