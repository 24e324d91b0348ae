//! One-way reveal flags for sections and timeline items.

use crate::api::types::Rect;

/// Monotonic reveal state: flags only ever go from hidden to revealed.
#[derive(Debug, Clone, Default)]
pub struct RevealState {
    sections: Vec<bool>,
    items: Vec<bool>,
    current: usize,
}

impl RevealState {
    pub fn new(section_count: usize, item_count: usize) -> Self {
        Self {
            sections: vec![false; section_count],
            items: vec![false; item_count],
            current: 0,
        }
    }

    /// A section became visible: it becomes the current section and is
    /// revealed. Returns true only on the first reveal.
    pub fn section_visible(&mut self, index: usize) -> bool {
        match self.sections.get_mut(index) {
            Some(flag) => {
                self.current = index;
                !std::mem::replace(flag, true)
            }
            None => false,
        }
    }

    /// Startup variant of [`section_visible`](Self::section_visible): already
    /// revealed sections are skipped entirely and keep the current index.
    pub fn section_on_screen_at_load(&mut self, index: usize) -> bool {
        match self.sections.get(index) {
            Some(false) => self.section_visible(index),
            _ => false,
        }
    }

    /// A timeline item became visible. Returns true the first time only,
    /// after which the host may stop observing it.
    pub fn item_visible(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(flag) => !std::mem::replace(flag, true),
            None => false,
        }
    }

    pub fn is_section_revealed(&self, index: usize) -> bool {
        self.sections.get(index).copied().unwrap_or(false)
    }

    pub fn is_item_revealed(&self, index: usize) -> bool {
        self.items.get(index).copied().unwrap_or(false)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Move the current index. Out-of-range targets are ignored.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.sections.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

/// Whether a section already occupies the top half of the viewport.
pub fn on_screen_at_load(rect: Rect, viewport_height: f64) -> bool {
    rect.top < viewport_height * 0.5 && rect.bottom > 0.0
}
