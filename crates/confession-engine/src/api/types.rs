/// What the host found in the document at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// `id` attribute of every section, in document order (empty if none).
    pub section_ids: Vec<String>,
    /// Number of timeline items.
    pub timeline_items: usize,
    /// Full letter text, if the letter element exists.
    pub letter_text: Option<String>,
}

impl PageLayout {
    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.section_ids.iter().position(|s| s == id)
    }
}

/// Text nodes the controller writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Letter,
    Acquainted,
    Together,
    GentleNote,
    CelebrationDate,
}

/// Viewport-relative vertical extent of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

/// Background music could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// No audio element on the page.
    #[error("no audio element")]
    Missing,
    /// The host refused playback (usually autoplay policy).
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// Every document side effect the page controller performs.
///
/// Implementations must tolerate missing elements by doing nothing.
pub trait PageView {
    fn set_text(&mut self, slot: TextSlot, text: &str);

    /// Add the revealed styling to a section.
    fn reveal_section(&mut self, index: usize);

    /// Add the revealed styling to a timeline item.
    fn reveal_timeline_item(&mut self, index: usize);

    /// Stop watching a timeline item's visibility.
    fn unobserve_timeline_item(&mut self, index: usize);

    /// Stagger a timeline item's reveal transition.
    fn set_timeline_delay(&mut self, index: usize, delay_secs: f32);

    /// Smooth-scroll a section to the top of the viewport.
    fn scroll_to_section(&mut self, index: usize);

    /// Smooth-scroll the window to the very top.
    fn scroll_to_top(&mut self);

    fn set_overlay_visible(&mut self, visible: bool);

    /// Restart background music from the beginning at `volume`.
    /// Asynchronous rejection is the host's to report.
    fn play_audio(&mut self, volume: f64) -> Result<(), AudioError>;

    fn section_rect(&self, index: usize) -> Option<Rect>;

    fn viewport_height(&self) -> f64;

    /// Match the canvas backing store to its displayed size and return that
    /// size in CSS pixels, or `None` without a canvas.
    fn resize_canvas(&mut self) -> Option<[f32; 2]>;

    fn clear_canvas(&mut self);

    /// Draw one frame of sparks. `floats` is the packed instance buffer,
    /// `ParticleInstance::FLOATS` values per spark.
    fn draw_particles(&mut self, floats: &[f32]);
}
