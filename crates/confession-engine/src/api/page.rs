use glam::Vec2;

use crate::api::config::PageConfig;
use crate::api::types::{AudioError, PageLayout, PageView, TextSlot};
use crate::core::clock::{format_celebration_date, Clock};
use crate::core::scheduler::{ManualScheduler, Scheduler, Task, TaskHandle};
use crate::input::event::{Button, PageEvent, WheelOutcome};
use crate::systems::counter::Counter;
use crate::systems::fireworks::FireworksState;
use crate::systems::navigation::{WheelInput, WheelNav};
use crate::systems::reveal::{on_screen_at_load, RevealState};
use crate::systems::typewriter::Typewriter;

/// Owns all mutable page state and reacts to host events.
///
/// The host implements [`PageView`] (document side effects) and
/// [`Scheduler`] (timers), then forwards every listener callback and every
/// due [`Task`] through [`PageController::handle`].
pub struct PageController<V: PageView, S: Scheduler> {
    config: PageConfig,
    layout: PageLayout,
    view: V,
    scheduler: S,
    reveal: RevealState,
    letter: Option<Typewriter>,
    letter_section: Option<usize>,
    timeline_section: Option<usize>,
    acquainted: Counter,
    together: Counter,
    wheel: WheelNav,
    /// Latched by the first accept; never cleared.
    celebrating: bool,
    fireworks: FireworksState,
    fireworks_frame: Option<TaskHandle>,
    note_timer: Option<TaskHandle>,
    initial_checks: Vec<TaskHandle>,
    started: bool,
}

impl<V: PageView, S: Scheduler> PageController<V, S> {
    pub fn new(config: PageConfig, layout: PageLayout, view: V, scheduler: S) -> Self {
        let reveal = RevealState::new(layout.section_ids.len(), layout.timeline_items);
        let letter = layout.letter_text.as_ref().map(|text| {
            Typewriter::new(text.as_str(), config.letter_start_delay_ms, config.letter_step_ms)
        });
        let letter_section = layout.section_index(&config.letter_section_id);
        let timeline_section = layout.section_index(&config.timeline_section_id);
        let acquainted = Counter::new(
            Task::AcquaintedTick,
            config.acquainted_prefix.as_str(),
            config.counter_period_ms,
        );
        let together = Counter::new(
            Task::TogetherTick,
            config.together_prefix.as_str(),
            config.counter_period_ms,
        );
        let wheel = WheelNav::new(
            config.wheel_threshold,
            config.wheel_lock_ms,
            config.timeline_bottom_tolerance,
        );
        let fireworks = FireworksState::new(config.fireworks.clone());

        Self {
            config,
            layout,
            view,
            scheduler,
            reveal,
            letter,
            letter_section,
            timeline_section,
            acquainted,
            together,
            wheel,
            celebrating: false,
            fireworks,
            fireworks_frame: None,
            note_timer: None,
            initial_checks: Vec::new(),
            started: false,
        }
    }

    /// Bring the page up. Call once after the host has attached listeners.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        for i in 0..self.layout.timeline_items {
            self.view
                .set_timeline_delay(i, i as f32 * self.config.timeline_stagger_secs);
        }

        let anchor = self.scheduler.from_local(&self.config.acquainted_since);
        let text = self.acquainted.begin(anchor, &mut self.scheduler);
        self.view.set_text(TextSlot::Acquainted, &text);

        // Layout may not be final yet: look again after a short delay and on
        // the next two frames.
        self.check_initial_sections();
        let timeout = self
            .scheduler
            .set_timeout(Task::InitialCheck, self.config.initial_check_delay_ms);
        let frame = self
            .scheduler
            .request_frame(Task::InitialCheckFrame { again: true });
        self.initial_checks = vec![timeout, frame];

        if let Some([w, h]) = self.view.resize_canvas() {
            self.fireworks.resize(Vec2::new(w, h));
        }

        log::info!(
            "page started: {} sections, {} timeline items, letter {}",
            self.layout.section_ids.len(),
            self.layout.timeline_items,
            if self.letter.is_some() { "present" } else { "absent" },
        );
    }

    /// Dispatch one host event. Only wheel events produce a meaningful
    /// outcome; everything else returns [`WheelOutcome::Ignored`].
    pub fn handle(&mut self, event: PageEvent) -> WheelOutcome {
        match event {
            PageEvent::SectionVisible(i) => self.on_section_visible(i),
            PageEvent::TimelineItemVisible(i) => self.on_timeline_item_visible(i),
            PageEvent::Wheel { delta_y } => return self.on_wheel(delta_y),
            PageEvent::Click(button) => self.on_click(button),
            PageEvent::VisibilityChanged { hidden } => self.on_visibility(hidden),
            PageEvent::Resize => self.on_resize(),
            PageEvent::Task(task) => self.on_task(task),
        }
        WheelOutcome::Ignored
    }

    pub fn on_task(&mut self, task: Task) {
        match task {
            Task::LetterStart | Task::LetterStep => {
                let Some(letter) = self.letter.as_mut() else {
                    return;
                };
                let text = if task == Task::LetterStart {
                    letter.on_start(&mut self.scheduler)
                } else {
                    letter.on_step(&mut self.scheduler)
                };
                if let Some(text) = text {
                    self.view.set_text(TextSlot::Letter, text);
                }
            }
            Task::HideNote => {
                self.note_timer = None;
                self.view.set_text(TextSlot::GentleNote, "");
            }
            Task::WheelUnlock => self.wheel.on_unlock(),
            Task::AcquaintedTick => {
                if let Some(text) = self.acquainted.render(self.scheduler.now_ms()) {
                    self.view.set_text(TextSlot::Acquainted, &text);
                }
            }
            Task::TogetherTick => {
                if let Some(text) = self.together.render(self.scheduler.now_ms()) {
                    self.view.set_text(TextSlot::Together, &text);
                }
            }
            Task::InitialCheck => self.check_initial_sections(),
            Task::InitialCheckFrame { again } => {
                self.check_initial_sections();
                if again {
                    let handle = self
                        .scheduler
                        .request_frame(Task::InitialCheckFrame { again: false });
                    self.initial_checks.push(handle);
                }
            }
            Task::FireworksFrame => self.render_fireworks_frame(),
        }
    }

    pub fn on_section_visible(&mut self, index: usize) {
        if index >= self.reveal.section_count() {
            return;
        }
        if self.reveal.section_visible(index) {
            self.view.reveal_section(index);
        }
        if Some(index) == self.letter_section {
            if let Some(letter) = self.letter.as_mut() {
                letter.begin(&mut self.scheduler);
            }
        }
    }

    pub fn on_timeline_item_visible(&mut self, index: usize) {
        if self.reveal.item_visible(index) {
            self.view.reveal_timeline_item(index);
            self.view.unobserve_timeline_item(index);
        }
    }

    /// Map a wheel gesture to at most one section jump.
    pub fn on_wheel(&mut self, delta_y: f64) -> WheelOutcome {
        let current = self.reveal.current();
        let timeline_bottom = if Some(current) == self.timeline_section && delta_y > 0.0 {
            self.view.section_rect(current).map(|r| r.bottom)
        } else {
            None
        };
        let input = WheelInput {
            delta_y,
            current,
            section_count: self.reveal.section_count(),
            celebrating: self.celebrating,
            timeline_bottom,
            viewport_height: self.view.viewport_height(),
        };

        let outcome = self.wheel.decide(&input);
        if let WheelOutcome::Jumped(target) = outcome {
            self.wheel.lock(&mut self.scheduler);
            self.scroll_to_section(target);
        }
        outcome
    }

    pub fn on_click(&mut self, button: Button) {
        match button {
            Button::Accept => {
                self.accept();
            }
            Button::Hesitate => self.hesitate(),
            Button::RestartLetter => self.restart_letter(),
            Button::BackToTop => self.back_to_top(),
            Button::BackToStory => self.back_to_story(),
        }
    }

    /// Pause both counters while hidden; on return, redraw from wall time and
    /// re-arm.
    pub fn on_visibility(&mut self, hidden: bool) {
        if hidden {
            self.acquainted.pause(&mut self.scheduler);
            self.together.pause(&mut self.scheduler);
            return;
        }
        if let Some(text) = self.acquainted.resume(&mut self.scheduler) {
            self.view.set_text(TextSlot::Acquainted, &text);
        }
        if self.celebrating {
            if let Some(text) = self.together.resume(&mut self.scheduler) {
                self.view.set_text(TextSlot::Together, &text);
            }
        }
    }

    pub fn on_resize(&mut self) {
        if let Some([w, h]) = self.view.resize_canvas() {
            self.fireworks.resize(Vec2::new(w, h));
        }
    }

    /// Enter the celebration. Returns false if it was already latched.
    pub fn accept(&mut self) -> bool {
        if self.celebrating {
            return false;
        }
        self.celebrating = true;
        self.view.set_overlay_visible(true);

        let now = self.scheduler.now_ms();
        let stamp = self.scheduler.to_local(now);
        self.view
            .set_text(TextSlot::CelebrationDate, &format_celebration_date(&stamp));

        let text = self.together.begin(now, &mut self.scheduler);
        self.view.set_text(TextSlot::Together, &text);

        self.launch_fireworks();
        self.try_play_music();
        log::info!("celebration started");
        true
    }

    /// Show the reassurance note for a while. A second press restarts the
    /// display period.
    pub fn hesitate(&mut self) {
        self.view
            .set_text(TextSlot::GentleNote, &self.config.gentle_note);
        if let Some(handle) = self.note_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.note_timer = Some(
            self.scheduler
                .set_timeout(Task::HideNote, self.config.gentle_note_ms),
        );
    }

    pub fn restart_letter(&mut self) {
        if let Some(letter) = self.letter.as_mut() {
            let text = letter.restart(&mut self.scheduler);
            self.view.set_text(TextSlot::Letter, text);
        }
    }

    pub fn back_to_top(&mut self) {
        self.view.scroll_to_top();
        if self.reveal.section_count() > 0 {
            self.scroll_to_section(0);
        }
    }

    /// Hide the overlay and return to the timeline, if the page has one.
    pub fn back_to_story(&mut self) {
        if let Some(index) = self.timeline_section {
            self.view.set_overlay_visible(false);
            self.scroll_to_section(index);
        }
    }

    /// Scroll to a section. Out-of-range indices are ignored.
    pub fn scroll_to_section(&mut self, index: usize) -> bool {
        if !self.reveal.set_current(index) {
            return false;
        }
        self.view.scroll_to_section(index);
        true
    }

    /// Cancel the fireworks frame callback. Sparks stay where they are.
    pub fn stop_fireworks(&mut self) {
        if let Some(handle) = self.fireworks_frame.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Release every outstanding timer and frame callback.
    pub fn dispose(&mut self) {
        self.stop_fireworks();
        self.fireworks.clear();
        self.acquainted.pause(&mut self.scheduler);
        self.together.pause(&mut self.scheduler);
        self.wheel.cancel(&mut self.scheduler);
        if let Some(letter) = self.letter.as_mut() {
            letter.cancel(&mut self.scheduler);
        }
        if let Some(handle) = self.note_timer.take() {
            self.scheduler.cancel(handle);
        }
        for handle in self.initial_checks.drain(..) {
            self.scheduler.cancel(handle);
        }
        log::info!("page disposed");
    }

    // ---- Accessors ----

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn current_section(&self) -> usize {
        self.reveal.current()
    }

    pub fn is_section_revealed(&self, index: usize) -> bool {
        self.reveal.is_section_revealed(index)
    }

    pub fn is_timeline_item_revealed(&self, index: usize) -> bool {
        self.reveal.is_item_revealed(index)
    }

    pub fn letter_visible(&self) -> Option<&str> {
        self.letter.as_ref().map(Typewriter::visible)
    }

    pub fn fireworks(&self) -> &FireworksState {
        &self.fireworks
    }

    pub fn particle_count(&self) -> usize {
        self.fireworks.particle_count()
    }

    pub fn fireworks_running(&self) -> bool {
        self.fireworks_frame.is_some()
    }

    pub fn together_anchor_ms(&self) -> Option<f64> {
        self.together.anchor_ms()
    }

    // ---- Internals ----

    fn check_initial_sections(&mut self) {
        let viewport_height = self.view.viewport_height();
        for i in 0..self.reveal.section_count() {
            if self.reveal.is_section_revealed(i) {
                continue;
            }
            let Some(rect) = self.view.section_rect(i) else {
                continue;
            };
            if on_screen_at_load(rect, viewport_height) && self.reveal.section_on_screen_at_load(i) {
                self.view.reveal_section(i);
            }
        }
    }

    fn launch_fireworks(&mut self) {
        self.stop_fireworks();
        let Some([w, h]) = self.view.resize_canvas() else {
            log::debug!("no fireworks canvas");
            return;
        };
        self.fireworks.launch(Vec2::new(w, h));
        self.render_fireworks_frame();
    }

    fn render_fireworks_frame(&mut self) {
        self.fireworks_frame = None;
        self.view.clear_canvas();
        self.fireworks.tick();
        self.fireworks.rebuild_draw_buffer();
        self.view.draw_particles(self.fireworks.draw_floats());
        self.fireworks_frame = Some(self.scheduler.request_frame(Task::FireworksFrame));
    }

    fn try_play_music(&mut self) {
        match self.view.play_audio(self.config.audio_volume) {
            Ok(()) => {}
            Err(AudioError::Missing) => log::debug!("no background music element"),
            Err(err) => log::warn!("background music did not start: {}", err),
        }
    }
}

impl<V: PageView> PageController<V, ManualScheduler> {
    /// Fire every task due up to `until_ms`, in deadline order, then park the
    /// clock there.
    pub fn run_until(&mut self, until_ms: f64) {
        while let Some(task) = self.scheduler.pop_due(until_ms) {
            self.on_task(task);
        }
        self.scheduler.set_now(until_ms);
    }

    /// Advance virtual time by `ms`.
    pub fn advance(&mut self, ms: f64) {
        let until = self.scheduler.now_ms() + ms;
        self.run_until(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::api::types::Rect;
    use crate::core::clock::LocalStamp;
    use crate::systems::fireworks::ParticleInstance;

    #[derive(Default)]
    struct RecordingView {
        texts: HashMap<TextSlot, String>,
        history: Vec<(TextSlot, String)>,
        revealed_sections: Vec<usize>,
        revealed_items: Vec<usize>,
        unobserved: Vec<usize>,
        delays: Vec<(usize, f32)>,
        scrolls: Vec<usize>,
        top_scrolls: usize,
        overlay: Vec<bool>,
        audio_calls: Vec<f64>,
        audio_result: Option<AudioError>,
        rects: Vec<Rect>,
        viewport: f64,
        canvas: Option<[f32; 2]>,
        resizes: usize,
        clears: usize,
        draws: Vec<usize>,
    }

    impl RecordingView {
        fn text(&self, slot: TextSlot) -> &str {
            self.texts.get(&slot).map(String::as_str).unwrap_or("")
        }

        fn texts_for(&self, slot: TextSlot) -> Vec<&str> {
            self.history
                .iter()
                .filter(|(s, _)| *s == slot)
                .map(|(_, t)| t.as_str())
                .collect()
        }
    }

    impl PageView for RecordingView {
        fn set_text(&mut self, slot: TextSlot, text: &str) {
            self.texts.insert(slot, text.to_string());
            self.history.push((slot, text.to_string()));
        }
        fn reveal_section(&mut self, index: usize) {
            self.revealed_sections.push(index);
        }
        fn reveal_timeline_item(&mut self, index: usize) {
            self.revealed_items.push(index);
        }
        fn unobserve_timeline_item(&mut self, index: usize) {
            self.unobserved.push(index);
        }
        fn set_timeline_delay(&mut self, index: usize, delay_secs: f32) {
            self.delays.push((index, delay_secs));
        }
        fn scroll_to_section(&mut self, index: usize) {
            self.scrolls.push(index);
        }
        fn scroll_to_top(&mut self) {
            self.top_scrolls += 1;
        }
        fn set_overlay_visible(&mut self, visible: bool) {
            self.overlay.push(visible);
        }
        fn play_audio(&mut self, volume: f64) -> Result<(), AudioError> {
            self.audio_calls.push(volume);
            match &self.audio_result {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
        fn section_rect(&self, index: usize) -> Option<Rect> {
            self.rects.get(index).copied()
        }
        fn viewport_height(&self) -> f64 {
            self.viewport
        }
        fn resize_canvas(&mut self) -> Option<[f32; 2]> {
            self.resizes += 1;
            self.canvas
        }
        fn clear_canvas(&mut self) {
            self.clears += 1;
        }
        fn draw_particles(&mut self, floats: &[f32]) {
            let sparks = ParticleInstance::from_floats(floats).expect("whole instances");
            self.draws.push(sparks.len());
        }
    }

    const VH: f64 = 800.0;
    const HERO: usize = 0;
    const TIMELINE: usize = 1;
    const LETTER: usize = 2;
    const PROPOSAL: usize = 3;

    fn layout() -> PageLayout {
        PageLayout {
            section_ids: vec![
                "hero".to_string(),
                "memory-timeline".to_string(),
                "love-letter".to_string(),
                "proposal".to_string(),
            ],
            timeline_items: 3,
            letter_text: Some("亲爱的你".to_string()),
        }
    }

    /// Sections stacked one viewport apart, scrolled to the top.
    fn stacked_view() -> RecordingView {
        RecordingView {
            rects: (0..4)
                .map(|i| Rect {
                    top: i as f64 * VH,
                    bottom: (i + 1) as f64 * VH,
                })
                .collect(),
            viewport: VH,
            canvas: Some([1200.0, 800.0]),
            ..RecordingView::default()
        }
    }

    fn start_ms() -> f64 {
        ManualScheduler::default().from_local(&LocalStamp::new(2026, 2, 14, 20, 0, 0))
    }

    fn page_with(view: RecordingView, layout: PageLayout) -> PageController<RecordingView, ManualScheduler> {
        let mut page = PageController::new(
            PageConfig::default(),
            layout,
            view,
            ManualScheduler::new(start_ms()),
        );
        page.start();
        page
    }

    fn page() -> PageController<RecordingView, ManualScheduler> {
        page_with(stacked_view(), layout())
    }

    #[test]
    fn start_reveals_on_screen_sections_and_staggers_items() {
        let page = page();
        assert_eq!(page.view().revealed_sections, vec![HERO]);
        assert!(page.is_section_revealed(HERO));
        assert!(!page.is_section_revealed(TIMELINE));
        assert_eq!(page.view().delays, vec![(0, 0.0), (1, 0.15), (2, 0.3)]);
    }

    #[test]
    fn start_renders_acquainted_counter_from_anchor() {
        let mut page = page();
        // 2025-10-22 17:00 to 2026-02-14 20:00 is 115 days and 3 hours.
        assert_eq!(
            page.view().text(TextSlot::Acquainted),
            "我们认识了 115 天 03 小时 00 分钟 00 秒"
        );
        page.advance(1_000.0);
        assert_eq!(
            page.view().text(TextSlot::Acquainted),
            "我们认识了 115 天 03 小时 00 分钟 01 秒"
        );
    }

    #[test]
    fn deferred_initial_check_catches_late_layout() {
        let mut view = stacked_view();
        view.rects[HERO] = Rect { top: 900.0, bottom: 1700.0 };
        let mut page = page_with(view, layout());
        assert!(page.view().revealed_sections.is_empty());

        page.view_mut().rects[HERO] = Rect { top: 0.0, bottom: 800.0 };
        page.advance(16.0);
        assert_eq!(page.view().revealed_sections, vec![HERO]);
        page.advance(200.0);
        assert_eq!(page.view().revealed_sections, vec![HERO]);
        assert_eq!(page.current_section(), HERO);
    }

    #[test]
    fn timed_initial_check_catches_layout_after_frames() {
        let mut view = stacked_view();
        view.rects[HERO] = Rect { top: 900.0, bottom: 1700.0 };
        let mut page = page_with(view, layout());

        // Both frame re-checks have run by now and found nothing.
        page.advance(40.0);
        assert!(page.view().revealed_sections.is_empty());

        page.view_mut().rects[HERO] = Rect { top: 0.0, bottom: 800.0 };
        page.advance(59.0);
        assert!(page.view().revealed_sections.is_empty());
        page.advance(1.0);
        assert_eq!(page.view().revealed_sections, vec![HERO]);
        assert!(page.is_section_revealed(HERO));
    }

    #[test]
    fn resize_refits_canvas_and_fireworks_bounds() {
        let mut view = stacked_view();
        view.canvas = Some([100.0, 50.0]);
        let mut page = page_with(view, layout());
        assert_eq!(page.view().resizes, 1);
        assert_eq!(page.fireworks().bounds, Vec2::new(100.0, 50.0));

        page.view_mut().canvas = Some([640.0, 480.0]);
        let outcome = page.handle(PageEvent::Resize);
        assert_eq!(outcome, WheelOutcome::Ignored);
        assert_eq!(page.view().resizes, 2);
        assert_eq!(page.fireworks().bounds, Vec2::new(640.0, 480.0));
    }

    #[test]
    fn letter_section_starts_typing() {
        let mut page = page();
        page.handle(PageEvent::SectionVisible(LETTER));
        assert!(page.is_section_revealed(LETTER));
        assert_eq!(page.current_section(), LETTER);

        page.advance(100.0);
        assert_eq!(page.view().text(TextSlot::Letter), "");
        page.advance(80.0);
        assert_eq!(page.view().text(TextSlot::Letter), "亲");
        page.advance(240.0);
        assert_eq!(page.view().text(TextSlot::Letter), "亲爱的你");

        // Coming back to a finished letter changes nothing.
        page.handle(PageEvent::SectionVisible(HERO));
        page.handle(PageEvent::SectionVisible(LETTER));
        page.advance(1_000.0);
        assert_eq!(page.view().texts_for(TextSlot::Letter).len(), 5);
    }

    #[test]
    fn restart_button_replays_letter() {
        let mut page = page();
        page.handle(PageEvent::SectionVisible(LETTER));
        page.advance(2_000.0);
        page.handle(PageEvent::Click(Button::RestartLetter));
        assert_eq!(page.view().text(TextSlot::Letter), "");
        page.advance(80.0);
        assert_eq!(page.view().text(TextSlot::Letter), "亲");
        page.advance(1_000.0);
        assert_eq!(page.letter_visible(), Some("亲爱的你"));
    }

    #[test]
    fn missing_letter_is_tolerated() {
        let mut l = layout();
        l.letter_text = None;
        let mut page = page_with(stacked_view(), l);
        page.handle(PageEvent::SectionVisible(LETTER));
        page.handle(PageEvent::Click(Button::RestartLetter));
        page.advance(1_000.0);
        assert_eq!(page.letter_visible(), None);
        assert!(page.view().texts_for(TextSlot::Letter).is_empty());
    }

    #[test]
    fn timeline_items_reveal_once_and_unobserve() {
        let mut page = page();
        page.handle(PageEvent::TimelineItemVisible(1));
        page.handle(PageEvent::TimelineItemVisible(1));
        page.handle(PageEvent::TimelineItemVisible(7));
        assert_eq!(page.view().revealed_items, vec![1]);
        assert_eq!(page.view().unobserved, vec![1]);
        assert!(page.is_timeline_item_revealed(1));
    }

    #[test]
    fn rapid_wheel_burst_moves_one_section() {
        let mut page = page();
        let mut jumps = 0;
        for _ in 0..20 {
            if let WheelOutcome::Jumped(_) = page.handle(PageEvent::Wheel { delta_y: 120.0 }) {
                jumps += 1;
            }
            page.advance(40.0);
        }
        // 20 events over 800 ms, all inside the 900 ms lock.
        assert_eq!(jumps, 1);
        assert_eq!(page.view().scrolls, vec![TIMELINE]);

        page.advance(100.0);
        // Timeline bottom is far below the viewport: native scroll.
        assert_eq!(page.on_wheel(120.0), WheelOutcome::Native);
        assert_eq!(page.on_wheel(-120.0), WheelOutcome::Jumped(HERO));
    }

    #[test]
    fn locked_wheel_reports_suppressed() {
        let mut page = page();
        assert_eq!(page.on_wheel(100.0), WheelOutcome::Jumped(TIMELINE));
        assert_eq!(page.on_wheel(100.0), WheelOutcome::Suppressed);
        assert!(WheelOutcome::Suppressed.prevents_default());
    }

    #[test]
    fn timeline_end_resumes_section_jumps() {
        let mut page = page();
        page.scroll_to_section(TIMELINE);
        page.view_mut().rects[TIMELINE] = Rect { top: -1_200.0, bottom: 840.0 };
        assert_eq!(page.on_wheel(100.0), WheelOutcome::Jumped(LETTER));
        assert_eq!(page.current_section(), LETTER);
    }

    #[test]
    fn out_of_range_scroll_is_ignored() {
        let mut page = page();
        assert!(!page.scroll_to_section(4));
        assert!(page.view().scrolls.is_empty());
        assert_eq!(page.on_wheel(-200.0), WheelOutcome::Ignored);
    }

    #[test]
    fn accept_shows_overlay_and_zeroed_together_counter() {
        let mut page = page();
        let t = page.scheduler().now_ms();
        page.handle(PageEvent::Click(Button::Accept));

        assert!(page.is_celebrating());
        assert_eq!(page.view().overlay, vec![true]);
        assert_eq!(
            page.view().text(TextSlot::Together),
            "一起计时：0 天 00 小时 00 分钟 00 秒"
        );
        assert_eq!(page.view().text(TextSlot::CelebrationDate), "2026年02月14日 20:00");
        assert_eq!(page.view().audio_calls, vec![0.5]);

        page.run_until(t + 59_999.0);
        assert!(page
            .view()
            .texts_for(TextSlot::Together)
            .iter()
            .all(|t| !t.contains("01 分钟")));
        assert_eq!(
            page.view().text(TextSlot::Together),
            "一起计时：0 天 00 小时 00 分钟 59 秒"
        );
        page.run_until(t + 60_000.0);
        assert_eq!(
            page.view().text(TextSlot::Together),
            "一起计时：0 天 00 小时 01 分钟 00 秒"
        );
    }

    #[test]
    fn second_accept_is_a_noop() {
        let mut page = page();
        assert!(page.accept());
        let anchor = page.together_anchor_ms();
        page.advance(5_000.0);
        assert!(!page.accept());
        page.handle(PageEvent::Click(Button::Accept));

        assert_eq!(page.together_anchor_ms(), anchor);
        assert_eq!(page.view().overlay, vec![true]);
        assert_eq!(page.view().audio_calls.len(), 1);
        assert_eq!(
            page.view().text(TextSlot::Together),
            "一起计时：0 天 00 小时 00 分钟 05 秒"
        );
    }

    #[test]
    fn celebration_disables_wheel_navigation() {
        let mut page = page();
        page.accept();
        assert_eq!(page.on_wheel(500.0), WheelOutcome::Ignored);
        assert!(page.view().scrolls.is_empty());
    }

    #[test]
    fn audio_rejection_does_not_stop_celebration() {
        let mut view = stacked_view();
        view.audio_result = Some(AudioError::Rejected("NotAllowedError".to_string()));
        let mut page = page_with(view, layout());
        assert!(page.accept());
        assert!(page.fireworks_running());
        assert_eq!(page.view().overlay, vec![true]);
    }

    #[test]
    fn hide_and_show_resumes_counters_from_wall_time() {
        let mut page = page();
        let t = page.scheduler().now_ms();
        page.accept();
        page.stop_fireworks();

        page.run_until(t + 10_500.0);
        page.handle(PageEvent::VisibilityChanged { hidden: true });
        assert!(!page.scheduler().is_pending(Task::TogetherTick));
        assert!(!page.scheduler().is_pending(Task::AcquaintedTick));
        let hidden_len = page.view().texts_for(TextSlot::Together).len();

        page.run_until(t + 70_200.0);
        assert_eq!(page.view().texts_for(TextSlot::Together).len(), hidden_len);

        page.handle(PageEvent::VisibilityChanged { hidden: false });
        assert_eq!(
            page.view().text(TextSlot::Together),
            "一起计时：0 天 00 小时 01 分钟 10 秒"
        );

        page.run_until(t + 73_200.0);
        let shown: Vec<&str> = page.view().texts_for(TextSlot::Together)[hidden_len..].to_vec();
        assert_eq!(
            shown,
            vec![
                "一起计时：0 天 00 小时 01 分钟 10 秒",
                "一起计时：0 天 00 小时 01 分钟 11 秒",
                "一起计时：0 天 00 小时 01 分钟 12 秒",
                "一起计时：0 天 00 小时 01 分钟 13 秒",
            ]
        );
    }

    #[test]
    fn showing_before_celebration_leaves_together_idle() {
        let mut page = page();
        page.handle(PageEvent::VisibilityChanged { hidden: true });
        page.handle(PageEvent::VisibilityChanged { hidden: false });
        assert!(page.scheduler().is_pending(Task::AcquaintedTick));
        assert!(!page.scheduler().is_pending(Task::TogetherTick));
        assert!(page.view().texts_for(TextSlot::Together).is_empty());
    }

    #[test]
    fn hesitate_note_clears_after_five_seconds() {
        let mut page = page();
        page.handle(PageEvent::Click(Button::Hesitate));
        assert_eq!(page.view().text(TextSlot::GentleNote), "慢慢来，我会在这里等你。");
        page.advance(4_999.0);
        assert_eq!(page.view().text(TextSlot::GentleNote), "慢慢来，我会在这里等你。");
        page.advance(1.0);
        assert_eq!(page.view().text(TextSlot::GentleNote), "");
    }

    #[test]
    fn back_to_top_scrolls_window_and_first_section() {
        let mut page = page();
        page.scroll_to_section(PROPOSAL);
        page.handle(PageEvent::Click(Button::BackToTop));
        assert_eq!(page.view().top_scrolls, 1);
        assert_eq!(page.view().scrolls, vec![PROPOSAL, HERO]);
        assert_eq!(page.current_section(), HERO);
    }

    #[test]
    fn back_to_story_hides_overlay_and_returns_to_timeline() {
        let mut page = page();
        page.accept();
        page.handle(PageEvent::Click(Button::BackToStory));
        assert_eq!(page.view().overlay, vec![true, false]);
        assert_eq!(page.view().scrolls, vec![TIMELINE]);
        assert!(page.is_celebrating());
    }

    #[test]
    fn back_to_story_without_timeline_does_nothing() {
        let mut l = layout();
        l.section_ids[TIMELINE] = "photos".to_string();
        let mut page = page_with(stacked_view(), l);
        page.accept();
        page.back_to_story();
        assert_eq!(page.view().overlay, vec![true]);
        assert!(page.view().scrolls.is_empty());
    }

    #[test]
    fn fireworks_run_every_frame_and_respect_cap() {
        let mut page = page();
        page.accept();
        assert!(page.fireworks_running());
        let first_draws = page.view().draws.len();
        assert_eq!(first_draws, 1);

        page.advance(16.0 * 600.0);
        assert_eq!(page.view().draws.len(), first_draws + 600);
        assert_eq!(page.view().clears, page.view().draws.len());
        assert!(page.particle_count() > 0);
        assert!(page.particle_count() < 300 + 32);
        assert!(page.view().draws.iter().all(|&n| n < 300 + 32));
    }

    #[test]
    fn stop_fireworks_cancels_frames() {
        let mut page = page();
        page.accept();
        page.stop_fireworks();
        assert!(!page.fireworks_running());
        assert!(!page.scheduler().is_pending(Task::FireworksFrame));
        let draws = page.view().draws.len();
        page.advance(1_000.0);
        assert_eq!(page.view().draws.len(), draws);
    }

    #[test]
    fn no_canvas_means_no_frames() {
        let mut view = stacked_view();
        view.canvas = None;
        let mut page = page_with(view, layout());
        assert!(page.accept());
        assert!(!page.fireworks_running());
        assert!(page.view().draws.is_empty());
        assert_eq!(page.view().text(TextSlot::Together), "一起计时：0 天 00 小时 00 分钟 00 秒");
    }

    #[test]
    fn dispose_cancels_everything() {
        let mut page = page();
        page.handle(PageEvent::SectionVisible(LETTER));
        page.handle(PageEvent::Click(Button::Hesitate));
        page.on_wheel(-100.0);
        page.on_wheel(100.0);
        page.accept();
        assert!(page.scheduler().pending_len() > 0);

        page.dispose();
        assert_eq!(page.scheduler().pending_len(), 0);
        assert_eq!(page.particle_count(), 0);
    }

    #[test]
    fn start_is_idempotent() {
        let mut page = page();
        let pending = page.scheduler().pending_len();
        page.start();
        assert_eq!(page.scheduler().pending_len(), pending);
        assert_eq!(page.view().delays.len(), 3);
    }
}
