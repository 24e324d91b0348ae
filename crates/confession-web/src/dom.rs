use confession_engine::{AudioError, PageLayout, PageView, ParticleInstance, Rect, TextSlot};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlAudioElement, HtmlCanvasElement, HtmlElement,
    IntersectionObserver, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    ScrollToOptions, Window,
};

const SECTION_SELECTOR: &str = ".page";
const TIMELINE_ITEM_SELECTOR: &str = ".timeline-item";
const REVEALED_CLASS: &str = "in-view";
const OVERLAY_VISIBLE_CLASS: &str = "visible";

/// Canvas plus its 2D context.
struct Stage {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

/// `PageView` over the live document. Every element is optional; a missing
/// one turns the matching operations into no-ops.
pub struct DomView {
    window: Window,
    sections: Vec<Element>,
    items: Vec<HtmlElement>,
    letter: Option<Element>,
    acquainted: Option<Element>,
    together: Option<Element>,
    gentle_note: Option<Element>,
    celebration_date: Option<Element>,
    overlay: Option<Element>,
    stage: Option<Stage>,
    audio: Option<HtmlAudioElement>,
    timeline_observer: Option<IntersectionObserver>,
}

impl DomView {
    pub fn from_document(window: &Window, document: &Document) -> Result<Self, JsValue> {
        let sections = select_all(document, SECTION_SELECTOR)?;
        let items = select_all(document, TIMELINE_ITEM_SELECTOR)?
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect();

        Ok(Self {
            window: window.clone(),
            sections,
            items,
            letter: document.get_element_by_id("letter-content"),
            acquainted: document.get_element_by_id("countup-display"),
            together: document.get_element_by_id("together-counter"),
            gentle_note: document.get_element_by_id("gentle-note"),
            celebration_date: document.get_element_by_id("celebration-date"),
            overlay: document.get_element_by_id("celebration-overlay"),
            stage: find_stage(document),
            audio: document
                .get_element_by_id("bgm")
                .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok()),
            timeline_observer: None,
        })
    }

    /// Describe the document for the page controller.
    pub fn layout(&self) -> PageLayout {
        PageLayout {
            section_ids: self.sections.iter().map(Element::id).collect(),
            timeline_items: self.items.len(),
            letter_text: self.letter.as_ref().map(|el| {
                el.dyn_ref::<HtmlElement>()
                    .and_then(|html| html.dataset().get("letter"))
                    .unwrap_or_default()
            }),
        }
    }

    pub fn sections(&self) -> &[Element] {
        &self.sections
    }

    pub fn timeline_items(&self) -> &[HtmlElement] {
        &self.items
    }

    pub fn set_timeline_observer(&mut self, observer: IntersectionObserver) {
        self.timeline_observer = Some(observer);
    }

    fn slot(&self, slot: TextSlot) -> Option<&Element> {
        match slot {
            TextSlot::Letter => self.letter.as_ref(),
            TextSlot::Acquainted => self.acquainted.as_ref(),
            TextSlot::Together => self.together.as_ref(),
            TextSlot::GentleNote => self.gentle_note.as_ref(),
            TextSlot::CelebrationDate => self.celebration_date.as_ref(),
        }
    }

    fn device_pixel_ratio(&self) -> f64 {
        let dpr = self.window.device_pixel_ratio();
        if dpr > 0.0 {
            dpr
        } else {
            1.0
        }
    }
}

impl PageView for DomView {
    fn set_text(&mut self, slot: TextSlot, text: &str) {
        if let Some(el) = self.slot(slot) {
            el.set_text_content(Some(text));
        }
    }

    fn reveal_section(&mut self, index: usize) {
        if let Some(el) = self.sections.get(index) {
            add_class(el, REVEALED_CLASS);
        }
    }

    fn reveal_timeline_item(&mut self, index: usize) {
        if let Some(el) = self.items.get(index) {
            add_class(el, REVEALED_CLASS);
        }
    }

    fn unobserve_timeline_item(&mut self, index: usize) {
        if let (Some(observer), Some(el)) = (&self.timeline_observer, self.items.get(index)) {
            observer.unobserve(el);
        }
    }

    fn set_timeline_delay(&mut self, index: usize, delay_secs: f32) {
        if let Some(el) = self.items.get(index) {
            if let Err(err) = el
                .style()
                .set_property("transition-delay", &transition_delay(delay_secs))
            {
                log::warn!("could not stagger timeline item {}: {:?}", index, err);
            }
        }
    }

    fn scroll_to_section(&mut self, index: usize) {
        if let Some(el) = self.sections.get(index) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            el.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        let Some(overlay) = &self.overlay else {
            return;
        };
        let classes = overlay.class_list();
        let toggled = if visible {
            classes.add_1(OVERLAY_VISIBLE_CLASS)
        } else {
            classes.remove_1(OVERLAY_VISIBLE_CLASS)
        };
        let aria_hidden = if visible { "false" } else { "true" };
        let result = toggled.and_then(|_| overlay.set_attribute("aria-hidden", aria_hidden));
        if let Err(err) = result {
            log::warn!("could not toggle celebration overlay: {:?}", err);
        }
    }

    fn play_audio(&mut self, volume: f64) -> Result<(), AudioError> {
        let audio = self.audio.as_ref().ok_or(AudioError::Missing)?;
        audio.set_current_time(0.0);
        audio.set_volume(volume);
        let promise = audio
            .play()
            .map_err(|err| AudioError::Rejected(format!("{:?}", err)))?;
        // Autoplay policy usually rejects asynchronously.
        let on_reject = Closure::once(move |err: JsValue| {
            log::warn!("background music did not start, waiting for interaction: {:?}", err);
        });
        let _ = promise.catch(&on_reject);
        on_reject.forget();
        Ok(())
    }

    fn section_rect(&self, index: usize) -> Option<Rect> {
        self.sections.get(index).map(|el| {
            let rect = el.get_bounding_client_rect();
            Rect {
                top: rect.top(),
                bottom: rect.bottom(),
            }
        })
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn resize_canvas(&mut self) -> Option<[f32; 2]> {
        let dpr = self.device_pixel_ratio();
        let stage = self.stage.as_ref()?;
        let width = stage.canvas.client_width() as f64;
        let height = stage.canvas.client_height() as f64;
        stage.canvas.set_width((width * dpr) as u32);
        stage.canvas.set_height((height * dpr) as u32);
        // Draw in CSS pixels regardless of the backing-store density.
        let scaled = stage
            .ctx
            .set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .and_then(|_| stage.ctx.scale(dpr, dpr));
        if let Err(err) = scaled {
            log::warn!("could not scale fireworks canvas: {:?}", err);
        }
        Some([width as f32, height as f32])
    }

    fn clear_canvas(&mut self) {
        if let Some(stage) = &self.stage {
            let width = stage.canvas.client_width() as f64;
            let height = stage.canvas.client_height() as f64;
            stage.ctx.clear_rect(0.0, 0.0, width, height);
        }
    }

    fn draw_particles(&mut self, floats: &[f32]) {
        let Some(stage) = &self.stage else {
            return;
        };
        let sparks = match ParticleInstance::from_floats(floats) {
            Ok(sparks) => sparks,
            Err(err) => {
                log::warn!("skipping malformed spark buffer: {:?}", err);
                return;
            }
        };
        let ctx = &stage.ctx;
        ctx.save();
        if let Err(err) = ctx.set_global_composite_operation("lighter") {
            log::warn!("additive blending unavailable: {:?}", err);
        }
        let mut arc_error = None;
        for p in sparks {
            ctx.set_global_alpha(p.alpha as f64);
            ctx.set_fill_style_str(&p.fill_style());
            ctx.begin_path();
            match ctx.arc(p.x as f64, p.y as f64, p.radius as f64, 0.0, std::f64::consts::TAU) {
                Ok(()) => ctx.fill(),
                Err(err) => arc_error = Some(err),
            }
        }
        ctx.restore();
        // One warning per frame at most.
        if let Some(err) = arc_error {
            log::warn!("could not draw spark: {:?}", err);
        }
    }
}

fn select_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn find_stage(document: &Document) -> Option<Stage> {
    let canvas = document
        .get_element_by_id("fireworks-canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some(Stage { canvas, ctx })
}

fn add_class(el: &Element, class: &str) {
    if let Err(err) = el.class_list().add_1(class) {
        log::warn!("could not add class {}: {:?}", class, err);
    }
}

fn transition_delay(delay_secs: f32) -> String {
    format!("{:.2}s", delay_secs)
}
