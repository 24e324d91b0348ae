//! DOM listeners and observers. Each one forwards to `runner::dispatch` and
//! lives for the rest of the page (closures are leaked with `forget`).

use confession_engine::{Button, PageEvent};
use js_sys::{Array, Object};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, WheelEvent, Window,
};

use crate::runner;

const SECTION_THRESHOLD: f64 = 0.25;
const SECTION_ROOT_MARGIN: &str = "0px 0px -100px 0px";
const TIMELINE_THRESHOLD: f64 = 0.35;

const BUTTONS: [(&str, Button); 5] = [
    ("btn-yes", Button::Accept),
    ("btn-think", Button::Hesitate),
    ("letter-restart", Button::RestartLetter),
    ("btn-top", Button::BackToTop),
    ("btn-back-story", Button::BackToStory),
];

/// Watch `elements` and report each intersecting one by its index.
fn observe(
    elements: Vec<Element>,
    threshold: f64,
    root_margin: Option<&str>,
    event: fn(usize) -> PageEvent,
) -> Result<IntersectionObserver, JsValue> {
    let watched = elements.clone();
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(index) = watched.iter().position(|el| Object::is(el, &target)) {
                    runner::dispatch(event(index));
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for el in &elements {
        observer.observe(el);
    }
    Ok(observer)
}

/// Section reveal watcher.
pub fn observe_sections(sections: &[Element]) -> Result<IntersectionObserver, JsValue> {
    observe(
        sections.to_vec(),
        SECTION_THRESHOLD,
        Some(SECTION_ROOT_MARGIN),
        PageEvent::SectionVisible,
    )
}

/// One-shot timeline item watcher; the view unobserves items once revealed.
pub fn observe_timeline_items(items: &[HtmlElement]) -> Result<IntersectionObserver, JsValue> {
    let elements = items.iter().cloned().map(Element::from).collect();
    observe(elements, TIMELINE_THRESHOLD, None, PageEvent::TimelineItemVisible)
}

/// Wheel, button, visibility and resize listeners. Missing elements are
/// skipped.
pub fn attach(window: &Window, document: &Document) -> Result<(), JsValue> {
    if let Some(pages) = document.query_selector("main.pages")? {
        attach_wheel(&pages)?;
    } else {
        log::debug!("no page container, wheel navigation disabled");
    }

    for (id, button) in BUTTONS {
        let Some(el) = document.get_element_by_id(id) else {
            log::debug!("no #{} button", id);
            continue;
        };
        let on_click = Closure::<dyn FnMut()>::new(move || {
            runner::dispatch(PageEvent::Click(button));
        });
        el.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    let doc = document.clone();
    let on_visibility = Closure::<dyn FnMut()>::new(move || {
        runner::dispatch(PageEvent::VisibilityChanged {
            hidden: doc.hidden(),
        });
    });
    document.add_event_listener_with_callback(
        "visibilitychange",
        on_visibility.as_ref().unchecked_ref(),
    )?;
    on_visibility.forget();

    let on_resize = Closure::<dyn FnMut()>::new(move || {
        runner::dispatch(PageEvent::Resize);
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    Ok(())
}

fn attach_wheel(container: &Element) -> Result<(), JsValue> {
    let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
        let outcome = runner::dispatch(PageEvent::Wheel {
            delta_y: event.delta_y(),
        });
        if outcome.prevents_default() {
            event.prevent_default();
        }
    });
    // Must be non-passive so preventDefault can stop the native scroll.
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    container.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        on_wheel.as_ref().unchecked_ref(),
        &options,
    )?;
    on_wheel.forget();
    Ok(())
}
