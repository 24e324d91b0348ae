//! Browser entry point for the confession page.
//!
//! Builds a [`DomView`] and [`DomScheduler`], hands them to the engine's
//! `PageController`, attaches every listener and starts the page.

pub mod dom;
pub mod listeners;
pub mod runner;
pub mod scheduler;

use confession_engine::{PageConfig, PageController};
use wasm_bindgen::prelude::*;
use web_sys::Document;

pub use dom::DomView;
pub use runner::{dispatch, with_page, Page};
pub use scheduler::DomScheduler;

const CONFIG_ELEMENT_ID: &str = "page-config";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = read_config(&document);
    let mut view = DomView::from_document(&window, &document)?;
    let layout = view.layout();

    listeners::observe_sections(view.sections())?;
    let timeline_observer = listeners::observe_timeline_items(view.timeline_items())?;
    view.set_timeline_observer(timeline_observer);
    listeners::attach(&window, &document)?;

    let page = PageController::new(config, layout, view, DomScheduler::new(window));
    runner::install(page);
    runner::with_page(|page| page.start());
    log::info!("confession page: initialized");
    Ok(())
}

/// Stop the fireworks loop, cancel every timer and drop the controller.
/// Listeners stay attached but become no-ops.
#[wasm_bindgen]
pub fn page_dispose() {
    if let Some(mut page) = runner::take() {
        page.dispose();
    }
}

/// Optional JSON overrides from `<script id="page-config" type="application/json">`.
fn read_config(document: &Document) -> PageConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return PageConfig::default();
    };
    match PageConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ignoring invalid page config: {}", err);
            PageConfig::default()
        }
    }
}
