use std::cell::RefCell;

use confession_engine::{PageController, PageEvent, WheelOutcome};

use crate::dom::DomView;
use crate::scheduler::DomScheduler;

/// The page controller as wired to the browser.
pub type Page = PageController<DomView, DomScheduler>;

// wasm-bindgen cannot hand generic structs to JS, so the controller lives
// here and every callback reaches it through `with_page`.
thread_local! {
    static PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

/// Store the controller. Replaces any previous one.
pub fn install(page: Page) {
    PAGE.with(|cell| {
        *cell.borrow_mut() = Some(page);
    });
}

/// Remove the controller, e.g. for disposal.
pub fn take() -> Option<Page> {
    PAGE.with(|cell| cell.borrow_mut().take())
}

/// Run `f` against the controller. Returns `None` before `install`, after
/// `take`, or when called re-entrantly from inside another callback.
pub fn with_page<R>(f: impl FnOnce(&mut Page) -> R) -> Option<R> {
    PAGE.with(|cell| {
        let Ok(mut borrow) = cell.try_borrow_mut() else {
            log::warn!("page busy, dropping re-entrant callback");
            return None;
        };
        borrow.as_mut().map(f)
    })
}

/// Forward one host event to the controller.
pub fn dispatch(event: PageEvent) -> WheelOutcome {
    with_page(|page| page.handle(event)).unwrap_or(WheelOutcome::Ignored)
}
