use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use confession_engine::{Clock, LocalStamp, PageEvent, Scheduler, Task, TaskHandle};
use js_sys::Date;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::runner;

#[derive(Debug, Clone, Copy)]
enum OneShot {
    Timeout(i32),
    Frame(i32),
}

/// `Scheduler` over `setTimeout`, `setInterval` and `requestAnimationFrame`.
///
/// One-shot callbacks free themselves after running; interval closures are
/// owned here until cancelled.
pub struct DomScheduler {
    window: Window,
    next_handle: u32,
    /// Shared with the one-shot closures so they can forget themselves.
    one_shots: Rc<RefCell<HashMap<u32, OneShot>>>,
    intervals: HashMap<u32, (i32, Closure<dyn FnMut()>)>,
}

impl DomScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_handle: 1,
            one_shots: Rc::new(RefCell::new(HashMap::new())),
            intervals: HashMap::new(),
        }
    }

    fn allocate(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        handle
    }

    /// Callback that drops its bookkeeping entry, then dispatches `task`.
    fn one_shot_callback(&self, handle: TaskHandle, task: Task) -> JsValue {
        let one_shots = Rc::clone(&self.one_shots);
        Closure::once_into_js(move || {
            one_shots.borrow_mut().remove(&handle.0);
            runner::dispatch(PageEvent::Task(task));
        })
    }
}

impl Clock for DomScheduler {
    fn now_ms(&self) -> f64 {
        Date::now()
    }

    fn to_local(&self, epoch_ms: f64) -> LocalStamp {
        let date = Date::new(&JsValue::from_f64(epoch_ms));
        LocalStamp::new(
            date.get_full_year() as i32,
            date.get_month() + 1,
            date.get_date(),
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
        )
    }

    fn from_local(&self, stamp: &LocalStamp) -> f64 {
        Date::new_with_year_month_day_hr_min_sec(
            stamp.year as u32,
            stamp.month as i32 - 1,
            stamp.day as i32,
            stamp.hour as i32,
            stamp.minute as i32,
            stamp.second as i32,
        )
        .get_time()
    }
}

impl Scheduler for DomScheduler {
    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle {
        let handle = self.allocate();
        let callback = self.one_shot_callback(handle, task);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms as i32,
            ) {
            Ok(id) => {
                self.one_shots.borrow_mut().insert(handle.0, OneShot::Timeout(id));
            }
            Err(err) => log::warn!("setTimeout failed for {:?}: {:?}", task, err),
        }
        handle
    }

    fn set_interval(&mut self, task: Task, period_ms: u32) -> TaskHandle {
        let handle = self.allocate();
        let callback = Closure::<dyn FnMut()>::new(move || {
            runner::dispatch(PageEvent::Task(task));
        });
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms as i32,
            ) {
            Ok(id) => {
                self.intervals.insert(handle.0, (id, callback));
            }
            Err(err) => log::warn!("setInterval failed for {:?}: {:?}", task, err),
        }
        handle
    }

    fn request_frame(&mut self, task: Task) -> TaskHandle {
        let handle = self.allocate();
        let one_shots = Rc::clone(&self.one_shots);
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            one_shots.borrow_mut().remove(&handle.0);
            runner::dispatch(PageEvent::Task(task));
        });
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => {
                self.one_shots.borrow_mut().insert(handle.0, OneShot::Frame(id));
            }
            Err(err) => log::warn!("requestAnimationFrame failed for {:?}: {:?}", task, err),
        }
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if let Some((id, _callback)) = self.intervals.remove(&handle.0) {
            self.window.clear_interval_with_handle(id);
            return;
        }
        let one_shot = self.one_shots.borrow_mut().remove(&handle.0);
        match one_shot {
            Some(OneShot::Timeout(id)) => self.window.clear_timeout_with_handle(id),
            Some(OneShot::Frame(id)) => {
                if let Err(err) = self.window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {:?}", err);
                }
            }
            None => {}
        }
    }
}
