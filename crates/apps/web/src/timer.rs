use std::collections::BTreeMap;

use runtime::{IntervalTimer, TimerHandle};
use tracing::error;
use wasm_bindgen::prelude::*;

/// `setInterval`-backed timers.
///
/// Every tick is forwarded to `on_tick` with the handle it belongs to, so the
/// receiver can tell a live interval from one cancelled mid-flight.
pub struct BrowserTimer {
    window: web_sys::Window,
    on_tick: fn(TimerHandle),
    active: BTreeMap<TimerHandle, Closure<dyn FnMut()>>,
    // A cancelled interval's closure may still be on the JS call stack, so it
    // is parked here and dropped on the next `start` instead.
    retired: Vec<Closure<dyn FnMut()>>,
}

impl BrowserTimer {
    pub fn new(window: web_sys::Window, on_tick: fn(TimerHandle)) -> Self {
        Self {
            window,
            on_tick,
            active: BTreeMap::new(),
            retired: Vec::new(),
        }
    }
}

impl IntervalTimer for BrowserTimer {
    fn start(&mut self, interval_ms: u32) -> TimerHandle {
        self.retired.clear();

        // The browser assigns the id, but the closure needs it first; a shared
        // cell bridges the two.
        let slot = std::rc::Rc::new(std::cell::Cell::new(TimerHandle(0)));
        let on_tick = self.on_tick;
        let tick_slot = slot.clone();
        let closure = Closure::<dyn FnMut()>::new(move || on_tick(tick_slot.get()));

        let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
        let id = match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout,
            ) {
            Ok(id) => id,
            Err(err) => {
                error!(?err, "setInterval failed");
                0
            }
        };

        // Browser ids are positive, so the fallback 0 never collides with a live one.
        let handle = TimerHandle(u64::try_from(id).unwrap_or_default());
        slot.set(handle);
        if handle.0 != 0 {
            self.active.insert(handle, closure);
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(closure) = self.active.remove(&handle) {
            if let Ok(id) = i32::try_from(handle.0) {
                self.window.clear_interval_with_handle(id);
            }
            self.retired.push(closure);
        }
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.contains_key(&handle)
    }
}

impl Drop for BrowserTimer {
    fn drop(&mut self) {
        for handle in self.active.keys() {
            if let Ok(id) = i32::try_from(handle.0) {
                self.window.clear_interval_with_handle(id);
            }
        }
    }
}
