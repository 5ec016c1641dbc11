//! `requestAnimationFrame` scheduling

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::Scheduler;

/// Slot holding the frame closure; filled in once the game exists
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Schedules frames on the browser's refresh
pub struct RafScheduler {
    window: web_sys::Window,
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new(window: web_sys::Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl Scheduler for RafScheduler {
    type Handle = i32;

    fn request_tick(&mut self) -> Option<i32> {
        let slot = self.callback.borrow();
        let Some(closure) = slot.as_ref() else {
            log::error!("Frame requested before the frame callback was installed");
            return None;
        };
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_tick(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame({}) failed: {:?}", handle, e);
        }
    }
}
