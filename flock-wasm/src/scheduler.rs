use std::cell::RefCell;
use std::rc::Rc;

use flock_core::Scheduler;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` behind the core [`Scheduler`] trait.
///
/// The frame closure lives in a shared slot so the closure itself can ask for
/// the next frame while it runs.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
    handle: Option<i32>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
            handle: None,
        }
    }

    pub fn set_callback(&self, callback: FrameCallback) {
        *self.callback.borrow_mut() = Some(callback);
    }

    /// Marks the pending frame as delivered.
    pub fn frame_fired(&mut self) {
        self.handle = None;
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancels the pending frame and drops the frame closure.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = self.window.cancel_animation_frame(handle) {
                console_log!("cancelAnimationFrame failed: {:?}", err);
            }
        }
        self.callback.borrow_mut().take();
    }
}

impl Scheduler for AnimationFrameScheduler {
    fn request_tick(&mut self) {
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(handle) => self.handle = Some(handle),
            Err(err) => console_log!("requestAnimationFrame failed: {:?}", err),
        }
    }
}
