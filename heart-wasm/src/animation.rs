use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// The closure handed to `requestAnimationFrame` plus the pending request.
struct FrameSlot {
    closure: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    handle: Cell<Option<i32>>,
}

impl FrameSlot {
    fn request(&self, window: &Window) -> Result<(), JsValue> {
        if let Some(closure) = self.closure.borrow().as_ref() {
            let handle = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
            self.handle.set(Some(handle));
        }
        Ok(())
    }
}

/// Calls `on_frame` once per display refresh until dropped.
///
/// The callback is a plain `FnMut(timestamp_ms)`; re-arming the next frame
/// happens here, so callers never schedule themselves.
pub struct AnimationFrames {
    window: Window,
    slot: Rc<FrameSlot>,
}

impl AnimationFrames {
    pub fn start<F>(mut on_frame: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let window = web_sys::window().ok_or("no global window")?;
        let slot = Rc::new(FrameSlot {
            closure: RefCell::new(None),
            handle: Cell::new(None),
        });

        let weak: Weak<FrameSlot> = Rc::downgrade(&slot);
        let frame_window = window.clone();
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            on_frame(timestamp);

            let Some(slot) = weak.upgrade() else {
                return;
            };
            if let Err(err) = slot.request(&frame_window) {
                log::error!("animation stopped, cannot request next frame: {:?}", err);
                slot.handle.set(None);
            }
        }) as Box<dyn FnMut(f64)>);

        *slot.closure.borrow_mut() = Some(closure);
        slot.request(&window)?;

        Ok(Self { window, slot })
    }

    pub fn is_scheduled(&self) -> bool {
        self.slot.handle.get().is_some()
    }
}

impl Drop for AnimationFrames {
    fn drop(&mut self) {
        if let Some(handle) = self.slot.handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        self.slot.closure.borrow_mut().take();
    }
}
