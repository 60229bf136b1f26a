use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Window;

/// A running `requestAnimationFrame` loop. `frame` receives the rAF timestamp
/// in milliseconds.
pub struct FrameLoop {
    window: Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(window: &Window, mut frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        // `callback` holds the frame closure so it can schedule itself again.
        // The closure is created first and then reaches itself through the
        // shared cell.
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let f = callback.clone();
        let next = handle.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            frame(now);

            // schedule next
            let scheduled = f
                .borrow()
                .as_ref()
                .and_then(|cb| win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            next.set(scheduled);
        }) as Box<dyn FnMut(f64)>));

        let first = match callback.borrow().as_ref() {
            Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref())?,
            None => return Err(JsValue::from_str("frame callback missing")),
        };
        handle.set(Some(first));

        Ok(Self {
            window: window.clone(),
            callback,
            handle,
        })
    }

    /// Cancels the pending frame and releases the callback.
    pub fn stop(&self) {
        if let Some(id) = self.handle.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::debug!("failed to cancel frame {id}: {err:?}");
            }
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
