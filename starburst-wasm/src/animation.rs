//! requestAnimationFrame loop with an explicit stop handle

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or("no global window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Runs a callback once per display frame until stopped or dropped
pub struct AnimationLoop {
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationLoop {
    /// Schedule `on_frame` for the next frame and every frame after it.
    pub fn start<F>(mut on_frame: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let running = Rc::new(Cell::new(true));
        let frame_id = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let still_running = running.clone();
        let pending = frame_id.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pending.set(None);
            if !still_running.get() {
                return;
            }

            on_frame();

            if let Some(callback) = next.borrow().as_ref() {
                match request_frame(callback) {
                    Ok(id) => pending.set(Some(id)),
                    Err(err) => {
                        console_log!("Animation stopped, could not schedule frame: {:?}", err);
                        still_running.set(false);
                    }
                }
            }
        }) as Box<dyn FnMut()>));

        let id = match callback.borrow().as_ref() {
            Some(first) => request_frame(first)?,
            None => return Err("animation callback missing".into()),
        };
        frame_id.set(Some(id));

        Ok(Self {
            running,
            frame_id,
            callback,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Cancel the pending frame; no further callbacks run.
    pub fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.frame_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
        // The closure holds a handle to its own cell
        self.callback.borrow_mut().take();
    }
}
