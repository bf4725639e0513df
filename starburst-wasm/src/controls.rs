//! DOM wiring: pointer clicks and the two configuration dropdowns

use std::cell::RefCell;
use std::rc::Rc;

use starburst_shared::{
    parse_prevent_slide, parse_speed, DEFAULT_PREVENT_SLIDE_CHOICE, DEFAULT_SPEED_CHOICE,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlSelectElement, MouseEvent};

use crate::App;

/// An event listener that is removed again when dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;

        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Retarget the shape on every mouse press over the canvas.
pub fn bind_pointer(app: &Rc<RefCell<App>>) -> Result<Listener, JsValue> {
    let canvas: EventTarget = app.borrow().canvas().clone().into();
    let app = app.clone();

    Listener::new(&canvas, "mousedown", move |event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            app.borrow_mut()
                .click(mouse.client_x() as f32, mouse.client_y() as f32);
        }
    })
}

/// Reset the speed dropdown to its default and follow its changes.
pub fn bind_speed(app: &Rc<RefCell<App>>, select: HtmlSelectElement) -> Result<Listener, JsValue> {
    select.set_value(DEFAULT_SPEED_CHOICE);
    if let Ok(speed) = parse_speed(DEFAULT_SPEED_CHOICE) {
        app.borrow_mut().scene.config.speed = speed;
    }

    let app = app.clone();
    let source = select.clone();
    Listener::new(&select, "change", move |_| {
        let value = source.value();
        match parse_speed(&value) {
            Ok(speed) => {
                app.borrow_mut().scene.config.speed = speed;
                console_log!("Speed set to {}", speed);
            }
            Err(err) => console_log!("Ignoring speed choice: {}", err),
        }
    })
}

/// Reset the slide-prevention dropdown to off and follow its changes.
pub fn bind_prevent_slide(
    app: &Rc<RefCell<App>>,
    select: HtmlSelectElement,
) -> Result<Listener, JsValue> {
    select.set_value(DEFAULT_PREVENT_SLIDE_CHOICE);
    app.borrow_mut().scene.config.prevent_slide = parse_prevent_slide(DEFAULT_PREVENT_SLIDE_CHOICE);

    let app = app.clone();
    let source = select.clone();
    Listener::new(&select, "change", move |_| {
        let prevent_slide = parse_prevent_slide(&source.value());
        app.borrow_mut().scene.config.prevent_slide = prevent_slide;
        console_log!("Slide prevention {}", if prevent_slide { "on" } else { "off" });
    })
}
