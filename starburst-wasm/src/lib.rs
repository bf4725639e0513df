use std::cell::RefCell;
use std::rc::Rc;

use starburst_core::{MotionConfig, Palette, Position, Scene};
use starburst_shared::validate_speed;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlSelectElement, MouseEvent};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (crate::log(&format_args!($($t)*).to_string()))
}

pub mod animation;
pub mod controls;
pub mod renderer;

use animation::AnimationLoop;
use controls::Listener;
use renderer::{RenderError, WebGlRenderer};

fn document() -> Result<Document, RenderError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| RenderError::Js("no document".to_string()))
}

fn element_by_id<T: JsCast>(id: &str) -> Result<T, RenderError> {
    document()?
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
        .ok_or_else(|| RenderError::MissingElement(id.to_string()))
}

/// State shared by the frame loop and the DOM listeners
pub struct App {
    pub scene: Scene,
    pub palette: Palette,
    renderer: WebGlRenderer,
    canvas: HtmlCanvasElement,
}

impl App {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let renderer = WebGlRenderer::new(&canvas)?;
        let scene = Scene::new(
            canvas.width() as f32,
            canvas.height() as f32,
            MotionConfig::default(),
        );

        Ok(Self {
            scene,
            palette: Palette::default(),
            renderer,
            canvas,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn renderer(&self) -> &WebGlRenderer {
        &self.renderer
    }

    /// Retarget to a click given in client coordinates.
    pub fn click(&mut self, client_x: f32, client_y: f32) {
        let element: &Element = self.canvas.as_ref();
        let rect = element.get_bounding_client_rect();
        let origin = Position::new(rect.left() as f32, rect.top() as f32);
        self.scene
            .set_target(Position::surface_local(client_x, client_y, origin));
    }

    pub fn render(&mut self) -> Result<(), RenderError> {
        self.scene.render(&mut self.renderer, &self.palette)
    }

    /// One animation tick: move, then redraw.
    pub fn frame(&mut self) {
        self.scene.tick();
        if let Err(err) = self.render() {
            console_log!("Draw failed: {}", err);
        }
    }
}

/// A starburst following mouse clicks on a WebGL canvas
#[wasm_bindgen]
pub struct Starburst {
    app: Rc<RefCell<App>>,
    animation: Option<AnimationLoop>,
    listeners: Vec<Listener>,
}

impl Starburst {
    fn create(canvas_id: &str) -> Result<Starburst, RenderError> {
        let canvas = element_by_id::<HtmlCanvasElement>(canvas_id)
            .map_err(|_| RenderError::ContextUnavailable)?;
        let app = App::new(canvas)?;

        console_log!(
            "Starburst initialized on {}x{} canvas",
            app.scene.width,
            app.scene.height
        );

        Ok(Starburst {
            app: Rc::new(RefCell::new(app)),
            animation: None,
            listeners: Vec::new(),
        })
    }

    fn bind_all(&mut self, speed_id: &str, slide_id: &str) -> Result<(), RenderError> {
        let speed = element_by_id::<HtmlSelectElement>(speed_id)?;
        let slide = element_by_id::<HtmlSelectElement>(slide_id)?;

        self.listeners.push(controls::bind_speed(&self.app, speed)?);
        self.listeners.push(controls::bind_prevent_slide(&self.app, slide)?);
        Ok(())
    }

    pub fn app(&self) -> &Rc<RefCell<App>> {
        &self.app
    }
}

#[wasm_bindgen]
impl Starburst {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<Starburst, JsValue> {
        Ok(Self::create(canvas_id)?)
    }

    /// Start the frame loop. Does nothing if it is already running.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.is_running() {
            return Ok(());
        }

        let app = self.app.clone();
        self.animation = Some(AnimationLoop::start(move || app.borrow_mut().frame())?);
        console_log!("Animation started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.stop();
            console_log!("Animation stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.animation
            .as_ref()
            .map_or(false, AnimationLoop::is_running)
    }

    /// Advance one tick without drawing.
    pub fn tick(&mut self) {
        self.app.borrow_mut().scene.tick();
    }

    pub fn render(&self) -> Result<(), JsValue> {
        Ok(self.app.borrow_mut().render()?)
    }

    /// Set the target directly in canvas coordinates.
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.app.borrow_mut().scene.set_target(Position::new(x, y));
    }

    pub fn handle_mouse_down(&mut self, event: MouseEvent) {
        self.app
            .borrow_mut()
            .click(event.client_x() as f32, event.client_y() as f32);
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), JsValue> {
        let speed = validate_speed(speed).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.app.borrow_mut().scene.config.speed = speed;
        Ok(())
    }

    pub fn set_prevent_slide(&mut self, prevent_slide: bool) {
        self.app.borrow_mut().scene.config.prevent_slide = prevent_slide;
    }

    pub fn speed(&self) -> f32 {
        self.app.borrow().scene.config.speed
    }

    pub fn prevent_slide(&self) -> bool {
        self.app.borrow().scene.config.prevent_slide
    }

    pub fn x(&self) -> f32 {
        self.app.borrow().scene.current.x
    }

    pub fn y(&self) -> f32 {
        self.app.borrow().scene.current.y
    }

    pub fn target_x(&self) -> f32 {
        self.app.borrow().scene.target.x
    }

    pub fn target_y(&self) -> f32 {
        self.app.borrow().scene.target.y
    }

    /// Retarget on mouse presses over the canvas.
    pub fn bind_pointer(&mut self) -> Result<(), JsValue> {
        self.listeners.push(controls::bind_pointer(&self.app)?);
        Ok(())
    }

    /// Follow the speed and slide-prevention dropdowns, resetting both to
    /// their defaults first.
    pub fn bind_controls(&mut self, speed_id: &str, slide_id: &str) -> Result<(), JsValue> {
        Ok(self.bind_all(speed_id, slide_id)?)
    }
}

fn show_fallback(holder_id: &str, err: &RenderError) {
    match element_by_id::<Element>(holder_id) {
        Ok(holder) => holder.set_inner_html(&err.fallback_html()),
        Err(_) => console_log!("No #{} to report setup failure: {}", holder_id, err),
    }
}

/// Set everything up and start animating. On failure the holder element's
/// content is replaced with an explanation and the loop never starts.
#[wasm_bindgen]
pub fn mount(
    canvas_id: &str,
    holder_id: &str,
    speed_id: &str,
    slide_id: &str,
) -> Result<Starburst, JsValue> {
    let setup = || -> Result<Starburst, RenderError> {
        let mut starburst = Starburst::create(canvas_id)?;
        starburst.bind_all(speed_id, slide_id)?;
        starburst.listeners.push(controls::bind_pointer(&starburst.app)?);
        Ok(starburst)
    };

    let mut starburst = setup().map_err(|err| {
        console_log!("Setup failed: {}", err);
        show_fallback(holder_id, &err);
        JsValue::from(err)
    })?;
    starburst.start()?;

    Ok(starburst)
}
