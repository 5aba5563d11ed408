use std::cell::RefCell;
use std::rc::Rc;

use flock_core::{ConfigError, Controller, Pointer, SimConfig, StopHandle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, Window};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}

pub mod canvas;
pub mod scheduler;

use canvas::CanvasSurface;
use scheduler::AnimationFrameScheduler;

type SharedController = Rc<RefCell<Controller<CanvasSurface, StdRng>>>;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// An event listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, callback);
    }
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn prefers_reduced_motion(window: &Window) -> bool {
    matches!(window.match_media(REDUCED_MOTION_QUERY), Ok(Some(query)) if query.matches())
}

/// Whether to run the frame loop or settle for a single static frame.
pub fn should_animate(config: &SimConfig, prefers_reduced_motion: bool) -> bool {
    !(config.respect_reduced_motion && prefers_reduced_motion)
}

fn config_error(err: ConfigError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Flocking background bound to a `<canvas>` element.
///
/// Construction sizes the canvas to the window, seeds the flocks, hooks up
/// resize and pointer listeners and starts the `requestAnimationFrame` loop.
#[wasm_bindgen]
pub struct FlockBackground {
    controller: SharedController,
    scheduler: Rc<RefCell<AnimationFrameScheduler>>,
    stop: StopHandle,
    listeners: Vec<Listener>,
    animating: bool,
}

#[wasm_bindgen]
impl FlockBackground {
    #[wasm_bindgen(constructor)]
    pub fn start(canvas_id: &str) -> Result<FlockBackground, JsValue> {
        Self::launch(canvas_id, SimConfig::default())
    }

    /// Same as the constructor, with a JSON document overriding config fields.
    pub fn start_with_config(
        canvas_id: &str,
        config_json: &str,
    ) -> Result<FlockBackground, JsValue> {
        let config = SimConfig::from_json(config_json).map_err(config_error)?;
        Self::launch(canvas_id, config)
    }

    /// Stops the loop before its next frame and detaches every listener.
    pub fn stop(&mut self) {
        self.stop.stop();
        self.scheduler.borrow_mut().cancel();
        self.listeners.clear();
        self.animating = false;
        console_log!("flock background stopped");
    }

    pub fn is_running(&self) -> bool {
        self.animating && !self.stop.is_stopped()
    }

    pub fn agent_count(&self) -> usize {
        self.controller.borrow().sim().agent_count()
    }

    /// Frames stepped since the flocks were created.
    pub fn frame(&self) -> u64 {
        self.controller.borrow().sim().frame()
    }
}

// The frame closure holds the scheduler and controller, so the loop must be
// ended here or it outlives the handle.
impl Drop for FlockBackground {
    fn drop(&mut self) {
        self.stop.stop();
        if let Ok(mut scheduler) = self.scheduler.try_borrow_mut() {
            scheduler.cancel();
        }
    }
}

impl FlockBackground {
    /// Handle to the flag that ends the frame loop.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn pointer(&self) -> Pointer {
        *self.controller.borrow().sim().pointer()
    }

    fn launch(canvas_id: &str, config: SimConfig) -> Result<FlockBackground, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let viewport = canvas::measure(&window)?;
        let surface = CanvasSurface::new(canvas)?;
        surface.apply_viewport(&viewport)?;

        let animate = should_animate(&config, prefers_reduced_motion(&window));
        let rng = StdRng::from_entropy();
        let mut controller = Controller::new(config, viewport, now_ms(&window), surface, rng)
            .map_err(config_error)?;
        controller.draw();

        console_log!(
            "flock background: {} agents on {}x{} @{}x",
            controller.sim().agent_count(),
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio
        );

        let stop = controller.stop_handle();
        let controller: SharedController = Rc::new(RefCell::new(controller));
        let scheduler = Rc::new(RefCell::new(AnimationFrameScheduler::new(window.clone())));

        let mut listeners = Vec::new();
        listeners.push(Self::on_resize(&window, &controller)?);
        listeners.extend(Self::on_pointer(&window, &document, &controller)?);

        if animate {
            let frame_controller = controller.clone();
            let frame_scheduler = scheduler.clone();
            let frame = Closure::wrap(Box::new(move |now: f64| {
                let mut scheduler = frame_scheduler.borrow_mut();
                scheduler.frame_fired();
                frame_controller.borrow_mut().tick(now, &mut *scheduler);
            }) as Box<dyn FnMut(f64)>);
            scheduler.borrow().set_callback(frame);
            controller.borrow_mut().start(&mut *scheduler.borrow_mut());
        } else {
            console_log!("reduced motion requested, drawing a single static frame");
        }

        Ok(FlockBackground {
            controller,
            scheduler,
            stop,
            listeners,
            animating: animate,
        })
    }

    fn on_resize(window: &Window, controller: &SharedController) -> Result<Listener, JsValue> {
        let resize_window = window.clone();
        let resize_controller = controller.clone();
        let callback = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let viewport = match canvas::measure(&resize_window) {
                Ok(viewport) => viewport,
                Err(err) => {
                    console_log!("resize measurement failed: {:?}", err);
                    return;
                }
            };
            let mut controller = resize_controller.borrow_mut();
            if let Err(err) = controller.surface().apply_viewport(&viewport) {
                console_log!("canvas resize failed: {:?}", err);
            }
            controller.resize(viewport, now_ms(&resize_window));
        }) as Box<dyn FnMut(web_sys::Event)>);

        Listener::attach(window.clone().into(), "resize", callback)
    }

    fn on_pointer(
        window: &Window,
        document: &web_sys::Document,
        controller: &SharedController,
    ) -> Result<Vec<Listener>, JsValue> {
        let move_controller = controller.clone();
        let on_move = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                move_controller
                    .borrow_mut()
                    .sim_mut()
                    .pointer_mut()
                    .move_to(f64::from(event.client_x()), f64::from(event.client_y()));
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let root = document.document_element().ok_or("no document element")?;

        let leave = |controller: SharedController| {
            Closure::wrap(Box::new(move |_: web_sys::Event| {
                controller.borrow_mut().sim_mut().pointer_mut().leave();
            }) as Box<dyn FnMut(web_sys::Event)>)
        };

        Ok(vec![
            Listener::attach(window.clone().into(), "mousemove", on_move)?,
            Listener::attach(root.into(), "mouseleave", leave(controller.clone()))?,
            Listener::attach(window.clone().into(), "blur", leave(controller.clone()))?,
        ])
    }
}
