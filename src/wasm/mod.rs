//! Browser entry point: wires the scene controller to the DOM.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{Document, Event, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::clock::SystemClock;
use crate::config::{DashboardConfig, Preset};
use crate::error::{DashboardError, Result};
use crate::scene::SceneController;

mod canvas;
mod host;
mod render;

pub use canvas::CanvasPainter;
pub use host::{FrameCallback, WebHost};
pub use render::WebGlBackend;

type Controller = SceneController<WebGlBackend, CanvasPainter, SystemClock, WebHost>;

thread_local! {
    static DASHBOARD: RefCell<Option<Dashboard>> = const { RefCell::new(None) };
}

struct Dashboard {
    controller: Rc<RefCell<Controller>>,
    frame: FrameCallback,
}

#[wasm_bindgen(start)]
pub fn main() -> std::result::Result<(), JsValue> {
    crate::init_logging();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas = document
        .get_element_by_id("c")
        .ok_or("canvas not found")?
        .dyn_into::<HtmlCanvasElement>()?;

    let config = discover_config(&document, &canvas)?;
    let dashboard = Dashboard::start(&window, &document, canvas, config)?;

    let previous = DASHBOARD.with(|slot| slot.borrow_mut().replace(dashboard));
    if let Some(previous) = previous {
        previous.teardown();
    }
    Ok(())
}

/// One-shot teardown for hot reload: stops the loop, detaches listeners and
/// releases the WebGL context.
#[wasm_bindgen]
pub fn teardown() {
    if let Some(dashboard) = DASHBOARD.with(|slot| slot.borrow_mut().take()) {
        dashboard.teardown();
    }
}

/// `<script id="dashboard-config" type="application/json">` wins, then the
/// canvas `data-preset` attribute, then the glow preset.
fn discover_config(document: &Document, canvas: &HtmlCanvasElement) -> Result<DashboardConfig> {
    if let Some(script) = document.get_element_by_id("dashboard-config") {
        log::info!("loading config from #dashboard-config");
        return DashboardConfig::from_json(&script.text_content().unwrap_or_default());
    }
    match canvas.get_attribute("data-preset") {
        Some(name) => Ok(name.parse::<Preset>()?.config()),
        None => Ok(DashboardConfig::default()),
    }
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}

fn with_controller(controller: &Rc<RefCell<Controller>>, f: impl FnOnce(&mut Controller)) {
    match controller.try_borrow_mut() {
        Ok(mut c) => f(&mut c),
        Err(_) => log::warn!("controller busy, event dropped"),
    }
}

impl Dashboard {
    fn start(
        window: &Window,
        document: &Document,
        canvas: HtmlCanvasElement,
        config: DashboardConfig,
    ) -> Result<Self> {
        let (width, height) = viewport_size(window);
        let painter = CanvasPainter::new(document)?;
        let backend = WebGlBackend::new(canvas.clone(), painter.canvas().clone())?;

        if canvas.parent_node().is_none() {
            document
                .body()
                .ok_or_else(|| DashboardError::backend("no body"))?
                .append_child(&canvas)
                .map_err(DashboardError::js_err)?;
        }

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let host = WebHost::new(window.clone(), frame.clone());
        let controller = Rc::new(RefCell::new(SceneController::new(
            config,
            width,
            height,
            window.device_pixel_ratio(),
            backend,
            painter,
            SystemClock::new(),
            host,
        )?));

        {
            let c = controller.clone();
            *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || match c.try_borrow_mut() {
                Ok(mut c) => {
                    if let Err(err) = c.frame() {
                        log::error!("frame failed: {err}");
                    }
                }
                Err(_) => log::error!("controller busy, render loop stalled"),
            }) as Box<dyn FnMut()>));
        }

        let dashboard = Self { controller, frame };
        if let Err(err) = dashboard.wire(window, &canvas) {
            log::error!("dashboard start failed: {err}");
            dashboard.teardown();
            return Err(err);
        }
        Ok(dashboard)
    }

    /// Attach listeners and schedule the first frame.
    fn wire(&self, window: &Window, canvas: &HtmlCanvasElement) -> Result<()> {
        let controller = &self.controller;
        let mut ctl = controller.borrow_mut();
        let host = ctl.host_mut();

        let c = controller.clone();
        let w = window.clone();
        host.listen(
            window.as_ref(),
            "resize",
            Closure::wrap(Box::new(move |_: Event| {
                let (width, height) = viewport_size(&w);
                with_controller(&c, |c| c.resize(width, height));
            }) as Box<dyn FnMut(Event)>),
        )?;

        let c = controller.clone();
        host.listen(
            window.as_ref(),
            "mousemove",
            Closure::wrap(Box::new(move |e: Event| {
                if let Some(e) = e.dyn_ref::<MouseEvent>() {
                    let (x, y) = (e.client_x() as f64, e.client_y() as f64);
                    with_controller(&c, |c| c.pointer_move(x, y));
                }
            }) as Box<dyn FnMut(Event)>),
        )?;

        let c = controller.clone();
        host.listen(
            canvas.as_ref(),
            "wheel",
            Closure::wrap(Box::new(move |e: Event| {
                if let Some(e) = e.dyn_ref::<WheelEvent>() {
                    let delta = e.delta_y();
                    with_controller(&c, |c| c.wheel(delta));
                }
            }) as Box<dyn FnMut(Event)>),
        )?;

        ctl.start()
    }

    fn teardown(self) {
        self.controller.borrow_mut().teardown();
        // Dropping the closure breaks the controller <-> callback cycle.
        self.frame.borrow_mut().take();
    }
}
