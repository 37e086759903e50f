use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Event, EventTarget, Window};

use crate::error::{DashboardError, Result};
use crate::scene::{FrameHandle, Host};

/// The animation-frame closure. It is filled in after the controller exists,
/// since the closure has to capture it.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// `requestAnimationFrame` scheduling and DOM listeners owned in one place so
/// teardown can undo all of it.
pub struct WebHost {
    window: Window,
    frame: FrameCallback,
    listeners: Vec<Listener>,
}

impl WebHost {
    pub fn new(window: Window, frame: FrameCallback) -> Self {
        Self {
            window,
            frame,
            listeners: Vec::new(),
        }
    }

    pub fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Result<()> {
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(DashboardError::js_err)?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }
}

impl Host for WebHost {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        let frame = self.frame.borrow();
        let callback = frame
            .as_ref()
            .ok_or_else(|| DashboardError::backend("frame callback not installed"))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(DashboardError::js_err)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {err:?}");
        }
    }

    fn detach_listeners(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.closure.as_ref().unchecked_ref())
            {
                log::warn!("removing {} listener failed: {err:?}", listener.kind);
            }
        }
    }
}
