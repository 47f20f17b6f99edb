use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use glam::Vec2;
use log::{debug, warn};
use stardrift::{
    Backdrop, FrameHandle, FrameScheduler, Host, HostEventKind, ListenerId, ViewportEvent,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, MediaQueryList,
    MouseEvent, Performance, Window,
};

use crate::canvas::CanvasSurface;

pub(crate) const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Shared slot the JS handle and every callback point at. Callbacks hold a
/// `Weak`, so the handle alone decides how long the backdrop lives.
pub type BackdropSlot = Rc<RefCell<Option<Backdrop<WebHost>>>>;

type Callback = Box<dyn FnMut(Event)>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Browser implementation of [`Host`]: `requestAnimationFrame`,
/// `addEventListener` and a Canvas 2D surface.
pub struct WebHost {
    window: Window,
    document: Document,
    performance: Option<Performance>,
    canvas: HtmlCanvasElement,
    surface: Option<CanvasSurface>,
    theme_variable: String,
    slot: Weak<RefCell<Option<Backdrop<WebHost>>>>,
    frame_callback: Closure<dyn FnMut(f64)>,
    listeners: HashMap<ListenerId, Listener>,
    next_listener: u64,
}

impl WebHost {
    pub fn new(
        window: Window,
        canvas: HtmlCanvasElement,
        theme_variable: String,
        slot: Weak<RefCell<Option<Backdrop<WebHost>>>>,
    ) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let performance = window.performance();

        let frame_slot = slot.clone();
        let frame_callback = Closure::wrap(Box::new(move |_timestamp: f64| {
            with_backdrop(&frame_slot, |b| b.on_frame());
        }) as Box<dyn FnMut(f64)>);

        Ok(Self {
            window,
            document,
            performance,
            canvas,
            surface: None,
            theme_variable,
            slot,
            frame_callback,
            listeners: HashMap::new(),
            next_listener: 1,
        })
    }

    /// Current values of the signals the listeners report, so a fresh mount
    /// starts from the page's real state instead of the defaults.
    pub fn initial_events(&self) -> Vec<ViewportEvent> {
        let mut events = vec![
            ViewportEvent::Visibility { visible: !self.document.hidden() },
            ViewportEvent::Scroll { offset: self.scroll_offset() },
        ];
        if let Some(query) = self.reduced_motion_query() {
            events.push(ViewportEvent::ReducedMotion { enabled: query.matches() });
        }
        events
    }

    fn scroll_offset(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn reduced_motion_query(&self) -> Option<MediaQueryList> {
        self.window.match_media(REDUCED_MOTION_QUERY).ok().flatten()
    }

    /// Build the target, DOM event name and callback for one kind.
    fn listener_parts(&self, kind: HostEventKind) -> Option<(EventTarget, &'static str, Callback)> {
        let slot = self.slot.clone();
        let parts: (EventTarget, &'static str, Callback) = match kind {
            HostEventKind::Scroll => {
                let window = self.window.clone();
                let callback: Callback = Box::new(move |_: Event| {
                    let offset = window.scroll_y().unwrap_or(0.0) as f32;
                    with_backdrop(&slot, |b| b.handle_event(ViewportEvent::Scroll { offset }));
                });
                (self.window.clone().into(), "scroll", callback)
            }
            HostEventKind::PointerMove => {
                let callback: Callback = Box::new(move |event: Event| {
                    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let (x, y) = (mouse.client_x() as f32, mouse.client_y() as f32);
                    with_backdrop(&slot, |b| b.handle_event(ViewportEvent::PointerMove { x, y }));
                });
                (self.window.clone().into(), "pointermove", callback)
            }
            HostEventKind::VisibilityChange => {
                let document = self.document.clone();
                let callback: Callback = Box::new(move |_: Event| {
                    let visible = !document.hidden();
                    with_backdrop(&slot, |b| b.handle_event(ViewportEvent::Visibility { visible }));
                });
                (self.document.clone().into(), "visibilitychange", callback)
            }
            HostEventKind::ReducedMotionChange => {
                let query = self.reduced_motion_query()?;
                let source = query.clone();
                let callback: Callback = Box::new(move |_: Event| {
                    let enabled = source.matches();
                    with_backdrop(&slot, |b| {
                        b.handle_event(ViewportEvent::ReducedMotion { enabled })
                    });
                });
                (query.into(), "change", callback)
            }
            HostEventKind::Resize => {
                let callback: Callback = Box::new(move |_: Event| {
                    with_backdrop(&slot, |b| b.handle_event(ViewportEvent::Resize));
                });
                (self.window.clone().into(), "resize", callback)
            }
        };
        Some(parts)
    }

    fn acquire_context(&self) -> Option<CanvasRenderingContext2d> {
        match self.canvas.get_context("2d") {
            Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
            Ok(None) => None,
            Err(err) => {
                warn!("canvas context unavailable: {:?}", err);
                None
            }
        }
    }
}

/// Run `f` on the backdrop if it still exists and is not already borrowed.
fn with_backdrop(
    slot: &Weak<RefCell<Option<Backdrop<WebHost>>>>,
    f: impl FnOnce(&mut Backdrop<WebHost>),
) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        debug!("backdrop busy; dropping re-entrant callback");
        return;
    };
    if let Some(backdrop) = guard.as_mut() {
        f(backdrop);
    }
}

impl FrameScheduler for WebHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        match self
            .window
            .request_animation_frame(self.frame_callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id as u64)),
            Err(err) => {
                warn!("requestAnimationFrame failed: {:?}", err);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0 as i32) {
            warn!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}

impl Host for WebHost {
    type Surface = CanvasSurface;

    fn now_ms(&self) -> f64 {
        self.performance.as_ref().map_or_else(js_sys::Date::now, Performance::now)
    }

    fn subscribe(&mut self, kind: HostEventKind) -> Option<ListenerId> {
        let (target, event, callback) = self.listener_parts(kind)?;
        let callback = Closure::wrap(callback);
        if let Err(err) =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            warn!("addEventListener({}) failed: {:?}", event, err);
            return None;
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, Listener { target, event, callback });
        Some(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        let Some(listener) = self.listeners.remove(&id) else {
            return;
        };
        if let Err(err) = listener
            .target
            .remove_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref())
        {
            warn!("removeEventListener({}) failed: {:?}", listener.event, err);
        }
    }

    fn container_size(&self) -> Vec2 {
        match self.canvas.parent_element() {
            Some(parent) => Vec2::new(parent.client_width() as f32, parent.client_height() as f32),
            None => Vec2::new(self.canvas.client_width() as f32, self.canvas.client_height() as f32),
        }
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.window.device_pixel_ratio() as f32
    }

    fn theme_color(&self) -> Option<String> {
        let root = self.document.document_element()?;
        let style = self.window.get_computed_style(&root).ok().flatten()?;
        style
            .get_property_value(&self.theme_variable)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn surface(&mut self) -> Option<&mut CanvasSurface> {
        if !self.canvas.is_connected() {
            return None;
        }
        if self.surface.is_none() {
            let ctx = self.acquire_context()?;
            self.surface = Some(CanvasSurface::new(self.canvas.clone(), ctx));
        }
        self.surface.as_mut()
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        // The backdrop unmounts before its host drops; anything left here was
        // registered outside that path.
        let ids: Vec<ListenerId> = self.listeners.keys().copied().collect();
        for id in ids {
            self.unsubscribe(id);
        }
    }
}
