use std::collections::BTreeMap;

use glam::Vec2;

use super::host::{FrameHandle, FrameScheduler, Host, ListenerId};
use crate::input::viewport::HostEventKind;
use crate::renderer::recording::RecordingSurface;

/// In-memory host: a settable clock, a recording surface, and bookkeeping
/// of every frame request and listener registration.
///
/// Frame callbacks are not invoked by the host itself. A driver (the
/// [`Ticker`](crate::core::ticker::Ticker), or a test) takes the pending
/// frame and calls `Backdrop::on_frame`, exactly as a browser would.
#[derive(Debug)]
pub struct HeadlessHost {
    now_ms: f64,
    size: Vec2,
    device_pixel_ratio: f32,
    theme_color: Option<String>,
    surface: Option<RecordingSurface>,
    /// Refuse to hand out the surface, simulating a lost context.
    surface_blocked: bool,
    /// Refuse frame requests, as a failing `requestAnimationFrame` would.
    refuse_frames: bool,

    next_id: u64,
    pending_frame: Option<FrameHandle>,
    frames_requested: usize,
    frames_cancelled: Vec<FrameHandle>,

    listeners: BTreeMap<ListenerId, HostEventKind>,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
}

impl HeadlessHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            now_ms: 0.0,
            size: Vec2::new(width, height),
            device_pixel_ratio: 1.0,
            theme_color: None,
            surface: Some(RecordingSurface::new()),
            surface_blocked: false,
            refuse_frames: false,
            next_id: 1,
            pending_frame: None,
            frames_requested: 0,
            frames_cancelled: Vec::new(),
            listeners: BTreeMap::new(),
            subscribe_calls: 0,
            unsubscribe_calls: 0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn with_theme_color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = Some(color.into());
        self
    }

    // -- Environment controls --

    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn set_theme_color(&mut self, color: Option<String>) {
        self.theme_color = color;
    }

    /// Make [`Host::surface`] return `None` until unblocked.
    pub fn set_surface_blocked(&mut self, blocked: bool) {
        self.surface_blocked = blocked;
    }

    /// Make [`FrameScheduler::request_frame`] return `None` until reset.
    pub fn set_refuse_frames(&mut self, refuse: bool) {
        self.refuse_frames = refuse;
    }

    /// Drop the surface for good, as when the canvas leaves the document.
    pub fn detach_surface(&mut self) {
        self.surface = None;
    }

    // -- Frame driver --

    /// Take the pending frame, if any. The caller is expected to invoke the
    /// frame callback next.
    pub fn take_pending_frame(&mut self) -> Option<FrameHandle> {
        self.pending_frame.take()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    // -- Spies --

    pub fn recording(&self) -> Option<&RecordingSurface> {
        self.surface.as_ref()
    }

    pub fn recording_mut(&mut self) -> Option<&mut RecordingSurface> {
        self.surface.as_mut()
    }

    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    pub fn frames_cancelled(&self) -> &[FrameHandle] {
        &self.frames_cancelled
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, kind: HostEventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl FrameScheduler for HeadlessHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse_frames {
            return None;
        }
        let handle = FrameHandle(self.next_id());
        self.pending_frame = Some(handle);
        self.frames_requested += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
        self.frames_cancelled.push(handle);
    }
}

impl Host for HeadlessHost {
    type Surface = RecordingSurface;

    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn subscribe(&mut self, kind: HostEventKind) -> Option<ListenerId> {
        self.subscribe_calls += 1;
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, kind);
        Some(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.unsubscribe_calls += 1;
        self.listeners.remove(&id);
    }

    fn container_size(&self) -> Vec2 {
        self.size
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn theme_color(&self) -> Option<String> {
        self.theme_color.clone()
    }

    fn surface(&mut self) -> Option<&mut RecordingSurface> {
        if self.surface_blocked {
            return None;
        }
        self.surface.as_mut()
    }
}
