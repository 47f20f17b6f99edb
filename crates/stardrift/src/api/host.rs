//! The environment a backdrop runs in.
//!
//! In a browser this is `window` plus a canvas; natively it is
//! [`HeadlessHost`](super::headless::HeadlessHost). Everything the backdrop
//! reads or schedules goes through these traits, so the loop, throttle and
//! teardown logic are identical on every target.

use glam::Vec2;

use crate::input::viewport::HostEventKind;
use crate::renderer::traits::Surface;

/// Handle of a pending frame callback (a `requestAnimationFrame` id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle of a registered notification listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Frame-callback primitive.
pub trait FrameScheduler {
    /// Ask for the backdrop's frame callback to run once on the next frame.
    /// `None` means the host refused and nothing was scheduled.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a pending frame callback. Cancelling a handle that already
    /// fired is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Everything else the backdrop needs from its environment.
pub trait Host: FrameScheduler {
    type Surface: Surface;

    /// Monotonic wall-clock time in milliseconds.
    fn now_ms(&self) -> f64;

    /// Register the backdrop for one kind of notification.
    fn subscribe(&mut self, kind: HostEventKind) -> Option<ListenerId>;

    /// Remove a listener previously returned by [`Host::subscribe`].
    fn unsubscribe(&mut self, id: ListenerId);

    /// Logical size of the container the surface fills.
    fn container_size(&self) -> Vec2;

    /// Device pixels per logical unit.
    fn device_pixel_ratio(&self) -> f32;

    /// Raw theme background value, if the host has one.
    fn theme_color(&self) -> Option<String>;

    /// The drawing surface, or `None` if it cannot be obtained right now.
    fn surface(&mut self) -> Option<&mut Self::Surface>;
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }
}

/// Lets a caller keep ownership of the host (and inspect it after the
/// backdrop is dropped).
impl<H: Host + ?Sized> Host for &mut H {
    type Surface = H::Surface;

    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }

    fn subscribe(&mut self, kind: HostEventKind) -> Option<ListenerId> {
        (**self).subscribe(kind)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        (**self).unsubscribe(id)
    }

    fn container_size(&self) -> Vec2 {
        (**self).container_size()
    }

    fn device_pixel_ratio(&self) -> f32 {
        (**self).device_pixel_ratio()
    }

    fn theme_color(&self) -> Option<String> {
        (**self).theme_color()
    }

    fn surface(&mut self) -> Option<&mut H::Surface> {
        (**self).surface()
    }
}
