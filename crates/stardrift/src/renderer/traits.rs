//! Drawing surface contract.
//!
//! The compositing passes only ever need four primitives, which map one to
//! one onto the Canvas 2D API (`fillRect`, `arc` + `fill`,
//! `createRadialGradient`). Implemented by the web bridge's canvas surface
//! and by [`RecordingSurface`](super::recording::RecordingSurface).

use glam::Vec2;

use super::color::Color;

/// One stop of a radial gradient. `offset` is in 0..=1 from the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// A radial gradient filling the disc of `radius` around `center`.
#[derive(Debug, Clone, Copy)]
pub struct RadialGradient<'a> {
    pub center: Vec2,
    pub radius: f32,
    pub stops: &'a [ColorStop],
}

/// A drawing target sized in device pixels but addressed in logical units.
pub trait Surface {
    /// Resize the backing store to `pixel_width` x `pixel_height` and install
    /// a `scale` transform so later calls keep using logical coordinates.
    fn resize(&mut self, pixel_width: u32, pixel_height: u32, scale: f32);

    /// Fill an axis-aligned rectangle with a solid color.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Fill a disc with a solid color.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Fill a disc with a radial gradient.
    fn fill_radial_gradient(&mut self, gradient: &RadialGradient<'_>);
}
