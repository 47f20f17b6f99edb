use glam::Vec2;

use super::color::Color;
use super::traits::{ColorStop, RadialGradient, Surface};

/// A draw call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { pixel_width: u32, pixel_height: u32, scale: f32 },
    FillRect { x: f32, y: f32, width: f32, height: f32, color: Color },
    FillCircle { x: f32, y: f32, radius: f32, color: Color },
    RadialGradient { x: f32, y: f32, radius: f32, stops: Vec<ColorStop> },
}

/// In-memory surface that records every call instead of rasterizing.
///
/// Backs the headless host; tests read it to see which drawing paths ran.
#[derive(Debug)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    pixel_size: (u32, u32),
    scale: f32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
            pixel_size: (0, 0),
            scale: 1.0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        self.pixel_size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn gradient_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::RadialGradient { .. }))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, pixel_width: u32, pixel_height: u32, scale: f32) {
        self.pixel_size = (pixel_width, pixel_height);
        self.scale = scale;
        self.commands.push(DrawCommand::Resize { pixel_width, pixel_height, scale });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x: origin.x,
            y: origin.y,
            width: size.x,
            height: size.y,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            x: center.x,
            y: center.y,
            radius,
            color,
        });
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient<'_>) {
        self.commands.push(DrawCommand::RadialGradient {
            x: gradient.center.x,
            y: gradient.center.y,
            radius: gradient.radius,
            stops: gradient.stops.to_vec(),
        });
    }
}
