use glam::Vec2;

use crate::renderer::color::Color;

/// Upper bound of the alpha oscillation band.
pub const ALPHA_CEILING: f32 = 0.9;
/// Lower bound of the alpha oscillation band, as a fraction of base alpha.
pub const ALPHA_FLOOR_FACTOR: f32 = 0.3;

/// Which way a star's alpha is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oscillation {
    Rising,
    Falling,
}

impl Oscillation {
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 {
            Self::Falling
        } else {
            Self::Rising
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Rising => 1.0,
            Self::Falling => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Rising => Self::Falling,
            Self::Falling => Self::Rising,
        }
    }
}

/// A single background star.
///
/// `pos.y` and `anchor_y` start equal; the render pass derives the on-screen
/// position from `anchor_y` each frame and never writes it back, so only
/// `alpha` and `direction` change between regenerations.
#[derive(Debug, Clone)]
pub struct Star {
    /// Logical position. `y` ranges over 1.5x the surface height.
    pub pos: Vec2,
    /// Pre-parallax vertical baseline.
    pub anchor_y: f32,
    pub radius: f32,
    /// Current alpha, kept inside [`Star::alpha_band`].
    pub alpha: f32,
    /// Brightness assigned at generation, in (0, 1].
    pub base_alpha: f32,
    pub direction: Oscillation,
    /// Oscillation and twinkle rate.
    pub speed: f32,
    /// Parallax depth factor in [0.5, 1.0].
    pub depth: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Star {
    /// Inclusive band `[0.3 * base_alpha, 0.9]` the current alpha lives in.
    pub fn alpha_band(&self) -> (f32, f32) {
        (self.base_alpha * ALPHA_FLOOR_FACTOR, ALPHA_CEILING)
    }

    /// Move alpha one step along its direction, flipping at the band edges.
    pub fn oscillate(&mut self, step: f32) {
        let (low, high) = self.alpha_band();
        self.alpha += self.direction.sign() * step;
        if self.alpha >= high {
            self.alpha = high;
            self.direction = Oscillation::Falling;
        } else if self.alpha <= low {
            self.alpha = low;
            self.direction = Oscillation::Rising;
        }
    }

    /// Color at the given alpha.
    pub fn color(&self, alpha: f32) -> Color {
        Color::hsla(self.hue, self.saturation, self.lightness, alpha)
    }
}
