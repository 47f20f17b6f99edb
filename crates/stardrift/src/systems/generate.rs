//! Procedural scene generation.
//!
//! Counts and ranges are the contract; exact positions are not. Both
//! generators accept any dimensions and never panic.

use std::f32::consts::TAU;

use glam::Vec2;

use super::rng::RandomSource;
use crate::components::nebula::{Nebula, NebulaBand};
use crate::components::star::{Oscillation, Star, ALPHA_CEILING};

/// Stars are scattered over this multiple of the height for scroll headroom.
pub const STAR_HEADROOM: f32 = 1.5;
pub const STAR_MIN_RADIUS: f32 = 0.3;
pub const STAR_RADIUS_SCALE: f32 = 1.5;
pub const STAR_MIN_DEPTH: f32 = 0.5;
pub const STAR_MAX_DEPTH: f32 = 1.0;
pub const STAR_MIN_SPEED: f32 = 0.4;
pub const STAR_MAX_SPEED: f32 = 1.6;

pub const NEBULA_MIN_COUNT: u32 = 4;
pub const NEBULA_MAX_COUNT: u32 = 6;

/// Upper bound on stars per scene. Default density reaches it at roughly
/// 6300 x 4700 logical units, well past any real display.
pub const MAX_STARS: usize = 25_000;

/// Number of stars for a surface: `floor(width * height / density)`, capped
/// at [`MAX_STARS`].
///
/// Zero, negative and non-finite inputs yield zero.
pub fn star_count(width: f32, height: f32, density: f32) -> usize {
    if !(width > 0.0 && height > 0.0 && density > 0.0) {
        return 0;
    }
    let area = width as f64 * height as f64;
    let count = (area / density as f64).floor();
    if !count.is_finite() {
        return 0;
    }
    count.min(MAX_STARS as f64) as usize
}

/// Build a fresh star set for a `width` x `height` surface.
pub fn generate_stars(
    width: f32,
    height: f32,
    density: f32,
    rng: &mut dyn RandomSource,
) -> Vec<Star> {
    let count = star_count(width, height, density);
    let span = height * STAR_HEADROOM;

    (0..count)
        .map(|_| {
            let x = rng.next_f32() * width;
            let y = rng.next_f32() * span;
            // 0 at the top of the scroll range, approaching 1 at the bottom.
            let depth_y = (y / span).clamp(0.0, 1.0);

            // Squaring biases toward tiny points with a few larger stars.
            let size = rng.next_f32();
            let radius = size * size * STAR_RADIUS_SCALE + STAR_MIN_RADIUS;

            // Brighter near the top, in (0, 1].
            let vertical = 1.0 - depth_y * 0.7;
            let variance = 0.5 + rng.next_f32() * 0.5;
            let base_alpha = (vertical * variance).clamp(f32::EPSILON, 1.0);

            let direction = Oscillation::from_sign(rng.sign());
            let speed = rng.range(STAR_MIN_SPEED, STAR_MAX_SPEED);
            let depth = rng.range(STAR_MIN_DEPTH, STAR_MAX_DEPTH);

            Star {
                pos: Vec2::new(x, y),
                anchor_y: y,
                radius,
                alpha: base_alpha.min(ALPHA_CEILING),
                base_alpha,
                direction,
                speed,
                depth,
                hue: 200.0 + depth_y * 60.0,
                saturation: 30.0 + depth_y * 40.0,
                lightness: 88.0 - depth_y * 18.0,
            }
        })
        .collect()
}

/// Build 4 to 6 nebulas, round-robin across the three vertical bands.
pub fn generate_nebulas(width: f32, height: f32, rng: &mut dyn RandomSource) -> Vec<Nebula> {
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
    let span = height * STAR_HEADROOM;
    let count = rng.range_inclusive(NEBULA_MIN_COUNT, NEBULA_MAX_COUNT) as usize;

    (0..count)
        .map(|i| {
            let band = NebulaBand::round_robin(i);
            let (top, bottom) = band.span();
            let (min_r, max_r) = band.radius_range();
            let (min_h, max_h) = band.hue_range();

            Nebula {
                pos: Vec2::new(
                    rng.next_f32() * width,
                    rng.range(top, bottom) * span,
                ),
                radius: rng.range(min_r, max_r),
                hue: rng.range(min_h, max_h),
                opacity: rng.range(0.25, 0.45),
                drift_speed: rng.range(0.05, 0.15),
                phase: rng.next_f32() * TAU,
                band,
            }
        })
        .collect()
}
