//! Per-frame compositing: background, nebulas, then stars.
//!
//! Passes only read viewport signals and write through [`Surface`]; the
//! only scene mutation is star alpha and nebula draw order.

use glam::Vec2;

use crate::api::config::BackdropConfig;
use crate::components::nebula::{depth_sort, Nebula};
use crate::components::star::Star;
use crate::core::scene::Scene;
use crate::input::viewport::ViewportState;
use crate::renderer::color::Color;
use crate::renderer::traits::{ColorStop, RadialGradient, Surface};

/// Alpha change per drawn frame per unit of star speed.
pub const TWINKLE_STEP: f32 = 0.01;
/// Glow radius as a multiple of the core radius.
pub const GLOW_SCALE: f32 = 3.0;
/// Inner glow radius as a fraction of the nebula radius.
pub const INNER_GLOW_SCALE: f32 = 0.45;
/// Texture layer radius as a fraction of the nebula radius.
pub const TEXTURE_SCALE: f32 = 0.6;
/// Nebulas fainter than this are not drawn at all.
pub const MIN_VISIBLE_ALPHA: f32 = 0.002;

/// Everything a pass needs to know about the current frame.
pub struct FrameContext<'a> {
    /// Wall-clock time in seconds.
    pub time: f32,
    /// Logical viewport size.
    pub size: Vec2,
    pub viewport: &'a ViewportState,
    pub config: &'a BackdropConfig,
}

/// What one composite call drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassCounts {
    pub nebulas: usize,
    pub stars: usize,
}

/// Scroll-driven fade-in for nebulas, in 0..=1.
pub fn reveal_progress(scroll: f32, viewport_height: f32, fraction: f32) -> f32 {
    let threshold = viewport_height * fraction;
    if !(threshold > 0.0) {
        return 1.0;
    }
    (scroll / threshold).clamp(0.0, 1.0)
}

/// Run every pass for one frame.
pub fn composite<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &mut Scene,
    frame: &FrameContext<'_>,
    background: Color,
) -> PassCounts {
    fill_background(surface, frame.size, background);
    let (stars, nebulas) = scene.parts_mut();
    let nebulas = draw_nebulas(surface, nebulas, frame);
    let stars = if frame.viewport.reduced_motion() {
        draw_stars_reduced(surface, stars, frame)
    } else {
        draw_stars(surface, stars, frame)
    };
    PassCounts { nebulas, stars }
}

/// Fill the whole viewport with the background color.
pub fn fill_background<S: Surface + ?Sized>(surface: &mut S, size: Vec2, color: Color) {
    surface.fill_rect(Vec2::ZERO, size, color);
}

/// Draw nebulas back to front. Returns how many were drawn.
pub fn draw_nebulas<S: Surface + ?Sized>(
    surface: &mut S,
    nebulas: &mut [Nebula],
    frame: &FrameContext<'_>,
) -> usize {
    let viewport = frame.viewport;
    let reveal = reveal_progress(viewport.scroll(), frame.size.y, frame.config.reveal_fraction);
    if reveal <= 0.0 {
        return 0;
    }

    depth_sort(nebulas);

    let reduced = viewport.reduced_motion();
    let scroll_shift = viewport.scroll() * frame.config.nebula_parallax;
    let mut drawn = 0;

    for nebula in nebulas.iter() {
        let alpha = nebula.opacity * reveal;
        if alpha < MIN_VISIBLE_ALPHA {
            continue;
        }

        let drift = if reduced { Vec2::ZERO } else { nebula.drift(frame.time) };
        let center = Vec2::new(nebula.pos.x, nebula.pos.y - scroll_shift) + drift;
        let r = nebula.radius;

        if center.y + r < 0.0
            || center.y - r > frame.size.y
            || center.x + r < 0.0
            || center.x - r > frame.size.x
        {
            continue;
        }

        let h = nebula.hue;
        let body = [
            ColorStop::new(0.0, Color::hsla(h, 70.0, 55.0, alpha)),
            ColorStop::new(0.35, Color::hsla(h + 15.0, 65.0, 45.0, alpha * 0.6)),
            ColorStop::new(0.7, Color::hsla(h + 30.0, 55.0, 35.0, alpha * 0.2)),
            ColorStop::new(1.0, Color::hsla(h + 30.0, 55.0, 35.0, 0.0)),
        ];
        surface.fill_radial_gradient(&RadialGradient { center, radius: r, stops: &body });

        let glow = [
            ColorStop::new(0.0, Color::hsla(h - 10.0, 80.0, 75.0, alpha * 0.5)),
            ColorStop::new(1.0, Color::hsla(h - 10.0, 80.0, 75.0, 0.0)),
        ];
        surface.fill_radial_gradient(&RadialGradient {
            center,
            radius: r * INNER_GLOW_SCALE,
            stops: &glow,
        });

        if !reduced {
            let offset = Vec2::new(nebula.phase.cos() * 0.25, nebula.phase.sin() * 0.2) * r;
            let texture = [
                ColorStop::new(0.0, Color::hsla(h + 40.0, 60.0, 60.0, alpha * 0.12)),
                ColorStop::new(0.6, Color::hsla(h + 40.0, 60.0, 50.0, alpha * 0.05)),
                ColorStop::new(1.0, Color::hsla(h + 40.0, 60.0, 50.0, 0.0)),
            ];
            surface.fill_radial_gradient(&RadialGradient {
                center: center + offset,
                radius: r * TEXTURE_SCALE,
                stops: &texture,
            });
        }

        drawn += 1;
    }
    drawn
}

/// On-screen position of a star with full parallax and bob applied.
pub fn star_screen_pos(star: &Star, frame: &FrameContext<'_>) -> Vec2 {
    let config = frame.config;
    let pointer = frame.viewport.pointer_offset(frame.size) * config.pointer_parallax * star.depth;
    let scroll = frame.viewport.scroll() * config.scroll_parallax * star.depth;
    let bob = (frame.time * star.speed + star.pos.x).sin() * config.bob_amplitude;
    Vec2::new(star.pos.x + pointer.x, star.anchor_y - scroll + pointer.y + bob)
}

/// Twinkle multiplier in [0.7, 1.0].
pub fn twinkle(star: &Star, time: f32) -> f32 {
    0.85 + 0.15 * (time * star.speed * 2.0 + star.anchor_y).sin()
}

fn culled(y: f32, frame: &FrameContext<'_>) -> bool {
    let margin = frame.config.cull_margin;
    y < -margin || y > frame.size.y + margin
}

/// Full-motion star pass: parallax, bob, twinkle, glow + core.
pub fn draw_stars<S: Surface + ?Sized>(
    surface: &mut S,
    stars: &mut [Star],
    frame: &FrameContext<'_>,
) -> usize {
    let mut drawn = 0;
    for star in stars.iter_mut() {
        star.oscillate(star.speed * TWINKLE_STEP);

        let pos = star_screen_pos(star, frame);
        if culled(pos.y, frame) {
            continue;
        }

        let alpha = star.alpha * twinkle(star, frame.time);
        let glow = [
            ColorStop::new(0.0, star.color(alpha * 0.6)),
            ColorStop::new(1.0, star.color(0.0)),
        ];
        surface.fill_radial_gradient(&RadialGradient {
            center: pos,
            radius: star.radius * GLOW_SCALE,
            stops: &glow,
        });
        surface.fill_circle(pos, star.radius, star.color(alpha));
        drawn += 1;
    }
    drawn
}

/// Reduced-motion star pass: scroll parallax only, flat circles.
pub fn draw_stars_reduced<S: Surface + ?Sized>(
    surface: &mut S,
    stars: &[Star],
    frame: &FrameContext<'_>,
) -> usize {
    let scroll = frame.viewport.scroll() * frame.config.scroll_parallax;
    let mut drawn = 0;
    for star in stars {
        let pos = Vec2::new(star.pos.x, star.anchor_y - scroll * star.depth);
        if culled(pos.y, frame) {
            continue;
        }
        surface.fill_circle(pos, star.radius, star.color(star.alpha));
        drawn += 1;
    }
    drawn
}
