use std::f64::consts::TAU;

use glam::Vec2;
use log::warn;
use stardrift::{Color, RadialGradient, Surface};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Canvas 2D implementation of [`Surface`].
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        // Decorative layer: fill the container and never take input.
        let style = canvas.style();
        for (name, value) in [
            ("display", "block"),
            ("width", "100%"),
            ("height", "100%"),
            ("pointer-events", "none"),
        ] {
            if let Err(err) = style.set_property(name, value) {
                log_js_error("set canvas style", &err);
            }
        }
        Self { canvas, ctx }
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, pixel_width: u32, pixel_height: u32, scale: f32) {
        // Assigning either dimension resets the context, transform included.
        self.canvas.set_width(pixel_width);
        self.canvas.set_height(pixel_height);
        let s = scale as f64;
        if let Err(err) = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0) {
            log_js_error("set_transform", &err);
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient<'_>) {
        let (x, y) = (gradient.center.x as f64, gradient.center.y as f64);
        let r = gradient.radius.max(0.0) as f64;
        let fill = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
            Ok(g) => g,
            Err(err) => {
                log_js_error("create_radial_gradient", &err);
                return;
            }
        };
        for stop in gradient.stops {
            if let Err(err) = fill.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.css()) {
                log_js_error("add_color_stop", &err);
                return;
            }
        }
        self.ctx.set_fill_style_canvas_gradient(&fill);
        self.ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
    }
}

fn log_js_error(what: &str, err: &JsValue) {
    warn!("{} failed: {:?}", what, err);
}
