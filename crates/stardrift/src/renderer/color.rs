//! Colors as the drawing surface consumes them.
//!
//! Stars and nebulas are described in HSL; the theme background arrives as a
//! CSS string. Both end up as a CSS color string on the canvas side, so
//! `Color` can always render itself with [`Color::css`].

use std::fmt;

use super::named;
use crate::error::StardriftError;

/// Background used when the theme value is missing or malformed.
pub const DEFAULT_BACKGROUND: Color = Color::Rgba {
    r: 5,
    g: 6,
    b: 15,
    a: 1.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// 8-bit RGB with alpha in 0..=1.
    Rgba { r: u8, g: u8, b: u8, a: f32 },
    /// Hue in degrees, saturation/lightness in percent, alpha in 0..=1.
    Hsla { h: f32, s: f32, l: f32, a: f32 },
}

impl Color {
    pub const TRANSPARENT: Color = Color::Rgba { r: 0, g: 0, b: 0, a: 0.0 };

    pub const fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Color::Hsla { h, s, l, a }
    }

    pub fn alpha(&self) -> f32 {
        match *self {
            Color::Rgba { a, .. } | Color::Hsla { a, .. } => a,
        }
    }

    /// CSS representation, always well-formed.
    pub fn css(&self) -> String {
        self.to_string()
    }

    /// Parse a CSS color: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`),
    /// `rgb()`/`rgba()`, `hsl()`/`hsla()` in comma or space syntax, or a
    /// named color.
    ///
    /// Surrounding whitespace is ignored (computed custom properties keep
    /// the leading space from the stylesheet).
    pub fn parse(value: &str) -> Result<Self, StardriftError> {
        let v = value.trim();
        let malformed = || StardriftError::MalformedColor(value.to_string());

        if let Some(hex) = v.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(malformed);
        }

        let lower = v.to_ascii_lowercase();
        let Some((func, body)) = lower.split_once('(') else {
            return parse_keyword(&lower).ok_or_else(malformed);
        };
        let body = body.strip_suffix(')').ok_or_else(malformed)?;
        let parts: Vec<&str> = body
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        let color = match func.trim_end() {
            "rgb" | "rgba" => parse_rgb(&parts),
            "hsl" | "hsla" => parse_hsl(&parts),
            _ => None,
        };
        color.ok_or_else(malformed)
    }

    /// Resolve a theme value, substituting `fallback` when it is missing or
    /// malformed. The flag reports whether a substitution happened.
    pub fn resolve_theme(value: Option<&str>, fallback: Color) -> (Color, bool) {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => match Color::parse(v) {
                Ok(c) => (c, false),
                Err(_) => (fallback, true),
            },
            _ => (fallback, true),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Rgba { r, g, b, a } => write!(f, "rgba({}, {}, {}, {:.3})", r, g, b, a),
            Color::Hsla { h, s, l, a } => {
                write!(f, "hsla({:.1}, {:.1}%, {:.1}%, {:.3})", h.rem_euclid(360.0), s, l, a)
            }
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::Rgba { r: nibble(0)?, g: nibble(1)?, b: nibble(2)?, a: 1.0 }),
        4 => Some(Color::Rgba {
            r: nibble(0)?,
            g: nibble(1)?,
            b: nibble(2)?,
            a: nibble(3)? as f32 / 255.0,
        }),
        6 => Some(Color::Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: 1.0 }),
        8 => Some(Color::Rgba {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)? as f32 / 255.0,
        }),
        _ => None,
    }
}

fn parse_keyword(name: &str) -> Option<Color> {
    if name == "transparent" {
        return Some(Color::TRANSPARENT);
    }
    let [r, g, b] = named::lookup(name)?;
    Some(Color::Rgba { r, g, b, a: 1.0 })
}

fn parse_rgb(parts: &[&str]) -> Option<Color> {
    let (channels, alpha) = split_alpha(parts)?;
    let channel = |p: &str| -> Option<u8> {
        let n = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? * 2.55,
            None => p.parse::<f32>().ok()?,
        };
        (0.0..=255.0).contains(&n).then(|| n.round() as u8)
    };
    Some(Color::Rgba {
        r: channel(channels[0])?,
        g: channel(channels[1])?,
        b: channel(channels[2])?,
        a: alpha,
    })
}

fn parse_hsl(parts: &[&str]) -> Option<Color> {
    let (channels, alpha) = split_alpha(parts)?;
    let percent = |p: &str| -> Option<f32> {
        let n: f32 = p.strip_suffix('%').unwrap_or(p).parse().ok()?;
        n.is_finite().then(|| n.clamp(0.0, 100.0))
    };
    Some(Color::Hsla {
        h: parse_hue(channels[0])?,
        s: percent(channels[1])?,
        l: percent(channels[2])?,
        a: alpha,
    })
}

/// Hue in degrees from a bare number or a `deg`/`turn`/`rad`/`grad` angle.
fn parse_hue(p: &str) -> Option<f32> {
    let (number, scale) = if let Some(n) = p.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = p.strip_suffix("turn") {
        (n, 360.0)
    } else if let Some(n) = p.strip_suffix("grad") {
        (n, 0.9)
    } else if let Some(n) = p.strip_suffix("rad") {
        (n, 180.0 / std::f32::consts::PI)
    } else {
        (p, 1.0)
    };
    let h = number.parse::<f32>().ok()? * scale;
    h.is_finite().then_some(h)
}

/// Split three channels from an optional fourth alpha component.
fn split_alpha<'a>(parts: &'a [&'a str]) -> Option<(&'a [&'a str], f32)> {
    match parts.len() {
        3 => Some((parts, 1.0)),
        4 => Some((&parts[..3], parse_alpha(parts[3])?)),
        _ => None,
    }
}

fn parse_alpha(p: &str) -> Option<f32> {
    let a = match p.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => p.parse::<f32>().ok()?,
    };
    (0.0..=1.0).contains(&a).then_some(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(
            Color::parse("#fff").unwrap(),
            Color::Rgba { r: 255, g: 255, b: 255, a: 1.0 }
        );
        assert_eq!(
            Color::parse(" #0a1b2c ").unwrap(),
            Color::Rgba { r: 10, g: 27, b: 44, a: 1.0 }
        );
        let c = Color::parse("#00000080").unwrap();
        assert!((c.alpha() - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_rgb_functions() {
        assert_eq!(
            Color::parse("rgb(1, 2, 3)").unwrap(),
            Color::Rgba { r: 1, g: 2, b: 3, a: 1.0 }
        );
        assert_eq!(
            Color::parse("RGBA(10,20,30,0.5)").unwrap(),
            Color::Rgba { r: 10, g: 20, b: 30, a: 0.5 }
        );
        assert_eq!(
            Color::parse("rgb(10 20 30 / 50%)").unwrap(),
            Color::Rgba { r: 10, g: 20, b: 30, a: 0.5 }
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in [
            "",
            "#12",
            "#ggg",
            "rgb(1,2)",
            "rgb(300, 0, 0)",
            "notacolor",
            "rgba(1,2,3,2)",
            "hsl(abc, 10%, 10%)",
            "hsl(10, 10%)",
            "lab(50% 40 59)",
            "rgb(1, 2, 3",
        ] {
            assert!(Color::parse(bad).is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn resolve_theme_substitutes_default() {
        let (c, substituted) = Color::resolve_theme(None, DEFAULT_BACKGROUND);
        assert_eq!(c, DEFAULT_BACKGROUND);
        assert!(substituted);

        let (c, substituted) = Color::resolve_theme(Some("   "), DEFAULT_BACKGROUND);
        assert_eq!(c, DEFAULT_BACKGROUND);
        assert!(substituted);

        let (c, substituted) = Color::resolve_theme(Some("not-a-color"), DEFAULT_BACKGROUND);
        assert_eq!(c, DEFAULT_BACKGROUND);
        assert!(substituted);

        let (c, substituted) = Color::resolve_theme(Some("#000"), DEFAULT_BACKGROUND);
        assert_eq!(c, Color::Rgba { r: 0, g: 0, b: 0, a: 1.0 });
        assert!(!substituted);
    }

    #[test]
    fn css_output_is_well_formed() {
        assert_eq!(Color::hsla(-30.0, 50.0, 40.0, 0.25).css(), "hsla(330.0, 50.0%, 40.0%, 0.250)");
        assert_eq!(DEFAULT_BACKGROUND.css(), "rgba(5, 6, 15, 1.000)");
    }

    #[test]
    fn parses_hsl_functions() {
        assert_eq!(Color::parse("hsl(222, 47%, 11%)").unwrap(), Color::hsla(222.0, 47.0, 11.0, 1.0));
        assert_eq!(Color::parse(" hsl(222 47% 11%)").unwrap(), Color::hsla(222.0, 47.0, 11.0, 1.0));
        assert_eq!(
            Color::parse("HSLA(120deg, 50%, 50%, 0.25)").unwrap(),
            Color::hsla(120.0, 50.0, 50.0, 0.25)
        );
        assert_eq!(
            Color::parse("hsl(0.5turn 100% 50% / 40%)").unwrap(),
            Color::hsla(180.0, 100.0, 50.0, 0.4)
        );
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(Color::parse("black").unwrap(), Color::Rgba { r: 0, g: 0, b: 0, a: 1.0 });
        assert_eq!(Color::parse(" White ").unwrap(), Color::Rgba { r: 255, g: 255, b: 255, a: 1.0 });
        assert_eq!(Color::parse("midnightblue").unwrap(), Color::Rgba { r: 25, g: 25, b: 112, a: 1.0 });
        assert_eq!(Color::parse("transparent").unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn hsl_and_named_themes_are_kept() {
        for (value, expected) in [
            ("hsl(222, 47%, 11%)", Color::hsla(222.0, 47.0, 11.0, 1.0)),
            ("hsl(222 47% 11%)", Color::hsla(222.0, 47.0, 11.0, 1.0)),
            ("black", Color::Rgba { r: 0, g: 0, b: 0, a: 1.0 }),
        ] {
            let (c, substituted) = Color::resolve_theme(Some(value), DEFAULT_BACKGROUND);
            assert_eq!(c, expected, "{}", value);
            assert!(!substituted, "{} should not fall back", value);
        }
    }
}
