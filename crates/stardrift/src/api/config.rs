use serde::{Deserialize, Serialize};

use crate::error::StardriftError;
use crate::renderer::color::{Color, DEFAULT_BACKGROUND};

/// Tunables for a backdrop. Every field has a default, so `{}` is a valid
/// JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Logical square units per star (default: 1200).
    pub star_density: f32,
    /// Minimum gap between draws while the page is hidden (default: 100 ms).
    pub hidden_interval_ms: f64,
    /// Minimum gap between draws while visible (default: 16 ms).
    pub visible_interval_ms: f64,
    /// Tolerance applied to the visible interval so refresh jitter never
    /// drops a frame (default: 2 ms).
    pub frame_slack_ms: f64,
    /// Scroll distance, as a fraction of viewport height, over which nebulas
    /// fade in (default: 0.5).
    pub reveal_fraction: f32,
    /// Scroll-to-star parallax multiplier (default: 0.2).
    pub scroll_parallax: f32,
    /// Pointer-to-star parallax multiplier (default: 0.01).
    pub pointer_parallax: f32,
    /// Scroll-to-nebula parallax multiplier (default: 0.1).
    pub nebula_parallax: f32,
    /// Vertical bob amplitude of stars in logical units (default: 1.5).
    pub bob_amplitude: f32,
    /// How far outside the viewport a star may sit before it is culled
    /// (default: 50).
    pub cull_margin: f32,
    /// Background used when the theme value is unusable (default: `#05060f`).
    pub default_background: String,
    /// CSS custom property holding the theme background (default:
    /// `--background`).
    pub theme_variable: String,
    /// Fixed RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            star_density: 1200.0,
            hidden_interval_ms: 100.0,
            visible_interval_ms: 16.0,
            frame_slack_ms: 2.0,
            reveal_fraction: 0.5,
            scroll_parallax: 0.2,
            pointer_parallax: 0.01,
            nebula_parallax: 0.1,
            bob_amplitude: 1.5,
            cull_margin: 50.0,
            default_background: "#05060f".to_string(),
            theme_variable: "--background".to_string(),
            seed: None,
        }
    }
}

impl BackdropConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StardriftError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_star_density(mut self, density: f32) -> Self {
        self.star_density = density;
        self
    }

    pub fn validate(&self) -> Result<(), StardriftError> {
        if !(self.star_density.is_finite() && self.star_density > 0.0) {
            return Err(StardriftError::InvalidConfig(format!(
                "star_density must be positive, got {}",
                self.star_density
            )));
        }
        let intervals = [
            ("hidden_interval_ms", self.hidden_interval_ms),
            ("visible_interval_ms", self.visible_interval_ms),
            ("frame_slack_ms", self.frame_slack_ms),
        ];
        for (name, value) in intervals {
            if !(value.is_finite() && value >= 0.0) {
                return Err(StardriftError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(self.reveal_fraction.is_finite() && self.reveal_fraction > 0.0) {
            return Err(StardriftError::InvalidConfig(format!(
                "reveal_fraction must be positive, got {}",
                self.reveal_fraction
            )));
        }
        Color::parse(&self.default_background)?;
        Ok(())
    }

    /// The configured default background, or the built-in one.
    pub fn background_fallback(&self) -> Color {
        Color::parse(&self.default_background).unwrap_or(DEFAULT_BACKGROUND)
    }
}
