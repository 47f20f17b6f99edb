/// Minimum-interval gate between completed draws.
///
/// Frame callbacks keep arriving at the host's cadence; the throttle decides
/// which of them actually draw. While hidden it enforces a hard floor. While
/// visible it allows a little slack so refresh jitter never costs a frame.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    /// Minimum gap between draws while visible, in ms.
    visible_interval: f64,
    /// Minimum gap between draws while hidden, in ms.
    hidden_interval: f64,
    /// Tolerance subtracted from the visible interval.
    slack: f64,
    /// Timestamp of the last completed draw.
    last_draw: Option<f64>,
}

impl FrameThrottle {
    pub fn new(visible_interval: f64, hidden_interval: f64, slack: f64) -> Self {
        Self {
            visible_interval,
            hidden_interval,
            slack,
            last_draw: None,
        }
    }

    /// Whether a draw at `now` is allowed.
    pub fn ready(&self, now: f64, visible: bool) -> bool {
        let Some(last) = self.last_draw else {
            return true;
        };
        let elapsed = now - last;
        if visible {
            elapsed + self.slack >= self.visible_interval
        } else {
            elapsed >= self.hidden_interval
        }
    }

    /// Record a completed draw at `now`.
    pub fn mark_drawn(&mut self, now: f64) {
        self.last_draw = Some(now);
    }

    pub fn last_draw(&self) -> Option<f64> {
        self.last_draw
    }

    /// Forget the last draw, so the next check passes.
    pub fn reset(&mut self) {
        self.last_draw = None;
    }
}
