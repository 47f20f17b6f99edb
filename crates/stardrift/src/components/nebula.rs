use glam::Vec2;

/// Vertical band a nebula was generated into.
///
/// Bands are assigned round-robin and drawn in y order, so the band is only
/// a generation hint: it picks the size and hue ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NebulaBand {
    Top = 0,
    Middle = 1,
    Bottom = 2,
}

impl NebulaBand {
    /// Total number of bands.
    pub const COUNT: usize = 3;

    pub const ALL: [NebulaBand; 3] = [Self::Top, Self::Middle, Self::Bottom];

    /// Band for the `index`-th generated nebula.
    pub fn round_robin(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    /// Vertical span as fractions of the generation height.
    pub fn span(self) -> (f32, f32) {
        let i = self as u8 as f32;
        (i / Self::COUNT as f32, (i + 1.0) / Self::COUNT as f32)
    }

    /// Radius range in logical units.
    pub fn radius_range(self) -> (f32, f32) {
        match self {
            Self::Top => (180.0, 320.0),
            Self::Middle => (240.0, 420.0),
            Self::Bottom => (160.0, 280.0),
        }
    }

    /// Hue range in degrees.
    pub fn hue_range(self) -> (f32, f32) {
        match self {
            Self::Top => (210.0, 250.0),    // blue
            Self::Middle => (260.0, 300.0), // violet
            Self::Bottom => (300.0, 340.0), // magenta
        }
    }
}

/// A drifting cloud of colored glow.
#[derive(Debug, Clone)]
pub struct Nebula {
    pub pos: Vec2,
    pub radius: f32,
    pub hue: f32,
    /// Peak opacity before reveal scaling.
    pub opacity: f32,
    /// Angular speed of the drift functions, radians per second.
    pub drift_speed: f32,
    /// Phase offset so clouds do not drift in lockstep.
    pub phase: f32,
    pub band: NebulaBand,
}

impl Nebula {
    /// Maximum drift displacement in logical units.
    pub const DRIFT_AMPLITUDE: f32 = 24.0;

    /// Positional perturbation at time `t` (seconds).
    ///
    /// Two unrelated periodic functions per axis give a wandering path
    /// without integrating any velocity.
    pub fn drift(&self, t: f32) -> Vec2 {
        let a = t * self.drift_speed + self.phase;
        Vec2::new(
            a.sin() * Self::DRIFT_AMPLITUDE,
            (a * 0.7 + self.phase * 1.3).cos() * Self::DRIFT_AMPLITUDE * 0.6,
        )
    }
}

/// Sort back to front (smaller y first).
pub fn depth_sort(nebulas: &mut [Nebula]) {
    nebulas.sort_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
}
