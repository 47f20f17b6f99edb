//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic for a given seed.

/// Source of uniform random samples for scene generation.
///
/// Generators only ever ask for `[0, 1)` floats, so swapping in a scripted
/// source in tests (or a platform RNG on the web) is a one-method impl.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform sample in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform integer in `[min, max]` (inclusive).
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        let span = (max - min + 1) as f32;
        min + ((self.next_f32() * span) as u32).min(max - min)
    }

    /// Either `1.0` or `-1.0` with equal probability.
    fn sign(&mut self) -> f32 {
        if self.next_f32() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }
}

/// Seedable pseudo-random number generator (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the system clock. Used when no seed is configured.
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for Rng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits map exactly onto the f32 mantissa.
        (self.next_u64() >> 40) as f32 * (1.0 / 16_777_216.0)
    }
}
