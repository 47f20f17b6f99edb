use glam::Vec2;
use log::debug;

/// Resolved drawing-surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Size in logical units (what all drawing uses).
    pub logical: Vec2,
    /// Backing-store size in device pixels.
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Device pixel ratio, installed as the surface transform.
    pub scale: f32,
}

impl SurfaceSize {
    /// `logical * dpr`, rounded to whole pixels.
    pub fn compute(logical: Vec2, device_pixel_ratio: f32) -> Self {
        let scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            logical,
            pixel_width: (logical.x * scale).round().max(0.0) as u32,
            pixel_height: (logical.y * scale).round().max(0.0) as u32,
            scale,
        }
    }
}

/// Result of a resize request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    /// New dimensions took effect; the scene must be regenerated.
    Applied(SurfaceSize),
    /// Container has no area yet; retried on a later tick.
    Deferred,
}

/// Tracks the current surface size and whether a resize is outstanding.
#[derive(Debug, Default)]
pub struct SurfaceSizing {
    current: Option<SurfaceSize>,
    /// A resize was requested but the container had no area.
    pending: bool,
    /// The surface has not yet received `current`.
    surface_stale: bool,
}

impl SurfaceSizing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute dimensions for a container of `logical` size.
    pub fn update(&mut self, logical: Vec2, device_pixel_ratio: f32) -> ResizeOutcome {
        let has_area = logical.x.is_finite()
            && logical.y.is_finite()
            && logical.x > 0.0
            && logical.y > 0.0;
        if !has_area {
            debug!("container is {}x{}; deferring resize", logical.x, logical.y);
            self.pending = true;
            return ResizeOutcome::Deferred;
        }

        let size = SurfaceSize::compute(logical, device_pixel_ratio);
        debug!(
            "surface {}x{} logical -> {}x{} px @ {}",
            logical.x, logical.y, size.pixel_width, size.pixel_height, size.scale
        );
        self.current = Some(size);
        self.pending = false;
        self.surface_stale = true;
        ResizeOutcome::Applied(size)
    }

    pub fn current(&self) -> Option<SurfaceSize> {
        self.current
    }

    /// Logical size, or zero before the first successful resize.
    pub fn logical(&self) -> Vec2 {
        self.current.map_or(Vec2::ZERO, |s| s.logical)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the surface still needs the current dimensions pushed to it.
    pub fn surface_stale(&self) -> bool {
        self.surface_stale
    }

    pub fn mark_surface_synced(&mut self) {
        self.surface_stale = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_device_pixel_ratio() {
        let s = SurfaceSize::compute(Vec2::new(800.0, 600.0), 2.0);
        assert_eq!((s.pixel_width, s.pixel_height), (1600, 1200));
        assert_eq!(s.scale, 2.0);
        assert_eq!(s.logical, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn fractional_ratio_rounds() {
        let s = SurfaceSize::compute(Vec2::new(333.0, 101.0), 1.5);
        assert_eq!((s.pixel_width, s.pixel_height), (500, 152));
    }

    #[test]
    fn bad_ratio_falls_back_to_one() {
        for dpr in [0.0, -2.0, f32::NAN] {
            let s = SurfaceSize::compute(Vec2::new(10.0, 10.0), dpr);
            assert_eq!(s.scale, 1.0);
            assert_eq!(s.pixel_width, 10);
        }
    }

    #[test]
    fn zero_size_defers_then_applies() {
        let mut sizing = SurfaceSizing::new();
        assert_eq!(sizing.update(Vec2::new(0.0, 600.0), 1.0), ResizeOutcome::Deferred);
        assert!(sizing.is_pending());
        assert_eq!(sizing.current(), None);
        assert_eq!(sizing.logical(), Vec2::ZERO);

        match sizing.update(Vec2::new(800.0, 600.0), 1.0) {
            ResizeOutcome::Applied(s) => assert_eq!(s.pixel_width, 800),
            other => panic!("expected Applied, got {:?}", other),
        }
        assert!(!sizing.is_pending());
        assert!(sizing.surface_stale());
        sizing.mark_surface_synced();
        assert!(!sizing.surface_stale());
    }

    #[test]
    fn deferral_keeps_previous_size() {
        let mut sizing = SurfaceSizing::new();
        sizing.update(Vec2::new(400.0, 300.0), 1.0);
        sizing.update(Vec2::ZERO, 1.0);
        assert!(sizing.is_pending());
        assert_eq!(sizing.logical(), Vec2::new(400.0, 300.0));
    }
}
