use glam::Vec2;

/// Host notifications the backdrop subscribes to.
///
/// Each kind is registered exactly once at mount and removed at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostEventKind {
    Scroll,
    PointerMove,
    VisibilityChange,
    ReducedMotionChange,
    Resize,
}

impl HostEventKind {
    pub const ALL: [HostEventKind; 5] = [
        Self::Scroll,
        Self::PointerMove,
        Self::VisibilityChange,
        Self::ReducedMotionChange,
        Self::Resize,
    ];
}

/// A notification delivered by the host, carrying the new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    /// Document scrolled to vertical offset `offset` (logical units).
    Scroll { offset: f32 },
    /// Pointer moved to viewport coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// Page became visible or hidden.
    Visibility { visible: bool },
    /// Reduced-motion preference changed.
    ReducedMotion { enabled: bool },
    /// Container size changed; the new size is read back from the host.
    Resize,
}

impl ViewportEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            Self::Scroll { .. } => HostEventKind::Scroll,
            Self::PointerMove { .. } => HostEventKind::PointerMove,
            Self::Visibility { .. } => HostEventKind::VisibilityChange,
            Self::ReducedMotion { .. } => HostEventKind::ReducedMotionChange,
            Self::Resize => HostEventKind::Resize,
        }
    }
}

/// Scroll, pointer, visibility and reduced-motion signals for one backdrop.
///
/// [`ViewportState::apply`] is the only writer; the render loop reads the
/// getters once per tick, so values are at most one tick stale.
#[derive(Debug, Clone)]
pub struct ViewportState {
    scroll: f32,
    pointer: Option<Vec2>,
    visible: bool,
    reduced_motion: bool,
}

impl ViewportState {
    pub fn new() -> Self {
        Self {
            scroll: 0.0,
            pointer: None,
            visible: true,
            reduced_motion: false,
        }
    }

    /// Apply a viewport notification. Returns false for events this state
    /// does not own (resize) and for non-finite coordinates.
    pub fn apply(&mut self, event: ViewportEvent) -> bool {
        match event {
            ViewportEvent::Scroll { offset } if offset.is_finite() => {
                self.scroll = offset;
                true
            }
            ViewportEvent::PointerMove { x, y } if x.is_finite() && y.is_finite() => {
                self.pointer = Some(Vec2::new(x, y));
                true
            }
            ViewportEvent::Visibility { visible } => {
                self.visible = visible;
                true
            }
            ViewportEvent::ReducedMotion { enabled } => {
                self.reduced_motion = enabled;
                true
            }
            _ => false,
        }
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Last pointer position, if the pointer has moved since mount.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Pointer offset from the center of a viewport of `size`. Zero until the
    /// pointer first moves.
    pub fn pointer_offset(&self, size: Vec2) -> Vec2 {
        self.pointer.map_or(Vec2::ZERO, |p| p - size * 0.5)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}
