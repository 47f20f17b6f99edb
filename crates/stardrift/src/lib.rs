pub mod api;
pub mod components;
pub mod core;
pub mod error;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::backdrop::{Backdrop, FrameStats};
pub use api::config::BackdropConfig;
pub use api::headless::HeadlessHost;
pub use api::host::{FrameHandle, FrameScheduler, Host, ListenerId};
pub use components::nebula::{Nebula, NebulaBand};
pub use components::star::{Oscillation, Star};
pub use crate::core::frame_loop::{LoopState, RenderLoop};
pub use crate::core::resize::{SurfaceSize, SurfaceSizing};
pub use crate::core::scene::Scene;
pub use crate::core::ticker::Ticker;
pub use crate::core::time::FrameThrottle;
pub use error::StardriftError;
pub use input::viewport::{HostEventKind, ViewportEvent, ViewportState};
pub use renderer::color::Color;
pub use renderer::recording::{DrawCommand, RecordingSurface};
pub use renderer::traits::{ColorStop, RadialGradient, Surface};
pub use systems::generate::{generate_nebulas, generate_stars, star_count, MAX_STARS};
pub use systems::render::PassCounts;
pub use systems::rng::{RandomSource, Rng};
