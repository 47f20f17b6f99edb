pub mod frame_loop;
pub mod resize;
pub mod scene;
pub mod ticker;
pub mod time;

pub use frame_loop::{LoopState, RenderLoop};
pub use resize::{ResizeOutcome, SurfaceSize, SurfaceSizing};
pub use scene::Scene;
pub use ticker::Ticker;
pub use time::FrameThrottle;
