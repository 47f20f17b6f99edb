pub mod color;
mod named;
pub mod recording;
pub mod traits;

// Re-export key types for convenient access
pub use color::{Color, DEFAULT_BACKGROUND};
pub use recording::{DrawCommand, RecordingSurface};
pub use traits::{ColorStop, RadialGradient, Surface};
