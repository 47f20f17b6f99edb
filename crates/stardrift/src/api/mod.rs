pub mod backdrop;
pub mod config;
pub mod headless;
pub mod host;

pub use backdrop::{Backdrop, FrameStats};
pub use config::BackdropConfig;
pub use headless::HeadlessHost;
pub use host::{FrameHandle, FrameScheduler, Host, ListenerId};
