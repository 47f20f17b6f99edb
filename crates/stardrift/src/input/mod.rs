pub mod listeners;
pub mod viewport;

pub use listeners::ListenerSet;
pub use viewport::{HostEventKind, ViewportEvent, ViewportState};
