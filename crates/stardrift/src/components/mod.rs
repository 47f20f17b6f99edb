pub mod nebula;
pub mod star;

pub use nebula::{depth_sort, Nebula, NebulaBand};
pub use star::{Oscillation, Star};
