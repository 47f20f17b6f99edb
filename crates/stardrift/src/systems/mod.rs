pub mod generate;
pub mod render;
pub mod rng;
