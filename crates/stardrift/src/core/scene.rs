use crate::components::nebula::Nebula;
use crate::components::star::Star;
use crate::systems::generate::{generate_nebulas, generate_stars};
use crate::systems::rng::RandomSource;

/// The current star and nebula sets.
///
/// Sets are only ever replaced wholesale by [`Scene::regenerate`]; frames
/// mutate per-entity numbers (alpha, draw order) but never add or remove.
pub struct Scene {
    stars: Vec<Star>,
    nebulas: Vec<Nebula>,
    /// Bumped on every regeneration.
    generation: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            stars: Vec::new(),
            nebulas: Vec::new(),
            generation: 0,
        }
    }

    /// Discard both sets and generate new ones for `width` x `height`.
    pub fn regenerate(
        &mut self,
        width: f32,
        height: f32,
        star_density: f32,
        rng: &mut dyn RandomSource,
    ) {
        self.stars = generate_stars(width, height, star_density, rng);
        self.nebulas = generate_nebulas(width, height, rng);
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn nebulas(&self) -> &[Nebula] {
        &self.nebulas
    }

    /// Mutable views of both sets, for the render passes.
    pub fn parts_mut(&mut self) -> (&mut [Star], &mut [Nebula]) {
        (&mut self.stars, &mut self.nebulas)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether no generation has produced anything yet.
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty() && self.nebulas.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
