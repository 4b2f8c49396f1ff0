// meridian_sim/src/context.rs

//! Per-episode simulation context handed to every node.

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::blackboard::FrameData;
use crate::world::WorldState;

/// Everything a node may touch during `on_run`: the blackboard, the world
/// model and the episode PRNG.
///
/// The PRNG is the only entropy source in the core; it is seeded once per
/// episode so that runs with the same scenario and seed are bit-identical.
pub struct SimContext {
    pub frame: FrameData,
    pub world: WorldState,
    pub rng: ChaCha8Rng,
}

impl SimContext {
    pub fn new(world: WorldState, seed: u64) -> Self {
        Self {
            frame: FrameData::new(),
            world,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}
