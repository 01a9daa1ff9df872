//! Shared random source for combat rolls (flee checks, loot, spawn jitter).

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seedable RNG so simulations and tests can be reproduced.
#[derive(Resource)]
pub struct CombatRng(pub StdRng);

impl CombatRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for CombatRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}
