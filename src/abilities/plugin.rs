//! Ability plugin - learned abilities, cooldowns and casting.

use bevy::prelude::*;

use super::systems;
use crate::core::CombatSet;

pub struct AbilityPlugin;

impl Plugin for AbilityPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::tick_ability_cooldowns.in_set(CombatSet::Timers))
            .add_systems(Update, systems::handle_ability_use.in_set(CombatSet::Decide));
    }
}
