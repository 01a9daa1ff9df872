//! Companion plugin - registers companion systems.

use bevy::prelude::*;

use super::components::CompanionTuning;
use super::systems;
use crate::abilities::handle_ability_use;
use crate::core::CombatSet;

/// Companion plugin - spawning, orders and behavior for player-side allies.
pub struct CompanionPlugin;

impl Plugin for CompanionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CompanionTuning>()
            .add_systems(Update, systems::regenerate_companions.in_set(CombatSet::Timers))
            // Casts requested this tick resolve this tick
            .add_systems(
                Update,
                (
                    systems::handle_spawn_companion,
                    systems::handle_companion_commands,
                    systems::companion_behavior,
                )
                    .chain()
                    .before(handle_ability_use)
                    .in_set(CombatSet::Decide),
            )
            .add_systems(Update, systems::handle_companion_deaths.in_set(CombatSet::Aftermath));
    }
}
