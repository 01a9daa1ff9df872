//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::spawning::{self, WorldSpawner};
use crate::core::{CombatSet, DungeonState};

/// Enemy plugin - handles enemy spawning, AI and defeat rewards.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<WorldSpawner>()
            .add_systems(
                Update,
                spawning::spawn_from_points
                    .in_set(CombatSet::Timers)
                    .run_if(in_state(DungeonState::Overworld)),
            )
            // Spawn and retarget requests land before AI looks at targets
            .add_systems(
                Update,
                (
                    spawning::handle_spawn_requests,
                    ai::handle_set_target,
                    ai::validate_targets,
                    ai::start_patrols,
                    ai::update_ai_states,
                    ai::move_enemies,
                    ai::enemy_attacks,
                )
                    .chain()
                    .in_set(CombatSet::Decide),
            )
            .add_systems(
                Update,
                (ai::flee_when_hurt, spawning::handle_enemy_deaths).in_set(CombatSet::Aftermath),
            );
    }
}
