//! Player plugin - stats upkeep, attacks and progression.

use bevy::prelude::*;

use super::systems;
use crate::core::CombatSet;

/// Player plugin - derived stats, regeneration, melee attacks and rewards.
///
/// Spawning is left to the host through [`super::spawn_player`].
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app
            // Maxima must be current before regeneration clamps against them
            .add_systems(
                Update,
                (systems::sync_derived_stats, systems::regenerate)
                    .chain()
                    .in_set(CombatSet::Timers),
            )
            .add_systems(Update, systems::handle_player_attacks.in_set(CombatSet::Decide))
            .add_systems(Update, systems::handle_player_death.in_set(CombatSet::Aftermath))
            .add_systems(Update, systems::award_rewards.in_set(CombatSet::Rewards));
    }
}
