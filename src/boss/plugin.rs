//! Boss plugin - phases, abilities and partner linkage.

use bevy::prelude::*;

use super::phase::BossTuning;
use super::systems;
use crate::core::CombatSet;

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<BossTuning>()
            .add_systems(
                Update,
                (systems::tick_boss_abilities, systems::sync_boss_stats).in_set(CombatSet::Timers),
            )
            .add_systems(Update, systems::cast_boss_abilities.in_set(CombatSet::Decide))
            .add_systems(Update, systems::avenge_fallen_partners.in_set(CombatSet::Aftermath));
    }
}
