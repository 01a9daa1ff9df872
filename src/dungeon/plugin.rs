//! Dungeon plugin - wave progression inside dungeons.

use bevy::prelude::*;

use super::director::{DungeonArena, WaveDirector};
use super::systems;
use super::waves::WaveTuning;
use crate::core::{CombatSet, DungeonState};

pub struct DungeonPlugin;

impl Plugin for DungeonPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<WaveTuning>()
            .init_resource::<WaveDirector>()
            .init_resource::<DungeonArena>()
            .add_systems(OnEnter(DungeonState::InDungeon), systems::open_dungeon)
            .add_systems(OnExit(DungeonState::InDungeon), systems::close_dungeon)
            .add_systems(
                Update,
                (systems::handle_enter_dungeon, systems::handle_exit_dungeon).in_set(CombatSet::Timers),
            )
            .add_systems(
                Update,
                systems::start_waves
                    .in_set(CombatSet::Decide)
                    .run_if(in_state(DungeonState::InDungeon)),
            )
            .add_systems(
                Update,
                systems::track_wave_clears
                    .in_set(CombatSet::Rewards)
                    .run_if(in_state(DungeonState::InDungeon)),
            );
    }
}
