//! SkillMine combat core - a headless Bevy library for SkillMine's combat rules.
//!
//! Everything that decides who hits whom and what happens next lives here.
//! Rendering, input and UI are left to a presentation layer, which drives the
//! core through inbound events and listens to the outbound ones.
//!
//! # Architecture
//!
//! The crate is organized into plugins, each handling one aspect:
//!
//! - **Core**: Dungeon state, inbound/outbound events, scheduled tasks, RNG, combat log
//! - **Combat**: Damage pipeline, status effects, projectiles
//! - **Player**: Attributes, gear, regeneration, melee attacks, progression
//! - **Enemies**: Spawning, world spawn points, AI state machine, defeat rewards
//! - **Boss**: Phases, revive and enrage, partner avenge, ability scheduler
//! - **Dungeon**: Wave composition, scaling and clear rewards
//! - **Abilities**: Learned skills with mana costs, cooldowns and buffs
//! - **Companion**: Player-side allies driven by orders or personality
//!
//! Reference data (enemies, items, bosses, dungeons, abilities, companions)
//! lives in RON tables; see
//! [`data::CombatData`].

pub mod abilities;
pub mod boss;
pub mod combat;
pub mod companion;
pub mod core;
pub mod data;
pub mod dungeon;
pub mod enemies;
pub mod items;
pub mod player;

use std::path::PathBuf;

use bevy::prelude::*;

/// Main plugin that adds all sub-plugins.
///
/// Needs `StatesPlugin` and a `Time` source (`MinimalPlugins` or `DefaultPlugins`).
#[derive(Default)]
pub struct SkillMinePlugin {
    /// Load RON tables from here instead of the embedded ones.
    pub data_dir: Option<PathBuf>,
    /// Seed the combat RNG for reproducible runs.
    pub seed: Option<u64>,
}

impl Plugin for SkillMinePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .insert_resource(data::resolve_combat_data(self.data_dir.as_deref()));

        if let Some(seed) = self.seed {
            app.insert_resource(core::CombatRng::seeded(seed));
        }

        app.add_plugins((
            combat::CombatPlugin,
            player::PlayerPlugin,
            enemies::EnemyPlugin,
            boss::BossPlugin,
            dungeon::DungeonPlugin,
            abilities::AbilityPlugin,
            companion::CompanionPlugin,
        ));
    }
}
