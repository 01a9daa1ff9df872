//! Enemies module - enemy entities, AI, and spawning.

mod ai;
mod components;
mod data;
mod plugin;
mod spawning;

pub use ai::{horizontal_distance, next_state};
pub use components::*;
pub use data::{EnemyArchetype, EnemyDefinition, EnemyTable};
pub use plugin::EnemyPlugin;
pub use spawning::{spawn_enemy, WorldSpawner};
