//! Dungeon module - level data, wave scaling and the wave director.

mod data;
mod director;
mod plugin;
mod systems;
mod waves;

pub use data::{DungeonLevel, DungeonTable};
pub use director::{DungeonArena, WaveDirector};
pub use plugin::DungeonPlugin;
pub use waves::{plan_wave, Milestone, WavePlan, WaveTuning};
