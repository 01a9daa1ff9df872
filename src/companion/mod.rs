//! Companion module - AI allies that follow, guard, fight and heal.
//!
//! A standing order from the player wins; otherwise each companion acts on
//! its personality.

mod components;
mod data;
mod plugin;
mod systems;

pub use components::{decide, Companion, CompanionAction, CompanionOrder, CompanionTuning, Situation};
pub use data::{CompanionDefinition, CompanionTable, Personality};
pub use plugin::CompanionPlugin;
pub use systems::spawn_companion;
