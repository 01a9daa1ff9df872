//! Abilities module - castable skills for the player and companions.
//!
//! Each cast checks its own cooldown and the caster's mana before anything
//! happens; damage goes through the normal damage pipeline.

mod components;
mod data;
mod plugin;
mod systems;

pub use components::{AbilityBook, CastError};
pub use data::{AbilityDefinition, AbilityEffects, AbilityTable};
pub use plugin::AbilityPlugin;
pub use systems::handle_ability_use;
