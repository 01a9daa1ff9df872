//! Player module - attributes, gear, progression and melee attacks.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::PlayerPlugin;
pub use systems::spawn_player;
