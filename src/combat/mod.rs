//! Combat module - health pools, debuffs, damage resolution and projectiles.

mod buffs;
mod components;
mod damage;
mod plugin;
mod projectile;
mod status;
mod systems;
mod tuning;

pub use buffs::{is_stunned, Buffs};
pub use components::*;
pub use damage::*;
pub use plugin::CombatPlugin;
pub use projectile::{aim_direction, Projectile, ProjectileKind};
pub use status::*;
pub use tuning::CombatTuning;
