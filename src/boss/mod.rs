//! Boss module - phase escalation, revive/enrage, avenge and special abilities.

mod abilities;
mod data;
mod phase;
mod plugin;
mod systems;

pub use abilities::BossAbilities;
pub use data::{AbilitySpec, BossAbility, BossProfile, BossTable};
pub use phase::{resolve_avenge, BossDamageReport, BossPartner, BossState, BossTuning};
pub use plugin::BossPlugin;
pub use systems::link_partners;
