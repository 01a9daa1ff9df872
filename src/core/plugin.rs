//! Core plugin that sets up states, events, scheduling and tick ordering.

use bevy::prelude::*;

use super::combat_log::{record_chat_messages, CombatLog};
use super::events::*;
use super::rng::CombatRng;
use super::scheduler::{run_scheduled_tasks, Scheduler};
use super::states::DungeonState;

/// Per-tick ordering of combat work.
///
/// Timers and cooldowns advance first, then AI and attacks decide, then
/// damage is applied. Deaths and loot settle in `Aftermath`; XP, levels and
/// wave progress consume those results in `Rewards`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Timers,
    Decide,
    Damage,
    Aftermath,
    Rewards,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// Requires `StatesPlugin` (or `DefaultPlugins`) to be present.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<DungeonState>()
            .init_resource::<Scheduler>()
            .init_resource::<CombatRng>()
            .init_resource::<CombatLog>()

            // Inbound
            .add_event::<SpawnEnemyEvent>()
            .add_event::<SetTargetEvent>()
            .add_event::<PlayerAttackEvent>()
            .add_event::<FireProjectileEvent>()
            .add_event::<UseAbilityEvent>()
            .add_event::<SpawnCompanionEvent>()
            .add_event::<CompanionCommandEvent>()
            .add_event::<EnterDungeonEvent>()
            .add_event::<ExitDungeonEvent>()

            // Internal
            .add_event::<DamageEvent>()
            .add_event::<StartWaveEvent>()

            // Outbound
            .add_event::<DamageDealtEvent>()
            .add_event::<DeathEvent>()
            .add_event::<EnemyDefeatedEvent>()
            .add_event::<PhaseChangedEvent>()
            .add_event::<ChatMessageEvent>()
            .add_event::<WaveStartedEvent>()
            .add_event::<WaveClearedEvent>()
            .add_event::<LevelUpEvent>()
            .add_event::<AbilityUsedEvent>()

            .configure_sets(
                Update,
                (
                    CombatSet::Timers,
                    CombatSet::Decide,
                    CombatSet::Damage,
                    CombatSet::Aftermath,
                    CombatSet::Rewards,
                )
                    .chain(),
            )
            .add_systems(Update, run_scheduled_tasks.in_set(CombatSet::Timers))
            // Runs last so it sees messages from every set this tick
            .add_systems(Update, record_chat_messages.after(CombatSet::Rewards));
    }
}
