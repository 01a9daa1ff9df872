//! Global events used for cross-system communication.
//!
//! Inbound events are how the presentation layer drives the combat core;
//! outbound events are plain data notifications it may render however it
//! likes. The core never reaches back into the presentation layer.

use bevy::prelude::*;

use crate::combat::{DamageKind, OnHitDebuff};
use crate::companion::CompanionOrder;
use crate::items::Loot;

// === Inbound ===

/// Request to spawn an enemy of a registered type.
#[derive(Event, Debug, Clone)]
pub struct SpawnEnemyEvent {
    pub enemy_type: String,
    pub position: Vec3,
    /// Replaces the definition's max health when set.
    pub health_override: Option<f32>,
    pub target: Option<Entity>,
}

/// Point an enemy at a new target, or clear its target with `None`.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetTargetEvent {
    pub enemy: Entity,
    pub target: Option<Entity>,
}

/// The player landed a melee hit on `target`.
///
/// Dropped if the player's attack cooldown is not ready.
#[derive(Event, Debug, Clone)]
pub struct PlayerAttackEvent {
    pub player: Entity,
    pub target: Entity,
    /// Attack power plus weapon damage, before weaken and defense.
    pub raw_damage: f32,
    pub debuffs: Vec<OnHitDebuff>,
}

/// Launch a projectile from a player-side weapon.
#[derive(Event, Debug, Clone)]
pub struct FireProjectileEvent {
    pub owner: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub damage: f32,
    /// Zero for a simple projectile.
    pub pierce_limit: u32,
    pub debuff: Option<OnHitDebuff>,
}

/// Cast a learned ability. Rejected casts (cooldown, mana, range, stun)
/// do nothing beyond a warning line in chat.
#[derive(Event, Debug, Clone)]
pub struct UseAbilityEvent {
    pub user: Entity,
    pub ability: String,
    /// `None` casts on the user.
    pub target: Option<Entity>,
}

/// Spawn a companion of a registered type next to its owner.
#[derive(Event, Debug, Clone)]
pub struct SpawnCompanionEvent {
    pub companion_type: String,
    pub owner: Entity,
    pub position: Vec3,
}

/// Give a companion a standing order, or `None` to let it act on its own.
#[derive(Event, Debug, Clone, Copy)]
pub struct CompanionCommandEvent {
    pub companion: Entity,
    pub order: Option<CompanionOrder>,
}

/// Enter the dungeon at `level`; starts wave 1.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnterDungeonEvent {
    pub level: u32,
}

/// Leave the dungeon; pending wave spawns are cancelled.
#[derive(Event, Debug, Clone, Copy)]
pub struct ExitDungeonEvent;

// === Internal ===

/// A pending hit, resolved against the target's defenses when applied.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    pub target: Entity,
    pub source: Option<Entity>,
    /// Attacker-side damage (weaken already applied).
    pub amount: f32,
    pub kind: DamageKind,
    /// Applied only if the target survives the hit.
    pub debuffs: Vec<OnHitDebuff>,
}

/// Start a dungeon wave. Sent on entry and by the scheduled next-wave task.
#[derive(Event, Debug, Clone, Copy)]
pub struct StartWaveEvent {
    pub level: u32,
    pub wave: u32,
}

// === Outbound ===

/// Final damage applied to a target.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealtEvent {
    pub source: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
}

/// Sent when a combatant dies (health reaches 0 for good).
///
/// Systems can listen for this to award XP, roll loot, trigger avenge, etc.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
    pub killed_by: Option<Entity>,
}

/// An enemy died and its rewards were rolled.
#[derive(Event, Debug, Clone)]
pub struct EnemyDefeatedEvent {
    pub entity: Entity,
    pub enemy_type: String,
    pub name: String,
    pub loot: Loot,
}

/// A boss escalated to a new phase.
#[derive(Event, Debug, Clone, Copy)]
pub struct PhaseChangedEvent {
    pub boss: Entity,
    pub phase: u8,
}

/// Style hint for a chat line. Rendering is up to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Combat,
    Warning,
    Boss,
    Loot,
}

/// A line for the chat / combat log.
#[derive(Event, Debug, Clone)]
pub struct ChatMessageEvent {
    pub text: String,
    pub style: MessageStyle,
}

impl ChatMessageEvent {
    pub fn new(text: impl Into<String>, style: MessageStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A dungeon wave spawned.
#[derive(Event, Debug, Clone, Copy)]
pub struct WaveStartedEvent {
    pub level: u32,
    pub wave: u32,
    pub enemy_count: u32,
}

/// Every enemy of a wave is dead and its rewards were granted.
#[derive(Event, Debug, Clone)]
pub struct WaveClearedEvent {
    pub level: u32,
    pub wave: u32,
    pub xp: u32,
    pub reward_items: Vec<String>,
}

/// An ability went off: cost paid, cooldown started.
#[derive(Event, Debug, Clone)]
pub struct AbilityUsedEvent {
    pub user: Entity,
    pub ability: String,
    pub target: Option<Entity>,
}

/// Sent when the player levels up.
#[derive(Event, Debug, Clone, Copy)]
pub struct LevelUpEvent {
    pub player: Entity,
    pub new_level: u32,
}
