//! Enemy definitions loaded from RON.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::components::EnemyStats;
use crate::combat::Combatant;

/// Behavior family of an enemy.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyArchetype {
    Melee,
    Ranged,
    Boss,
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub archetype: EnemyArchetype,
    pub max_health: f32,
    pub attack_power: f32,
    pub defense: f32,
    pub speed: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
    /// Ranged fire distance; also the boss special-ability range.
    #[serde(default = "default_projectile_range")]
    pub projectile_range: f32,
    pub attack_cooldown: f32,
    pub xp_reward: u32,
    #[serde(default)]
    pub gold_reward: (u32, u32),
}

fn default_projectile_range() -> f32 {
    12.0
}

impl EnemyDefinition {
    /// Convert to EnemyStats component.
    pub fn to_stats(&self) -> EnemyStats {
        EnemyStats {
            archetype: self.archetype,
            speed: self.speed,
            base_speed: self.speed,
            aggro_range: self.aggro_range,
            attack_range: self.attack_range,
            projectile_range: self.projectile_range,
            attack_cooldown: self.attack_cooldown,
            base_attack_cooldown: self.attack_cooldown,
        }
    }

    /// Fresh health pool, optionally with a different maximum.
    pub fn to_combatant(&self, health_override: Option<f32>) -> Combatant {
        Combatant::new(health_override.unwrap_or(self.max_health))
            .with_attack(self.attack_power)
            .with_defense(self.defense)
    }

    pub fn is_boss(&self) -> bool {
        self.archetype == EnemyArchetype::Boss
    }
}

/// All enemy definitions keyed by type id.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct EnemyTable {
    pub enemies: BTreeMap<String, EnemyDefinition>,
}

impl EnemyTable {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(enemy_type)
    }

    pub fn contains(&self, enemy_type: &str) -> bool {
        self.enemies.contains_key(enemy_type)
    }
}
