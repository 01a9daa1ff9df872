//! Castable ability records loaded from RON.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::combat::{AttackerClass, DebuffKind, Faction, OnHitDebuff};

/// Side effects of a cast. Durations default to five seconds.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct AbilityEffects {
    /// Stun length in seconds.
    #[serde(default)]
    pub stun: Option<f32>,
    /// Slow in percent.
    #[serde(default)]
    pub slow: Option<f32>,
    #[serde(default)]
    pub buff_attack: Option<f32>,
    #[serde(default)]
    pub buff_defense: Option<f32>,
    /// Damage the shield absorbs.
    #[serde(default)]
    pub shield: Option<f32>,
    /// Strip every debuff from the target.
    #[serde(default)]
    pub cleanse: bool,
    #[serde(default = "default_effect_duration")]
    pub duration: f32,
}

fn default_effect_duration() -> f32 {
    5.0
}

impl Default for AbilityEffects {
    fn default() -> Self {
        Self {
            stun: None,
            slow: None,
            buff_attack: None,
            buff_defense: None,
            shield: None,
            cleanse: false,
            duration: default_effect_duration(),
        }
    }
}

impl AbilityEffects {
    /// Debuffs carried on the damage itself, so they only land on survivors.
    pub fn on_hit(&self) -> Option<OnHitDebuff> {
        self.slow
            .map(|percent| OnHitDebuff::new(DebuffKind::Slow, percent, self.duration))
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct AbilityDefinition {
    pub name: String,
    /// Positive damages the target, negative heals it, zero is a pure buff.
    #[serde(default)]
    pub base_damage: f32,
    #[serde(default)]
    pub mana_cost: f32,
    pub cooldown: f32,
    /// Maximum cast distance; zero means self-cast only.
    #[serde(default)]
    pub range: f32,
    /// Resolved against ranged defense instead of melee.
    #[serde(default)]
    pub ranged: bool,
    /// Damage also lands on every hostile this close to the target.
    #[serde(default)]
    pub aoe_radius: f32,
    #[serde(default)]
    pub effects: AbilityEffects,
}

impl AbilityDefinition {
    pub fn is_attack(&self) -> bool {
        self.base_damage > 0.0
    }

    pub fn is_heal(&self) -> bool {
        self.base_damage < 0.0
    }

    /// Defense profile the damage is resolved with.
    pub fn attacker_class(&self, faction: Faction) -> AttackerClass {
        match (self.ranged, faction) {
            (true, _) => AttackerClass::Ranged,
            (false, Faction::Enemy) => AttackerClass::EnemyMelee,
            (false, _) => AttackerClass::PlayerMelee,
        }
    }
}

/// Ability id -> definition.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct AbilityTable {
    pub abilities: BTreeMap<String, AbilityDefinition>,
}

impl AbilityTable {
    pub fn get(&self, id: &str) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.abilities.contains_key(id)
    }
}
