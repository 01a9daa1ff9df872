//! Companion roster loaded from RON.

use std::collections::BTreeMap;

use serde::Deserialize;

/// What a companion gravitates to when nobody tells it what to do.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Personality {
    /// Goes for enemies.
    Aggressive,
    /// Stays at the owner's side; only fights what threatens them.
    Defensive,
    /// Keeps the owner healed.
    Supportive,
    /// Heals when needed, otherwise fights.
    Balanced,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CompanionDefinition {
    pub name: String,
    pub personality: Personality,
    pub max_health: f32,
    #[serde(default = "default_max_mana")]
    pub max_mana: f32,
    pub attack_power: f32,
    pub defense: f32,
    pub speed: f32,
    /// Ability ids from the ability table.
    #[serde(default)]
    pub abilities: Vec<String>,
}

fn default_max_mana() -> f32 {
    50.0
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct CompanionTable {
    pub companions: BTreeMap<String, CompanionDefinition>,
}

impl CompanionTable {
    pub fn get(&self, id: &str) -> Option<&CompanionDefinition> {
        self.companions.get(id)
    }
}
