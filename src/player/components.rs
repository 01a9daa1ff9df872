//! Player-related components.

use bevy::prelude::*;

use crate::combat::{OnHitDebuff, RegenRates};
use crate::items::ItemTable;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Character attributes that feed every derived stat.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    /// Melee attack power
    pub strength: u32,
    /// Mana pool and mana regeneration
    pub intelligence: u32,
    /// Stamina pool
    pub agility: u32,
    /// Health pool, health regeneration and defense
    pub vitality: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 10,
            intelligence: 10,
            agility: 10,
            vitality: 10,
        }
    }
}

impl Attributes {
    pub fn raise_all(&mut self, amount: u32) {
        self.strength += amount;
        self.intelligence += amount;
        self.agility += amount;
        self.vitality += amount;
    }

    pub fn derive(&self, gear: &EquipmentBonus) -> DerivedStats {
        DerivedStats {
            max_health: 50.0 + 5.0 * self.vitality as f32,
            max_mana: 50.0 + 5.0 * self.intelligence as f32,
            max_stamina: 100.0 + 3.0 * self.agility as f32,
            attack_power: 2.0 * self.strength as f32 + gear.attack,
            defense: self.vitality as f32 + gear.defense,
        }
    }

    pub fn regen_rates(&self) -> RegenRates {
        RegenRates {
            health: 0.1 + 0.01 * self.vitality as f32,
            mana: 1.0 + 0.1 * self.intelligence as f32,
        }
    }
}

/// Stats computed from attributes and gear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub max_health: f32,
    pub max_mana: f32,
    pub max_stamina: f32,
    pub attack_power: f32,
    pub defense: f32,
}

/// Equipped item ids.
#[derive(Component, Debug, Clone, Default)]
pub struct Equipment {
    pub weapon: Option<String>,
    pub armor: Vec<String>,
}

/// What the equipped items add up to.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentBonus {
    pub attack: f32,
    pub defense: f32,
    pub attack_speed: f32,
    pub pierce: u32,
    pub on_hit: Option<OnHitDebuff>,
}

impl Default for EquipmentBonus {
    fn default() -> Self {
        Self {
            attack: 0.0,
            defense: 0.0,
            attack_speed: 1.0,
            pierce: 0,
            on_hit: None,
        }
    }
}

impl Equipment {
    /// Sum the equipped items. Unknown ids, and items in the wrong slot,
    /// contribute nothing.
    pub fn bonus(&self, items: &ItemTable) -> EquipmentBonus {
        let mut bonus = EquipmentBonus::default();
        let weapon = self.weapon.as_deref().and_then(|id| items.get(id)).filter(|item| item.is_weapon());
        if let Some(weapon) = weapon {
            bonus.attack += weapon.attack;
            bonus.defense += weapon.defense;
            bonus.attack_speed = weapon.attack_speed;
            bonus.pierce = weapon.pierce;
            bonus.on_hit = weapon.on_hit;
        }
        for armor in self.armor.iter().filter_map(|id| items.get(id)).filter(|item| item.is_armor()) {
            bonus.attack += armor.attack;
            bonus.defense += armor.defense;
        }
        bonus
    }
}

/// Level, experience and accumulated rewards.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub gold: u32,
    pub inventory: Vec<String>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: 100,
            gold: 0,
            inventory: Vec::new(),
        }
    }
}

impl Progression {
    /// Add experience; returns how many levels were gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp_to_next > 0 && self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = self.xp_to_next * 3 / 2;
            gained += 1;
        }
        gained
    }
}
