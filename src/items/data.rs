//! Item and drop-table records loaded from RON.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::combat::OnHitDebuff;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Material,
    Quest,
    Misc,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// An item record. Optional stats default to neutral values at parse time.
#[derive(Deserialize, Clone, Debug)]
pub struct ItemDefinition {
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub rarity: Rarity,
    /// Reward tier; 0 means the item never drops as a wave reward.
    #[serde(default)]
    pub tier: u32,
    #[serde(default)]
    pub attack: f32,
    #[serde(default)]
    pub defense: f32,
    /// Divides the wielder's attack cooldown.
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f32,
    /// Distinct targets a projectile from this weapon may hit; 0 = no pierce.
    #[serde(default)]
    pub pierce: u32,
    #[serde(default)]
    pub on_hit: Option<OnHitDebuff>,
    /// Gold value.
    #[serde(default)]
    pub value: u32,
}

fn default_attack_speed() -> f32 {
    1.0
}

impl ItemDefinition {
    pub fn is_weapon(&self) -> bool {
        self.kind == ItemKind::Weapon
    }

    pub fn is_armor(&self) -> bool {
        self.kind == ItemKind::Armor
    }
}

/// Per-enemy-type drop roll: one chance, then one candidate picked uniformly.
#[derive(Deserialize, Clone, Debug)]
pub struct DropTable {
    pub drop_chance: f32,
    pub candidates: Vec<String>,
}

/// All item data.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ItemTable {
    pub items: BTreeMap<String, ItemDefinition>,
    #[serde(default)]
    pub drop_tables: BTreeMap<String, DropTable>,
}

impl ItemTable {
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn drop_table(&self, enemy_type: &str) -> Option<&DropTable> {
        self.drop_tables.get(enemy_type)
    }

    /// Ids of items in `tier`, in stable order.
    pub fn tier_items(&self, tier: u32) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(_, item)| item.tier == tier)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
