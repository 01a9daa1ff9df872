//! Loot rolls for enemy defeats and wave rewards.

use rand::seq::SliceRandom;
use rand::Rng;

use super::data::{DropTable, ItemTable};

/// Rewards produced by one defeat or wave clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loot {
    pub xp: u32,
    pub gold: u32,
    pub items: Vec<String>,
}

/// Roll a drop table: `drop_chance` to drop anything, then one candidate uniformly.
pub fn roll_drop(table: &DropTable, rng: &mut impl Rng) -> Option<String> {
    if rng.gen::<f32>() >= table.drop_chance {
        return None;
    }
    table.candidates.choose(rng).cloned()
}

/// Uniform gold in the inclusive range.
pub fn roll_gold((min, max): (u32, u32), rng: &mut impl Rng) -> u32 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

/// A random item of the given reward tier.
pub fn roll_tier_item(items: &ItemTable, tier: u32, rng: &mut impl Rng) -> Option<String> {
    items.tier_items(tier).choose(rng).map(|id| (*id).to_string())
}
