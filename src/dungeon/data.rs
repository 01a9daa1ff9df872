//! Dungeon level table loaded from RON.

use std::collections::BTreeMap;

use serde::Deserialize;

/// One dungeon level: what spawns and what it pays out.
#[derive(Deserialize, Clone, Debug)]
pub struct DungeonLevel {
    pub name: String,
    /// Enemies in wave 1; each later wave adds a fixed step.
    pub base_enemy_count: u32,
    pub base_xp: u32,
    pub enemy_pool: Vec<String>,
    /// Extra enemy on every 3rd wave.
    pub elite: String,
    /// One of these joins every 5th wave.
    pub bosses: Vec<String>,
    /// Linked partner bosses on every 10th wave.
    pub twin_bosses: (String, String),
    pub reward_tier: u32,
    /// Hardest tier: wave XP is doubled.
    #[serde(default)]
    pub hardest: bool,
    /// Wave number -> guaranteed item on clearing that wave.
    #[serde(default)]
    pub milestone_rewards: BTreeMap<u32, String>,
}

/// Dungeon level number -> level data.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct DungeonTable {
    pub levels: BTreeMap<u32, DungeonLevel>,
}

impl DungeonTable {
    pub fn get(&self, level: u32) -> Option<&DungeonLevel> {
        self.levels.get(&level)
    }
}
