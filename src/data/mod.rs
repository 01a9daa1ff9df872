//! Read-only combat data: enemies, items, boss capabilities, dungeons,
//! castable abilities and companions.
//!
//! The tables ship embedded in the binary and can be overridden by a
//! directory holding files with the same names.

mod error;

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::de::DeserializeOwned;

pub use error::{DataLoadError, SpawnError};

use crate::abilities::AbilityTable;
use crate::boss::{BossAbility, BossTable};
use crate::companion::CompanionTable;
use crate::dungeon::DungeonTable;
use crate::enemies::EnemyTable;
use crate::items::ItemTable;

const ENEMIES_FILE: &str = "enemies.ron";
const ITEMS_FILE: &str = "items.ron";
const BOSSES_FILE: &str = "bosses.ron";
const DUNGEONS_FILE: &str = "dungeons.ron";
const ABILITIES_FILE: &str = "abilities.ron";
const COMPANIONS_FILE: &str = "companions.ron";

const BUILTIN_ENEMIES: &str = include_str!("../../assets/data/enemies.ron");
const BUILTIN_ITEMS: &str = include_str!("../../assets/data/items.ron");
const BUILTIN_BOSSES: &str = include_str!("../../assets/data/bosses.ron");
const BUILTIN_DUNGEONS: &str = include_str!("../../assets/data/dungeons.ron");
const BUILTIN_ABILITIES: &str = include_str!("../../assets/data/abilities.ron");
const BUILTIN_COMPANIONS: &str = include_str!("../../assets/data/companions.ron");

/// Resource holding every data table.
#[derive(Resource, Clone, Debug, Default)]
pub struct CombatData {
    pub enemies: EnemyTable,
    pub items: ItemTable,
    pub bosses: BossTable,
    pub dungeons: DungeonTable,
    pub abilities: AbilityTable,
    pub companions: CompanionTable,
}

impl CombatData {
    /// Parse the tables embedded at compile time.
    pub fn builtin() -> Result<Self, DataLoadError> {
        let data = Self {
            enemies: parse(BUILTIN_ENEMIES, ENEMIES_FILE)?,
            items: parse(BUILTIN_ITEMS, ITEMS_FILE)?,
            bosses: parse(BUILTIN_BOSSES, BOSSES_FILE)?,
            dungeons: parse(BUILTIN_DUNGEONS, DUNGEONS_FILE)?,
            abilities: parse(BUILTIN_ABILITIES, ABILITIES_FILE)?,
            companions: parse(BUILTIN_COMPANIONS, COMPANIONS_FILE)?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Load every table from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, DataLoadError> {
        let data = Self {
            enemies: load_file(&dir.join(ENEMIES_FILE))?,
            items: load_file(&dir.join(ITEMS_FILE))?,
            bosses: load_file(&dir.join(BOSSES_FILE))?,
            dungeons: load_file(&dir.join(DUNGEONS_FILE))?,
            abilities: load_file(&dir.join(ABILITIES_FILE))?,
            companions: load_file(&dir.join(COMPANIONS_FILE))?,
        };
        data.validate()?;
        info!(
            "Loaded {} enemy, {} item, {} dungeon and {} ability definitions from {:?}",
            data.enemies.enemies.len(),
            data.items.items.len(),
            data.dungeons.levels.len(),
            data.abilities.abilities.len(),
            dir
        );
        Ok(data)
    }

    /// Check every cross-table reference and the numeric ranges that matter.
    pub fn validate(&self) -> Result<(), DataLoadError> {
        for (id, enemy) in &self.enemies.enemies {
            if !(enemy.max_health > 0.0) {
                return Err(DataLoadError::InvalidValue {
                    record: id.clone(),
                    details: format!("max_health must be positive, got {}", enemy.max_health),
                });
            }
            if enemy.gold_reward.0 > enemy.gold_reward.1 {
                return Err(DataLoadError::InvalidValue {
                    record: id.clone(),
                    details: "gold_reward minimum exceeds maximum".to_string(),
                });
            }
            if enemy.is_boss() && self.bosses.get(id).is_none() {
                return Err(unknown("enemies", id, id));
            }
        }

        for (enemy_type, table) in &self.items.drop_tables {
            if !self.enemies.contains(enemy_type) {
                return Err(unknown("drop_tables", enemy_type, enemy_type));
            }
            if !(0.0..=1.0).contains(&table.drop_chance) {
                return Err(DataLoadError::InvalidValue {
                    record: enemy_type.clone(),
                    details: format!("drop_chance {} outside 0..=1", table.drop_chance),
                });
            }
            for candidate in &table.candidates {
                if self.items.get(candidate).is_none() {
                    return Err(unknown("drop_tables", enemy_type, candidate));
                }
            }
        }

        for boss_type in self.bosses.profiles.keys() {
            if !self.enemies.contains(boss_type) {
                return Err(unknown("bosses", boss_type, boss_type));
            }
        }

        // Fallback specs are checked too; they stand in for missing entries.
        for ability in BossAbility::ALL {
            let spec = self.bosses.ability(ability);
            if !(spec.cooldown > 0.0) || !(spec.max_range >= spec.min_range) {
                return Err(DataLoadError::InvalidValue {
                    record: format!("{:?}", ability),
                    details: "cooldown must be positive and max_range at least min_range".to_string(),
                });
            }
        }

        for (level, dungeon) in &self.dungeons.levels {
            let record = level.to_string();
            let (first, second) = &dungeon.twin_bosses;
            let spawned = dungeon
                .enemy_pool
                .iter()
                .chain(&dungeon.bosses)
                .chain([&dungeon.elite, first, second]);
            for enemy_type in spawned {
                if !self.enemies.contains(enemy_type) {
                    return Err(unknown("dungeons", &record, enemy_type));
                }
            }
            if dungeon.base_enemy_count == 0 {
                return Err(DataLoadError::InvalidValue {
                    record,
                    details: "base_enemy_count must be at least 1".to_string(),
                });
            }
            if dungeon.enemy_pool.is_empty() || dungeon.bosses.is_empty() {
                return Err(DataLoadError::InvalidValue {
                    record,
                    details: "enemy_pool and bosses must not be empty".to_string(),
                });
            }
            for item in dungeon.milestone_rewards.values() {
                if self.items.get(item).is_none() {
                    return Err(unknown("dungeons", &record, item));
                }
            }
        }

        for (id, ability) in &self.abilities.abilities {
            if !(ability.cooldown > 0.0) || !(ability.mana_cost >= 0.0) {
                return Err(DataLoadError::InvalidValue {
                    record: id.clone(),
                    details: "cooldown must be positive and mana_cost non-negative".to_string(),
                });
            }
        }

        for (id, companion) in &self.companions.companions {
            if !(companion.max_health > 0.0) {
                return Err(DataLoadError::InvalidValue {
                    record: id.clone(),
                    details: format!("max_health must be positive, got {}", companion.max_health),
                });
            }
            for ability in &companion.abilities {
                if !self.abilities.contains(ability) {
                    return Err(unknown("companions", id, ability));
                }
            }
        }

        Ok(())
    }
}

fn unknown(table: &'static str, record: &str, reference: &str) -> DataLoadError {
    DataLoadError::UnknownReference {
        table,
        record: record.to_string(),
        reference: reference.to_string(),
    }
}

fn parse<T: DeserializeOwned>(source: &str, path: &str) -> Result<T, DataLoadError> {
    ron::from_str(source).map_err(|e| DataLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    parse(&contents, &display)
}

/// Resolve the data tables for the app, falling back to the embedded ones.
pub fn resolve_combat_data(dir: Option<&Path>) -> CombatData {
    if let Some(dir) = dir {
        match CombatData::load_from_dir(dir) {
            Ok(data) => return data,
            Err(e) => error!("Failed to load combat data from {:?}: {}", dir, e),
        }
    }
    match CombatData::builtin() {
        Ok(data) => data,
        Err(e) => {
            error!("Embedded combat data is invalid: {}", e);
            CombatData::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_parse_and_validate() {
        let data = CombatData::builtin().expect("builtin data");
        assert!(data.enemies.get("goblin").is_some());
        assert!(data.items.get("frost_bow").is_some_and(|bow| bow.pierce == 3));
        assert!(data.bosses.get("lich_lord").is_some());
        assert_eq!(data.dungeons.levels.len(), 3);
        assert!(data.abilities.get("heal").is_some_and(|heal| heal.is_heal()));
        assert!(data.companions.get("knight").is_some());
    }

    #[test]
    fn original_roster_stats_survive() {
        let data = CombatData::builtin().expect("builtin data");
        let troll = data.enemies.get("troll").expect("troll");
        assert_eq!(troll.max_health, 150.0);
        assert_eq!(troll.gold_reward, (20, 50));
        let slime_drops = data.items.drop_table("slime").expect("slime drops");
        assert_eq!(slime_drops.drop_chance, 0.5);
    }

    #[test]
    fn dangling_drop_candidate_is_rejected() {
        let mut data = CombatData::builtin().expect("builtin data");
        if let Some(table) = data.items.drop_tables.get_mut("slime") {
            table.candidates.push("no_such_item".to_string());
        }
        assert!(matches!(
            data.validate(),
            Err(DataLoadError::UnknownReference { reference, .. }) if reference == "no_such_item"
        ));
    }

    #[test]
    fn empty_first_wave_is_rejected() {
        let mut data = CombatData::builtin().expect("builtin data");
        if let Some(level) = data.dungeons.levels.get_mut(&1) {
            level.base_enemy_count = 0;
        }
        assert!(matches!(data.validate(), Err(DataLoadError::InvalidValue { record, .. }) if record == "1"));
    }

    #[test]
    fn bad_boss_ability_spec_is_rejected() {
        let mut data = CombatData::builtin().expect("builtin data");
        let mut spec = data.bosses.ability(BossAbility::Shockwave);
        spec.cooldown = 0.0;
        data.bosses.abilities.insert(BossAbility::Shockwave, spec);
        assert!(matches!(data.validate(), Err(DataLoadError::InvalidValue { record, .. }) if record == "Shockwave"));
    }

    #[test]
    fn companion_with_unknown_ability_is_rejected() {
        let mut data = CombatData::builtin().expect("builtin data");
        if let Some(knight) = data.companions.companions.get_mut("knight") {
            knight.abilities.push("moonbeam".to_string());
        }
        assert!(matches!(
            data.validate(),
            Err(DataLoadError::UnknownReference { table: "companions", reference, .. }) if reference == "moonbeam"
        ));
    }

    #[test]
    fn malformed_ron_reports_path() {
        let result: Result<EnemyTable, _> = parse("(enemies: {", "broken.ron");
        assert!(matches!(result, Err(DataLoadError::ParseError { path, .. }) if path == "broken.ron"));
    }

    #[test]
    fn missing_directory_falls_back_to_builtin() {
        let data = resolve_combat_data(Some(Path::new("does/not/exist")));
        assert!(data.enemies.get("slime").is_some());
    }
}
