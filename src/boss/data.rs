//! Boss capability table loaded from RON.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Special abilities a boss may be granted.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BossAbility {
    /// Ranged: large flat-damage projectile.
    Fireball,
    /// Ranged: poisoning projectile.
    VenomSpit,
    /// Ranged: piercing-free bolt that weakens.
    ShadowBolt,
    /// Fears the target when close.
    TerrorScream,
    /// Drains health from the target; only below 70% health.
    SoulDrain,
    /// Temporary damage boost; only below 50% health.
    BloodRage,
    /// Close-range blast that slows.
    Shockwave,
    /// Melee-range curse.
    CursedTouch,
}

impl BossAbility {
    pub const ALL: [BossAbility; 8] = [
        BossAbility::Fireball,
        BossAbility::VenomSpit,
        BossAbility::ShadowBolt,
        BossAbility::TerrorScream,
        BossAbility::SoulDrain,
        BossAbility::BloodRage,
        BossAbility::Shockwave,
        BossAbility::CursedTouch,
    ];

    /// At most one ranged special fires per tick.
    pub fn is_ranged_special(self) -> bool {
        matches!(
            self,
            BossAbility::Fireball | BossAbility::VenomSpit | BossAbility::ShadowBolt
        )
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BossAbility::Fireball => "Fireball",
            BossAbility::VenomSpit => "Venom Spit",
            BossAbility::ShadowBolt => "Shadow Bolt",
            BossAbility::TerrorScream => "Terror Scream",
            BossAbility::SoulDrain => "Soul Drain",
            BossAbility::BloodRage => "Blood Rage",
            BossAbility::Shockwave => "Shockwave",
            BossAbility::CursedTouch => "Cursed Touch",
        }
    }
}

/// Capability set of one boss type.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct BossProfile {
    pub abilities: Vec<BossAbility>,
}

/// Tuning for one ability, shared by every boss that has it.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AbilitySpec {
    pub cooldown: f32,
    /// Target must be at least this far away.
    #[serde(default)]
    pub min_range: f32,
    pub max_range: f32,
    /// Only usable while the boss's health ratio is below this.
    #[serde(default)]
    pub below_health: Option<f32>,
    pub magnitude: f32,
    #[serde(default)]
    pub effect: f32,
    #[serde(default)]
    pub duration: f32,
}

impl AbilitySpec {
    /// Values used when the table has no entry for an ability.
    pub fn fallback(ability: BossAbility) -> Self {
        let base = Self {
            cooldown: 8.0,
            min_range: 0.0,
            max_range: 6.0,
            below_health: None,
            magnitude: 10.0,
            effect: 0.0,
            duration: 0.0,
        };
        match ability {
            BossAbility::Fireball | BossAbility::VenomSpit | BossAbility::ShadowBolt => Self {
                min_range: 3.0,
                max_range: 14.0,
                ..base
            },
            BossAbility::SoulDrain => Self {
                below_health: Some(0.7),
                ..base
            },
            BossAbility::BloodRage => Self {
                below_health: Some(0.5),
                max_range: f32::INFINITY,
                magnitude: 1.5,
                duration: 6.0,
                ..base
            },
            _ => base,
        }
    }

    /// Distance and health gating.
    pub fn allows(&self, distance: f32, health_ratio: f32) -> bool {
        let in_range = distance >= self.min_range && distance <= self.max_range;
        let below = self.below_health.map_or(true, |limit| health_ratio < limit);
        in_range && below
    }
}

/// Boss type id -> capabilities, plus the shared ability tuning.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct BossTable {
    pub profiles: BTreeMap<String, BossProfile>,
    #[serde(default)]
    pub abilities: BTreeMap<BossAbility, AbilitySpec>,
}

impl BossTable {
    pub fn get(&self, boss_type: &str) -> Option<&BossProfile> {
        self.profiles.get(boss_type)
    }

    pub fn ability(&self, ability: BossAbility) -> AbilitySpec {
        self.abilities
            .get(&ability)
            .copied()
            .unwrap_or_else(|| AbilitySpec::fallback(ability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_on_range_and_health() {
        let drain = AbilitySpec::fallback(BossAbility::SoulDrain);
        assert!(!drain.allows(2.0, 0.9));
        assert!(drain.allows(2.0, 0.5));
        assert!(!drain.allows(20.0, 0.5));

        let bolt = AbilitySpec::fallback(BossAbility::ShadowBolt);
        assert!(!bolt.allows(1.0, 1.0), "too close for a ranged special");
        assert!(bolt.allows(8.0, 1.0));
    }

    #[test]
    fn missing_entries_fall_back() {
        let table = BossTable::default();
        assert_eq!(table.ability(BossAbility::BloodRage).below_health, Some(0.5));
    }
}
