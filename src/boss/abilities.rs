//! Per-ability cooldown table for bosses.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::data::{AbilitySpec, BossAbility, BossTable};

/// Independent cooldowns for each ability a boss owns.
///
/// Only abilities in the boss's capability set have an entry; anything else
/// can never fire.
#[derive(Component, Debug, Clone, Default)]
pub struct BossAbilities {
    specs: BTreeMap<BossAbility, AbilitySpec>,
    cooldowns: BTreeMap<BossAbility, f32>,
    /// Remaining Blood Rage time and its damage multiplier.
    rage_timer: f32,
    rage_multiplier: f32,
}

impl BossAbilities {
    /// Abilities start half way through their cooldown so a fresh boss does
    /// not open with every ability at once.
    pub fn new(capabilities: &[BossAbility], table: &BossTable) -> Self {
        let specs: BTreeMap<_, _> = capabilities
            .iter()
            .map(|ability| (*ability, table.ability(*ability)))
            .collect();
        let cooldowns = specs
            .iter()
            .map(|(ability, spec)| (*ability, spec.cooldown * 0.5))
            .collect();
        Self {
            specs,
            cooldowns,
            rage_timer: 0.0,
            rage_multiplier: 1.0,
        }
    }

    pub fn spec(&self, ability: BossAbility) -> Option<&AbilitySpec> {
        self.specs.get(&ability)
    }

    pub fn remaining(&self, ability: BossAbility) -> Option<f32> {
        self.cooldowns.get(&ability).copied()
    }

    pub fn is_ready(&self, ability: BossAbility) -> bool {
        self.remaining(ability).is_some_and(|remaining| remaining <= 0.0)
    }

    pub fn tick(&mut self, dt: f32) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
        if self.rage_timer > 0.0 {
            self.rage_timer -= dt;
            if self.rage_timer <= 0.0 {
                self.rage_timer = 0.0;
                self.rage_multiplier = 1.0;
            }
        }
    }

    /// Fire one ability if owned and ready. Returns whether it fired.
    pub fn try_fire(&mut self, ability: BossAbility) -> bool {
        let Some(spec) = self.specs.get(&ability) else {
            return false;
        };
        match self.cooldowns.get_mut(&ability) {
            Some(remaining) if *remaining <= 0.0 => {
                *remaining = spec.cooldown;
                true
            }
            _ => false,
        }
    }

    /// Fire everything that is ready and allowed this tick.
    ///
    /// At most one ranged special is picked; other abilities fire
    /// independently.
    pub fn select(&mut self, distance: f32, health_ratio: f32) -> Vec<BossAbility> {
        let candidates: Vec<BossAbility> = self
            .specs
            .iter()
            .filter(|(_, spec)| spec.allows(distance, health_ratio))
            .map(|(ability, _)| *ability)
            .collect();

        let mut fired = Vec::new();
        let mut ranged_used = false;
        for ability in candidates {
            if ability.is_ranged_special() && ranged_used {
                continue;
            }
            if self.try_fire(ability) {
                ranged_used |= ability.is_ranged_special();
                fired.push(ability);
            }
        }
        fired
    }

    pub fn start_rage(&mut self, multiplier: f32, duration: f32) {
        self.rage_multiplier = multiplier.max(1.0);
        self.rage_timer = duration;
    }

    /// Melee damage multiplier from an active Blood Rage.
    pub fn damage_multiplier(&self) -> f32 {
        if self.rage_timer > 0.0 {
            self.rage_multiplier
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(capabilities: &[BossAbility]) -> BossAbilities {
        let mut abilities = BossAbilities::new(capabilities, &BossTable::default());
        abilities.tick(100.0);
        abilities
    }

    #[test]
    fn unowned_abilities_never_fire() {
        let mut abilities = ready(&[BossAbility::Shockwave]);
        assert!(!abilities.try_fire(BossAbility::Fireball));
        assert!(abilities.try_fire(BossAbility::Shockwave));
    }

    #[test]
    fn firing_on_cooldown_is_rejected() {
        let mut abilities = ready(&[BossAbility::Shockwave]);
        assert!(abilities.try_fire(BossAbility::Shockwave));
        assert!(!abilities.try_fire(BossAbility::Shockwave));
        abilities.tick(100.0);
        assert!(abilities.try_fire(BossAbility::Shockwave));
    }

    #[test]
    fn fresh_boss_waits_half_a_cooldown() {
        let abilities = BossAbilities::new(&[BossAbility::Shockwave], &BossTable::default());
        assert!(!abilities.is_ready(BossAbility::Shockwave));
    }

    #[test]
    fn only_one_ranged_special_per_tick() {
        let mut abilities = ready(&[BossAbility::Fireball, BossAbility::VenomSpit, BossAbility::ShadowBolt]);
        let fired = abilities.select(8.0, 1.0);
        assert_eq!(fired.len(), 1);
        assert!(fired[0].is_ranged_special());
    }

    #[test]
    fn independent_abilities_fire_together() {
        let mut abilities = ready(&[
            BossAbility::Fireball,
            BossAbility::TerrorScream,
            BossAbility::SoulDrain,
            BossAbility::Shockwave,
        ]);
        // Close in and hurt: everything but the ranged special qualifies.
        let fired = abilities.select(2.0, 0.5);
        assert_eq!(
            fired,
            vec![BossAbility::TerrorScream, BossAbility::SoulDrain, BossAbility::Shockwave]
        );
    }

    #[test]
    fn health_gates_hold_back_drain_and_rage() {
        let mut abilities = ready(&[BossAbility::SoulDrain, BossAbility::BloodRage]);
        assert!(abilities.select(2.0, 0.9).is_empty());
        assert_eq!(abilities.select(2.0, 0.6), vec![BossAbility::SoulDrain]);
        assert_eq!(abilities.select(2.0, 0.4), vec![BossAbility::BloodRage]);
    }

    #[test]
    fn blood_rage_wears_off() {
        let mut abilities = BossAbilities::default();
        abilities.start_rage(1.5, 2.0);
        assert_eq!(abilities.damage_multiplier(), 1.5);
        abilities.tick(2.5);
        assert_eq!(abilities.damage_multiplier(), 1.0);
    }
}
