//! Learned abilities and their cooldowns.

use std::collections::BTreeMap;

use bevy::prelude::*;
use thiserror::Error;

use super::data::AbilityDefinition;
use crate::combat::Combatant;

/// Why a cast did not go off. Nothing is spent on a rejected cast.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CastError {
    #[error("Unknown ability: {0}")]
    Unknown(String),

    #[error("{0} has not been learned")]
    NotLearned(String),

    #[error("{0} is on cooldown!")]
    OnCooldown(String),

    #[error("Not enough mana for {0}!")]
    NotEnoughMana(String),

    #[error("No valid target for {0}")]
    NoTarget(String),

    #[error("Target is out of range for {0}")]
    OutOfRange(String),

    #[error("Cannot cast while stunned")]
    Stunned,

    #[error("The caster cannot act")]
    Incapacitated,
}

/// Abilities an entity knows, each with its own cooldown.
#[derive(Component, Debug, Clone, Default)]
pub struct AbilityBook {
    cooldowns: BTreeMap<String, f32>,
}

impl AbilityBook {
    pub fn new<I, S>(abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cooldowns: abilities.into_iter().map(|id| (id.into(), 0.0)).collect(),
        }
    }

    /// Learning an ability twice keeps its running cooldown.
    pub fn learn(&mut self, ability: impl Into<String>) {
        self.cooldowns.entry(ability.into()).or_insert(0.0);
    }

    pub fn knows(&self, ability: &str) -> bool {
        self.cooldowns.contains_key(ability)
    }

    pub fn known(&self) -> impl Iterator<Item = &str> {
        self.cooldowns.keys().map(String::as_str)
    }

    pub fn remaining(&self, ability: &str) -> Option<f32> {
        self.cooldowns.get(ability).copied()
    }

    pub fn is_ready(&self, ability: &str) -> bool {
        self.remaining(ability).is_some_and(|remaining| remaining <= 0.0)
    }

    pub fn tick(&mut self, dt: f32) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
    }

    /// Check readiness and mana, then pay the cost and start the cooldown.
    pub fn begin_cast(
        &mut self,
        id: &str,
        ability: &AbilityDefinition,
        caster: &mut Combatant,
    ) -> Result<(), CastError> {
        let Some(remaining) = self.cooldowns.get_mut(id) else {
            return Err(CastError::NotLearned(ability.name.clone()));
        };
        if *remaining > 0.0 {
            return Err(CastError::OnCooldown(ability.name.clone()));
        }
        if !caster.use_mana(ability.mana_cost.max(0.0)) {
            return Err(CastError::NotEnoughMana(ability.name.clone()));
        }
        *remaining = ability.cooldown;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityEffects;

    fn strike() -> AbilityDefinition {
        AbilityDefinition {
            name: "Power Strike".to_string(),
            base_damage: 25.0,
            mana_cost: 10.0,
            cooldown: 2.0,
            range: 2.5,
            ranged: false,
            aoe_radius: 0.0,
            effects: AbilityEffects::default(),
        }
    }

    #[test]
    fn cast_spends_mana_and_starts_the_cooldown() {
        let mut book = AbilityBook::new(["power_strike"]);
        let mut caster = Combatant::new(100.0).with_mana(25.0);
        assert_eq!(book.begin_cast("power_strike", &strike(), &mut caster), Ok(()));
        assert_eq!(caster.mana, 15.0);
        assert_eq!(book.remaining("power_strike"), Some(2.0));
        assert_eq!(
            book.begin_cast("power_strike", &strike(), &mut caster),
            Err(CastError::OnCooldown("Power Strike".to_string()))
        );
        assert_eq!(caster.mana, 15.0);
    }

    #[test]
    fn short_on_mana_costs_nothing() {
        let mut book = AbilityBook::new(["power_strike"]);
        let mut caster = Combatant::new(100.0).with_mana(5.0);
        assert_eq!(
            book.begin_cast("power_strike", &strike(), &mut caster),
            Err(CastError::NotEnoughMana("Power Strike".to_string()))
        );
        assert_eq!(caster.mana, 5.0);
        assert!(book.is_ready("power_strike"));
    }

    #[test]
    fn unlearned_abilities_are_refused() {
        let mut book = AbilityBook::default();
        let mut caster = Combatant::new(100.0).with_mana(100.0);
        assert!(matches!(
            book.begin_cast("power_strike", &strike(), &mut caster),
            Err(CastError::NotLearned(_))
        ));
        book.learn("power_strike");
        assert!(book.knows("power_strike"));
        assert_eq!(book.known().collect::<Vec<_>>(), vec!["power_strike"]);
    }

    #[test]
    fn cooldowns_tick_down_to_zero() {
        let mut book = AbilityBook::new(["power_strike"]);
        let mut caster = Combatant::new(100.0).with_mana(100.0);
        book.begin_cast("power_strike", &strike(), &mut caster).expect("cast");
        book.tick(1.5);
        assert!(!book.is_ready("power_strike"));
        book.tick(1.0);
        assert_eq!(book.remaining("power_strike"), Some(0.0));
    }
}
