//! Combat-related components.

use bevy::prelude::*;

use super::damage::sanitize_damage;

/// Health and mana pool for any actor that can take damage.
///
/// `0 <= health <= max_health` always holds. Reaching zero health is terminal;
/// only the boss revive mechanic may put health back afterwards.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Combatant {
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub attack_power: f32,
    pub defense: f32,
}

impl Combatant {
    pub fn new(max_health: f32) -> Self {
        let max_health = sanitize_damage(max_health).max(1.0);
        Self {
            health: max_health,
            max_health,
            mana: 0.0,
            max_mana: 0.0,
            attack_power: 0.0,
            defense: 0.0,
        }
    }

    pub fn with_mana(mut self, max_mana: f32) -> Self {
        self.max_mana = sanitize_damage(max_mana);
        self.mana = self.max_mana;
        self
    }

    pub fn with_attack(mut self, attack_power: f32) -> Self {
        self.attack_power = attack_power;
        self
    }

    pub fn with_defense(mut self, defense: f32) -> Self {
        self.defense = defense;
        self
    }

    /// Subtract `amount` and report whether this call killed the combatant.
    ///
    /// Invalid amounts count as zero; a dead combatant is left untouched.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = (self.health - sanitize_damage(amount)).max(0.0);
        self.health == 0.0
    }

    /// Restore health up to the maximum; returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let actual = sanitize_damage(amount).min(self.max_health - self.health);
        self.health += actual;
        actual
    }

    pub fn restore_mana(&mut self, amount: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let actual = sanitize_damage(amount).min(self.max_mana - self.mana);
        self.mana += actual;
        actual
    }

    /// Spend mana if enough is available.
    pub fn use_mana(&mut self, amount: f32) -> bool {
        if self.mana >= amount {
            self.mana -= amount;
            true
        } else {
            false
        }
    }

    /// Passive per-tick restoration.
    pub fn regenerate(&mut self, dt: f32, rates: RegenRates) {
        self.heal(rates.health * dt);
        self.restore_mana(rates.mana * dt);
    }

    /// Scale both maximum and current health, keeping the invariant.
    pub fn scale_health(&mut self, multiplier: f32) {
        let multiplier = sanitize_damage(multiplier);
        if multiplier == 0.0 {
            return;
        }
        self.max_health *= multiplier;
        self.health = (self.health * multiplier).min(self.max_health);
    }

    /// Force health to `value`, clamped to the valid range.
    pub(crate) fn pin_health(&mut self, value: f32) {
        self.health = value.clamp(0.0, self.max_health);
    }

    /// Drop straight to zero; returns whether the combatant was alive.
    pub(crate) fn kill(&mut self) -> bool {
        let was_alive = self.is_alive();
        self.health = 0.0;
        was_alive
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn health_ratio(&self) -> f32 {
        self.health / self.max_health
    }
}

/// Per-second passive restoration rates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegenRates {
    pub health: f32,
    pub mana: f32,
}

/// Which side a combatant fights for. Projectiles only hit the other side.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// Stamina resource for player actions.
#[derive(Component, Debug, Clone)]
pub struct Stamina {
    pub current: f32,
    pub maximum: f32,
    pub regen_rate: f32,
}

impl Stamina {
    pub fn new(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
            regen_rate: 5.0,
        }
    }

    pub fn use_stamina(&mut self, amount: f32) -> bool {
        if self.current >= amount {
            self.current -= amount;
            true
        } else {
            false
        }
    }

    pub fn regenerate(&mut self, delta: f32) {
        self.current = (self.current + self.regen_rate * delta).min(self.maximum);
    }
}

/// Cooldown between attacks. Counts down to zero and is reset on firing.
#[derive(Component, Debug, Clone, Default)]
pub struct AttackCooldown {
    pub remaining: f32,
}

impl AttackCooldown {
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    /// Start a new cooldown of `base / attack_speed`.
    pub fn reset(&mut self, base: f32, attack_speed: f32) {
        let speed = if attack_speed > 0.0 { attack_speed } else { 1.0 };
        self.remaining = base / speed;
    }

    /// Fire if ready, starting the next cooldown. Returns whether it fired.
    pub fn try_fire(&mut self, base: f32, attack_speed: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.reset(base, attack_speed);
        true
    }
}

/// Attack-speed multiplier granted by gear. Divides attack cooldowns.
#[derive(Component, Debug, Clone, Copy)]
pub struct AttackSpeed(pub f32);

impl Default for AttackSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Marker for combatants whose death has been processed (prevents duplicate death events).
#[derive(Component)]
pub struct Dead;

/// Presentation hint: the entity was just hit. Removed by a scheduled task.
#[derive(Component)]
pub struct HitFlash;
