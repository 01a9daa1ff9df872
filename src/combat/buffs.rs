//! Beneficial effects and crowd control granted by abilities: stun, attack and
//! defense buffs, and a damage-absorbing shield.
//!
//! Reapplying an effect keeps the stronger magnitude and the longer timer.

use bevy::prelude::*;

fn positive(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Active buffs on one combatant.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Buffs {
    pub stun_timer: f32,
    pub attack_multiplier: f32,
    pub attack_timer: f32,
    pub defense_multiplier: f32,
    pub defense_timer: f32,
    /// Damage the shield can still absorb.
    pub shield: f32,
    pub shield_timer: f32,
}

impl Default for Buffs {
    fn default() -> Self {
        Self {
            stun_timer: 0.0,
            attack_multiplier: 1.0,
            attack_timer: 0.0,
            defense_multiplier: 1.0,
            defense_timer: 0.0,
            shield: 0.0,
            shield_timer: 0.0,
        }
    }
}

impl Buffs {
    pub fn apply_stun(&mut self, duration: f32) {
        self.stun_timer = self.stun_timer.max(positive(duration));
    }

    pub fn apply_attack_buff(&mut self, multiplier: f32, duration: f32) {
        if positive(multiplier) > self.attack_multiplier {
            self.attack_multiplier = multiplier;
        }
        self.attack_timer = self.attack_timer.max(positive(duration));
    }

    pub fn apply_defense_buff(&mut self, multiplier: f32, duration: f32) {
        if positive(multiplier) > self.defense_multiplier {
            self.defense_multiplier = multiplier;
        }
        self.defense_timer = self.defense_timer.max(positive(duration));
    }

    pub fn apply_shield(&mut self, amount: f32, duration: f32) {
        self.shield = self.shield.max(positive(amount));
        self.shield_timer = self.shield_timer.max(positive(duration));
    }

    /// Soak up as much of `amount` as the shield holds; returns what gets through.
    pub fn absorb(&mut self, amount: f32) -> f32 {
        if self.shield <= 0.0 {
            return amount;
        }
        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        if self.shield <= 0.0 {
            self.shield = 0.0;
            self.shield_timer = 0.0;
        }
        amount - absorbed
    }

    pub fn tick(&mut self, dt: f32) {
        let dt = positive(dt);
        if self.stun_timer > 0.0 {
            self.stun_timer = (self.stun_timer - dt).max(0.0);
        }
        if self.attack_timer > 0.0 {
            self.attack_timer -= dt;
            if self.attack_timer <= 0.0 {
                self.attack_timer = 0.0;
                self.attack_multiplier = 1.0;
            }
        }
        if self.defense_timer > 0.0 {
            self.defense_timer -= dt;
            if self.defense_timer <= 0.0 {
                self.defense_timer = 0.0;
                self.defense_multiplier = 1.0;
            }
        }
        if self.shield_timer > 0.0 {
            self.shield_timer -= dt;
            if self.shield_timer <= 0.0 {
                self.shield_timer = 0.0;
                self.shield = 0.0;
            }
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0.0
    }

    pub fn outgoing_multiplier(&self) -> f32 {
        self.attack_multiplier
    }

    pub fn defense_multiplier(&self) -> f32 {
        self.defense_multiplier
    }

    pub fn is_clear(&self) -> bool {
        self.stun_timer <= 0.0 && self.attack_timer <= 0.0 && self.defense_timer <= 0.0 && self.shield_timer <= 0.0
    }
}

/// Convenience for optional buff components.
pub fn is_stunned(buffs: Option<&Buffs>) -> bool {
    buffs.is_some_and(Buffs::is_stunned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_soaks_damage_until_broken() {
        let mut buffs = Buffs::default();
        buffs.apply_shield(50.0, 8.0);
        assert_eq!(buffs.absorb(30.0), 0.0);
        assert_eq!(buffs.absorb(30.0), 10.0);
        assert_eq!(buffs.shield, 0.0);
        assert_eq!(buffs.absorb(5.0), 5.0);
    }

    #[test]
    fn expired_buffs_return_to_neutral() {
        let mut buffs = Buffs::default();
        buffs.apply_attack_buff(1.5, 10.0);
        buffs.apply_defense_buff(1.5, 2.0);
        buffs.apply_stun(1.0);
        buffs.tick(2.5);
        assert!(!buffs.is_stunned());
        assert_eq!(buffs.defense_multiplier(), 1.0);
        assert_eq!(buffs.outgoing_multiplier(), 1.5);
        buffs.tick(8.0);
        assert!(buffs.is_clear());
        assert_eq!(buffs.outgoing_multiplier(), 1.0);
    }

    #[test]
    fn reapplying_keeps_the_stronger_buff() {
        let mut buffs = Buffs::default();
        buffs.apply_attack_buff(2.0, 3.0);
        buffs.apply_attack_buff(1.5, 10.0);
        assert_eq!(buffs.attack_multiplier, 2.0);
        assert_eq!(buffs.attack_timer, 10.0);
        buffs.apply_stun(f32::NAN);
        assert!(!buffs.is_stunned());
    }
}
