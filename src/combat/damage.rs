//! Damage resolution.
//!
//! A hit is resolved in a fixed order:
//! 1. `raw = attacker power + weapon damage`
//! 2. attacker-side weaken scales `raw` down (weaken always hurts its bearer)
//! 3. defense softens linearly, `max(floor, raw - defense / divisor)`
//! 4. defender-side curse, then fear, scale the result up

use serde::Deserialize;

use super::status::StatusEffects;

/// How much defense matters and the minimum chip damage of a hit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DefenseProfile {
    pub divisor: f32,
    pub floor: f32,
}

impl DefenseProfile {
    pub const fn new(divisor: f32, floor: f32) -> Self {
        Self { divisor, floor }
    }

    /// Apply the defense reduction and the chip-damage floor.
    pub fn mitigate(&self, raw: f32, defense: f32) -> f32 {
        // A hit with no force behind it does not get the chip floor.
        let raw = sanitize_damage(raw);
        if raw == 0.0 {
            return 0.0;
        }
        let divisor = if self.divisor > 0.0 { self.divisor } else { 1.0 };
        let reduced = raw - defense.max(0.0) / divisor;
        sanitize_damage(reduced.max(self.floor))
    }
}

/// Who is swinging; each class softens against defense differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackerClass {
    PlayerMelee,
    EnemyMelee,
    Ranged,
    BossMelee,
}

/// The per-class defense profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseProfiles {
    pub player_melee: DefenseProfile,
    pub enemy_melee: DefenseProfile,
    pub ranged: DefenseProfile,
    pub boss_melee: DefenseProfile,
}

impl Default for DefenseProfiles {
    fn default() -> Self {
        Self {
            player_melee: DefenseProfile::new(4.0, 5.0),
            enemy_melee: DefenseProfile::new(4.0, 1.0),
            ranged: DefenseProfile::new(4.0, 3.0),
            boss_melee: DefenseProfile::new(3.0, 8.0),
        }
    }
}

impl DefenseProfiles {
    pub fn get(&self, class: AttackerClass) -> DefenseProfile {
        match class {
            AttackerClass::PlayerMelee => self.player_melee,
            AttackerClass::EnemyMelee => self.enemy_melee,
            AttackerClass::Ranged => self.ranged,
            AttackerClass::BossMelee => self.boss_melee,
        }
    }
}

/// How a pending hit interacts with the defender's defenses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageKind {
    /// A normal hit: defense softens it, curse and fear amplify it.
    Hit(AttackerClass),
    /// Fixed damage that ignores defense but is still amplified by curse/fear.
    Flat,
    /// Poison and fear pulses; applied as-is.
    OverTime,
}

/// Clamp NaN, infinite and negative amounts to zero.
pub fn sanitize_damage(amount: f32) -> f32 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Attacker half of resolution: raw damage after the attacker's weaken.
pub fn outgoing_damage(attacker_power: f32, weapon_damage: f32, attacker: Option<&StatusEffects>) -> f32 {
    let raw = attacker_power + weapon_damage;
    let multiplier = attacker.map_or(1.0, StatusEffects::outgoing_multiplier);
    sanitize_damage(raw * multiplier)
}

/// Curse and fear on the defender scale a mitigated amount up.
fn amplify(amount: f32, defender: Option<&StatusEffects>) -> f32 {
    sanitize_damage(amount * defender.map_or(1.0, StatusEffects::incoming_multiplier))
}

/// Defender half of resolution. Hits go through [`resolve_hit`] with the
/// attacker side already folded into `outgoing`.
pub fn incoming_damage(
    outgoing: f32,
    kind: DamageKind,
    defender_defense: f32,
    defender: Option<&StatusEffects>,
    profiles: &DefenseProfiles,
) -> f32 {
    match kind {
        DamageKind::Hit(class) => resolve_hit(outgoing, 0.0, None, defender_defense, defender, profiles.get(class)),
        DamageKind::Flat => amplify(outgoing, defender),
        DamageKind::OverTime => sanitize_damage(outgoing),
    }
}

/// Full resolution of one hit.
pub fn resolve_hit(
    attacker_power: f32,
    weapon_damage: f32,
    attacker: Option<&StatusEffects>,
    defender_defense: f32,
    defender: Option<&StatusEffects>,
    profile: DefenseProfile,
) -> f32 {
    let outgoing = outgoing_damage(attacker_power, weapon_damage, attacker);
    amplify(profile.mitigate(outgoing, defender_defense), defender)
}
