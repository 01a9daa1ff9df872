//! Per-combatant debuff table: poison, slow, weaken, curse and fear.
//!
//! Magnitudes stack additively up to a cap, timers are refreshed to the new
//! duration (never summed), and an expired timer resets its magnitude to the
//! neutral value. The table never touches health directly; [`StatusEffects::tick`]
//! reports the damage-over-time it produced and the caller routes it through
//! the normal damage pipeline.

use bevy::prelude::*;
use serde::Deserialize;

/// Maximum slow, in percent.
pub const SLOW_CAP: f32 = 90.0;
/// Maximum weaken, in percent.
pub const WEAKEN_CAP: f32 = 80.0;
/// Maximum curse, in percent.
pub const CURSE_CAP: f32 = 100.0;
/// Maximum stacked poison damage per second.
pub const POISON_DPS_CAP: f32 = 50.0;
/// Maximum incoming-damage multiplier from stacked fear.
pub const FEAR_MULTIPLIER_CAP: f32 = 3.0;

/// The five debuff families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum DebuffKind {
    Poison,
    Slow,
    Weaken,
    Curse,
    Fear,
}

/// An on-hit debuff carried by a weapon, projectile or ability.
///
/// `value` is the magnitude: damage per second for poison, percent for
/// slow/weaken/curse, and the incoming-damage multiplier for fear.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OnHitDebuff {
    pub debuff: DebuffKind,
    pub value: f32,
    #[serde(default = "default_debuff_duration")]
    pub duration: f32,
    /// Fear only: damage dealt once per second while fear lasts.
    #[serde(default)]
    pub dot: f32,
}

fn default_debuff_duration() -> f32 {
    5.0
}

impl OnHitDebuff {
    pub fn new(debuff: DebuffKind, value: f32, duration: f32) -> Self {
        Self {
            debuff,
            value,
            duration,
            dot: 0.0,
        }
    }

    pub fn fear(multiplier: f32, duration: f32, dot: f32) -> Self {
        Self {
            debuff: DebuffKind::Fear,
            value: multiplier,
            duration,
            dot,
        }
    }
}

/// Active debuffs on one combatant.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct StatusEffects {
    pub poison_damage_per_second: f32,
    pub poison_timer: f32,
    pub slow_percent: f32,
    pub slow_timer: f32,
    pub weaken_percent: f32,
    pub weaken_timer: f32,
    pub curse_percent: f32,
    pub curse_timer: f32,
    pub fear_multiplier: f32,
    pub fear_duration: f32,
    pub fear_dot_per_second: f32,
    /// Accumulates time toward the next fear damage pulse.
    pub fear_dot_timer: f32,
}

impl Default for StatusEffects {
    fn default() -> Self {
        Self {
            poison_damage_per_second: 0.0,
            poison_timer: 0.0,
            slow_percent: 0.0,
            slow_timer: 0.0,
            weaken_percent: 0.0,
            weaken_timer: 0.0,
            curse_percent: 0.0,
            curse_timer: 0.0,
            fear_multiplier: 1.0,
            fear_duration: 0.0,
            fear_dot_per_second: 0.0,
            fear_dot_timer: 0.0,
        }
    }
}

/// Guard against NaN, negative and infinite inputs from callers.
fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn refresh(timer: &mut f32, duration: f32) {
    *timer = timer.max(sanitize(duration));
}

impl StatusEffects {
    pub fn apply_poison(&mut self, dps: f32, duration: f32) {
        self.poison_damage_per_second =
            (self.poison_damage_per_second + sanitize(dps)).min(POISON_DPS_CAP);
        refresh(&mut self.poison_timer, duration);
    }

    pub fn apply_slow(&mut self, percent: f32, duration: f32) {
        self.slow_percent = (self.slow_percent + sanitize(percent)).min(SLOW_CAP);
        refresh(&mut self.slow_timer, duration);
    }

    pub fn apply_weaken(&mut self, percent: f32, duration: f32) {
        self.weaken_percent = (self.weaken_percent + sanitize(percent)).min(WEAKEN_CAP);
        refresh(&mut self.weaken_timer, duration);
    }

    pub fn apply_curse(&mut self, percent: f32, duration: f32) {
        self.curse_percent = (self.curse_percent + sanitize(percent)).min(CURSE_CAP);
        refresh(&mut self.curse_timer, duration);
    }

    /// Fear stacks its bonus over 1.0 additively up to [`FEAR_MULTIPLIER_CAP`];
    /// the damage pulse keeps the strongest value seen while active.
    pub fn apply_fear(&mut self, multiplier: f32, duration: f32, dot_per_second: f32) {
        let bonus = if multiplier.is_finite() { sanitize(multiplier - 1.0) } else { 0.0 };
        self.fear_multiplier = (self.fear_multiplier + bonus).min(FEAR_MULTIPLIER_CAP);
        self.fear_dot_per_second = self.fear_dot_per_second.max(sanitize(dot_per_second));
        refresh(&mut self.fear_duration, duration);
    }

    /// Apply a debuff descriptor.
    pub fn apply(&mut self, debuff: &OnHitDebuff) {
        match debuff.debuff {
            DebuffKind::Poison => self.apply_poison(debuff.value, debuff.duration),
            DebuffKind::Slow => self.apply_slow(debuff.value, debuff.duration),
            DebuffKind::Weaken => self.apply_weaken(debuff.value, debuff.duration),
            DebuffKind::Curse => self.apply_curse(debuff.value, debuff.duration),
            DebuffKind::Fear => self.apply_fear(debuff.value, debuff.duration, debuff.dot),
        }
    }

    /// Advance every timer by `dt` and return the damage-over-time produced.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let dt = sanitize(dt);
        let mut damage = 0.0;

        if self.poison_timer > 0.0 {
            // Only the portion of dt the poison was actually active counts.
            damage += self.poison_damage_per_second * dt.min(self.poison_timer);
            self.poison_timer -= dt;
            if self.poison_timer <= 0.0 {
                self.poison_timer = 0.0;
                self.poison_damage_per_second = 0.0;
            }
        }

        if self.fear_duration > 0.0 {
            self.fear_dot_timer += dt.min(self.fear_duration);
            while self.fear_dot_timer >= 1.0 {
                self.fear_dot_timer -= 1.0;
                damage += self.fear_dot_per_second;
            }
            self.fear_duration -= dt;
            if self.fear_duration <= 0.0 {
                self.fear_duration = 0.0;
                self.fear_multiplier = 1.0;
                self.fear_dot_per_second = 0.0;
                self.fear_dot_timer = 0.0;
            }
        }

        if self.slow_timer > 0.0 {
            self.slow_timer -= dt;
            if self.slow_timer <= 0.0 {
                self.slow_timer = 0.0;
                self.slow_percent = 0.0;
            }
        }

        if self.weaken_timer > 0.0 {
            self.weaken_timer -= dt;
            if self.weaken_timer <= 0.0 {
                self.weaken_timer = 0.0;
                self.weaken_percent = 0.0;
            }
        }

        if self.curse_timer > 0.0 {
            self.curse_timer -= dt;
            if self.curse_timer <= 0.0 {
                self.curse_timer = 0.0;
                self.curse_percent = 0.0;
            }
        }

        damage
    }

    /// Movement speed after slow, never below `floor` (unless the base itself is lower).
    pub fn effective_speed(&self, base_speed: f32, floor: f32) -> f32 {
        let slowed = base_speed * (1.0 - self.slow_percent / 100.0);
        slowed.max(floor.min(base_speed))
    }

    /// Multiplier on damage this combatant deals.
    pub fn outgoing_multiplier(&self) -> f32 {
        1.0 - self.weaken_percent / 100.0
    }

    /// Multiplier on damage this combatant receives: curse first, then fear.
    pub fn incoming_multiplier(&self) -> f32 {
        let mut multiplier = 1.0 + self.curse_percent / 100.0;
        if self.is_feared() {
            multiplier *= self.fear_multiplier;
        }
        multiplier
    }

    pub fn is_feared(&self) -> bool {
        self.fear_duration > 0.0
    }

    pub fn is_poisoned(&self) -> bool {
        self.poison_timer > 0.0
    }

    /// True when no debuff is active.
    pub fn is_clear(&self) -> bool {
        self.poison_timer <= 0.0
            && self.slow_timer <= 0.0
            && self.weaken_timer <= 0.0
            && self.curse_timer <= 0.0
            && self.fear_duration <= 0.0
    }

    /// Drop every debuff (used when a boss revives).
    pub fn cleanse(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slow_stacks_additively_and_caps() {
        let mut status = StatusEffects::default();
        status.apply_slow(40.0, 3.0);
        status.apply_slow(40.0, 3.0);
        assert_eq!(status.slow_percent, 80.0);
        status.apply_slow(40.0, 3.0);
        assert_eq!(status.slow_percent, SLOW_CAP);
    }

    #[test]
    fn reapplication_refreshes_timer_without_summing() {
        let mut status = StatusEffects::default();
        status.apply_weaken(10.0, 4.0);
        status.tick(1.0);
        status.apply_weaken(10.0, 4.0);
        assert_eq!(status.weaken_timer, 4.0);
        assert_eq!(status.weaken_percent, 20.0);
    }

    #[test]
    fn expired_timers_reset_to_neutral() {
        let mut status = StatusEffects::default();
        status.apply_slow(50.0, 1.0);
        status.apply_curse(30.0, 1.0);
        status.apply_fear(1.5, 1.0, 0.0);
        status.tick(1.5);
        assert_eq!(status.slow_percent, 0.0);
        assert_eq!(status.curse_percent, 0.0);
        assert_eq!(status.fear_multiplier, 1.0);
        assert!(status.is_clear());
    }

    #[test]
    fn poison_deals_damage_only_while_active() {
        let mut status = StatusEffects::default();
        status.apply_poison(4.0, 2.0);
        let first = status.tick(1.0);
        let second = status.tick(5.0);
        assert!((first - 4.0).abs() < 1e-5);
        assert!((second - 4.0).abs() < 1e-5);
        assert_eq!(status.tick(1.0), 0.0);
        assert!(!status.is_poisoned());
    }

    #[test]
    fn fear_pulses_once_per_second() {
        let mut status = StatusEffects::default();
        status.apply_fear(1.5, 3.0, 2.0);
        let mut total = 0.0;
        for _ in 0..10 {
            total += status.tick(0.25);
        }
        // 2.5 seconds of fear -> two full pulses
        assert!((total - 4.0).abs() < 1e-5);
    }

    #[test]
    fn weaken_halves_outgoing_damage() {
        let mut status = StatusEffects::default();
        status.apply_weaken(50.0, 5.0);
        assert!((20.0 * status.outgoing_multiplier() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn curse_then_fear_multiply() {
        let mut status = StatusEffects::default();
        status.apply_curse(50.0, 5.0);
        status.apply_fear(2.0, 5.0, 0.0);
        assert!((status.incoming_multiplier() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn speed_never_drops_below_floor() {
        let mut status = StatusEffects::default();
        status.apply_slow(90.0, 5.0);
        assert_eq!(status.effective_speed(2.0, 0.5), 0.5);
        assert!((status.effective_speed(10.0, 0.5) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn garbage_magnitudes_are_ignored() {
        let mut status = StatusEffects::default();
        status.apply_slow(f32::NAN, 3.0);
        status.apply_curse(-40.0, 3.0);
        status.apply_poison(f32::INFINITY, 3.0);
        assert_eq!(status.slow_percent, 0.0);
        assert_eq!(status.curse_percent, 0.0);
        assert_eq!(status.poison_damage_per_second, 0.0);
    }

    #[test]
    fn fear_stacks_additively_up_to_its_cap() {
        let mut status = StatusEffects::default();
        status.apply_fear(1.5, 5.0, 0.0);
        status.apply_fear(1.5, 5.0, 0.0);
        assert!((status.fear_multiplier - 2.0).abs() < 1e-5);
        for _ in 0..10 {
            status.apply_fear(1.5, 5.0, 0.0);
        }
        assert_eq!(status.fear_multiplier, FEAR_MULTIPLIER_CAP);
        // Weaker-than-neutral fear never lowers the multiplier.
        status.apply_fear(0.5, 5.0, 0.0);
        assert_eq!(status.fear_multiplier, FEAR_MULTIPLIER_CAP);
    }

    proptest! {
        #[test]
        fn caps_hold_for_any_application_sequence(
            applications in proptest::collection::vec((0u8..4, 0.0f32..500.0, 0.0f32..20.0), 1..60)
        ) {
            let mut status = StatusEffects::default();
            for (kind, magnitude, duration) in applications {
                match kind {
                    0 => status.apply_slow(magnitude, duration),
                    1 => status.apply_weaken(magnitude, duration),
                    2 => status.apply_curse(magnitude, duration),
                    _ => status.apply_fear(1.0 + magnitude / 100.0, duration, 0.0),
                }
                prop_assert!(status.fear_multiplier <= FEAR_MULTIPLIER_CAP);
                prop_assert!(status.slow_percent <= SLOW_CAP);
                prop_assert!(status.weaken_percent <= WEAKEN_CAP);
                prop_assert!(status.curse_percent <= CURSE_CAP);
            }
        }
    }
}
