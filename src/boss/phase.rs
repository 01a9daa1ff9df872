//! Boss phase escalation, revive-once, enrage and avenge.
//!
//! All of it is plain state on [`BossState`] driven through
//! [`BossState::absorb_damage`]; systems only forward damage and read the
//! resulting multipliers.

use bevy::prelude::*;

use crate::combat::{sanitize_damage, Combatant};

/// Thresholds and multipliers for boss escalation.
#[derive(Resource, Debug, Clone)]
pub struct BossTuning {
    /// Phase 2 starts at or below this health ratio.
    pub phase_two_ratio: f32,
    /// Phase 3 starts at or below this health ratio.
    pub phase_three_ratio: f32,
    /// Speed gained per phase above the first.
    pub phase_speed_step: f32,
    /// Attack cooldown lost per phase above the first.
    pub phase_cooldown_step: f32,
    /// Speed multiplier on entering enrage.
    pub enrage_speed: f32,
    /// One enrage speed step per this fraction of original max health taken.
    pub enrage_step_ratio: f32,
    pub enrage_step_speed: f32,
    pub avenge_speed: f32,
    pub avenge_health: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            phase_two_ratio: 0.5,
            phase_three_ratio: 0.25,
            phase_speed_step: 0.2,
            phase_cooldown_step: 0.2,
            enrage_speed: 1.3,
            enrage_step_ratio: 0.2,
            enrage_step_speed: 0.1,
            avenge_speed: 1.5,
            avenge_health: 1.5,
        }
    }
}

/// What one call to [`BossState::absorb_damage`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BossDamageReport {
    /// Health (or enrage pool) actually consumed.
    pub applied: f32,
    pub died: bool,
    pub revived: bool,
    /// Set when a phase was reached for the first time.
    pub new_phase: Option<u8>,
    /// Set when enrage damage crossed into a new speed step.
    pub enrage_step: Option<u32>,
}

/// Per-boss escalation state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct BossState {
    phase: u8,
    announced: [bool; 3],
    pub has_revived: bool,
    pub is_enraged: bool,
    pub enrage_damage_taken: f32,
    /// Max health at spawn; the enrage pool that must be emptied for true death.
    pub original_max_health: f32,
    pub avenge_triggered: bool,
    defeated: bool,
}

impl BossState {
    pub fn new(max_health: f32) -> Self {
        Self {
            phase: 1,
            announced: [true, false, false],
            has_revived: false,
            is_enraged: false,
            enrage_damage_taken: 0.0,
            original_max_health: max_health,
            avenge_triggered: false,
            defeated: false,
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Apply already-resolved damage to the boss.
    pub fn absorb_damage(&mut self, combatant: &mut Combatant, amount: f32, tuning: &BossTuning) -> BossDamageReport {
        let amount = sanitize_damage(amount);
        let mut report = BossDamageReport::default();
        if self.defeated || combatant.is_dead() || amount == 0.0 {
            return report;
        }

        if self.is_enraged {
            let steps_before = self.enrage_steps(tuning);
            self.enrage_damage_taken += amount;
            combatant.pin_health(1.0);
            report.applied = amount;
            if self.enrage_damage_taken >= self.original_max_health {
                self.defeated = true;
                report.died = combatant.kill();
            } else {
                let steps = self.enrage_steps(tuning);
                if steps > steps_before {
                    report.enrage_step = Some(steps);
                }
            }
            return report;
        }

        if !self.has_revived && combatant.health - amount <= 1.0 {
            report.applied = (combatant.health - 1.0).max(0.0);
            combatant.pin_health(1.0);
            self.has_revived = true;
            self.is_enraged = true;
            report.revived = true;
        } else {
            report.applied = amount.min(combatant.health);
            if combatant.take_damage(amount) {
                self.defeated = true;
                report.died = true;
                return report;
            }
        }

        report.new_phase = self.advance_phase(combatant.health_ratio(), tuning);
        report
    }

    /// Move up to the phase matching `health_ratio`. Never moves down.
    pub fn advance_phase(&mut self, health_ratio: f32, tuning: &BossTuning) -> Option<u8> {
        let reached = if health_ratio <= tuning.phase_three_ratio {
            3
        } else if health_ratio <= tuning.phase_two_ratio {
            2
        } else {
            1
        };
        if reached <= self.phase {
            return None;
        }
        self.phase = reached;
        let slot = &mut self.announced[usize::from(reached - 1)];
        if *slot {
            return None;
        }
        *slot = true;
        Some(reached)
    }

    pub fn enrage_steps(&self, tuning: &BossTuning) -> u32 {
        let step = self.original_max_health * tuning.enrage_step_ratio;
        if !self.is_enraged || step <= 0.0 {
            return 0;
        }
        (self.enrage_damage_taken / step).floor() as u32
    }

    /// Combined movement multiplier from phase, enrage and avenge.
    pub fn speed_multiplier(&self, tuning: &BossTuning) -> f32 {
        let phase = 1.0 + tuning.phase_speed_step * f32::from(self.phase - 1);
        let enrage = if self.is_enraged {
            tuning.enrage_speed * (1.0 + tuning.enrage_step_speed * self.enrage_steps(tuning) as f32)
        } else {
            1.0
        };
        let avenge = if self.avenge_triggered { tuning.avenge_speed } else { 1.0 };
        phase * enrage * avenge
    }

    pub fn cooldown_multiplier(&self, tuning: &BossTuning) -> f32 {
        (1.0 - tuning.phase_cooldown_step * f32::from(self.phase - 1)).max(0.2)
    }
}

/// Weak link to a twin boss; when one falls the other is avenged.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossPartner(pub Entity);

/// Grant the avenge bonus to `survivor` after `fallen` died.
///
/// Fires at most once across the pair: both sides are marked, and a dead or
/// defeated survivor gets nothing.
pub fn resolve_avenge(
    fallen: &mut BossState,
    survivor: &mut BossState,
    survivor_health: &mut Combatant,
    tuning: &BossTuning,
) -> bool {
    if fallen.avenge_triggered || survivor.avenge_triggered {
        return false;
    }
    if survivor.defeated || survivor_health.is_dead() {
        return false;
    }
    fallen.avenge_triggered = true;
    survivor.avenge_triggered = true;
    // Enraged health is pinned; scaling it would revive the pool.
    if !survivor.is_enraged {
        survivor_health.scale_health(tuning.avenge_health);
    }
    true
}
