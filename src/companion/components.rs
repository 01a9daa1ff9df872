//! Companion components, tuning and the decision rule.

use bevy::prelude::*;

use super::data::Personality;

/// Standing orders a player can give.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionOrder {
    Follow,
    Attack,
    Defend,
    Wait,
}

/// A fighter on the player's side.
#[derive(Component, Debug, Clone)]
pub struct Companion {
    pub owner: Entity,
    pub personality: Personality,
    pub speed: f32,
    /// Overrides the personality while set.
    pub order: Option<CompanionOrder>,
}

/// Companion behavior constants.
#[derive(Resource, Debug, Clone)]
pub struct CompanionTuning {
    /// Followers close in once farther than this from the owner.
    pub follow_distance: f32,
    /// Defenders hold this spot relative to the owner.
    pub guard_offset: Vec3,
    /// Defenders stop within this distance of their spot.
    pub guard_slack: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Enemies farther than this from the companion are ignored.
    pub aggro_range: f32,
    /// Defenders engage enemies this close to the owner.
    pub threat_radius: f32,
    /// Healers step in below this owner health ratio.
    pub heal_below: f32,
    pub heal_ability: String,
    pub mana_regen: f32,
}

impl Default for CompanionTuning {
    fn default() -> Self {
        Self {
            follow_distance: 3.0,
            guard_offset: Vec3::X,
            guard_slack: 1.0,
            attack_range: 2.5,
            attack_cooldown: 1.5,
            aggro_range: 10.0,
            threat_radius: 5.0,
            heal_below: 0.5,
            heal_ability: "heal".to_string(),
            mana_regen: 2.0,
        }
    }
}

/// What a companion does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionAction {
    Hold,
    Follow,
    Guard,
    Attack(Entity),
    HealOwner,
}

/// What the companion sees around it this tick.
#[derive(Debug, Clone, Copy)]
pub struct Situation {
    /// Nearest enemy in aggro range and its distance to the owner.
    pub enemy: Option<(Entity, f32)>,
    pub owner_health_ratio: f32,
    /// The heal ability is known, ready and affordable.
    pub can_heal: bool,
}

/// Orders win; without one the personality decides.
pub fn decide(
    order: Option<CompanionOrder>,
    personality: Personality,
    situation: &Situation,
    tuning: &CompanionTuning,
) -> CompanionAction {
    let enemy = situation.enemy.map(|(entity, _)| entity);
    let wants_heal = situation.can_heal && situation.owner_health_ratio < tuning.heal_below;

    match order {
        Some(CompanionOrder::Wait) => CompanionAction::Hold,
        Some(CompanionOrder::Follow) => CompanionAction::Follow,
        Some(CompanionOrder::Defend) => CompanionAction::Guard,
        Some(CompanionOrder::Attack) => enemy.map_or(CompanionAction::Follow, CompanionAction::Attack),
        None => match personality {
            Personality::Aggressive => enemy.map_or(CompanionAction::Follow, CompanionAction::Attack),
            Personality::Defensive => match situation.enemy {
                Some((entity, to_owner)) if to_owner <= tuning.threat_radius => CompanionAction::Attack(entity),
                _ => CompanionAction::Guard,
            },
            Personality::Supportive if wants_heal => CompanionAction::HealOwner,
            Personality::Supportive => CompanionAction::Follow,
            Personality::Balanced if wants_heal => CompanionAction::HealOwner,
            Personality::Balanced => enemy.map_or(CompanionAction::Follow, CompanionAction::Attack),
        },
    }
}
