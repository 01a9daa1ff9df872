//! Tunable combat constants.

use bevy::prelude::*;

use super::damage::DefenseProfiles;

/// Global combat parameters. `Default` carries the shipped values.
#[derive(Resource, Debug, Clone)]
pub struct CombatTuning {
    pub defense: DefenseProfiles,
    /// Slow can never push movement speed below this many units per second.
    pub min_speed: f32,
    /// Player melee cooldown before attack-speed scaling.
    pub player_attack_cooldown: f32,
    /// Stamina spent per player swing; swings are dropped without it.
    pub player_swing_stamina: f32,

    /// Health ratio under which a damaged enemy may panic.
    pub flee_health_ratio: f32,
    pub flee_chance: f32,
    pub flee_speed_multiplier: f32,
    /// A fleeing enemy calms down beyond `aggro_range * flee_safe_factor`.
    pub flee_safe_factor: f32,

    /// Attacking reverts to chasing beyond `range * attack_hysteresis`.
    pub attack_hysteresis: f32,
    /// Target is lost beyond `aggro_range * escape_factor`.
    pub escape_factor: f32,
    /// Ranged enemies will not fire closer than this.
    pub ranged_min_distance: f32,

    /// Chance per second that an untargeted idle enemy starts patrolling.
    pub patrol_chance: f32,
    /// Patrol waypoints are scattered this far around the enemy's home.
    pub patrol_radius: f32,
    pub patrol_waypoints: usize,
    /// Patrol walk speed as a fraction of the enemy's speed.
    pub patrol_speed_factor: f32,
    /// A waypoint counts as reached inside this distance.
    pub patrol_arrive_distance: f32,

    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_hit_radius: f32,
    /// Height added to the aim point so shots arc slightly.
    pub projectile_arc: f32,

    /// Delay between death and despawn.
    pub death_grace: f32,
    pub hit_flash: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            defense: DefenseProfiles::default(),
            min_speed: 0.5,
            player_attack_cooldown: 0.5,
            player_swing_stamina: 5.0,
            flee_health_ratio: 0.2,
            flee_chance: 0.3,
            flee_speed_multiplier: 1.5,
            flee_safe_factor: 2.0,
            attack_hysteresis: 1.2,
            escape_factor: 1.5,
            ranged_min_distance: 3.0,
            patrol_chance: 0.03,
            patrol_radius: 5.0,
            patrol_waypoints: 3,
            patrol_speed_factor: 0.5,
            patrol_arrive_distance: 0.5,
            projectile_speed: 15.0,
            projectile_lifetime: 3.0,
            projectile_hit_radius: 0.8,
            projectile_arc: 0.5,
            death_grace: 2.0,
            hit_flash: 0.2,
        }
    }
}
