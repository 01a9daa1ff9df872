//! Enemy-related components.

use bevy::prelude::*;

use super::data::EnemyArchetype;

/// Identity of an enemy.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub name: String,
    pub archetype: EnemyArchetype,
    pub xp_value: u32,
    pub gold_reward: (u32, u32),
}

/// Enemy type identifier (key into the enemy table).
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct EnemyType(pub String);

/// AI state machine for enemy behavior.
#[derive(Component, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AiState {
    /// Standing still, waiting for a target to enter aggro range.
    #[default]
    Idle,
    /// Walking a loop of waypoints around home; breaks off on aggro.
    Patrolling,
    /// Moving toward the target (ranged enemies also back off when too close).
    Chasing,
    /// In range; attacks whenever the cooldown allows.
    Attacking,
    /// Running away at low health. Bosses never flee.
    Fleeing,
    /// Dead, waiting for the despawn grace period.
    Dying,
}

/// Live behavioral stats. Boss phases, enrage and avenge rescale `speed`
/// and `attack_cooldown` from the `base_*` spawn values.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct EnemyStats {
    pub archetype: EnemyArchetype,
    pub speed: f32,
    pub base_speed: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
    pub projectile_range: f32,
    pub attack_cooldown: f32,
    pub base_attack_cooldown: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            archetype: EnemyArchetype::Melee,
            speed: 3.0,
            base_speed: 3.0,
            aggro_range: 8.0,
            attack_range: 2.0,
            projectile_range: 12.0,
            attack_cooldown: 1.5,
            base_attack_cooldown: 1.5,
        }
    }
}

/// Weak reference to what the enemy is fighting. Cleared when the target
/// despawns or dies; the enemy never owns its target.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target(pub Option<Entity>);

/// Patrol route around where the enemy spawned. Waypoints are rolled the
/// first time the enemy sets off.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Patrol {
    pub home: Vec3,
    pub waypoints: Vec<Vec3>,
    pub next: usize,
}

impl Patrol {
    pub fn new(home: Vec3) -> Self {
        Self {
            home,
            waypoints: Vec::new(),
            next: 0,
        }
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.next).copied()
    }

    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.next = (self.next + 1) % self.waypoints.len();
        }
    }
}

/// Marks an enemy that belongs to the running dungeon wave.
#[derive(Component, Debug, Clone, Copy)]
pub struct WaveMember {
    pub wave: u32,
}

/// Periodically spawns enemies in the open world.
#[derive(Component, Debug, Clone)]
pub struct SpawnPoint {
    pub enemy_types: Vec<String>,
    pub max_count: u32,
    pub current_count: u32,
}

impl SpawnPoint {
    pub fn new(enemy_types: Vec<String>, max_count: u32) -> Self {
        Self {
            enemy_types,
            max_count,
            current_count: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current_count >= self.max_count
    }
}

/// Links a world-spawned enemy back to its spawn point.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnedBy(pub Entity);
