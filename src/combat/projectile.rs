//! Projectiles: straight-line shots with hit sets.
//!
//! Hits are checked against the whole segment flown this tick, so a fast
//! shot cannot tunnel through a target between two frames.

use std::collections::HashSet;

use bevy::prelude::*;

use super::components::{Combatant, Dead, Faction};
use super::damage::{AttackerClass, DamageKind};
use super::status::OnHitDebuff;
use super::tuning::CombatTuning;
use crate::core::{DamageEvent, FireProjectileEvent};
use crate::data::CombatData;
use crate::player::Equipment;

/// How a projectile ends.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileKind {
    /// Gone on the first hit.
    Simple,
    /// Hits up to `limit` distinct targets, never the same one twice.
    Piercing { limit: u32, hit_set: HashSet<Entity> },
    /// Boss shot: flat damage, gone on the first hit.
    Boss,
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub owner: Option<Entity>,
    pub faction: Faction,
    /// Unit vector.
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub hit_radius: f32,
    pub kind: ProjectileKind,
    pub debuff: Option<OnHitDebuff>,
    /// Displacement of the most recent tick.
    pub last_step: Vec3,
    spent: bool,
}

impl Projectile {
    pub fn new(owner: Option<Entity>, faction: Faction, direction: Vec3, damage: f32, tuning: &CombatTuning) -> Self {
        Self {
            owner,
            faction,
            direction: direction.normalize_or_zero(),
            speed: tuning.projectile_speed,
            damage,
            lifetime: tuning.projectile_lifetime,
            hit_radius: tuning.projectile_hit_radius,
            kind: ProjectileKind::Simple,
            debuff: None,
            last_step: Vec3::ZERO,
            spent: false,
        }
    }

    /// Turn into a piercing shot. A limit of zero keeps it simple.
    pub fn piercing(mut self, limit: u32) -> Self {
        if limit > 0 {
            self.kind = ProjectileKind::Piercing {
                limit,
                hit_set: HashSet::new(),
            };
        }
        self
    }

    pub fn boss(mut self) -> Self {
        self.kind = ProjectileKind::Boss;
        self
    }

    pub fn with_debuff(mut self, debuff: Option<OnHitDebuff>) -> Self {
        self.debuff = debuff;
        self
    }

    /// How the defender resolves this projectile's damage.
    pub fn damage_kind(&self) -> DamageKind {
        match self.kind {
            ProjectileKind::Boss => DamageKind::Flat,
            _ => DamageKind::Hit(AttackerClass::Ranged),
        }
    }

    /// Register a hit on `target`. Returns whether damage should be dealt.
    pub fn try_hit(&mut self, target: Entity) -> bool {
        if self.spent {
            return false;
        }
        match &mut self.kind {
            ProjectileKind::Simple | ProjectileKind::Boss => {
                self.spent = true;
                true
            }
            ProjectileKind::Piercing { limit, hit_set } => {
                if hit_set.len() as u32 >= *limit || !hit_set.insert(target) {
                    return false;
                }
                if hit_set.len() as u32 >= *limit {
                    self.spent = true;
                }
                true
            }
        }
    }

    /// Move along the direction and age; returns the displacement.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.lifetime -= dt;
        self.last_step = self.direction * self.speed * dt;
        self.last_step
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }
}

/// Aim from `origin` at `target`, lifted by `arc` so the shot curves in.
pub fn aim_direction(origin: Vec3, target: Vec3, arc: f32) -> Vec3 {
    (target + Vec3::Y * arc - origin).normalize_or_zero()
}

/// Where along `start..end` the point `p` projects (0..=1) and how far away it is.
pub fn segment_distance(p: Vec3, start: Vec3, end: Vec3) -> (f32, f32) {
    let segment = end - start;
    let length_squared = segment.length_squared();
    if length_squared == 0.0 {
        return (0.0, p.distance(start));
    }
    let t = ((p - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    (t, p.distance(start + segment * t))
}

/// Spawn player-side projectiles requested by the presentation layer.
///
/// An owner with gear fires with at least its weapon's pierce, and with the
/// weapon's on-hit debuff unless the request names one.
pub fn handle_fire_projectile(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    data: Res<CombatData>,
    owners: Query<&Equipment>,
    mut events: EventReader<FireProjectileEvent>,
) {
    for event in events.read() {
        if event.direction.length_squared() == 0.0 {
            debug!("Ignoring projectile with no direction from {:?}", event.owner);
            continue;
        }
        let gear = owners.get(event.owner).ok().map(|equipment| equipment.bonus(&data.items));
        let pierce = event.pierce_limit.max(gear.as_ref().map_or(0, |gear| gear.pierce));
        let debuff = event.debuff.or_else(|| gear.and_then(|gear| gear.on_hit));
        let projectile = Projectile::new(Some(event.owner), Faction::Player, event.direction, event.damage, &tuning)
            .piercing(pierce)
            .with_debuff(debuff);
        commands.spawn((projectile, Transform::from_translation(event.origin)));
    }
}

/// Fly projectiles forward and despawn them when they time out.
pub fn move_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut projectiles: Query<(Entity, &mut Transform, &mut Projectile)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut projectile) in projectiles.iter_mut() {
        transform.translation += projectile.advance(dt);
        if projectile.is_expired() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Swept sphere hit checks against the opposing faction, in flight order.
pub fn projectile_hits(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &Transform, &mut Projectile)>,
    targets: Query<(Entity, &Transform, &Combatant, &Faction), (Without<Projectile>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for (entity, transform, mut projectile) in projectiles.iter_mut() {
        if projectile.is_expired() {
            continue;
        }
        let end = transform.translation;
        let start = end - projectile.last_step;
        let mut in_reach: Vec<(f32, f32, Entity)> = targets
            .iter()
            .filter(|(target, _, combatant, faction)| {
                combatant.is_alive()
                    && projectile.faction.is_hostile_to(**faction)
                    && Some(*target) != projectile.owner
            })
            .map(|(target, target_transform, _, _)| {
                let (along, distance) = segment_distance(target_transform.translation, start, end);
                (along, distance, target)
            })
            .filter(|(_, distance, _)| *distance <= projectile.hit_radius)
            .collect();
        in_reach.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        for (_, _, target) in in_reach {
            if !projectile.try_hit(target) {
                continue;
            }
            damage_events.send(DamageEvent {
                target,
                source: projectile.owner,
                amount: projectile.damage,
                kind: projectile.damage_kind(),
                debuffs: projectile.debuff.into_iter().collect(),
            });
        }

        if projectile.is_spent() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot() -> Projectile {
        Projectile::new(None, Faction::Player, Vec3::X, 10.0, &CombatTuning::default())
    }

    #[test]
    fn simple_projectile_hits_once() {
        let mut projectile = shot();
        assert!(projectile.try_hit(Entity::from_raw(1)));
        assert!(projectile.is_spent());
        assert!(!projectile.try_hit(Entity::from_raw(2)));
    }

    #[test]
    fn piercing_never_hits_the_same_target_twice() {
        let mut projectile = shot().piercing(3);
        let a = Entity::from_raw(1);
        assert!(projectile.try_hit(a));
        assert!(!projectile.try_hit(a));
        assert!(!projectile.is_spent());
    }

    #[test]
    fn piercing_stops_at_its_limit() {
        let mut projectile = shot().piercing(3);
        let hits = (0..5).filter(|i| projectile.try_hit(Entity::from_raw(*i))).count();
        assert_eq!(hits, 3);
        assert!(projectile.is_spent());
    }

    #[test]
    fn zero_pierce_stays_simple() {
        assert_eq!(shot().piercing(0).kind, ProjectileKind::Simple);
    }

    #[test]
    fn boss_shots_ignore_defense() {
        assert_eq!(shot().boss().damage_kind(), DamageKind::Flat);
        assert_eq!(shot().damage_kind(), DamageKind::Hit(AttackerClass::Ranged));
    }

    #[test]
    fn projectiles_expire() {
        let mut projectile = shot();
        let moved = projectile.advance(1.0);
        assert_eq!(moved, Vec3::X * projectile.speed);
        projectile.advance(5.0);
        assert!(projectile.is_expired());
    }

    #[test]
    fn segment_distance_sees_targets_between_endpoints() {
        let start = Vec3::ZERO;
        let end = Vec3::new(10.0, 0.0, 0.0);
        let (along, distance) = segment_distance(Vec3::new(5.0, 0.0, 0.3), start, end);
        assert!((along - 0.5).abs() < 1e-5);
        assert!((distance - 0.3).abs() < 1e-5);
        // Past the end the distance is measured to the endpoint.
        let (along, distance) = segment_distance(Vec3::new(13.0, 0.0, 0.0), start, end);
        assert_eq!(along, 1.0);
        assert!((distance - 3.0).abs() < 1e-5);
        // A shot that has not moved is a point check.
        assert_eq!(segment_distance(Vec3::X, start, start), (0.0, 1.0));
    }

    #[test]
    fn advance_remembers_its_step() {
        let mut projectile = shot();
        projectile.advance(0.1);
        assert_eq!(projectile.last_step, Vec3::X * projectile.speed * 0.1);
    }

    #[test]
    fn aim_arcs_upward() {
        let direction = aim_direction(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.5);
        assert!(direction.y > 0.0);
        assert!((direction.length() - 1.0).abs() < 1e-5);
    }
}
