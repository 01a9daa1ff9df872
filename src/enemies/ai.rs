//! Enemy AI behavior systems.

use bevy::prelude::*;
use rand::Rng;

use super::components::{AiState, Enemy, EnemyStats, Patrol, Target};
use super::data::EnemyArchetype;
use crate::boss::BossAbilities;
use crate::combat::{
    aim_direction, is_stunned, outgoing_damage, AttackCooldown, AttackSpeed, AttackerClass, Buffs, Combatant,
    CombatTuning, DamageKind, Dead, Faction, Projectile, StatusEffects,
};
use crate::core::{CombatRng, DamageDealtEvent, DamageEvent, SetTargetEvent};

/// Distance on the ground plane; height differences never gate AI.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(b.x - a.x, 0.0, b.z - a.z).length()
}

/// Whether `distance` is a valid firing/striking distance for the archetype.
fn in_attack_window(stats: &EnemyStats, distance: f32, tuning: &CombatTuning) -> bool {
    match stats.archetype {
        EnemyArchetype::Ranged => distance > tuning.ranged_min_distance && distance <= stats.projectile_range,
        EnemyArchetype::Melee | EnemyArchetype::Boss => distance <= stats.attack_range,
    }
}

/// Whether an attacking enemy has drifted far enough out of its window to chase again.
///
/// This is also the fire gate: an enemy that is still `Attacking` may always
/// strike. Ranged enemies get no slack on the inside, so they never fire
/// closer than `ranged_min_distance`.
fn left_attack_window(stats: &EnemyStats, distance: f32, tuning: &CombatTuning) -> bool {
    let margin = tuning.attack_hysteresis;
    match stats.archetype {
        EnemyArchetype::Ranged => distance > stats.projectile_range * margin || distance < tuning.ranged_min_distance,
        EnemyArchetype::Melee | EnemyArchetype::Boss => distance > stats.attack_range * margin,
    }
}

/// One step of the AI state machine.
///
/// `distance` is `None` when the enemy has no live target. Patrols carry on
/// without one.
pub fn next_state(state: AiState, stats: &EnemyStats, distance: Option<f32>, tuning: &CombatTuning) -> AiState {
    if matches!(state, AiState::Dying | AiState::Patrolling) && distance.is_none() {
        return state;
    }
    let Some(distance) = distance else {
        return AiState::Idle;
    };
    let escaped = distance > stats.aggro_range * tuning.escape_factor;

    match state {
        AiState::Idle | AiState::Patrolling if distance <= stats.aggro_range => AiState::Chasing,
        AiState::Idle => AiState::Idle,
        AiState::Patrolling => AiState::Patrolling,
        AiState::Chasing | AiState::Attacking if escaped => AiState::Idle,
        AiState::Chasing if in_attack_window(stats, distance, tuning) => AiState::Attacking,
        AiState::Chasing => AiState::Chasing,
        AiState::Attacking if left_attack_window(stats, distance, tuning) => AiState::Chasing,
        AiState::Attacking => AiState::Attacking,
        AiState::Fleeing if distance > stats.aggro_range * tuning.flee_safe_factor => AiState::Idle,
        AiState::Fleeing => AiState::Fleeing,
        AiState::Dying => AiState::Dying,
    }
}

/// Retarget requests from outside the core.
pub fn handle_set_target(
    mut events: EventReader<SetTargetEvent>,
    mut enemies: Query<(&mut Target, &mut AiState), With<Enemy>>,
) {
    for event in events.read() {
        let Ok((mut target, mut state)) = enemies.get_mut(event.enemy) else {
            debug!("SetTarget for unknown enemy {:?}", event.enemy);
            continue;
        };
        target.0 = event.target;
        if event.target.is_none() && *state != AiState::Dying {
            *state = AiState::Idle;
        }
    }
}

/// Drop dead or despawned targets; idle enemies pick the nearest player-side
/// combatant inside aggro range.
pub fn validate_targets(
    mut enemies: Query<(&Transform, &EnemyStats, &mut Target, &mut AiState), (With<Enemy>, Without<Dead>)>,
    candidates: Query<(Entity, &Transform, &Combatant, &Faction), (Without<Enemy>, Without<Dead>)>,
) {
    for (transform, stats, mut target, mut state) in enemies.iter_mut() {
        if *state == AiState::Dying {
            continue;
        }
        if let Some(current) = target.0 {
            let alive = candidates
                .get(current)
                .is_ok_and(|(_, _, combatant, _)| combatant.is_alive());
            if !alive {
                target.0 = None;
                *state = AiState::Idle;
            }
        }
        if target.0.is_some() || !matches!(*state, AiState::Idle | AiState::Patrolling) {
            continue;
        }
        let position = transform.translation;
        target.0 = candidates
            .iter()
            .filter(|(_, _, combatant, faction)| combatant.is_alive() && Faction::Enemy.is_hostile_to(**faction))
            .map(|(entity, candidate, _, _)| (horizontal_distance(position, candidate.translation), entity))
            .filter(|(distance, _)| *distance <= stats.aggro_range)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, entity)| entity);
    }
}

/// Distance-gated state transitions.
pub fn update_ai_states(
    tuning: Res<CombatTuning>,
    mut enemies: Query<(&Transform, &EnemyStats, &Target, &mut AiState), With<Enemy>>,
    targets: Query<&Transform, Without<Enemy>>,
) {
    for (transform, stats, target, mut state) in enemies.iter_mut() {
        let distance = target
            .0
            .and_then(|entity| targets.get(entity).ok())
            .map(|target| horizontal_distance(transform.translation, target.translation));
        let next = next_state(*state, stats, distance, &tuning);
        if next != *state {
            *state = next;
        }
    }
}

/// Untargeted idle enemies occasionally set off on a patrol around their home.
pub fn start_patrols(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<CombatRng>,
    mut enemies: Query<(&Enemy, &Target, &mut AiState, &mut Patrol), Without<Dead>>,
) {
    let chance = tuning.patrol_chance * time.delta_secs();
    if chance <= 0.0 {
        return;
    }
    for (enemy, target, mut state, mut patrol) in enemies.iter_mut() {
        if *state != AiState::Idle || target.0.is_some() || enemy.archetype == EnemyArchetype::Boss {
            continue;
        }
        if rng.0.gen::<f32>() >= chance {
            continue;
        }
        if patrol.waypoints.is_empty() {
            let radius = tuning.patrol_radius;
            let home = patrol.home;
            patrol.waypoints = (0..tuning.patrol_waypoints)
                .map(|_| home + Vec3::new(rng.0.gen_range(-radius..=radius), 0.0, rng.0.gen_range(-radius..=radius)))
                .collect();
        }
        debug!("{} starts patrolling", enemy.name);
        *state = AiState::Patrolling;
    }
}

/// Walk toward the current waypoint at patrol pace; returns the step to take.
fn patrol_step(position: Vec3, patrol: &mut Patrol, speed: f32, tuning: &CombatTuning) -> Vec3 {
    let Some(waypoint) = patrol.current() else {
        return Vec3::ZERO;
    };
    let toward = Vec3::new(waypoint.x - position.x, 0.0, waypoint.z - position.z);
    if toward.length() < tuning.patrol_arrive_distance {
        patrol.advance();
        return Vec3::ZERO;
    }
    toward.normalize_or_zero() * speed * tuning.patrol_speed_factor
}

/// Chase, back off, patrol or flee, then face the target. Stunned enemies stand still.
pub fn move_enemies(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut enemies: Query<
        (
            &mut Transform,
            &EnemyStats,
            &Target,
            &AiState,
            Option<&StatusEffects>,
            Option<&Buffs>,
            Option<&mut Patrol>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    targets: Query<&Transform, Without<Enemy>>,
) {
    let dt = time.delta_secs();
    for (mut transform, stats, target, state, status, buffs, patrol) in enemies.iter_mut() {
        if is_stunned(buffs) {
            continue;
        }
        let speed = status.map_or(stats.speed, |status| status.effective_speed(stats.speed, tuning.min_speed));

        if *state == AiState::Patrolling {
            if let Some(mut patrol) = patrol {
                let step = patrol_step(transform.translation, &mut patrol, speed, &tuning);
                transform.translation += step * dt;
            }
            continue;
        }

        let Some(target_position) = target.0.and_then(|entity| targets.get(entity).ok()).map(|t| t.translation)
        else {
            continue;
        };
        let position = transform.translation;
        let toward = Vec3::new(target_position.x - position.x, 0.0, target_position.z - position.z);
        let distance = toward.length();

        let step = match *state {
            AiState::Chasing if stats.archetype == EnemyArchetype::Ranged && distance <= tuning.ranged_min_distance => {
                -toward.normalize_or_zero() * speed
            }
            AiState::Chasing if distance > 0.1 => toward.normalize_or_zero() * speed,
            AiState::Fleeing => -toward.normalize_or_zero() * speed * tuning.flee_speed_multiplier,
            _ => Vec3::ZERO,
        };
        transform.translation += step * dt;

        if matches!(*state, AiState::Chasing | AiState::Attacking) && distance > 0.1 {
            let look_target = Vec3::new(target_position.x, transform.translation.y, target_position.z);
            transform.look_at(look_target, Vec3::Y);
        }
    }
}

/// Fire melee hits and ranged shots whenever the cooldown allows and the
/// target is still inside the attack window.
pub fn enemy_attacks(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &EnemyStats,
            &Target,
            &AiState,
            &Combatant,
            &mut AttackCooldown,
            &AttackSpeed,
            Option<&StatusEffects>,
            Option<&Buffs>,
            Option<&BossAbilities>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    targets: Query<&Transform, Without<Enemy>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for (entity, transform, stats, target, state, combatant, mut cooldown, speed, status, buffs, abilities) in
        enemies.iter_mut()
    {
        if *state != AiState::Attacking || !cooldown.is_ready() || is_stunned(buffs) {
            continue;
        }
        let Some(target_entity) = target.0 else {
            continue;
        };
        let Ok(target_transform) = targets.get(target_entity) else {
            continue;
        };
        let distance = horizontal_distance(transform.translation, target_transform.translation);
        if left_attack_window(stats, distance, &tuning) {
            continue;
        }
        let rage = abilities.map_or(1.0, BossAbilities::damage_multiplier);
        let buffed = buffs.map_or(1.0, Buffs::outgoing_multiplier);
        let damage = outgoing_damage(combatant.attack_power * rage * buffed, 0.0, status);

        match stats.archetype {
            EnemyArchetype::Ranged => {
                let origin = transform.translation + Vec3::Y * 0.5;
                let direction = aim_direction(origin, target_transform.translation, tuning.projectile_arc);
                let projectile = Projectile::new(Some(entity), Faction::Enemy, direction, damage, &tuning);
                commands.spawn((projectile, Transform::from_translation(origin)));
            }
            EnemyArchetype::Melee | EnemyArchetype::Boss => {
                let class = if stats.archetype == EnemyArchetype::Boss {
                    AttackerClass::BossMelee
                } else {
                    AttackerClass::EnemyMelee
                };
                damage_events.send(DamageEvent {
                    target: target_entity,
                    source: Some(entity),
                    amount: damage,
                    kind: DamageKind::Hit(class),
                    debuffs: Vec::new(),
                });
            }
        }
        cooldown.reset(stats.attack_cooldown, speed.0);
    }
}

/// Badly hurt regular enemies may panic and run when hit.
pub fn flee_when_hurt(
    tuning: Res<CombatTuning>,
    mut rng: ResMut<CombatRng>,
    mut dealt_events: EventReader<DamageDealtEvent>,
    mut enemies: Query<(&Enemy, &Combatant, &mut AiState), Without<Dead>>,
) {
    for event in dealt_events.read() {
        let Ok((enemy, combatant, mut state)) = enemies.get_mut(event.target) else {
            continue;
        };
        if enemy.archetype == EnemyArchetype::Boss
            || combatant.is_dead()
            || matches!(*state, AiState::Fleeing | AiState::Dying)
            || combatant.health_ratio() >= tuning.flee_health_ratio
        {
            continue;
        }
        if rng.0.gen::<f32>() < tuning.flee_chance {
            debug!("{} flees", enemy.name);
            *state = AiState::Fleeing;
        }
    }
}
