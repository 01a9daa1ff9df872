//! Enemy AI through a headless app: ranged engagement, panic and fast shots.

mod common;

use bevy::prelude::*;

use common::*;
use skillmine_combat::combat::{CombatTuning, Faction, Projectile};
use skillmine_combat::core::FireProjectileEvent;
use skillmine_combat::enemies::{AiState, Target};

fn projectiles(app: &mut App) -> Vec<Projectile> {
    let world = app.world_mut();
    world.query::<&Projectile>().iter(world).cloned().collect()
}

fn state(app: &App, enemy: Entity) -> Option<AiState> {
    app.world().get::<AiState>(enemy).copied()
}

fn move_to(app: &mut App, entity: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(entity) {
        transform.translation = position;
    }
}

#[test]
fn archer_keeps_shooting_a_target_that_steps_just_out_of_range() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 100.0, Vec3::new(10.0, 0.0, 0.0));
    let archer = spawn_test_enemy(&mut app, "goblin_archer", Vec3::ZERO, Some(victim));

    for _ in 0..60 {
        app.update();
        if health(&app, victim) < 100.0 {
            break;
        }
    }
    let after_first = health(&app, victim);
    assert!(after_first < 100.0);

    // Past projectile_range (12) but inside its hysteresis band
    move_to(&mut app, victim, Vec3::new(13.0, 0.0, 0.0));
    run_for(&mut app, 3.0);

    assert_eq!(state(&app, archer), Some(AiState::Attacking));
    assert!(health(&app, victim) < after_first);
}

#[test]
fn ranged_shots_arc_toward_the_target() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 100.0, Vec3::new(8.0, 0.0, 0.0));
    let archer = spawn_test_enemy(&mut app, "goblin_archer", Vec3::ZERO, Some(victim));

    let mut shots = Vec::new();
    for _ in 0..20 {
        app.update();
        shots = projectiles(&mut app);
        if !shots.is_empty() {
            break;
        }
    }
    assert_eq!(shots.len(), 1);
    let shot = &shots[0];
    assert_eq!(shot.faction, Faction::Enemy);
    assert_eq!(shot.owner, Some(archer));

    let origin = app.world().get::<Transform>(archer).map_or(Vec3::ZERO, |t| t.translation) + Vec3::Y * 0.5;
    let straight = (Vec3::new(8.0, 0.0, 0.0) - origin).normalize();
    assert!(shot.direction.y > straight.y);
    assert!(shot.direction.x > 0.9);
}

#[test]
fn archers_hold_fire_inside_their_minimum_distance() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 100.0, Vec3::new(2.8, 0.0, 0.0));
    let archer = spawn_test_enemy(&mut app, "goblin_archer", Vec3::ZERO, Some(victim));
    if let Some(mut state) = app.world_mut().get_mut::<AiState>(archer) {
        *state = AiState::Attacking;
    }

    app.update();

    assert!(projectiles(&mut app).is_empty());
    assert_eq!(state(&app, archer), Some(AiState::Chasing));
}

#[test]
fn badly_hurt_goblin_eventually_flees() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 1000.0, Vec3::new(5.0, 0.0, 0.0));
    let goblin = spawn_test_enemy(&mut app, "goblin", Vec3::ZERO, Some(victim));

    hit(&mut app, goblin, 41.0);
    app.update();
    for _ in 0..40 {
        if state(&app, goblin) == Some(AiState::Fleeing) {
            break;
        }
        hit(&mut app, goblin, 0.1);
        app.update();
    }

    assert_eq!(state(&app, goblin), Some(AiState::Fleeing));
    assert!(health(&app, goblin) > 0.0);
}

#[test]
fn bosses_never_flee() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 10_000.0, Vec3::new(5.0, 0.0, 0.0));
    let king = spawn_test_enemy(&mut app, "goblin_king", Vec3::ZERO, Some(victim));

    hit(&mut app, king, 370.0);
    app.update();
    for _ in 0..40 {
        hit(&mut app, king, 0.1);
        app.update();
        assert_ne!(state(&app, king), Some(AiState::Fleeing));
    }
    assert!(health(&app, king) < 30.0);
}

#[test]
fn fast_shots_hit_targets_between_frames() {
    let mut app = test_app();
    app.world_mut().resource_mut::<CombatTuning>().projectile_speed = 100.0;
    let shooter = spawn_dummy(&mut app, Faction::Player, 100.0, Vec3::ZERO);
    let target = spawn_dummy(&mut app, Faction::Enemy, 100.0, Vec3::new(2.5, 0.0, 0.0));

    app.world_mut().send_event(FireProjectileEvent {
        owner: shooter,
        origin: Vec3::ZERO,
        direction: Vec3::X,
        damage: 10.0,
        pierce_limit: 0,
        debuff: None,
    });
    run_ticks(&mut app, 3);

    assert_eq!(health(&app, target), 90.0);
    assert!(projectiles(&mut app).is_empty());
}

#[test]
fn untargeted_enemies_wander_and_return_to_the_hunt() {
    let mut app = test_app();
    app.world_mut().resource_mut::<CombatTuning>().patrol_chance = 1000.0;
    let goblin = spawn_test_enemy(&mut app, "goblin", Vec3::ZERO, None);

    run_ticks(&mut app, 2);
    assert_eq!(state(&app, goblin), Some(AiState::Patrolling));
    run_for(&mut app, 1.0);
    let wandered = app.world().get::<Transform>(goblin).map_or(0.0, |t| t.translation.length());
    assert!(wandered > 0.0);

    let victim = spawn_dummy(&mut app, Faction::Player, 100.0, Vec3::new(4.0, 0.0, 0.0));
    run_ticks(&mut app, 3);
    assert_eq!(app.world().get::<Target>(goblin).and_then(|t| t.0), Some(victim));
    assert!(matches!(state(&app, goblin), Some(AiState::Chasing | AiState::Attacking)));
}
