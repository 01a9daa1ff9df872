//! Open-world spawn points and player progression.

mod common;

use bevy::prelude::*;

use common::*;
use skillmine_combat::combat::{Combatant, Stamina};
use skillmine_combat::core::EnemyDefeatedEvent;
use skillmine_combat::enemies::{SpawnPoint, SpawnedBy};
use skillmine_combat::items::Loot;
use skillmine_combat::player::{Attributes, Progression};

fn spawned_from(app: &mut App, point: Entity) -> usize {
    let world = app.world_mut();
    world
        .query::<&SpawnedBy>()
        .iter(world)
        .filter(|spawned_by| spawned_by.0 == point)
        .count()
}

fn spawn_point(app: &mut App, position: Vec3, max_count: u32) -> Entity {
    app.world_mut()
        .spawn((SpawnPoint::new(vec!["slime".into()], max_count), Transform::from_translation(position)))
        .id()
}

#[test]
fn spawn_points_fill_up_to_capacity() {
    let mut app = test_app();
    let point = spawn_point(&mut app, Vec3::new(50.0, 0.0, 0.0), 2);

    run_for(&mut app, 9.0);
    assert_eq!(spawned_from(&mut app, point), 0);
    run_for(&mut app, 1.5);
    assert_eq!(spawned_from(&mut app, point), 1);
    run_for(&mut app, 10.0);
    assert_eq!(spawned_from(&mut app, point), 2);
    run_for(&mut app, 10.0);
    assert_eq!(spawned_from(&mut app, point), 2);
    assert_eq!(app.world().get::<SpawnPoint>(point).map(|p| p.current_count), Some(2));
}

#[test]
fn nearby_players_keep_spawn_points_quiet() {
    let mut app = test_app();
    let point = spawn_point(&mut app, Vec3::new(50.0, 0.0, 0.0), 2);
    spawn_test_player(&mut app, Vec3::new(45.0, 0.0, 0.0));

    run_for(&mut app, 10.5);
    assert_eq!(spawned_from(&mut app, point), 0);
}

#[test]
fn level_up_raises_attributes_and_refills_pools() {
    let mut app = test_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO);
    app.update();
    if let Some(mut combatant) = app.world_mut().get_mut::<Combatant>(player) {
        combatant.health = 30.0;
    }

    app.world_mut().send_event(EnemyDefeatedEvent {
        entity: Entity::PLACEHOLDER,
        enemy_type: "goblin".into(),
        name: "Goblin".into(),
        loot: Loot {
            xp: 120,
            gold: 7,
            items: vec!["goblin_ear".into()],
        },
    });
    app.update();

    let world = app.world();
    let progression = world.get::<Progression>(player).expect("progression");
    assert_eq!(progression.level, 2);
    assert_eq!(progression.xp, 20);
    assert_eq!(progression.gold, 7);
    assert_eq!(progression.inventory, vec!["goblin_ear".to_string()]);

    assert_eq!(world.get::<Attributes>(player).map(|a| a.strength), Some(12));
    let combatant = world.get::<Combatant>(player).expect("combatant");
    assert_eq!(combatant.max_health, 110.0);
    assert_eq!(combatant.health, 110.0);
    assert_eq!(combatant.attack_power, 24.0);
    let stamina = world.get::<Stamina>(player).expect("stamina");
    assert_eq!(stamina.current, stamina.maximum);
    assert_eq!(stamina.maximum, 136.0);
}

#[test]
fn player_regenerates_over_time() {
    let mut app = test_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO);
    app.update();
    if let Some(mut combatant) = app.world_mut().get_mut::<Combatant>(player) {
        combatant.health = 50.0;
        combatant.mana = 10.0;
    }
    run_for(&mut app, 1.0);

    let combatant = app.world().get::<Combatant>(player).expect("combatant");
    assert!((combatant.health - 50.2).abs() < 0.01, "health {}", combatant.health);
    assert!((combatant.mana - 12.0).abs() < 0.01, "mana {}", combatant.mana);
}
