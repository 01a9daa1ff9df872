//! Shared headless app setup for the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use skillmine_combat::combat::{Combatant, DamageKind, Faction, StatusEffects};
use skillmine_combat::core::DamageEvent;
use skillmine_combat::data::CombatData;
use skillmine_combat::enemies::spawn_enemy;
use skillmine_combat::player::{spawn_player, Attributes, Equipment};
use skillmine_combat::SkillMinePlugin;

pub const TICK: Duration = Duration::from_millis(50);

/// Headless app with the full combat core, a seeded RNG and fixed 50 ms ticks.
pub fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .add_plugins(SkillMinePlugin {
            data_dir: None,
            seed: Some(42),
        })
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK));
    app.finish();
    app.cleanup();
    // The first update only primes the clock: delta is zero.
    app.update();
    app
}

pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Run for at least `seconds` of game time.
pub fn run_for(app: &mut App, seconds: f32) {
    let ticks = (seconds / TICK.as_secs_f32()).ceil() as usize;
    run_ticks(app, ticks);
}

/// A bare combatant with no AI, useful as a target.
pub fn spawn_dummy(app: &mut App, faction: Faction, health: f32, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Combatant::new(health),
            StatusEffects::default(),
            faction,
            Transform::from_translation(position),
        ))
        .id()
}

pub fn spawn_test_player(app: &mut App, position: Vec3) -> Entity {
    let items = app.world().resource::<CombatData>().items.clone();
    let player = {
        let mut commands = app.world_mut().commands();
        spawn_player(&mut commands, &items, Attributes::default(), Equipment::default(), position)
    };
    app.world_mut().flush();
    player
}

pub fn spawn_test_enemy(app: &mut App, enemy_type: &str, position: Vec3, target: Option<Entity>) -> Entity {
    let data = app.world().resource::<CombatData>().clone();
    let spawned = {
        let mut commands = app.world_mut().commands();
        spawn_enemy(&mut commands, &data, enemy_type, position, None, target)
    };
    app.world_mut().flush();
    spawned.unwrap_or_else(|e| panic!("spawning {enemy_type}: {e}"))
}

/// Queue defense-ignoring damage for the next update.
pub fn hit(app: &mut App, target: Entity, amount: f32) {
    app.world_mut().send_event(DamageEvent {
        target,
        source: None,
        amount,
        kind: DamageKind::Flat,
        debuffs: Vec::new(),
    });
}

pub fn health(app: &App, entity: Entity) -> f32 {
    app.world()
        .get::<Combatant>(entity)
        .map_or(f32::NAN, |combatant| combatant.health)
}
