//! Boss phases, revive/enrage, partner avenge and specials through a headless app.

mod common;

use bevy::prelude::*;

use common::*;
use skillmine_combat::boss::{link_partners, BossAbilities, BossAbility, BossState};
use skillmine_combat::combat::{Combatant, Dead, Faction, Projectile, StatusEffects};
use skillmine_combat::data::CombatData;
use skillmine_combat::enemies::{AiState, EnemyStats};

fn boss_state(app: &App, boss: Entity) -> BossState {
    app.world().get::<BossState>(boss).cloned().expect("boss state")
}

/// Put a boss one point away from true death: revived, enraged, pool almost empty.
fn bring_to_brink(app: &mut App, boss: Entity) {
    let world = app.world_mut();
    if let Some(mut state) = world.get_mut::<BossState>(boss) {
        state.has_revived = true;
        state.is_enraged = true;
        state.enrage_damage_taken = state.original_max_health - 1.0;
    }
    if let Some(mut combatant) = world.get_mut::<Combatant>(boss) {
        combatant.health = 1.0;
    }
}

/// Give a boss exactly `abilities`, all off cooldown, and point it at `target`.
fn arm(app: &mut App, boss: Entity, abilities: &[BossAbility]) {
    let table = app.world().resource::<CombatData>().bosses.clone();
    let mut armed = BossAbilities::new(abilities, &table);
    armed.tick(100.0);
    let mut entity = app.world_mut().entity_mut(boss);
    entity.insert(armed);
    if let Some(mut state) = entity.get_mut::<AiState>() {
        *state = AiState::Chasing;
    }
}

fn projectile_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&Projectile>().iter(world).count()
}

fn spawn_twins(app: &mut App) -> (Entity, Entity) {
    let sun = spawn_test_enemy(app, "sun_knight", Vec3::new(60.0, 0.0, 0.0), None);
    let moon = spawn_test_enemy(app, "moon_knight", Vec3::new(64.0, 0.0, 0.0), None);
    {
        let mut commands = app.world_mut().commands();
        link_partners(&mut commands, sun, moon);
    }
    app.world_mut().flush();
    (sun, moon)
}

#[test]
fn phases_never_drop_after_healing() {
    let mut app = test_app();
    let king = spawn_test_enemy(&mut app, "goblin_king", Vec3::new(50.0, 0.0, 0.0), None);
    assert_eq!(boss_state(&app, king).phase(), 1);

    hit(&mut app, king, 220.0);
    app.update();
    assert_eq!(health(&app, king), 180.0);
    assert_eq!(boss_state(&app, king).phase(), 2);

    if let Some(mut combatant) = app.world_mut().get_mut::<Combatant>(king) {
        combatant.heal(1000.0);
    }
    hit(&mut app, king, 10.0);
    app.update();
    assert_eq!(health(&app, king), 390.0);
    assert_eq!(boss_state(&app, king).phase(), 2);

    hit(&mut app, king, 300.0);
    app.update();
    assert_eq!(boss_state(&app, king).phase(), 3);
}

#[test]
fn revive_happens_once_and_the_enrage_pool_decides_death() {
    let mut app = test_app();
    let king = spawn_test_enemy(&mut app, "goblin_king", Vec3::new(50.0, 0.0, 0.0), None);

    hit(&mut app, king, 500.0);
    app.update();
    let state = boss_state(&app, king);
    assert!(state.has_revived && state.is_enraged);
    assert_eq!(health(&app, king), 1.0);
    assert!(app.world().get::<Dead>(king).is_none());

    // Another lethal-sized hit feeds the pool instead of reviving again
    hit(&mut app, king, 399.0);
    app.update();
    let state = boss_state(&app, king);
    assert_eq!(state.enrage_damage_taken, 399.0);
    assert_eq!(health(&app, king), 1.0);
    assert!(app.world().get::<Dead>(king).is_none());

    hit(&mut app, king, 1.0);
    app.update();
    assert!(boss_state(&app, king).is_defeated());
    assert_eq!(health(&app, king), 0.0);
    assert!(app.world().get::<Dead>(king).is_some());
}

#[test]
fn survivor_is_avenged_exactly_once() {
    let mut app = test_app();
    let (sun, moon) = spawn_twins(&mut app);

    bring_to_brink(&mut app, moon);
    hit(&mut app, moon, 10.0);
    run_ticks(&mut app, 2);

    assert!(app.world().get::<Dead>(moon).is_some());
    assert!(boss_state(&app, sun).avenge_triggered);
    let sun_health = app.world().get::<Combatant>(sun).cloned().expect("sun");
    assert_eq!(sun_health.max_health, 900.0);
    assert_eq!(sun_health.health, 900.0);
    let speed = app.world().get::<EnemyStats>(sun).map(|stats| stats.speed);
    assert_eq!(speed, Some(4.5));

    // Killing the survivor afterwards grants nothing further
    bring_to_brink(&mut app, sun);
    hit(&mut app, sun, 10.0);
    run_ticks(&mut app, 2);
    assert!(app.world().get::<Dead>(sun).is_some());
    assert_eq!(health(&app, sun), 0.0);
}

#[test]
fn partners_falling_together_trigger_no_avenge() {
    let mut app = test_app();
    let (sun, moon) = spawn_twins(&mut app);
    bring_to_brink(&mut app, sun);
    bring_to_brink(&mut app, moon);

    hit(&mut app, sun, 10.0);
    hit(&mut app, moon, 10.0);
    run_ticks(&mut app, 2);

    for boss in [sun, moon] {
        assert!(app.world().get::<Dead>(boss).is_some());
        assert!(!boss_state(&app, boss).avenge_triggered);
    }
    let sun_max = app.world().get::<Combatant>(sun).map(|c| c.max_health);
    assert_eq!(sun_max, Some(600.0));
}

#[test]
fn one_ranged_special_per_tick() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 1000.0, Vec3::new(8.0, 0.0, 0.0));
    let lich = spawn_test_enemy(&mut app, "lich_lord", Vec3::ZERO, Some(victim));
    arm(
        &mut app,
        lich,
        &[BossAbility::Fireball, BossAbility::VenomSpit, BossAbility::ShadowBolt],
    );

    for expected in 1..=3 {
        app.update();
        assert_eq!(projectile_count(&mut app), expected);
    }
}

#[test]
fn soul_drain_heals_without_undoing_the_phase() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 100.0, Vec3::new(4.0, 0.0, 0.0));
    let wraith = spawn_test_enemy(&mut app, "shadow_wraith", Vec3::ZERO, Some(victim));
    hit(&mut app, wraith, 230.0);
    app.update();
    assert_eq!(boss_state(&app, wraith).phase(), 2);

    arm(&mut app, wraith, &[BossAbility::SoulDrain]);
    app.update();

    assert_eq!(health(&app, wraith), 240.0);
    assert_eq!(health(&app, victim), 80.0);
    assert_eq!(boss_state(&app, wraith).phase(), 2);
}

#[test]
fn terror_scream_frightens_the_target() {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 100.0, Vec3::new(5.0, 0.0, 0.0));
    let wraith = spawn_test_enemy(&mut app, "shadow_wraith", Vec3::ZERO, Some(victim));
    arm(&mut app, wraith, &[BossAbility::TerrorScream]);
    app.update();

    let status = app.world().get::<StatusEffects>(victim).cloned().expect("status");
    assert!(status.is_feared());
    assert_eq!(status.fear_multiplier, 1.5);
    assert_eq!(health(&app, victim), 100.0);
}

/// Damage of the king's first melee blow on a defenseless dummy, with the
/// king below half health.
fn first_blow(abilities: &[BossAbility]) -> f32 {
    let mut app = test_app();
    let victim = spawn_dummy(&mut app, Faction::Player, 1000.0, Vec3::new(10.0, 0.0, 0.0));
    let king = spawn_test_enemy(&mut app, "goblin_king", Vec3::ZERO, Some(victim));
    hit(&mut app, king, 220.0);
    app.update();
    arm(&mut app, king, abilities);

    for _ in 0..100 {
        app.update();
        if health(&app, victim) < 1000.0 {
            break;
        }
    }
    1000.0 - health(&app, victim)
}

#[test]
fn blood_rage_multiplies_melee_damage() {
    let calm = first_blow(&[]);
    let raging = first_blow(&[BossAbility::BloodRage]);
    assert!(calm > 0.0);
    assert!((raging - calm * 1.5).abs() < 1e-3);
}

#[test]
fn lethal_poison_triggers_the_revive() {
    let mut app = test_app();
    let king = spawn_test_enemy(&mut app, "goblin_king", Vec3::new(50.0, 0.0, 0.0), None);
    {
        let mut entity = app.world_mut().entity_mut(king);
        if let Some(mut combatant) = entity.get_mut::<Combatant>() {
            combatant.health = 1.0;
        }
        if let Some(mut status) = entity.get_mut::<StatusEffects>() {
            status.apply_poison(50.0, 5.0);
        }
    }
    app.update();

    let state = boss_state(&app, king);
    assert!(state.has_revived && state.is_enraged);
    assert_eq!(health(&app, king), 1.0);
    assert!(app.world().get::<Dead>(king).is_none());
    let status = app.world().get::<StatusEffects>(king).cloned().expect("status");
    assert!(status.is_clear());
}
