//! SkillMine combat simulation - headless entry point.
//!
//! Spawns a player and a knight companion in the middle of dungeon level 1,
//! lets the waves come and swings at whatever gets close, opening with
//! abilities when they are ready. The combat log is printed at the end.
//!
//! Usage: `skillmine-sim [seconds] [seed]`

use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use skillmine_combat::abilities::AbilityBook;
use skillmine_combat::combat::{Combatant, Dead};
use skillmine_combat::companion::spawn_companion;
use skillmine_combat::core::{CombatLog, EnterDungeonEvent, ExitDungeonEvent, PlayerAttackEvent, UseAbilityEvent};
use skillmine_combat::data::CombatData;
use skillmine_combat::enemies::{horizontal_distance, Enemy};
use skillmine_combat::player::{spawn_player, Attributes, Equipment, Player, Progression};
use skillmine_combat::SkillMinePlugin;

const TICK: Duration = Duration::from_millis(33);
/// How close the player has to be to swing.
const MELEE_REACH: f32 = 2.5;
const POWER_STRIKE: &str = "power_strike";
const BATTLE_CRY: &str = "battle_cry";

fn main() {
    let mut args = std::env::args().skip(1);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), StatesPlugin))
        .add_plugins(SkillMinePlugin {
            data_dir: None,
            seed: Some(seed),
        })
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
        .add_systems(Startup, setup_player)
        .add_systems(Update, auto_attack);
    app.finish();
    app.cleanup();

    app.update();
    app.world_mut().send_event(EnterDungeonEvent { level: 1 });

    let ticks = (seconds / TICK.as_secs_f32()).ceil() as u32;
    for _ in 0..ticks {
        app.update();
        if player_is_down(&mut app) {
            info!("The player fell; ending the run early");
            break;
        }
    }

    app.world_mut().send_event(ExitDungeonEvent);
    app.update();
    app.update();

    report(&mut app);
}

fn setup_player(mut commands: Commands, data: Res<CombatData>) {
    let mut attributes = Attributes::default();
    attributes.raise_all(5);
    let equipment = Equipment {
        weapon: Some("iron_sword".to_string()),
        armor: vec!["leather_armor".to_string()],
    };
    let player = spawn_player(&mut commands, &data.items, attributes, equipment, Vec3::ZERO);
    commands
        .entity(player)
        .insert(AbilityBook::new([POWER_STRIKE, BATTLE_CRY]));
    info!("Spawned player {:?}", player);

    if let Err(e) = spawn_companion(&mut commands, &data, "knight", player, Vec3::new(1.0, 0.0, 0.0)) {
        warn!("No companion this run: {}", e);
    }
}

/// Ready and affordable right now.
fn can_cast(data: &CombatData, book: &AbilityBook, combatant: &Combatant, ability: &str) -> bool {
    book.is_ready(ability) && data.abilities.get(ability).is_some_and(|def| combatant.mana >= def.mana_cost)
}

/// Swing at the nearest living enemy in reach, using abilities first when
/// they are ready. The cooldown gate drops extra swings.
fn auto_attack(
    data: Res<CombatData>,
    players: Query<(Entity, &Transform, &Combatant, &Equipment, &AbilityBook), (With<Player>, Without<Dead>)>,
    enemies: Query<(Entity, &Transform, &Combatant), (With<Enemy>, Without<Dead>)>,
    mut attacks: EventWriter<PlayerAttackEvent>,
    mut casts: EventWriter<UseAbilityEvent>,
) {
    let Ok((player, player_transform, combatant, equipment, book)) = players.get_single() else {
        return;
    };
    let nearest = enemies
        .iter()
        .filter(|(_, _, enemy)| enemy.is_alive())
        .map(|(entity, transform, _)| {
            (entity, horizontal_distance(player_transform.translation, transform.translation))
        })
        .filter(|(_, distance)| *distance <= MELEE_REACH)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let Some((target, _)) = nearest else {
        return;
    };
    if can_cast(&data, book, combatant, BATTLE_CRY) {
        casts.send(UseAbilityEvent {
            user: player,
            ability: BATTLE_CRY.to_string(),
            target: None,
        });
    } else if can_cast(&data, book, combatant, POWER_STRIKE) {
        casts.send(UseAbilityEvent {
            user: player,
            ability: POWER_STRIKE.to_string(),
            target: Some(target),
        });
    } else {
        attacks.send(PlayerAttackEvent {
            player,
            target,
            raw_damage: combatant.attack_power,
            debuffs: equipment.bonus(&data.items).on_hit.into_iter().collect(),
        });
    }
}

fn player_is_down(app: &mut App) -> bool {
    let world = app.world_mut();
    let mut players = world.query_filtered::<&Combatant, With<Player>>();
    players.iter(world).all(|combatant| combatant.is_dead())
}

fn report(app: &mut App) {
    let world = app.world_mut();
    let mut players = world.query_filtered::<(&Progression, &Combatant), With<Player>>();
    for (progression, combatant) in players.iter(world) {
        info!(
            "Player level {} ({} / {} XP), {} gold, {:.0}/{:.0} HP, {} items",
            progression.level,
            progression.xp,
            progression.xp_to_next,
            progression.gold,
            combatant.health,
            combatant.max_health,
            progression.inventory.len()
        );
    }
    if let Some(log) = world.get_resource::<CombatLog>() {
        for line in log.entries() {
            println!("{}", line);
        }
    }
}
