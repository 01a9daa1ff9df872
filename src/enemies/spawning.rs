//! Enemy spawning, world spawn points and defeat rewards.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::components::{AiState, Enemy, EnemyType, Patrol, SpawnPoint, SpawnedBy, Target};
use crate::boss::{BossAbilities, BossState};
use crate::combat::{AttackCooldown, AttackSpeed, Buffs, CombatTuning, Faction, StatusEffects};
use crate::core::{
    ChatMessageEvent, CombatRng, DeathEvent, EnemyDefeatedEvent, MessageStyle, ScheduledTask, Scheduler,
    SpawnEnemyEvent,
};
use crate::data::{CombatData, SpawnError};
use crate::items::{roll_drop, roll_gold, Loot};

/// Spawn an enemy of a registered type.
///
/// Bosses also get their phase state and ability table.
pub fn spawn_enemy(
    commands: &mut Commands,
    data: &CombatData,
    enemy_type: &str,
    position: Vec3,
    health_override: Option<f32>,
    target: Option<Entity>,
) -> Result<Entity, SpawnError> {
    let definition = data
        .enemies
        .get(enemy_type)
        .ok_or_else(|| SpawnError::UnknownEnemyType(enemy_type.to_string()))?;
    if let Some(value) = health_override {
        if !(value.is_finite() && value > 0.0) {
            return Err(SpawnError::InvalidHealth {
                enemy_type: enemy_type.to_string(),
                value,
            });
        }
    }

    let combatant = definition.to_combatant(health_override);
    let max_health = combatant.max_health;
    let mut entity = commands.spawn((
        Enemy {
            name: definition.name.clone(),
            archetype: definition.archetype,
            xp_value: definition.xp_reward,
            gold_reward: definition.gold_reward,
        },
        EnemyType(enemy_type.to_string()),
        definition.to_stats(),
        combatant,
        StatusEffects::default(),
        Buffs::default(),
        Faction::Enemy,
        AiState::default(),
        Target(target),
        Patrol::new(position),
        AttackCooldown::default(),
        AttackSpeed::default(),
        Transform::from_translation(position),
    ));

    if definition.is_boss() {
        let capabilities = data
            .bosses
            .get(enemy_type)
            .map(|profile| profile.abilities.as_slice())
            .unwrap_or_default();
        entity.insert((
            BossState::new(max_health),
            BossAbilities::new(capabilities, &data.bosses),
        ));
        info!("Boss {} spawned with {} HP", definition.name, max_health);
    } else {
        debug!("Spawned {} at {:?}", definition.name, position);
    }

    Ok(entity.id())
}

pub fn handle_spawn_requests(
    mut commands: Commands,
    data: Res<CombatData>,
    mut events: EventReader<SpawnEnemyEvent>,
) {
    for event in events.read() {
        if let Err(e) = spawn_enemy(
            &mut commands,
            &data,
            &event.enemy_type,
            event.position,
            event.health_override,
            event.target,
        ) {
            warn!("Spawn request rejected: {}", e);
        }
    }
}

/// Open-world spawn cadence and limits.
#[derive(Resource, Debug, Clone)]
pub struct WorldSpawner {
    pub timer: Timer,
    /// No spawns while this many enemies are alive.
    pub max_enemies: usize,
    /// Points with a player this close stay quiet.
    pub min_player_distance: f32,
    /// Spawn position jitter on each ground axis.
    pub jitter: f32,
}

impl Default for WorldSpawner {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(10.0, TimerMode::Repeating),
            max_enemies: 20,
            min_player_distance: 15.0,
            jitter: 3.0,
        }
    }
}

/// Every spawner period, each eligible spawn point adds one enemy.
pub fn spawn_from_points(
    mut commands: Commands,
    time: Res<Time>,
    data: Res<CombatData>,
    mut rng: ResMut<CombatRng>,
    mut spawner: ResMut<WorldSpawner>,
    mut points: Query<(Entity, &Transform, &mut SpawnPoint)>,
    enemies: Query<&AiState, With<Enemy>>,
    actors: Query<(&Transform, &Faction), Without<Enemy>>,
) {
    if !spawner.timer.tick(time.delta()).just_finished() {
        return;
    }
    let mut alive = enemies.iter().filter(|state| **state != AiState::Dying).count();

    for (point_entity, transform, mut point) in points.iter_mut() {
        if alive >= spawner.max_enemies || point.is_full() {
            continue;
        }
        let origin = transform.translation;
        let player_near = actors.iter().any(|(actor, faction)| {
            *faction == Faction::Player && actor.translation.distance(origin) < spawner.min_player_distance
        });
        if player_near {
            continue;
        }
        let Some(enemy_type) = point.enemy_types.choose(&mut rng.0).cloned() else {
            continue;
        };
        let offset = Vec3::new(
            rng.0.gen_range(-spawner.jitter..=spawner.jitter),
            0.0,
            rng.0.gen_range(-spawner.jitter..=spawner.jitter),
        );
        match spawn_enemy(&mut commands, &data, &enemy_type, origin + offset, None, None) {
            Ok(enemy) => {
                commands.entity(enemy).insert(SpawnedBy(point_entity));
                point.current_count += 1;
                alive += 1;
            }
            Err(e) => warn!("Spawn point {:?}: {}", point_entity, e),
        }
    }
}

/// Dying state, despawn scheduling and loot for fallen enemies.
pub fn handle_enemy_deaths(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    data: Res<CombatData>,
    mut rng: ResMut<CombatRng>,
    mut scheduler: ResMut<Scheduler>,
    mut deaths: EventReader<DeathEvent>,
    mut enemies: Query<(&Enemy, &EnemyType, &mut AiState, Option<&SpawnedBy>)>,
    mut points: Query<&mut SpawnPoint>,
    mut defeated: EventWriter<EnemyDefeatedEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    let now = time.elapsed_secs_f64();
    for death in deaths.read() {
        let Ok((enemy, enemy_type, mut state, spawned_by)) = enemies.get_mut(death.entity) else {
            continue;
        };
        if *state == AiState::Dying {
            continue;
        }
        *state = AiState::Dying;
        scheduler.schedule(now, tuning.death_grace, Some(death.entity), ScheduledTask::Despawn);

        if let Some(SpawnedBy(point)) = spawned_by {
            if let Ok(mut point) = points.get_mut(*point) {
                point.current_count = point.current_count.saturating_sub(1);
            }
        }

        let loot = Loot {
            xp: enemy.xp_value,
            gold: roll_gold(enemy.gold_reward, &mut rng.0),
            items: data
                .items
                .drop_table(&enemy_type.0)
                .and_then(|table| roll_drop(table, &mut rng.0))
                .into_iter()
                .collect(),
        };

        info!("{} defeated: {} XP, {} gold", enemy.name, loot.xp, loot.gold);
        chat.send(ChatMessageEvent::new(
            format!("Defeated {}! +{} XP, +{} gold", enemy.name, loot.xp, loot.gold),
            MessageStyle::Combat,
        ));
        for item in &loot.items {
            let label = data.items.get(item).map_or(item.as_str(), |def| def.name.as_str());
            chat.send(ChatMessageEvent::new(
                format!("{} dropped {}", enemy.name, label),
                MessageStyle::Loot,
            ));
        }

        defeated.send(EnemyDefeatedEvent {
            entity: death.entity,
            enemy_type: enemy_type.0.clone(),
            name: enemy.name.clone(),
            loot,
        });
    }
}
