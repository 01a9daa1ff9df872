//! Dungeon systems - entering, waves, clear rewards and leaving.

use bevy::prelude::*;

use super::director::{DungeonArena, WaveDirector};
use super::waves::{plan_wave, ring_positions, WavePlan, WaveTuning};
use crate::boss::link_partners;
use crate::core::{
    ChatMessageEvent, CombatRng, DeathEvent, DungeonState, EnterDungeonEvent, ExitDungeonEvent, MessageStyle,
    ScheduledTask, Scheduler, StartWaveEvent, WaveClearedEvent, WaveStartedEvent,
};
use crate::data::CombatData;
use crate::enemies::{spawn_enemy, WaveMember};
use crate::items::roll_tier_item;

pub fn handle_enter_dungeon(
    data: Res<CombatData>,
    state: Res<State<DungeonState>>,
    mut director: ResMut<WaveDirector>,
    mut next_state: ResMut<NextState<DungeonState>>,
    mut events: EventReader<EnterDungeonEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for event in events.read() {
        if *state.get() == DungeonState::InDungeon {
            debug!("Already in a dungeon; ignoring entry to level {}", event.level);
            continue;
        }
        let Some(level) = data.dungeons.get(event.level) else {
            warn!("No dungeon level {}", event.level);
            chat.send(ChatMessageEvent::new(
                format!("Dungeon level {} does not exist", event.level),
                MessageStyle::Warning,
            ));
            continue;
        };
        info!("Entering dungeon level {} ({})", event.level, level.name);
        chat.send(ChatMessageEvent::new(format!("Entering {}...", level.name), MessageStyle::Info));
        director.begin(event.level);
        next_state.set(DungeonState::InDungeon);
    }
}

/// First wave starts as soon as the dungeon state is entered.
pub fn open_dungeon(director: Res<WaveDirector>, mut wave_events: EventWriter<StartWaveEvent>) {
    if let Some(level) = director.level() {
        wave_events.send(StartWaveEvent { level, wave: 1 });
    }
}

pub fn handle_exit_dungeon(
    state: Res<State<DungeonState>>,
    mut next_state: ResMut<NextState<DungeonState>>,
    mut events: EventReader<ExitDungeonEvent>,
) {
    if events.read().count() > 0 && *state.get() == DungeonState::InDungeon {
        next_state.set(DungeonState::Overworld);
    }
}

/// Cancel the pending wave and clear out what is left of the current one.
pub fn close_dungeon(
    mut commands: Commands,
    mut director: ResMut<WaveDirector>,
    mut scheduler: ResMut<Scheduler>,
    members: Query<Entity, With<WaveMember>>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    let cancelled = scheduler.cancel_matching(|task| matches!(task, ScheduledTask::StartWave { .. }));
    for entity in members.iter() {
        scheduler.cancel_owned_by(entity);
        commands.entity(entity).despawn_recursive();
    }
    let cleared = director.waves_cleared();
    director.reset();
    info!("Left the dungeon after {} cleared waves ({} pending wave tasks cancelled)", cleared, cancelled);
    chat.send(ChatMessageEvent::new(
        format!("You leave the dungeon. Waves cleared: {}", cleared),
        MessageStyle::Info,
    ));
}

/// Spawn the requested wave if it is the next one for the running level.
pub fn start_waves(
    mut commands: Commands,
    data: Res<CombatData>,
    tuning: Res<WaveTuning>,
    arena: Res<DungeonArena>,
    mut rng: ResMut<CombatRng>,
    mut director: ResMut<WaveDirector>,
    mut wave_events: EventReader<StartWaveEvent>,
    mut started: EventWriter<WaveStartedEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for event in wave_events.read() {
        if !director.accepts(event.level, event.wave) {
            debug!("Ignoring stale start of level {} wave {}", event.level, event.wave);
            continue;
        }
        let Some(level) = data.dungeons.get(event.level) else {
            continue;
        };

        let plan = plan_wave(level, event.wave, &tuning, &mut rng.0);
        let positions = ring_positions(arena.center, tuning.spawn_radius, plan.total());
        let mut positions = positions.into_iter();
        let mut members = Vec::with_capacity(plan.total());

        for enemy_type in plan.regulars.iter().chain(&plan.extras) {
            let position = positions.next().unwrap_or(arena.center);
            members.extend(spawn_member(&mut commands, &data, &plan, enemy_type, position));
        }
        if let Some((first, second)) = &plan.twins {
            let first_position = positions.next().unwrap_or(arena.center);
            let second_position = positions.next().unwrap_or(arena.center);
            let first = spawn_member(&mut commands, &data, &plan, first, first_position);
            let second = spawn_member(&mut commands, &data, &plan, second, second_position);
            if let (Some(first), Some(second)) = (first, second) {
                link_partners(&mut commands, first, second);
            }
            members.extend(first);
            members.extend(second);
        }

        let count = members.len() as u32;
        director.wave_started(event.wave, members);
        info!("Level {} wave {} started with {} enemies", event.level, event.wave, count);
        started.send(WaveStartedEvent {
            level: event.level,
            wave: event.wave,
            enemy_count: count,
        });
        chat.send(ChatMessageEvent::new(
            format!("Wave {} begins! {} enemies approach.", event.wave, count),
            MessageStyle::Warning,
        ));
        if !plan.extras.is_empty() || plan.twins.is_some() {
            chat.send(ChatMessageEvent::new(
                format!("A powerful foe joins wave {}!", event.wave),
                MessageStyle::Boss,
            ));
        }
    }
}

/// Spawn one wave member with the wave's health scaling.
fn spawn_member(
    commands: &mut Commands,
    data: &CombatData,
    plan: &WavePlan,
    enemy_type: &str,
    position: Vec3,
) -> Option<Entity> {
    let health = data
        .enemies
        .get(enemy_type)
        .map(|definition| definition.max_health * plan.health_multiplier);
    match spawn_enemy(commands, data, enemy_type, position, health, None) {
        Ok(entity) => {
            commands.entity(entity).insert(WaveMember { wave: plan.wave });
            Some(entity)
        }
        Err(e) => {
            warn!("Wave {} spawn failed: {}", plan.wave, e);
            None
        }
    }
}

/// Grant rewards when the last wave member falls and queue the next wave.
pub fn track_wave_clears(
    time: Res<Time>,
    data: Res<CombatData>,
    tuning: Res<WaveTuning>,
    mut rng: ResMut<CombatRng>,
    mut scheduler: ResMut<Scheduler>,
    mut director: ResMut<WaveDirector>,
    mut deaths: EventReader<DeathEvent>,
    mut cleared: EventWriter<WaveClearedEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for death in deaths.read() {
        if !director.record_death(death.entity) {
            continue;
        }
        let (Some(level_id), wave) = (director.level(), director.wave()) else {
            continue;
        };
        let Some(level) = data.dungeons.get(level_id) else {
            continue;
        };

        let xp = tuning.clear_xp(level.base_xp, wave, level.hardest);
        let mut reward_items: Vec<String> = roll_tier_item(&data.items, level.reward_tier, &mut rng.0)
            .into_iter()
            .collect();
        if let Some(milestone) = level.milestone_rewards.get(&wave) {
            reward_items.push(milestone.clone());
        }

        info!("Level {} wave {} cleared: {} XP, items {:?}", level_id, wave, xp, reward_items);
        chat.send(ChatMessageEvent::new(
            format!("Wave {} cleared! +{} XP", wave, xp),
            MessageStyle::Info,
        ));
        for item in &reward_items {
            let label = data.items.get(item).map_or(item.as_str(), |def| def.name.as_str());
            chat.send(ChatMessageEvent::new(format!("Wave reward: {}", label), MessageStyle::Loot));
        }
        cleared.send(WaveClearedEvent {
            level: level_id,
            wave,
            xp,
            reward_items,
        });

        let task = scheduler.schedule(
            time.elapsed_secs_f64(),
            tuning.next_wave_delay,
            None,
            ScheduledTask::StartWave {
                level: level_id,
                wave: wave + 1,
            },
        );
        director.schedule_next(task);
    }
}
