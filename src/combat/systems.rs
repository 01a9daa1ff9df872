//! Combat systems - status ticking, cooldowns and damage application.

use bevy::prelude::*;

use super::buffs::Buffs;
use super::components::*;
use super::damage::{incoming_damage, DamageKind};
use super::projectile;
use super::status::StatusEffects;
use super::tuning::CombatTuning;
use crate::boss::{BossState, BossTuning};
use crate::core::{
    ChatMessageEvent, CombatSet, DamageDealtEvent, DamageEvent, DeathEvent, MessageStyle, PhaseChangedEvent,
    ScheduledTask, Scheduler,
};
use crate::enemies::Enemy;

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app.init_resource::<CombatTuning>()
        .add_systems(
            Update,
            (tick_status_effects, tick_buffs, tick_attack_cooldowns).in_set(CombatSet::Timers),
        )
        .add_systems(
            Update,
            (
                projectile::handle_fire_projectile,
                projectile::move_projectiles,
                projectile::projectile_hits,
            )
                .chain()
                .in_set(CombatSet::Decide),
        )
        .add_systems(Update, apply_damage.in_set(CombatSet::Damage));
}

/// Advance debuff timers; poison and fear pulses become over-time damage.
fn tick_status_effects(
    time: Res<Time>,
    mut query: Query<(Entity, &mut StatusEffects, &Combatant), Without<Dead>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let dt = time.delta_secs();
    for (entity, mut status, combatant) in query.iter_mut() {
        if combatant.is_dead() || status.is_clear() {
            continue;
        }
        let damage = status.tick(dt);
        if damage > 0.0 {
            damage_events.send(DamageEvent {
                target: entity,
                source: None,
                amount: damage,
                kind: DamageKind::OverTime,
                debuffs: Vec::new(),
            });
        }
    }
}

fn tick_buffs(time: Res<Time>, mut query: Query<&mut Buffs, Without<Dead>>) {
    let dt = time.delta_secs();
    for mut buffs in query.iter_mut() {
        if !buffs.is_clear() {
            buffs.tick(dt);
        }
    }
}

fn tick_attack_cooldowns(time: Res<Time>, mut query: Query<&mut AttackCooldown>) {
    let dt = time.delta_secs();
    for mut cooldown in query.iter_mut() {
        cooldown.tick(dt);
    }
}

/// Resolve pending hits against their targets.
///
/// Stale or dead targets are skipped. Defense buffs harden the defender's
/// armor and shields soak what gets through. Bosses route damage through
/// their phase controller. Debuffs land only on survivors.
fn apply_damage(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    boss_tuning: Res<BossTuning>,
    mut scheduler: ResMut<Scheduler>,
    mut damage_events: EventReader<DamageEvent>,
    mut targets: Query<(
        &mut Combatant,
        Option<&mut StatusEffects>,
        Option<&mut Buffs>,
        Option<&mut BossState>,
        Option<&Enemy>,
        Has<Dead>,
    )>,
    mut dealt_events: EventWriter<DamageDealtEvent>,
    mut death_events: EventWriter<DeathEvent>,
    mut phase_events: EventWriter<PhaseChangedEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    let now = time.elapsed_secs_f64();

    for event in damage_events.read() {
        let Ok((mut combatant, mut status, mut buffs, boss, enemy, dead)) = targets.get_mut(event.target) else {
            debug!("Dropping damage for missing entity {:?}", event.target);
            continue;
        };
        if dead || combatant.is_dead() {
            continue;
        }

        let defense = combatant.defense * buffs.as_deref().map_or(1.0, Buffs::defense_multiplier);
        let mut amount = incoming_damage(event.amount, event.kind, defense, status.as_deref(), &tuning.defense);
        if let Some(buffs) = buffs.as_deref_mut() {
            amount = buffs.absorb(amount);
        }

        let (applied, died) = match boss {
            Some(mut boss) => {
                let name = enemy.map_or("Boss", |enemy| enemy.name.as_str());
                let report = boss.absorb_damage(&mut combatant, amount, &boss_tuning);
                if report.revived {
                    info!("{} refuses to die and becomes enraged", name);
                    chat.send(ChatMessageEvent::new(
                        format!("{} refuses to die! It becomes ENRAGED!", name),
                        MessageStyle::Boss,
                    ));
                    if let Some(status) = status.as_deref_mut() {
                        status.cleanse();
                    }
                }
                if let Some(phase) = report.new_phase {
                    info!("{} entered phase {}", name, phase);
                    phase_events.send(PhaseChangedEvent {
                        boss: event.target,
                        phase,
                    });
                    chat.send(ChatMessageEvent::new(
                        format!("{} enters phase {}!", name, phase),
                        MessageStyle::Boss,
                    ));
                }
                if let Some(step) = report.enrage_step {
                    debug!("{} enrage step {}", name, step);
                }
                (report.applied, report.died)
            }
            None => {
                let before = combatant.health;
                let died = combatant.take_damage(amount);
                (before - combatant.health, died)
            }
        };

        if applied > 0.0 {
            dealt_events.send(DamageDealtEvent {
                source: event.source,
                target: event.target,
                amount: applied,
            });
            commands.entity(event.target).try_insert(HitFlash);
            scheduler.schedule(now, tuning.hit_flash, Some(event.target), ScheduledTask::ClearHitFlash);
        }

        if died {
            commands.entity(event.target).try_insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: event.source,
            });
            continue;
        }

        if let Some(status) = status.as_deref_mut() {
            for debuff in &event.debuffs {
                status.apply(debuff);
            }
        }
    }
}
