//! Boss systems - stat scaling, special abilities and avenge.

use bevy::prelude::*;

use super::abilities::BossAbilities;
use super::data::BossAbility;
use super::phase::{resolve_avenge, BossPartner, BossState, BossTuning};
use crate::combat::{
    aim_direction, is_stunned, AttackerClass, Buffs, Combatant, CombatTuning, DamageKind, Dead, DebuffKind, Faction,
    OnHitDebuff, Projectile, StatusEffects,
};
use crate::core::{ChatMessageEvent, DamageEvent, DeathEvent, MessageStyle};
use crate::enemies::{horizontal_distance, AiState, Enemy, EnemyStats, Target};

/// Link two bosses so the survivor is avenged when the other falls.
pub fn link_partners(commands: &mut Commands, first: Entity, second: Entity) {
    commands.entity(first).insert(BossPartner(second));
    commands.entity(second).insert(BossPartner(first));
}

pub fn tick_boss_abilities(time: Res<Time>, mut bosses: Query<&mut BossAbilities>) {
    let dt = time.delta_secs();
    for mut abilities in bosses.iter_mut() {
        abilities.tick(dt);
    }
}

/// Rescale movement speed and attack cooldown from phase, enrage and avenge.
pub fn sync_boss_stats(tuning: Res<BossTuning>, mut bosses: Query<(&BossState, &mut EnemyStats)>) {
    for (state, mut stats) in bosses.iter_mut() {
        let speed = stats.base_speed * state.speed_multiplier(&tuning);
        let cooldown = stats.base_attack_cooldown * state.cooldown_multiplier(&tuning);
        if stats.speed != speed || stats.attack_cooldown != cooldown {
            stats.speed = speed;
            stats.attack_cooldown = cooldown;
        }
    }
}

/// Fire whatever abilities are ready against the current target.
pub fn cast_boss_abilities(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    mut bosses: Query<
        (
            Entity,
            &Transform,
            &Enemy,
            &AiState,
            &Target,
            &BossState,
            &mut BossAbilities,
            &mut Combatant,
            Option<&StatusEffects>,
            Option<&Buffs>,
        ),
        Without<Dead>,
    >,
    targets: Query<&Transform, Without<Enemy>>,
    mut damage_events: EventWriter<DamageEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for (entity, transform, enemy, state, target, boss, mut abilities, mut combatant, status, buffs) in &mut bosses {
        if !matches!(*state, AiState::Chasing | AiState::Attacking) || combatant.is_dead() || is_stunned(buffs) {
            continue;
        }
        let Some(target_entity) = target.0 else {
            continue;
        };
        let Ok(target_transform) = targets.get(target_entity) else {
            continue;
        };
        let distance = horizontal_distance(transform.translation, target_transform.translation);
        let weaken = status.map_or(1.0, StatusEffects::outgoing_multiplier);

        for ability in abilities.select(distance, combatant.health_ratio()) {
            let Some(spec) = abilities.spec(ability).copied() else {
                continue;
            };
            let power = spec.magnitude * weaken;
            let strike = |kind: DamageKind, amount: f32, debuff: Option<OnHitDebuff>| DamageEvent {
                target: target_entity,
                source: Some(entity),
                amount,
                kind,
                debuffs: debuff.into_iter().collect(),
            };

            match ability {
                BossAbility::Fireball | BossAbility::VenomSpit | BossAbility::ShadowBolt => {
                    let origin = transform.translation + Vec3::Y;
                    let direction = aim_direction(origin, target_transform.translation, tuning.projectile_arc);
                    let projectile = Projectile::new(Some(entity), Faction::Enemy, direction, power, &tuning);
                    let debuff = match ability {
                        BossAbility::VenomSpit => Some(DebuffKind::Poison),
                        BossAbility::ShadowBolt => Some(DebuffKind::Weaken),
                        _ => None,
                    };
                    let projectile = match debuff {
                        Some(kind) => projectile.with_debuff(Some(OnHitDebuff::new(kind, spec.effect, spec.duration))),
                        None => projectile.boss(),
                    };
                    commands.spawn((projectile, Transform::from_translation(origin)));
                }
                BossAbility::TerrorScream => {
                    damage_events.send(strike(
                        DamageKind::Flat,
                        0.0,
                        Some(OnHitDebuff::fear(spec.magnitude, spec.duration, spec.effect)),
                    ));
                }
                BossAbility::SoulDrain => {
                    damage_events.send(strike(DamageKind::Flat, power, None));
                    // Enraged health is pinned at 1; draining cannot refill it.
                    if !boss.is_enraged {
                        combatant.heal(spec.magnitude);
                    }
                }
                BossAbility::BloodRage => {
                    abilities.start_rage(spec.magnitude, spec.duration);
                }
                BossAbility::Shockwave => {
                    damage_events.send(strike(
                        DamageKind::Hit(AttackerClass::BossMelee),
                        power,
                        Some(OnHitDebuff::new(DebuffKind::Slow, spec.effect, spec.duration)),
                    ));
                }
                BossAbility::CursedTouch => {
                    damage_events.send(strike(
                        DamageKind::Flat,
                        power,
                        Some(OnHitDebuff::new(DebuffKind::Curse, spec.effect, spec.duration)),
                    ));
                }
            }

            debug!("{} uses {}", enemy.name, ability.display_name());
            chat.send(ChatMessageEvent::new(
                format!("{} uses {}!", enemy.name, ability.display_name()),
                MessageStyle::Boss,
            ));
        }
    }
}

/// The survivor of a linked pair gets stronger once its partner falls.
pub fn avenge_fallen_partners(
    tuning: Res<BossTuning>,
    mut deaths: EventReader<DeathEvent>,
    partners: Query<&BossPartner>,
    mut bosses: Query<(&mut BossState, &mut Combatant, &Enemy)>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for death in deaths.read() {
        let Ok(partner) = partners.get(death.entity) else {
            continue;
        };
        let Ok([(mut fallen, _, fallen_enemy), (mut survivor, mut survivor_health, survivor_enemy)]) =
            bosses.get_many_mut([death.entity, partner.0])
        else {
            continue;
        };
        if resolve_avenge(&mut fallen, &mut survivor, &mut survivor_health, &tuning) {
            info!("{} avenges {}", survivor_enemy.name, fallen_enemy.name);
            chat.send(ChatMessageEvent::new(
                format!("{} falls! {} is filled with rage!", fallen_enemy.name, survivor_enemy.name),
                MessageStyle::Boss,
            ));
        }
    }
}
