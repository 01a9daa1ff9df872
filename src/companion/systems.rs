//! Companion spawning, orders and per-tick behavior.

use bevy::prelude::*;

use super::components::{decide, Companion, CompanionAction, CompanionTuning, Situation};
use crate::abilities::AbilityBook;
use crate::combat::{
    is_stunned, outgoing_damage, AttackCooldown, AttackSpeed, AttackerClass, Buffs, Combatant, CombatTuning,
    DamageKind, Dead, Faction, StatusEffects,
};
use crate::core::{
    ChatMessageEvent, CompanionCommandEvent, DamageEvent, DeathEvent, MessageStyle, SpawnCompanionEvent,
    UseAbilityEvent,
};
use crate::data::{CombatData, SpawnError};
use crate::enemies::horizontal_distance;

/// Spawn a companion of a registered type for `owner`.
pub fn spawn_companion(
    commands: &mut Commands,
    data: &CombatData,
    companion_type: &str,
    owner: Entity,
    position: Vec3,
) -> Result<Entity, SpawnError> {
    let definition = data
        .companions
        .get(companion_type)
        .ok_or_else(|| SpawnError::UnknownCompanionType(companion_type.to_string()))?;

    let entity = commands
        .spawn((
            Companion {
                owner,
                personality: definition.personality,
                speed: definition.speed,
                order: None,
            },
            Name::new(definition.name.clone()),
            Combatant::new(definition.max_health)
                .with_mana(definition.max_mana)
                .with_attack(definition.attack_power)
                .with_defense(definition.defense),
            AbilityBook::new(definition.abilities.iter().cloned()),
            StatusEffects::default(),
            Buffs::default(),
            Faction::Player,
            AttackCooldown::default(),
            AttackSpeed::default(),
            Transform::from_translation(position),
        ))
        .id();
    info!("{} joined {:?}", definition.name, owner);
    Ok(entity)
}

pub fn handle_spawn_companion(
    mut commands: Commands,
    data: Res<CombatData>,
    mut events: EventReader<SpawnCompanionEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for event in events.read() {
        match spawn_companion(&mut commands, &data, &event.companion_type, event.owner, event.position) {
            Ok(_) => {
                let name = data
                    .companions
                    .get(&event.companion_type)
                    .map_or(event.companion_type.as_str(), |def| def.name.as_str());
                chat.send(ChatMessageEvent::new(format!("{} joins you.", name), MessageStyle::Info));
            }
            Err(e) => warn!("Companion spawn rejected: {}", e),
        }
    }
}

pub fn handle_companion_commands(
    mut events: EventReader<CompanionCommandEvent>,
    mut companions: Query<(&mut Companion, &Name), Without<Dead>>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for event in events.read() {
        let Ok((mut companion, name)) = companions.get_mut(event.companion) else {
            debug!("Order for missing companion {:?}", event.companion);
            continue;
        };
        companion.order = event.order;
        chat.send(ChatMessageEvent::new(format!("{}: Understood!", name), MessageStyle::Info));
    }
}

/// Companions restore mana over time; health only comes back through healing.
pub fn regenerate_companions(
    time: Res<Time>,
    tuning: Res<CompanionTuning>,
    mut companions: Query<&mut Combatant, (With<Companion>, Without<Dead>)>,
) {
    let dt = time.delta_secs();
    for mut combatant in companions.iter_mut() {
        combatant.restore_mana(tuning.mana_regen * dt);
    }
}

/// Horizontal step toward `goal`, or nothing once within `stop`.
fn step_toward(from: Vec3, goal: Vec3, stop: f32, speed: f32) -> Vec3 {
    let toward = Vec3::new(goal.x - from.x, 0.0, goal.z - from.z);
    if toward.length() <= stop {
        Vec3::ZERO
    } else {
        toward.normalize_or_zero() * speed
    }
}

/// A ready, affordable damage ability that reaches `distance`.
fn ready_attack_ability<'a>(
    book: &'a AbilityBook,
    data: &CombatData,
    caster: &Combatant,
    distance: f32,
) -> Option<&'a str> {
    book.known().find(|id| {
        book.is_ready(id)
            && data.abilities.get(id).is_some_and(|ability| {
                ability.is_attack() && caster.mana >= ability.mana_cost && distance <= ability.range
            })
    })
}

type CompanionQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Companion,
        &'static mut Transform,
        &'static Combatant,
        &'static mut AttackCooldown,
        &'static AbilityBook,
        Option<&'static StatusEffects>,
        Option<&'static Buffs>,
    ),
    Without<Dead>,
>;

/// Pick an action per companion, then move, strike or cast.
///
/// Casts go out as [`UseAbilityEvent`]s so they pay and resolve like any other.
pub fn companion_behavior(
    time: Res<Time>,
    tuning: Res<CompanionTuning>,
    combat: Res<CombatTuning>,
    data: Res<CombatData>,
    mut companions: CompanionQuery,
    others: Query<(Entity, &Transform, &Combatant, &Faction), (Without<Companion>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageEvent>,
    mut casts: EventWriter<UseAbilityEvent>,
) {
    let dt = time.delta_secs();
    for (entity, companion, mut transform, combatant, mut cooldown, book, status, buffs) in companions.iter_mut() {
        if combatant.is_dead() || is_stunned(buffs) {
            continue;
        }
        let Ok((_, owner_transform, owner, _)) = others.get(companion.owner) else {
            continue;
        };
        let position = transform.translation;
        let owner_position = owner_transform.translation;

        let enemy = others
            .iter()
            .filter(|(_, _, other, faction)| other.is_alive() && Faction::Player.is_hostile_to(**faction))
            .map(|(other, at, _, _)| (other, at.translation, horizontal_distance(position, at.translation)))
            .filter(|(_, _, distance)| *distance <= tuning.aggro_range)
            .min_by(|a, b| a.2.total_cmp(&b.2));

        let heal = data.abilities.get(&tuning.heal_ability);
        let situation = Situation {
            enemy: enemy.map(|(other, at, _)| (other, horizontal_distance(owner_position, at))),
            owner_health_ratio: if owner.is_alive() { owner.health_ratio() } else { 1.0 },
            can_heal: book.is_ready(&tuning.heal_ability) && heal.is_some_and(|h| combatant.mana >= h.mana_cost),
        };
        let speed = status.map_or(companion.speed, |s| s.effective_speed(companion.speed, combat.min_speed));

        let step = match decide(companion.order, companion.personality, &situation, &tuning) {
            CompanionAction::Hold => Vec3::ZERO,
            CompanionAction::Follow => step_toward(position, owner_position, tuning.follow_distance, speed),
            CompanionAction::Guard => {
                step_toward(position, owner_position + tuning.guard_offset, tuning.guard_slack, speed)
            }
            CompanionAction::HealOwner => {
                let reach = heal.map_or(0.0, |h| h.range);
                if horizontal_distance(position, owner_position) <= reach {
                    casts.send(UseAbilityEvent {
                        user: entity,
                        ability: tuning.heal_ability.clone(),
                        target: Some(companion.owner),
                    });
                    Vec3::ZERO
                } else {
                    step_toward(position, owner_position, reach, speed)
                }
            }
            CompanionAction::Attack(target) => {
                let (target_position, distance) = enemy
                    .filter(|(other, ..)| *other == target)
                    .map_or((position, 0.0), |(_, at, distance)| (at, distance));
                if let Some(ability) = ready_attack_ability(book, &data, combatant, distance) {
                    casts.send(UseAbilityEvent {
                        user: entity,
                        ability: ability.to_string(),
                        target: Some(target),
                    });
                    Vec3::ZERO
                } else if distance > tuning.attack_range {
                    step_toward(position, target_position, tuning.attack_range, speed)
                } else {
                    if cooldown.try_fire(tuning.attack_cooldown, 1.0) {
                        let buffed = buffs.map_or(1.0, Buffs::outgoing_multiplier);
                        damage_events.send(DamageEvent {
                            target,
                            source: Some(entity),
                            amount: outgoing_damage(combatant.attack_power, 0.0, status) * buffed,
                            kind: DamageKind::Hit(AttackerClass::PlayerMelee),
                            debuffs: Vec::new(),
                        });
                    }
                    Vec3::ZERO
                }
            }
        };
        transform.translation += step * dt;
    }
}

pub fn handle_companion_deaths(
    mut deaths: EventReader<DeathEvent>,
    companions: Query<&Name, With<Companion>>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for death in deaths.read() {
        if let Ok(name) = companions.get(death.entity) {
            info!("Companion {} fell", name);
            chat.send(ChatMessageEvent::new(format!("{} has fallen!", name), MessageStyle::Warning));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_stop_inside_the_slack() {
        assert_eq!(step_toward(Vec3::ZERO, Vec3::new(2.0, 5.0, 0.0), 3.0, 4.0), Vec3::ZERO);
        let step = step_toward(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 3.0, 4.0);
        assert!((step - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn only_ready_affordable_attacks_in_reach_are_picked() {
        let data = CombatData::builtin().expect("builtin data");
        let mut book = AbilityBook::new(["fireball", "ice_shard"]);
        let caster = Combatant::new(70.0).with_mana(50.0);
        let far = data.abilities.get("fireball").map_or(0.0, |a| a.range) + 100.0;
        assert_eq!(ready_attack_ability(&book, &data, &caster, far), None);
        assert_eq!(ready_attack_ability(&book, &data, &caster, 2.0), Some("fireball"));

        let mut drained = caster.clone();
        drained.mana = 0.0;
        assert_eq!(ready_attack_ability(&book, &data, &drained, 2.0), None);

        let mut spender = caster.clone();
        let fireball = data.abilities.get("fireball").cloned().expect("fireball");
        book.begin_cast("fireball", &fireball, &mut spender).expect("cast");
        assert_eq!(ready_attack_ability(&book, &data, &caster, 2.0), Some("ice_shard"));
    }
}
