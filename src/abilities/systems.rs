//! Casting: validate, pay, then damage, heal and apply effects.

use bevy::prelude::*;

use super::components::{AbilityBook, CastError};
use super::data::{AbilityDefinition, AbilityEffects};
use crate::combat::{outgoing_damage, Buffs, Combatant, DamageKind, Dead, Faction, StatusEffects};
use crate::core::{AbilityUsedEvent, ChatMessageEvent, DamageEvent, MessageStyle, UseAbilityEvent};
use crate::data::CombatData;
use crate::enemies::horizontal_distance;

/// Share of the caster's attack power added to ability damage.
const ATTACK_POWER_SCALING: f32 = 0.5;

pub fn tick_ability_cooldowns(time: Res<Time>, mut books: Query<&mut AbilityBook>) {
    let dt = time.delta_secs();
    for mut book in books.iter_mut() {
        book.tick(dt);
    }
}

type Casters<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut Combatant,
        Option<&'static mut AbilityBook>,
        Option<&'static mut StatusEffects>,
        Option<&'static mut Buffs>,
        Option<&'static Transform>,
        Option<&'static Faction>,
        Has<Dead>,
    ),
>;

/// Apply everything but damage and healing to one entity. Slow rides on the
/// damage for attacks, so it is only applied here for support casts.
fn apply_effects(effects: &AbilityEffects, buffs: Option<&mut Buffs>, status: Option<&mut StatusEffects>, slow: bool) {
    if let Some(buffs) = buffs {
        if let Some(stun) = effects.stun {
            buffs.apply_stun(stun);
        }
        if let Some(multiplier) = effects.buff_attack {
            buffs.apply_attack_buff(multiplier, effects.duration);
        }
        if let Some(multiplier) = effects.buff_defense {
            buffs.apply_defense_buff(multiplier, effects.duration);
        }
        if let Some(shield) = effects.shield {
            buffs.apply_shield(shield, effects.duration);
        }
    }
    if let Some(status) = status {
        if effects.cleanse {
            status.cleanse();
        }
        if slow {
            if let Some(debuff) = effects.on_hit() {
                status.apply(&debuff);
            }
        }
    }
}

/// Resolve one cast and return who it landed on. Nothing is spent unless
/// every check passes.
fn cast(
    event: &UseAbilityEvent,
    ability: &AbilityDefinition,
    casters: &mut Casters,
    damage_events: &mut EventWriter<DamageEvent>,
) -> Result<Entity, CastError> {
    // Self-only abilities ignore any requested target.
    let target = if ability.range <= 0.0 {
        event.user
    } else {
        event.target.unwrap_or(event.user)
    };

    let (caster_position, faction) = match casters.get(event.user) {
        Ok((_, combatant, _, _, buffs, transform, faction, dead)) => {
            if dead || combatant.is_dead() {
                return Err(CastError::Incapacitated);
            }
            if buffs.is_some_and(Buffs::is_stunned) {
                return Err(CastError::Stunned);
            }
            (transform.map(|t| t.translation), faction.copied().unwrap_or(Faction::Player))
        }
        Err(_) => return Err(CastError::Incapacitated),
    };

    // Attacks need a living hostile; support casts need a living friend.
    let target_position = match casters.get(target) {
        Ok((_, combatant, _, _, _, transform, other, dead)) if !dead && combatant.is_alive() => {
            let hostile = other.is_some_and(|other| faction.is_hostile_to(*other));
            if ability.is_attack() != hostile {
                return Err(CastError::NoTarget(ability.name.clone()));
            }
            transform.map(|t| t.translation)
        }
        _ => return Err(CastError::NoTarget(ability.name.clone())),
    };

    if target != event.user {
        if let (Some(from), Some(to)) = (caster_position, target_position) {
            if horizontal_distance(from, to) > ability.range {
                return Err(CastError::OutOfRange(ability.name.clone()));
            }
        }
    }

    let outgoing = {
        let Ok((_, mut caster, book, status, buffs, _, _, _)) = casters.get_mut(event.user) else {
            return Err(CastError::Incapacitated);
        };
        let Some(mut book) = book else {
            return Err(CastError::NotLearned(ability.name.clone()));
        };
        book.begin_cast(&event.ability, ability, &mut caster)?;
        let buffed = buffs.as_deref().map_or(1.0, Buffs::outgoing_multiplier);
        let power = caster.attack_power * ATTACK_POWER_SCALING;
        outgoing_damage(ability.base_damage, power, status.as_deref()) * buffed
    };

    if ability.is_attack() {
        let mut hit = vec![target];
        if let (true, Some(center)) = (ability.aoe_radius > 0.0, target_position) {
            hit.extend(
                casters
                    .iter()
                    .filter(|(entity, combatant, _, _, _, transform, other, dead)| {
                        *entity != target
                            && !dead
                            && combatant.is_alive()
                            && other.is_some_and(|other| faction.is_hostile_to(*other))
                            && transform
                                .is_some_and(|t| horizontal_distance(center, t.translation) <= ability.aoe_radius)
                    })
                    .map(|(entity, ..)| entity),
            );
        }
        let kind = DamageKind::Hit(ability.attacker_class(faction));
        for entity in hit {
            damage_events.send(DamageEvent {
                target: entity,
                source: Some(event.user),
                amount: outgoing,
                kind,
                debuffs: ability.effects.on_hit().into_iter().collect(),
            });
            if let Ok((_, _, _, status, buffs, _, _, _)) = casters.get_mut(entity) {
                apply_effects(&ability.effects, buffs.map(Mut::into_inner), status.map(Mut::into_inner), false);
            }
        }
    } else if let Ok((_, mut combatant, _, status, buffs, _, _, _)) = casters.get_mut(target) {
        if ability.is_heal() {
            combatant.heal(-ability.base_damage);
        }
        apply_effects(&ability.effects, buffs.map(Mut::into_inner), status.map(Mut::into_inner), true);
    }

    Ok(target)
}

/// Turn cast requests into damage, healing and effects.
pub fn handle_ability_use(
    data: Res<CombatData>,
    mut events: EventReader<UseAbilityEvent>,
    mut casters: Casters,
    names: Query<&Name>,
    mut damage_events: EventWriter<DamageEvent>,
    mut used: EventWriter<AbilityUsedEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for event in events.read() {
        let result = match data.abilities.get(&event.ability) {
            Some(ability) => cast(event, ability, &mut casters, &mut damage_events).map(|target| (ability, target)),
            None => Err(CastError::Unknown(event.ability.clone())),
        };
        match result {
            Ok((ability, target)) => {
                let caster = names.get(event.user).map_or("You", Name::as_str);
                debug!("{:?} cast {} on {:?}", event.user, event.ability, target);
                chat.send(ChatMessageEvent::new(
                    format!("{} used {}!", caster, ability.name),
                    MessageStyle::Combat,
                ));
                used.send(AbilityUsedEvent {
                    user: event.user,
                    ability: event.ability.clone(),
                    target: Some(target),
                });
            }
            Err(e) => {
                debug!("Cast of {} by {:?} rejected: {}", event.ability, event.user, e);
                chat.send(ChatMessageEvent::new(e.to_string(), MessageStyle::Warning));
            }
        }
    }
}
