//! Player systems - spawning, regeneration, attacks and progression.

use bevy::prelude::*;

use super::components::*;
use crate::abilities::AbilityBook;
use crate::combat::{
    is_stunned, outgoing_damage, AttackCooldown, AttackSpeed, AttackerClass, Buffs, Combatant, CombatTuning,
    DamageKind, Dead, Faction, Stamina, StatusEffects,
};
use crate::core::{
    ChatMessageEvent, DamageEvent, DeathEvent, EnemyDefeatedEvent, LevelUpEvent, MessageStyle, PlayerAttackEvent,
    WaveClearedEvent,
};
use crate::data::CombatData;
use crate::items::ItemTable;

/// Spawn the player with pools derived from attributes and gear.
pub fn spawn_player(
    commands: &mut Commands,
    items: &ItemTable,
    attributes: Attributes,
    equipment: Equipment,
    position: Vec3,
) -> Entity {
    let gear = equipment.bonus(items);
    let stats = attributes.derive(&gear);
    commands
        .spawn((
            Player,
            attributes,
            equipment,
            Progression::default(),
            Combatant::new(stats.max_health)
                .with_mana(stats.max_mana)
                .with_attack(stats.attack_power)
                .with_defense(stats.defense),
            Stamina::new(stats.max_stamina),
            StatusEffects::default(),
            Buffs::default(),
            AbilityBook::default(),
            Faction::Player,
            AttackCooldown::default(),
            AttackSpeed(gear.attack_speed),
            Transform::from_translation(position),
        ))
        .id()
}

/// Write derived maxima into the pools, clamping current values.
fn apply_derived(stats: &DerivedStats, combatant: &mut Combatant, stamina: &mut Stamina) {
    combatant.max_health = stats.max_health;
    combatant.health = combatant.health.min(stats.max_health);
    combatant.max_mana = stats.max_mana;
    combatant.mana = combatant.mana.min(stats.max_mana);
    combatant.attack_power = stats.attack_power;
    combatant.defense = stats.defense;
    stamina.maximum = stats.max_stamina;
    stamina.current = stamina.current.min(stats.max_stamina);
}

/// Recompute derived stats when attributes or gear change.
pub fn sync_derived_stats(
    data: Res<CombatData>,
    mut players: Query<
        (&Attributes, &Equipment, &mut Combatant, &mut Stamina, &mut AttackSpeed),
        (With<Player>, Or<(Changed<Attributes>, Changed<Equipment>)>),
    >,
) {
    for (attributes, equipment, mut combatant, mut stamina, mut speed) in players.iter_mut() {
        let gear = equipment.bonus(&data.items);
        apply_derived(&attributes.derive(&gear), &mut combatant, &mut stamina);
        speed.0 = gear.attack_speed;
    }
}

/// Passive health, mana and stamina regeneration.
pub fn regenerate(
    time: Res<Time>,
    mut players: Query<(&Attributes, &mut Combatant, &mut Stamina), (With<Player>, Without<Dead>)>,
) {
    let dt = time.delta_secs();
    for (attributes, mut combatant, mut stamina) in players.iter_mut() {
        if combatant.is_dead() {
            continue;
        }
        combatant.regenerate(dt, attributes.regen_rates());
        stamina.regenerate(dt);
    }
}

type Swingers<'w, 's> = Query<
    'w,
    's,
    (
        &'static Combatant,
        &'static mut AttackCooldown,
        &'static mut Stamina,
        &'static AttackSpeed,
        Option<&'static StatusEffects>,
        Option<&'static Buffs>,
    ),
    With<Player>,
>;

/// Turn landed melee hits into damage. A swing needs a ready cooldown and
/// enough stamina; a dropped swing costs nothing.
pub fn handle_player_attacks(
    tuning: Res<CombatTuning>,
    mut events: EventReader<PlayerAttackEvent>,
    mut players: Swingers,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for event in events.read() {
        let Ok((combatant, mut cooldown, mut stamina, speed, status, buffs)) = players.get_mut(event.player) else {
            debug!("Attack from unknown player {:?}", event.player);
            continue;
        };
        if combatant.is_dead() || is_stunned(buffs) {
            continue;
        }
        if !cooldown.is_ready() {
            debug!("Player attack dropped: {:.2}s cooldown left", cooldown.remaining);
            continue;
        }
        if !stamina.use_stamina(tuning.player_swing_stamina) {
            debug!("Player attack dropped: {:.1} stamina left", stamina.current);
            continue;
        }
        cooldown.reset(tuning.player_attack_cooldown, speed.0);
        let buffed = buffs.map_or(1.0, Buffs::outgoing_multiplier);
        damage_events.send(DamageEvent {
            target: event.target,
            source: Some(event.player),
            amount: outgoing_damage(event.raw_damage, 0.0, status) * buffed,
            kind: DamageKind::Hit(AttackerClass::PlayerMelee),
            debuffs: event.debuffs.clone(),
        });
    }
}

/// Announce the player's own death.
pub fn handle_player_death(
    mut deaths: EventReader<DeathEvent>,
    players: Query<(), With<Player>>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    for death in deaths.read() {
        if players.get(death.entity).is_ok() {
            info!("Player {:?} died", death.entity);
            chat.send(ChatMessageEvent::new("You have been defeated!", MessageStyle::Warning));
        }
    }
}

/// Credit defeat and wave rewards to the player.
pub fn award_rewards(
    data: Res<CombatData>,
    mut defeated: EventReader<EnemyDefeatedEvent>,
    mut cleared: EventReader<WaveClearedEvent>,
    mut players: Query<
        (Entity, &Equipment, &mut Progression, &mut Attributes, &mut Combatant, &mut Stamina),
        With<Player>,
    >,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut chat: EventWriter<ChatMessageEvent>,
) {
    let Ok((entity, equipment, mut progression, mut attributes, mut combatant, mut stamina)) = players.get_single_mut()
    else {
        defeated.clear();
        cleared.clear();
        return;
    };

    let mut xp = 0;
    for event in defeated.read() {
        xp += event.loot.xp;
        progression.gold += event.loot.gold;
        progression.inventory.extend(event.loot.items.iter().cloned());
    }
    for event in cleared.read() {
        xp += event.xp;
        progression.inventory.extend(event.reward_items.iter().cloned());
    }
    if xp == 0 {
        return;
    }

    let gained = progression.gain_xp(xp);
    if gained == 0 || combatant.is_dead() {
        return;
    }
    attributes.raise_all(2 * gained);
    let stats = attributes.derive(&equipment.bonus(&data.items));
    apply_derived(&stats, &mut combatant, &mut stamina);
    combatant.health = combatant.max_health;
    combatant.mana = combatant.max_mana;
    stamina.current = stamina.maximum;
    info!("Player reached level {}", progression.level);
    chat.send(ChatMessageEvent::new(
        format!("Level up! You are now level {}", progression.level),
        MessageStyle::Info,
    ));
    level_ups.send(LevelUpEvent {
        player: entity,
        new_level: progression.level,
    });
}
