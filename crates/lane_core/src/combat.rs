//! Combat resolution: unit attacks, damage application and kills.
//!
//! Every hit in the match, whoever lands it, goes through [`strike_unit`]
//! or [`strike_tower`] so damage accounting, death handling and events
//! are identical for units, towers and fortresses.

use tracing::{debug, trace};

use crate::config::MatchConfig;
use crate::damage::AttackType;
use crate::events::{Attacker, GameEvent, TickEvents};
use crate::factions::Faction;
use crate::hero::apply_level_up;
use crate::math::{cooldown_ready, Fixed};
use crate::state::MatchState;
use crate::structures::Tower;
use crate::units::{AttackStyle, TargetRef, UnitId};

/// One attack about to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    /// Who attacks.
    pub attacker: Attacker,
    /// Faction credited with the damage.
    pub faction: Faction,
    /// Base damage before armor.
    pub attack: i32,
    /// Damage classification.
    pub attack_type: AttackType,
    /// Visual style.
    pub style: AttackStyle,
}

/// Apply a strike to a unit.
///
/// Returns `None` if the target does not exist or is already dead,
/// otherwise whether the strike killed it. Unit-on-unit kills credit
/// the attacking faction with a kill and hero XP.
pub fn strike_unit(
    state: &mut MatchState,
    config: &MatchConfig,
    strike: Strike,
    target: UnitId,
    events: &mut TickEvents,
) -> Option<bool> {
    let now = state.match_time;
    let victim = state.unit_mut(target).filter(|u| u.is_alive())?;
    let damage = config
        .damage_model
        .damage(strike.attack, strike.attack_type, victim.armor_type);
    let killed = victim.take_damage(damage);
    let victim_faction = victim.faction;
    let victim_is_hero = victim.hero().is_some();

    state.faction_mut(strike.faction).statistics.damage_dealt += i64::from(damage);
    trace!(attacker = ?strike.attacker, target, damage, "Attack landed");
    events.push(GameEvent::AttackLanded {
        attacker: strike.attacker,
        faction: strike.faction,
        target: TargetRef::Unit(target),
        damage,
        style: strike.style,
    });

    if !killed {
        return Some(false);
    }

    events.push(GameEvent::UnitDied {
        unit: target,
        faction: victim_faction,
        killer: strike.attacker,
        hero: victim_is_hero,
    });

    if victim_is_hero && config.hero_respawn_delay > Fixed::ZERO {
        state.faction_mut(victim_faction).hero.respawn_ready_at =
            Some(now + config.hero_respawn_delay);
    }

    if matches!(strike.attacker, Attacker::Unit(_)) {
        state.faction_mut(strike.faction).statistics.units_killed += 1;
        award_hero_xp(state, config, strike.faction, config.xp_per_kill, events);
    }

    Some(true)
}

/// Apply a unit's strike to a tower.
///
/// Returns `None` if the tower is gone, otherwise whether it was destroyed.
/// Destroyed towers stay in place until the end-of-tick cleanup.
pub fn strike_tower(
    state: &mut MatchState,
    config: &MatchConfig,
    strike: Strike,
    target: UnitId,
    events: &mut TickEvents,
) -> Option<bool> {
    let tower = state.tower_mut(target).filter(|t| !t.is_dead)?;
    let damage = config
        .damage_model
        .damage(strike.attack, strike.attack_type, Tower::ARMOR_TYPE);
    let destroyed = tower.take_damage(damage);

    state.faction_mut(strike.faction).statistics.damage_dealt += i64::from(damage);
    trace!(attacker = ?strike.attacker, tower = target, damage, "Tower hit");
    events.push(GameEvent::AttackLanded {
        attacker: strike.attacker,
        faction: strike.faction,
        target: TargetRef::Tower(target),
        damage,
        style: strike.style,
    });

    Some(destroyed)
}

/// Grant XP to a faction's hero and propagate any level-ups.
///
/// A live hero unit picks up the new stats and is fully healed.
pub fn award_hero_xp(
    state: &mut MatchState,
    config: &MatchConfig,
    faction: Faction,
    amount: u32,
    events: &mut TickEvents,
) {
    let side = state.faction_mut(faction);
    let gained = side
        .hero
        .award_xp(amount, config.xp_per_level, config.max_hero_level);

    for level_up in &gained {
        side.statistics.hero_level = level_up.level;
        if let Some(unit) = side.active_hero.as_mut().filter(|u| u.is_alive()) {
            apply_level_up(unit, level_up);
        }
        debug!(%faction, level = level_up.level, "Hero leveled up");
        events.push(GameEvent::HeroLevelUp {
            faction,
            level: level_up.level,
        });
    }
}

/// Resolve attacks for every unit holding a target.
///
/// Units are processed human units first, then undead units, then the
/// human hero and the undead hero. A target that died earlier in the
/// tick is invalid and clears the reference.
pub fn run_combat(state: &mut MatchState, config: &MatchConfig, events: &mut TickEvents) {
    let now = state.match_time;
    let order: Vec<UnitId> = state.combatants().map(|u| u.id).collect();

    for id in order {
        let Some(attacker) = state.unit(id).filter(|u| u.is_alive()) else {
            continue;
        };
        let Some(target) = attacker.target else {
            continue;
        };
        let ready = cooldown_ready(now, attacker.last_attack_time, attacker.attack_speed);
        let strike = Strike {
            attacker: Attacker::Unit(id),
            faction: attacker.faction,
            attack: attacker.attack,
            attack_type: attacker.attack_type,
            style: attacker.attack_style(),
        };

        let target_valid = match target {
            TargetRef::Unit(target_id) => state.unit(target_id).is_some_and(|u| u.is_alive()),
            TargetRef::Tower(tower_id) => state.tower(tower_id).is_some_and(|t| !t.is_dead),
        };
        if !target_valid {
            clear_target(state, id);
            continue;
        }
        if !ready {
            continue;
        }

        if let Some(unit) = state.unit_mut(id) {
            unit.last_attack_time = now;
        }
        let finished = match target {
            TargetRef::Unit(target_id) => strike_unit(state, config, strike, target_id, events),
            TargetRef::Tower(tower_id) => strike_tower(state, config, strike, tower_id, events),
        };
        if finished == Some(true) {
            clear_target(state, id);
        }
    }
}

fn clear_target(state: &mut MatchState, id: UnitId) {
    if let Some(unit) = state.unit_mut(id) {
        unit.target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DamageModel;
    use crate::factions::Lane;
    use crate::state::create_initial_state;
    use crate::units::{Unit, UnitType};

    fn duel(human_health: i32, undead_health: i32) -> (MatchState, UnitId, UnitId) {
        let mut state = create_initial_state(&MatchConfig::default());
        let h = state.allocate_id();
        let u = state.allocate_id();

        let mut human = Unit::regular(h, UnitType::Footman, Faction::Human, Lane::Top, Fixed::from_num(50));
        human.health = human_health;
        human.max_health = human_health;
        human.target = Some(TargetRef::Unit(u));

        let mut undead = Unit::regular(u, UnitType::Zombie, Faction::Undead, Lane::Top, Fixed::from_num(51));
        undead.health = undead_health;
        undead.max_health = undead_health;
        undead.attack = human.attack;
        undead.attack_speed = human.attack_speed;
        undead.target = Some(TargetRef::Unit(h));

        state.faction_mut(Faction::Human).units.push(human);
        state.faction_mut(Faction::Undead).units.push(undead);
        (state, h, u)
    }

    #[test]
    fn test_cooldown_gates_attacks() {
        let config = MatchConfig::default();
        let (mut state, _, u) = duel(150, 100);
        let mut events = TickEvents::default();

        state.match_time = Fixed::from_num(1);
        run_combat(&mut state, &config, &mut events);
        assert_eq!(state.unit(u).map(|x| x.health), Some(88));

        state.match_time = crate::math::ratio(15, 10);
        run_combat(&mut state, &config, &mut events);
        assert_eq!(state.unit(u).map(|x| x.health), Some(88));
    }

    #[test]
    fn test_kill_clears_target_and_awards() {
        let config = MatchConfig::default();
        let (mut state, h, u) = duel(150, 12);
        let mut events = TickEvents::default();

        state.match_time = Fixed::from_num(1);
        run_combat(&mut state, &config, &mut events);

        let undead = state.unit(u).unwrap();
        assert!(!undead.is_alive());
        assert_eq!(state.unit(h).unwrap().target, None);
        // The dead zombie does not strike back.
        assert_eq!(state.unit(h).unwrap().health, 150);

        let stats = &state.faction(Faction::Human).statistics;
        assert_eq!(stats.units_killed, 1);
        assert_eq!(stats.damage_dealt, 12);
        assert_eq!(state.faction(Faction::Human).hero.xp, 10);
        assert_eq!(events.deaths().collect::<Vec<_>>(), vec![u]);
    }

    #[test]
    fn test_stale_target_is_cleared() {
        let config = MatchConfig::default();
        let (mut state, h, _) = duel(150, 100);
        state.faction_mut(Faction::Undead).units.clear();
        let mut events = TickEvents::default();

        state.match_time = Fixed::from_num(1);
        run_combat(&mut state, &config, &mut events);
        assert_eq!(state.unit(h).unwrap().target, None);
        assert!(events.is_empty());
    }

    #[test]
    fn test_armor_table_applies_to_units() {
        let config = MatchConfig {
            damage_model: DamageModel::ArmorTable,
            ..MatchConfig::default()
        };
        let (mut state, _, u) = duel(150, 100);
        let mut events = TickEvents::default();

        state.match_time = Fixed::from_num(1);
        run_combat(&mut state, &config, &mut events);
        // Normal vs medium is 100%.
        assert_eq!(state.unit(u).unwrap().health, 88);
    }

    #[test]
    fn test_unit_damages_tower() {
        let config = MatchConfig::default();
        let (mut state, h, _) = duel(150, 100);
        state.faction_mut(Faction::Undead).units.clear();
        let tower_id = state.faction(Faction::Undead).towers[0].id;
        state.unit_mut(h).unwrap().target = Some(TargetRef::Tower(tower_id));
        let mut events = TickEvents::default();

        state.match_time = Fixed::from_num(1);
        run_combat(&mut state, &config, &mut events);
        assert_eq!(state.tower(tower_id).unwrap().health, 788);
        assert_eq!(state.faction(Faction::Human).statistics.damage_dealt, 12);
    }

    #[test]
    fn test_multi_level_up_heals_live_hero() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        let id = state.allocate_id();
        let mut hero = state
            .faction(Faction::Human)
            .hero
            .spawn_unit(id, Lane::Top, Fixed::from_num(10));
        hero.health = 20;
        state.faction_mut(Faction::Human).active_hero = Some(hero);

        let mut events = TickEvents::default();
        award_hero_xp(&mut state, &config, Faction::Human, 200, &mut events);

        let side = state.faction(Faction::Human);
        assert_eq!(side.hero.level, 3);
        assert_eq!(side.statistics.hero_level, 3);
        let unit = side.active_hero.as_ref().unwrap();
        assert_eq!(unit.health, 600);
        assert_eq!(unit.hero().unwrap().level, 3);
        assert_eq!(events.len(), 2);
    }
}
