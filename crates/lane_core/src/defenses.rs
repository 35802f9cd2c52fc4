//! Tower and fortress fire.

use crate::combat::{strike_unit, Strike};
use crate::config::MatchConfig;
use crate::events::{Attacker, TickEvents};
use crate::factions::Faction;
use crate::math::{lane_distance, Fixed};
use crate::state::MatchState;
use crate::structures::{Building, Tower};
use crate::units::{AttackStyle, UnitId};

/// Every live tower shoots the nearest same-lane enemy within range.
///
/// Towers are processed human first. Tower kills grant no XP.
pub fn run_tower_attacks(state: &mut MatchState, config: &MatchConfig, events: &mut TickEvents) {
    let now = state.match_time;
    let towers: Vec<(Faction, UnitId)> = state
        .factions
        .iter()
        .flat_map(|side| side.towers.iter().map(|t| (t.faction, t.id)))
        .collect();

    for (faction, id) in towers {
        let Some(tower) = state.faction(faction).towers.iter().find(|t| t.id == id) else {
            continue;
        };
        if tower.is_dead {
            continue;
        }

        let target = state
            .faction(faction.opponent())
            .live_in_lane(tower.lane)
            .map(|u| (u.id, lane_distance(u.position, tower.position)))
            .filter(|(_, distance)| *distance <= tower.range)
            .fold(None, |best: Option<(UnitId, _)>, candidate| match best {
                Some((_, best_distance)) if candidate.1 >= best_distance => best,
                _ => Some(candidate),
            });
        let Some((target, _)) = target else {
            continue;
        };
        if !tower.ready(now) {
            continue;
        }

        let strike = Strike {
            attacker: Attacker::Tower(id),
            faction,
            attack: tower.attack,
            attack_type: Tower::ATTACK_TYPE,
            style: AttackStyle::Arrow,
        };
        if let Some(tower) = state.tower_mut(id) {
            tower.last_attack_time = now;
        }
        strike_unit(state, config, strike, target, events);
    }
}

/// Each standing fortress shoots the enemy unit deepest inside its reach.
///
/// Fortresses cover both lanes. The human fortress picks the lowest
/// position, the undead fortress the highest.
pub fn run_building_attacks(state: &mut MatchState, config: &MatchConfig, events: &mut TickEvents) {
    let now = state.match_time;

    for faction in Faction::ALL {
        let building = &state.faction(faction).building;
        if building.is_dead {
            continue;
        }

        let deeper = |a: Fixed, b: Fixed| match faction {
            Faction::Human => a < b,
            Faction::Undead => a > b,
        };
        let target = state
            .faction(faction.opponent())
            .combatants()
            .filter(|u| u.is_alive() && building.covers(u.position))
            .fold(None, |best: Option<(UnitId, _)>, u| match best {
                Some((_, best_position)) if !deeper(u.position, best_position) => best,
                _ => Some((u.id, u.position)),
            });
        let Some((target, _)) = target else {
            continue;
        };
        if !building.ready(now) {
            continue;
        }

        let strike = Strike {
            attacker: Attacker::Building(faction),
            faction,
            attack: building.attack,
            attack_type: Building::ATTACK_TYPE,
            style: AttackStyle::Magic,
        };
        state.faction_mut(faction).building.last_attack_time = now;
        strike_unit(state, config, strike, target, events);
    }
}
