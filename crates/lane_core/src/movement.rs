//! Lane movement, target acquisition and fortress assaults.

use tracing::trace;

use crate::combat::Strike;
use crate::config::MatchConfig;
use crate::events::{Attacker, GameEvent, TickEvents};
use crate::factions::{Faction, Lane};
use crate::math::{clamp_lane, cooldown_ready, lane_distance, Fixed, LANE_LENGTH};
use crate::state::MatchState;
use crate::structures::Building;
use crate::units::{TargetRef, UnitId};

/// Nearest same-lane enemy of a faction seen from `position`.
///
/// Enemy units are scanned before enemy towers with a strict comparison,
/// so the first unit found wins ties and units win ties against towers.
#[must_use]
pub fn nearest_enemy(
    state: &MatchState,
    faction: Faction,
    lane: Lane,
    position: Fixed,
) -> Option<(TargetRef, Fixed)> {
    let enemy = state.faction(faction.opponent());
    let units = enemy
        .live_in_lane(lane)
        .map(|u| (TargetRef::Unit(u.id), lane_distance(position, u.position)));
    let towers = enemy
        .towers
        .iter()
        .filter(|t| !t.is_dead && t.lane == lane)
        .map(|t| (TargetRef::Tower(t.id), lane_distance(position, t.position)));

    units.chain(towers).fold(None, |best, candidate| match best {
        Some((_, best_distance)) if candidate.1 >= best_distance => best,
        _ => Some(candidate),
    })
}

/// Whether a unit of `faction` at `position` can strike the enemy fortress.
#[must_use]
pub fn at_enemy_base(config: &MatchConfig, faction: Faction, position: Fixed) -> bool {
    let reach = config.base_attack_reach;
    match faction {
        Faction::Human => position >= Fixed::from_num(LANE_LENGTH) - reach,
        Faction::Undead => position <= reach,
    }
}

/// Move every live unit one step and pick its target for this tick.
///
/// A unit with no enemy in its lane marches on the enemy base and hits
/// the enemy fortress once it is close enough. A unit with an enemy
/// out of range keeps marching; in range, it stops and locks on.
pub fn run_movement(state: &mut MatchState, config: &MatchConfig, dt: Fixed, events: &mut TickEvents) {
    let now = state.match_time;
    let order: Vec<UnitId> = state.combatants().map(|u| u.id).collect();

    for id in order {
        let Some(unit) = state.unit(id).filter(|u| u.is_alive()) else {
            continue;
        };
        let faction = unit.faction;
        let range = unit.range;
        let step = faction.direction() * unit.move_speed * dt;
        let nearest = nearest_enemy(state, faction, unit.lane, unit.position);

        let Some(unit) = state.unit_mut(id) else {
            continue;
        };
        match nearest {
            Some((target, distance)) if distance <= range => {
                unit.target = Some(target);
            }
            Some(_) => {
                unit.position = clamp_lane(unit.position + step);
                unit.target = None;
            }
            None => {
                unit.position = clamp_lane(unit.position + step);
                unit.target = None;

                if at_enemy_base(config, faction, unit.position)
                    && cooldown_ready(now, unit.last_attack_time, unit.attack_speed)
                {
                    unit.last_attack_time = now;
                    let strike = Strike {
                        attacker: Attacker::Unit(id),
                        faction,
                        attack: unit.attack,
                        attack_type: unit.attack_type,
                        style: unit.attack_style(),
                    };
                    strike_building(state, config, strike, events);
                }
            }
        }
    }
}

fn strike_building(state: &mut MatchState, config: &MatchConfig, strike: Strike, events: &mut TickEvents) {
    let Attacker::Unit(attacker) = strike.attacker else {
        return;
    };
    let owner = strike.faction.opponent();
    let damage = config
        .damage_model
        .damage(strike.attack, strike.attack_type, Building::ARMOR_TYPE);

    state.faction_mut(owner).building.health -= damage;
    state.faction_mut(strike.faction).statistics.damage_dealt += i64::from(damage);
    trace!(attacker, building = %owner, damage, "Fortress hit");
    events.push(GameEvent::BuildingHit {
        attacker,
        building: owner,
        damage,
    });
}
