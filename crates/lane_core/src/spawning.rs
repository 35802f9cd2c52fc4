//! Wave scheduling, formation production and hiring.
//!
//! Each lane has its own countdown. When a lane's timer runs out, every
//! active formation slot for that lane produces one unit and, on
//! alternating lanes, missing heroes return to the field.

use tracing::debug;

use crate::config::MatchConfig;
use crate::error::CommandError;
use crate::events::{GameEvent, TickEvents};
use crate::factions::{Faction, Lane};
use crate::math::Fixed;
use crate::state::{FormationSlot, MatchState};
use crate::units::{Unit, UnitType};

/// Whether heroes come out with this lane's next wave.
///
/// Heroes ride top-lane waves while the counter is even and bottom-lane
/// waves while it is odd. Only top-lane waves advance the counter.
#[must_use]
pub fn hero_lane_fires(state: &MatchState, lane: Lane) -> bool {
    match lane {
        Lane::Top => state.hero_wave_counter % 2 == 0,
        Lane::Bottom => state.hero_wave_counter % 2 == 1,
    }
}

/// Count both lane timers down by `dt` and fire the waves that are due.
pub fn run_wave_scheduler(state: &mut MatchState, config: &MatchConfig, dt: Fixed, events: &mut TickEvents) {
    for lane in Lane::ALL {
        let timer = state.wave_timer_mut(lane);
        *timer -= dt;
        if *timer > Fixed::ZERO {
            continue;
        }

        if hero_lane_fires(state, lane) {
            spawn_heroes(state, config, lane, events);
        }
        spawn_wave(state, config, lane, events);

        *state.wave_timer_mut(lane) = config.wave_interval;
        if lane == Lane::Top {
            state.hero_wave_counter += 1;
        }
    }
}

fn spawn_heroes(state: &mut MatchState, config: &MatchConfig, lane: Lane, events: &mut TickEvents) {
    let now = state.match_time;
    for faction in Faction::ALL {
        let side = state.faction(faction);
        if side.active_hero.is_some() || !side.hero.can_respawn(now) {
            continue;
        }

        let id = state.allocate_id();
        let side = state.faction_mut(faction);
        let unit = side
            .hero
            .spawn_unit(id, lane, faction.from_own_base(config.hero_spawn_offset));
        side.hero.respawn_ready_at = None;
        debug!(%faction, ?lane, level = side.hero.level, "Hero spawned");
        events.push(GameEvent::HeroSpawned {
            unit: id,
            hero_type: side.hero.hero_type,
            faction,
            lane,
            level: side.hero.level,
        });
        side.active_hero = Some(unit);
    }
}

fn spawn_wave(state: &mut MatchState, config: &MatchConfig, lane: Lane, events: &mut TickEvents) {
    for faction in Faction::ALL {
        let orders: Vec<UnitType> = state
            .faction(faction)
            .formation
            .iter()
            .filter(|slot| slot.is_active && slot.lane == lane)
            .map(|slot| slot.unit_type)
            .collect();

        let position = faction.from_own_base(config.unit_spawn_offset);
        for unit_type in orders {
            let id = state.allocate_id();
            let unit = Unit::regular(id, unit_type, faction, lane, position);
            state.faction_mut(faction).units.push(unit);
            debug!(%faction, ?lane, unit = unit_type.name(), id, "Unit spawned");
            events.push(GameEvent::UnitSpawned {
                unit: id,
                unit_type,
                faction,
                lane,
            });
        }
    }
}

/// Buy a standing formation slot producing `unit_type` in `lane`.
///
/// The cost is paid once; the slot then produces a unit every wave.
///
/// # Errors
///
/// Rejected when the unit belongs to the other faction, its tier is
/// locked, gold is short, or the match is over. A rejected hire leaves
/// the state untouched.
pub fn hire_unit(
    state: &mut MatchState,
    unit_type: UnitType,
    faction: Faction,
    lane: Lane,
) -> Result<GameEvent, CommandError> {
    if state.is_game_over {
        return Err(CommandError::MatchOver);
    }
    if unit_type.faction() != faction {
        return Err(CommandError::WrongFaction { unit_type, faction });
    }

    let side = state.faction_mut(faction);
    let stats = unit_type.stats();
    if stats.tier_required > side.tech_tier {
        return Err(CommandError::TierLocked {
            required: stats.tier_required,
            current: side.tech_tier,
        });
    }
    let cost = unit_type.cost();
    if side.gold < cost {
        return Err(CommandError::InsufficientGold {
            required: cost,
            available: side.gold,
        });
    }

    side.gold -= cost;
    side.formation.push(FormationSlot {
        unit_type,
        lane,
        is_active: true,
    });
    debug!(%faction, unit = unit_type.name(), ?lane, "Formation slot hired");

    Ok(GameEvent::UnitHired {
        faction,
        unit_type,
        lane,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_initial_state;

    #[test]
    fn test_hire_deducts_and_appends() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);

        hire_unit(&mut state, UnitType::Footman, Faction::Human, Lane::Top).unwrap();
        let side = state.faction(Faction::Human);
        assert_eq!(side.gold, Fixed::from_num(50));
        assert_eq!(
            side.formation,
            vec![FormationSlot {
                unit_type: UnitType::Footman,
                lane: Lane::Top,
                is_active: true,
            }]
        );
    }

    #[test]
    fn test_hire_rejections_leave_state_untouched() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        let before = state.clone();

        assert_eq!(
            hire_unit(&mut state, UnitType::Zombie, Faction::Human, Lane::Top),
            Err(CommandError::WrongFaction {
                unit_type: UnitType::Zombie,
                faction: Faction::Human,
            })
        );
        assert_eq!(
            hire_unit(&mut state, UnitType::Ghoul, Faction::Undead, Lane::Top),
            Err(CommandError::TierLocked { required: 2, current: 1 })
        );
        state.faction_mut(Faction::Undead).gold = Fixed::from_num(49);
        let before_gold = state.clone();
        assert!(matches!(
            hire_unit(&mut state, UnitType::Zombie, Faction::Undead, Lane::Bottom),
            Err(CommandError::InsufficientGold { .. })
        ));
        assert_eq!(state, before_gold);

        state = before;
        state.is_game_over = true;
        state.winner = Some(Faction::Human);
        assert_eq!(
            hire_unit(&mut state, UnitType::Footman, Faction::Human, Lane::Top),
            Err(CommandError::MatchOver)
        );
    }

    #[test]
    fn test_wave_spawns_formation_at_edge() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        hire_unit(&mut state, UnitType::Footman, Faction::Human, Lane::Top).unwrap();
        hire_unit(&mut state, UnitType::Skeleton, Faction::Undead, Lane::Top).unwrap();
        let mut events = TickEvents::default();

        run_wave_scheduler(&mut state, &config, Fixed::from_num(8), &mut events);

        let human = state.faction(Faction::Human);
        assert_eq!(human.units.len(), 1);
        assert_eq!(human.units[0].position, Fixed::from_num(5));
        assert_eq!(human.units[0].lane, Lane::Top);
        let undead = state.faction(Faction::Undead);
        assert_eq!(undead.units[0].position, Fixed::from_num(95));

        assert_eq!(state.north_wave_timer, Fixed::from_num(8));
        assert_eq!(state.south_wave_timer, Fixed::from_num(4));
        assert_eq!(state.hero_wave_counter, 1);
    }

    #[test]
    fn test_heroes_alternate_lanes() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        let mut events = TickEvents::default();

        // First top wave brings both heroes.
        run_wave_scheduler(&mut state, &config, Fixed::from_num(8), &mut events);
        for side in &state.factions {
            let hero = side.active_hero.as_ref().unwrap();
            assert_eq!(hero.lane, Lane::Top);
        }
        assert_eq!(
            state.faction(Faction::Undead).active_hero.as_ref().unwrap().position,
            Fixed::from_num(90)
        );

        // Heroes die; the next eligible wave is the bottom lane (counter odd).
        for side in &mut state.factions {
            side.active_hero = None;
        }
        run_wave_scheduler(&mut state, &config, Fixed::from_num(4), &mut events);
        for side in &state.factions {
            assert_eq!(side.active_hero.as_ref().unwrap().lane, Lane::Bottom);
        }
    }

    #[test]
    fn test_living_hero_is_not_replaced() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        let mut events = TickEvents::default();
        run_wave_scheduler(&mut state, &config, Fixed::from_num(8), &mut events);
        let first = state.faction(Faction::Human).active_hero.as_ref().unwrap().id;

        // Counter is 1, so the bottom wave would carry heroes, but both live.
        run_wave_scheduler(&mut state, &config, Fixed::from_num(4), &mut events);
        assert_eq!(state.faction(Faction::Human).active_hero.as_ref().unwrap().id, first);
    }

    #[test]
    fn test_respawn_delay_holds_hero_back() {
        let config = MatchConfig::with_hero_respawn();
        let mut state = create_initial_state(&config);
        state.faction_mut(Faction::Human).hero.respawn_ready_at = Some(Fixed::from_num(30));
        let mut events = TickEvents::default();

        state.match_time = Fixed::from_num(8);
        run_wave_scheduler(&mut state, &config, Fixed::from_num(8), &mut events);
        assert!(state.faction(Faction::Human).active_hero.is_none());
        assert!(state.faction(Faction::Undead).active_hero.is_some());
    }
}
