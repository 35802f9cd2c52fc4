//! Gold income, the contested middle and gold mines.
//!
//! Income is credited in one place per faction per tick, so the
//! `gold_earned` statistic is exactly the sum of what was added.

use tracing::debug;

use crate::config::MatchConfig;
use crate::error::CommandError;
use crate::events::GameEvent;
use crate::factions::Faction;
use crate::math::Fixed;
use crate::state::MatchState;

/// Maximum magnitude of middle-control progress.
pub const MIDDLE_CONTROL_LIMIT: i32 = 100;

/// Gold a faction earns over `dt`: base income, middle bonus and mines.
#[must_use]
pub fn income_for(state: &MatchState, config: &MatchConfig, faction: Faction, dt: Fixed) -> Fixed {
    let side = state.faction(faction);
    let mut rate = config.gold_per_second;
    if state.middle_control_faction == Some(faction) {
        rate += config.middle_control_bonus;
    }
    rate += Fixed::from_num(side.gold_mines) * config.gold_mine_income;
    rate * dt
}

/// Credit income to both factions and tick down mine cooldowns.
pub fn run_income(state: &mut MatchState, config: &MatchConfig, dt: Fixed) {
    for faction in Faction::ALL {
        let income = income_for(state, config, faction, dt);
        let side = state.faction_mut(faction);
        side.earn(income);
        side.gold_mine_cooldown = (side.gold_mine_cooldown - dt).max(Fixed::ZERO);
    }
}

/// Shift the middle tug-of-war toward the side with more regular units
/// inside the contested zone, across both lanes.
pub fn run_middle_control(state: &mut MatchState, config: &MatchConfig, dt: Fixed) {
    let in_zone = |faction: Faction| {
        state
            .faction(faction)
            .units
            .iter()
            .filter(|u| {
                u.is_alive()
                    && u.position >= config.middle_zone_start
                    && u.position <= config.middle_zone_end
            })
            .count()
    };
    let human = in_zone(Faction::Human);
    let undead = in_zone(Faction::Undead);

    let shift = config.middle_control_speed * dt;
    let limit = Fixed::from_num(MIDDLE_CONTROL_LIMIT);
    let progress = match human.cmp(&undead) {
        std::cmp::Ordering::Greater => state.middle_control_progress.saturating_add(shift),
        std::cmp::Ordering::Less => state.middle_control_progress.saturating_sub(shift),
        std::cmp::Ordering::Equal => state.middle_control_progress,
    }
    .clamp(-limit, limit);

    let holder = if progress >= limit {
        Some(Faction::Human)
    } else if progress <= -limit {
        Some(Faction::Undead)
    } else {
        None
    };
    if holder != state.middle_control_faction {
        debug!(?holder, "Middle control changed");
    }

    state.middle_control_progress = progress;
    state.middle_control_faction = holder;
}

/// Buy a gold mine for `faction`.
///
/// # Errors
///
/// Rejected while the purchase cooldown runs, when the faction cannot
/// afford `floor(base × multiplier^owned)`, or after the match ended.
pub fn purchase_gold_mine(
    state: &mut MatchState,
    config: &MatchConfig,
    faction: Faction,
) -> Result<GameEvent, CommandError> {
    if state.is_game_over {
        return Err(CommandError::MatchOver);
    }
    let side = state.faction_mut(faction);
    if side.gold_mine_cooldown > Fixed::ZERO {
        return Err(CommandError::MineCooldown {
            remaining: side.gold_mine_cooldown,
        });
    }
    let cost = config.gold_mine_cost(side.gold_mines);
    if side.gold < cost {
        return Err(CommandError::InsufficientGold {
            required: cost,
            available: side.gold,
        });
    }

    side.gold -= cost;
    side.gold_mines += 1;
    side.gold_mine_cooldown = config.gold_mine_cooldown;
    debug!(%faction, mines = side.gold_mines, %cost, "Gold mine purchased");

    Ok(GameEvent::GoldMinePurchased {
        faction,
        mines: side.gold_mines,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factions::Lane;
    use crate::state::create_initial_state;
    use crate::units::{Unit, UnitType};

    fn put(state: &mut MatchState, unit_type: UnitType, position: i32) {
        let id = state.allocate_id();
        let faction = unit_type.faction();
        let unit = Unit::regular(id, unit_type, faction, Lane::Top, Fixed::from_num(position));
        state.faction_mut(faction).units.push(unit);
    }

    #[test]
    fn test_income_records_earned() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        state.faction_mut(Faction::Undead).gold_mines = 2;
        state.middle_control_faction = Some(Faction::Undead);

        run_income(&mut state, &config, Fixed::ONE);

        let human = state.faction(Faction::Human);
        assert_eq!(human.gold, Fixed::from_num(105));
        assert_eq!(human.statistics.gold_earned, Fixed::from_num(5));

        // 5 base + 3 middle + 2 × 2 mines.
        let undead = state.faction(Faction::Undead);
        assert_eq!(undead.gold, Fixed::from_num(112));
        assert_eq!(undead.statistics.gold_earned, Fixed::from_num(12));
    }

    #[test]
    fn test_middle_control_shifts_and_clamps() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        put(&mut state, UnitType::Footman, 50);

        run_middle_control(&mut state, &config, Fixed::ONE);
        assert_eq!(state.middle_control_progress, Fixed::from_num(5));
        assert_eq!(state.middle_control_faction, None);

        for _ in 0..30 {
            run_middle_control(&mut state, &config, Fixed::ONE);
        }
        assert_eq!(state.middle_control_progress, Fixed::from_num(100));
        assert_eq!(state.middle_control_faction, Some(Faction::Human));
    }

    #[test]
    fn test_middle_control_ties_hold() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        state.middle_control_progress = Fixed::from_num(-40);
        put(&mut state, UnitType::Footman, 45);
        put(&mut state, UnitType::Zombie, 55);
        put(&mut state, UnitType::Zombie, 56);

        run_middle_control(&mut state, &config, Fixed::ONE);
        assert_eq!(state.middle_control_progress, Fixed::from_num(-40));
    }

    #[test]
    fn test_heroes_do_not_hold_middle() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        let id = state.allocate_id();
        let hero = state
            .faction(Faction::Human)
            .hero
            .spawn_unit(id, Lane::Top, Fixed::from_num(50));
        state.faction_mut(Faction::Human).active_hero = Some(hero);

        run_middle_control(&mut state, &config, Fixed::ONE);
        assert_eq!(state.middle_control_progress, Fixed::ZERO);
    }

    #[test]
    fn test_gold_mine_purchase_rules() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);

        let err = purchase_gold_mine(&mut state, &config, Faction::Human).unwrap_err();
        assert!(matches!(err, CommandError::InsufficientGold { .. }));

        state.faction_mut(Faction::Human).gold = Fixed::from_num(500);
        purchase_gold_mine(&mut state, &config, Faction::Human).unwrap();
        let side = state.faction(Faction::Human);
        assert_eq!(side.gold, Fixed::from_num(350));
        assert_eq!(side.gold_mines, 1);

        let before = state.clone();
        let err = purchase_gold_mine(&mut state, &config, Faction::Human).unwrap_err();
        assert!(matches!(err, CommandError::MineCooldown { .. }));
        assert_eq!(state, before);

        run_income(&mut state, &config, Fixed::from_num(30));
        let event = purchase_gold_mine(&mut state, &config, Faction::Human).unwrap();
        assert_eq!(
            event,
            GameEvent::GoldMinePurchased {
                faction: Faction::Human,
                mines: 2,
                cost: Fixed::from_num(225),
            }
        );
    }
}
