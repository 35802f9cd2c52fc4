//! Tech tiers.

use tracing::debug;

use crate::config::MatchConfig;
use crate::error::CommandError;
use crate::events::GameEvent;
use crate::factions::Faction;
use crate::state::MatchState;

/// Highest reachable tech tier.
pub const MAX_TECH_TIER: u8 = 3;

/// Move `faction` up one tech tier.
///
/// # Errors
///
/// Rejected at the top tier, when gold is short, or after the match ended.
pub fn upgrade_tech_tier(
    state: &mut MatchState,
    config: &MatchConfig,
    faction: Faction,
) -> Result<GameEvent, CommandError> {
    if state.is_game_over {
        return Err(CommandError::MatchOver);
    }
    let side = state.faction_mut(faction);
    let cost = config
        .tier_upgrade_cost(side.tech_tier)
        .ok_or(CommandError::MaxTier)?;
    if side.gold < cost {
        return Err(CommandError::InsufficientGold {
            required: cost,
            available: side.gold,
        });
    }

    side.gold -= cost;
    side.tech_tier += 1;
    debug!(%faction, tier = side.tech_tier, "Tech tier upgraded");

    Ok(GameEvent::TierUpgraded {
        faction,
        tier: side.tech_tier,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Fixed;
    use crate::state::create_initial_state;

    #[test]
    fn test_upgrade_path() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        state.faction_mut(Faction::Undead).gold = Fixed::from_num(700);

        upgrade_tech_tier(&mut state, &config, Faction::Undead).unwrap();
        upgrade_tech_tier(&mut state, &config, Faction::Undead).unwrap();
        let side = state.faction(Faction::Undead);
        assert_eq!(side.tech_tier, MAX_TECH_TIER);
        assert_eq!(side.gold, Fixed::from_num(100));

        assert_eq!(
            upgrade_tech_tier(&mut state, &config, Faction::Undead),
            Err(CommandError::MaxTier)
        );
    }

    #[test]
    fn test_upgrade_needs_gold() {
        let config = MatchConfig::default();
        let mut state = create_initial_state(&config);
        let before = state.clone();

        assert_eq!(
            upgrade_tech_tier(&mut state, &config, Faction::Human),
            Err(CommandError::InsufficientGold {
                required: Fixed::from_num(200),
                available: Fixed::from_num(100),
            })
        );
        assert_eq!(state, before);
    }
}
