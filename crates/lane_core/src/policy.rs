//! Decision policy interface for computer-controlled factions.
//!
//! A policy sees the whole match read-only and acts only through
//! [`FactionCommands`], the same hire, upgrade and mine commands a
//! player issues. It cannot touch units, timers or the other faction.

use crate::config::MatchConfig;
use crate::economy::purchase_gold_mine;
use crate::error::CommandError;
use crate::events::TickEvents;
use crate::factions::{Faction, Lane};
use crate::spawning::hire_unit;
use crate::state::{FactionState, MatchState};
use crate::tech::upgrade_tech_tier;
use crate::units::UnitType;

/// Command surface handed to a policy for one faction during one tick.
///
/// Applied commands append their events to the tick's event list.
pub struct FactionCommands<'a> {
    state: &'a mut MatchState,
    config: &'a MatchConfig,
    faction: Faction,
    events: &'a mut TickEvents,
}

impl<'a> FactionCommands<'a> {
    /// Open the command surface for `faction`.
    pub fn new(
        state: &'a mut MatchState,
        config: &'a MatchConfig,
        faction: Faction,
        events: &'a mut TickEvents,
    ) -> Self {
        Self {
            state,
            config,
            faction,
            events,
        }
    }

    /// Faction this surface commands.
    #[must_use]
    pub fn faction(&self) -> Faction {
        self.faction
    }

    /// Read-only view of the match.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        self.state
    }

    /// Balance constants of the match.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        self.config
    }

    /// The commanded faction's own state.
    #[must_use]
    pub fn own(&self) -> &FactionState {
        self.state.faction(self.faction)
    }

    /// The opposing faction's state.
    #[must_use]
    pub fn enemy(&self) -> &FactionState {
        self.state.faction(self.faction.opponent())
    }

    /// Hire a formation slot.
    ///
    /// # Errors
    ///
    /// See [`hire_unit`].
    pub fn hire_unit(&mut self, unit_type: UnitType, lane: Lane) -> Result<(), CommandError> {
        let event = hire_unit(self.state, unit_type, self.faction, lane)?;
        self.events.push(event);
        Ok(())
    }

    /// Upgrade the tech tier.
    ///
    /// # Errors
    ///
    /// See [`upgrade_tech_tier`].
    pub fn upgrade_tech_tier(&mut self) -> Result<(), CommandError> {
        let event = upgrade_tech_tier(self.state, self.config, self.faction)?;
        self.events.push(event);
        Ok(())
    }

    /// Buy a gold mine.
    ///
    /// # Errors
    ///
    /// See [`purchase_gold_mine`].
    pub fn purchase_gold_mine(&mut self) -> Result<(), CommandError> {
        let event = purchase_gold_mine(self.state, self.config, self.faction)?;
        self.events.push(event);
        Ok(())
    }
}

/// A strategy that steers one faction.
///
/// Called once per tick, after economy and before movement. The policy
/// keeps whatever memory it needs in `self`, scoped to one match.
pub trait DecisionPolicy {
    /// Faction this policy controls.
    fn faction(&self) -> Faction;

    /// Inspect the match and issue commands.
    fn decide(&mut self, commands: &mut FactionCommands<'_>);
}
