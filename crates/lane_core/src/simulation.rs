//! Match controller: the top-level tick.
//!
//! A tick runs every subsystem in a fixed order against the whole
//! [`MatchState`]. The same inputs always give the same outputs.
//!
//! # Determinism
//!
//! - No floating-point math (uses fixed-point via [`Fixed`])
//! - No system randomness (policies carry their own seeded RNG)
//! - Units and towers are always processed in list order, human first
//! - Δt is clamped before use, so a stalled caller cannot skip combat
//!
//! # Example
//!
//! ```
//! use lane_core::factions::{Faction, Lane};
//! use lane_core::math::Fixed;
//! use lane_core::simulation::Simulation;
//! use lane_core::units::UnitType;
//!
//! let mut sim = Simulation::new();
//! sim.hire_unit(UnitType::Footman, Faction::Human, Lane::Top).unwrap();
//!
//! let events = sim.advance(Fixed::from_num(0.0625));
//! assert!(events.winner().is_none());
//! ```

use std::fmt;

use tracing::{debug, info};

use crate::combat::run_combat;
use crate::config::MatchConfig;
use crate::defenses::{run_building_attacks, run_tower_attacks};
use crate::economy::{purchase_gold_mine, run_income, run_middle_control};
use crate::error::CommandError;
use crate::events::{GameEvent, TickEvents};
use crate::factions::{Faction, Lane};
use crate::math::Fixed;
use crate::movement::run_movement;
use crate::policy::{DecisionPolicy, FactionCommands};
use crate::spawning::{hire_unit, run_wave_scheduler};
use crate::state::{create_initial_state, MatchState};
use crate::tech::upgrade_tech_tier;
use crate::units::UnitType;

/// Advance a match by `dt` seconds.
///
/// `dt` is clamped into `[0, config.max_delta]`. Nothing happens while
/// the match is not playing, is paused, or already has a winner.
///
/// # System Execution Order
///
/// 1. **Guard** - bail out unless the match is running
/// 2. **Clock** - advance match time
/// 3. **Waves** - lane timers, hero returns, formation production
/// 4. **Income** - base, middle bonus and mine income
/// 5. **Middle Control** - tug-of-war over the contested zone
/// 6. **Hero Cleanup** - drop hero units that died last tick
/// 7. **Policies** - installed decision policies, human first
/// 8. **Movement** - marching, targeting and fortress hits
/// 9. **Combat** - unit attacks
/// 10. **Towers** - tower fire
/// 11. **Fortresses** - fortress fire
/// 12. **Removal** - dead units and towers leave the field
/// 13. **Victory** - a fallen fortress ends the match
pub fn advance(
    state: &mut MatchState,
    config: &MatchConfig,
    dt: Fixed,
    policies: &mut [Box<dyn DecisionPolicy>],
) -> TickEvents {
    let mut events = TickEvents::default();

    // 1. Guard
    if !state.is_running() {
        return events;
    }

    let clamped = dt.clamp(Fixed::ZERO, config.max_delta);
    if clamped != dt {
        debug!(requested = %dt, used = %clamped, "Delta time clamped");
    }
    let dt = clamped;

    // 2. Clock
    state.match_time += dt;

    // 3. Waves
    run_wave_scheduler(state, config, dt, &mut events);

    // 4. Income
    run_income(state, config, dt);

    // 5. Middle Control
    run_middle_control(state, config, dt);

    // 6. Hero Cleanup
    for side in &mut state.factions {
        if side.active_hero.as_ref().is_some_and(|hero| hero.is_dead) {
            side.active_hero = None;
        }
    }

    // 7. Policies
    for faction in Faction::ALL {
        for policy in policies.iter_mut().filter(|p| p.faction() == faction) {
            let mut commands = FactionCommands::new(state, config, faction, &mut events);
            policy.decide(&mut commands);
        }
    }

    // 8. Movement
    run_movement(state, config, dt, &mut events);

    // 9. Combat
    run_combat(state, config, &mut events);

    // 10. Towers
    run_tower_attacks(state, config, &mut events);

    // 11. Fortresses
    run_building_attacks(state, config, &mut events);

    // 12. Removal
    remove_dead(state, config, &mut events);

    // 13. Victory
    check_victory(state, &mut events);

    events
}

fn remove_dead(state: &mut MatchState, config: &MatchConfig, events: &mut TickEvents) {
    for side in &mut state.factions {
        side.units.retain(|u| u.is_alive());
    }

    for faction in Faction::ALL {
        let side = state.faction_mut(faction);
        let (fallen, standing): (Vec<_>, Vec<_>) =
            side.towers.drain(..).partition(|tower| tower.is_dead);
        side.towers = standing;

        for tower in fallen {
            let destroyer = state.faction_mut(faction.opponent());
            destroyer.earn(config.tower_destroy_reward);
            destroyer.statistics.towers_destroyed += 1;
            debug!(%faction, lane = ?tower.lane, id = tower.id, "Tower destroyed");
            events.push(GameEvent::TowerDestroyed {
                tower: tower.id,
                faction,
                lane: tower.lane,
                reward: config.tower_destroy_reward,
            });
        }
    }
}

fn check_victory(state: &mut MatchState, events: &mut TickEvents) {
    let Some(loser) = Faction::ALL
        .into_iter()
        .find(|f| state.faction(*f).building.health <= 0)
    else {
        return;
    };

    let winner = loser.opponent();
    state.faction_mut(loser).building.is_dead = true;
    state.winner = Some(winner);
    state.is_game_over = true;
    info!(%winner, match_time = %state.match_time, "Match ended");
    events.push(GameEvent::MatchEnded { winner });
}

/// A match together with its balance constants and installed policies.
///
/// This is the surface a game loop or the headless runner drives: call
/// [`advance`](Self::advance) with each frame's Δt and issue player
/// commands between ticks.
pub struct Simulation {
    config: MatchConfig,
    state: MatchState,
    policies: Vec<Box<dyn DecisionPolicy>>,
}

impl Simulation {
    /// Create a match with the default balance and no policies.
    ///
    /// # Example
    ///
    /// ```
    /// use lane_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new();
    /// assert!(sim.state().is_running());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    /// Create a match with custom balance constants.
    #[must_use]
    pub fn with_config(config: MatchConfig) -> Self {
        let state = create_initial_state(&config);
        Self {
            config,
            state,
            policies: Vec::new(),
        }
    }

    /// Install a decision policy for its faction.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn DecisionPolicy>) -> Self {
        self.policies.push(policy);
        self
    }

    /// Advance the match by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: Fixed) -> TickEvents {
        advance(&mut self.state, &self.config, dt, &mut self.policies)
    }

    /// Hire a formation slot for `faction`.
    ///
    /// # Errors
    ///
    /// See [`hire_unit`].
    pub fn hire_unit(
        &mut self,
        unit_type: UnitType,
        faction: Faction,
        lane: Lane,
    ) -> Result<GameEvent, CommandError> {
        hire_unit(&mut self.state, unit_type, faction, lane)
    }

    /// Upgrade `faction`'s tech tier.
    ///
    /// # Errors
    ///
    /// See [`upgrade_tech_tier`].
    pub fn upgrade_tech_tier(&mut self, faction: Faction) -> Result<GameEvent, CommandError> {
        upgrade_tech_tier(&mut self.state, &self.config, faction)
    }

    /// Buy a gold mine for `faction`.
    ///
    /// # Errors
    ///
    /// See [`purchase_gold_mine`].
    pub fn purchase_gold_mine(&mut self, faction: Faction) -> Result<GameEvent, CommandError> {
        purchase_gold_mine(&mut self.state, &self.config, faction)
    }

    /// Suspend ticks.
    pub fn pause(&mut self) {
        self.state.is_paused = true;
    }

    /// Resume ticks.
    pub fn resume(&mut self) {
        self.state.is_paused = false;
    }

    /// Current match state.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Mutable match state, for scenario setup and tooling.
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    /// Balance constants of this match.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Hash of the current state, for replay comparison.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        self.state.state_hash()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("match_time", &self.state.match_time)
            .field("winner", &self.state.winner)
            .field("policies", &self.policies.len())
            .finish_non_exhaustive()
    }
}
