//! Single-match runner.
//!
//! Plays one LegionAi-versus-LegionAi match to a result or to the time
//! cap and condenses it into a [`MatchReport`].

use std::path::Path;

use lane_core::ai::LegionAi;
use lane_core::config::MatchConfig;
use lane_core::factions::Faction;
use lane_core::math::Fixed;
use lane_core::simulation::Simulation;
use lane_core::state::FactionState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::HeadlessError;

/// Offset between the two factions' AI seeds.
const UNDEAD_SEED_OFFSET: u64 = 0x5EED;

/// Settings for one headless match.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Balance constants.
    pub match_config: MatchConfig,
    /// AI seed. The undead AI uses a fixed offset from it.
    pub seed: u64,
    /// Game-time cap in minutes. A match still running at the cap is a draw.
    pub max_minutes: u32,
    /// Seconds per tick, clamped by the simulation to `max_delta`.
    pub dt: Fixed,
}

impl Default for RunConfig {
    fn default() -> Self {
        let match_config = MatchConfig::default();
        let dt = match_config.max_delta;
        Self {
            match_config,
            seed: 0,
            max_minutes: 15,
            dt,
        }
    }
}

impl RunConfig {
    /// Build a run configuration from command-line values.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, `dt` is
    /// not positive, or the time cap does not fit the simulation clock.
    pub fn from_args(
        config_path: Option<&Path>,
        seed: u64,
        max_minutes: u32,
        dt_seconds: f64,
    ) -> Result<Self, HeadlessError> {
        let match_config = match config_path {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        let dt = Fixed::checked_from_num(dt_seconds)
            .filter(|dt| *dt > Fixed::ZERO)
            .ok_or_else(|| HeadlessError::InvalidArgument(format!("dt must be positive, got {dt_seconds}")))?;
        if time_cap(max_minutes).is_none() {
            return Err(HeadlessError::InvalidArgument(format!(
                "max minutes {max_minutes} exceeds the simulation clock"
            )));
        }

        Ok(Self {
            match_config,
            seed,
            max_minutes,
            dt,
        })
    }

    /// The same settings with another seed.
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }
}

/// End-of-match summary for one faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionReport {
    /// Which side.
    pub faction: Faction,
    /// Final tech tier.
    pub tech_tier: u8,
    /// Gold left in the treasury.
    pub gold: f64,
    /// Gold mines owned.
    pub gold_mines: u32,
    /// Formation slots hired.
    pub formation_slots: usize,
    /// Enemy units killed.
    pub units_killed: u32,
    /// Total damage dealt.
    pub damage_dealt: i64,
    /// Total gold credited.
    pub gold_earned: f64,
    /// Enemy towers destroyed.
    pub towers_destroyed: u32,
    /// Final hero level.
    pub hero_level: u32,
    /// Fortress health left.
    pub building_health: i32,
}

impl From<&FactionState> for FactionReport {
    fn from(side: &FactionState) -> Self {
        Self {
            faction: side.faction,
            tech_tier: side.tech_tier,
            gold: side.gold.to_num(),
            gold_mines: side.gold_mines,
            formation_slots: side.formation.len(),
            units_killed: side.statistics.units_killed,
            damage_dealt: side.statistics.damage_dealt,
            gold_earned: side.statistics.gold_earned.to_num(),
            towers_destroyed: side.statistics.towers_destroyed,
            hero_level: side.statistics.hero_level,
            building_health: side.building.health,
        }
    }
}

/// Result of one headless match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// AI seed used.
    pub seed: u64,
    /// Winning faction, or `None` for a draw at the time cap.
    pub winner: Option<Faction>,
    /// Game time played, in seconds.
    pub duration_seconds: f64,
    /// Ticks simulated.
    pub ticks: u64,
    /// Human then undead.
    pub factions: Vec<FactionReport>,
    /// Hash of the final state.
    pub state_hash: u64,
}

impl MatchReport {
    /// Whether the match hit the time cap without a winner.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Game-time cap in seconds, or `None` if it overflows [`Fixed`].
fn time_cap(max_minutes: u32) -> Option<Fixed> {
    Fixed::checked_from_num(u64::from(max_minutes) * 60)
}

/// Build the simulation for a run: both factions under LegionAi.
#[must_use]
pub fn build_simulation(config: &RunConfig) -> Simulation {
    Simulation::with_config(config.match_config.clone())
        .with_policy(Box::new(LegionAi::new(Faction::Human, config.seed)))
        .with_policy(Box::new(LegionAi::new(
            Faction::Undead,
            config.seed.wrapping_add(UNDEAD_SEED_OFFSET),
        )))
}

/// Play one match to a result or the time cap.
#[must_use]
pub fn run_match(config: &RunConfig) -> MatchReport {
    let mut sim = build_simulation(config);
    let cap = time_cap(config.max_minutes).unwrap_or(Fixed::MAX);
    let mut ticks = 0u64;

    debug!(seed = config.seed, max_minutes = config.max_minutes, "Match starting");
    while !sim.state().is_game_over && sim.state().match_time < cap {
        sim.advance(config.dt);
        ticks += 1;
    }

    let state = sim.state();
    let report = MatchReport {
        seed: config.seed,
        winner: state.winner,
        duration_seconds: state.match_time.to_num(),
        ticks,
        factions: state.factions.iter().map(FactionReport::from).collect(),
        state_hash: sim.state_hash(),
    };
    info!(
        seed = report.seed,
        winner = ?report.winner,
        duration = report.duration_seconds,
        "Match finished"
    );
    report
}
