//! # Lane Core
//!
//! Deterministic battle simulation for Lane Conquest, a two-lane
//! lane-pusher between a human and an undead faction.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No audio
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! Presentation layers read [`state::MatchState`] each frame and react to
//! the [`events::TickEvents`] every tick returns.
//!
//! ## Crate Structure
//!
//! - [`simulation`] - Match controller and the top-level tick
//! - [`state`] - Match, faction and formation state
//! - [`units`] / [`hero`] / [`structures`] - Entity model
//! - [`damage`] - Attack-type versus armor-type table
//! - [`movement`] / [`combat`] / [`defenses`] - Per-tick resolvers
//! - [`spawning`] / [`economy`] / [`tech`] - Waves, gold and tiers
//! - [`policy`] / [`ai`] - Decision policies for computer factions
//! - [`config`] - Balance constants
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod combat;
pub mod config;
pub mod damage;
pub mod defenses;
pub mod economy;
pub mod error;
pub mod events;
pub mod factions;
pub mod hero;
pub mod math;
pub mod movement;
pub mod policy;
pub mod simulation;
pub mod spawning;
pub mod state;
pub mod structures;
pub mod tech;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ai::LegionAi;
    pub use crate::config::{DamageModel, MatchConfig};
    pub use crate::damage::{calculate_damage, ArmorType, AttackType};
    pub use crate::error::{CommandError, GameError, Result};
    pub use crate::events::{Attacker, GameEvent, TickEvents};
    pub use crate::factions::{Faction, Lane};
    pub use crate::hero::{Hero, HeroType};
    pub use crate::math::Fixed;
    pub use crate::policy::{DecisionPolicy, FactionCommands};
    pub use crate::simulation::{advance, Simulation};
    pub use crate::state::{create_initial_state, FactionState, FormationSlot, MatchState};
    pub use crate::units::{TargetRef, Unit, UnitId, UnitType};
}
