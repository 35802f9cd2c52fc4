//! Test fixtures and helpers.
//!
//! Pre-built match states and unit placements for consistent testing.

use fixed::types::I32F32;
use lane_core::ai::LegionAi;
use lane_core::config::MatchConfig;
use lane_core::factions::{Faction, Lane};
use lane_core::simulation::Simulation;
use lane_core::state::MatchState;
use lane_core::units::{TargetRef, Unit, UnitId, UnitType};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// A tick length that is exact in binary fixed-point (1/16 s).
#[must_use]
pub fn exact_step() -> I32F32 {
    I32F32::from_num(1) / 16
}

/// Place a regular unit directly on the field and return its id.
pub fn place_unit(state: &mut MatchState, unit_type: UnitType, lane: Lane, position: i32) -> UnitId {
    let id = state.allocate_id();
    let faction = unit_type.faction();
    let unit = Unit::regular(id, unit_type, faction, lane, fixed(position));
    state.faction_mut(faction).units.push(unit);
    id
}

/// Mutable access to a placed unit.
///
/// # Panics
///
/// Panics if no unit has this id.
pub fn unit_mut(state: &mut MatchState, id: UnitId) -> &mut Unit {
    state.unit_mut(id).expect("fixture unit exists")
}

/// Two units already locked onto each other in the top lane.
///
/// Both share the human unit's attack and attack speed; only health
/// differs. Returns `(human_id, undead_id)`.
pub fn locked_duel(state: &mut MatchState, human_health: i32, undead_health: i32) -> (UnitId, UnitId) {
    let human = place_unit(state, UnitType::Footman, Lane::Top, 50);
    let undead = place_unit(state, UnitType::Zombie, Lane::Top, 51);

    let (attack, attack_speed) = {
        let h = unit_mut(state, human);
        h.health = human_health;
        h.max_health = human_health;
        h.target = Some(TargetRef::Unit(undead));
        (h.attack, h.attack_speed)
    };
    let u = unit_mut(state, undead);
    u.health = undead_health;
    u.max_health = undead_health;
    u.attack = attack;
    u.attack_speed = attack_speed;
    u.target = Some(TargetRef::Unit(human));

    (human, undead)
}

/// A config whose Δt cap accepts a whole second per tick.
#[must_use]
pub fn coarse_config() -> MatchConfig {
    MatchConfig {
        max_delta: fixed(1),
        ..MatchConfig::default()
    }
}

/// An AI-versus-AI match with the given seed.
#[must_use]
pub fn ai_match(seed: u64) -> Simulation {
    Simulation::with_config(coarse_config())
        .with_policy(Box::new(LegionAi::new(Faction::Human, seed)))
        .with_policy(Box::new(LegionAi::new(Faction::Undead, seed.wrapping_add(1))))
}
