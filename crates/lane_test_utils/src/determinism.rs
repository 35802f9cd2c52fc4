//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! A match replayed from the same config, commands, Δt sequence and
//! policy seeds must end in a bit-identical state. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: We use fixed-point arithmetic via
//!   [`lane_core::math::Fixed`] throughout.
//!
//! - **Hidden policy state**: AI memory lives in each policy instance,
//!   never in statics, so two matches cannot leak into each other.
//!
//! - **System randomness**: All "random" behavior uses seeded generators.

use lane_core::math::Fixed;
use lane_core::simulation::Simulation;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run a [`Simulation`] twice at a fixed Δt and compare final hashes.
pub fn verify_simulation_determinism<F>(setup_fn: F, dt: Fixed, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |sim| {
            sim.advance(dt);
        },
        Simulation::state_hash,
    )
    .is_deterministic
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// # Returns
///
/// `None` if simulations are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F>(setup_fn: F, dt: Fixed, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        sim1.advance(dt);
        sim2.advance(dt);

        if sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Proptest strategies for simulation testing.
pub mod strategies {
    use lane_core::factions::{Faction, Lane};
    use lane_core::math::Fixed;
    use lane_core::units::UnitType;
    use proptest::prelude::*;

    /// A player command, as issued between ticks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Command {
        /// Hire a formation slot.
        Hire(UnitType, Faction, Lane),
        /// Upgrade tech tier.
        Upgrade(Faction),
        /// Buy a gold mine.
        BuyMine(Faction),
        /// Let time pass, in sixteenths of a second.
        Wait(u8),
    }

    /// Generate a faction.
    pub fn arb_faction() -> impl Strategy<Value = Faction> {
        prop_oneof![Just(Faction::Human), Just(Faction::Undead)]
    }

    /// Generate a lane.
    pub fn arb_lane() -> impl Strategy<Value = Lane> {
        prop_oneof![Just(Lane::Top), Just(Lane::Bottom)]
    }

    /// Generate any unit type, including ones the faction cannot hire.
    pub fn arb_unit_type() -> impl Strategy<Value = UnitType> {
        proptest::sample::select(UnitType::ALL.to_vec())
    }

    /// Generate a Δt in sixteenths of a second, from zero up to two seconds.
    pub fn arb_delta() -> impl Strategy<Value = Fixed> {
        (0i32..=32).prop_map(|n| Fixed::from_num(n) / 16)
    }

    /// Generate a command.
    pub fn arb_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            3 => (arb_unit_type(), arb_faction(), arb_lane())
                .prop_map(|(t, f, l)| Command::Hire(t, f, l)),
            1 => arb_faction().prop_map(Command::Upgrade),
            1 => arb_faction().prop_map(Command::BuyMine),
            3 => (1u8..=32).prop_map(Command::Wait),
        ]
    }

    /// Generate a command sequence.
    pub fn arb_commands(max_len: usize) -> impl Strategy<Value = Vec<Command>> {
        prop::collection::vec(arb_command(), 0..max_len)
    }
}
