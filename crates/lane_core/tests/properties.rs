//! Property tests over arbitrary command and Δt sequences.

use lane_core::factions::{Faction, Lane};
use lane_core::math::Fixed;
use lane_core::simulation::Simulation;
use lane_core::units::UnitType;
use lane_test_utils::determinism::strategies::{arb_commands, arb_delta, Command};
use lane_test_utils::determinism::{find_first_divergence, verify_simulation_determinism};
use lane_test_utils::fixtures::{ai_match, coarse_config, exact_step, place_unit};
use lane_test_utils::proptest::prelude::*;

fn apply(sim: &mut Simulation, command: Command) -> bool {
    match command {
        Command::Hire(unit_type, faction, lane) => sim.hire_unit(unit_type, faction, lane).is_ok(),
        Command::Upgrade(faction) => sim.upgrade_tech_tier(faction).is_ok(),
        Command::BuyMine(faction) => sim.purchase_gold_mine(faction).is_ok(),
        Command::Wait(sixteenths) => {
            sim.advance(Fixed::from_num(sixteenths) / 16);
            true
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn gold_never_goes_negative(commands in arb_commands(120)) {
        let mut sim = Simulation::with_config(coarse_config());
        for command in commands {
            apply(&mut sim, command);
            for side in &sim.state().factions {
                prop_assert!(side.gold >= Fixed::ZERO, "{} gold {}", side.faction, side.gold);
            }
        }
    }

    #[test]
    fn rejected_commands_leave_state_untouched(commands in arb_commands(80)) {
        let mut sim = Simulation::with_config(coarse_config());
        for command in commands {
            if matches!(command, Command::Wait(_)) {
                apply(&mut sim, command);
                continue;
            }
            let before = sim.state().clone();
            if !apply(&mut sim, command) {
                prop_assert_eq!(sim.state(), &before);
            }
        }
    }

    #[test]
    fn middle_control_stays_clamped(
        humans in 0usize..6,
        undead in 0usize..6,
        deltas in prop::collection::vec(arb_delta(), 1..200),
    ) {
        let mut sim = Simulation::with_config(coarse_config());
        let limit = Fixed::from_num(100);
        {
            let state = sim.state_mut();
            for i in 0..humans {
                place_unit(state, UnitType::Footman, Lane::Top, 45 + i as i32);
            }
            for i in 0..undead {
                place_unit(state, UnitType::Zombie, Lane::Bottom, 55 - i as i32);
            }
        }
        for dt in deltas {
            sim.advance(dt);
            let progress = sim.state().middle_control_progress;
            prop_assert!(progress >= -limit && progress <= limit);
            let holder = sim.state().middle_control_faction;
            prop_assert_eq!(holder == Some(Faction::Human), progress == limit);
            prop_assert_eq!(holder == Some(Faction::Undead), progress == -limit);
        }
    }

    #[test]
    fn replays_are_identical(seed in any::<u64>(), deltas in prop::collection::vec(arb_delta(), 1..300)) {
        let run = || {
            let mut sim = ai_match(seed);
            for dt in &deltas {
                sim.advance(*dt);
            }
            sim.state_hash()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn ai_matches_never_diverge(seed in any::<u64>(), steps in 1u64..400) {
        prop_assert_eq!(find_first_divergence(|| ai_match(seed), exact_step(), steps), None);
        prop_assert!(verify_simulation_determinism(|| ai_match(seed), exact_step(), steps));
    }

    #[test]
    fn finished_matches_ignore_time(winner_side in 0usize..2, deltas in prop::collection::vec(arb_delta(), 1..50)) {
        let mut sim = ai_match(3);
        let loser = Faction::ALL[winner_side].opponent();
        sim.state_mut().faction_mut(loser).building.health = 0;
        sim.advance(Fixed::from_num(1) / 16);
        prop_assert_eq!(sim.state().winner, Some(Faction::ALL[winner_side]));

        let frozen = sim.state().clone();
        for dt in deltas {
            prop_assert!(sim.advance(dt).is_empty());
        }
        prop_assert_eq!(sim.state(), &frozen);
    }
}
