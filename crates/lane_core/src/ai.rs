//! Built-in computer opponent.
//!
//! [`LegionAi`] upgrades tech on a schedule, reinforces whichever lane
//! the enemy is pushing harder, and shifts its unit mix from cheap melee
//! early to a weighted mix and finally to the heaviest units it can buy.
//! All randomness comes from a seeded generator owned by the policy, so
//! identical seeds replay identical matches.

use tracing::{debug, trace};

use crate::factions::{Faction, Lane};
use crate::math::Fixed;
use crate::policy::{DecisionPolicy, FactionCommands};
use crate::state::FactionState;
use crate::tech::MAX_TECH_TIER;
use crate::units::{UnitClass, UnitType};

/// Seconds between decisions.
pub const DECISION_INTERVAL: i32 = 2;
/// Gold kept back from unit purchases.
pub const GOLD_RESERVE: i32 = 50;
/// Smallest spendable amount worth acting on.
pub const MIN_SPEND: i32 = 50;

/// Simple deterministic RNG for decision making.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiRng {
    state: u64,
}

impl AiRng {
    /// Seed a generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(0x5_DEEC_E66D).wrapping_add(11);
        self.state >> 16
    }

    /// Uniform value in `0..bound`. `bound` must be positive.
    pub fn below(&mut self, bound: u32) -> u32 {
        (self.next() % u64::from(bound.max(1))) as u32
    }

    /// Fair coin.
    pub fn coin(&mut self) -> bool {
        self.below(2) == 0
    }
}

/// Per-match memory of a [`LegionAi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiContext {
    /// Match time of the last decision.
    pub last_decision_time: Fixed,
    /// Decision randomness.
    pub rng: AiRng,
}

impl AiContext {
    /// Fresh context for a new match.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            last_decision_time: Fixed::ZERO,
            rng: AiRng::new(seed),
        }
    }
}

/// Match phase, by elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Before two minutes: cheap melee.
    Early,
    /// Before five minutes: weighted mix.
    Mid,
    /// Heaviest affordable units.
    Late,
}

impl Phase {
    fn at(match_time: Fixed) -> Self {
        if match_time < Fixed::from_num(120) {
            Self::Early
        } else if match_time < Fixed::from_num(300) {
            Self::Mid
        } else {
            Self::Late
        }
    }
}

/// Lane-pusher AI usable by either faction.
#[derive(Debug, Clone)]
pub struct LegionAi {
    faction: Faction,
    context: AiContext,
}

impl LegionAi {
    /// Create an AI for `faction` with a decision seed.
    #[must_use]
    pub fn new(faction: Faction, seed: u64) -> Self {
        Self {
            faction,
            context: AiContext::new(seed),
        }
    }

    /// The AI's per-match memory.
    #[must_use]
    pub fn context(&self) -> &AiContext {
        &self.context
    }

    fn wants_upgrade(own: &FactionState, match_time: Fixed) -> bool {
        match own.tech_tier {
            1 => own.gold >= Fixed::from_num(250) && match_time > Fixed::from_num(60),
            2 => own.gold >= Fixed::from_num(500) && match_time > Fixed::from_num(180),
            _ => false,
        }
    }

    fn pick_lane(&mut self, own: &FactionState, enemy: &FactionState) -> Lane {
        let count = |side: &FactionState, lane: Lane| {
            side.units
                .iter()
                .filter(|u| u.is_alive() && u.lane == lane)
                .count() as i64
        };
        let pressure = |lane: Lane| count(enemy, lane) - count(own, lane);

        match pressure(Lane::Top).cmp(&pressure(Lane::Bottom)) {
            std::cmp::Ordering::Greater => Lane::Top,
            std::cmp::Ordering::Less => Lane::Bottom,
            std::cmp::Ordering::Equal => {
                if self.context.rng.coin() {
                    Lane::Top
                } else {
                    Lane::Bottom
                }
            }
        }
    }

    fn weight(unit_type: UnitType) -> u32 {
        let stats = unit_type.stats();
        match (stats.tier_required, stats.class) {
            (1, UnitClass::Ranged) => 3,
            (1 | 2, UnitClass::Melee) => 2,
            _ => 1,
        }
    }

    fn choose_unit(&mut self, tech_tier: u8, spendable: Fixed, match_time: Fixed) -> Option<UnitType> {
        let affordable: Vec<UnitType> = UnitType::roster(self.faction)
            .filter(|t| t.stats().tier_required <= tech_tier && t.cost() <= spendable)
            .collect();
        if affordable.is_empty() {
            return None;
        }

        match Phase::at(match_time) {
            Phase::Early => affordable
                .iter()
                .copied()
                .find(|t| t.stats().class == UnitClass::Melee && t.stats().tier_required == 1)
                .or_else(|| affordable.first().copied()),
            Phase::Mid => {
                let total: u32 = affordable.iter().map(|t| Self::weight(*t)).sum();
                let mut roll = self.context.rng.below(total);
                affordable.iter().copied().find(|t| {
                    let w = Self::weight(*t);
                    if roll < w {
                        true
                    } else {
                        roll -= w;
                        false
                    }
                })
            }
            Phase::Late => [UnitClass::Siege, UnitClass::Melee, UnitClass::Caster]
                .iter()
                .find_map(|class| {
                    affordable
                        .iter()
                        .copied()
                        .filter(|t| t.stats().class == *class)
                        .max_by_key(|t| t.stats().tier_required)
                        .filter(|t| t.stats().tier_required >= 2)
                })
                .or_else(|| affordable.last().copied()),
        }
    }
}

impl DecisionPolicy for LegionAi {
    fn faction(&self) -> Faction {
        self.faction
    }

    fn decide(&mut self, commands: &mut FactionCommands<'_>) {
        let now = commands.state().match_time;
        if now - self.context.last_decision_time < Fixed::from_num(DECISION_INTERVAL) {
            return;
        }
        self.context.last_decision_time = now;

        if commands.own().tech_tier < MAX_TECH_TIER && Self::wants_upgrade(commands.own(), now) {
            if let Err(err) = commands.upgrade_tech_tier() {
                debug!(faction = %self.faction, ?err, "AI upgrade rejected");
            }
        }

        let spendable = commands.own().gold - Fixed::from_num(GOLD_RESERVE);
        if spendable < Fixed::from_num(MIN_SPEND) {
            return;
        }

        let lane = self.pick_lane(commands.own(), commands.enemy());
        let tier = commands.own().tech_tier;
        let Some(unit_type) = self.choose_unit(tier, spendable, now) else {
            return;
        };
        trace!(faction = %self.faction, unit = unit_type.name(), ?lane, "AI hiring");
        if let Err(err) = commands.hire_unit(unit_type, lane) {
            debug!(faction = %self.faction, ?err, "AI hire rejected");
        }
    }
}
