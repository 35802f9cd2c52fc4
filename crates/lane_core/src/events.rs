//! Discrete events emitted by ticks and commands.
//!
//! The core never calls into rendering or audio. Each tick returns the
//! ordered list of what happened, and presentation layers react to it.

use crate::factions::{Faction, Lane};
use crate::hero::HeroType;
use crate::math::Fixed;
use crate::units::{AttackStyle, TargetRef, UnitId, UnitType};

/// Source of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attacker {
    /// A regular or hero unit.
    Unit(UnitId),
    /// A lane tower.
    Tower(UnitId),
    /// A faction fortress.
    Building(Faction),
}

/// Something observable that happened during a tick or command.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A formation slot produced a unit.
    UnitSpawned {
        /// New unit.
        unit: UnitId,
        /// Its type.
        unit_type: UnitType,
        /// Owning faction.
        faction: Faction,
        /// Lane it walks.
        lane: Lane,
    },
    /// A hero unit entered the field.
    HeroSpawned {
        /// New hero unit.
        unit: UnitId,
        /// Which hero.
        hero_type: HeroType,
        /// Owning faction.
        faction: Faction,
        /// Lane it walks.
        lane: Lane,
        /// Level carried over from the hero record.
        level: u32,
    },
    /// An attack hit a unit or tower.
    AttackLanded {
        /// Who attacked.
        attacker: Attacker,
        /// Faction credited with the damage.
        faction: Faction,
        /// What was hit.
        target: TargetRef,
        /// Health removed.
        damage: i32,
        /// Visual style.
        style: AttackStyle,
    },
    /// A unit struck the enemy fortress.
    BuildingHit {
        /// Attacking unit.
        attacker: UnitId,
        /// Owner of the fortress that was hit.
        building: Faction,
        /// Health removed.
        damage: i32,
    },
    /// A unit or hero unit died.
    UnitDied {
        /// Dead unit.
        unit: UnitId,
        /// Its faction.
        faction: Faction,
        /// What killed it.
        killer: Attacker,
        /// Whether it was a hero.
        hero: bool,
    },
    /// A tower was removed and its destroyer paid.
    TowerDestroyed {
        /// Removed tower.
        tower: UnitId,
        /// Faction that lost it.
        faction: Faction,
        /// Lane it guarded.
        lane: Lane,
        /// Gold paid to the opponent.
        reward: Fixed,
    },
    /// A faction's hero gained a level.
    HeroLevelUp {
        /// Hero owner.
        faction: Faction,
        /// New level.
        level: u32,
    },
    /// A fortress fell.
    MatchEnded {
        /// Winning faction.
        winner: Faction,
    },
    /// A formation slot was bought.
    UnitHired {
        /// Buyer.
        faction: Faction,
        /// Slot unit type.
        unit_type: UnitType,
        /// Slot lane.
        lane: Lane,
        /// Gold paid.
        cost: Fixed,
    },
    /// A faction moved up a tech tier.
    TierUpgraded {
        /// Upgrading faction.
        faction: Faction,
        /// New tier.
        tier: u8,
        /// Gold paid.
        cost: Fixed,
    },
    /// A faction bought a gold mine.
    GoldMinePurchased {
        /// Buyer.
        faction: Faction,
        /// Mines owned after the purchase.
        mines: u32,
        /// Gold paid.
        cost: Fixed,
    },
}

/// Events generated during one tick, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// Ordered event list.
    pub events: Vec<GameEvent>,
}

impl TickEvents {
    /// Append an event.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Iterate over the events.
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total damage dealt by a faction this tick.
    #[must_use]
    pub fn damage_by(&self, faction: Faction) -> i64 {
        self.iter()
            .map(|event| match *event {
                GameEvent::AttackLanded { faction: f, damage, .. } if f == faction => {
                    i64::from(damage)
                }
                GameEvent::BuildingHit { building, damage, .. } if building != faction => {
                    i64::from(damage)
                }
                _ => 0,
            })
            .sum()
    }

    /// Units that died this tick.
    pub fn deaths(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.iter().filter_map(|event| match *event {
            GameEvent::UnitDied { unit, .. } => Some(unit),
            _ => None,
        })
    }

    /// Winner, if the match ended this tick.
    #[must_use]
    pub fn winner(&self) -> Option<Faction> {
        self.iter().find_map(|event| match *event {
            GameEvent::MatchEnded { winner } => Some(winner),
            _ => None,
        })
    }
}

impl Extend<GameEvent> for TickEvents {
    fn extend<T: IntoIterator<Item = GameEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}
