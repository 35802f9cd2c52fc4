//! Static defenses: lane towers and faction fortresses.

use serde::{Deserialize, Serialize};

use crate::config::StructureStats;
use crate::damage::{ArmorType, AttackType};
use crate::factions::{Faction, Lane};
use crate::math::{cooldown_ready, fixed_serde, Fixed};
use crate::units::UnitId;

/// A lane tower. Two per faction, one per lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Unique identifier, drawn from the same counter as units.
    pub id: UnitId,
    /// Owning faction.
    pub faction: Faction,
    /// Lane the tower guards.
    pub lane: Lane,
    /// Absolute lane coordinate.
    #[serde(with = "fixed_serde")]
    pub position: Fixed,
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Damage per shot.
    pub attack: i32,
    /// Shots per second.
    #[serde(with = "fixed_serde")]
    pub attack_speed: Fixed,
    /// Reach in lane units.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Match time of the last shot.
    #[serde(with = "fixed_serde")]
    pub last_attack_time: Fixed,
    /// Set when health reaches zero; the tower is removed at end of tick.
    pub is_dead: bool,
}

impl Tower {
    /// Towers shoot arrows.
    pub const ATTACK_TYPE: AttackType = AttackType::Pierce;
    /// Towers are fortified.
    pub const ARMOR_TYPE: ArmorType = ArmorType::Fortified;

    /// Build a full-health tower.
    #[must_use]
    pub fn new(id: UnitId, faction: Faction, lane: Lane, position: Fixed, stats: &StructureStats) -> Self {
        Self {
            id,
            faction,
            lane,
            position,
            health: stats.health,
            max_health: stats.health,
            attack: stats.attack,
            attack_speed: stats.attack_speed,
            range: stats.range,
            last_attack_time: Fixed::ZERO,
            is_dead: false,
        }
    }

    /// Whether the tower can shoot at `now`.
    #[must_use]
    pub fn ready(&self, now: Fixed) -> bool {
        cooldown_ready(now, self.last_attack_time, self.attack_speed)
    }

    /// Apply damage. Returns `true` if this hit destroyed the tower.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.health -= damage;
        if self.health <= 0 && !self.is_dead {
            self.is_dead = true;
            return true;
        }
        false
    }
}

/// A faction fortress, anchored at its faction's end of both lanes.
///
/// Health reaching zero ends the match. `is_dead` is only set by the
/// win check so the building keeps defending for the rest of the tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Owning faction.
    pub faction: Faction,
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Damage per shot.
    pub attack: i32,
    /// Shots per second.
    #[serde(with = "fixed_serde")]
    pub attack_speed: Fixed,
    /// Reach measured from the building's end of the lane.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Match time of the last shot.
    #[serde(with = "fixed_serde")]
    pub last_attack_time: Fixed,
    /// Set when the match is decided against this building.
    pub is_dead: bool,
}

impl Building {
    /// Buildings cast magic.
    pub const ATTACK_TYPE: AttackType = AttackType::Magic;
    /// Buildings are fortified.
    pub const ARMOR_TYPE: ArmorType = ArmorType::Fortified;

    /// Build a full-health fortress.
    #[must_use]
    pub fn new(faction: Faction, stats: &StructureStats) -> Self {
        Self {
            faction,
            health: stats.health,
            max_health: stats.health,
            attack: stats.attack,
            attack_speed: stats.attack_speed,
            range: stats.range,
            last_attack_time: Fixed::ZERO,
            is_dead: false,
        }
    }

    /// Whether the building can shoot at `now`.
    #[must_use]
    pub fn ready(&self, now: Fixed) -> bool {
        cooldown_ready(now, self.last_attack_time, self.attack_speed)
    }

    /// Whether a lane position lies within the building's reach.
    #[must_use]
    pub fn covers(&self, position: Fixed) -> bool {
        match self.faction {
            Faction::Human => position <= self.range,
            Faction::Undead => position >= self.faction.base_position() - self.range,
        }
    }
}
