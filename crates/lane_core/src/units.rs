//! Unit definitions: the hireable roster and live lane combatants.
//!
//! Regular units and hero units share one [`Unit`] struct. The
//! [`UnitRole`] tag carries the hero-only fields, so code that cares
//! about heroes matches on the role and everything else treats all
//! combatants alike.

use serde::{Deserialize, Serialize};

use crate::damage::{ArmorType, AttackType};
use crate::factions::{Faction, Lane};
use crate::hero::HeroType;
use crate::math::{fixed_serde, ratio, Fixed};

/// Unique identifier for units and towers.
pub type UnitId = u64;

/// Hireable unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    // Human roster
    /// Tier 1 human melee infantry.
    Footman,
    /// Tier 1 human ranged unit.
    Archer,
    /// Tier 2 human heavy cavalry.
    Knight,
    /// Tier 2 human caster.
    Priest,
    /// Tier 3 human siege engine.
    Ballista,

    // Undead roster
    /// Tier 1 undead melee infantry.
    Zombie,
    /// Tier 1 undead ranged unit.
    Skeleton,
    /// Tier 2 undead fast melee.
    Ghoul,
    /// Tier 2 undead caster.
    Necromancer,
    /// Tier 3 undead siege engine.
    Catapult,
}

/// Combat role used by decision policies to reason about the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// Close-range fighter.
    Melee,
    /// Physical ranged attacker.
    Ranged,
    /// Magic ranged attacker.
    Caster,
    /// Long-range structure breaker.
    Siege,
}

/// Base statistics for a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    /// Maximum health.
    pub health: i32,
    /// Damage per attack.
    pub attack: i32,
    /// Attacks per second.
    pub attack_speed: Fixed,
    /// Lane units per second.
    pub move_speed: Fixed,
    /// Attack range in lane units.
    pub range: Fixed,
    /// Gold cost of hiring a formation slot.
    pub cost: i32,
    /// Tech tier needed to hire.
    pub tier_required: u8,
    /// Damage classification.
    pub attack_type: AttackType,
    /// Armor classification.
    pub armor_type: ArmorType,
    /// Combat role.
    pub class: UnitClass,
}

impl UnitType {
    /// Every hireable unit type.
    pub const ALL: [UnitType; 10] = [
        UnitType::Footman,
        UnitType::Archer,
        UnitType::Knight,
        UnitType::Priest,
        UnitType::Ballista,
        UnitType::Zombie,
        UnitType::Skeleton,
        UnitType::Ghoul,
        UnitType::Necromancer,
        UnitType::Catapult,
    ];

    /// Faction whose roster contains this unit type.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            Self::Footman | Self::Archer | Self::Knight | Self::Priest | Self::Ballista => {
                Faction::Human
            }
            Self::Zombie | Self::Skeleton | Self::Ghoul | Self::Necromancer | Self::Catapult => {
                Faction::Undead
            }
        }
    }

    /// Hireable unit types for a faction, in roster order.
    pub fn roster(faction: Faction) -> impl Iterator<Item = UnitType> {
        Self::ALL.into_iter().filter(move |t| t.faction() == faction)
    }

    /// Base statistics for this unit type.
    #[must_use]
    pub fn stats(self) -> UnitStats {
        let (health, attack, attack_speed, move_speed, range, cost, tier) = match self {
            Self::Footman => (150, 12, ratio(10, 10), ratio(3, 1), ratio(1, 1), 50, 1),
            Self::Archer => (80, 15, ratio(12, 10), ratio(35, 10), ratio(6, 1), 75, 1),
            Self::Knight => (250, 20, ratio(8, 10), ratio(4, 1), ratio(1, 1), 120, 2),
            Self::Priest => (100, 8, ratio(15, 10), ratio(3, 1), ratio(5, 1), 100, 2),
            Self::Ballista => (200, 40, ratio(5, 10), ratio(2, 1), ratio(8, 1), 200, 3),
            Self::Zombie => (180, 10, ratio(9, 10), ratio(25, 10), ratio(1, 1), 50, 1),
            Self::Skeleton => (70, 14, ratio(13, 10), ratio(35, 10), ratio(6, 1), 75, 1),
            Self::Ghoul => (220, 22, ratio(10, 10), ratio(45, 10), ratio(1, 1), 120, 2),
            Self::Necromancer => (90, 18, ratio(12, 10), ratio(3, 1), ratio(5, 1), 100, 2),
            Self::Catapult => (200, 40, ratio(5, 10), ratio(2, 1), ratio(8, 1), 200, 3),
        };

        let (attack_type, armor_type, class) = match self {
            Self::Footman | Self::Knight => (AttackType::Normal, ArmorType::Heavy, UnitClass::Melee),
            Self::Zombie | Self::Ghoul => (AttackType::Normal, ArmorType::Medium, UnitClass::Melee),
            Self::Archer => (AttackType::Pierce, ArmorType::Medium, UnitClass::Ranged),
            Self::Skeleton => (AttackType::Pierce, ArmorType::Light, UnitClass::Ranged),
            Self::Priest | Self::Necromancer => {
                (AttackType::Magic, ArmorType::Unarmored, UnitClass::Caster)
            }
            Self::Ballista | Self::Catapult => {
                (AttackType::Siege, ArmorType::Medium, UnitClass::Siege)
            }
        };

        UnitStats {
            health,
            attack,
            attack_speed,
            move_speed,
            range,
            cost,
            tier_required: tier,
            attack_type,
            armor_type,
            class,
        }
    }

    /// Gold cost as a fixed-point amount.
    #[must_use]
    pub fn cost(self) -> Fixed {
        Fixed::from_num(self.stats().cost)
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Footman => "footman",
            Self::Archer => "archer",
            Self::Knight => "knight",
            Self::Priest => "priest",
            Self::Ballista => "ballista",
            Self::Zombie => "zombie",
            Self::Skeleton => "skeleton",
            Self::Ghoul => "ghoul",
            Self::Necromancer => "necromancer",
            Self::Catapult => "catapult",
        }
    }
}

/// Hero-only data carried by a hero unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroTag {
    /// Which hero this is.
    pub hero_type: HeroType,
    /// Level snapshot, kept in sync with the faction's hero record.
    pub level: u32,
}

/// What kind of combatant a [`Unit`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitRole {
    /// A unit spawned from a formation slot.
    Regular(UnitType),
    /// The faction's hero.
    Hero(HeroTag),
}

/// Something a unit can lock onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    /// An enemy unit (regular or hero).
    Unit(UnitId),
    /// An enemy tower.
    Tower(UnitId),
}

/// Visual style of an attack, for the rendering and audio layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Close-range strike.
    Melee,
    /// Physical projectile.
    Arrow,
    /// Spell projectile.
    Magic,
}

/// A live combatant in a lane.
///
/// `position` is an absolute lane coordinate: 0 is the human fortress,
/// 100 the undead fortress. Human units advance upward, undead units
/// downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Regular unit type or hero tag.
    pub role: UnitRole,
    /// Owning faction.
    pub faction: Faction,
    /// Lane the unit walks.
    pub lane: Lane,
    /// Lane coordinate in `[0, 100]`.
    #[serde(with = "fixed_serde")]
    pub position: Fixed,
    /// Current health. May dip below zero before the death check.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Damage per attack.
    pub attack: i32,
    /// Attacks per second.
    #[serde(with = "fixed_serde")]
    pub attack_speed: Fixed,
    /// Lane units per second.
    #[serde(with = "fixed_serde")]
    pub move_speed: Fixed,
    /// Attack range.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Damage classification.
    pub attack_type: AttackType,
    /// Armor classification.
    pub armor_type: ArmorType,
    /// Match time of the last attack.
    #[serde(with = "fixed_serde")]
    pub last_attack_time: Fixed,
    /// Current attack target, recomputed every tick.
    pub target: Option<TargetRef>,
    /// Set when health reaches zero; the unit is removed at end of tick.
    pub is_dead: bool,
}

impl Unit {
    /// Create a regular unit of the given type at `position`.
    #[must_use]
    pub fn regular(
        id: UnitId,
        unit_type: UnitType,
        faction: Faction,
        lane: Lane,
        position: Fixed,
    ) -> Self {
        let stats = unit_type.stats();
        Self {
            id,
            role: UnitRole::Regular(unit_type),
            faction,
            lane,
            position,
            health: stats.health,
            max_health: stats.health,
            attack: stats.attack,
            attack_speed: stats.attack_speed,
            move_speed: stats.move_speed,
            range: stats.range,
            attack_type: stats.attack_type,
            armor_type: stats.armor_type,
            last_attack_time: Fixed::ZERO,
            target: None,
            is_dead: false,
        }
    }

    /// Whether this unit is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Hero data, if this unit is a hero.
    #[must_use]
    pub const fn hero(&self) -> Option<&HeroTag> {
        match &self.role {
            UnitRole::Hero(tag) => Some(tag),
            UnitRole::Regular(_) => None,
        }
    }

    /// Mutable hero data, if this unit is a hero.
    pub fn hero_mut(&mut self) -> Option<&mut HeroTag> {
        match &mut self.role {
            UnitRole::Hero(tag) => Some(tag),
            UnitRole::Regular(_) => None,
        }
    }

    /// Unit type, if this is a regular unit.
    #[must_use]
    pub const fn unit_type(&self) -> Option<UnitType> {
        match self.role {
            UnitRole::Regular(t) => Some(t),
            UnitRole::Hero(_) => None,
        }
    }

    /// Visual style of this unit's attacks.
    #[must_use]
    pub fn attack_style(&self) -> AttackStyle {
        if self.range <= Fixed::from_num(2) {
            return AttackStyle::Melee;
        }
        match self.unit_type().map(|t| t.stats().class) {
            Some(UnitClass::Ranged | UnitClass::Siege) => AttackStyle::Arrow,
            _ => AttackStyle::Magic,
        }
    }

    /// Apply damage, marking the unit dead at zero health.
    ///
    /// Returns `true` if this hit killed the unit.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.health -= damage;
        if self.health <= 0 && !self.is_dead {
            self.is_dead = true;
            return true;
        }
        false
    }
}
