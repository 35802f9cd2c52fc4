//! Hero progression.
//!
//! Each faction owns exactly one [`Hero`] record for the whole match.
//! The record holds leveling state (level, XP, scaled max health and
//! attack) and survives the deaths of the hero units that are spawned
//! from it. Live health belongs to the hero unit on the field.

use serde::{Deserialize, Serialize};

use crate::damage::{ArmorType, AttackType};
use crate::factions::{Faction, Lane};
use crate::math::{fixed_serde, option_fixed_serde, ratio, Fixed};
use crate::units::{HeroTag, Unit, UnitId, UnitRole};

/// Available heroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroType {
    /// Human hero.
    Paladin,
    /// Undead hero.
    DeathKnight,
}

/// Base statistics and per-level growth of a hero type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroStats {
    /// Level 1 max health.
    pub base_health: i32,
    /// Level 1 attack.
    pub base_attack: i32,
    /// Attacks per second.
    pub attack_speed: Fixed,
    /// Max health gained per level.
    pub health_per_level: i32,
    /// Attack gained per level.
    pub attack_per_level: i32,
    /// Lane units per second.
    pub move_speed: Fixed,
    /// Attack range.
    pub range: Fixed,
}

impl HeroType {
    /// The hero that fights for a faction.
    #[must_use]
    pub const fn for_faction(faction: Faction) -> Self {
        match faction {
            Faction::Human => Self::Paladin,
            Faction::Undead => Self::DeathKnight,
        }
    }

    /// Base statistics for this hero.
    #[must_use]
    pub fn stats(self) -> HeroStats {
        match self {
            Self::Paladin => HeroStats {
                base_health: 500,
                base_attack: 25,
                attack_speed: ratio(10, 10),
                health_per_level: 50,
                attack_per_level: 3,
                move_speed: ratio(4, 1),
                range: ratio(2, 1),
            },
            Self::DeathKnight => HeroStats {
                base_health: 450,
                base_attack: 30,
                attack_speed: ratio(11, 10),
                health_per_level: 45,
                attack_per_level: 4,
                move_speed: ratio(4, 1),
                range: ratio(2, 1),
            },
        }
    }

    /// Signature ability of this hero.
    #[must_use]
    pub fn ability(self) -> HeroAbility {
        match self {
            Self::Paladin => HeroAbility {
                kind: AbilityKind::Heal,
                name: "Divine Heal".to_string(),
                cooldown: Fixed::from_num(20),
                last_used: Fixed::from_num(-20),
                description: "Heal nearby friendly units".to_string(),
            },
            Self::DeathKnight => HeroAbility {
                kind: AbilityKind::Damage,
                name: "Death Coil".to_string(),
                cooldown: Fixed::from_num(15),
                last_used: Fixed::from_num(-15),
                description: "Deal massive damage to target".to_string(),
            },
        }
    }
}

/// Ability category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Restores friendly health.
    Heal,
    /// Deals direct damage.
    Damage,
    /// Temporarily improves stats.
    Buff,
}

/// Descriptive ability data carried by a hero.
///
/// The simulation does not cast abilities; the data is exposed for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroAbility {
    /// Category.
    pub kind: AbilityKind,
    /// Display name.
    pub name: String,
    /// Seconds between casts.
    #[serde(with = "fixed_serde")]
    pub cooldown: Fixed,
    /// Match time of the last cast.
    #[serde(with = "fixed_serde")]
    pub last_used: Fixed,
    /// Tooltip text.
    pub description: String,
}

/// A single level gained during an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    /// New level.
    pub level: u32,
    /// New max health.
    pub max_health: i32,
    /// New attack.
    pub attack: i32,
}

/// Persistent per-faction hero record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Which hero.
    pub hero_type: HeroType,
    /// Owning faction.
    pub faction: Faction,
    /// Current level, starting at 1.
    pub level: u32,
    /// XP toward the next level.
    pub xp: u32,
    /// Max health at the current level.
    pub max_health: i32,
    /// Attack at the current level.
    pub attack: i32,
    /// Attacks per second.
    #[serde(with = "fixed_serde")]
    pub attack_speed: Fixed,
    /// Abilities.
    pub abilities: Vec<HeroAbility>,
    /// Earliest match time the hero may respawn, when a respawn delay is configured.
    #[serde(with = "option_fixed_serde")]
    pub respawn_ready_at: Option<Fixed>,
}

impl Hero {
    /// Create a level 1 hero for a faction.
    #[must_use]
    pub fn new(faction: Faction) -> Self {
        let hero_type = HeroType::for_faction(faction);
        let stats = hero_type.stats();
        Self {
            hero_type,
            faction,
            level: 1,
            xp: 0,
            max_health: stats.base_health,
            attack: stats.base_attack,
            attack_speed: stats.attack_speed,
            abilities: vec![hero_type.ability()],
            respawn_ready_at: None,
        }
    }

    /// Add XP and apply every level-up it pays for.
    ///
    /// Levels stop at `max_level`; XP beyond that keeps accumulating.
    /// Returns the levels gained, in order.
    pub fn award_xp(&mut self, amount: u32, xp_per_level: u32, max_level: u32) -> Vec<LevelUp> {
        self.xp = self.xp.saturating_add(amount);
        let stats = self.hero_type.stats();
        let mut gained = Vec::new();

        while xp_per_level > 0 && self.xp >= xp_per_level && self.level < max_level {
            self.xp -= xp_per_level;
            self.level += 1;
            self.max_health += stats.health_per_level;
            self.attack += stats.attack_per_level;
            gained.push(LevelUp {
                level: self.level,
                max_health: self.max_health,
                attack: self.attack,
            });
        }

        gained
    }

    /// Instantiate a hero unit from the current record.
    #[must_use]
    pub fn spawn_unit(&self, id: UnitId, lane: Lane, position: Fixed) -> Unit {
        let stats = self.hero_type.stats();
        Unit {
            id,
            role: UnitRole::Hero(HeroTag {
                hero_type: self.hero_type,
                level: self.level,
            }),
            faction: self.faction,
            lane,
            position,
            health: self.max_health,
            max_health: self.max_health,
            attack: self.attack,
            attack_speed: self.attack_speed,
            move_speed: stats.move_speed,
            range: stats.range,
            attack_type: AttackType::Hero,
            armor_type: ArmorType::Heavy,
            last_attack_time: Fixed::ZERO,
            target: None,
            is_dead: false,
        }
    }

    /// Whether the hero may respawn at `now`.
    #[must_use]
    pub fn can_respawn(&self, now: Fixed) -> bool {
        self.respawn_ready_at.map_or(true, |ready| now >= ready)
    }
}

/// Bring a live hero unit up to date after level-ups: new stats, full heal.
pub fn apply_level_up(unit: &mut Unit, level_up: &LevelUp) {
    unit.max_health = level_up.max_health;
    unit.health = level_up.max_health;
    unit.attack = level_up.attack;
    if let Some(tag) = unit.hero_mut() {
        tag.level = level_up.level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_hero_is_level_one() {
        let hero = Hero::new(Faction::Human);
        assert_eq!(hero.hero_type, HeroType::Paladin);
        assert_eq!(hero.level, 1);
        assert_eq!(hero.max_health, 500);
        assert_eq!(hero.attack, 25);
        assert_eq!(hero.abilities.len(), 1);
    }

    #[test]
    fn test_single_level_up() {
        let mut hero = Hero::new(Faction::Undead);
        let gained = hero.award_xp(100, 100, 10);
        assert_eq!(gained.len(), 1);
        assert_eq!(hero.level, 2);
        assert_eq!(hero.xp, 0);
        assert_eq!(hero.max_health, 495);
        assert_eq!(hero.attack, 34);
    }

    #[test]
    fn test_multi_level_up_in_one_award() {
        let mut hero = Hero::new(Faction::Human);
        let gained = hero.award_xp(350, 100, 10);
        assert_eq!(gained.len(), 3);
        assert_eq!(hero.level, 4);
        assert_eq!(hero.xp, 50);
        assert_eq!(gained[2].max_health, 650);
    }

    #[test]
    fn test_level_cap() {
        let mut hero = Hero::new(Faction::Human);
        hero.award_xp(5000, 100, 10);
        assert_eq!(hero.level, 10);
        assert_eq!(hero.xp, 4100);
        assert!(hero.award_xp(100, 100, 10).is_empty());
    }

    #[test]
    fn test_spawned_unit_carries_record_stats() {
        let mut hero = Hero::new(Faction::Human);
        hero.award_xp(100, 100, 10);
        let unit = hero.spawn_unit(7, Lane::Bottom, Fixed::from_num(10));
        assert_eq!(unit.health, 550);
        assert_eq!(unit.attack, 28);
        assert_eq!(unit.hero().map(|t| t.level), Some(2));
    }

    #[test]
    fn test_apply_level_up_heals() {
        let mut hero = Hero::new(Faction::Undead);
        let mut unit = hero.spawn_unit(1, Lane::Top, Fixed::from_num(90));
        unit.health = 12;
        for level_up in hero.award_xp(100, 100, 10) {
            apply_level_up(&mut unit, &level_up);
        }
        assert_eq!(unit.health, unit.max_health);
        assert_eq!(unit.max_health, 495);
    }

    #[test]
    fn test_respawn_gate() {
        let mut hero = Hero::new(Faction::Human);
        assert!(hero.can_respawn(Fixed::ZERO));
        hero.respawn_ready_at = Some(Fixed::from_num(30));
        assert!(!hero.can_respawn(Fixed::from_num(29)));
        assert!(hero.can_respawn(Fixed::from_num(30)));
    }
}
