//! Match balance configuration.
//!
//! Every tunable constant of a match lives in [`MatchConfig`]. The
//! defaults reproduce the reference balance; a RON file may override
//! any subset of fields:
//!
//! ```ron
//! (
//!     starting_gold: 250.0,
//!     wave_interval: 6.0,
//!     damage_model: ArmorTable,
//! )
//! ```
//!
//! Decimal values are converted to fixed-point once at load time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::damage::{calculate_damage, ArmorType, AttackType};
use crate::error::{GameError, Result};
use crate::math::{decimal_serde, ratio, Fixed, LANE_LENGTH};

/// Seconds a hero waits before respawning when the respawn delay is enabled.
pub const HERO_RESPAWN_TIME: i32 = 30;

/// How attack damage is turned into health loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DamageModel {
    /// Raw attack values, unmodified.
    #[default]
    Flat,
    /// Attack values scaled by the attack-type versus armor-type table.
    ArmorTable,
}

impl DamageModel {
    /// Health removed by one hit of `base` attack.
    #[must_use]
    pub fn damage(self, base: i32, attack: AttackType, armor: ArmorType) -> i32 {
        match self {
            Self::Flat => base.max(0),
            Self::ArmorTable => calculate_damage(base, attack, armor),
        }
    }
}

/// Combat statistics of a tower or fortress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureStats {
    /// Maximum health.
    pub health: i32,
    /// Damage per shot.
    pub attack: i32,
    /// Shots per second.
    #[serde(with = "decimal_serde")]
    pub attack_speed: Fixed,
    /// Reach in lane units.
    #[serde(with = "decimal_serde")]
    pub range: Fixed,
}

/// Balance constants for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Gold each faction starts with.
    #[serde(with = "decimal_serde")]
    pub starting_gold: Fixed,
    /// Passive income per second.
    #[serde(with = "decimal_serde")]
    pub gold_per_second: Fixed,
    /// Extra income per second for the faction holding the middle.
    #[serde(with = "decimal_serde")]
    pub middle_control_bonus: Fixed,
    /// Lower bound of the contested zone.
    #[serde(with = "decimal_serde")]
    pub middle_zone_start: Fixed,
    /// Upper bound of the contested zone.
    #[serde(with = "decimal_serde")]
    pub middle_zone_end: Fixed,
    /// Middle-control progress per second while one side outnumbers the other.
    #[serde(with = "decimal_serde")]
    pub middle_control_speed: Fixed,

    /// Seconds between waves in a lane.
    #[serde(with = "decimal_serde")]
    pub wave_interval: Fixed,
    /// Extra delay before the first bottom-lane wave.
    #[serde(with = "decimal_serde")]
    pub south_lane_delay: Fixed,
    /// Distance from its own base at which a regular unit spawns.
    #[serde(with = "decimal_serde")]
    pub unit_spawn_offset: Fixed,
    /// Distance from its own base at which a hero spawns.
    #[serde(with = "decimal_serde")]
    pub hero_spawn_offset: Fixed,
    /// Distance from the enemy base at which a unit can hit the enemy fortress.
    #[serde(with = "decimal_serde")]
    pub base_attack_reach: Fixed,

    /// Hero XP granted per unit kill.
    pub xp_per_kill: u32,
    /// XP needed per hero level.
    pub xp_per_level: u32,
    /// Highest hero level.
    pub max_hero_level: u32,
    /// Seconds a dead hero waits before it may respawn. Zero disables the delay.
    #[serde(with = "decimal_serde")]
    pub hero_respawn_delay: Fixed,

    /// Cost of upgrading from tier 1 to tier 2.
    #[serde(with = "decimal_serde")]
    pub tier2_cost: Fixed,
    /// Cost of upgrading from tier 2 to tier 3.
    #[serde(with = "decimal_serde")]
    pub tier3_cost: Fixed,

    /// Lane tower stats.
    pub tower: StructureStats,
    /// Distance from its own base at which each tower stands.
    #[serde(with = "decimal_serde")]
    pub tower_offset: Fixed,
    /// Gold paid to the faction that destroys a tower.
    #[serde(with = "decimal_serde")]
    pub tower_destroy_reward: Fixed,
    /// Fortress stats.
    pub building: StructureStats,

    /// Price of the first gold mine.
    #[serde(with = "decimal_serde")]
    pub gold_mine_base_cost: Fixed,
    /// Price growth per mine owned.
    #[serde(with = "decimal_serde")]
    pub gold_mine_cost_multiplier: Fixed,
    /// Income per second per mine.
    #[serde(with = "decimal_serde")]
    pub gold_mine_income: Fixed,
    /// Seconds between mine purchases.
    #[serde(with = "decimal_serde")]
    pub gold_mine_cooldown: Fixed,

    /// Largest Δt a single tick will simulate.
    #[serde(with = "decimal_serde")]
    pub max_delta: Fixed,
    /// Damage resolution.
    pub damage_model: DamageModel,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_gold: Fixed::from_num(100),
            gold_per_second: Fixed::from_num(5),
            middle_control_bonus: Fixed::from_num(3),
            middle_zone_start: Fixed::from_num(45),
            middle_zone_end: Fixed::from_num(55),
            middle_control_speed: Fixed::from_num(5),

            wave_interval: Fixed::from_num(8),
            south_lane_delay: Fixed::from_num(4),
            unit_spawn_offset: Fixed::from_num(5),
            hero_spawn_offset: Fixed::from_num(10),
            base_attack_reach: Fixed::from_num(5),

            xp_per_kill: 10,
            xp_per_level: 100,
            max_hero_level: 10,
            hero_respawn_delay: Fixed::ZERO,

            tier2_cost: Fixed::from_num(200),
            tier3_cost: Fixed::from_num(400),

            tower: StructureStats {
                health: 800,
                attack: 30,
                attack_speed: Fixed::ONE,
                range: Fixed::from_num(20),
            },
            tower_offset: Fixed::from_num(20),
            tower_destroy_reward: Fixed::from_num(150),
            building: StructureStats {
                health: 2000,
                attack: 50,
                attack_speed: ratio(1, 2),
                range: Fixed::from_num(15),
            },

            gold_mine_base_cost: Fixed::from_num(150),
            gold_mine_cost_multiplier: ratio(3, 2),
            gold_mine_income: Fixed::from_num(2),
            gold_mine_cooldown: Fixed::from_num(30),

            max_delta: ratio(1, 10),
            damage_model: DamageModel::Flat,
        }
    }
}

impl MatchConfig {
    /// Load a configuration from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, fails to parse, or
    /// holds values that cannot produce a playable match.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Parse a configuration from a RON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string fails to parse or validate.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: MatchConfig = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// The default configuration with the hero respawn delay enabled.
    #[must_use]
    pub fn with_hero_respawn() -> Self {
        Self {
            hero_respawn_delay: Fixed::from_num(HERO_RESPAWN_TIME),
            ..Self::default()
        }
    }

    /// Check that the values can drive a match.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let lane = Fixed::from_num(LANE_LENGTH);
        let non_negative = [
            ("starting_gold", self.starting_gold),
            ("gold_per_second", self.gold_per_second),
            ("middle_control_bonus", self.middle_control_bonus),
            ("middle_control_speed", self.middle_control_speed),
            ("south_lane_delay", self.south_lane_delay),
            ("hero_respawn_delay", self.hero_respawn_delay),
            ("tier2_cost", self.tier2_cost),
            ("tier3_cost", self.tier3_cost),
            ("tower_destroy_reward", self.tower_destroy_reward),
            ("gold_mine_base_cost", self.gold_mine_base_cost),
            ("gold_mine_income", self.gold_mine_income),
            ("gold_mine_cooldown", self.gold_mine_cooldown),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, v)| *v < Fixed::ZERO) {
            return Err(invalid(format!("{name} must not be negative")));
        }

        if self.wave_interval <= Fixed::ZERO {
            return Err(invalid("wave_interval must be positive"));
        }
        if self.max_delta <= Fixed::ZERO {
            return Err(invalid("max_delta must be positive"));
        }
        if self.xp_per_level == 0 {
            return Err(invalid("xp_per_level must be positive"));
        }
        if self.max_hero_level == 0 {
            return Err(invalid("max_hero_level must be at least 1"));
        }
        if self.middle_zone_start > self.middle_zone_end {
            return Err(invalid("middle_zone_start must not exceed middle_zone_end"));
        }
        if self.gold_mine_cost_multiplier < Fixed::ONE {
            return Err(invalid("gold_mine_cost_multiplier must be at least 1"));
        }

        let offsets = [
            ("unit_spawn_offset", self.unit_spawn_offset),
            ("hero_spawn_offset", self.hero_spawn_offset),
            ("base_attack_reach", self.base_attack_reach),
            ("tower_offset", self.tower_offset),
        ];
        if let Some((name, _)) = offsets.iter().find(|(_, v)| *v < Fixed::ZERO || *v > lane) {
            return Err(invalid(format!("{name} must lie within the lane")));
        }

        for (name, stats) in [("tower", &self.tower), ("building", &self.building)] {
            if stats.health <= 0 {
                return Err(invalid(format!("{name}.health must be positive")));
            }
            if stats.attack < 0 || stats.attack_speed < Fixed::ZERO || stats.range < Fixed::ZERO {
                return Err(invalid(format!("{name} combat stats must not be negative")));
            }
        }

        Ok(())
    }

    /// Gold needed to upgrade away from `current_tier`, or `None` at the top tier.
    #[must_use]
    pub fn tier_upgrade_cost(&self, current_tier: u8) -> Option<Fixed> {
        match current_tier {
            1 => Some(self.tier2_cost),
            2 => Some(self.tier3_cost),
            _ => None,
        }
    }

    /// Price of the next gold mine: `floor(base × multiplier^owned)`.
    #[must_use]
    pub fn gold_mine_cost(&self, owned: u32) -> Fixed {
        let mut cost = self.gold_mine_base_cost;
        for _ in 0..owned {
            cost = cost.saturating_mul(self.gold_mine_cost_multiplier);
        }
        cost.floor()
    }
}

fn invalid(message: impl Into<String>) -> GameError {
    GameError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_overrides() {
        let config = MatchConfig::from_ron_str(
            "(starting_gold: 250.0, wave_interval: 6.5, damage_model: ArmorTable)",
        )
        .unwrap();
        assert_eq!(config.starting_gold, Fixed::from_num(250));
        assert_eq!(config.wave_interval, ratio(13, 2));
        assert_eq!(config.damage_model, DamageModel::ArmorTable);
        assert_eq!(config.tier2_cost, Fixed::from_num(200));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = MatchConfig::from_ron_str("(wave_interval: 0.0)").unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));

        let err = MatchConfig::from_ron_str("(tower_offset: 140.0)").unwrap_err();
        assert!(err.to_string().contains("tower_offset"));
    }

    #[test]
    fn test_parse_error() {
        let err = MatchConfig::from_ron_str("(starting_gold: \"lots\")").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = MatchConfig::load("/nonexistent/lane.ron").unwrap_err();
        assert!(matches!(err, GameError::ConfigRead { .. }));
    }

    #[test]
    fn test_gold_mine_cost_progression() {
        let config = MatchConfig::default();
        assert_eq!(config.gold_mine_cost(0), Fixed::from_num(150));
        assert_eq!(config.gold_mine_cost(1), Fixed::from_num(225));
        // 150 × 2.25 = 337.5 -> 337
        assert_eq!(config.gold_mine_cost(2), Fixed::from_num(337));
    }

    #[test]
    fn test_damage_models() {
        assert_eq!(DamageModel::Flat.damage(40, AttackType::Siege, ArmorType::Heavy), 40);
        assert_eq!(DamageModel::ArmorTable.damage(40, AttackType::Siege, ArmorType::Heavy), 20);
        assert_eq!(
            DamageModel::ArmorTable.damage(40, AttackType::Siege, ArmorType::Fortified),
            100
        );
    }

    #[test]
    fn test_tier_costs() {
        let config = MatchConfig::default();
        assert_eq!(config.tier_upgrade_cost(1), Some(Fixed::from_num(200)));
        assert_eq!(config.tier_upgrade_cost(2), Some(Fixed::from_num(400)));
        assert_eq!(config.tier_upgrade_cost(3), None);
    }
}
