//! Attack-type versus armor-type damage model.
//!
//! A fixed 5×5 multiplier table in the style of classic lane-pushers:
//! every attacker carries an [`AttackType`], every target an
//! [`ArmorType`], and [`calculate_damage`] scales the base damage by
//! the matching multiplier.
//!
//! Multipliers are stored as integer percentages so rounding is exact.

use serde::{Deserialize, Serialize};

/// Damage classification of an attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackType {
    /// Good vs light, weak vs heavy and fortified.
    #[default]
    Normal,
    /// Excellent vs light and unarmored, poor vs fortified.
    Pierce,
    /// Strong vs heavy, weak vs unarmored.
    Magic,
    /// Devastating vs fortified, weak vs everything else.
    Siege,
    /// Consistent against everything except fortified.
    Hero,
}

/// Armor classification of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ArmorType {
    /// Knights, heroes and other armored fighters.
    Heavy,
    /// Standard line infantry.
    #[default]
    Medium,
    /// Fast or lightly protected units.
    Light,
    /// Casters.
    Unarmored,
    /// Towers and fortresses.
    Fortified,
}

impl AttackType {
    /// Every attack type, in table order.
    pub const ALL: [AttackType; 5] = [
        AttackType::Normal,
        AttackType::Pierce,
        AttackType::Magic,
        AttackType::Siege,
        AttackType::Hero,
    ];

    /// Damage multiplier against an armor type, as a percentage.
    #[must_use]
    pub const fn percent_vs(self, armor: ArmorType) -> u32 {
        use ArmorType::{Fortified, Heavy, Light, Medium, Unarmored};

        match (self, armor) {
            (Self::Normal, Heavy) => 75,
            (Self::Normal, Medium) => 100,
            (Self::Normal, Light) => 150,
            (Self::Normal, Unarmored) => 100,
            (Self::Normal, Fortified) => 50,

            (Self::Pierce, Heavy) => 50,
            (Self::Pierce, Medium) => 75,
            (Self::Pierce, Light) => 200,
            (Self::Pierce, Unarmored) => 150,
            (Self::Pierce, Fortified) => 35,

            (Self::Magic, Heavy) => 125,
            (Self::Magic, Medium) => 100,
            (Self::Magic, Light) => 100,
            (Self::Magic, Unarmored) => 75,
            (Self::Magic, Fortified) => 50,

            (Self::Siege, Heavy) => 50,
            (Self::Siege, Medium) => 100,
            (Self::Siege, Light) => 50,
            (Self::Siege, Unarmored) => 50,
            (Self::Siege, Fortified) => 250,

            (Self::Hero, Fortified) => 50,
            (Self::Hero, _) => 100,
        }
    }
}

impl ArmorType {
    /// Every armor type, in table order.
    pub const ALL: [ArmorType; 5] = [
        ArmorType::Heavy,
        ArmorType::Medium,
        ArmorType::Light,
        ArmorType::Unarmored,
        ArmorType::Fortified,
    ];
}

/// Final damage after applying the armor multiplier.
///
/// `round(base × multiplier)` with round-half-up. Negative base damage
/// is treated as zero.
#[must_use]
pub fn calculate_damage(base: i32, attack: AttackType, armor: ArmorType) -> i32 {
    let base = i64::from(base.max(0));
    let percent = i64::from(attack.percent_vs(armor));
    let scaled = (base * percent + 50) / 100;
    i32::try_from(scaled).unwrap_or(i32::MAX)
}

/// Qualitative effectiveness label for a matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effectiveness {
    /// 200% or more.
    Devastating,
    /// 150% or more.
    VeryEffective,
    /// 125% or more.
    Effective,
    /// Above 100%.
    Good,
    /// Exactly 100%.
    Normal,
    /// 75% or more.
    Reduced,
    /// 50% or more.
    Poor,
    /// Below 50%.
    VeryPoor,
}

/// Describe how effective an attack type is against an armor type.
#[must_use]
pub const fn effectiveness(attack: AttackType, armor: ArmorType) -> Effectiveness {
    match attack.percent_vs(armor) {
        200.. => Effectiveness::Devastating,
        150.. => Effectiveness::VeryEffective,
        125.. => Effectiveness::Effective,
        101.. => Effectiveness::Good,
        100 => Effectiveness::Normal,
        75.. => Effectiveness::Reduced,
        50.. => Effectiveness::Poor,
        _ => Effectiveness::VeryPoor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows() {
        let expected: [[u32; 5]; 5] = [
            [75, 100, 150, 100, 50],
            [50, 75, 200, 150, 35],
            [125, 100, 100, 75, 50],
            [50, 100, 50, 50, 250],
            [100, 100, 100, 100, 50],
        ];
        for (row, attack) in AttackType::ALL.iter().enumerate() {
            for (col, armor) in ArmorType::ALL.iter().enumerate() {
                assert_eq!(
                    attack.percent_vs(*armor),
                    expected[row][col],
                    "{attack:?} vs {armor:?}"
                );
            }
        }
    }

    #[test]
    fn test_round_half_up() {
        // 10 × 0.35 = 3.5 -> 4
        assert_eq!(calculate_damage(10, AttackType::Pierce, ArmorType::Fortified), 4);
        // 15 × 0.75 = 11.25 -> 11
        assert_eq!(calculate_damage(15, AttackType::Pierce, ArmorType::Medium), 11);
        // 25 × 0.5 = 12.5 -> 13
        assert_eq!(calculate_damage(25, AttackType::Hero, ArmorType::Fortified), 13);
    }

    #[test]
    fn test_siege_vs_fortified() {
        assert_eq!(calculate_damage(40, AttackType::Siege, ArmorType::Fortified), 100);
    }

    #[test]
    fn test_negative_base_is_zero() {
        assert_eq!(calculate_damage(-5, AttackType::Normal, ArmorType::Light), 0);
    }

    #[test]
    fn test_effectiveness_labels() {
        assert_eq!(
            effectiveness(AttackType::Pierce, ArmorType::Light),
            Effectiveness::Devastating
        );
        assert_eq!(
            effectiveness(AttackType::Normal, ArmorType::Medium),
            Effectiveness::Normal
        );
        assert_eq!(
            effectiveness(AttackType::Pierce, ArmorType::Fortified),
            Effectiveness::VeryPoor
        );
        assert_eq!(
            effectiveness(AttackType::Magic, ArmorType::Heavy),
            Effectiveness::Effective
        );
    }
}
