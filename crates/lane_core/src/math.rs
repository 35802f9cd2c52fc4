//! Fixed-point math utilities for deterministic simulation.
//!
//! Lane positions, speeds, timers and gold all use fixed-point
//! arithmetic so that identical inputs produce bit-identical
//! states on every platform.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Length of a lane in position units.
pub const LANE_LENGTH: i32 = 100;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Serde support for `Option<Fixed>`.
pub mod option_fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize an optional fixed-point number.
    pub fn serialize<S>(value: &Option<Fixed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => v.to_bits().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional fixed-point number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Fixed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<i64>::deserialize(deserializer)?;
        Ok(opt.map(Fixed::from_bits))
    }
}

/// Human-editable serde support for fixed-point numbers.
///
/// Config files write balance values as decimals (`8.0`, `1.5`) rather
/// than raw bits. Values are converted once at load time, so the
/// simulation itself never touches floats.
pub mod decimal_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as a decimal.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_num::<f64>().serialize(serializer)
    }

    /// Deserialize a fixed-point number from a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Fixed::checked_from_num(value)
            .ok_or_else(|| serde::de::Error::custom(format!("value {value} out of range")))
    }
}

/// Create a fixed-point value from a ratio of two integers.
///
/// Used for balance constants such as `1.2` attacks per second
/// (`ratio(12, 10)`), which keeps literal values out of float math.
#[must_use]
pub fn ratio(numerator: i32, denominator: i32) -> Fixed {
    Fixed::from_num(numerator) / Fixed::from_num(denominator)
}

/// Clamp a lane position into `[0, LANE_LENGTH]`.
#[must_use]
pub fn clamp_lane(position: Fixed) -> Fixed {
    position.clamp(Fixed::ZERO, Fixed::from_num(LANE_LENGTH))
}

/// Absolute distance between two lane positions.
#[must_use]
pub fn lane_distance(a: Fixed, b: Fixed) -> Fixed {
    (a - b).abs()
}

/// Seconds between attacks for a given attack rate.
///
/// A non-positive rate never becomes ready, so it maps to `Fixed::MAX`.
#[must_use]
pub fn attack_cooldown(attacks_per_second: Fixed) -> Fixed {
    if attacks_per_second <= Fixed::ZERO {
        Fixed::MAX
    } else {
        Fixed::ONE / attacks_per_second
    }
}

/// Check whether an attacker's cooldown has elapsed at `now`.
#[must_use]
pub fn cooldown_ready(now: Fixed, last_attack_time: Fixed, attacks_per_second: Fixed) -> bool {
    now - last_attack_time >= attack_cooldown(attacks_per_second)
}
