//! Error types for the lane simulation.

use thiserror::Error;

use crate::factions::Faction;
use crate::math::Fixed;
use crate::units::UnitType;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for fallible operations outside the tick.
#[derive(Debug, Error)]
pub enum GameError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        /// Path to the file that failed to load.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parsing error.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Configuration values that cannot produce a playable match.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Why a command was rejected.
///
/// A rejected command never mutates the match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The faction cannot pay for the command.
    #[error("Insufficient gold: need {required}, have {available}")]
    InsufficientGold {
        /// Gold required.
        required: Fixed,
        /// Gold available.
        available: Fixed,
    },

    /// The unit type needs a higher tech tier.
    #[error("Tech tier {required} required, faction is at tier {current}")]
    TierLocked {
        /// Tier the unit type needs.
        required: u8,
        /// Tier the faction has.
        current: u8,
    },

    /// The unit type belongs to the other faction's roster.
    #[error("{unit_type:?} cannot be hired by {faction}")]
    WrongFaction {
        /// Requested unit type.
        unit_type: UnitType,
        /// Faction that tried to hire it.
        faction: Faction,
    },

    /// The faction is already at the highest tech tier.
    #[error("Already at maximum tech tier")]
    MaxTier,

    /// Another gold mine cannot be bought yet.
    #[error("Gold mine purchase on cooldown for {remaining} more seconds")]
    MineCooldown {
        /// Seconds until the next purchase is allowed.
        remaining: Fixed,
    },

    /// The match already has a winner.
    #[error("Match is over")]
    MatchOver,
}
