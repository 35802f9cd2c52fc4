//! Faction and lane identifiers.

use serde::{Deserialize, Serialize};

use crate::math::{Fixed, LANE_LENGTH};

/// The two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    /// The Human Empire. Its fortress sits at lane position 0.
    Human,
    /// The Undead Legion. Its fortress sits at lane position 100.
    Undead,
}

impl Faction {
    /// Both factions in processing order.
    pub const ALL: [Faction; 2] = [Faction::Human, Faction::Undead];

    /// The opposing faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Human => Self::Undead,
            Self::Undead => Self::Human,
        }
    }

    /// Direction of travel along the lane: +1 for human, -1 for undead.
    #[must_use]
    pub fn direction(self) -> Fixed {
        match self {
            Self::Human => Fixed::ONE,
            Self::Undead => -Fixed::ONE,
        }
    }

    /// Lane position of this faction's fortress.
    #[must_use]
    pub fn base_position(self) -> Fixed {
        match self {
            Self::Human => Fixed::ZERO,
            Self::Undead => Fixed::from_num(LANE_LENGTH),
        }
    }

    /// Mirror a distance measured from this faction's base into an absolute
    /// lane position.
    #[must_use]
    pub fn from_own_base(self, offset: Fixed) -> Fixed {
        match self {
            Self::Human => offset,
            Self::Undead => Fixed::from_num(LANE_LENGTH) - offset,
        }
    }

    /// Get the display name for this faction.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Human => "Human Empire",
            Self::Undead => "Undead Legion",
        }
    }

    /// Index into per-faction arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Human => 0,
            Self::Undead => 1,
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One of the two parallel lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    /// The north lane.
    Top,
    /// The south lane.
    Bottom,
}

impl Lane {
    /// Both lanes in processing order.
    pub const ALL: [Lane; 2] = [Lane::Top, Lane::Bottom];

    /// The other lane.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}
