//! Core domain types for quantum gomoku.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A player, and also the color a stone collapses to when observed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Player {
    /// Black (moves first).
    Black,
    /// White.
    White,
}

/// Confidence tier of an unobserved stone.
///
/// The tier is the probability, in percent, that the stone collapses to
/// [`Player::Black`] when observed. Black plays 90/70 stones, White plays
/// 10/30 stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    /// 10% black.
    P10,
    /// 30% black.
    P30,
    /// 70% black.
    P70,
    /// 90% black.
    P90,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 4] = [Tier::P10, Tier::P30, Tier::P70, Tier::P90];

    /// Returns the tier as a percentage.
    pub fn percent(self) -> u8 {
        match self {
            Tier::P10 => 10,
            Tier::P30 => 30,
            Tier::P70 => 70,
            Tier::P90 => 90,
        }
    }

    /// Returns the player this tier leans towards.
    pub fn leaning(self) -> Player {
        if self.percent() > 50 {
            Player::Black
        } else {
            Player::White
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.percent())
    }
}

/// Error returned when an integer is not one of the four tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("{} is not a stone tier (expected 10, 30, 70 or 90)", value)]
pub struct InvalidTier {
    /// The rejected value.
    pub value: i64,
}

impl TryFrom<u8> for Tier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for Tier {
    type Error = InvalidTier;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(Tier::P10),
            30 => Ok(Tier::P30),
            70 => Ok(Tier::P70),
            90 => Ok(Tier::P90),
            _ => Err(InvalidTier { value }),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.percent()
    }
}

/// A cell on the board.
///
/// Exactly one of the three states holds at any instant. Tiered stones belong
/// to the live game; classical stones only appear while an observation is
/// painted over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// Unobserved stone with its confidence tier.
    Tier(Tier),
    /// Collapsed stone.
    Classical(Player),
}

impl Cell {
    /// Returns true if the cell holds no stone.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => write!(f, "empty"),
            Cell::Tier(tier) => write!(f, "tier {}", tier),
            Cell::Classical(player) => write!(f, "{}", player),
        }
    }
}
