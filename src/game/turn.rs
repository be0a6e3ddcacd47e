//! Cached turn state pushed by the authoritative service.

use super::types::{Player, Tier};
use serde::{Deserialize, Serialize};

/// Whose turn it is and which tier their next stone will have.
///
/// This is a passive cache. The client never advances the turn itself; a new
/// value only arrives through a `turn` notification or a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    active_player: Player,
    active_tier: Tier,
}

impl TurnState {
    /// The canonical opening state: Black to move with a 90 stone.
    pub fn opening() -> Self {
        Self {
            active_player: Player::Black,
            active_tier: Tier::P90,
        }
    }

    /// Builds the state announced by a `turn` notification.
    pub(crate) fn announced(active_player: Player, active_tier: Tier) -> Self {
        Self {
            active_player,
            active_tier,
        }
    }

    /// The player to move.
    pub fn active_player(&self) -> Player {
        self.active_player
    }

    /// Tier of the active player's next stone.
    pub fn active_tier(&self) -> Tier {
        self.active_tier
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::opening()
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to move ({})", self.active_player, self.active_tier)
    }
}
