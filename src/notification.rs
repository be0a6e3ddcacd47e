//! Push notifications from the authoritative service.

use crate::game::{Player, Tier};
use derive_more::{Display, Error};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::instrument;

/// Event name of a turn change.
pub const TURN_EVENT: &str = "turn";

/// Event name of a winner announcement.
pub const WINNER_EVENT: &str = "winner";

/// A notification pushed by the service, parsed into domain types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The turn passed to `player`, whose next stone has `tier`.
    Turn {
        /// Player to move.
        player: Player,
        /// Tier of that player's next stone.
        tier: Tier,
    },
    /// Winner announcement. `None` means no winner yet.
    Winner(Option<Player>),
}

/// Reason a raw notification could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum NotificationError {
    /// The event name is not one the client listens to.
    #[display("Unknown event '{}'", _0)]
    UnknownEvent(#[error(not(source))] String),

    /// The payload does not have the shape the event requires.
    #[display("Malformed '{}' payload: {}", event, detail)]
    Malformed {
        /// Event name.
        event: &'static str,
        /// What was wrong.
        detail: String,
    },
}

#[derive(Debug, Deserialize)]
struct TurnPayload {
    player: String,
    p: i64,
}

impl Notification {
    /// Parses the payload of event `event`.
    #[instrument(skip(payload))]
    pub fn parse(event: &str, payload: &Value) -> Result<Self, NotificationError> {
        match event {
            TURN_EVENT => Self::parse_turn(payload),
            WINNER_EVENT => Self::parse_winner(payload),
            other => Err(NotificationError::UnknownEvent(other.to_string())),
        }
    }

    fn parse_turn(payload: &Value) -> Result<Self, NotificationError> {
        let malformed = |detail: String| NotificationError::Malformed {
            event: TURN_EVENT,
            detail,
        };
        let raw = TurnPayload::deserialize(payload).map_err(|e| malformed(e.to_string()))?;
        let player = Player::from_str(&raw.player)
            .map_err(|_| malformed(format!("unknown player '{}'", raw.player)))?;
        let tier = Tier::try_from(raw.p).map_err(|e| malformed(e.to_string()))?;
        Ok(Notification::Turn { player, tier })
    }

    fn parse_winner(payload: &Value) -> Result<Self, NotificationError> {
        match payload {
            Value::Null => Ok(Notification::Winner(None)),
            Value::String(name) if name.is_empty() => Ok(Notification::Winner(None)),
            Value::String(name) => Player::from_str(name)
                .map(|player| Notification::Winner(Some(player)))
                .map_err(|_| NotificationError::Malformed {
                    event: WINNER_EVENT,
                    detail: format!("unknown player '{}'", name),
                }),
            other => Err(NotificationError::Malformed {
                event: WINNER_EVENT,
                detail: format!("expected a player name, got {}", other),
            }),
        }
    }
}
