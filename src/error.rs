//! Session-level error types.

use crate::game::BoardError;
use crate::service::ServiceError;
use derive_more::{Display, Error, From};

/// Error produced while applying input or service results to a session.
///
/// None of these are fatal. The worst visible effect is a cell that stays
/// empty, or a board out of sync until the next successful round-trip.
#[derive(Debug, Clone, PartialEq, Display, Error, From)]
pub enum SessionError {
    /// Coordinates outside the board. Validated input never produces this.
    #[display("{}", _0)]
    #[from]
    Board(BoardError),

    /// The service declined a placement.
    #[display("Placement at ({}, {}) rejected: {}", row, col, reason)]
    MoveRejected {
        /// Row of the rejected placement.
        row: usize,
        /// Column of the rejected placement.
        col: usize,
        /// Reason given by the service.
        reason: String,
    },

    /// A request did not complete (transport failure or timeout).
    #[display("Request failed: {}", _0)]
    RequestFailed(#[error(not(source))] ServiceError),

    /// A payload from the service had an unexpected shape.
    #[display("Malformed payload: {}", _0)]
    MalformedPayload(#[error(not(source))] String),

    /// A collapsed board arrived for an observation that already ended.
    #[display("Observation {} is no longer active", epoch)]
    StaleObservationResponse {
        /// Epoch the response was requested for.
        epoch: u64,
    },

    /// A response arrived for a game that has since been restarted.
    #[display("Response belongs to game {}, current game is {}", response, current)]
    StaleGame {
        /// Generation the request was issued in.
        response: u64,
        /// Current generation.
        current: u64,
    },
}

impl SessionError {
    /// True for errors that should trigger a diagnostic board fetch.
    pub fn needs_resync(&self) -> bool {
        matches!(
            self,
            SessionError::MoveRejected { .. }
                | SessionError::RequestFailed(_)
                | SessionError::MalformedPayload(_)
        )
    }
}
