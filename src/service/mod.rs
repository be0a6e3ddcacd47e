//! Boundary to the authoritative game service.

mod http;

pub use http::{EventEnvelope, HttpGameService};

use crate::game::{Board, Player, Tier};
use derive_more::{Display, Error};
use std::future::Future;
use std::time::Duration;

/// Largest board the client accepts from the service.
pub const MAX_BOARD_SIZE: usize = 64;

/// Collapsed board returned by an observation: one entry per cell, `None`
/// where the service has nothing to report.
pub type CollapsedGrid = Vec<Vec<Option<Player>>>;

/// Failure talking to the authoritative service.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ServiceError {
    /// The service understood the request and refused it.
    #[display("Rejected by service: {}", _0)]
    Rejected(#[error(not(source))] String),

    /// The request never produced a response.
    #[display("Transport error: {}", _0)]
    Transport(#[error(not(source))] String),

    /// The response did not have the expected shape.
    #[display("Malformed response: {}", _0)]
    Malformed(#[error(not(source))] String),

    /// No response within the configured timeout.
    #[display("Timed out after {:?}", _0)]
    Timeout(#[error(not(source))] Duration),
}

/// Request/response operations offered by the authoritative service.
///
/// Every call is a single in-flight request. The client never computes game
/// rules, turn order or collapse results itself.
#[async_trait::async_trait]
pub trait GameService: Send + Sync {
    /// Board size N, fetched at startup and on restart.
    async fn get_board_size(&self) -> Result<usize, ServiceError>;

    /// (Re)initializes the server-side game.
    async fn init_game(&self) -> Result<(), ServiceError>;

    /// Places the active player's stone at column `x`, row `y`.
    async fn place_stone(&self, x: usize, y: usize) -> Result<Tier, ServiceError>;

    /// Collapses the whole board.
    async fn observe(&self) -> Result<CollapsedGrid, ServiceError>;

    /// Full tiered board as the service sees it.
    async fn get_board(&self) -> Result<Board, ServiceError>;
}

/// Accepts a board size reported by the service if it lies in
/// `1..=MAX_BOARD_SIZE`.
pub fn checked_board_size(size: usize) -> Result<usize, ServiceError> {
    if (1..=MAX_BOARD_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(ServiceError::Malformed(format!(
            "board size {} outside 1..={}",
            size, MAX_BOARD_SIZE
        )))
    }
}

/// Awaits `request`, failing with [`ServiceError::Timeout`] when `timeout` is
/// set and elapses first.
pub async fn with_timeout<T>(
    timeout: Option<Duration>,
    request: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_| ServiceError::Timeout(limit))?,
        None => request.await,
    }
}
