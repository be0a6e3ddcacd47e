//! Quantum Gomoku client library
//!
//! Client-side state engine for a two-player gomoku variant where every stone
//! is placed as a probability tier (10, 30, 70 or 90 percent black) and only
//! resolves to a color when the board is observed.
//!
//! # Architecture
//!
//! - **Game**: board model, tiers, turn cache and pointer geometry
//! - **Session**: move pipeline, observation toggle and lifecycle
//! - **Driver**: single-threaded event loop against an async service
//! - **Service**: the authoritative game service and its HTTP client
//! - **TUI**: ratatui renderer and mouse input
//!
//! # Example
//!
//! ```no_run
//! use quantum_gomoku::{ClientConfig, CoordinateMapper, HttpGameService, SessionDriver, TerminalCanvas};
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let service = Arc::new(HttpGameService::new(config.server_url().clone()));
//! let (tx, rx) = mpsc::unbounded_channel();
//! let mapper = CoordinateMapper::canvas();
//! let driver = SessionDriver::start(service, mapper, TerminalCanvas::new(mapper), tx, None).await?;
//! let session = driver.run(rx).await;
//! println!("{}", session.board().display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod driver;
mod error;
mod game;
mod notification;
mod observation;
mod render;
mod service;
mod session;

pub mod tui;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,quantum_gomoku=debug";

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError};

// Crate-level exports - Game types
pub use game::{
    Board, BoardError, Cell, CoordinateMapper, GRID_SIZE, InvalidTier, Player, Tier, TurnState,
};

// Crate-level exports - Session and driver
pub use driver::{Flow, SessionDriver, SessionEvent};
pub use error::SessionError;
pub use observation::{Epoch, ObservationEngine};
pub use session::{GamePhase, GameSession, ObservationTicket, PlacementTicket};

// Crate-level exports - Service boundary
pub use notification::{Notification, NotificationError, TURN_EVENT, WINNER_EVENT};
pub use service::{
    CollapsedGrid, EventEnvelope, GameService, HttpGameService, MAX_BOARD_SIZE, ServiceError,
    checked_board_size, with_timeout,
};

// Crate-level exports - Rendering
pub use render::{HOVER_OPACITY, OPAQUE, Renderer, Rgb, StoneStyle};
pub use tui::TerminalCanvas;
