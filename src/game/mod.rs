mod board;
mod coords;
mod turn;
mod types;

pub use board::{Board, BoardError};
pub use coords::{CoordinateMapper, GRID_SIZE};
pub use turn::TurnState;
pub use types::{Cell, InvalidTier, Player, Tier};
