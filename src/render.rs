//! Rendering adapter boundary.
//!
//! The session decides *what* to draw and calls into a [`Renderer`]. A
//! renderer owns pixels or terminal cells but no game rules.

use crate::game::{Cell, Player, Tier, TurnState};

/// Opacity of a committed stone.
pub const OPAQUE: f32 = 1.0;

/// Opacity of the hover preview stone.
pub const HOVER_OPACITY: f32 = 0.5;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    /// Pure white.
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    /// Board background.
    pub const BOARD: Rgb = Rgb(0xDC, 0xB3, 0x5C);
}

/// How a single stone is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoneStyle {
    /// Fill color of the stone.
    pub fill: Rgb,
    /// Color of the label text.
    pub text: Rgb,
    /// Label printed on the stone; tier stones show their percentage.
    pub label: Option<&'static str>,
}

impl StoneStyle {
    /// Style of an unobserved stone. Darker fill means more likely black.
    pub fn tier(tier: Tier) -> Self {
        match tier {
            Tier::P10 => Self {
                fill: Rgb(0xEE, 0xEE, 0xEE),
                text: Rgb::BLACK,
                label: Some("10"),
            },
            Tier::P30 => Self {
                fill: Rgb(0xCC, 0xCC, 0xCC),
                text: Rgb::BLACK,
                label: Some("30"),
            },
            Tier::P70 => Self {
                fill: Rgb(0x33, 0x33, 0x33),
                text: Rgb::WHITE,
                label: Some("70"),
            },
            Tier::P90 => Self {
                fill: Rgb::BLACK,
                text: Rgb::WHITE,
                label: Some("90"),
            },
        }
    }

    /// Style of a collapsed stone, also used for the hover preview.
    pub fn classical(player: Player) -> Self {
        match player {
            Player::Black => Self {
                fill: Rgb::BLACK,
                text: Rgb::WHITE,
                label: None,
            },
            Player::White => Self {
                fill: Rgb::WHITE,
                text: Rgb::BLACK,
                label: None,
            },
        }
    }

    /// Style for whatever `cell` holds, or `None` for an empty cell.
    pub fn for_cell(cell: Cell) -> Option<Self> {
        match cell {
            Cell::Empty => None,
            Cell::Tier(tier) => Some(Self::tier(tier)),
            Cell::Classical(player) => Some(Self::classical(player)),
        }
    }
}

/// Drawing surface driven by the session.
pub trait Renderer {
    /// Clears the surface and draws an empty grid of `size` lines.
    fn draw_empty_grid(&mut self, size: usize);

    /// Draws one stone centered on pointer-space position `(x, y)`.
    fn draw_stone(&mut self, x: f64, y: f64, style: StoneStyle, opacity: f32);

    /// Updates the turn display.
    fn show_turn(&mut self, turn: &TurnState);

    /// Replaces the turn display with the winner banner and restart prompt.
    fn show_winner(&mut self, winner: Player);

    /// Updates the observe control: whether it can be pressed, and whether it
    /// currently reads "stop observing".
    fn set_observe_control(&mut self, enabled: bool, observing: bool);
}
