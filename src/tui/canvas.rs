//! Character-cell drawing surface.

use crate::game::{CoordinateMapper, Player, TurnState};
use crate::render::{OPAQUE, Renderer, StoneStyle};
use tracing::trace;

/// A stone as last drawn on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Colors and label.
    pub style: StoneStyle,
    /// True for the hover preview.
    pub ghost: bool,
}

/// What the status line says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Whose move it is.
    Turn(TurnState),
    /// The game is over.
    Winner(Player),
}

/// [`Renderer`] that records stones per board cell for ratatui to paint.
///
/// The session draws in pointer coordinates; the canvas maps them back to
/// cells with the same mapper that turns mouse positions into clicks.
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    mapper: CoordinateMapper,
    size: usize,
    glyphs: Vec<Option<Glyph>>,
    status: Status,
    observe_enabled: bool,
    observing: bool,
}

impl TerminalCanvas {
    /// Creates a blank canvas using `mapper` for its layout.
    pub fn new(mapper: CoordinateMapper) -> Self {
        Self {
            mapper,
            size: 0,
            glyphs: Vec::new(),
            status: Status::Turn(TurnState::opening()),
            observe_enabled: true,
            observing: false,
        }
    }

    /// Board size of the last grid drawn.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Layout shared with mouse hit testing.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Stone drawn at `(row, col)`, if any.
    pub fn glyph(&self, row: usize, col: usize) -> Option<Glyph> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.glyphs[row * self.size + col]
    }

    /// Status line contents.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Whether the observe key does anything.
    pub fn observe_enabled(&self) -> bool {
        self.observe_enabled
    }

    /// Whether the collapsed view is shown.
    pub fn observing(&self) -> bool {
        self.observing
    }
}

impl Renderer for TerminalCanvas {
    fn draw_empty_grid(&mut self, size: usize) {
        self.size = size;
        self.glyphs = vec![None; size * size];
    }

    fn draw_stone(&mut self, x: f64, y: f64, style: StoneStyle, opacity: f32) {
        let Some((row, col)) = self.mapper.to_cell(x, y, self.size) else {
            trace!(x, y, "Stone outside the grid");
            return;
        };
        self.glyphs[row * self.size + col] = Some(Glyph {
            style,
            ghost: opacity < OPAQUE,
        });
    }

    fn show_turn(&mut self, turn: &TurnState) {
        self.status = Status::Turn(*turn);
    }

    fn show_winner(&mut self, winner: Player) {
        self.status = Status::Winner(winner);
    }

    fn set_observe_control(&mut self, enabled: bool, observing: bool) {
        self.observe_enabled = enabled;
        self.observing = observing;
    }
}
