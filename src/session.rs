//! The game session: live board, turn cache, observation and move pipeline.
//!
//! `GameSession` is a synchronous state machine. It never talks to the
//! service itself; operations that need a round-trip hand back a ticket, and
//! the caller (normally [`crate::SessionDriver`]) feeds the response back in
//! with the matching `resolve_*` method.

use crate::error::SessionError;
use crate::game::{Board, CoordinateMapper, Player, Tier, TurnState};
use crate::notification::Notification;
use crate::observation::{Epoch, ObservationEngine};
use crate::render::{HOVER_OPACITY, OPAQUE, Renderer, StoneStyle};
use crate::service::{CollapsedGrid, ServiceError};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Phase of the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Moves and observations are accepted.
    InProgress,
    /// The service announced a winner. Only restart (and leaving an open
    /// observation) is accepted.
    Decided(Player),
}

impl GamePhase {
    /// Returns the winner, if decided.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GamePhase::InProgress => None,
            GamePhase::Decided(player) => Some(*player),
        }
    }
}

/// An outstanding placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementTicket {
    row: usize,
    col: usize,
    generation: u64,
}

impl PlacementTicket {
    /// Row of the requested stone.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column of the requested stone.
    pub fn col(&self) -> usize {
        self.col
    }
}

/// An outstanding observation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationTicket {
    epoch: Epoch,
    generation: u64,
}

impl ObservationTicket {
    /// Observation cycle the request belongs to.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
}

/// Client-side state of one game, plus the renderer it draws into.
#[derive(Debug)]
pub struct GameSession<R> {
    board: Board,
    turn: TurnState,
    phase: GamePhase,
    observation: ObservationEngine,
    pending: HashSet<(usize, usize)>,
    generation: u64,
    mapper: CoordinateMapper,
    renderer: R,
}

impl<R: Renderer> GameSession<R> {
    /// Creates a session with an empty `size`×`size` board and draws it.
    #[instrument(skip(mapper, renderer))]
    pub fn new(size: usize, mapper: CoordinateMapper, renderer: R) -> Self {
        info!("Creating game session");
        let mut session = Self {
            board: Board::new(size),
            turn: TurnState::opening(),
            phase: GamePhase::InProgress,
            observation: ObservationEngine::new(),
            pending: HashSet::new(),
            generation: 0,
            mapper,
            renderer,
        };
        session.refresh_display();
        session
    }

    /// The board currently displayed (collapsed while observing).
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The live tiered board, whether or not an observation is shown.
    pub fn live_board(&self) -> &Board {
        self.observation.live_board().unwrap_or(&self.board)
    }

    /// Cached turn state.
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// True while the collapsed view is shown.
    pub fn is_observing(&self) -> bool {
        self.observation.is_observing()
    }

    /// True if a placement at `(row, col)` awaits a response.
    pub fn is_pending(&self, row: usize, col: usize) -> bool {
        self.pending.contains(&(row, col))
    }

    /// Number of placements awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Restart counter. Responses tagged with an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pointer geometry used for drawing and hit testing.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn accepts_input(&self) -> bool {
        self.phase == GamePhase::InProgress && !self.is_observing()
    }

    // ─────────────────────────────────────────────────────────────
    //  Move submission
    // ─────────────────────────────────────────────────────────────

    /// Handles a click on `(row, col)`.
    ///
    /// Returns a ticket when a placement request should be sent. Clicks are
    /// ignored after the game is decided, while observing, on occupied cells
    /// and on cells whose placement is still pending.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn click(&mut self, row: usize, col: usize) -> Option<PlacementTicket> {
        if !self.accepts_input() {
            debug!(phase = ?self.phase, observing = self.is_observing(), "Input disabled");
            return None;
        }
        if !self.board.is_empty(row, col) {
            debug!("Cell is not empty");
            return None;
        }
        if !self.pending.insert((row, col)) {
            debug!("Placement already pending");
            return None;
        }
        debug!("Placement pending");
        Some(PlacementTicket {
            row,
            col,
            generation: self.generation,
        })
    }

    /// Handles a click at pointer position `(x, y)`.
    pub fn click_at(&mut self, x: f64, y: f64) -> Option<PlacementTicket> {
        let (row, col) = self.mapper.to_cell(x, y, self.board.size())?;
        self.click(row, col)
    }

    /// Shows a half-opacity preview of the active player's stone at
    /// `(row, col)`. The board is never modified. Returns whether a preview
    /// was drawn.
    pub fn hover(&mut self, row: usize, col: usize) -> bool {
        if !self.accepts_input() || !self.board.is_empty(row, col) {
            return false;
        }
        self.redraw();
        let (x, y) = self.mapper.to_pixel(row, col);
        let style = StoneStyle::classical(self.turn.active_player());
        self.renderer.draw_stone(x, y, style, HOVER_OPACITY);
        true
    }

    /// Hover at pointer position `(x, y)`.
    pub fn hover_at(&mut self, x: f64, y: f64) -> bool {
        match self.mapper.to_cell(x, y, self.board.size()) {
            Some((row, col)) => self.hover(row, col),
            None => false,
        }
    }

    /// Applies the service's answer to a placement request.
    ///
    /// On success the tier is committed to the live board. On failure the
    /// board is untouched and the error says whether a resync is warranted.
    #[instrument(skip(self, result), fields(row = ticket.row, col = ticket.col))]
    pub fn resolve_placement(
        &mut self,
        ticket: PlacementTicket,
        result: Result<Tier, ServiceError>,
    ) -> Result<Tier, SessionError> {
        if ticket.generation != self.generation {
            debug!("Dropping placement response from a previous game");
            return Err(SessionError::StaleGame {
                response: ticket.generation,
                current: self.generation,
            });
        }
        self.pending.remove(&(ticket.row, ticket.col));

        let tier = result.map_err(|e| {
            warn!(error = %e, "Placement failed");
            match e {
                ServiceError::Rejected(reason) => SessionError::MoveRejected {
                    row: ticket.row,
                    col: ticket.col,
                    reason,
                },
                ServiceError::Malformed(detail) => SessionError::MalformedPayload(detail),
                other => SessionError::RequestFailed(other),
            }
        })?;

        if let Some(live) = self.observation.live_board_mut() {
            live.set_tier(ticket.row, ticket.col, tier)?;
            debug!(%tier, "Placement applied to the held live board");
            return Ok(tier);
        }

        self.board.set_tier(ticket.row, ticket.col, tier)?;
        self.render_cell(ticket.row, ticket.col);
        info!(%tier, "Stone placed");
        Ok(tier)
    }

    /// Cells where the live board disagrees with `remote`.
    pub fn discrepancies(&self, remote: &Board) -> Vec<(usize, usize)> {
        self.live_board().diff(remote)
    }

    // ─────────────────────────────────────────────────────────────
    //  Observation
    // ─────────────────────────────────────────────────────────────

    /// Enters observation mode. Returns a ticket for the collapse request, or
    /// `None` when the game is decided or an observation is already shown.
    #[instrument(skip(self))]
    pub fn enter_observation(&mut self) -> Option<ObservationTicket> {
        if self.phase != GamePhase::InProgress {
            debug!(phase = ?self.phase, "Cannot observe a decided game");
            return None;
        }
        let epoch = self.observation.enter(&self.board)?;
        self.renderer.set_observe_control(true, true);
        info!(epoch = epoch.get(), "Observing");
        Some(ObservationTicket {
            epoch,
            generation: self.generation,
        })
    }

    /// Paints a collapsed board over the displayed board.
    ///
    /// Only applied while the cycle that requested it is still active; `None`
    /// entries leave their cell as it is. Returns the number of painted cells.
    #[instrument(skip(self, result), fields(epoch = ticket.epoch.get()))]
    pub fn resolve_observation(
        &mut self,
        ticket: ObservationTicket,
        result: Result<CollapsedGrid, ServiceError>,
    ) -> Result<usize, SessionError> {
        if ticket.generation != self.generation {
            return Err(SessionError::StaleGame {
                response: ticket.generation,
                current: self.generation,
            });
        }
        self.observation.check(ticket.epoch)?;

        let grid = result.map_err(|e| match e {
            ServiceError::Malformed(detail) => SessionError::MalformedPayload(detail),
            other => SessionError::RequestFailed(other),
        })?;
        let size = self.board.size();
        if grid.len() != size || grid.iter().any(|row| row.len() != size) {
            return Err(SessionError::MalformedPayload(format!(
                "collapsed board is not {}x{}",
                size, size
            )));
        }

        let mut painted = 0;
        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(player) = cell {
                    self.board.set_classical(row, col, *player)?;
                    self.render_cell(row, col);
                    painted += 1;
                }
            }
        }
        debug!(painted, "Collapsed board painted");
        Ok(painted)
    }

    /// Leaves observation mode, restoring the live board exactly as it was
    /// (plus any placements that resolved meanwhile). Returns false when not
    /// observing.
    #[instrument(skip(self))]
    pub fn exit_observation(&mut self) -> bool {
        let Some(live) = self.observation.exit() else {
            return false;
        };
        self.board.replace_with(live);
        self.redraw();
        self.renderer
            .set_observe_control(self.phase == GamePhase::InProgress, false);
        info!("Back to the live board");
        true
    }

    /// The observe button: exit when observing, enter otherwise.
    pub fn toggle_observation(&mut self) -> Option<ObservationTicket> {
        if self.is_observing() {
            self.exit_observation();
            None
        } else {
            self.enter_observation()
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Notifications and lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Applies a pushed notification. This is the only path that changes the
    /// turn state during a game.
    #[instrument(skip(self))]
    pub fn apply_notification(&mut self, notification: Notification) {
        match notification {
            Notification::Turn { player, tier } => {
                self.turn = TurnState::announced(player, tier);
                debug!(turn = %self.turn, "Turn updated");
                if self.phase == GamePhase::InProgress {
                    self.renderer.show_turn(&self.turn);
                }
            }
            Notification::Winner(None) => debug!("No winner yet"),
            Notification::Winner(Some(winner)) => {
                if let GamePhase::Decided(existing) = self.phase {
                    debug!(%existing, %winner, "Game already decided");
                    return;
                }
                self.phase = GamePhase::Decided(winner);
                let observing = self.is_observing();
                self.renderer.set_observe_control(observing, observing);
                self.renderer.show_winner(winner);
                info!(%winner, "Game decided");
            }
        }
    }

    /// Resets everything for a new game on a `size`×`size` board.
    ///
    /// Board, turn, phase, observation and pending placements are replaced
    /// together; responses to requests issued before the restart become
    /// stale.
    #[instrument(skip(self))]
    pub fn restart(&mut self, size: usize) {
        self.generation += 1;
        self.board = Board::new(size);
        self.turn = TurnState::opening();
        self.phase = GamePhase::InProgress;
        self.observation.reset();
        self.pending.clear();
        self.refresh_display();
        info!(generation = self.generation, "Game restarted");
    }

    // ─────────────────────────────────────────────────────────────
    //  Drawing
    // ─────────────────────────────────────────────────────────────

    fn render_cell(&mut self, row: usize, col: usize) {
        if let Some(style) = self.board.get(row, col).ok().and_then(StoneStyle::for_cell) {
            let (x, y) = self.mapper.to_pixel(row, col);
            self.renderer.draw_stone(x, y, style, OPAQUE);
        }
    }

    /// Redraws the grid and every stone of the displayed board.
    pub fn redraw(&mut self) {
        self.renderer.draw_empty_grid(self.board.size());
        for (row, col, cell) in self.board.cells() {
            if let Some(style) = StoneStyle::for_cell(cell) {
                let (x, y) = self.mapper.to_pixel(row, col);
                self.renderer.draw_stone(x, y, style, OPAQUE);
            }
        }
    }

    fn refresh_display(&mut self) {
        self.redraw();
        self.renderer.show_turn(&self.turn);
        self.renderer.set_observe_control(true, false);
    }
}
