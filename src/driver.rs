//! Single-threaded event loop that owns a [`GameSession`].
//!
//! Pointer input, notifications and service responses all arrive as
//! [`SessionEvent`]s on one channel and are applied in arrival order. Service
//! calls run as spawned tasks that post their result back into the same
//! channel, so the loop never blocks on the network.

use crate::game::{Board, CoordinateMapper, Tier};
use crate::notification::Notification;
use crate::render::Renderer;
use crate::service::{CollapsedGrid, GameService, ServiceError, checked_board_size, with_timeout};
use crate::session::{GameSession, ObservationTicket, PlacementTicket};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Messages consumed by the session loop.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Click on an intersection.
    Click {
        /// Row.
        row: usize,
        /// Column.
        col: usize,
    },
    /// Pointer moved over an intersection.
    Hover {
        /// Row.
        row: usize,
        /// Column.
        col: usize,
    },
    /// The observe button.
    ToggleObservation,
    /// The restart button.
    Restart,
    /// Stop the loop.
    Quit,
    /// A pushed notification.
    Notification(Notification),
    /// Response to a placement request.
    PlacementResolved {
        /// The request.
        ticket: PlacementTicket,
        /// The service's answer.
        result: Result<Tier, ServiceError>,
    },
    /// Response to an observation request.
    ObservationResolved {
        /// The request.
        ticket: ObservationTicket,
        /// The collapsed board.
        result: Result<CollapsedGrid, ServiceError>,
    },
    /// Response to the diagnostic board fetch after a failed placement.
    BoardFetched(Result<Board, ServiceError>),
    /// Board size fetched for a restart.
    BoardSizeFetched(Result<usize, ServiceError>),
    /// The service finished (re)initializing its game.
    GameInitialized(Result<(), ServiceError>),
}

/// Whether the loop keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep processing events.
    Continue,
    /// Stop the loop.
    Quit,
}

/// Drives a [`GameSession`] against a [`GameService`].
pub struct SessionDriver<R> {
    session: GameSession<R>,
    service: Arc<dyn GameService>,
    events: mpsc::UnboundedSender<SessionEvent>,
    timeout: Option<Duration>,
}

impl<R: Renderer> SessionDriver<R> {
    /// Starts a game: fetches the board size, builds the session, draws the
    /// empty board and initializes the server-side game.
    #[instrument(skip_all)]
    pub async fn start(
        service: Arc<dyn GameService>,
        mapper: CoordinateMapper,
        renderer: R,
        events: mpsc::UnboundedSender<SessionEvent>,
        timeout: Option<Duration>,
    ) -> Result<Self, ServiceError> {
        let size = checked_board_size(with_timeout(timeout, service.get_board_size()).await?)?;
        info!(size, "Board size fetched");
        let session = GameSession::new(size, mapper, renderer);
        with_timeout(timeout, service.init_game()).await?;
        info!("Game initialized");
        Ok(Self {
            session,
            service,
            events,
            timeout,
        })
    }

    /// The session.
    pub fn session(&self) -> &GameSession<R> {
        &self.session
    }

    /// Sender for posting events into this driver's loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events.clone()
    }

    /// Runs until [`SessionEvent::Quit`] or until every sender is dropped.
    pub async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<SessionEvent>) -> GameSession<R> {
        info!("Session loop started");
        while let Some(event) = inbox.recv().await {
            if self.handle(event) == Flow::Quit {
                break;
            }
        }
        info!("Session loop stopped");
        self.session
    }

    /// Applies one event.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: SessionEvent) -> Flow {
        match event {
            SessionEvent::Click { row, col } => {
                if let Some(ticket) = self.session.click(row, col) {
                    self.request_placement(ticket);
                }
            }
            SessionEvent::Hover { row, col } => {
                self.session.hover(row, col);
            }
            SessionEvent::ToggleObservation => {
                if let Some(ticket) = self.session.toggle_observation() {
                    self.request_observation(ticket);
                }
            }
            SessionEvent::Restart => self.request_board_size(),
            SessionEvent::Quit => return Flow::Quit,
            SessionEvent::Notification(notification) => {
                self.session.apply_notification(notification);
            }
            SessionEvent::PlacementResolved { ticket, result } => {
                match self.session.resolve_placement(ticket, result) {
                    Ok(_) => {}
                    Err(e) if e.needs_resync() => {
                        warn!(error = %e, "Placement not applied, fetching board for comparison");
                        self.request_board();
                    }
                    Err(e) => debug!(error = %e, "Placement response discarded"),
                }
            }
            SessionEvent::ObservationResolved { ticket, result } => {
                if let Err(e) = self.session.resolve_observation(ticket, result) {
                    if e.needs_resync() {
                        warn!(error = %e, "Collapsed board not applied");
                    } else {
                        debug!(error = %e, "Collapsed board discarded");
                    }
                }
            }
            SessionEvent::BoardFetched(Ok(remote)) => {
                let diff = self.session.discrepancies(&remote);
                if diff.is_empty() {
                    info!("Service board matches the local board");
                } else {
                    warn!(
                        cells = ?diff,
                        remote = %remote.display(),
                        local = %self.session.live_board().display(),
                        "Local board differs from the service"
                    );
                }
            }
            SessionEvent::BoardFetched(Err(e)) => {
                warn!(error = %e, "Diagnostic board fetch failed");
            }
            SessionEvent::BoardSizeFetched(result) => {
                let size = match result.and_then(checked_board_size) {
                    Ok(size) => size,
                    Err(e) => {
                        let size = self.session.board().size();
                        warn!(error = %e, size, "Board size fetch failed, keeping current size");
                        size
                    }
                };
                self.session.restart(size);
                self.request_init();
            }
            SessionEvent::GameInitialized(Ok(())) => info!("Game initialized"),
            SessionEvent::GameInitialized(Err(e)) => {
                error!(error = %e, "Service failed to initialize the game");
            }
        }
        Flow::Continue
    }

    /// Runs `request` on its own task and posts the event built from its
    /// result back into the loop.
    fn spawn_request<T, F, M>(&self, request: F, into_event: M)
    where
        T: Send + 'static,
        F: std::future::Future<Output = Result<T, ServiceError>> + Send + 'static,
        M: FnOnce(Result<T, ServiceError>) -> SessionEvent + Send + 'static,
    {
        let events = self.events.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let result = with_timeout(timeout, request).await;
            if events.send(into_event(result)).is_err() {
                debug!("Session loop gone, dropping response");
            }
        });
    }

    fn request_placement(&self, ticket: PlacementTicket) {
        let service = Arc::clone(&self.service);
        debug!(row = ticket.row(), col = ticket.col(), "Requesting placement");
        self.spawn_request(
            async move { service.place_stone(ticket.col(), ticket.row()).await },
            move |result| SessionEvent::PlacementResolved { ticket, result },
        );
    }

    fn request_observation(&self, ticket: ObservationTicket) {
        let service = Arc::clone(&self.service);
        debug!(epoch = ticket.epoch().get(), "Requesting collapsed board");
        self.spawn_request(
            async move { service.observe().await },
            move |result| SessionEvent::ObservationResolved { ticket, result },
        );
    }

    fn request_board(&self) {
        let service = Arc::clone(&self.service);
        self.spawn_request(
            async move { service.get_board().await },
            SessionEvent::BoardFetched,
        );
    }

    fn request_board_size(&self) {
        let service = Arc::clone(&self.service);
        info!("Restart requested");
        self.spawn_request(
            async move { service.get_board_size().await },
            SessionEvent::BoardSizeFetched,
        );
    }

    fn request_init(&self) {
        let service = Arc::clone(&self.service);
        self.spawn_request(
            async move { service.init_game().await },
            SessionEvent::GameInitialized,
        );
    }
}
