//! JSON-over-HTTP client for the authoritative game service.

use super::{CollapsedGrid, GameService, ServiceError};
use crate::driver::SessionEvent;
use crate::game::{Board, Cell, Player, Tier};
use crate::notification::Notification;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Wire code of a stone that collapsed to black.
const OBSERVED_BLACK: u8 = 100;

/// Wire code of a stone that collapsed to white.
const OBSERVED_WHITE: u8 = 0;

/// One pushed event as delivered by `GET /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Sequence number assigned by the service. It is expected to keep
    /// increasing across `init_game`; the poller only asks for events after
    /// the highest number it has seen.
    pub seq: u64,
    /// Event name (`turn` or `winner`).
    pub event: String,
    /// Event payload, shape depends on the event.
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct PlaceStoneRequest {
    x: usize,
    y: usize,
}

/// HTTP implementation of [`GameService`].
#[derive(Debug, Clone)]
pub struct HttpGameService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGameService {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating HTTP game service client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetches events with a sequence number greater than `after`.
    #[instrument(skip(self))]
    pub async fn poll_events(&self, after: u64) -> Result<Vec<EventEnvelope>, ServiceError> {
        let response = self
            .client
            .get(format!("{}?after={}", self.url("events"), after))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// Polls `GET /events` every `interval` and forwards parsed notifications
    /// into the session channel, in sequence order.
    ///
    /// Malformed events are logged and skipped. The task ends when the
    /// session channel closes.
    pub fn spawn_event_poller(
        self: Arc<Self>,
        events: mpsc::UnboundedSender<SessionEvent>,
        interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut last_seq = 0;
            loop {
                match self.poll_events(last_seq).await {
                    Ok(batch) => {
                        let (fresh, floor) = fresh_events(batch, last_seq);
                        last_seq = floor;
                        for envelope in fresh {
                            match Notification::parse(&envelope.event, &envelope.payload) {
                                Ok(notification) => {
                                    debug!(seq = envelope.seq, ?notification, "Received notification");
                                    if events.send(SessionEvent::Notification(notification)).is_err() {
                                        debug!("Session channel closed, stopping event poller");
                                        return;
                                    }
                                }
                                Err(e) => {
                                    warn!(seq = envelope.seq, error = %e, "Ignoring notification");
                                }
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to poll events, retrying"),
                }
                if events.is_closed() {
                    return;
                }
                tokio::time::sleep(interval).await;
            }
        })
    }
}

/// Sorts `batch` and keeps the events newer than `floor`, returning them with
/// the floor for the next poll.
///
/// A non-empty batch whose newest event is older than `floor` means the
/// service started numbering again, so the whole batch is new.
fn fresh_events(mut batch: Vec<EventEnvelope>, floor: u64) -> (Vec<EventEnvelope>, u64) {
    batch.sort_by_key(|envelope| envelope.seq);
    let Some(newest) = batch.last().map(|envelope| envelope.seq) else {
        return (batch, floor);
    };
    if newest < floor {
        warn!(newest, floor, "Event sequence went backwards, starting over");
        return (batch, newest);
    }
    batch.retain(|envelope| envelope.seq > floor);
    (batch, newest)
}

fn transport(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(err.to_string())
}

/// Reads the body, mapping non-2xx statuses to [`ServiceError::Rejected`].
async fn body_text(response: reqwest::Response) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        debug!(%status, body = %body, "Service refused request");
        let reason = if body.is_empty() {
            status.to_string()
        } else {
            body
        };
        return Err(ServiceError::Rejected(reason));
    }
    Ok(body)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let body = body_text(response).await?;
    serde_json::from_str(&body).map_err(|e| ServiceError::Malformed(format!("{}: {}", e, body)))
}

fn observed_player(code: u8) -> Result<Player, ServiceError> {
    match code {
        OBSERVED_BLACK => Ok(Player::Black),
        OBSERVED_WHITE => Ok(Player::White),
        other => Err(ServiceError::Malformed(format!(
            "{} is not an observed stone",
            other
        ))),
    }
}

#[async_trait::async_trait]
impl GameService for HttpGameService {
    #[instrument(skip(self))]
    async fn get_board_size(&self) -> Result<usize, ServiceError> {
        let response = self
            .client
            .get(self.url("board_size"))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    #[instrument(skip(self))]
    async fn init_game(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.url("init_game"))
            .send()
            .await
            .map_err(transport)?;
        body_text(response).await.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn place_stone(&self, x: usize, y: usize) -> Result<Tier, ServiceError> {
        let response = self
            .client
            .post(self.url("place_stone"))
            .json(&PlaceStoneRequest { x, y })
            .send()
            .await
            .map_err(transport)?;
        let code: i64 = decode(response).await?;
        Tier::try_from(code).map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn observe(&self) -> Result<CollapsedGrid, ServiceError> {
        let response = self
            .client
            .post(self.url("observe"))
            .send()
            .await
            .map_err(transport)?;
        let raw: Vec<Vec<Option<u8>>> = decode(response).await?;
        raw.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|code| code.map(observed_player).transpose())
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn get_board(&self) -> Result<Board, ServiceError> {
        let response = self
            .client
            .get(self.url("board"))
            .send()
            .await
            .map_err(transport)?;
        let raw: Vec<Vec<Option<u8>>> = decode(response).await?;
        let rows = raw
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|code| match code {
                        None => Ok(Cell::Empty),
                        Some(p) => Tier::try_from(p)
                            .map(Cell::Tier)
                            .map_err(|e| ServiceError::Malformed(e.to_string())),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Board::from_rows(rows).map_err(|e| ServiceError::Malformed(e.to_string()))
    }
}
