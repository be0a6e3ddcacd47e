//! Snapshot/restore bookkeeping for the observe toggle.

use crate::error::SessionError;
use crate::game::Board;
use tracing::{debug, instrument};

/// Identifies one observation cycle.
///
/// Every call to [`ObservationEngine::enter`] hands out a fresh epoch. A
/// collapsed board is only applied if it was requested under the epoch that
/// is still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(u64);

impl Epoch {
    /// Numeric value, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Owns the live-board snapshot while an observation is shown.
///
/// The snapshot exists exactly between `enter` and `exit`. Nothing outside
/// this type can read or replace it except through the methods below.
#[derive(Debug, Default)]
pub struct ObservationEngine {
    snapshot: Option<Board>,
    epoch: u64,
}

impl ObservationEngine {
    /// Creates an engine in live mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an observation is displayed.
    pub fn is_observing(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Starts a cycle by snapshotting `live`. Returns `None` if a cycle is
    /// already active.
    #[instrument(skip_all)]
    pub fn enter(&mut self, live: &Board) -> Option<Epoch> {
        if self.is_observing() {
            debug!("Already observing");
            return None;
        }
        self.epoch += 1;
        self.snapshot = Some(live.snapshot());
        debug!(epoch = self.epoch, stones = live.stone_count(), "Snapshot taken");
        Some(Epoch(self.epoch))
    }

    /// Accepts a response for `epoch` only if that cycle is still active.
    pub fn check(&self, epoch: Epoch) -> Result<(), SessionError> {
        if self.is_observing() && epoch.0 == self.epoch {
            Ok(())
        } else {
            Err(SessionError::StaleObservationResponse { epoch: epoch.0 })
        }
    }

    /// Ends the cycle, handing back the snapshot to restore.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn exit(&mut self) -> Option<Board> {
        let snapshot = self.snapshot.take();
        if snapshot.is_some() {
            debug!("Observation ended");
        }
        snapshot
    }

    /// The live board held aside while observing.
    pub fn live_board_mut(&mut self) -> Option<&mut Board> {
        self.snapshot.as_mut()
    }

    /// The live board held aside while observing.
    pub fn live_board(&self) -> Option<&Board> {
        self.snapshot.as_ref()
    }

    /// Drops any active cycle without restoring. The epoch keeps counting so
    /// responses from before the reset stay stale.
    pub fn reset(&mut self) {
        self.snapshot = None;
    }
}
