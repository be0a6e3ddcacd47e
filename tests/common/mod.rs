//! Shared fixtures: a scripted service and a renderer that records calls.

#![allow(dead_code)]

use async_trait::async_trait;
use quantum_gomoku::{
    Board, CollapsedGrid, GameService, Player, Renderer, ServiceError, StoneStyle, Tier, TurnState,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One call made to a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Grid(usize),
    Stone {
        x: f64,
        y: f64,
        style: StoneStyle,
        opacity: f32,
    },
    Turn(TurnState),
    Winner(Player),
    ObserveControl { enabled: bool, observing: bool },
}

/// Renderer that keeps every call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Draw>,
}

impl RecordingRenderer {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn stones(&self) -> Vec<&Draw> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Draw::Stone { .. }))
            .collect()
    }

    pub fn last_turn(&self) -> Option<TurnState> {
        self.calls.iter().rev().find_map(|call| match call {
            Draw::Turn(turn) => Some(*turn),
            _ => None,
        })
    }

    pub fn last_observe_control(&self) -> Option<(bool, bool)> {
        self.calls.iter().rev().find_map(|call| match call {
            Draw::ObserveControl { enabled, observing } => Some((*enabled, *observing)),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn draw_empty_grid(&mut self, size: usize) {
        self.calls.push(Draw::Grid(size));
    }

    fn draw_stone(&mut self, x: f64, y: f64, style: StoneStyle, opacity: f32) {
        self.calls.push(Draw::Stone {
            x,
            y,
            style,
            opacity,
        });
    }

    fn show_turn(&mut self, turn: &TurnState) {
        self.calls.push(Draw::Turn(*turn));
    }

    fn show_winner(&mut self, winner: Player) {
        self.calls.push(Draw::Winner(winner));
    }

    fn set_observe_control(&mut self, enabled: bool, observing: bool) {
        self.calls.push(Draw::ObserveControl { enabled, observing });
    }
}

/// In-memory service answering from queues filled by the test.
///
/// An empty queue answers with a rejection, except for `init_game` which
/// succeeds. With `stall_placements` set, placements never answer.
#[derive(Debug, Default)]
pub struct ScriptedService {
    pub sizes: Mutex<VecDeque<Result<usize, ServiceError>>>,
    pub placements: Mutex<VecDeque<Result<Tier, ServiceError>>>,
    pub observations: Mutex<VecDeque<Result<CollapsedGrid, ServiceError>>>,
    pub boards: Mutex<VecDeque<Result<Board, ServiceError>>>,
    pub calls: Mutex<Vec<String>>,
    pub stall_placements: bool,
}

impl ScriptedService {
    pub fn with_size(size: usize) -> Self {
        let service = Self::default();
        service.push_size(Ok(size));
        service
    }

    pub fn push_size(&self, result: Result<usize, ServiceError>) {
        self.sizes.lock().expect("lock").push_back(result);
    }

    pub fn push_placement(&self, result: Result<Tier, ServiceError>) {
        self.placements.lock().expect("lock").push_back(result);
    }

    pub fn push_observation(&self, result: Result<CollapsedGrid, ServiceError>) {
        self.observations.lock().expect("lock").push_back(result);
    }

    pub fn push_board(&self, result: Result<Board, ServiceError>) {
        self.boards.lock().expect("lock").push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Number of calls to the method `name`, ignoring arguments.
    pub fn count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split('(').next() == Some(name))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, ServiceError>>>) -> Result<T, ServiceError> {
        queue
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Rejected("unscripted".to_string())))
    }
}

#[async_trait]
impl GameService for ScriptedService {
    async fn get_board_size(&self) -> Result<usize, ServiceError> {
        self.record("get_board_size".to_string());
        Self::next(&self.sizes)
    }

    async fn init_game(&self) -> Result<(), ServiceError> {
        self.record("init_game".to_string());
        Ok(())
    }

    async fn place_stone(&self, x: usize, y: usize) -> Result<Tier, ServiceError> {
        self.record(format!("place_stone({}, {})", x, y));
        if self.stall_placements {
            std::future::pending::<()>().await;
        }
        Self::next(&self.placements)
    }

    async fn observe(&self) -> Result<CollapsedGrid, ServiceError> {
        self.record("observe".to_string());
        Self::next(&self.observations)
    }

    async fn get_board(&self) -> Result<Board, ServiceError> {
        self.record("get_board".to_string());
        Self::next(&self.boards)
    }
}

/// `size`×`size` collapsed grid with nothing reported.
pub fn blank_grid(size: usize) -> CollapsedGrid {
    vec![vec![None; size]; size]
}
