//! Tests for the observe toggle: snapshot, collapse and restore.

mod common;

use common::{Draw, RecordingRenderer, blank_grid};
use quantum_gomoku::{
    Cell, CoordinateMapper, GameSession, Notification, Player, ServiceError, SessionError, Tier,
};

fn session_with_stones() -> GameSession<RecordingRenderer> {
    let mut session = GameSession::new(5, CoordinateMapper::canvas(), RecordingRenderer::default());
    for (row, col, tier) in [(0, 0, Tier::P90), (1, 1, Tier::P10), (2, 3, Tier::P70)] {
        let ticket = session.click(row, col).expect("Click should request a placement");
        session
            .resolve_placement(ticket, Ok(tier))
            .expect("Placement should apply");
    }
    session
}

#[test]
fn test_enter_exit_without_response_restores_board() {
    let mut session = session_with_stones();
    let before = session.board().clone();

    session.enter_observation().expect("Should enter observation");
    assert!(session.is_observing());
    assert!(session.exit_observation());

    assert_eq!(session.board(), &before);
    assert!(!session.is_observing());
}

#[test]
fn test_enter_collapse_exit_restores_board() {
    let mut session = session_with_stones();
    let before = session.board().clone();

    let ticket = session.enter_observation().expect("Should enter observation");
    let mut grid = blank_grid(5);
    grid[0][0] = Some(Player::Black);
    grid[1][1] = Some(Player::Black);
    grid[2][3] = Some(Player::White);
    grid[4][4] = Some(Player::White);
    assert_eq!(session.resolve_observation(ticket, Ok(grid)), Ok(4));

    assert_eq!(session.board().get(1, 1), Ok(Cell::Classical(Player::Black)));
    assert_eq!(session.board().get(4, 4), Ok(Cell::Classical(Player::White)));
    assert_eq!(session.live_board(), &before, "Live board is held aside");

    assert!(session.exit_observation());
    assert_eq!(session.board(), &before);
}

#[test]
fn test_null_cells_are_left_alone() {
    let mut session = session_with_stones();
    let ticket = session.enter_observation().expect("Should enter observation");
    let mut grid = blank_grid(5);
    grid[0][0] = Some(Player::White);
    session
        .resolve_observation(ticket, Ok(grid))
        .expect("Collapse should apply");

    assert_eq!(session.board().get(0, 0), Ok(Cell::Classical(Player::White)));
    assert_eq!(session.board().get(1, 1), Ok(Cell::Tier(Tier::P10)));
}

#[test]
fn test_response_after_exit_is_stale() {
    let mut session = session_with_stones();
    let before = session.board().clone();
    let ticket = session.enter_observation().expect("Should enter observation");
    session.exit_observation();

    let mut grid = blank_grid(5);
    grid[0][0] = Some(Player::White);
    let err = session
        .resolve_observation(ticket, Ok(grid))
        .expect_err("Late response should be discarded");

    assert!(matches!(err, SessionError::StaleObservationResponse { .. }));
    assert!(!err.needs_resync());
    assert_eq!(session.board(), &before);
}

#[test]
fn test_response_for_old_epoch_is_stale_after_reentering() {
    let mut session = session_with_stones();
    let first = session.enter_observation().expect("Should enter observation");
    session.exit_observation();
    let second = session.enter_observation().expect("Should re-enter observation");
    assert_ne!(first.epoch(), second.epoch());

    let mut grid = blank_grid(5);
    grid[0][0] = Some(Player::White);
    assert!(session.resolve_observation(first, Ok(grid.clone())).is_err());
    assert_eq!(session.board().get(0, 0), Ok(Cell::Tier(Tier::P90)));

    assert_eq!(session.resolve_observation(second, Ok(grid)), Ok(1));
    assert_eq!(session.board().get(0, 0), Ok(Cell::Classical(Player::White)));
}

#[test]
fn test_wrong_sized_grid_is_malformed() {
    let mut session = session_with_stones();
    let before = session.board().clone();
    let ticket = session.enter_observation().expect("Should enter observation");

    let err = session
        .resolve_observation(ticket, Ok(blank_grid(4)))
        .expect_err("Grid of the wrong size is rejected");
    assert!(matches!(err, SessionError::MalformedPayload(_)));
    assert_eq!(session.board(), &before);
}

#[test]
fn test_failed_observation_leaves_view_untouched() {
    let mut session = session_with_stones();
    let before = session.board().clone();
    let ticket = session.enter_observation().expect("Should enter observation");

    let err = session
        .resolve_observation(ticket, Err(ServiceError::Transport("reset".to_string())))
        .expect_err("Failure should surface");
    assert!(matches!(err, SessionError::RequestFailed(_)));
    assert!(session.is_observing());
    assert_eq!(session.board(), &before);
}

#[test]
fn test_input_is_ignored_while_observing() {
    let mut session = session_with_stones();
    session.enter_observation().expect("Should enter observation");
    assert!(session.click(4, 0).is_none());
    assert!(!session.hover(4, 0));
    assert!(session.enter_observation().is_none(), "Already observing");
    assert_eq!(session.renderer().last_observe_control(), Some((true, true)));
}

#[test]
fn test_placement_resolved_while_observing_survives_restore() {
    let mut session = session_with_stones();
    let ticket = session.click(4, 0).expect("Click should request a placement");
    let observation = session.enter_observation().expect("Should enter observation");

    session.renderer_mut().clear();
    session
        .resolve_placement(ticket, Ok(Tier::P30))
        .expect("Placement should apply to the held board");
    assert!(session.renderer().stones().is_empty(), "Collapsed view is not painted over");
    assert!(session.board().is_empty(4, 0));
    assert_eq!(session.live_board().get(4, 0), Ok(Cell::Tier(Tier::P30)));

    session
        .resolve_observation(observation, Ok(blank_grid(5)))
        .expect("Collapse should apply");
    session.exit_observation();
    assert_eq!(session.board().get(4, 0), Ok(Cell::Tier(Tier::P30)));
}

#[test]
fn test_toggle_enters_then_exits() {
    let mut session = session_with_stones();
    assert!(session.toggle_observation().is_some());
    assert!(session.is_observing());
    assert!(session.toggle_observation().is_none());
    assert!(!session.is_observing());
    assert_eq!(session.renderer().last_observe_control(), Some((true, false)));
}

#[test]
fn test_exit_redraws_every_stone() {
    let mut session = session_with_stones();
    session.enter_observation().expect("Should enter observation");
    session.renderer_mut().clear();
    session.exit_observation();

    let calls = &session.renderer().calls;
    assert_eq!(calls.first(), Some(&Draw::Grid(5)));
    assert_eq!(session.renderer().stones().len(), 3);
}

#[test]
fn test_exit_allowed_after_game_is_decided() {
    let mut session = session_with_stones();
    let before = session.board().clone();
    session.enter_observation().expect("Should enter observation");
    session.apply_notification(Notification::Winner(Some(Player::White)));
    assert_eq!(session.renderer().last_observe_control(), Some((true, true)));

    assert!(session.toggle_observation().is_none());
    assert_eq!(session.board(), &before);
    assert_eq!(session.renderer().last_observe_control(), Some((false, false)));
    assert!(session.toggle_observation().is_none(), "Cannot observe a decided game");
}
