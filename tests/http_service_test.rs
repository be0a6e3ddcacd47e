//! Tests for the HTTP service client against a local axum fixture.

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use quantum_gomoku::{
    Cell, CoordinateMapper, GameService, HttpGameService, Notification, Player, ServiceError,
    SessionDriver, SessionEvent, TerminalCanvas, Tier,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Serves `app` on an ephemeral port and returns its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Bound address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fixture server failed");
    });
    format!("http://{}", addr)
}

async fn place_stone(Json(request): Json<Value>) -> Response {
    if request == json!({"x": 2, "y": 1}) {
        Json(70).into_response()
    } else {
        (StatusCode::CONFLICT, "occupied").into_response()
    }
}

async fn events(Query(params): Query<HashMap<String, u64>>) -> Json<Value> {
    let after = params.get("after").copied().unwrap_or(0);
    let all = [
        json!({"seq": 2, "event": "winner", "payload": "white"}),
        json!({"seq": 1, "event": "turn", "payload": {"player": "white", "p": 30}}),
        json!({"seq": 3, "event": "score", "payload": 12}),
        json!({"seq": 4, "event": "turn", "payload": "black"}),
    ];
    Json(Value::Array(
        all.into_iter()
            .filter(|e| e["seq"].as_u64().unwrap_or(0) > after)
            .collect(),
    ))
}

fn game_server() -> Router {
    Router::new()
        .route("/board_size", get(|| async { Json(3) }))
        .route("/init_game", post(|| async { StatusCode::OK }))
        .route("/place_stone", post(place_stone))
        .route(
            "/observe",
            post(|| async { Json(json!([[100, null, null], [null, 0, null], [null, null, null]])) }),
        )
        .route(
            "/board",
            get(|| async { Json(json!([[90, null, null], [null, 10, null], [null, null, 30]])) }),
        )
        .route("/events", get(events))
}

fn broken_server() -> Router {
    Router::new()
        .route("/board_size", get(|| async { "three" }))
        .route("/place_stone", post(|| async { Json(55) }))
        .route("/observe", post(|| async { Json(json!([[50]])) }))
        .route("/board", get(|| async { Json(json!([[90, null], [null]])) }))
}

#[tokio::test]
async fn test_size_and_init() {
    let service = HttpGameService::new(serve(game_server()).await);
    assert_eq!(service.get_board_size().await, Ok(3));
    assert_eq!(service.init_game().await, Ok(()));
}

#[tokio::test]
async fn test_place_stone_returns_tier_or_rejection() {
    let service = HttpGameService::new(serve(game_server()).await);
    assert_eq!(service.place_stone(2, 1).await, Ok(Tier::P70));
    assert_eq!(
        service.place_stone(0, 0).await,
        Err(ServiceError::Rejected("occupied".to_string()))
    );
}

#[tokio::test]
async fn test_observe_decodes_collapsed_codes() {
    let service = HttpGameService::new(serve(game_server()).await);
    let grid = service.observe().await.expect("Observe should succeed");
    assert_eq!(grid[0][0], Some(Player::Black));
    assert_eq!(grid[1][1], Some(Player::White));
    assert_eq!(grid[2][2], None);
}

#[tokio::test]
async fn test_get_board_decodes_tiers() {
    let service = HttpGameService::new(serve(game_server()).await);
    let board = service.get_board().await.expect("Board should decode");
    assert_eq!(board.size(), 3);
    assert_eq!(board.get(0, 0), Ok(Cell::Tier(Tier::P90)));
    assert_eq!(board.get(1, 1), Ok(Cell::Tier(Tier::P10)));
    assert_eq!(board.get(0, 1), Ok(Cell::Empty));
}

#[tokio::test]
async fn test_unexpected_payloads_are_malformed() {
    let service = HttpGameService::new(serve(broken_server()).await);
    assert!(matches!(service.get_board_size().await, Err(ServiceError::Malformed(_))));
    assert!(matches!(service.place_stone(0, 0).await, Err(ServiceError::Malformed(_))));
    assert!(matches!(service.observe().await, Err(ServiceError::Malformed(_))));
    assert!(matches!(service.get_board().await, Err(ServiceError::Malformed(_))));
}

#[tokio::test]
async fn test_missing_route_is_rejected() {
    let service = HttpGameService::new(serve(broken_server()).await);
    assert!(matches!(service.init_game().await, Err(ServiceError::Rejected(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Bound address");
    drop(listener);

    let service = HttpGameService::new(format!("http://{}", addr));
    assert!(matches!(service.get_board_size().await, Err(ServiceError::Transport(_))));
}

#[tokio::test]
async fn test_poll_events_filters_by_sequence() {
    let service = HttpGameService::new(serve(game_server()).await);
    let batch = service.poll_events(2).await.expect("Poll should succeed");
    let seqs: Vec<u64> = batch.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, [3, 4]);
}

#[tokio::test]
async fn test_event_poller_delivers_notifications_in_order() {
    let service = Arc::new(HttpGameService::new(serve(game_server()).await));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = service.spawn_event_poller(tx, Duration::from_millis(10));

    let mut received = Vec::new();
    while received.len() < 2 {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("Notification should arrive")
            .expect("Poller is running");
        match event {
            SessionEvent::Notification(notification) => received.push(notification),
            other => panic!("unexpected event: {:?}", other),
        }
    }
    assert_eq!(
        received,
        [
            Notification::Turn {
                player: Player::White,
                tier: Tier::P30
            },
            Notification::Winner(Some(Player::White)),
        ]
    );

    // The unknown and malformed events are skipped, nothing else arrives.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());

    drop(rx);
    tokio::time::timeout(Duration::from_secs(5), poller)
        .await
        .expect("Poller stops once the session is gone")
        .expect("Poller task did not panic");
}

#[tokio::test]
async fn test_driver_plays_against_http_service() {
    let service = Arc::new(HttpGameService::new(serve(game_server()).await));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mapper = CoordinateMapper::canvas();
    let mut driver = SessionDriver::start(service, mapper, TerminalCanvas::new(mapper), tx, None)
        .await
        .expect("Driver should start");
    assert_eq!(driver.session().board().size(), 3);

    driver.handle(SessionEvent::Click { row: 1, col: 2 });
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("Response should arrive")
        .expect("Channel open");
    driver.handle(event);

    assert_eq!(driver.session().board().get(1, 2), Ok(Cell::Tier(Tier::P70)));
    let glyph = driver
        .session()
        .renderer()
        .glyph(1, 2)
        .expect("Stone is drawn");
    assert_eq!(glyph.style.label, Some("70"));
}
