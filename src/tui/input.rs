//! Keyboard and mouse translation.

use crate::driver::SessionEvent;
use crate::game::CoordinateMapper;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Terminal column of the first grid cell.
pub const BOARD_LEFT: u16 = 1;
/// Terminal row of the first grid line.
pub const BOARD_TOP: u16 = 2;
/// Characters per grid cell.
pub const CELL_WIDTH: u16 = 3;

/// Mapper from terminal cells to board cells. The stone sits in the middle
/// character of its cell.
pub fn layout_mapper() -> CoordinateMapper {
    CoordinateMapper::new(
        f64::from(BOARD_LEFT + CELL_WIDTH / 2),
        f64::from(BOARD_TOP),
        f64::from(CELL_WIDTH),
        1.0,
    )
}

/// Turns a terminal event into a session event, if it means anything.
pub fn translate(event: Event, mapper: &CoordinateMapper, size: usize) -> Option<SessionEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Some(SessionEvent::Quit);
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(SessionEvent::Quit),
                KeyCode::Char('o') => Some(SessionEvent::ToggleObservation),
                KeyCode::Char('r') => Some(SessionEvent::Restart),
                _ => None,
            }
        }
        Event::Mouse(mouse) => translate_mouse(mouse, mapper, size),
        _ => None,
    }
}

fn translate_mouse(mouse: MouseEvent, mapper: &CoordinateMapper, size: usize) -> Option<SessionEvent> {
    let (row, col) = mapper.to_cell(f64::from(mouse.column), f64::from(mouse.row), size)?;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(SessionEvent::Click { row, col }),
        MouseEventKind::Moved => Some(SessionEvent::Hover { row, col }),
        _ => None,
    }
}

/// Reads terminal events on a dedicated thread, since crossterm's reader
/// blocks. Stops when the receiver is dropped or reading fails.
pub fn spawn_reader(tx: mpsc::UnboundedSender<Event>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        debug!("Input receiver dropped");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read terminal event");
                    break;
                }
            }
        }
    })
}
