//! Stateless UI rendering for the board and status lines.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::canvas::{Glyph, Status, TerminalCanvas};
use super::input::{BOARD_LEFT, BOARD_TOP, CELL_WIDTH};
use crate::render::Rgb;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Renders the whole screen from the canvas.
pub fn draw(frame: &mut Frame, canvas: &TerminalCanvas) {
    let area = frame.area();
    let size = u16::try_from(canvas.size()).unwrap_or(u16::MAX);

    let title = Paragraph::new("Quantum Gomoku")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(title, Rect::new(0, 0, area.width, 1).intersection(area));

    // Border sits one cell outside the grid on every side.
    let board_area = Rect::new(
        BOARD_LEFT - 1,
        BOARD_TOP - 1,
        size.saturating_mul(CELL_WIDTH).saturating_add(2),
        size.saturating_add(2),
    )
    .intersection(area);
    let heading = if canvas.observing() { "Observed" } else { "Live" };
    let board = Paragraph::new(board_lines(canvas))
        .style(Style::default().bg(color(Rgb::BOARD)))
        .block(Block::default().title(heading).borders(Borders::ALL));
    frame.render_widget(board, board_area);

    let status_top = BOARD_TOP.saturating_add(size).saturating_add(1);
    let status = Paragraph::new(vec![status_line(canvas.status()), controls_line(canvas)]);
    frame.render_widget(
        status,
        Rect::new(0, status_top, area.width, 2).intersection(area),
    );
}

fn board_lines(canvas: &TerminalCanvas) -> Vec<Line<'static>> {
    (0..canvas.size())
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..canvas.size())
                .map(|col| cell_span(canvas.glyph(row, col)))
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn cell_span(glyph: Option<Glyph>) -> Span<'static> {
    let board = Style::default().bg(color(Rgb::BOARD));
    match glyph {
        None => Span::styled(" · ", board.fg(Color::DarkGray)),
        Some(Glyph { style, ghost: true }) => Span::styled(
            " ○ ",
            board.fg(color(style.fill)).add_modifier(Modifier::DIM),
        ),
        Some(Glyph { style, ghost: false }) => match style.label {
            Some(label) => Span::styled(
                format!("{:^3}", label),
                Style::default().bg(color(style.fill)).fg(color(style.text)),
            ),
            None => Span::styled(" ● ", board.fg(color(style.fill))),
        },
    }
}

fn status_line(status: &Status) -> Line<'static> {
    match status {
        Status::Turn(turn) => Line::from(Span::styled(
            turn.to_string(),
            Style::default().fg(Color::Yellow),
        )),
        Status::Winner(winner) => Line::from(Span::styled(
            format!("{} wins! Press 'r' to play again", winner),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
    }
}

fn controls_line(canvas: &TerminalCanvas) -> Line<'static> {
    let observe = if canvas.observing() {
        "[o] back to live"
    } else {
        "[o] observe"
    };
    let observe_style = if canvas.observe_enabled() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(observe, observe_style),
        Span::raw("  [r] restart  [q] quit"),
    ])
}
