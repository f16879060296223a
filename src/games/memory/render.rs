//! Memory Match rendering: counters header, card grid, and overlay banners.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;
use crate::widgets::{grid_columns, CardGrid, ClickableList};

use super::actions::{card_action, DISMISS_OVERLAY};
use super::board::BoardView;
use super::effect::OverlayKind;
use super::state::RoundState;

/// Remaining time at or below which the clock turns red.
const LOW_TIME_SECONDS: u32 = 10;

pub fn render(
    board: &BoardView,
    state: &RoundState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_header(board, f, chunks[0]);
    render_grid(board, state, f, chunks[1], click_state);

    if let Some(kind) = board.overlay() {
        render_overlay(board, kind, f, area, click_state);
    }
}

fn render_header(board: &BoardView, f: &mut Frame, area: Rect) {
    let remaining = board.remaining_seconds();
    let time_style = if remaining <= LOW_TIME_SECONDS {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let line = Line::from(vec![
        Span::styled(" Time ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{remaining:>3}"), time_style),
        Span::styled("   Flips ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{:>3}", board.clicks()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            if board.music_on() { "   ♪" } else { "" },
            Style::default().fg(Color::Magenta),
        ),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Memory Match ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(header, area);
}

fn render_grid(
    board: &BoardView,
    state: &RoundState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let columns = grid_columns(board.order().len());
    let mut grid = CardGrid::new(columns);

    for (pos, &card) in board.order().iter().enumerate() {
        let matched = state.matched.contains(&card);
        let face_up = board.is_face_up(card);
        let (label, color) = if face_up && matched {
            (board.face(card).to_string(), Color::Green)
        } else if face_up {
            (board.face(card).to_string(), Color::Yellow)
        } else {
            ("?".to_string(), Color::DarkGray)
        };

        let border_style = if pos == board.cursor() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        let tile = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(label, Style::default().fg(color))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        grid.tile(tile, card_action(card));
    }

    let mut cs = click_state.borrow_mut();
    grid.render(f, area, &mut cs);
}

fn render_overlay(
    board: &BoardView,
    kind: OverlayKind,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let (title, color, hint) = match kind {
        OverlayKind::Start => ("Click to Start", Color::Cyan, " [R] Start "),
        OverlayKind::Victory => ("VICTORY!", Color::Green, " [R] Play again "),
        OverlayKind::GameOver => ("GAME OVER", Color::Red, " [R] Try again "),
    };

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        title,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    match kind {
        OverlayKind::Start => cl.push(Line::from(Span::styled(
            "Match every pair before time runs out",
            Style::default().fg(Color::Gray),
        ))),
        OverlayKind::Victory | OverlayKind::GameOver => cl.push(Line::from(Span::styled(
            format!(
                "Flips {}   Time left {}",
                board.clicks(),
                board.remaining_seconds()
            ),
            Style::default().fg(Color::Gray),
        ))),
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            hint,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        DISMISS_OVERLAY,
    );

    let popup = centered_rect(area, 44, cl.len() as u16 + 2);
    let mut cs = click_state.borrow_mut();
    // The whole screen dismisses the banner; the hint row sits on top of it.
    cs.add_click_target(area, DISMISS_OVERLAY);
    cl.register_targets(popup, &mut cs, 1);

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        popup,
    );
}

/// A `width`×`height` rect centred in `area`, shrunk to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
