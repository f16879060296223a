//! Shared input handling: coordinate conversion, click targets, and event types.
//!
//! This module is game-agnostic. Each game implements its own input dispatch.

use ratzilla::ratatui::layout::Rect;

/// All possible input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard. Arrow keys arrive as `h`/`j`/`k`/`l`,
    /// Enter as `' '`.
    Key(char),
    /// A click/tap on a registered target, identified by a semantic action ID.
    Click(u16),
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cell coordinates.
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared state between the render loop and click handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-width, one-row target, ignored if `row` lies outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Hit-test a terminal cell against all registered targets. Later
    /// registrations sit on top, so an overlay registered after the board
    /// wins where they overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Convert a pixel Y coordinate, relative to the grid container's top edge,
/// to a terminal row. `None` if outside the grid or the inputs are degenerate.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;
    if row >= terminal_rows {
        None
    } else {
        Some(row)
    }
}

/// Convert a pixel X coordinate to a terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols {
        None
    } else {
        Some(col)
    }
}
