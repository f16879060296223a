//! Reusable clickable UI components.
//!
//! Each component encapsulates both rendering and click target registration,
//! so visual output and interactive behaviour stay co-located.
//!
//! # Components
//!
//! - [`CardGrid`] — Fixed grid of card tiles, one click target per tile.
//! - [`ClickableList`] — Vertical list with per-row click targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;
use ratzilla::ratatui::widgets::Paragraph;
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── CardGrid ───────────────────────────────────────────────────

/// Tallest a tile is allowed to grow on large screens.
const MAX_TILE_HEIGHT: u16 = 5;

/// Number of columns for a board of `count` cards: the smallest square that
/// holds them (16 cards → 4×4).
pub fn grid_columns(count: usize) -> usize {
    let mut cols = 1;
    while cols * cols < count {
        cols += 1;
    }
    cols
}

/// Split `area` into `count` tile rects laid out row-major in `columns`
/// columns. Leftover pixels stay at the right/bottom edge.
pub fn cell_rects(area: Rect, count: usize, columns: usize) -> Vec<Rect> {
    if count == 0 || columns == 0 {
        return Vec::new();
    }
    let rows = count.div_ceil(columns);
    let w = area.width / columns as u16;
    let h = (area.height / rows as u16).min(MAX_TILE_HEIGHT);
    (0..count)
        .map(|i| {
            let (col, row) = ((i % columns) as u16, (i / columns) as u16);
            Rect::new(area.x + col * w, area.y + row * h, w, h)
        })
        .collect()
}

/// A grid of card tiles.
///
/// # Example
/// ```ignore
/// let mut grid = CardGrid::new(4);
/// grid.tile(Paragraph::new("?").block(block), card_action(id));
/// grid.render(f, area, &mut cs);
/// ```
pub struct CardGrid<'a> {
    columns: usize,
    tiles: Vec<(Paragraph<'a>, u16)>,
}

impl<'a> CardGrid<'a> {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            tiles: Vec::new(),
        }
    }

    /// Append a tile with the action its click triggers.
    pub fn tile(&mut self, widget: Paragraph<'a>, action_id: u16) {
        self.tiles.push((widget, action_id));
    }

    /// Render every tile and register one click target per tile.
    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let rects = cell_rects(area, self.tiles.len(), self.columns);
        for ((widget, action_id), rect) in self.tiles.into_iter().zip(rects) {
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            f.render_widget(widget, rect);
            cs.add_click_target(rect, action_id);
        }
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// A builder that pairs rendered [`Line`]s with click actions, so click rows
/// follow the lines when lines are inserted above them.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)` pairs.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a non-clickable line.
    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a clickable line with a semantic action ID.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for all clickable lines. One logical line is
    /// one visual row; `top_offset` rows (e.g. a border) precede the content.
    pub fn register_targets(&self, area: Rect, cs: &mut ClickState, top_offset: u16) {
        let content_y = area.y + top_offset;
        for &(line_idx, action_id) in &self.actions {
            cs.add_row_target(area, content_y + line_idx, action_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_columns_for_common_boards() {
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(12), 4);
        assert_eq!(grid_columns(16), 4);
        assert_eq!(grid_columns(20), 5);
    }

    #[test]
    fn cell_rects_row_major() {
        let rects = cell_rects(Rect::new(2, 3, 40, 20), 16, 4);
        assert_eq!(rects.len(), 16);
        assert_eq!(rects[0], Rect::new(2, 3, 10, 5));
        assert_eq!(rects[1], Rect::new(12, 3, 10, 5));
        assert_eq!(rects[4], Rect::new(2, 8, 10, 5));
        assert_eq!(rects[15], Rect::new(32, 18, 10, 5));
    }

    #[test]
    fn cell_rects_cap_tile_height() {
        let rects = cell_rects(Rect::new(0, 0, 40, 100), 4, 2);
        assert!(rects.iter().all(|r| r.height == MAX_TILE_HEIGHT));
    }

    #[test]
    fn cell_rects_ragged_last_row() {
        let rects = cell_rects(Rect::new(0, 0, 30, 10), 5, 3);
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[4], Rect::new(10, 5, 10, 5));
    }

    #[test]
    fn cell_rects_empty() {
        assert!(cell_rects(Rect::new(0, 0, 30, 10), 0, 3).is_empty());
        assert!(cell_rects(Rect::new(0, 0, 30, 10), 4, 0).is_empty());
    }

    #[test]
    fn clickable_list_registers_rows() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("VICTORY"));
        cl.push(Line::from(""));
        cl.push_clickable(Line::from("play again"), 7);
        assert_eq!(cl.len(), 3);

        let area = Rect::new(10, 5, 30, 7);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1);
        // line 2 → row 5 + 1 + 2 = 8
        assert_eq!(cs.hit_test(15, 8), Some(7));
        assert_eq!(cs.hit_test(15, 7), None);
        assert_eq!(cl.into_lines().len(), 3);
    }

    #[test]
    fn clickable_list_clipped_by_area() {
        let mut cl = ClickableList::new();
        for i in 0..10 {
            cl.push_clickable(Line::from(format!("row {i}")), i);
        }
        let area = Rect::new(0, 0, 20, 3);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0);
        assert_eq!(cs.targets.len(), 3);
    }
}
