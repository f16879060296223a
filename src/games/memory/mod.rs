//! Memory Match: flip cards two at a time and find every pair before the
//! countdown runs out.

pub mod actions;
pub mod audio;
pub mod board;
pub mod config;
pub mod effect;
pub mod error;
pub mod logic;
pub mod render;
pub mod scheduler;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;
use tracing::error;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::widgets::grid_columns;

use actions::{card_from_action, DISMISS_OVERLAY};
use board::BoardView;
use config::MemoryConfig;
use effect::present;
use logic::GameStateMachine;
use scheduler::TimerQueue;
use state::CardId;

pub struct MemoryGame {
    config: MemoryConfig,
    pub machine: GameStateMachine<TimerQueue>,
    pub board: BoardView,
}

impl MemoryGame {
    /// A game waiting on its start banner. `seed` drives the display shuffle.
    pub fn new(config: MemoryConfig, seed: u64) -> Self {
        let machine = GameStateMachine::new(config.timing(), TimerQueue::new());
        let board = BoardView::new(&config, seed);
        let mut game = Self {
            config,
            machine,
            board,
        };
        game.flush();
        game
    }

    /// Start a fresh round from the visible banner. The banner stays up if
    /// the round cannot start.
    fn restart(&mut self) -> bool {
        if self.machine.overlay().is_none() {
            return false;
        }
        let deck = self.board.deck();
        match self.machine.start_round(self.config.total_seconds, &deck) {
            Ok(()) => {
                self.machine.dismiss_overlay();
            }
            Err(e) => error!(error = %e, "could not start round"),
        }
        self.flush();
        true
    }

    fn flip(&mut self, card: CardId) -> bool {
        self.machine.flip(card);
        self.flush();
        true
    }

    fn flush(&mut self) {
        present(self.machine.drain_effects(), &mut self.board);
    }
}

impl Game for MemoryGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Click(DISMISS_OVERLAY) => self.restart(),
            InputEvent::Click(id) => match card_from_action(id) {
                Some(card) => self.flip(card),
                None => false,
            },
            InputEvent::Key(key) => {
                let columns = grid_columns(self.board.order().len());
                match key {
                    'h' => self.board.move_cursor(-1, 0, columns),
                    'l' => self.board.move_cursor(1, 0, columns),
                    'k' => self.board.move_cursor(0, -1, columns),
                    'j' => self.board.move_cursor(0, 1, columns),
                    'r' => return self.restart(),
                    ' ' if self.machine.overlay().is_some() => return self.restart(),
                    ' ' => match self.board.cursor_card() {
                        Some(card) => return self.flip(card),
                        None => return false,
                    },
                    _ => return false,
                }
                true
            }
        }
    }

    fn tick(&mut self, elapsed_ms: u64) {
        self.machine.advance(elapsed_ms);
        self.flush();
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.board, self.machine.state(), f, area, click_state);
    }
}
