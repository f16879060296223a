mod games;
mod input;
mod logging;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::memory::config::MemoryConfig;
use games::memory::MemoryGame;
use games::Game;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::FrameClock;
use tracing::{debug, info, warn};

/// Page element that may carry a JSON `MemoryConfig`.
const CONFIG_ELEMENT_ID: &str = "memory-config";

/// Read the page's config element, falling back to defaults when it is
/// missing or invalid.
fn load_config() -> MemoryConfig {
    let json = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());

    let Some(json) = json else {
        return MemoryConfig::default();
    };
    match MemoryConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring page config, using defaults");
            MemoryConfig::default()
        }
    }
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Query the grid container's bounding rect and convert pixel coordinates to
/// a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    debug!(mouse_x, mouse_y, col, row, targets = cs.targets.len(), "click");
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    let config = load_config();
    let seed = config
        .seed
        .unwrap_or_else(|| (js_sys::Math::random() * (1u64 << 53) as f64) as u64);
    info!(cards = config.cards.len(), total_seconds = config.total_seconds, seed, "memory match loaded");

    let game = Rc::new(RefCell::new(MemoryGame::new(config, seed)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let clock = Rc::new(RefCell::new(FrameClock::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let action = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                .and_then(|(col, row)| cs.hit_test(col, row));
            drop(cs);

            if let Some(id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c,
                KeyCode::Left => 'h',
                KeyCode::Down => 'j',
                KeyCode::Up => 'k',
                KeyCode::Right => 'l',
                KeyCode::Enter => ' ',
                _ => return,
            };
            game.borrow_mut().handle_input(&InputEvent::Key(key));
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let elapsed = clock.borrow_mut().update(performance_now());
            let mut g = game.borrow_mut();
            if elapsed > 0 {
                g.tick(elapsed);
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            g.render(f, size, &click_state);
        }
    });

    Ok(())
}
