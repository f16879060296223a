/// Board model for the browser front end.
///
/// `BoardView` is the [`Presentation`] the driver feeds effects into. It keeps
/// only what the renderer needs (display order, faces, counters, overlay) and
/// forwards sound effects to [`AudioCues`].

use super::audio::AudioCues;
use super::config::MemoryConfig;
use super::effect::{Cue, OverlayKind, Presentation};
use super::state::CardId;

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

pub struct BoardView {
    /// Face label per card, indexed by `CardId`.
    faces: Vec<String>,
    face_up: Vec<bool>,
    /// Cards in on-screen order.
    order: Vec<CardId>,
    clicks: u32,
    remaining_seconds: u32,
    overlay: Option<OverlayKind>,
    /// Keyboard cursor, as a position in `order`.
    cursor: usize,
    rng_seed: u64,
    music_on: bool,
    audio: AudioCues,
}

impl BoardView {
    pub fn new(config: &MemoryConfig, seed: u64) -> Self {
        let ids = config.card_ids();
        Self {
            faces: config.cards.clone(),
            face_up: vec![false; ids.len()],
            order: ids,
            clicks: 0,
            remaining_seconds: config.total_seconds,
            overlay: None,
            cursor: 0,
            rng_seed: seed,
            music_on: false,
            audio: AudioCues::new(&config.audio),
        }
    }

    /// Card handles in logical slot order, as handed to `start_round`.
    pub fn deck(&self) -> Vec<CardId> {
        (0..self.faces.len()).map(CardId).collect()
    }

    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    pub fn face(&self, card: CardId) -> &str {
        self.faces.get(card.0).map(String::as_str).unwrap_or("?")
    }

    pub fn is_face_up(&self, card: CardId) -> bool {
        self.face_up.get(card.0).copied().unwrap_or(false)
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn overlay(&self) -> Option<OverlayKind> {
        self.overlay
    }

    pub fn music_on(&self) -> bool {
        self.music_on
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_card(&self) -> Option<CardId> {
        self.order.get(self.cursor).copied()
    }

    /// Move the cursor within a grid `columns` wide, clamped to the board.
    pub fn move_cursor(&mut self, dx: i32, dy: i32, columns: usize) {
        if self.order.is_empty() || columns == 0 {
            return;
        }
        let len = self.order.len() as i32;
        let cols = columns as i32;
        let rows = (len + cols - 1) / cols;
        let x = (self.cursor as i32 % cols + dx).clamp(0, cols - 1);
        let y = (self.cursor as i32 / cols + dy).clamp(0, rows - 1);
        self.cursor = (y * cols + x).min(len - 1) as usize;
    }

    fn shuffle(&mut self) {
        for i in (1..self.order.len()).rev() {
            self.rng_seed = next_rng(self.rng_seed);
            let j = ((self.rng_seed >> 33) % (i as u64 + 1)) as usize;
            self.order.swap(i, j);
        }
    }
}

impl Presentation for BoardView {
    fn render_flip(&mut self, card: CardId, face_up: bool) {
        if let Some(slot) = self.face_up.get_mut(card.0) {
            *slot = face_up;
        }
    }

    fn render_shuffled_order(&mut self, deck: &[CardId]) {
        self.order = deck.to_vec();
        self.shuffle();
        self.cursor = 0;
    }

    fn render_counters(&mut self, clicks: u32, remaining_seconds: u32) {
        self.clicks = clicks;
        self.remaining_seconds = remaining_seconds;
    }

    fn show_overlay(&mut self, kind: OverlayKind) {
        self.overlay = Some(kind);
    }

    fn hide_overlay(&mut self, kind: OverlayKind) {
        if self.overlay == Some(kind) {
            self.overlay = None;
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        self.audio.play(cue);
    }

    fn start_background_music(&mut self) {
        self.music_on = true;
        self.audio.start_music();
    }

    fn stop_background_music(&mut self) {
        self.music_on = false;
        self.audio.stop_music();
    }
}
