//! Frame clock: turns `performance.now()` timestamps into whole elapsed
//! milliseconds for the game's virtual timer queue.
//!
//! `draw_web()` fires at ~60fps with a variable, fractional delta. The
//! fractional remainder is carried over so no time is lost between frames,
//! and each delta is clamped so a backgrounded tab pauses the game instead
//! of replaying minutes of countdown in a single frame.

/// Longest gap between two frames that still counts as play time.
const MAX_FRAME_MS: f64 = 500.0;

pub struct FrameClock {
    /// Sub-millisecond remainder not yet handed out.
    carry: f64,
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            carry: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed the frame's timestamp. Returns the whole milliseconds of play
    /// time that passed since the previous frame (0 on the first frame).
    pub fn update(&mut self, now_ms: f64) -> u64 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.carry += delta;
        let whole = self.carry.floor();
        self.carry -= whole;
        whole as u64
    }
}
