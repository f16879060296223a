//! Sound for Memory Match: a looping background track plus four one-shot cues.
//!
//! In the browser each sound is an `HtmlAudioElement`. Failing to create or
//! play one is logged and otherwise ignored. Native builds (tests) get a
//! silent stand-in with the same interface.

use std::fmt::Debug;

use tracing::warn;

use super::config::AudioConfig;
use super::effect::Cue;

/// Log a failed playback attempt. Returns whether the sound played.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn report_playback<T, E: Debug>(what: &str, outcome: Result<T, E>) -> bool {
    match outcome {
        Ok(_) => true,
        Err(e) => {
            warn!(what, error = ?e, "audio playback failed");
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use tracing::warn;
    use wasm_bindgen_futures::{spawn_local, JsFuture};
    use web_sys::HtmlAudioElement;

    use super::{report_playback, AudioConfig, Cue};

    pub struct AudioCues {
        music: Option<HtmlAudioElement>,
        flip: Option<HtmlAudioElement>,
        match_: Option<HtmlAudioElement>,
        victory: Option<HtmlAudioElement>,
        game_over: Option<HtmlAudioElement>,
    }

    fn load(src: &str) -> Option<HtmlAudioElement> {
        match HtmlAudioElement::new_with_src(src) {
            Ok(el) => Some(el),
            Err(e) => {
                warn!(src, error = ?e, "audio element could not be created");
                None
            }
        }
    }

    /// `play()` settles asynchronously: autoplay blocks and missing or
    /// undecodable files arrive as a rejected promise.
    fn play(el: &Option<HtmlAudioElement>, what: &'static str) {
        let Some(el) = el else {
            return;
        };
        el.set_current_time(0.0);
        let promise = match el.play() {
            Ok(p) => p,
            Err(e) => {
                report_playback::<(), _>(what, Err(e));
                return;
            }
        };
        spawn_local(async move {
            report_playback(what, JsFuture::from(promise).await);
        });
    }

    impl AudioCues {
        pub fn new(config: &AudioConfig) -> Self {
            let music = load(&config.music);
            if let Some(m) = &music {
                m.set_loop(true);
                m.set_volume(config.volume.clamp(0.0, 1.0));
            }
            Self {
                music,
                flip: load(&config.flip),
                match_: load(&config.match_),
                victory: load(&config.victory),
                game_over: load(&config.game_over),
            }
        }

        pub fn play(&self, cue: Cue) {
            match cue {
                Cue::Flip => play(&self.flip, "flip"),
                Cue::Match => play(&self.match_, "match"),
                Cue::Victory => play(&self.victory, "victory"),
                Cue::GameOver => play(&self.game_over, "game over"),
            }
        }

        pub fn start_music(&self) {
            play(&self.music, "music");
        }

        pub fn stop_music(&self) {
            if let Some(m) = &self.music {
                if let Err(e) = m.pause() {
                    warn!(error = ?e, "could not pause music");
                }
                m.set_current_time(0.0);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use tracing::trace;

    use super::{AudioConfig, Cue};

    pub struct AudioCues;

    impl AudioCues {
        pub fn new(_config: &AudioConfig) -> Self {
            AudioCues
        }

        pub fn play(&self, cue: Cue) {
            trace!(?cue, "cue (silent)");
        }

        pub fn start_music(&self) {
            trace!("music start (silent)");
        }

        pub fn stop_music(&self) {
            trace!("music stop (silent)");
        }
    }
}

pub use backend::AudioCues;
