//! Effects emitted by the state machine and the presentation contract that
//! executes them.
//!
//! The state machine never touches the DOM or audio devices. It appends
//! [`Effect`]s to an outbox; the driver drains the outbox and hands it to a
//! [`Presentation`] via [`present`].

use super::state::CardId;

/// End-of-round and start banners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayKind {
    /// "Click to start" banner shown before the first round.
    Start,
    Victory,
    GameOver,
}

/// One-shot sound cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Flip,
    Match,
    Victory,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    RenderFlip { card: CardId, face_up: bool },
    /// Ask the board to shuffle its display order. Pairing is unaffected.
    ShuffleDisplay(Vec<CardId>),
    RenderCounters { clicks: u32, remaining_seconds: u32 },
    ShowOverlay(OverlayKind),
    HideOverlay(OverlayKind),
    PlayCue(Cue),
    StartMusic,
    StopMusic,
}

/// What a front end must provide to the game core.
pub trait Presentation {
    fn render_flip(&mut self, card: CardId, face_up: bool);
    fn render_shuffled_order(&mut self, deck: &[CardId]);
    fn render_counters(&mut self, clicks: u32, remaining_seconds: u32);
    fn show_overlay(&mut self, kind: OverlayKind);
    fn hide_overlay(&mut self, kind: OverlayKind);
    fn play_cue(&mut self, cue: Cue);
    fn start_background_music(&mut self);
    fn stop_background_music(&mut self);
}

/// Apply a batch of effects, in order.
pub fn present<P, I>(effects: I, target: &mut P)
where
    P: Presentation + ?Sized,
    I: IntoIterator<Item = Effect>,
{
    for effect in effects {
        match effect {
            Effect::RenderFlip { card, face_up } => target.render_flip(card, face_up),
            Effect::ShuffleDisplay(deck) => target.render_shuffled_order(&deck),
            Effect::RenderCounters {
                clicks,
                remaining_seconds,
            } => target.render_counters(clicks, remaining_seconds),
            Effect::ShowOverlay(kind) => target.show_overlay(kind),
            Effect::HideOverlay(kind) => target.hide_overlay(kind),
            Effect::PlayCue(cue) => target.play_cue(cue),
            Effect::StartMusic => target.start_background_music(),
            Effect::StopMusic => target.stop_background_music(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Transcript(Vec<String>);

    impl Presentation for Transcript {
        fn render_flip(&mut self, card: CardId, face_up: bool) {
            self.0.push(format!("flip {card} {face_up}"));
        }
        fn render_shuffled_order(&mut self, deck: &[CardId]) {
            self.0.push(format!("shuffle {}", deck.len()));
        }
        fn render_counters(&mut self, clicks: u32, remaining_seconds: u32) {
            self.0.push(format!("counters {clicks} {remaining_seconds}"));
        }
        fn show_overlay(&mut self, kind: OverlayKind) {
            self.0.push(format!("show {kind:?}"));
        }
        fn hide_overlay(&mut self, kind: OverlayKind) {
            self.0.push(format!("hide {kind:?}"));
        }
        fn play_cue(&mut self, cue: Cue) {
            self.0.push(format!("cue {cue:?}"));
        }
        fn start_background_music(&mut self) {
            self.0.push("music on".into());
        }
        fn stop_background_music(&mut self) {
            self.0.push("music off".into());
        }
    }

    #[test]
    fn present_dispatches_in_order() {
        let mut t = Transcript::default();
        present(
            vec![
                Effect::ShuffleDisplay(vec![CardId(0), CardId(1)]),
                Effect::RenderFlip {
                    card: CardId(1),
                    face_up: true,
                },
                Effect::PlayCue(Cue::Flip),
                Effect::RenderCounters {
                    clicks: 1,
                    remaining_seconds: 49,
                },
                Effect::ShowOverlay(OverlayKind::Victory),
                Effect::HideOverlay(OverlayKind::Victory),
                Effect::StartMusic,
                Effect::StopMusic,
            ],
            &mut t,
        );
        assert_eq!(
            t.0,
            vec![
                "shuffle 2",
                "flip #1 true",
                "cue Flip",
                "counters 1 49",
                "show Victory",
                "hide Victory",
                "music on",
                "music off",
            ]
        );
    }

    #[test]
    fn present_empty_batch_is_noop() {
        let mut t = Transcript::default();
        present(Vec::new(), &mut t);
        assert!(t.0.is_empty());
    }
}
