//! Memory Match game logic: a pure state machine, no rendering or IO.
//!
//! Input arrives as method calls (`start_round`, `flip`, `fire`); output
//! leaves as [`Effect`]s in an outbox the driver drains after each call.

use tracing::{debug, info};

use super::config::Timing;
use super::effect::{Cue, Effect, OverlayKind};
use super::error::RoundError;
use super::scheduler::{Scheduler, Timer, TimerHandle, TimerQueue};
use super::state::{CardId, Deck, Outcome, Phase, RoundState};

pub struct GameStateMachine<S> {
    timing: Timing,
    scheduler: S,
    state: RoundState,
    deck: Option<Deck>,
    /// Bumped on every round start; stamped on every timer.
    generation: u64,
    countdown: Option<TimerHandle>,
    reveal: Option<TimerHandle>,
    grace: Option<TimerHandle>,
    overlay: Option<OverlayKind>,
    effects: Vec<Effect>,
}

impl<S: Scheduler> GameStateMachine<S> {
    /// An idle machine showing the start banner.
    pub fn new(timing: Timing, scheduler: S) -> Self {
        let mut machine = Self {
            timing,
            scheduler,
            state: RoundState::idle(0),
            deck: None,
            generation: 0,
            countdown: None,
            reveal: None,
            grace: None,
            overlay: None,
            effects: Vec::new(),
        };
        machine.show_overlay(OverlayKind::Start);
        machine
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[cfg(test)]
    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    pub fn overlay(&self) -> Option<OverlayKind> {
        self.overlay
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[cfg(test)]
    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_some()
    }

    /// Hand the accumulated effects to the caller.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ── Round lifecycle ──────────────────────────────────────

    /// Start (or restart) a round. Fails without side effects on a
    /// malformed deck or a zero duration.
    pub fn start_round(&mut self, total_seconds: u32, cards: &[CardId]) -> Result<(), RoundError> {
        if total_seconds == 0 {
            return Err(RoundError::ZeroDuration);
        }
        let deck = Deck::pair_up(cards)?;

        self.cancel_timers();
        self.generation += 1;
        self.state = RoundState::running(total_seconds);

        self.effects.push(Effect::ShuffleDisplay(deck.ids()));
        for card in deck.cards() {
            self.effects.push(Effect::RenderFlip {
                card: card.id,
                face_up: false,
            });
        }
        self.deck = Some(deck);
        self.push_counters();
        self.effects.push(Effect::StartMusic);

        self.countdown = Some(self.scheduler.schedule_repeating(
            self.timing.tick_interval_ms,
            Timer::Countdown {
                round: self.generation,
            },
        ));
        info!(
            round = self.generation,
            cards = cards.len(),
            total_seconds,
            "round started"
        );
        Ok(())
    }

    /// Hide the visible overlay, if any, and report which one it was.
    /// Called once `start_round` has succeeded.
    pub fn dismiss_overlay(&mut self) -> Option<OverlayKind> {
        let kind = self.overlay.take()?;
        self.effects.push(Effect::HideOverlay(kind));
        Some(kind)
    }

    // ── Flipping ─────────────────────────────────────────────

    pub fn can_flip(&self, card: CardId) -> bool {
        let in_deck = self.deck.as_ref().is_some_and(|d| d.contains(card));
        in_deck
            && self.state.is_running()
            && !self.state.busy
            && !self.state.matched.contains(&card)
            && self.state.pending != Some(card)
    }

    /// Flip a card face up. Rejected flips are silent no-ops.
    pub fn flip(&mut self, card: CardId) {
        if !self.can_flip(card) {
            debug!(%card, busy = self.state.busy, phase = ?self.state.phase, "flip rejected");
            return;
        }

        self.state.click_count += 1;
        self.effects.push(Effect::RenderFlip {
            card,
            face_up: true,
        });
        self.effects.push(Effect::PlayCue(Cue::Flip));
        self.push_counters();

        match self.state.pending.take() {
            None => {
                debug!(%card, "first card of pair");
                self.state.pending = Some(card);
            }
            Some(first) => self.resolve_match(card, first),
        }
    }

    fn resolve_match(&mut self, a: CardId, b: CardId) {
        let Some(deck) = self.deck.as_ref() else {
            return;
        };
        let deck_len = deck.len();

        if deck.pair_key(a) == deck.pair_key(b) {
            self.state.matched.insert(a);
            self.state.matched.insert(b);
            self.effects.push(Effect::PlayCue(Cue::Match));
            debug!(%a, %b, matched = self.state.matched.len(), "pair matched");
            if self.state.matched.len() == deck_len {
                self.victory();
            }
        } else {
            debug!(%a, %b, "pair mismatched");
            self.state.busy = true;
            self.reveal = Some(self.scheduler.schedule_once(
                self.timing.mismatch_reveal_ms,
                Timer::MismatchReveal {
                    round: self.generation,
                    first: a,
                    second: b,
                },
            ));
        }
    }

    // ── Timers ───────────────────────────────────────────────

    /// Deliver a timer scheduled earlier. Timers from superseded rounds are
    /// ignored.
    pub fn fire(&mut self, timer: Timer) {
        if timer.round() != self.generation {
            debug!(?timer, round = self.generation, "stale timer ignored");
            return;
        }
        match timer {
            Timer::Countdown { .. } => self.tick(),
            Timer::MismatchReveal { first, second, .. } => {
                self.reveal = None;
                if !self.state.is_running() {
                    return;
                }
                for card in [first, second] {
                    self.effects.push(Effect::RenderFlip {
                        card,
                        face_up: false,
                    });
                }
                self.state.busy = false;
            }
            Timer::VictoryGrace { .. } => {
                self.grace = None;
                self.hide_cards(|_| true);
            }
        }
    }

    /// One countdown step. Ends the round when the clock reaches zero.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        self.push_counters();
        if self.state.remaining_seconds == 0 {
            self.game_over();
        }
    }

    // ── Round endings ────────────────────────────────────────

    fn victory(&mut self) {
        self.end_round(Outcome::Victory);
        self.effects.push(Effect::PlayCue(Cue::Victory));
        self.show_overlay(OverlayKind::Victory);
        self.grace = Some(self.scheduler.schedule_once(
            self.timing.victory_grace_ms,
            Timer::VictoryGrace {
                round: self.generation,
            },
        ));
    }

    fn game_over(&mut self) {
        self.end_round(Outcome::GameOver);
        self.state.busy = false;
        self.state.pending = None;
        self.effects.push(Effect::PlayCue(Cue::GameOver));
        let matched = self.state.matched.clone();
        self.hide_cards(|card| !matched.contains(&card));
        self.show_overlay(OverlayKind::GameOver);
    }

    fn end_round(&mut self, outcome: Outcome) {
        self.cancel_timers();
        self.state.phase = Phase::Ended;
        self.state.outcome = Some(outcome);
        self.effects.push(Effect::StopMusic);
        info!(
            round = self.generation,
            ?outcome,
            clicks = self.state.click_count,
            remaining = self.state.remaining_seconds,
            "round ended"
        );
    }

    // ── Helpers ──────────────────────────────────────────────

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.countdown.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.reveal.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.grace.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn hide_cards(&mut self, filter: impl Fn(CardId) -> bool) {
        let Some(deck) = self.deck.as_ref() else {
            return;
        };
        for card in deck.cards().iter().map(|c| c.id).filter(|&id| filter(id)) {
            self.effects.push(Effect::RenderFlip {
                card,
                face_up: false,
            });
        }
    }

    fn show_overlay(&mut self, kind: OverlayKind) {
        self.overlay = Some(kind);
        self.effects.push(Effect::ShowOverlay(kind));
    }

    fn push_counters(&mut self) {
        self.effects.push(Effect::RenderCounters {
            clicks: self.state.click_count,
            remaining_seconds: self.state.remaining_seconds,
        });
    }
}

impl GameStateMachine<TimerQueue> {
    /// Move the virtual clock forward by `ms`, firing every timer that falls
    /// due. Timers scheduled or cancelled while firing are honoured.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some(timer) = self.scheduler.pop_due(until) {
            self.fire(timer);
        }
        self.scheduler.set_now(until);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn machine(total: u32, n: usize) -> GameStateMachine<TimerQueue> {
        let mut m = GameStateMachine::new(Timing::default(), TimerQueue::new());
        let cards: Vec<CardId> = (0..n).map(CardId).collect();
        m.start_round(total, &cards).unwrap();
        m.drain_effects();
        m
    }

    #[derive(Clone, Debug)]
    enum Step {
        Flip(usize),
        Advance(u64),
    }

    fn arb_step(n: usize) -> impl Strategy<Value = Step> {
        prop_oneof![
            3 => (0..n + 1).prop_map(Step::Flip),
            1 => (0u64..2500).prop_map(Step::Advance),
        ]
    }

    proptest! {
        #[test]
        fn prop_pair_keys_form_exact_pairs(pairs in 1usize..40) {
            let m = machine(10, pairs * 2);
            let mut counts: HashMap<u32, usize> = HashMap::new();
            for card in m.deck().unwrap().cards() {
                *counts.entry(card.pair_key).or_default() += 1;
            }
            prop_assert_eq!(counts.len(), pairs);
            prop_assert!(counts.values().all(|&c| c == 2));
        }

        #[test]
        fn prop_rejected_flip_changes_nothing(
            steps in prop::collection::vec(arb_step(8), 0..60),
            probe in 0usize..9,
        ) {
            let mut m = machine(30, 8);
            for step in steps {
                match step {
                    Step::Flip(i) => m.flip(CardId(i)),
                    Step::Advance(ms) => m.advance(ms),
                }
            }
            let card = CardId(probe);
            if !m.can_flip(card) {
                let before = m.state().clone();
                m.drain_effects();
                m.flip(card);
                prop_assert_eq!(m.state(), &before);
                prop_assert!(m.drain_effects().is_empty());
            }
        }

        #[test]
        fn prop_invariants_hold_over_random_play(
            steps in prop::collection::vec(arb_step(8), 0..80),
        ) {
            let mut m = machine(20, 8);
            let mut ended = 0;
            let mut last_matched = 0;
            let mut last_remaining = m.state().remaining_seconds;
            for step in steps {
                let was_running = m.state().is_running();
                match step {
                    Step::Flip(i) => m.flip(CardId(i)),
                    Step::Advance(ms) => m.advance(ms),
                }
                let s = m.state();
                prop_assert_eq!(s.matched.len() % 2, 0);
                prop_assert!(s.matched.len() <= 8);
                prop_assert!(s.matched.len() >= last_matched);
                let grew = s.matched.len() - last_matched;
                prop_assert!(grew == 0 || grew == 2 || matches!(step, Step::Advance(_)));
                if let Some(p) = s.pending {
                    prop_assert!(!s.matched.contains(&p));
                }
                prop_assert!(s.remaining_seconds <= last_remaining);
                if let Step::Advance(ms) = step {
                    let expected_drop = (last_remaining).min((ms / 1000 + 1) as u32);
                    prop_assert!(last_remaining - s.remaining_seconds <= expected_drop);
                }
                if was_running && s.phase == Phase::Ended {
                    ended += 1;
                    prop_assert!(!m.is_counting_down());
                }
                if s.phase == Phase::Ended {
                    prop_assert!(s.remaining_seconds == 0 || s.matched.len() == 8);
                }
                last_matched = s.matched.len();
                last_remaining = s.remaining_seconds;
            }
            prop_assert!(ended <= 1);
        }

        #[test]
        fn prop_each_tick_drops_one_second(total in 1u32..120, ticks in 0u32..200) {
            let mut m = machine(total, 4);
            for i in 0..ticks {
                let before = m.state().remaining_seconds;
                m.tick();
                let after = m.state().remaining_seconds;
                if i < total {
                    prop_assert_eq!(before - after, 1);
                } else {
                    prop_assert_eq!(after, 0);
                }
            }
            prop_assert_eq!(m.state().phase == Phase::Ended, ticks >= total);
        }
    }
}
