/// Memory Match round state: cards, deck and the per-round bookkeeping.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::error::DeckError;

/// Opaque card handle. Wraps the card's logical slot as supplied by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub usize);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A card with its hidden pair key. Two cards match iff their keys are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub pair_key: u32,
}

/// The cards of one round, in logical slot order.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    keys: HashMap<CardId, u32>,
}

impl Deck {
    /// Build a deck from card handles, pairing them by logical slot:
    /// slots `2k` and `2k + 1` share key `k + 1`.
    pub fn pair_up(handles: &[CardId]) -> Result<Self, DeckError> {
        if handles.is_empty() {
            return Err(DeckError::Empty);
        }
        if handles.len() % 2 != 0 {
            return Err(DeckError::OddLength(handles.len()));
        }

        let mut cards = Vec::with_capacity(handles.len());
        let mut keys = HashMap::with_capacity(handles.len());
        for (slot, &id) in handles.iter().enumerate() {
            let pair_key = (slot / 2) as u32 + 1;
            if keys.insert(id, pair_key).is_some() {
                return Err(DeckError::DuplicateCard(id));
            }
            cards.push(Card { id, pair_key });
        }
        Ok(Self { cards, keys })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.keys.contains_key(&id)
    }

    pub fn pair_key(&self, id: CardId) -> Option<u32> {
        self.keys.get(&id).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// How an ended round finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    GameOver,
}

/// Mutable state of a single round. Replaced wholesale on every start.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub click_count: u32,
    pub matched: BTreeSet<CardId>,
    pub pending: Option<CardId>,
    pub busy: bool,
    pub phase: Phase,
    pub outcome: Option<Outcome>,
}

impl RoundState {
    /// State before the first round has been started.
    pub fn idle(total_seconds: u32) -> Self {
        Self {
            remaining_seconds: total_seconds,
            total_seconds,
            click_count: 0,
            matched: BTreeSet::new(),
            pending: None,
            busy: false,
            phase: Phase::Idle,
            outcome: None,
        }
    }

    /// Fresh state for a round that starts right now.
    pub fn running(total_seconds: u32) -> Self {
        Self {
            phase: Phase::Running,
            ..Self::idle(total_seconds)
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}
