//! Memory Match configuration.
//!
//! Read as camelCase JSON from an optional
//! `<script id="memory-config" type="application/json">` element on the page.
//! Every field has a default, so `{}` is a valid config.

use serde::{Deserialize, Serialize};

use super::actions::MAX_CARDS;
use super::error::{ConfigError, RoundError};
use super::state::{CardId, Deck};

/// Face labels, listed pairwise: slot `2k` and `2k + 1` form a pair.
const DEFAULT_FACES: [&str; 8] = [
    "Bat", "Bones", "Cauldron", "Dracula", "Eye", "Ghost", "Pumpkin", "Skull",
];

/// Delays the state machine schedules, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub tick_interval_ms: u64,
    pub mismatch_reveal_ms: u64,
    pub victory_grace_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            mismatch_reveal_ms: 1000,
            victory_grace_ms: 1000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioConfig {
    pub music: String,
    pub flip: String,
    #[serde(rename = "match")]
    pub match_: String,
    pub victory: String,
    pub game_over: String,
    /// Background music volume, 0.0..=1.0.
    pub volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music: "audio/creepy.mp3".into(),
            flip: "audio/flip.wav".into(),
            match_: "audio/match.wav".into(),
            victory: "audio/victory.wav".into(),
            game_over: "audio/gameover.wav".into(),
            volume: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryConfig {
    pub total_seconds: u32,
    /// One label per card. Matching cards must be adjacent.
    pub cards: Vec<String>,
    pub tick_interval_ms: u64,
    pub mismatch_reveal_ms: u64,
    pub victory_grace_ms: u64,
    /// Seed for the display shuffle. `None` picks one at startup.
    pub seed: Option<u64>,
    pub audio: AudioConfig,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            total_seconds: 50,
            cards: DEFAULT_FACES
                .iter()
                .flat_map(|face| [face.to_string(), face.to_string()])
                .collect(),
            tick_interval_ms: timing.tick_interval_ms,
            mismatch_reveal_ms: timing.mismatch_reveal_ms,
            victory_grace_ms: timing.victory_grace_ms,
            seed: None,
            audio: AudioConfig::default(),
        }
    }
}

impl MemoryConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings `start_round` would otherwise reject, plus the
    /// board's limit on distinct card targets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_seconds == 0 {
            return Err(RoundError::ZeroDuration.into());
        }
        if self.cards.len() > MAX_CARDS {
            return Err(ConfigError::TooManyCards {
                count: self.cards.len(),
                max: MAX_CARDS,
            });
        }
        Deck::pair_up(&self.card_ids()).map_err(RoundError::from)?;
        Ok(())
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        (0..self.cards.len()).map(CardId).collect()
    }

    pub fn timing(&self) -> Timing {
        Timing {
            tick_interval_ms: self.tick_interval_ms,
            mismatch_reveal_ms: self.mismatch_reveal_ms,
            victory_grace_ms: self.victory_grace_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::memory::error::DeckError;

    #[test]
    fn default_config_is_valid() {
        let c = MemoryConfig::default();
        assert_eq!(c.total_seconds, 50);
        assert_eq!(c.cards.len(), 16);
        assert_eq!(c.cards[0], c.cards[1]);
        assert_ne!(c.cards[1], c.cards[2]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let c = MemoryConfig::from_json("{}").unwrap();
        assert_eq!(c, MemoryConfig::default());
    }

    #[test]
    fn camel_case_fields_parse() {
        let c = MemoryConfig::from_json(
            r#"{"totalSeconds": 30, "cards": ["a","a","b","b"], "mismatchRevealMs": 750,
                "audio": {"gameOver": "x.wav", "match": "m.wav"}}"#,
        )
        .unwrap();
        assert_eq!(c.total_seconds, 30);
        assert_eq!(c.card_ids(), vec![CardId(0), CardId(1), CardId(2), CardId(3)]);
        assert_eq!(c.timing().mismatch_reveal_ms, 750);
        assert_eq!(c.timing().tick_interval_ms, 1000);
        assert_eq!(c.audio.game_over, "x.wav");
        assert_eq!(c.audio.match_, "m.wav");
        assert_eq!(c.audio.flip, "audio/flip.wav");
    }

    #[test]
    fn odd_card_count_rejected() {
        let err = MemoryConfig::from_json(r#"{"cards": ["a","a","b"]}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Round(RoundError::Deck(DeckError::OddLength(3)))
        ));
    }

    #[test]
    fn zero_duration_rejected() {
        let err = MemoryConfig::from_json(r#"{"totalSeconds": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Round(RoundError::ZeroDuration)));
    }

    #[test]
    fn card_count_capped_by_action_ids() {
        let over = MemoryConfig {
            cards: vec!["x".to_string(); MAX_CARDS + 2],
            ..MemoryConfig::default()
        };
        assert!(matches!(
            over.validate(),
            Err(ConfigError::TooManyCards { count, max }) if count == MAX_CARDS + 2 && max == MAX_CARDS
        ));

        let full = MemoryConfig {
            cards: vec!["x".to_string(); MAX_CARDS],
            ..MemoryConfig::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn malformed_json_rejected() {
        let err = MemoryConfig::from_json("{ totalSeconds: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
