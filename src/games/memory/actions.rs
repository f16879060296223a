//! Semantic action IDs for Memory Match click targets.

use super::state::CardId;

pub const DISMISS_OVERLAY: u16 = 1;

/// Card targets occupy `CARD_BASE..`, one ID per card handle.
pub const CARD_BASE: u16 = 100;

/// Most cards that still get a distinct action ID.
pub const MAX_CARDS: usize = (u16::MAX - CARD_BASE) as usize + 1;

pub fn card_action(card: CardId) -> u16 {
    CARD_BASE + card.0 as u16
}

pub fn card_from_action(action_id: u16) -> Option<CardId> {
    action_id
        .checked_sub(CARD_BASE)
        .map(|slot| CardId(slot as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_actions_round_trip_handles() {
        assert_eq!(card_from_action(card_action(CardId(11))), Some(CardId(11)));
    }

    #[test]
    fn non_card_actions_map_to_none() {
        assert_eq!(card_from_action(DISMISS_OVERLAY), None);
        assert_eq!(card_from_action(CARD_BASE - 1), None);
    }

    #[test]
    fn last_card_gets_last_action_id() {
        let last = CardId(MAX_CARDS - 1);
        assert_eq!(card_action(last), u16::MAX);
        assert_eq!(card_from_action(u16::MAX), Some(last));
    }
}
