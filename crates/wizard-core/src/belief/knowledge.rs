//! Suits each seat is known to have run out of.

use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::suit::Suit;
use crate::model::trick::Trick;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SuitMask(u8);

impl SuitMask {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, suit: Suit) -> bool {
        let bit = 1 << suit as u8;
        self.0 & bit != 0
    }

    pub fn with(mut self, suit: Suit) -> Self {
        let bit = 1 << suit as u8;
        self.0 |= bit;
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether a seat with this mask could still hold `card`. Specials are
    /// never excluded.
    pub fn allows(self, card: Card) -> bool {
        card.suit().is_none_or(|suit| !self.contains(suit))
    }
}

/// Per-seat exhausted suits, built from completed tricks of the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitKnowledge {
    missing: Vec<SuitMask>,
}

impl SuitKnowledge {
    pub fn new(player_count: usize) -> Self {
        Self {
            missing: vec![SuitMask::EMPTY; player_count],
        }
    }

    pub fn player_count(&self) -> usize {
        self.missing.len()
    }

    pub fn missing(&self, seat: Seat) -> SuitMask {
        self.missing[seat.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.missing.iter().all(|mask| mask.is_empty())
    }

    /// Returns true when this is new information.
    pub fn mark_missing(&mut self, seat: Seat, suit: Suit) -> bool {
        let mask = &mut self.missing[seat.index()];
        if mask.contains(suit) {
            return false;
        }
        *mask = mask.with(suit);
        true
    }

    /// A numbered card off the suit to follow proves the seat had none of it.
    /// Replaying the same trick changes nothing.
    pub fn observe_trick(&mut self, trick: &Trick) -> usize {
        let Some(suit_to_follow) = trick.suit_to_follow() else {
            return 0;
        };
        let mut learned = 0;
        for play in trick.plays() {
            if let Some(suit) = play.card.suit() {
                if suit != suit_to_follow && self.mark_missing(play.seat, suit_to_follow) {
                    learned += 1;
                }
            }
        }
        learned
    }

    pub fn reset(&mut self) {
        self.missing.fill(SuitMask::EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::{SuitKnowledge, SuitMask};
    use crate::model::card::Card;
    use crate::model::player::Seat;
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;

    fn trick(leader: u8, trump: Option<Suit>, cards: &[&str]) -> Trick {
        let count = cards.len();
        let mut trick = Trick::new(Seat::new(leader), trump, count);
        let mut seat = Seat::new(leader);
        for text in cards {
            trick.play(seat, text.parse().unwrap()).unwrap();
            seat = seat.next(count);
        }
        trick
    }

    #[test]
    fn mask_allows_specials() {
        let mask = SuitMask::EMPTY.with(Suit::Red);
        assert!(mask.allows(Card::Wizard(0)));
        assert!(mask.allows(Card::Jester(0)));
        assert!(!mask.allows("3R".parse().unwrap()));
        assert!(mask.allows("3G".parse().unwrap()));
    }

    #[test]
    fn off_suit_numbered_card_marks_seat() {
        let mut knowledge = SuitKnowledge::new(4);
        let played = trick(0, Some(Suit::Green), &["5B", "7G", "N", "Z"]);
        assert_eq!(knowledge.observe_trick(&played), 1);
        assert!(knowledge.missing(Seat::new(1)).contains(Suit::Blue));
        assert!(knowledge.missing(Seat::new(2)).is_empty());
        assert!(knowledge.missing(Seat::new(3)).is_empty());
    }

    #[test]
    fn observe_is_idempotent() {
        let mut knowledge = SuitKnowledge::new(3);
        let played = trick(1, None, &["9Y", "2R", "4B"]);
        knowledge.observe_trick(&played);
        let once = knowledge.clone();
        assert_eq!(knowledge.observe_trick(&played), 0);
        assert_eq!(knowledge, once);
    }

    #[test]
    fn wizard_lead_teaches_nothing() {
        let mut knowledge = SuitKnowledge::new(3);
        let played = trick(0, None, &["Z", "2R", "4B"]);
        assert_eq!(knowledge.observe_trick(&played), 0);
        assert!(knowledge.is_empty());
    }

    #[test]
    fn jester_lead_uses_first_numbered_suit() {
        let mut knowledge = SuitKnowledge::new(3);
        let played = trick(0, None, &["N", "2R", "4B"]);
        knowledge.observe_trick(&played);
        assert!(knowledge.missing(Seat::new(2)).contains(Suit::Red));
        assert!(knowledge.missing(Seat::new(0)).is_empty());
    }
}
