use crate::model::card::{Card, MAX_CARD_ID};

/// Set of cards backed by a bitmask over card ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u64);

impl CardSet {
    pub const EMPTY: Self = Self(0);

    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut set = Self::EMPTY;
        for &card in cards {
            set.insert(card);
        }
        set
    }

    /// Returns true when the card was not present before.
    pub fn insert(&mut self, card: Card) -> bool {
        let bit = Self::bit(card);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn remove(&mut self, card: Card) -> bool {
        let bit = Self::bit(card);
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub fn contains(self, card: Card) -> bool {
        self.0 & Self::bit(card) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    /// Cards in id order.
    pub fn iter(self) -> impl Iterator<Item = Card> {
        (1..=MAX_CARD_ID)
            .filter(move |id| self.0 & (1u64 << id) != 0)
            .filter_map(Card::from_id)
    }

    /// Every card of the deck that is not in this set, in id order.
    pub fn complement(self) -> impl Iterator<Item = Card> {
        (1..=MAX_CARD_ID)
            .filter(move |id| self.0 & (1u64 << id) == 0)
            .filter_map(Card::from_id)
    }

    fn bit(card: Card) -> u64 {
        1u64 << card.id()
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::EMPTY;
        for card in iter {
            set.insert(card);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::CardSet;
    use crate::model::card::Card;

    #[test]
    fn insert_and_remove_track_membership() {
        let mut set = CardSet::EMPTY;
        let card: Card = "7G".parse().unwrap();
        assert!(set.insert(card));
        assert!(!set.insert(card));
        assert!(set.contains(card));
        assert_eq!(set.len(), 1);
        assert!(set.remove(card));
        assert!(set.is_empty());
    }

    #[test]
    fn complement_covers_rest_of_deck() {
        let set: CardSet = [Card::Wizard(0), Card::Jester(3)].into_iter().collect();
        assert_eq!(set.complement().count(), 58);
        assert!(set.complement().all(|card| !set.contains(card)));
    }

    #[test]
    fn iter_returns_cards_in_id_order() {
        let set: CardSet = ["Z", "3R", "1B"]
            .iter()
            .map(|text| text.parse::<Card>().unwrap())
            .collect();
        let ids: Vec<u8> = set.iter().map(Card::id).collect();
        assert_eq!(ids, vec![1, 29, 57]);
    }
}
