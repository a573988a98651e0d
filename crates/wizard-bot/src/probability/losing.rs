use std::cmp::Ordering;
use wizard_core::belief::SuitMask;
use wizard_core::model::card::{Card, compare};
use wizard_core::model::card_set::CardSet;
use wizard_core::model::suit::Suit;

/// Four suits plus one group for Wizards and Jesters.
pub const GROUPS: usize = 5;
const SPECIALS: usize = 4;

pub fn group_of(card: Card) -> usize {
    card.suit().map_or(SPECIALS, Suit::index)
}

/// Whether a seat with `mask` may hold cards of `group`.
pub fn group_allowed(mask: SuitMask, group: usize) -> bool {
    Suit::from_index(group).is_none_or(|suit| !mask.contains(suit))
}

/// Unseen cards per group, and how many of them lose to the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buckets {
    pub losing: [u8; GROUPS],
    pub unseen: [u8; GROUPS],
}

impl Buckets {
    pub fn tally(candidate: Card, trump: Option<Suit>, seen: CardSet) -> Self {
        let mut buckets = Buckets {
            losing: [0; GROUPS],
            unseen: [0; GROUPS],
        };
        for card in seen.complement() {
            let group = group_of(card);
            buckets.unseen[group] += 1;
            if loses_to(candidate, card, trump) {
                buckets.losing[group] += 1;
            }
        }
        buckets
    }

    pub fn losing_total(&self) -> usize {
        self.losing.iter().map(|&count| count as usize).sum()
    }

    pub fn unseen_total(&self) -> usize {
        self.unseen.iter().map(|&count| count as usize).sum()
    }

    /// Losing cards of `suit`, or of the specials group for `None`.
    #[cfg(test)]
    pub fn losing_in(&self, suit: Option<Suit>) -> u8 {
        self.losing[suit.map_or(SPECIALS, Suit::index)]
    }
}

/// `card` played after `candidate` leaves `candidate` ahead.
pub fn loses_to(candidate: Card, card: Card, trump: Option<Suit>) -> bool {
    compare(candidate, card, trump) != Ordering::Less
}
