use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Number of Wizards (and of Jesters) in a deck.
pub const SPECIAL_INSTANCES: u8 = 4;
/// Highest card id; ids are dense over `1..=MAX_CARD_ID`.
pub const MAX_CARD_ID: u8 = 60;

const FIRST_JESTER_ID: u8 = 53;
const FIRST_WIZARD_ID: u8 = 57;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Number { rank: Rank, suit: Suit },
    Wizard(u8),
    Jester(u8),
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Number { rank, suit }
    }

    pub const fn suit(self) -> Option<Suit> {
        match self {
            Card::Number { suit, .. } => Some(suit),
            Card::Wizard(_) | Card::Jester(_) => None,
        }
    }

    pub const fn is_wizard(self) -> bool {
        matches!(self, Card::Wizard(_))
    }

    pub const fn is_jester(self) -> bool {
        matches!(self, Card::Jester(_))
    }

    pub const fn is_special(self) -> bool {
        !matches!(self, Card::Number { .. })
    }

    /// Dense identifier: Blue 1-13, Green 14-26, Red 27-39, Yellow 40-52,
    /// Jesters 53-56, Wizards 57-60.
    pub const fn id(self) -> u8 {
        if let Card::Wizard(instance) | Card::Jester(instance) = self {
            debug_assert!(instance < SPECIAL_INSTANCES, "special card instance out of range");
        }
        match self {
            Card::Number { rank, suit } => suit as u8 * 13 + rank as u8,
            Card::Jester(instance) => FIRST_JESTER_ID + instance,
            Card::Wizard(instance) => FIRST_WIZARD_ID + instance,
        }
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=52 => {
                let offset = id - 1;
                let suit = match Suit::from_index((offset / 13) as usize) {
                    Some(suit) => suit,
                    None => return None,
                };
                match Rank::from_value(offset % 13 + 1) {
                    Some(rank) => Some(Card::Number { rank, suit }),
                    None => None,
                }
            }
            FIRST_JESTER_ID..=56 => Some(Card::Jester(id - FIRST_JESTER_ID)),
            FIRST_WIZARD_ID..=MAX_CARD_ID => Some(Card::Wizard(id - FIRST_WIZARD_ID)),
            _ => None,
        }
    }
}

/// Orders two cards of one trick. `first` was played earlier than `second`.
///
/// `Greater` means `first` stays ahead, `Less` means `second` takes over.
/// `Equal` is returned when neither card outranks the other (two Wizards, two
/// Jesters, or two off-suit non-trump cards); the earlier card then keeps the
/// trick. The relation is antisymmetric.
pub fn compare(first: Card, second: Card, trump: Option<Suit>) -> Ordering {
    match (first, second) {
        (Card::Wizard(_), Card::Wizard(_)) => Ordering::Equal,
        (Card::Wizard(_), _) => Ordering::Greater,
        (_, Card::Wizard(_)) => Ordering::Less,
        (Card::Jester(_), Card::Jester(_)) => Ordering::Equal,
        (Card::Jester(_), _) => Ordering::Less,
        (_, Card::Jester(_)) => Ordering::Greater,
        (
            Card::Number {
                rank: first_rank,
                suit: first_suit,
            },
            Card::Number {
                rank: second_rank,
                suit: second_suit,
            },
        ) => {
            if first_suit == second_suit {
                first_rank.cmp(&second_rank)
            } else if Some(first_suit) == trump {
                Ordering::Greater
            } else if Some(second_suit) == trump {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number { rank, suit } => write!(f, "{rank}{suit}"),
            Card::Wizard(_) => f.write_str("Z"),
            Card::Jester(_) => f.write_str("N"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    Empty,
    UnknownSuit(char),
    InvalidRank(String),
    InvalidInstance(String),
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardParseError::Empty => write!(f, "card text is empty"),
            CardParseError::UnknownSuit(symbol) => write!(f, "unknown suit symbol '{symbol}'"),
            CardParseError::InvalidRank(text) => write!(f, "invalid rank '{text}'"),
            CardParseError::InvalidInstance(text) => {
                write!(f, "invalid special card instance '{text}'")
            }
        }
    }
}

impl std::error::Error for CardParseError {}

/// Accepts `5Y`, `13b`, `Z`, `N` and `Z2`/`N3` for a specific special instance.
impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let mut chars = text.chars();
        let head = chars.next().ok_or(CardParseError::Empty)?;

        if matches!(head.to_ascii_uppercase(), 'Z' | 'N') {
            let rest = chars.as_str();
            let instance = if rest.is_empty() {
                0
            } else {
                rest.parse::<u8>()
                    .ok()
                    .filter(|instance| *instance < SPECIAL_INSTANCES)
                    .ok_or_else(|| CardParseError::InvalidInstance(rest.to_string()))?
            };
            return Ok(if head.eq_ignore_ascii_case(&'Z') {
                Card::Wizard(instance)
            } else {
                Card::Jester(instance)
            });
        }

        let symbol = text.chars().last().ok_or(CardParseError::Empty)?;
        let suit = Suit::from_symbol(symbol).ok_or(CardParseError::UnknownSuit(symbol))?;
        let rank_text = &text[..text.len() - symbol.len_utf8()];
        let rank = rank_text
            .parse::<u8>()
            .ok()
            .and_then(Rank::from_value)
            .ok_or_else(|| CardParseError::InvalidRank(rank_text.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}
