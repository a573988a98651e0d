use crate::model::card::{Card, compare};
use crate::model::player::Seat;
use crate::model::suit::Suit;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

/// Resolution state of a trick in progress, without the play history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrickState {
    suit_to_follow: Option<Suit>,
    winner: Option<Play>,
    wizard_played: bool,
    played: usize,
}

impl TrickState {
    pub const OPEN: TrickState = TrickState {
        suit_to_follow: None,
        winner: None,
        wizard_played: false,
        played: 0,
    };

    /// True when `card` would become the trick's winning card.
    pub fn takes_lead(&self, card: Card, trump: Option<Suit>) -> bool {
        match self.winner {
            None => true,
            Some(_) if self.wizard_played => false,
            Some(winner) => compare(winner.card, card, trump) == Ordering::Less,
        }
    }

    /// State after `seat` plays `card`.
    ///
    /// The first numbered card fixes the suit to follow unless a Wizard came
    /// before it; after a Wizard nothing can take the trick.
    pub fn after(self, seat: Seat, card: Card, trump: Option<Suit>) -> TrickState {
        let mut next = self;
        if self.takes_lead(card, trump) {
            next.winner = Some(Play { seat, card });
        }
        if !self.wizard_played && self.suit_to_follow.is_none() {
            next.suit_to_follow = card.suit();
        }
        if card.is_wizard() {
            next.wizard_played = true;
        }
        next.played += 1;
        next
    }

    pub fn suit_to_follow(&self) -> Option<Suit> {
        self.suit_to_follow
    }

    pub fn winner(&self) -> Option<Play> {
        self.winner
    }

    pub fn wizard_played(&self) -> bool {
        self.wizard_played
    }

    pub fn played(&self) -> usize {
        self.played
    }
}

/// Cards from `cards` that may legally be played: the suit to follow plus all
/// specials when the suit is held, every card otherwise. Order is preserved.
pub fn playable_cards(cards: &[Card], suit_to_follow: Option<Suit>) -> Vec<Card> {
    match suit_to_follow {
        Some(suit) if cards.iter().any(|card| card.suit() == Some(suit)) => cards
            .iter()
            .copied()
            .filter(|card| card.is_special() || card.suit() == Some(suit))
            .collect(),
        _ => cards.to_vec(),
    }
}

#[derive(Debug, Clone)]
pub struct Trick {
    leader: Seat,
    trump: Option<Suit>,
    player_count: usize,
    state: TrickState,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    OutOfTurn { expected: Seat, actual: Seat },
    AlreadyPlayed(Seat),
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
            TrickError::AlreadyPlayed(seat) => {
                write!(f, "{seat} has already played this trick")
            }
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: Seat, trump: Option<Suit>, player_count: usize) -> Self {
        Self {
            leader,
            trump,
            player_count,
            state: TrickState::OPEN,
            plays: Vec::with_capacity(player_count),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn state(&self) -> TrickState {
        self.state
    }

    pub fn suit_to_follow(&self) -> Option<Suit> {
        self.state.suit_to_follow()
    }

    pub fn wizard_played(&self) -> bool {
        self.state.wizard_played()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.player_count
    }

    pub fn has_played(&self, seat: Seat) -> bool {
        self.plays.iter().any(|play| play.seat == seat)
    }

    pub fn legal_cards(&self, cards: &[Card]) -> Vec<Card> {
        playable_cards(cards, self.suit_to_follow())
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.has_played(seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        let expected = self.expected_seat();
        if expected != seat {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.state = self.state.after(seat, card, self.trump);
        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// Provisional winner while the trick is open.
    pub fn current_winner(&self) -> Option<Play> {
        self.state.winner()
    }

    pub fn winner(&self) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        self.state.winner().map(|play| play.seat)
    }

    pub fn expected_seat(&self) -> Seat {
        self.plays
            .last()
            .map(|play| play.seat.next(self.player_count))
            .unwrap_or(self.leader)
    }
}
