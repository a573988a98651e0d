use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::hand::Hand;
use crate::model::player::{MAX_PLAYERS, MIN_PLAYERS, Seat};
use crate::model::score::ScoreBoard;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

/// Hands for one round plus the card turned up after dealing.
#[derive(Debug, Clone)]
pub struct Deal {
    pub hands: Vec<Hand>,
    pub trump_card: Option<Card>,
}

/// How the turned-up card decides trump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrumpIndicator {
    NoTrump,
    Suit(Suit),
    DealerChooses,
}

impl TrumpIndicator {
    /// A Wizard lets the dealer pick; a Jester or an exhausted deck means no trump.
    pub fn from_card(card: Option<Card>) -> Self {
        match card {
            None | Some(Card::Jester(_)) => TrumpIndicator::NoTrump,
            Some(Card::Wizard(_)) => TrumpIndicator::DealerChooses,
            Some(Card::Number { suit, .. }) => TrumpIndicator::Suit(suit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    PlayerCount(usize),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::PlayerCount(count) => write!(
                f,
                "wizard needs {MIN_PLAYERS}-{MAX_PLAYERS} players but got {count}"
            ),
        }
    }
}

impl std::error::Error for MatchError {}

#[derive(Debug, Clone)]
pub struct MatchState {
    player_count: usize,
    scores: ScoreBoard,
    dealer: Seat,
    round_number: usize,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    pub fn with_seed(player_count: usize, seed: u64) -> Result<Self, MatchError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(MatchError::PlayerCount(player_count));
        }
        Ok(Self {
            player_count,
            scores: ScoreBoard::new(player_count),
            dealer: Seat::new(0),
            round_number: 1,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    /// Seat left of the dealer; bids and plays first.
    pub fn first_player(&self) -> Seat {
        self.dealer.next(self.player_count)
    }

    /// Cards dealt to each player this round.
    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn total_rounds(&self) -> usize {
        DECK_SIZE / self.player_count
    }

    pub fn is_complete(&self) -> bool {
        self.round_number > self.total_rounds()
    }

    /// Shuffles a fresh deck and deals `round_number` cards to every seat,
    /// starting left of the dealer.
    pub fn deal(&mut self) -> Deal {
        let deck = Deck::shuffled(&mut self.rng);
        let cards = deck.cards();
        let per_hand = self.round_number;
        let mut hands = vec![Hand::new(); self.player_count];
        for (offset, seat) in self
            .first_player()
            .cycle_from(self.player_count)
            .enumerate()
        {
            let start = offset * per_hand;
            hands[seat.index()] = Hand::with_cards(cards[start..start + per_hand].to_vec());
        }
        let trump_card = cards.get(self.player_count * per_hand).copied();
        Deal { hands, trump_card }
    }

    /// Adds the round's scores and rotates the deal.
    pub fn finish_round(&mut self, round_scores: &[i32]) {
        self.scores.apply_round(round_scores);
        self.round_number += 1;
        self.dealer = self.dealer.next(self.player_count);
    }
}
