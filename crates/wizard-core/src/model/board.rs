use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::player::Seat;
use crate::model::score::round_score;
use crate::model::suit::Suit;

/// Public state of one round as every player sees it.
#[derive(Debug, Clone)]
pub struct Board {
    player_count: usize,
    round_number: usize,
    trump_card: Option<Card>,
    trump: Option<Suit>,
    starting_player: Seat,
    turn: Seat,
    bids: Vec<Option<u8>>,
    tricks_won: Vec<u8>,
    played: Vec<Vec<Card>>,
    seen: CardSet,
}

impl Board {
    /// `round_number` equals the number of cards dealt to each player.
    pub fn new(
        player_count: usize,
        round_number: usize,
        trump_card: Option<Card>,
        trump: Option<Suit>,
        starting_player: Seat,
    ) -> Self {
        let mut seen = CardSet::EMPTY;
        if let Some(card) = trump_card {
            seen.insert(card);
        }
        Self {
            player_count,
            round_number,
            trump_card,
            trump,
            starting_player,
            turn: starting_player,
            bids: vec![None; player_count],
            tricks_won: vec![0; player_count],
            played: vec![Vec::new(); player_count],
            seen,
        }
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn trump_card(&self) -> Option<Card> {
        self.trump_card
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    /// Fixes the trump suit after the dealer picked one for a Wizard indicator.
    pub fn set_trump(&mut self, trump: Option<Suit>) {
        self.trump = trump;
    }

    pub fn starting_player(&self) -> Seat {
        self.starting_player
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn set_bid(&mut self, seat: Seat, bid: u8) {
        self.bids[seat.index()] = Some(bid);
    }

    pub fn bid(&self, seat: Seat) -> Option<u8> {
        self.bids[seat.index()]
    }

    pub fn bids(&self) -> &[Option<u8>] {
        &self.bids
    }

    pub fn tricks_won(&self, seat: Seat) -> u8 {
        self.tricks_won[seat.index()]
    }

    pub fn tricks_won_all(&self) -> &[u8] {
        &self.tricks_won
    }

    pub fn tricks_completed(&self) -> usize {
        self.tricks_won.iter().map(|&won| won as usize).sum()
    }

    pub fn played_by(&self, seat: Seat) -> &[Card] {
        &self.played[seat.index()]
    }

    /// Played cards plus the trump indicator.
    pub fn seen_cards(&self) -> CardSet {
        self.seen
    }

    pub fn card_played(&mut self, seat: Seat, card: Card) {
        self.played[seat.index()].push(card);
        self.seen.insert(card);
        self.turn = seat.next(self.player_count);
    }

    /// Credits the trick and hands the lead to its winner.
    pub fn trick_won(&mut self, winner: Seat) {
        self.tricks_won[winner.index()] += 1;
        self.turn = winner;
    }

    /// Tricks `seat` still has to take to make its bid, capped by cards left.
    pub fn tricks_needed(&self, seat: Seat, cards_left: usize) -> usize {
        let bid = self.bid(seat).unwrap_or(0);
        let needed = bid.saturating_sub(self.tricks_won(seat)) as usize;
        needed.min(cards_left)
    }

    pub fn round_scores(&self) -> Vec<i32> {
        Seat::all(self.player_count)
            .map(|seat| round_score(self.bid(seat).unwrap_or(0), self.tricks_won(seat)))
            .collect()
    }
}
