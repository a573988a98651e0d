mod bid;
mod params;
mod play;
mod trump;

pub use bid::BidPlanner;
pub use params::BotParams;
pub use play::PlayPlanner;
pub use trump::TrumpPlanner;

use crate::probability::{Situation, TrickView, WinProbability};
use rand::Rng;
use wizard_core::belief::SuitKnowledge;
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::card_set::CardSet;
use wizard_core::model::player::Seat;
use wizard_core::model::suit::Suit;

#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub board: &'a Board,
    pub knowledge: Option<&'a SuitKnowledge>,
    pub params: &'a BotParams,
}

impl<'a> BotContext<'a> {
    pub fn new(
        seat: Seat,
        hand: &'a [Card],
        board: &'a Board,
        knowledge: Option<&'a SuitKnowledge>,
        params: &'a BotParams,
    ) -> Self {
        Self {
            seat,
            hand,
            board,
            knowledge,
            params,
        }
    }

    pub fn estimator(&self) -> WinProbability {
        WinProbability::new(self.params.probability_mode, self.params.simulation_iterations)
    }

    /// Own hand, played cards and the trump indicator.
    pub fn seen(&self) -> CardSet {
        self.board.seen_cards().union(CardSet::from_cards(self.hand))
    }

    /// Tricks still missing from the bid, capped by the cards left.
    pub fn tricks_needed(&self) -> usize {
        self.board.tricks_needed(self.seat, self.hand.len())
    }

    pub fn situation(&self, trick: TrickView) -> Situation<'a> {
        Situation {
            trick,
            seen: self.seen(),
            knowledge: self.knowledge,
            hand_size: self.hand.len(),
        }
    }

    /// The seat leading a fresh trick under `trump`.
    pub fn lead_situation(&self, trump: Option<Suit>) -> Situation<'a> {
        self.situation(TrickView::lead(self.seat, trump, self.board.player_count()))
    }

    /// Lead probability of every card in hand, in hand order.
    pub fn lead_probabilities<R: Rng + ?Sized>(&self, trump: Option<Suit>, rng: &mut R) -> Vec<f64> {
        let estimator = self.estimator();
        let situation = self.lead_situation(trump);
        self.hand
            .iter()
            .map(|&card| estimator.of_card(card, &situation, rng))
            .collect()
    }
}

pub(crate) fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
