mod probabilistic;
mod random;
mod search;

pub use probabilistic::ProbabilisticStrategy;
pub use random::RandomStrategy;
pub use search::MonteCarloStrategy;

use crate::bot::BotParams;
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::hand::Hand;
use wizard_core::model::player::Seat;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::Trick;

/// What a seat sees when asked for a decision.
pub struct StrategyContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub board: &'a Board,
}

/// A computer player for one seat.
pub trait Strategy: Send {
    /// Called once per round before bidding; drops knowledge from earlier rounds.
    fn begin_round(&mut self, board: &Board);

    fn select_bid(&mut self, ctx: &StrategyContext) -> u8;

    /// Only asked of the dealer when the trump indicator is a Wizard.
    fn choose_trump(&mut self, ctx: &StrategyContext) -> Suit;

    /// Must return one of `legal`.
    fn select_card(&mut self, ctx: &StrategyContext, trick: &Trick, legal: &[Card]) -> Card;

    /// Safe to call more than once with the same trick.
    fn observe_trick_result(&mut self, trick: &Trick);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Random,
    Search,
    Probabilistic,
}

impl StrategyKind {
    pub fn build(self, params: BotParams, seed: u64) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::new(seed)),
            StrategyKind::Search => Box::new(MonteCarloStrategy::new(params, seed)),
            StrategyKind::Probabilistic => Box::new(ProbabilisticStrategy::new(params, seed)),
        }
    }
}
