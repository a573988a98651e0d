use super::{Strategy, StrategyContext};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::Trick;

/// Uniformly random legal decisions; the benchmark baseline.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn begin_round(&mut self, _board: &Board) {}

    fn select_bid(&mut self, ctx: &StrategyContext) -> u8 {
        let ceiling = ctx.hand.len() / 2 + 1;
        self.rng.gen_range(0..=ceiling) as u8
    }

    fn choose_trump(&mut self, _ctx: &StrategyContext) -> Suit {
        *Suit::ALL
            .choose(&mut self.rng)
            .expect("suit list is never empty")
    }

    fn select_card(&mut self, _ctx: &StrategyContext, _trick: &Trick, legal: &[Card]) -> Card {
        *legal
            .choose(&mut self.rng)
            .expect("a seat with cards always has a legal card")
    }

    fn observe_trick_result(&mut self, _trick: &Trick) {}
}
