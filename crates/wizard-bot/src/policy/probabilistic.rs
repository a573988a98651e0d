use super::{Strategy, StrategyContext};
use crate::bot::{BidPlanner, BotContext, BotParams, PlayPlanner, TrumpPlanner};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wizard_core::belief::SuitKnowledge;
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::Trick;

/// Decides from per-card win probabilities.
pub struct ProbabilisticStrategy {
    params: BotParams,
    rng: StdRng,
    knowledge: SuitKnowledge,
}

impl ProbabilisticStrategy {
    pub fn new(params: BotParams, seed: u64) -> Self {
        Self {
            params,
            rng: StdRng::seed_from_u64(seed),
            knowledge: SuitKnowledge::new(0),
        }
    }

    pub fn knowledge(&self) -> &SuitKnowledge {
        &self.knowledge
    }
}

impl Strategy for ProbabilisticStrategy {
    fn begin_round(&mut self, board: &Board) {
        self.knowledge = SuitKnowledge::new(board.player_count());
    }

    fn select_bid(&mut self, ctx: &StrategyContext) -> u8 {
        let bot = BotContext::new(ctx.seat, ctx.hand.cards(), ctx.board, None, &self.params);
        BidPlanner::choose(&bot, &mut self.rng)
    }

    fn choose_trump(&mut self, ctx: &StrategyContext) -> Suit {
        let bot = BotContext::new(ctx.seat, ctx.hand.cards(), ctx.board, None, &self.params);
        TrumpPlanner::choose(&bot, &mut self.rng)
    }

    fn select_card(&mut self, ctx: &StrategyContext, trick: &Trick, legal: &[Card]) -> Card {
        let knowledge = (self.knowledge.player_count() == ctx.board.player_count())
            .then_some(&self.knowledge);
        let bot = BotContext::new(ctx.seat, ctx.hand.cards(), ctx.board, knowledge, &self.params);
        PlayPlanner::choose(&bot, trick, legal, &mut self.rng)
            .expect("play planner returns a legal card when one exists")
    }

    fn observe_trick_result(&mut self, trick: &Trick) {
        if self.knowledge.player_count() != trick.player_count() {
            self.knowledge = SuitKnowledge::new(trick.player_count());
        }
        self.knowledge.observe_trick(trick);
    }
}
