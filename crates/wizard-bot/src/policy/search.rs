use super::{Strategy, StrategyContext};
use crate::bot::BotParams;
use crate::search::{Position, SearchConfig, TreeSearch};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, event};
use wizard_core::belief::SuitKnowledge;
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::Trick;

/// Plays towards the trick count its own bid search predicted.
pub struct MonteCarloStrategy {
    search: TreeSearch,
    rng: StdRng,
    knowledge: SuitKnowledge,
    bid_target: Option<u8>,
}

impl MonteCarloStrategy {
    pub fn new(params: BotParams, seed: u64) -> Self {
        Self {
            search: TreeSearch::new(SearchConfig::from_params(&params)),
            rng: StdRng::seed_from_u64(seed),
            knowledge: SuitKnowledge::new(0),
            bid_target: None,
        }
    }

    pub fn knowledge(&self) -> &SuitKnowledge {
        &self.knowledge
    }
}

impl Strategy for MonteCarloStrategy {
    fn begin_round(&mut self, board: &Board) {
        self.knowledge = SuitKnowledge::new(board.player_count());
        self.bid_target = None;
    }

    fn select_bid(&mut self, ctx: &StrategyContext) -> u8 {
        let position = Position {
            seat: ctx.seat,
            hand: ctx.hand.cards(),
            board: ctx.board,
            knowledge: None,
        };
        let estimate = self.search.estimate_bid(&position, &mut self.rng);
        event!(
            target: "wizard_bot::bid",
            Level::DEBUG,
            seat = %ctx.seat,
            bid = estimate.estimate,
            histogram = ?estimate.histogram.entries(),
        );
        self.bid_target = Some(estimate.estimate);
        estimate.estimate
    }

    fn choose_trump(&mut self, ctx: &StrategyContext) -> Suit {
        let position = Position {
            seat: ctx.seat,
            hand: ctx.hand.cards(),
            board: ctx.board,
            knowledge: None,
        };
        self.search.choose_trump(&position, &mut self.rng)
    }

    /// # Panics
    ///
    /// When called before `select_bid` in the current round.
    fn select_card(&mut self, ctx: &StrategyContext, trick: &Trick, legal: &[Card]) -> Card {
        let Some(target) = self.bid_target else {
            panic!("{} asked for a card before estimating a bid", ctx.seat);
        };
        let position = Position {
            seat: ctx.seat,
            hand: ctx.hand.cards(),
            board: ctx.board,
            knowledge: Some(&self.knowledge),
        };
        let card = self
            .search
            .choose_card(&position, trick, legal, target, &mut self.rng)
            .expect("search returns a legal card when one exists");
        event!(
            target: "wizard_bot::play",
            Level::DEBUG,
            seat = %ctx.seat,
            target,
            chosen = %card,
            legal_count = legal.len(),
        );
        card
    }

    fn observe_trick_result(&mut self, trick: &Trick) {
        if self.knowledge.player_count() != trick.player_count() {
            self.knowledge = SuitKnowledge::new(trick.player_count());
        }
        self.knowledge.observe_trick(trick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizard_core::model::hand::Hand;
    use wizard_core::model::player::Seat;

    fn params() -> BotParams {
        BotParams {
            search_iterations: 5,
            ..BotParams::default()
        }
    }

    #[test]
    #[should_panic(expected = "before estimating a bid")]
    fn card_before_bid_panics() {
        let hand = Hand::with_cards(vec!["5G".parse().unwrap()]);
        let board = Board::new(3, 1, None, None, Seat::new(0));
        let trick = Trick::new(Seat::new(0), None, 3);
        let ctx = StrategyContext {
            seat: Seat::new(0),
            hand: &hand,
            board: &board,
        };
        let mut strategy = MonteCarloStrategy::new(params(), 1);
        strategy.begin_round(&board);
        strategy.select_card(&ctx, &trick, hand.cards());
    }

    #[test]
    fn bids_then_plays_a_legal_card() {
        let hand = Hand::with_cards(vec!["5G".parse().unwrap(), "9B".parse().unwrap(), Card::Wizard(0)]);
        let mut board = Board::new(3, 3, Some("1R".parse().unwrap()), Some(Suit::Red), Seat::new(2));
        let mut trick = Trick::new(Seat::new(2), Some(Suit::Red), 3);
        let led: Card = "7G".parse().unwrap();
        trick.play(Seat::new(2), led).unwrap();
        board.card_played(Seat::new(2), led);

        let ctx = StrategyContext {
            seat: Seat::new(0),
            hand: &hand,
            board: &board,
        };
        let mut strategy = MonteCarloStrategy::new(params(), 7);
        strategy.begin_round(&board);
        let bid = strategy.select_bid(&ctx);
        assert!(bid <= 3);
        let legal = trick.legal_cards(hand.cards());
        let card = strategy.select_card(&ctx, &trick, &legal);
        assert!(legal.contains(&card));
    }

    #[test]
    fn observing_twice_matches_observing_once() {
        let mut trick = Trick::new(Seat::new(0), None, 3);
        trick.play(Seat::new(0), "4Y".parse().unwrap()).unwrap();
        trick.play(Seat::new(1), "9B".parse().unwrap()).unwrap();
        trick.play(Seat::new(2), Card::Jester(0)).unwrap();

        let board = Board::new(3, 2, None, None, Seat::new(0));
        let mut strategy = MonteCarloStrategy::new(params(), 3);
        strategy.begin_round(&board);
        strategy.observe_trick_result(&trick);
        let once = strategy.knowledge().clone();
        strategy.observe_trick_result(&trick);
        assert_eq!(strategy.knowledge(), &once);
        assert!(once.missing(Seat::new(1)).contains(Suit::Yellow));
    }
}
