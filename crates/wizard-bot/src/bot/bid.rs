use super::{BotContext, format_cards};
use rand::Rng;
use tracing::{Level, event};

pub struct BidPlanner;

impl BidPlanner {
    /// Number of cards likely to win if led into a fresh trick.
    pub fn choose<R: Rng + ?Sized>(ctx: &BotContext<'_>, rng: &mut R) -> u8 {
        let threshold = ctx.params.win_threshold;
        let probabilities = ctx.lead_probabilities(ctx.board.trump(), rng);
        let bid = probabilities.iter().filter(|&&p| p > threshold).count() as u8;

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "wizard_bot::bid",
                Level::DEBUG,
                seat = %ctx.seat,
                hand = %format_cards(ctx.hand),
                mode = ?ctx.params.probability_mode,
                threshold,
                bid,
            );
        }
        bid
    }
}

#[cfg(test)]
mod tests {
    use super::BidPlanner;
    use crate::bot::{BotContext, BotParams};
    use crate::probability::ProbabilityMode;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use wizard_core::model::board::Board;
    use wizard_core::model::card::Card;
    use wizard_core::model::player::Seat;
    use wizard_core::model::suit::Suit;

    fn params(mode: ProbabilityMode) -> BotParams {
        BotParams {
            probability_mode: mode,
            simulation_iterations: 100,
            ..BotParams::default()
        }
    }

    #[test]
    fn wizards_are_always_counted() {
        let hand = vec![Card::Wizard(0), Card::Wizard(1), Card::Jester(0)];
        let board = Board::new(4, 3, Some("10B".parse().unwrap()), Some(Suit::Blue), Seat::new(0));
        for mode in [ProbabilityMode::Uniform, ProbabilityMode::SuitAware, ProbabilityMode::Simulated] {
            let params = params(mode);
            let ctx = BotContext::new(Seat::new(2), &hand, &board, None, &params);
            let mut rng = SmallRng::seed_from_u64(4);
            assert_eq!(BidPlanner::choose(&ctx, &mut rng), 2);
        }
    }

    #[test]
    fn low_cards_are_not_counted() {
        let hand: Vec<Card> = ["2G", "3R", "Z"].iter().map(|t| t.parse().unwrap()).collect();
        let board = Board::new(5, 3, Some("10B".parse().unwrap()), Some(Suit::Blue), Seat::new(0));
        let params = params(ProbabilityMode::Uniform);
        let ctx = BotContext::new(Seat::new(1), &hand, &board, None, &params);
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(BidPlanner::choose(&ctx, &mut rng), 1);
    }
}
