use super::BotContext;
use rand::Rng;
use tracing::{Level, event};
use wizard_core::model::suit::Suit;

pub struct TrumpPlanner;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SuitStrength {
    likely_wins: usize,
    total: f64,
}

impl TrumpPlanner {
    /// Suit with the most likely lead winners; the summed probability breaks
    /// ties, then suit order.
    pub fn choose<R: Rng + ?Sized>(ctx: &BotContext<'_>, rng: &mut R) -> Suit {
        let threshold = ctx.params.win_threshold;
        let mut best: Option<(Suit, SuitStrength)> = None;
        for suit in Suit::ALL {
            let probabilities = ctx.lead_probabilities(Some(suit), rng);
            let strength = SuitStrength {
                likely_wins: probabilities.iter().filter(|&&p| p > threshold).count(),
                total: probabilities.iter().sum(),
            };
            let better = best.is_none_or(|(_, top)| {
                strength.likely_wins > top.likely_wins
                    || (strength.likely_wins == top.likely_wins && strength.total > top.total)
            });
            if better {
                best = Some((suit, strength));
            }
        }

        let (suit, strength) = best.unwrap_or((Suit::ALL[0], SuitStrength::default()));
        event!(
            target: "wizard_bot::trump",
            Level::DEBUG,
            seat = %ctx.seat,
            trump = %suit,
            likely_wins = strength.likely_wins,
            total = strength.total,
        );
        suit
    }
}
