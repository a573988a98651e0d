use super::{BotContext, format_cards};
use crate::probability::TrickView;
use rand::Rng;
use tracing::{Level, event};
use wizard_core::model::card::Card;
use wizard_core::model::trick::Trick;

pub struct PlayPlanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aim {
    Win,
    Lose,
}

impl PlayPlanner {
    /// Highest-probability card while the bid is still short, lowest once it
    /// is met.
    ///
    /// When no legal card can take the current trick the choice turns into a
    /// discard: cards are scored as if they led a fresh trick, and the seat
    /// keeps its best leads while it still needs tricks or sheds them when it
    /// does not.
    pub fn choose<R: Rng + ?Sized>(
        ctx: &BotContext<'_>,
        trick: &Trick,
        legal: &[Card],
        rng: &mut R,
    ) -> Option<Card> {
        if legal.is_empty() {
            return None;
        }

        let needed = ctx.tricks_needed();
        let aim = if needed == 0 { Aim::Lose } else { Aim::Win };
        let estimator = ctx.estimator();

        let situation = ctx.situation(TrickView::from_trick(trick, ctx.seat));
        let probabilities: Vec<f64> = legal
            .iter()
            .map(|&card| estimator.of_card(card, &situation, rng))
            .collect();

        let (card, reason) = if probabilities.iter().all(|&p| p == 0.0) {
            let fresh = ctx.lead_situation(trick.trump());
            let lead_probabilities: Vec<f64> = legal
                .iter()
                .map(|&card| estimator.of_card(card, &fresh, rng))
                .collect();
            let index = match aim {
                Aim::Win => lowest(&lead_probabilities),
                Aim::Lose => highest(&lead_probabilities),
            };
            (legal[index], "discard")
        } else {
            let index = match aim {
                Aim::Win => highest(&probabilities),
                Aim::Lose => lowest(&probabilities),
            };
            (legal[index], "contest")
        };

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "wizard_bot::play",
                Level::DEBUG,
                seat = %ctx.seat,
                aim = ?aim,
                needed,
                legal = %format_cards(legal),
                chosen = %card,
                trick_cards = trick.plays().len(),
                reason,
            );
        }
        Some(card)
    }
}

/// Index of the first maximum.
fn highest(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = index;
        }
    }
    best
}

/// Index of the first minimum.
fn lowest(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value < values[best] {
            best = index;
        }
    }
    best
}
