//! Chance that a single card takes the trick it is played to.
//!
//! Three estimators share the same base cases and losing-card tally:
//! - `Uniform`: every unseen card is equally likely in every opponent hand.
//! - `SuitAware`: opponents known to be out of a suit cannot hold it.
//! - `Simulated`: shuffled opponent hands are checked for a card that beats
//!   the candidate.
//!
//! Jesters are always given probability zero even though a trick of Jesters
//! goes to its leader.

mod exhaustion;
mod losing;
mod simulation;
mod uniform;

use losing::Buckets;
use rand::Rng;
use wizard_core::belief::{SuitKnowledge, SuitMask};
use wizard_core::model::card::Card;
use wizard_core::model::card_set::CardSet;
use wizard_core::model::player::Seat;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::{Trick, TrickState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityMode {
    Uniform,
    SuitAware,
    Simulated,
}

impl ProbabilityMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "uniform" => Some(ProbabilityMode::Uniform),
            "suit_aware" | "suit-aware" | "exhaustion" => Some(ProbabilityMode::SuitAware),
            "simulated" | "simulation" => Some(ProbabilityMode::Simulated),
            _ => None,
        }
    }
}

/// The trick as seen by the seat about to play.
#[derive(Debug, Clone, Copy)]
pub struct TrickView {
    pub seat: Seat,
    pub trump: Option<Suit>,
    pub state: TrickState,
    pub player_count: usize,
}

impl TrickView {
    /// `seat` leading a fresh trick.
    pub fn lead(seat: Seat, trump: Option<Suit>, player_count: usize) -> Self {
        Self {
            seat,
            trump,
            state: TrickState::OPEN,
            player_count,
        }
    }

    pub fn from_trick(trick: &Trick, seat: Seat) -> Self {
        Self {
            seat,
            trump: trick.trump(),
            state: trick.state(),
            player_count: trick.player_count(),
        }
    }

    /// Opponents still to play after `seat` in this trick.
    pub fn remaining_opponents(&self) -> usize {
        self.player_count
            .saturating_sub(self.state.played())
            .saturating_sub(1)
    }

    pub fn opponents_to_act(&self) -> impl Iterator<Item = Seat> + '_ {
        self.seat
            .cycle_from(self.player_count)
            .skip(1)
            .take(self.remaining_opponents())
    }
}

/// Everything the estimator needs besides the candidate card.
#[derive(Debug, Clone, Copy)]
pub struct Situation<'a> {
    pub trick: TrickView,
    /// Cards known not to be in any opponent hand: the own hand, played cards
    /// and the trump indicator.
    pub seen: CardSet,
    pub knowledge: Option<&'a SuitKnowledge>,
    /// Cards each opponent still to act holds.
    pub hand_size: usize,
}

impl Situation<'_> {
    fn missing_masks(&self) -> Vec<SuitMask> {
        self.trick
            .opponents_to_act()
            .map(|seat| {
                self.knowledge
                    .map_or(SuitMask::EMPTY, |knowledge| knowledge.missing(seat))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WinProbability {
    mode: ProbabilityMode,
    simulation_iterations: usize,
}

impl WinProbability {
    pub fn new(mode: ProbabilityMode, simulation_iterations: usize) -> Self {
        Self {
            mode,
            simulation_iterations: simulation_iterations.max(1),
        }
    }

    pub fn mode(&self) -> ProbabilityMode {
        self.mode
    }

    /// Probability in `[0, 1]` that `card` ends up winning the trick.
    pub fn of_card<R: Rng + ?Sized>(
        &self,
        card: Card,
        situation: &Situation<'_>,
        rng: &mut R,
    ) -> f64 {
        let view = &situation.trick;
        let probability = if view.state.wizard_played() {
            0.0
        } else if card.is_wizard() {
            1.0
        } else if card.is_jester() || !view.state.takes_lead(card, view.trump) {
            0.0
        } else if view.remaining_opponents() == 0 {
            1.0
        } else {
            self.estimate_numbered(card, situation, rng)
        };
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "probability {probability} out of range for {card}"
        );
        probability
    }

    fn estimate_numbered<R: Rng + ?Sized>(
        &self,
        card: Card,
        situation: &Situation<'_>,
        rng: &mut R,
    ) -> f64 {
        let view = &situation.trick;
        let buckets = Buckets::tally(card, view.trump, situation.seen);
        let draws = view.remaining_opponents();
        if buckets.unseen_total() == 0 || buckets.losing_total() < draws {
            return 0.0;
        }

        match self.mode {
            ProbabilityMode::Uniform => {
                uniform::all_draws_lose(buckets.losing_total(), buckets.unseen_total(), draws)
            }
            ProbabilityMode::SuitAware => exhaustion::all_opponents_lose(&buckets, &situation.missing_masks()),
            ProbabilityMode::Simulated => simulation::share_of_safe_hands(
                card,
                situation,
                self.simulation_iterations,
                rng,
            ),
        }
    }
}
