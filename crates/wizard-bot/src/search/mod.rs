//! Monte Carlo playouts over sampled deals.
//!
//! Every iteration deals the unseen cards to the opponents, then plays the
//! rest of the round out with each seat trying its first `branch_factor`
//! legal cards. The deciding seat's final trick count is recorded per leaf.

mod histogram;
mod state;

pub use histogram::WinHistogram;
pub use state::{HandRestore, SimulationState, TallyRestore};

use rand::Rng;
use tracing::{Level, event};
use wizard_core::belief::{HandSampler, SampleRequest, SamplingStats, SuitKnowledge};
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::player::Seat;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::{Trick, TrickState, playable_cards};

use crate::bot::BotParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub iterations: usize,
    pub branch_factor: usize,
    pub sampler_attempts: usize,
}

impl SearchConfig {
    pub fn new(iterations: usize, branch_factor: usize) -> Self {
        Self {
            iterations,
            branch_factor,
            ..Self::from_params(&BotParams::default())
        }
    }

    pub fn from_params(params: &BotParams) -> Self {
        Self {
            iterations: params.search_iterations,
            branch_factor: params.branch_factor,
            sampler_attempts: params.sampler_attempts,
        }
    }
}

/// The deciding seat's view of the round.
#[derive(Debug, Clone, Copy)]
pub struct Position<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub board: &'a Board,
    pub knowledge: Option<&'a SuitKnowledge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidEstimate {
    pub estimate: u8,
    pub histogram: WinHistogram,
}

/// Fixed inputs of one playout tree.
struct Playout {
    decider: Seat,
    player_count: usize,
    trump: Option<Suit>,
    branch_factor: usize,
}

impl Playout {
    fn run(
        &self,
        state: &mut SimulationState,
        turn: Seat,
        trick: TrickState,
        histogram: &mut WinHistogram,
    ) {
        if trick.played() == self.player_count {
            let Some(winner) = trick.winner() else {
                return;
            };
            let mut credited = state.credit_trick(winner.seat);
            if credited.hand(self.decider).is_empty() {
                histogram.record(credited.tally(self.decider));
                return;
            }
            self.run(&mut credited, winner.seat, TrickState::OPEN, histogram);
            return;
        }

        let mut legal = playable_cards(state.hand(turn), trick.suit_to_follow());
        legal.truncate(self.branch_factor);
        for card in legal {
            let Some(mut taken) = state.take_card(turn, card) else {
                continue;
            };
            let next = trick.after(turn, card, self.trump);
            self.run(&mut taken, turn.next(self.player_count), next, histogram);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreeSearch {
    config: SearchConfig,
}

impl TreeSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config: SearchConfig {
                branch_factor: config.branch_factor.max(1),
                sampler_attempts: config.sampler_attempts.max(1),
                ..config
            },
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Distribution of tricks the seat takes from the start of the round.
    pub fn estimate_bid<R: Rng + ?Sized>(&self, position: &Position<'_>, rng: &mut R) -> BidEstimate {
        let board = position.board;
        let playout = self.playout(position, board.trump());
        let mut histogram = WinHistogram::new();
        for _ in 0..self.config.iterations {
            let mut state = self.sample_opening(position, rng);
            playout.run(&mut state, board.starting_player(), TrickState::OPEN, &mut histogram);
        }

        let estimate = histogram.mode().map_or(0, |(tricks, _)| tricks);
        event!(
            target: "wizard_bot::search",
            Level::TRACE,
            seat = %position.seat,
            estimate,
            leaves = histogram.total(),
        );
        BidEstimate {
            estimate,
            histogram,
        }
    }

    /// Suit whose playouts promise the most tricks; the mode's frequency
    /// breaks ties, then suit order.
    pub fn choose_trump<R: Rng + ?Sized>(&self, position: &Position<'_>, rng: &mut R) -> Suit {
        let mut histograms: Vec<WinHistogram> = vec![WinHistogram::new(); Suit::ALL.len()];
        for _ in 0..self.config.iterations {
            let mut state = self.sample_opening(position, rng);
            for (suit, histogram) in Suit::ALL.into_iter().zip(histograms.iter_mut()) {
                let playout = self.playout(position, Some(suit));
                playout.run(
                    &mut state,
                    position.board.starting_player(),
                    TrickState::OPEN,
                    histogram,
                );
            }
        }

        let mut best: Option<(Suit, (u8, u32))> = None;
        for (suit, histogram) in Suit::ALL.into_iter().zip(&histograms) {
            let mode = histogram.mode().unwrap_or((0, 0));
            if best.is_none_or(|(_, top)| mode > top) {
                best = Some((suit, mode));
            }
        }
        let suit = best.map_or(Suit::ALL[0], |(suit, _)| suit);
        event!(
            target: "wizard_bot::search",
            Level::TRACE,
            seat = %position.seat,
            trump = %suit,
        );
        suit
    }

    /// Legal card whose playouts land on `target` tricks most often.
    ///
    /// A card that reaches `target` in any playout beats every card that
    /// never does. The others rank by how close their nearest trick count
    /// gets, then by its frequency. Equal cards keep legal order.
    pub fn choose_card<R: Rng + ?Sized>(
        &self,
        position: &Position<'_>,
        trick: &Trick,
        legal: &[Card],
        target: u8,
        rng: &mut R,
    ) -> Option<Card> {
        if legal.len() <= 1 {
            return legal.first().copied();
        }

        let board = position.board;
        let seat = position.seat;
        let player_count = board.player_count();
        let hand_sizes: Vec<usize> = Seat::all(player_count)
            .map(|other| {
                if other != seat && trick.has_played(other) {
                    position.hand.len().saturating_sub(1)
                } else {
                    position.hand.len()
                }
            })
            .collect();
        let request = SampleRequest {
            perspective: seat,
            own_hand: position.hand,
            seen: board.seen_cards(),
            trump_card: board.trump_card(),
            hand_sizes: &hand_sizes,
        };

        let playout = self.playout(position, trick.trump());
        let mut stats = SamplingStats::default();
        let mut histograms: Vec<WinHistogram> = vec![WinHistogram::new(); legal.len()];
        for _ in 0..self.config.iterations {
            let hands = HandSampler::sample(
                &request,
                position.knowledge,
                self.config.sampler_attempts,
                rng,
                Some(&mut stats),
            );
            let mut state = SimulationState::new(hands.into_hands(), board.tricks_won_all().to_vec());
            for (&card, histogram) in legal.iter().zip(histograms.iter_mut()) {
                let Some(mut taken) = state.take_card(seat, card) else {
                    continue;
                };
                let next = trick.state().after(seat, card, trick.trump());
                playout.run(&mut taken, seat.next(player_count), next, histogram);
            }
        }

        if stats.fallbacks > 0 {
            event!(
                target: "wizard_bot::sampler",
                Level::DEBUG,
                seat = %seat,
                attempts = stats.attempts,
                rejections = stats.rejections,
                fallbacks = stats.fallbacks,
                "constrained sampling fell back to unconstrained deals"
            );
        }

        let mut best: Option<(Card, TargetFit)> = None;
        for (&card, histogram) in legal.iter().zip(&histograms) {
            let fit = TargetFit::of(histogram, target);
            if best.as_ref().is_none_or(|(_, top)| fit.beats(top)) {
                best = Some((card, fit));
            }
        }
        best.map(|(card, _)| card)
    }

    fn playout(&self, position: &Position<'_>, trump: Option<Suit>) -> Playout {
        Playout {
            decider: position.seat,
            player_count: position.board.player_count(),
            trump,
            branch_factor: self.config.branch_factor,
        }
    }

    /// Every seat holds as many cards as the decider and nothing is known
    /// about suits yet.
    fn sample_opening<R: Rng + ?Sized>(&self, position: &Position<'_>, rng: &mut R) -> SimulationState {
        let board = position.board;
        let player_count = board.player_count();
        let hand_sizes = vec![position.hand.len(); player_count];
        let request = SampleRequest {
            perspective: position.seat,
            own_hand: position.hand,
            seen: board.seen_cards(),
            trump_card: board.trump_card(),
            hand_sizes: &hand_sizes,
        };
        let hands = HandSampler::sample_unconstrained(&request, rng);
        SimulationState::new(hands.into_hands(), vec![0; player_count])
    }
}

/// How well one card's histogram matches the target trick count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TargetFit {
    hit: bool,
    distance: u8,
    frequency: u32,
}

impl TargetFit {
    fn of(histogram: &WinHistogram, target: u8) -> Self {
        match histogram.nearest(target) {
            Some((tricks, frequency)) => Self {
                hit: tricks == target,
                distance: tricks.abs_diff(target),
                frequency,
            },
            None => Self {
                hit: false,
                distance: u8::MAX,
                frequency: 0,
            },
        }
    }

    fn beats(&self, other: &TargetFit) -> bool {
        if self.hit != other.hit {
            return self.hit;
        }
        if self.distance != other.distance {
            return self.distance < other.distance;
        }
        self.frequency > other.frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::{SmallRng, StdRng};

    fn cards(texts: &[&str]) -> Vec<Card> {
        texts.iter().map(|text| text.parse().unwrap()).collect()
    }

    fn histogram(values: &[u8]) -> WinHistogram {
        let mut histogram = WinHistogram::new();
        for &value in values {
            histogram.record(value);
        }
        histogram
    }

    #[test]
    fn target_hit_beats_closer_misses() {
        let hit = TargetFit::of(&histogram(&[2, 0, 0, 0]), 2);
        let miss = TargetFit::of(&histogram(&[1, 1, 1, 3]), 2);
        assert!(hit.beats(&miss));
        assert!(!miss.beats(&hit));

        let near = TargetFit::of(&histogram(&[1]), 2);
        let far = TargetFit::of(&histogram(&[0, 0, 0]), 2);
        assert!(near.beats(&far));
        assert!(!near.beats(&near));
    }

    #[test]
    fn bid_search_finds_tricks_with_a_wizard() {
        // Seats 0..3 play in order 0, 1, 2, 3; seat 2 holds the cards below.
        let hand = cards(&["4Y", "Z", "3Y"]);
        let board = Board::new(4, 3, Some("10B".parse().unwrap()), Some(Suit::Blue), Seat::new(0));
        let position = Position {
            seat: Seat::new(2),
            hand: &hand,
            board: &board,
            knowledge: None,
        };
        let search = TreeSearch::new(SearchConfig::new(5, 5));
        let mut rng = StdRng::seed_from_u64(17);
        let found = (0..5).any(|_| search.estimate_bid(&position, &mut rng).estimate > 0);
        assert!(found);
    }

    #[test]
    fn every_leaf_counts_the_full_round() {
        let hand = cards(&["13R", "Z", "N"]);
        let board = Board::new(3, 3, Some("2G".parse().unwrap()), Some(Suit::Green), Seat::new(1));
        let position = Position {
            seat: Seat::new(0),
            hand: &hand,
            board: &board,
            knowledge: None,
        };
        let search = TreeSearch::new(SearchConfig::new(4, 2));
        let mut rng = SmallRng::seed_from_u64(3);
        let estimate = search.estimate_bid(&position, &mut rng);
        assert!(estimate.histogram.total() >= 4);
        assert!(estimate.histogram.entries().iter().all(|(tricks, _)| *tricks <= 3));
        assert_eq!(
            Some(estimate.estimate),
            estimate.histogram.mode().map(|(tricks, _)| tricks)
        );
    }

    #[test]
    fn playout_visits_every_branch_and_restores_the_deal() {
        // All Yellow, so both cards stay legal for every seat in the first
        // trick: 2 * 2 * 2 lines of play, each with one forced second trick.
        let hands = vec![cards(&["12Y", "1Y"]), cards(&["13Y", "2Y"]), cards(&["11Y", "3Y"])];
        let mut state = SimulationState::new(hands, vec![0, 0, 0]);
        let original = state.clone();
        let playout = Playout {
            decider: Seat::new(0),
            player_count: 3,
            trump: None,
            branch_factor: 2,
        };

        let mut histogram = WinHistogram::new();
        playout.run(&mut state, Seat::new(0), TrickState::OPEN, &mut histogram);

        assert_eq!(state, original);
        assert_eq!(histogram.total(), 8);
        // Seat 0 takes exactly one trick unless seat 1 keeps 13Y for the
        // trick where seat 0 still holds 12Y.
        assert_eq!(histogram.frequency(0), 4);
        assert_eq!(histogram.frequency(1), 4);
        assert_eq!(histogram.mode(), Some((0, 4)));
    }

    #[test]
    fn card_choice_is_legal_and_reproducible() {
        let hand = cards(&["13Y", "2Y", "N"]);
        let mut board = Board::new(3, 3, Some("5R".parse().unwrap()), Some(Suit::Red), Seat::new(2));
        let mut trick = Trick::new(Seat::new(2), Some(Suit::Red), 3);
        let led = "7Y".parse().unwrap();
        trick.play(Seat::new(2), led).unwrap();
        board.card_played(Seat::new(2), led);
        board.set_bid(Seat::new(0), 1);

        let position = Position {
            seat: Seat::new(0),
            hand: &hand,
            board: &board,
            knowledge: None,
        };
        let legal = trick.legal_cards(&hand);
        let search = TreeSearch::new(SearchConfig::new(20, 1));
        let first = search.choose_card(&position, &trick, &legal, 1, &mut SmallRng::seed_from_u64(9));
        let second = search.choose_card(&position, &trick, &legal, 1, &mut SmallRng::seed_from_u64(9));
        assert_eq!(first, second);
        assert!(first.is_some_and(|card| legal.contains(&card)));
    }

    #[test]
    fn wizard_is_played_when_one_trick_remains_to_win() {
        let hand = vec![Card::Wizard(0)];
        let board = Board::new(3, 1, Some("5R".parse().unwrap()), Some(Suit::Red), Seat::new(0));
        let trick = Trick::new(Seat::new(0), Some(Suit::Red), 3);
        let position = Position {
            seat: Seat::new(0),
            hand: &hand,
            board: &board,
            knowledge: None,
        };
        let search = TreeSearch::new(SearchConfig::new(3, 1));
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            search.choose_card(&position, &trick, &hand, 1, &mut rng),
            Some(Card::Wizard(0))
        );
        assert_eq!(search.choose_card(&position, &trick, &[], 1, &mut rng), None);
    }

    #[test]
    fn trump_choice_prefers_the_long_suit() {
        let hand = cards(&["13G", "12G", "11G", "10G", "2B"]);
        let board = Board::new(3, 5, Some(Card::Wizard(3)), None, Seat::new(1));
        let position = Position {
            seat: Seat::new(0),
            hand: &hand,
            board: &board,
            knowledge: None,
        };
        let search = TreeSearch::new(SearchConfig::new(30, 1));
        let mut rng = SmallRng::seed_from_u64(21);
        assert_eq!(search.choose_trump(&position, &mut rng), Suit::Green);
    }
}
