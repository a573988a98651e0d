//! Deals hypothetical opponent hands consistent with what a seat can see.

use super::SuitKnowledge;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::player::Seat;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Constrained attempts before falling back to an unconstrained deal.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// What the sampling seat knows about the round.
#[derive(Debug, Clone, Copy)]
pub struct SampleRequest<'a> {
    pub perspective: Seat,
    pub own_hand: &'a [Card],
    /// Cards already revealed (played cards, usually with the trump indicator).
    pub seen: CardSet,
    pub trump_card: Option<Card>,
    /// Cards each seat holds right now, indexed by seat.
    pub hand_sizes: &'a [usize],
}

impl SampleRequest<'_> {
    /// Cards that could be in an opponent's hand or still in the undealt stock.
    pub fn unseen_pool(&self) -> Vec<Card> {
        let mut known = self.seen.union(CardSet::from_cards(self.own_hand));
        if let Some(card) = self.trump_card {
            known.insert(card);
        }
        known.complement().collect()
    }
}

/// One hypothetical deal, indexed by seat. The perspective seat keeps its
/// real hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledHands {
    hands: Vec<Vec<Card>>,
}

impl SampledHands {
    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat.index()]
    }

    pub fn hands(&self) -> &[Vec<Card>] {
        &self.hands
    }

    pub fn into_hands(self) -> Vec<Vec<Card>> {
        self.hands
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SamplingStats {
    pub attempts: usize,
    pub succeeded: usize,
    pub rejections: usize,
    pub fallbacks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    InsufficientCards {
        seat: Seat,
        needed: usize,
        available: usize,
    },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::InsufficientCards {
                seat,
                needed,
                available,
            } => write!(
                f,
                "{seat} needs {needed} cards but only {available} fit its missing suits"
            ),
        }
    }
}

impl std::error::Error for SamplingError {}

#[derive(Debug, Default)]
pub struct HandSampler;

impl HandSampler {
    /// Samples a deal honouring `knowledge` when given.
    ///
    /// Up to `max_attempts` constrained deals are tried; when all of them fail
    /// the deal ignores suit knowledge instead. The fallback is only visible
    /// through `stats`.
    pub fn sample<R: Rng + ?Sized>(
        request: &SampleRequest<'_>,
        knowledge: Option<&SuitKnowledge>,
        max_attempts: usize,
        rng: &mut R,
        stats: Option<&mut SamplingStats>,
    ) -> SampledHands {
        let mut stats = stats;
        let Some(knowledge) = knowledge.filter(|knowledge| !knowledge.is_empty()) else {
            if let Some(inner) = stats.as_deref_mut() {
                inner.attempts += 1;
                inner.succeeded += 1;
            }
            return Self::sample_unconstrained(request, rng);
        };

        for _ in 0..max_attempts.max(1) {
            if let Some(inner) = stats.as_deref_mut() {
                inner.attempts += 1;
            }
            match Self::sample_constrained(request, knowledge, rng) {
                Ok(hands) => {
                    if let Some(inner) = stats.as_deref_mut() {
                        inner.succeeded += 1;
                    }
                    return hands;
                }
                Err(_) => {
                    if let Some(inner) = stats.as_deref_mut() {
                        inner.rejections += 1;
                    }
                }
            }
        }

        if let Some(inner) = stats.as_deref_mut() {
            inner.fallbacks += 1;
        }
        Self::sample_unconstrained(request, rng)
    }

    /// Shuffles the unseen pool and slices it into the requested hand sizes
    /// for every seat except the perspective seat, in seat order.
    pub fn sample_unconstrained<R: Rng + ?Sized>(
        request: &SampleRequest<'_>,
        rng: &mut R,
    ) -> SampledHands {
        let mut pool = request.unseen_pool();
        pool.shuffle(rng);
        let mut remaining = pool.into_iter();

        let hands = request
            .hand_sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                if index == request.perspective.index() {
                    request.own_hand.to_vec()
                } else {
                    remaining.by_ref().take(size).collect()
                }
            })
            .collect();
        SampledHands { hands }
    }

    /// Draws each opponent's hand only from cards of suits it may still hold.
    pub fn sample_constrained<R: Rng + ?Sized>(
        request: &SampleRequest<'_>,
        knowledge: &SuitKnowledge,
        rng: &mut R,
    ) -> Result<SampledHands, SamplingError> {
        let mut pool = request.unseen_pool();
        pool.shuffle(rng);

        let mut hands = Vec::with_capacity(request.hand_sizes.len());
        for (index, &needed) in request.hand_sizes.iter().enumerate() {
            let seat = Seat::new(index as u8);
            if seat == request.perspective {
                hands.push(request.own_hand.to_vec());
                continue;
            }

            let mask = knowledge.missing(seat);
            let available = pool.iter().filter(|card| mask.allows(**card)).count();
            if available < needed {
                return Err(SamplingError::InsufficientCards {
                    seat,
                    needed,
                    available,
                });
            }

            let mut hand = Vec::with_capacity(needed);
            pool.retain(|&card| {
                if hand.len() < needed && mask.allows(card) {
                    hand.push(card);
                    false
                } else {
                    true
                }
            });
            hands.push(hand);
        }

        Ok(SampledHands { hands })
    }
}
