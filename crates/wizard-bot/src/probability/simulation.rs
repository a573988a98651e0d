use super::Situation;
use rand::Rng;
use rand::seq::SliceRandom;
use wizard_core::model::card::Card;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::{TrickState, playable_cards};

/// Product over the opponents still to act of the share of shuffled hands
/// that hold no legal card beating `card`.
pub fn share_of_safe_hands<R: Rng + ?Sized>(
    card: Card,
    situation: &Situation<'_>,
    iterations: usize,
    rng: &mut R,
) -> f64 {
    let view = &situation.trick;
    let after = view.state.after(view.seat, card, view.trump);
    let unseen: Vec<Card> = situation.seen.complement().collect();
    let hand_size = situation.hand_size.max(1);
    let masks = situation.missing_masks();

    let mut probability = 1.0;
    for mask in masks {
        let mut pool: Vec<Card> = unseen.iter().copied().filter(|c| mask.allows(*c)).collect();
        if pool.len() < hand_size {
            pool = unseen.clone();
        }
        if pool.is_empty() {
            return 0.0;
        }

        let mut safe_share = 0.0;
        for _ in 0..iterations {
            pool.shuffle(rng);
            safe_share += safe_fraction(&pool, hand_size, after, view.trump);
        }
        probability *= safe_share / iterations as f64;
        if probability == 0.0 {
            break;
        }
    }
    probability
}

fn safe_fraction(pool: &[Card], hand_size: usize, after: TrickState, trump: Option<Suit>) -> f64 {
    let hands: Vec<&[Card]> = if pool.len() < hand_size {
        vec![pool]
    } else {
        pool.chunks_exact(hand_size).collect()
    };
    let safe = hands
        .iter()
        .filter(|hand| {
            playable_cards(hand, after.suit_to_follow())
                .into_iter()
                .all(|candidate| !after.takes_lead(candidate, trump))
        })
        .count();
    safe as f64 / hands.len() as f64
}
