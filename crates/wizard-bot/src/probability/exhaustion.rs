use super::losing::{Buckets, GROUPS, group_allowed};
use std::collections::HashMap;
use wizard_core::belief::SuitMask;

/// Chance that every opponent in `masks` (turn order) plays a losing card,
/// each drawing only from the groups its mask still allows.
pub fn all_opponents_lose(buckets: &Buckets, masks: &[SuitMask]) -> f64 {
    let mut recursion = Exhaustion {
        initial: *buckets,
        masks,
        memo: HashMap::new(),
    };
    recursion.probability(buckets.losing)
}

struct Exhaustion<'a> {
    initial: Buckets,
    masks: &'a [SuitMask],
    memo: HashMap<[u8; GROUPS], f64>,
}

impl Exhaustion<'_> {
    fn probability(&mut self, losing: [u8; GROUPS]) -> f64 {
        // Each opponent removes exactly one losing card, so the depth follows
        // from the vector itself.
        let depth = self.initial.losing_total() - losing.iter().map(|&c| c as usize).sum::<usize>();
        let Some(&mask) = self.masks.get(depth) else {
            return 1.0;
        };
        if let Some(&cached) = self.memo.get(&losing) {
            return cached;
        }

        let available: usize = (0..GROUPS)
            .filter(|&group| group_allowed(mask, group))
            .map(|group| self.unseen_now(group, &losing))
            .sum();

        let mut total = 0.0;
        if available > 0 {
            for group in 0..GROUPS {
                if losing[group] == 0 || !group_allowed(mask, group) {
                    continue;
                }
                let share = losing[group] as f64 / available as f64;
                let mut next = losing;
                next[group] -= 1;
                total += share * self.probability(next);
            }
        }

        self.memo.insert(losing, total);
        total
    }

    fn unseen_now(&self, group: usize, losing: &[u8; GROUPS]) -> usize {
        let drawn = self.initial.losing[group] - losing[group];
        (self.initial.unseen[group] - drawn) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::uniform::all_draws_lose;
    use wizard_core::model::card::Card;
    use wizard_core::model::card_set::CardSet;
    use wizard_core::model::suit::Suit;

    fn buckets(candidate: &str, trump: Option<Suit>, seen: &[&str]) -> Buckets {
        let seen: CardSet = seen.iter().map(|text| text.parse::<Card>().unwrap()).collect();
        Buckets::tally(candidate.parse().unwrap(), trump, seen)
    }

    #[test]
    fn without_knowledge_matches_uniform() {
        let buckets = buckets("9R", Some(Suit::Green), &["9R", "2B", "Z0"]);
        let masks = [SuitMask::EMPTY; 3];
        let expected = all_draws_lose(buckets.losing_total(), buckets.unseen_total(), 3);
        let p = all_opponents_lose(&buckets, &masks);
        assert!((p - expected).abs() < 1e-9, "{p} vs {expected}");
    }

    #[test]
    fn exhausted_trump_raises_the_chance() {
        let buckets = buckets("9R", Some(Suit::Green), &["9R"]);
        let open = all_opponents_lose(&buckets, &[SuitMask::EMPTY; 2]);
        let no_green = SuitMask::EMPTY.with(Suit::Green);
        let informed = all_opponents_lose(&buckets, &[no_green, no_green]);
        assert!(informed > open, "{informed} <= {open}");
        assert!(informed <= 1.0);
    }

    #[test]
    fn fully_exhausted_opponent_draws_only_specials() {
        let buckets = buckets("13B", None, &["13B"]);
        let mut everything = SuitMask::EMPTY;
        for suit in Suit::ALL {
            everything = everything.with(suit);
        }
        // Only specials are left for the opponent: 4 Jesters lose, 4 Wizards win.
        let p = all_opponents_lose(&buckets, &[everything]);
        assert!((p - 0.5).abs() < 1e-12);
        assert_eq!(all_opponents_lose(&buckets, &[]), 1.0);
    }

    #[test]
    fn opponent_void_in_every_losing_suit_cannot_lose() {
        // Only a Wizard and 5R are unseen; the lone opponent holds no Red.
        let unseen = CardSet::from_cards(&[Card::Wizard(0), "5R".parse().unwrap()]);
        let seen: CardSet = unseen.complement().collect();
        let buckets = Buckets::tally("13B".parse().unwrap(), None, seen);
        assert_eq!(buckets.losing, [0, 0, 1, 0, 0]);
        assert_eq!(buckets.unseen, [0, 0, 1, 0, 1]);

        let no_red = SuitMask::EMPTY.with(Suit::Red);
        assert_eq!(all_opponents_lose(&buckets, &[no_red]), 0.0);
        assert!((all_opponents_lose(&buckets, &[SuitMask::EMPTY]) - 0.5).abs() < 1e-12);
    }
}
