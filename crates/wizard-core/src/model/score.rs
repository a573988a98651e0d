use crate::model::player::Seat;

const EXACT_BID_BONUS: i32 = 20;
const POINTS_PER_TRICK: i32 = 10;
const PENALTY_PER_MISSED_TRICK: i32 = 10;

/// Score for one round: an exact bid earns 20 plus 10 per trick, otherwise
/// each trick of difference costs 10.
pub fn round_score(bid: u8, won: u8) -> i32 {
    if bid == won {
        EXACT_BID_BONUS + POINTS_PER_TRICK * i32::from(won)
    } else {
        -PENALTY_PER_MISSED_TRICK * (i32::from(bid) - i32::from(won)).abs()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: Vec<i32>,
}

impl ScoreBoard {
    pub fn new(player_count: usize) -> Self {
        Self {
            totals: vec![0; player_count],
        }
    }

    pub fn add(&mut self, seat: Seat, points: i32) {
        self.totals[seat.index()] += points;
    }

    pub fn score(&self, seat: Seat) -> i32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[i32] {
        &self.totals
    }

    pub fn apply_round(&mut self, round_scores: &[i32]) {
        for (total, points) in self.totals.iter_mut().zip(round_scores) {
            *total += points;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScoreBoard, round_score};
    use crate::model::player::Seat;

    #[test]
    fn exact_bid_earns_bonus() {
        assert_eq!(round_score(0, 0), 20);
        assert_eq!(round_score(3, 3), 50);
    }

    #[test]
    fn missed_bid_costs_ten_per_trick() {
        assert_eq!(round_score(2, 0), -20);
        assert_eq!(round_score(1, 4), -30);
    }

    #[test]
    fn apply_round_accumulates() {
        let mut board = ScoreBoard::new(3);
        board.apply_round(&[20, -10, 40]);
        board.apply_round(&[30, -10, -20]);
        assert_eq!(board.standings(), &[50, -20, 20]);
    }

    #[test]
    fn add_credits_one_seat() {
        let mut board = ScoreBoard::new(4);
        board.add(Seat::new(2), 30);
        assert_eq!(board.score(Seat::new(2)), 30);
        assert_eq!(board.score(Seat::new(3)), 0);
    }
}
