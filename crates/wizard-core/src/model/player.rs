use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 6;

/// Seat index in turn order; seat `n - 1` is followed by seat `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(u8);

impl Seat {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn next(self, player_count: usize) -> Seat {
        Seat(((self.0 as usize + 1) % player_count) as u8)
    }

    /// All seats in turn order starting at seat 0.
    pub fn all(player_count: usize) -> impl Iterator<Item = Seat> {
        (0..player_count).map(|index| Seat(index as u8))
    }

    /// All seats in turn order starting at `self`.
    pub fn cycle_from(self, player_count: usize) -> impl Iterator<Item = Seat> {
        (0..player_count).map(move |offset| Seat(((self.index() + offset) % player_count) as u8))
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Seat;

    #[test]
    fn next_wraps_around() {
        assert_eq!(Seat::new(3).next(4), Seat::new(0));
        assert_eq!(Seat::new(1).next(4), Seat::new(2));
    }

    #[test]
    fn cycle_starts_at_given_seat() {
        let order: Vec<usize> = Seat::new(2).cycle_from(4).map(Seat::index).collect();
        assert_eq!(order, vec![2, 3, 0, 1]);
    }
}
