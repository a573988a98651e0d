/// Cyclic seatings: rotation `r` puts agent `(seat + r) % n` in each seat, so
/// every agent takes every position once the rotations cover the table.
pub struct SeatRotations {
    seatings: Vec<Vec<usize>>,
}

impl SeatRotations {
    pub fn new(players: usize, count: usize) -> Self {
        let seatings = (0..count.min(players))
            .map(|rotation| {
                (0..players)
                    .map(|seat| (seat + rotation) % players)
                    .collect()
            })
            .collect();
        Self { seatings }
    }

    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.seatings
    }
}
