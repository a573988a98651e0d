//! Mutable playout state with scoped undo.

use std::ops::{Deref, DerefMut};
use wizard_core::model::card::Card;
use wizard_core::model::player::Seat;

/// Hands and trick tallies of one sampled deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationState {
    hands: Vec<Vec<Card>>,
    tallies: Vec<u8>,
}

impl SimulationState {
    pub fn new(hands: Vec<Vec<Card>>, tallies: Vec<u8>) -> Self {
        debug_assert_eq!(hands.len(), tallies.len());
        Self { hands, tallies }
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat.index()]
    }

    pub fn tally(&self, seat: Seat) -> u8 {
        self.tallies[seat.index()]
    }

    /// Removes `card` from the seat's hand until the guard drops.
    pub fn take_card(&mut self, seat: Seat, card: Card) -> Option<HandRestore<'_>> {
        let hand = &mut self.hands[seat.index()];
        let slot = hand.iter().position(|held| *held == card)?;
        hand.remove(slot);
        Some(HandRestore {
            state: self,
            seat,
            slot,
            card,
        })
    }

    /// Credits `seat` with a trick until the guard drops.
    pub fn credit_trick(&mut self, seat: Seat) -> TallyRestore<'_> {
        self.tallies[seat.index()] += 1;
        TallyRestore { state: self, seat }
    }
}

pub struct HandRestore<'a> {
    state: &'a mut SimulationState,
    seat: Seat,
    slot: usize,
    card: Card,
}

impl Deref for HandRestore<'_> {
    type Target = SimulationState;

    fn deref(&self) -> &SimulationState {
        self.state
    }
}

impl DerefMut for HandRestore<'_> {
    fn deref_mut(&mut self) -> &mut SimulationState {
        self.state
    }
}

impl Drop for HandRestore<'_> {
    fn drop(&mut self) {
        self.state.hands[self.seat.index()].insert(self.slot, self.card);
    }
}

pub struct TallyRestore<'a> {
    state: &'a mut SimulationState,
    seat: Seat,
}

impl Deref for TallyRestore<'_> {
    type Target = SimulationState;

    fn deref(&self) -> &SimulationState {
        self.state
    }
}

impl DerefMut for TallyRestore<'_> {
    fn deref_mut(&mut self) -> &mut SimulationState {
        self.state
    }
}

impl Drop for TallyRestore<'_> {
    fn drop(&mut self) {
        self.state.tallies[self.seat.index()] -= 1;
    }
}
