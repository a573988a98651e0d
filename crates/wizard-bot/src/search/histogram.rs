/// Frequency of final trick counts over simulated playouts, in first-seen
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinHistogram {
    entries: Vec<(u8, u32)>,
}

impl WinHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tricks: u8) {
        match self.entries.iter_mut().find(|(count, _)| *count == tricks) {
            Some((_, frequency)) => *frequency += 1,
            None => self.entries.push((tricks, 1)),
        }
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, frequency)| frequency).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn frequency(&self, tricks: u8) -> u32 {
        self.entries
            .iter()
            .find(|(count, _)| *count == tricks)
            .map_or(0, |(_, frequency)| *frequency)
    }

    /// Most frequent trick count; the earliest recorded wins ties.
    pub fn mode(&self) -> Option<(u8, u32)> {
        let mut best: Option<(u8, u32)> = None;
        for &(tricks, frequency) in &self.entries {
            if best.is_none_or(|(_, top)| frequency > top) {
                best = Some((tricks, frequency));
            }
        }
        best
    }

    /// Recorded trick count closest to `target`, with its frequency. Equal
    /// distances prefer the more frequent entry, then the earlier one.
    pub fn nearest(&self, target: u8) -> Option<(u8, u32)> {
        let mut best: Option<(u8, u32)> = None;
        for &(tricks, frequency) in &self.entries {
            let better = match best {
                None => true,
                Some((best_tricks, best_frequency)) => {
                    let distance = tricks.abs_diff(target);
                    let best_distance = best_tricks.abs_diff(target);
                    distance < best_distance
                        || (distance == best_distance && frequency > best_frequency)
                }
            };
            if better {
                best = Some((tricks, frequency));
            }
        }
        best
    }

    pub fn entries(&self) -> &[(u8, u32)] {
        &self.entries
    }
}
