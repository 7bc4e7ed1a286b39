/// Counts round trips out of bin 0 and back.
///
/// A return to bin 0 only counts once `cooldown_ticks` ticks have passed since
/// the previous increment, so jitter across the bin 0 boundary is ignored.
#[derive(Debug, Clone)]
pub struct ExcursionCounter {
    excursion_number: u32,
    ticks_since_increment: u32,
    cooldown_ticks: u32,
}

impl ExcursionCounter {
    pub fn new(cooldown_ticks: u32) -> Self {
        Self { excursion_number: 1, ticks_since_increment: 0, cooldown_ticks }
    }

    /// Current excursion, starting at 1.
    pub fn excursion_number(&self) -> u32 {
        self.excursion_number
    }

    pub fn ticks_since_increment(&self) -> u32 {
        self.ticks_since_increment
    }

    /// Feeds one step's bin transition. Returns true if a new excursion began.
    pub fn observe(&mut self, previous: Option<usize>, current: usize) -> bool {
        let returned_home = matches!(previous, Some(prev) if prev > 0) && current == 0;
        if returned_home && self.ticks_since_increment >= self.cooldown_ticks {
            self.excursion_number += 1;
            self.ticks_since_increment = 0;
            true
        } else {
            self.ticks_since_increment = self.ticks_since_increment.saturating_add(1);
            false
        }
    }
}
