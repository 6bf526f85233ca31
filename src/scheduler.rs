use crate::{DIGITS_PER_DISPLAY, WIDTH};

/// Minimum dwell per position. One position per millisecond puts a full
/// 20-position scan at 20 ms, fast enough to look continuously lit.
pub(crate) const DWELL_US: u32 = 1_000;

/// One of the 20 physical character cells, as the hardware addresses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    /// Display module, 0..5.
    pub display: u8,
    /// Digit within the module, 0..4.
    pub digit: u8,
}

impl Position {
    /// Derive a position from a linear cell index. Indices past the last
    /// cell clamp to position 0 rather than address a module that does not
    /// exist; the scan counter cannot produce one, but the addressing must
    /// not depend on that.
    pub fn from_index(index: u8) -> Self {
        let index = if (index as usize) < WIDTH { index } else { 0 };
        Position {
            display: index / DIGITS_PER_DISPLAY as u8,
            digit: index % DIGITS_PER_DISPLAY as u8,
        }
    }

    /// Linear cell index, 0..20, left to right.
    pub fn index(&self) -> usize {
        self.display as usize * DIGITS_PER_DISPLAY + self.digit as usize
    }
}

/// The multiplexing state machine: which cell is next and when it may be
/// written. Owns nothing but its counter and the last-refresh timestamp.
pub(crate) struct Scheduler {
    index: u8,
    last_tick: u32,
}

impl Scheduler {
    pub fn new(now_us: u32) -> Self {
        Scheduler {
            index: 0,
            last_tick: now_us,
        }
    }

    pub fn reset(&mut self, now_us: u32) {
        self.index = 0;
        self.last_tick = now_us;
    }

    /// Has the minimum dwell elapsed since the last completed refresh?
    /// Wraparound-safe: the unsigned difference is correct across a timer
    /// counter wrap.
    pub fn due(&self, now_us: u32) -> bool {
        now_us.wrapping_sub(self.last_tick) >= DWELL_US
    }

    pub fn position(&self) -> Position {
        Position::from_index(self.index)
    }

    /// Record a completed refresh and move to the next cell, wrapping from
    /// the last position back to the first.
    pub fn advance(&mut self, now_us: u32) {
        self.index = (self.index + 1) % WIDTH as u8;
        self.last_tick = now_us;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_visits_every_position_once_per_cycle() {
        let mut scheduler = Scheduler::new(0);
        let mut seen = [0u8; WIDTH];

        for expected in 0..WIDTH {
            let position = scheduler.position();
            assert_eq!(position.index(), expected);
            seen[position.index()] += 1;
            scheduler.advance(0);
        }

        assert!(seen.iter().all(|&n| n == 1));
        // and the cycle wraps back to the start
        assert_eq!(scheduler.position().index(), 0);
    }

    #[test]
    fn it_derives_display_and_digit_from_the_index() {
        assert_eq!(Position::from_index(0), Position { display: 0, digit: 0 });
        assert_eq!(Position::from_index(3), Position { display: 0, digit: 3 });
        assert_eq!(Position::from_index(4), Position { display: 1, digit: 0 });
        assert_eq!(Position::from_index(19), Position { display: 4, digit: 3 });
    }

    #[test]
    fn it_clamps_out_of_range_indices() {
        assert_eq!(Position::from_index(20), Position { display: 0, digit: 0 });
        assert_eq!(Position::from_index(255), Position { display: 0, digit: 0 });
    }

    #[test]
    fn it_gates_on_the_dwell_interval() {
        let scheduler = Scheduler::new(10_000);
        assert!(!scheduler.due(10_000));
        assert!(!scheduler.due(10_999));
        assert!(scheduler.due(11_000));
        assert!(scheduler.due(50_000));
    }

    #[test]
    fn it_survives_timer_wraparound() {
        let mut scheduler = Scheduler::new(u32::MAX - 200);
        assert!(!scheduler.due(u32::MAX - 100));
        // 200 us before the wrap plus 800 us after crosses the threshold
        assert!(scheduler.due(800));

        scheduler.advance(u32::MAX - 500);
        assert!(!scheduler.due(100)); // only 601 us elapsed
        assert!(scheduler.due(500));
    }
}
