use display_interface::DisplayError;
use embedded_hal::blocking::delay::DelayMs;

use crate::buffer::TextBuffer;
use crate::command::{Command, DigitAddressing, CHAR_MAX, CHAR_MIN};
use crate::interface::ShiftInterface;
use crate::scheduler::Scheduler;
use crate::time::Monotonic;
use crate::{DIGITS_PER_DISPLAY, DISPLAYS, WIDTH};

/// Settle time after presenting the idle word at power-up.
const POWER_UP_MS: u8 = 50;
/// How long CLR must stay low for the modules to wipe their latches.
const CLEAR_PULSE_MS: u8 = 15;
/// Self test dwell per display module and per character pattern.
const TEST_MODULE_MS: u32 = 1_000;
const TEST_CHAR_MS: u32 = 300;

/// Driver for a bank of five DL3416 modules on a shared shift register
/// cascade.
///
/// The modules have no refresh logic of their own, so the driver walks the
/// 20 cells round-robin and rewrites one per [`Display::tick`]. Call `tick`
/// at least once per millisecond; it returns immediately when the current
/// cell's dwell time has not yet elapsed.
pub struct Display<DI> {
    iface: DI,
    buffer: TextBuffer,
    scheduler: Scheduler,
    addressing: DigitAddressing,
}

impl<DI> Display<DI>
where
    DI: ShiftInterface,
{
    /// New driver with the cascade wiring's digit addressing.
    pub fn new(iface: DI) -> Display<DI> {
        Display::with_addressing(iface, DigitAddressing::CASCADE)
    }

    /// New driver with an explicit digit-address table, for boards wired
    /// after the other datasheet variant.
    pub fn with_addressing(iface: DI, addressing: DigitAddressing) -> Display<DI> {
        Display {
            iface,
            buffer: TextBuffer::new(),
            scheduler: Scheduler::new(0),
            addressing,
        }
    }

    /// Release the driver and give the interface back.
    pub fn release(self) -> DI {
        self.iface
    }

    /// Bring the bank up: settle the control lines in their inactive state,
    /// wipe every module and reset the scan to the first cell.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), DisplayError>
    where
        D: DelayMs<u8>,
    {
        Command::Idle.send(&mut self.iface, &self.addressing)?;
        delay.delay_ms(POWER_UP_MS);
        self.blank(delay)?;
        self.scheduler.reset(0);
        Ok(())
    }

    /// Replace the displayed line. Takes effect within one full scan cycle.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    /// Set all 20 cells to space. The scan repaints them on its own.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Wipe the modules immediately with a hardware CLR pulse, without
    /// waiting for the scan to repaint. Also clears the buffer.
    pub fn blank<D>(&mut self, delay: &mut D) -> Result<(), DisplayError>
    where
        D: DelayMs<u8>,
    {
        Command::ClearAssert.send(&mut self.iface, &self.addressing)?;
        delay.delay_ms(CLEAR_PULSE_MS);
        Command::ClearRelease.send(&mut self.iface, &self.addressing)?;
        self.buffer.clear();
        Ok(())
    }

    /// Advance the multiplex scan by at most one cell.
    ///
    /// When the dwell interval has elapsed this writes the three-phase
    /// sequence for the current cell — stage with every write line high,
    /// commit with the target module's line low, restore — and moves on.
    /// The three words go out back to back; nothing else writes the bus
    /// in between. When called too soon it is a no-op.
    pub fn tick(&mut self, now_us: u32) -> Result<(), DisplayError> {
        if !self.scheduler.due(now_us) {
            return Ok(());
        }

        let position = self.scheduler.position();
        let data = self.buffer.cell(position.index());

        for &strobe in &[false, true, false] {
            Command::Put {
                display: position.display,
                digit: position.digit,
                data,
                strobe,
            }
            .send(&mut self.iface, &self.addressing)?;
        }

        self.scheduler.advance(now_us);
        Ok(())
    }

    /// Show `text` and keep the scan running for `duration_ms`. Blocking.
    pub fn show_for<M>(
        &mut self,
        text: &str,
        duration_ms: u32,
        clock: &mut M,
    ) -> Result<(), DisplayError>
    where
        M: Monotonic,
    {
        self.set_text(text);
        self.run_for(duration_ms, clock)
    }

    /// Scroll `message` once across the bank: it enters at the right edge,
    /// crosses the 20 cells and leaves on the left, advancing one column
    /// per `step_ms`. Blocking; the scan keeps running between steps.
    pub fn scroll_once<M>(
        &mut self,
        message: &str,
        step_ms: u32,
        clock: &mut M,
    ) -> Result<(), DisplayError>
    where
        M: Monotonic,
    {
        let steps = message.chars().count() as i32 + WIDTH as i32;
        let step_us = step_ms.saturating_mul(1_000);
        let mut last_step = clock.micros();
        let mut step = 0i32;

        while step < steps {
            let now = clock.micros();
            self.tick(now)?;

            if now.wrapping_sub(last_step) >= step_us {
                self.buffer
                    .load(TextBuffer::window(message, step - WIDTH as i32));
                step += 1;
                last_step = now;
            }
        }
        Ok(())
    }

    /// Diagnostic: light each module with its own number, then sweep the
    /// whole supported character set across all 20 cells, then clear.
    /// Blocking, and slow; not for the hot path.
    pub fn self_test<M>(&mut self, clock: &mut M) -> Result<(), DisplayError>
    where
        M: Monotonic,
    {
        for display in 0..DISPLAYS {
            let mut cells = [b' '; WIDTH];
            for digit in 0..DIGITS_PER_DISPLAY {
                cells[display * DIGITS_PER_DISPLAY + digit] = b'1' + display as u8;
            }
            self.buffer.load(cells);
            self.run_for(TEST_MODULE_MS, clock)?;
        }

        for code in CHAR_MIN..=CHAR_MAX {
            self.buffer.load([code; WIDTH]);
            self.run_for(TEST_CHAR_MS, clock)?;
        }

        self.clear();
        Ok(())
    }

    /// Keep ticking for a fixed duration so the current content stays lit.
    fn run_for<M>(&mut self, duration_ms: u32, clock: &mut M) -> Result<(), DisplayError>
    where
        M: Monotonic,
    {
        let hold_us = duration_ms.saturating_mul(1_000);
        let start = clock.micros();
        loop {
            let now = clock.micros();
            if now.wrapping_sub(start) >= hold_us {
                return Ok(());
            }
            self.tick(now)?;
        }
    }
}
