//! Bus abstraction between the driver and the shift register cascade.
//!
//! The driver core only knows how to hand a finished 16-bit word to
//! something implementing [`ShiftInterface`]. [`GpioInterface`] is the
//! stock implementation for two 74HC595s bit-banged over three GPIO lines.

use display_interface::DisplayError;
use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

/// Half-period hold for the shift clock. The registers need their setup
/// time honoured or bits arrive corrupted at the far end of the cascade.
const SETTLE_US: u8 = 1;

/// A write-only sink for 16-bit control words.
pub trait ShiftInterface {
    /// Make `word` visible on the cascade's parallel outputs.
    fn send_word(&mut self, word: u16) -> Result<(), DisplayError>;
}

/// Bit-banged 3-wire link to two cascaded 74HC595 shift registers:
/// serial data, shift clock and latch clock.
pub struct GpioInterface<SER, SRCLK, RCLK, D> {
    ser: SER,
    srclk: SRCLK,
    rclk: RCLK,
    delay: D,
}

impl<SER, SRCLK, RCLK, D> GpioInterface<SER, SRCLK, RCLK, D>
where
    SER: OutputPin,
    SRCLK: OutputPin,
    RCLK: OutputPin,
    D: DelayUs<u8>,
{
    pub fn new(ser: SER, srclk: SRCLK, rclk: RCLK, delay: D) -> Self {
        GpioInterface {
            ser,
            srclk,
            rclk,
            delay,
        }
    }

    /// Release the interface and give the pins back.
    pub fn release(self) -> (SER, SRCLK, RCLK, D) {
        (self.ser, self.srclk, self.rclk, self.delay)
    }
}

impl<SER, SRCLK, RCLK, D> ShiftInterface for GpioInterface<SER, SRCLK, RCLK, D>
where
    SER: OutputPin,
    SRCLK: OutputPin,
    RCLK: OutputPin,
    D: DelayUs<u8>,
{
    /// Shift all 16 bits out MSB-first, latch low throughout, then pulse
    /// the latch high so the receiving registers present the new word.
    fn send_word(&mut self, word: u16) -> Result<(), DisplayError> {
        self.rclk
            .set_low()
            .map_err(|_| DisplayError::BusWriteError)?;

        for i in (0..16).rev() {
            if (word >> i) & 1 == 1 {
                self.ser.set_high()
            } else {
                self.ser.set_low()
            }
            .map_err(|_| DisplayError::BusWriteError)?;

            self.srclk
                .set_high()
                .map_err(|_| DisplayError::BusWriteError)?;
            self.delay.delay_us(SETTLE_US);
            self.srclk
                .set_low()
                .map_err(|_| DisplayError::BusWriteError)?;
            self.delay.delay_us(SETTLE_US);
        }

        self.rclk
            .set_high()
            .map_err(|_| DisplayError::BusWriteError)?;
        self.delay.delay_us(SETTLE_US);
        Ok(())
    }
}
