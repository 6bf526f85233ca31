//! Platform agnostic driver for a bank of DL3416 alphanumeric displays
//! multiplexed behind two cascaded 74HC595 shift registers.
//!
//! Five 4-character modules share one 3-wire serial link. The modules keep
//! no content of their own between writes, so the driver re-addresses and
//! rewrites one character per [`Display::tick`]; call it at least once per
//! millisecond and the whole 20-character line stays flicker-free.
//!
//! ```ignore
//! let iface = dl3416::GpioInterface::new(ser, srclk, rclk, delay_us);
//! let mut bank = dl3416::Display::new(iface);
//! bank.init(&mut delay_ms)?;
//! bank.set_text("HELLO WORLD 12345678");
//! loop {
//!     bank.tick(timer.micros())?;
//! }
//! ```

#![no_std]

extern crate embedded_hal;

#[cfg(test)]
extern crate std;

mod command;
mod scheduler;

pub mod buffer;
pub mod display;
pub mod interface;
pub mod time;

pub use buffer::TextBuffer;
pub use command::DigitAddressing;
pub use display::Display;
pub use interface::{GpioInterface, ShiftInterface};
pub use scheduler::Position;
pub use time::Monotonic;

/// Display modules in the bank.
pub const DISPLAYS: usize = 5;
/// Characters per module.
pub const DIGITS_PER_DISPLAY: usize = 4;
/// Character cells across the whole bank.
pub const WIDTH: usize = DISPLAYS * DIGITS_PER_DISPLAY;
