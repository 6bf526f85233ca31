//! Timer boundary.
//!
//! `embedded-hal` 0.2 has delays but no timestamp source, so the blocking
//! helpers take their clock through this trait. A HAL timer peripheral or a
//! systick-backed counter adapts in a couple of lines.

/// A free-running microsecond counter. It may wrap; every consumer in this
/// crate compares instants with wrapping subtraction, so a wrap mid-interval
/// is harmless as long as the interval itself stays well under `u32::MAX`
/// microseconds.
pub trait Monotonic {
    fn micros(&mut self) -> u32;
}

impl<T: Monotonic + ?Sized> Monotonic for &mut T {
    fn micros(&mut self) -> u32 {
        T::micros(self)
    }
}
