//! Clocks

use jiff::Timestamp;

/// A source of the current time.
///
/// Time never comes from an ambient global; anything that needs a timestamp
/// takes a clock, so expiry and receipt dates are testable with a manual
/// implementation.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
