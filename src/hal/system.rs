//! Monotonic clock backed by `std::time::Instant`.

use std::time::Instant;

use crate::traits::Clock;

/// Clock measuring milliseconds since its creation.
///
/// # Example
///
/// ```rust
/// use rs_spinner::hal::SystemClock;
/// use rs_spinner::traits::Clock;
///
/// let clock = SystemClock::new();
/// let start = clock.now_ms();
/// assert!(clock.now_ms() >= start);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is now.
    #[inline]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        // Saturates after ~584 million years
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
