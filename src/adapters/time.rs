//! Monotonic clock adapter.
//!
//! Produces the [`Instant`]s the dispatch loop hands to the core.
//!
//! - **`feature = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(feature = "espidf")`**: uses `std::time::Instant` for
//!   host-side simulation.

use embassy_time::Instant;

pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Time since boot.
    #[cfg(feature = "espidf")]
    pub fn now(&self) -> Instant {
        Instant::from_micros((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64)
    }

    /// Time since construction.
    #[cfg(not(feature = "espidf"))]
    pub fn now(&self) -> Instant {
        Instant::from_micros(self.start.elapsed().as_micros() as u64)
    }
}
