//! Port traits: the hexagonal boundary between the feedback core and the
//! host firmware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FeedbackService (domain)
//! ```
//!
//! The host platform owns the radio stack, the fuel gauge and the GPIO
//! controller; the core only sees them through these traits, so the whole
//! scheduling logic runs unchanged against mock adapters on the host.

use crate::channels::Channels;
use crate::error::InitError;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The single physical output under control.
pub trait ActuatorPort {
    /// Claim the output and drive it inactive. Called exactly once, before
    /// any other method.
    fn configure(&mut self) -> Result<(), InitError>;

    /// Light exactly `channels`; [`Channels::NONE`] turns the output off.
    ///
    /// Total and idempotent: hardware write failures are absorbed by the
    /// adapter.
    fn show(&mut self, channels: Channels);

    /// Number of output lines (1 for a motor, 3 for an RGB triad).
    fn channel_count(&self) -> usize;

    /// Convenience: every channel on, or off.
    fn set(&mut self, on: bool) {
        let channels = if on {
            Channels::all(self.channel_count())
        } else {
            Channels::NONE
        };
        self.show(channels);
    }
}

// ───────────────────────────────────────────────────────────────
// Query ports (driven adapters: host state → domain)
// ───────────────────────────────────────────────────────────────

/// State of charge from the host's fuel gauge.
pub trait BatteryPort {
    /// Percentage, nominally `0..=100`. Callers clamp.
    fn state_of_charge(&mut self) -> u8;
}

/// Connection state of the active BLE profile.
pub trait ConnectionPort {
    fn is_profile_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core reports what it did through this port. The production adapter
/// logs; tests record.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::FeedbackEvent);
}
