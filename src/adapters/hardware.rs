//! Hardware adapter: bridges the real actuator and platform state to the
//! domain port traits.
//!
//! Owns the [`ActuatorDriver`] and exposes it through [`ActuatorPort`],
//! alongside [`BatteryPort`] and [`ConnectionPort`] backed by
//! [`PlatformState`]. This is the only module in the system that touches
//! the output pins.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, BatteryPort, ConnectionPort};
use crate::channels::Channels;
use crate::drivers::actuator::ActuatorDriver;
use crate::error::InitError;

use super::platform::PlatformState;

/// Concrete adapter that combines the actuator and host state behind the
/// port traits.
pub struct HardwareAdapter<P: OutputPin> {
    actuator: ActuatorDriver<P>,
    platform: PlatformState,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(actuator: ActuatorDriver<P>) -> Self {
        Self {
            actuator,
            platform: PlatformState,
        }
    }

    /// Direct driver access for the blocking boot pulse.
    pub fn actuator_mut(&mut self) -> &mut ActuatorDriver<P> {
        &mut self.actuator
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn configure(&mut self) -> Result<(), InitError> {
        self.actuator.configure()
    }

    fn show(&mut self, channels: Channels) {
        self.actuator.show(channels);
    }

    fn channel_count(&self) -> usize {
        self.actuator.channel_count()
    }
}

// ── Query port implementations ────────────────────────────────

impl<P: OutputPin> BatteryPort for HardwareAdapter<P> {
    fn state_of_charge(&mut self) -> u8 {
        self.platform.state_of_charge()
    }
}

impl<P: OutputPin> ConnectionPort for HardwareAdapter<P> {
    fn is_profile_connected(&self) -> bool {
        self.platform.is_profile_connected()
    }
}
