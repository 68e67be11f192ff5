//! Host platform state shared with the feedback core.
//!
//! The keyboard firmware publishes the fuel-gauge reading and the active
//! profile's connection state from its own contexts (battery polling, the
//! radio stack). They land in atomics here and are read back through
//! [`BatteryPort`] and [`ConnectionPort`] by the dispatch loop.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::app::ports::{BatteryPort, ConnectionPort};

static BATTERY_LEVEL: AtomicU8 = AtomicU8::new(100);
static PROFILE_CONNECTED: AtomicBool = AtomicBool::new(false);

/// Publish the latest state of charge in percent.
pub fn report_battery_level(level: u8) {
    BATTERY_LEVEL.store(level, Ordering::Relaxed);
}

/// Publish whether the active profile has an established connection.
pub fn report_profile_connected(connected: bool) {
    PROFILE_CONNECTED.store(connected, Ordering::Relaxed);
}

/// Reads the published platform state.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformState;

impl BatteryPort for PlatformState {
    fn state_of_charge(&mut self) -> u8 {
        BATTERY_LEVEL.load(Ordering::Relaxed)
    }
}

impl ConnectionPort for PlatformState {
    fn is_profile_connected(&self) -> bool {
        PROFILE_CONNECTED.load(Ordering::Relaxed)
    }
}
