//! Error types for the feedback core.
//!
//! Only initialisation can fail at runtime: once the actuator has been
//! claimed, every event-handling path is total and a malformed event simply
//! becomes a no-op. Configuration errors are caught by
//! [`FeedbackConfig::validate`](crate::config::FeedbackConfig::validate)
//! before the core is brought up.
//!
//! All variants are `Copy` so they can be logged and emitted through the
//! event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Initialisation
// ---------------------------------------------------------------------------

/// The only runtime failure: the actuator hardware could not be claimed.
///
/// Fatal to the feedback component only: the surrounding firmware keeps
/// running without feedback. No retry is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The output device (GPIO port / pin) could not be claimed or driven.
    DeviceNotReady,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotReady => write!(f, "output device not ready"),
        }
    }
}

impl core::error::Error for InitError {}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Battery bands do not partition `0..=100` (first bound must be 0,
    /// bounds strictly ascending and at most 100).
    InvalidBands,
    /// A pulse references a channel the configured actuator does not have.
    ChannelOutOfRange,
    /// A pulse or poll interval of zero milliseconds.
    ZeroDuration(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBands => write!(f, "battery bands do not partition 0..=100"),
            Self::ChannelOutOfRange => write!(f, "channel not present on actuator"),
            Self::ZeroDuration(field) => write!(f, "zero duration: {field}"),
        }
    }
}

impl core::error::Error for ConfigError {}
