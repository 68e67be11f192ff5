//! Feedback configuration.
//!
//! All tunable parameters for the feedback core. The firmware selects one
//! of the presets at build time; every historical handler variant (vibe
//! motor, 3-band battery LED, 4-band battery LED) is a preset of the same
//! engine rather than a separate code path.
//!
//! Durations are plain milliseconds so the structure stays trivially
//! serialisable.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::channels::Channels;
use crate::error::ConfigError;

/// HID usage page for keyboard/keypad keys.
pub const HID_USAGE_KEY: u8 = 0x07;
/// HID keyboard usage for F24, unused on most layouts. Default toggle key.
pub const KEY_F24: u8 = 0x73;

/// Maximum number of battery bands.
pub const MAX_BANDS: usize = 4;

// ---------------------------------------------------------------------------
// Actuator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorKind {
    /// Single GPIO driving a vibration motor.
    VibrationMotor,
    /// Three discrete LEDs (R, G, B).
    RgbLed,
}

impl ActuatorKind {
    pub const fn channel_count(self) -> usize {
        match self {
            Self::VibrationMotor => 1,
            Self::RgbLed => 3,
        }
    }
}

/// Electrical level that lights a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    ActiveHigh,
    /// XIAO-style LEDs sink current: driving the pin low turns them on.
    ActiveLow,
}

// ---------------------------------------------------------------------------
// Feedback sections
// ---------------------------------------------------------------------------

/// A single pulse: light `channels` for `on_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseConfig {
    pub channels: Channels,
    pub on_ms: u32,
}

/// Lower bound of a battery band. The band extends up to (excluding) the
/// next band's `min_level`; the last band is closed at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryBand {
    pub min_level: u8,
    pub channels: Channels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryFeedback {
    /// Ascending by `min_level`, first bound 0.
    pub bands: Vec<BatteryBand, MAX_BANDS>,
    /// How long the level colour stays lit.
    pub show_ms: u32,
    /// Show the level once this long after start-up.
    pub boot_delay_ms: Option<u32>,
}

impl BatteryFeedback {
    /// Band covering `level` (clamped to 100).
    ///
    /// Total over validated bands. With unvalidated bands the lowest band
    /// is the fallback so classification never fails; `None` only when no
    /// bands are configured at all.
    pub fn band_for(&self, level: u8) -> Option<&BatteryBand> {
        let level = level.min(100);
        self.bands
            .iter()
            .rev()
            .find(|b| b.min_level <= level)
            .or_else(|| self.bands.first())
    }

    fn validate(&self, channel_count: usize) -> Result<(), ConfigError> {
        if self.bands.is_empty() || self.bands[0].min_level != 0 {
            return Err(ConfigError::InvalidBands);
        }
        let ascending = self
            .bands
            .windows(2)
            .all(|w| w[0].min_level < w[1].min_level);
        if !ascending || self.bands.iter().any(|b| b.min_level > 100) {
            return Err(ConfigError::InvalidBands);
        }
        if self.bands.iter().any(|b| !b.channels.fits(channel_count)) {
            return Err(ConfigError::ChannelOutOfRange);
        }
        if self.show_ms == 0 {
            return Err(ConfigError::ZeroDuration("battery.show_ms"));
        }
        Ok(())
    }
}

/// The designated toggle key and its confirmation pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleConfig {
    pub usage_page: u8,
    pub keycode: u8,
    pub pulse: PulseConfig,
}

/// "Signal start" cue played when the active profile changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartCue {
    Single { on_ms: u32 },
    Double { on_ms: u32, gap_ms: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFeedback {
    pub channels: Channels,
    /// Quiet period after the profile switch before the cue.
    pub start_delay_ms: u32,
    pub cue: StartCue,
    /// Interval between "is the profile connected yet" checks.
    pub poll_interval_ms: u32,
    /// Long pulse once the connection is up.
    pub success_ms: u32,
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub actuator: ActuatorKind,
    pub polarity: Polarity,
    /// Battery level colour on [`Event::BatteryQuery`](crate::events::Event).
    pub battery: Option<BatteryFeedback>,
    /// Pulse when a layer is entered (gated by the toggle).
    pub layer: Option<PulseConfig>,
    pub toggle: Option<ToggleConfig>,
    pub profile: Option<ProfileFeedback>,
    /// Pulse when the radio reports a connection outside a profile switch.
    pub connection: Option<PulseConfig>,
    /// Blocking confirmation pulse played once at boot, before the loop.
    pub startup_pulse: Option<PulseConfig>,
}

impl FeedbackConfig {
    /// Vibration motor: layer buzz, toggle key, profile-switch sequence.
    pub fn vibe_motor() -> Self {
        Self {
            actuator: ActuatorKind::VibrationMotor,
            polarity: Polarity::ActiveHigh,
            battery: None,
            layer: Some(PulseConfig {
                channels: Channels::MOTOR,
                on_ms: 150,
            }),
            toggle: Some(ToggleConfig {
                usage_page: HID_USAGE_KEY,
                keycode: KEY_F24,
                pulse: PulseConfig {
                    channels: Channels::MOTOR,
                    on_ms: 400,
                },
            }),
            profile: Some(ProfileFeedback {
                channels: Channels::MOTOR,
                start_delay_ms: 500,
                cue: StartCue::Single { on_ms: 100 },
                poll_interval_ms: 500,
                success_ms: 1000,
            }),
            connection: None,
            startup_pulse: None,
        }
    }

    /// RGB LEDs showing battery level in three bands: red / blue / green.
    pub fn battery_led() -> Self {
        Self::battery_led_with(&[
            (0, Channels::RED),
            (30, Channels::BLUE),
            (80, Channels::GREEN),
        ])
    }

    /// RGB LEDs with four bands; the second band mixes red and green.
    pub fn battery_led_four_band() -> Self {
        Self::battery_led_with(&[
            (0, Channels::RED),
            (20, Channels::YELLOW),
            (50, Channels::BLUE),
            (80, Channels::GREEN),
        ])
    }

    fn battery_led_with(bands: &[(u8, Channels)]) -> Self {
        let bands = bands
            .iter()
            .take(MAX_BANDS)
            .map(|&(min_level, channels)| BatteryBand {
                min_level,
                channels,
            })
            .collect();
        Self {
            actuator: ActuatorKind::RgbLed,
            polarity: Polarity::ActiveLow,
            battery: Some(BatteryFeedback {
                bands,
                show_ms: 2000,
                boot_delay_ms: Some(1000),
            }),
            layer: None,
            toggle: None,
            profile: None,
            connection: None,
            startup_pulse: None,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.actuator.channel_count()
    }

    /// Check band partition, channel ranges and non-zero durations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.channel_count();

        if let Some(battery) = &self.battery {
            battery.validate(count)?;
        }
        check_pulse(self.layer.as_ref(), count, "layer.on_ms")?;
        check_pulse(self.toggle.as_ref().map(|t| &t.pulse), count, "toggle.on_ms")?;
        check_pulse(self.connection.as_ref(), count, "connection.on_ms")?;
        check_pulse(self.startup_pulse.as_ref(), count, "startup_pulse.on_ms")?;

        if let Some(profile) = &self.profile {
            if !profile.channels.fits(count) {
                return Err(ConfigError::ChannelOutOfRange);
            }
            if profile.poll_interval_ms == 0 {
                return Err(ConfigError::ZeroDuration("profile.poll_interval_ms"));
            }
            if profile.success_ms == 0 {
                return Err(ConfigError::ZeroDuration("profile.success_ms"));
            }
            let cue_on = match profile.cue {
                StartCue::Single { on_ms } | StartCue::Double { on_ms, .. } => on_ms,
            };
            if cue_on == 0 {
                return Err(ConfigError::ZeroDuration("profile.cue.on_ms"));
            }
        }
        Ok(())
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self::vibe_motor()
    }
}

fn check_pulse(
    pulse: Option<&PulseConfig>,
    count: usize,
    field: &'static str,
) -> Result<(), ConfigError> {
    match pulse {
        Some(p) if !p.channels.fits(count) => Err(ConfigError::ChannelOutOfRange),
        Some(p) if p.on_ms == 0 => Err(ConfigError::ZeroDuration(field)),
        _ => Ok(()),
    }
}
