//! Event classification.
//!
//! Maps every inbound [`Event`] to exactly one [`Reaction`]. The mapping is
//! a pure function of the event payload, the toggle value and the
//! configuration; the only side input is the fuel gauge, read when a
//! battery query arrives without a level.
//!
//! | Event                   | Reaction                                   |
//! |-------------------------|--------------------------------------------|
//! | `BatteryQuery`          | `Start(BatteryLevel)` in the level's band  |
//! | `KeyPress` (toggle key) | `Toggle`, on press only                    |
//! | `LayerChange` (entered) | `Start(SinglePulse)` if the toggle allows  |
//! | `ProfileChange`         | `Start(ProfileSequence)`                   |
//! | `ConnectionEstablished` | resolved by the service, `NoOp` on error   |
//!
//! Anything unconfigured or unrecognised is `NoOp`. Classification never
//! fails.

use log::debug;

use crate::config::FeedbackConfig;
use crate::events::Event;
use crate::patterns::Pattern;

use super::events::SuppressReason;
use super::ports::BatteryPort;
use super::toggle::ToggleState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    NoOp,
    /// Nothing to actuate, for a reason worth reporting.
    Suppressed(SuppressReason),
    /// Supersede the running pattern with `pattern`. `condition_met` says
    /// the event already proved the pattern's poll condition.
    Start {
        pattern: Pattern,
        condition_met: bool,
    },
    /// Flip layer feedback and confirm with the given pulse.
    Toggle(Pattern),
    /// A successful connection callback. Depends on the in-flight pattern.
    ConnectionEstablished,
}

impl Reaction {
    fn start(pattern: Pattern) -> Self {
        Self::Start {
            pattern,
            condition_met: false,
        }
    }
}

/// Classify one event.
pub fn classify(
    event: &Event,
    toggle: &ToggleState,
    config: &FeedbackConfig,
    battery: &mut impl BatteryPort,
) -> Reaction {
    match *event {
        Event::BatteryQuery { level } => {
            let Some(cfg) = &config.battery else {
                return Reaction::NoOp;
            };
            let level = level.unwrap_or_else(|| battery.state_of_charge()).min(100);
            match cfg.band_for(level) {
                Some(band) => {
                    Reaction::start(Pattern::battery_level(level, band.channels, cfg.show_ms))
                }
                None => Reaction::NoOp,
            }
        }

        Event::KeyPress {
            usage_page,
            keycode,
            pressed,
        } => match &config.toggle {
            Some(t) if pressed && usage_page == t.usage_page && keycode == t.keycode => {
                Reaction::Toggle(Pattern::toggle_feedback(t.pulse.channels, t.pulse.on_ms))
            }
            _ => Reaction::NoOp,
        },

        Event::LayerChange { layer, entered } => match &config.layer {
            Some(_) if !entered => Reaction::NoOp,
            Some(_) if !toggle.is_enabled() => {
                debug!("policy: layer {} feedback disabled", layer);
                Reaction::Suppressed(SuppressReason::ToggleDisabled)
            }
            Some(pulse) => Reaction::start(Pattern::single_pulse(pulse.channels, pulse.on_ms)),
            None => Reaction::NoOp,
        },

        Event::ProfileChange { connected } => match &config.profile {
            Some(cfg) => Reaction::Start {
                pattern: Pattern::profile_sequence(cfg, connected),
                condition_met: connected,
            },
            None => Reaction::NoOp,
        },

        Event::ConnectionEstablished { err: Some(err) } => {
            debug!("policy: connection failed ({})", err);
            Reaction::NoOp
        }
        Event::ConnectionEstablished { err: None } => Reaction::ConnectionEstablished,
    }
}

/// Owner of the toggle; the only place it is written.
#[derive(Debug, Default)]
pub struct Policy {
    toggle: ToggleState,
}

impl Policy {
    pub const fn new() -> Self {
        Self {
            toggle: ToggleState::new(),
        }
    }

    pub fn toggle(&self) -> &ToggleState {
        &self.toggle
    }

    /// Classify `event` and apply a `Toggle` reaction to the owned state.
    pub fn react(
        &mut self,
        event: &Event,
        config: &FeedbackConfig,
        battery: &mut impl BatteryPort,
    ) -> Reaction {
        let reaction = classify(event, &self.toggle, config, battery);
        if matches!(reaction, Reaction::Toggle(_)) {
            self.toggle.flip();
        }
        reaction
    }
}
