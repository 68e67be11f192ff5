//! Single feedback actuator: a vibration motor or a discrete RGB triad.
//!
//! One GPIO per channel, driven through `embedded-hal` so the same driver
//! runs on ESP-IDF `PinDriver`s and on host mock pins.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: each channel is an `esp_idf_hal::gpio::PinDriver` output.
//! On host/test: any `OutputPin` implementation (see the tests below).
//!
//! Pin write failures after `configure` are logged and absorbed; the lit
//! mask always records what was requested.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin, PinState};
use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::ActuatorPort;
use crate::channels::{Channels, MAX_CHANNELS};
use crate::config::Polarity;
use crate::error::InitError;

pub struct ActuatorDriver<P: OutputPin> {
    pins: Vec<P, MAX_CHANNELS>,
    polarity: Polarity,
    lit: Channels,
    ready: bool,
}

impl<P: OutputPin> ActuatorDriver<P> {
    /// Channel `i` is `pins[i]`. Extra pins beyond [`MAX_CHANNELS`] are
    /// dropped.
    pub fn new(pins: impl IntoIterator<Item = P>, polarity: Polarity) -> Self {
        Self {
            pins: pins.into_iter().take(MAX_CHANNELS).collect(),
            polarity,
            lit: Channels::NONE,
            ready: false,
        }
    }

    /// True while any channel is lit.
    pub fn is_active(&self) -> bool {
        !self.lit.is_empty()
    }

    pub fn lit(&self) -> Channels {
        self.lit
    }

    /// Light `channels` for `ms`, then go dark, blocking the caller.
    ///
    /// Only for the boot confirmation pulse, before the dispatch loop runs.
    pub fn blocking_pulse(&mut self, channels: Channels, ms: u32, delay: &mut impl DelayNs) {
        self.show(channels);
        delay.delay_ms(ms);
        self.show(Channels::NONE);
    }

    fn drive(&mut self, channels: Channels) -> Result<(), usize> {
        let polarity = self.polarity;
        let mut failed = Ok(());
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if let Err(e) = pin.set_state(level(polarity, channels.contains(i))) {
                warn!("actuator channel {} write failed: {:?}", i, e.kind());
                failed = Err(i);
            }
        }
        failed
    }
}

fn level(polarity: Polarity, on: bool) -> PinState {
    match polarity {
        Polarity::ActiveHigh => PinState::from(on),
        Polarity::ActiveLow => PinState::from(!on),
    }
}

impl<P: OutputPin> ActuatorPort for ActuatorDriver<P> {
    fn configure(&mut self) -> Result<(), InitError> {
        if self.pins.is_empty() {
            return Err(InitError::DeviceNotReady);
        }
        self.drive(Channels::NONE)
            .map_err(|_| InitError::DeviceNotReady)?;
        self.lit = Channels::NONE;
        self.ready = true;
        debug!("actuator configured, {} channel(s)", self.pins.len());
        Ok(())
    }

    fn show(&mut self, channels: Channels) {
        if !self.ready {
            return;
        }
        let _ = self.drive(channels);
        self.lit = channels;
    }

    fn channel_count(&self) -> usize {
        self.pins.len()
    }
}
