//! Keyboard feedback firmware: main entry point.
//!
//! Hexagonal architecture with a single serial dispatch loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink     MonotonicClock      │
//! │  (Actuator+Battery+Conn)  (EventSink)      (Instant source)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            FeedbackService (pure logic)                │    │
//! │  │  Policy · Toggle · PatternEngine · DeadlineTimer       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  EVENTS queue ◀── key scan / radio callbacks / battery poll    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use log::{error, info};

use keyfeedback::adapters::hardware::HardwareAdapter;
use keyfeedback::adapters::log_sink::LogEventSink;
use keyfeedback::adapters::time::MonotonicClock;
use keyfeedback::app::service::FeedbackService;
use keyfeedback::config::{ActuatorKind, FeedbackConfig};
use keyfeedback::drivers::actuator::ActuatorDriver;
use keyfeedback::events::EVENTS;
use keyfeedback::pins;

/// Dispatch loop period. Bounds deadline jitter.
const LOOP_INTERVAL_MS: u32 = 10;

/// Preset for this board.
fn board_config() -> FeedbackConfig {
    #[cfg(feature = "battery-led")]
    {
        FeedbackConfig::battery_led()
    }
    #[cfg(not(feature = "battery-led"))]
    {
        FeedbackConfig::vibe_motor()
    }
}

fn output(gpio: i32) -> Result<PinDriver<'static, AnyOutputPin, Output>> {
    // SAFETY: every GPIO number comes from `pins` and is claimed exactly once.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(PinDriver::output(pin)?)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("keyfeedback v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = board_config();
    config.validate()?;

    // ── 3. Actuator ───────────────────────────────────────────
    let outputs = match config.actuator {
        ActuatorKind::VibrationMotor => vec![output(pins::VIBE_MOTOR_GPIO)?],
        ActuatorKind::RgbLed => vec![
            output(pins::LED_R_GPIO)?,
            output(pins::LED_G_GPIO)?,
            output(pins::LED_B_GPIO)?,
        ],
    };
    let mut hw = HardwareAdapter::new(ActuatorDriver::new(outputs, config.polarity));
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    let startup_pulse = config.startup_pulse;
    let mut service = match FeedbackService::init(config, &mut hw, &EVENTS, &mut sink) {
        Ok(s) => s,
        Err(e) => {
            // Feedback stays offline; nothing else in this image needs the loop.
            error!("feedback disabled: {}", e);
            return Ok(());
        }
    };

    // ── 4. Boot confirmation (the only blocking actuation) ────
    if let Some(pulse) = startup_pulse {
        hw.actuator_mut()
            .blocking_pulse(pulse.channels, pulse.on_ms, &mut FreeRtos);
    }

    service.start(clock.now(), &mut hw, &mut sink);

    // ── 5. Dispatch loop ──────────────────────────────────────
    loop {
        service.dispatch(clock.now(), &EVENTS, &mut hw, &mut sink);

        FreeRtos::delay_ms(LOOP_INTERVAL_MS);
    }
}
