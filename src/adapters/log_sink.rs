//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one tagged line per
//! [`FeedbackEvent`] to the logger (UART / USB-CDC in production).

use log::{error, info};

use crate::app::events::{FeedbackEvent, SuppressReason};
use crate::app::ports::EventSink;

/// Adapter that logs every [`FeedbackEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FeedbackEvent) {
        match event {
            FeedbackEvent::Started { toggle_enabled } => {
                info!("INIT | started, layer feedback {}", on_off(*toggle_enabled));
            }
            FeedbackEvent::PatternStarted(kind) => {
                info!("PATTERN | start {:?}", kind);
            }
            FeedbackEvent::PatternFinished(kind) => {
                info!("PATTERN | done {:?}", kind);
            }
            FeedbackEvent::Superseded { previous, by } => {
                info!("PATTERN | {:?} superseded by {:?}", previous, by);
            }
            FeedbackEvent::ConditionMet(kind) => {
                info!("PATTERN | condition met for {:?}", kind);
            }
            FeedbackEvent::Suppressed(reason) => {
                let why = match reason {
                    SuppressReason::ToggleDisabled => "layer feedback disabled",
                    SuppressReason::AlreadyConfirmed => "connection already confirmed",
                };
                info!("PATTERN | suppressed: {}", why);
            }
            FeedbackEvent::ToggleChanged(enabled) => {
                info!("TOGGLE | layer feedback {}", on_off(*enabled));
            }
            FeedbackEvent::InitFailed(e) => {
                error!("INIT | failed: {}", e);
            }
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
