//! Outbound feedback events.
//!
//! The [`FeedbackService`](super::service::FeedbackService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Absence of the
//! physical signal is the only user-visible symptom of a problem, so these
//! records are the only way to see why feedback did or did not happen.

use crate::error::InitError;
use crate::patterns::PatternKind;

/// Why an event produced no actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Layer feedback is switched off by the toggle key.
    ToggleDisabled,
    /// The connection callback arrived after the profile sequence already
    /// reached its success pulse.
    AlreadyConfirmed,
}

/// Structured events emitted by the feedback core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// The core is up; carries the initial toggle value.
    Started { toggle_enabled: bool },

    /// A pattern took over the actuator.
    PatternStarted(PatternKind),

    /// A pattern ran to completion.
    PatternFinished(PatternKind),

    /// An in-flight pattern was cancelled by a newer selection.
    Superseded {
        previous: PatternKind,
        by: PatternKind,
    },

    /// An in-flight poll was short-circuited by an external notification.
    ConditionMet(PatternKind),

    Suppressed(SuppressReason),

    /// The toggle key flipped layer feedback on or off.
    ToggleChanged(bool),

    /// The actuator could not be claimed; feedback stays offline.
    InitFailed(InitError),
}
