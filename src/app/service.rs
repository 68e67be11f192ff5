//! Feedback service, the hexagonal core.
//!
//! [`FeedbackService`] owns the configuration, the [`Policy`] (and through
//! it the toggle), the [`PatternEngine`] and the boot-time battery
//! deadline. All I/O flows through port traits injected at call sites.
//!
//! ```text
//!  EventQueue ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │    FeedbackService     │
//! ActuatorPort ◀──│ Policy · PatternEngine │◀── BatteryPort
//!                 └────────────────────────┘◀── ConnectionPort
//! ```
//!
//! The dispatch loop calls [`handle`](FeedbackService::handle) for every
//! dequeued event and [`poll`](FeedbackService::poll) whenever
//! [`next_deadline`](FeedbackService::next_deadline) has passed. Both run
//! in the same context, so they never interleave.

use embassy_time::{Duration, Instant};
use log::{debug, error, info};

use crate::channels::Channels;
use crate::config::FeedbackConfig;
use crate::error::InitError;
use crate::events::{Event, EventQueue};
use crate::patterns::{Condition, Pattern, PatternEngine, PatternKind, Satisfy};
use crate::scheduler::DeadlineTimer;

use super::events::{FeedbackEvent, SuppressReason};
use super::policy::{Policy, Reaction};
use super::ports::{ActuatorPort, BatteryPort, ConnectionPort, EventSink};

pub struct FeedbackService {
    config: FeedbackConfig,
    policy: Policy,
    engine: PatternEngine,
    /// One-shot battery show after boot.
    boot: DeadlineTimer<()>,
}

impl FeedbackService {
    /// Claim the actuator and open the listeners on `queue`.
    ///
    /// On failure the error is reported once through `sink`, the listeners
    /// stay closed and feedback is offline for the rest of the process.
    /// There is no retry.
    pub fn init(
        config: FeedbackConfig,
        actuator: &mut impl ActuatorPort,
        queue: &EventQueue,
        sink: &mut impl EventSink,
    ) -> Result<Self, InitError> {
        if let Err(e) = actuator.configure() {
            error!("feedback actuator unavailable: {}", e);
            sink.emit(&FeedbackEvent::InitFailed(e));
            return Err(e);
        }
        queue.register_listeners();
        info!(
            "feedback ready: {:?}, {} channel(s)",
            config.actuator,
            actuator.channel_count()
        );

        Ok(Self {
            config,
            policy: Policy::new(),
            engine: PatternEngine::new(),
            boot: DeadlineTimer::new(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the actuator dark and arm the boot battery show, if any.
    pub fn start(&mut self, now: Instant, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.show(Channels::NONE);
        let boot_delay = self.config.battery.as_ref().and_then(|b| b.boot_delay_ms);
        if let Some(ms) = boot_delay {
            self.boot
                .schedule(now, Duration::from_millis(u64::from(ms)), ());
        }
        sink.emit(&FeedbackEvent::Started {
            toggle_enabled: self.toggle_enabled(),
        });
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Process one inbound event.
    pub fn handle(
        &mut self,
        event: Event,
        now: Instant,
        hw: &mut (impl ActuatorPort + BatteryPort + ConnectionPort),
        sink: &mut impl EventSink,
    ) {
        debug!("dispatch {:?}", event);
        match self.policy.react(&event, &self.config, hw) {
            Reaction::NoOp => {}
            Reaction::Suppressed(reason) => sink.emit(&FeedbackEvent::Suppressed(reason)),
            Reaction::Start {
                pattern,
                condition_met,
            } => self.run(pattern, condition_met, now, hw, sink),
            Reaction::Toggle(confirm) => {
                let enabled = self.toggle_enabled();
                sink.emit(&FeedbackEvent::ToggleChanged(enabled));
                self.run(confirm, false, now, hw, sink);
            }
            Reaction::ConnectionEstablished => self.connection_established(now, hw, sink),
        }
    }

    /// Fire whatever deadline has expired by `now`.
    pub fn poll(
        &mut self,
        now: Instant,
        hw: &mut (impl ActuatorPort + BatteryPort + ConnectionPort),
        sink: &mut impl EventSink,
    ) {
        if let Some(finished) = self.engine.poll(now, hw) {
            sink.emit(&FeedbackEvent::PatternFinished(finished));
        }
        if self.boot.poll(now).is_some() {
            self.handle(Event::BatteryQuery { level: None }, now, hw, sink);
        }
    }

    /// One dispatch-loop iteration at `now`: deadlines that expired since
    /// the last iteration fire first, then queued events in arrival order.
    pub fn dispatch(
        &mut self,
        now: Instant,
        queue: &EventQueue,
        hw: &mut (impl ActuatorPort + BatteryPort + ConnectionPort),
        sink: &mut impl EventSink,
    ) {
        self.poll(now, hw, sink);
        queue.drain(|event| self.handle(event, now, hw, sink));
    }

    // ── Queries ───────────────────────────────────────────────

    /// Earliest pending deadline across the engine and the boot show.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.engine.next_deadline(), self.boot.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn toggle_enabled(&self) -> bool {
        self.policy.toggle().is_enabled()
    }

    pub fn active_pattern(&self) -> Option<PatternKind> {
        self.engine.active()
    }

    /// No pattern running and nothing scheduled.
    pub fn is_idle(&self) -> bool {
        self.engine.is_idle() && !self.boot.is_armed()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Supersede the current run with `pattern` and report it.
    fn run(
        &mut self,
        pattern: Pattern,
        condition_met: bool,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
        sink: &mut impl EventSink,
    ) {
        let kind = pattern.kind();
        let previous = if condition_met {
            self.engine.start_satisfied(pattern, now, hw)
        } else {
            self.engine.start(pattern, now, hw)
        };
        if let Some(previous) = previous {
            sink.emit(&FeedbackEvent::Superseded { previous, by: kind });
        }
        sink.emit(&FeedbackEvent::PatternStarted(kind));
        if self.engine.is_idle() {
            sink.emit(&FeedbackEvent::PatternFinished(kind));
        }
    }

    /// A profile sequence in flight owns the success pulse; the callback
    /// only short-circuits its poll. Otherwise play the standalone
    /// connection pulse.
    fn connection_established(
        &mut self,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
        sink: &mut impl EventSink,
    ) {
        if let Some(kind @ PatternKind::ProfileSequence { .. }) = self.engine.active() {
            match self.engine.satisfy(Condition::ProfileConnected, now, hw) {
                Satisfy::Advanced | Satisfy::Latched => {
                    sink.emit(&FeedbackEvent::ConditionMet(kind));
                }
                Satisfy::AlreadyPast | Satisfy::NotAwaited => {
                    sink.emit(&FeedbackEvent::Suppressed(SuppressReason::AlreadyConfirmed));
                }
            }
            return;
        }
        if let Some(pulse) = self.config.connection {
            self.run(
                Pattern::single_pulse(pulse.channels, pulse.on_ms),
                false,
                now,
                hw,
                sink,
            );
        }
    }
}
