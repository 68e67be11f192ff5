//! Pattern engine.
//!
//! A pattern is a short program of timed [`Step`]s. The engine executes one
//! program at a time against the actuator, using a single
//! [`DeadlineTimer`] slot for every hop:
//!
//! ```text
//!  Idle ──start──▶ Step 0 ──deadline──▶ Step 1 ── … ──▶ last step ──▶ Idle
//!    ▲                │                    │
//!    └──── superseded (start / cancel) ────┘
//! ```
//!
//! ## Step kinds
//!
//! | Step        | Actuator        | Leaves the step                       |
//! |-------------|-----------------|---------------------------------------|
//! | `On`        | channels lit    | after its duration                    |
//! | `Off`       | dark            | after its duration (gap / delay)      |
//! | `PollUntil` | dark if waiting | as soon as the condition holds; else  |
//! |             |                 | re-checks every interval, unbounded   |
//!
//! Starting a pattern always cancels the pending deadline of the previous
//! one first, so a stale "off" can never truncate the new pattern. When a
//! run ends, by completion or supersession, the actuator is left dark.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::debug;

use crate::app::ports::{ActuatorPort, ConnectionPort};
use crate::channels::Channels;
use crate::config::{ProfileFeedback, StartCue};
use crate::scheduler::DeadlineTimer;

/// Longest program: delay, double cue (3 steps), poll, success.
pub const MAX_STEPS: usize = 6;

/// Externally supplied predicate a poll step waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The active BLE profile has an established connection.
    ProfileConnected,
}

impl Condition {
    fn holds(self, hw: &impl ConnectionPort) -> bool {
        match self {
            Self::ProfileConnected => hw.is_profile_connected(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    On { channels: Channels, duration: Duration },
    Off { duration: Duration },
    PollUntil { condition: Condition, interval: Duration },
}

/// Name of a pattern, carried in outbound events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    SinglePulse { on_ms: u32 },
    DoublePulse { on_ms: u32, gap_ms: u32 },
    PollUntilCondition { condition: Condition, interval_ms: u32 },
    ToggleFeedback { on_ms: u32 },
    BatteryLevel { level: u8 },
    /// Delay, start cue, wait for connection, success pulse.
    ProfileSequence { connected: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    kind: PatternKind,
    steps: Vec<Step, MAX_STEPS>,
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}

impl Pattern {
    fn build(kind: PatternKind, steps: &[Step]) -> Self {
        debug_assert!(
            steps.len() <= MAX_STEPS,
            "{:?} needs {} steps, capacity is {}",
            kind,
            steps.len(),
            MAX_STEPS
        );
        let fit = &steps[..steps.len().min(MAX_STEPS)];
        Self {
            kind,
            steps: Vec::from_slice(fit).unwrap_or_default(),
        }
    }

    pub fn single_pulse(channels: Channels, on_ms: u32) -> Self {
        Self::build(
            PatternKind::SinglePulse { on_ms },
            &[Step::On {
                channels,
                duration: millis(on_ms),
            }],
        )
    }

    pub fn double_pulse(channels: Channels, on_ms: u32, gap_ms: u32) -> Self {
        let on = Step::On {
            channels,
            duration: millis(on_ms),
        };
        Self::build(
            PatternKind::DoublePulse { on_ms, gap_ms },
            &[on, Step::Off { duration: millis(gap_ms) }, on],
        )
    }

    /// Wait for `condition`, then pulse `channels` for `success_ms`.
    pub fn poll_until(
        condition: Condition,
        interval_ms: u32,
        channels: Channels,
        success_ms: u32,
    ) -> Self {
        Self::build(
            PatternKind::PollUntilCondition {
                condition,
                interval_ms,
            },
            &[
                Step::PollUntil {
                    condition,
                    interval: millis(interval_ms),
                },
                Step::On {
                    channels,
                    duration: millis(success_ms),
                },
            ],
        )
    }

    pub fn toggle_feedback(channels: Channels, on_ms: u32) -> Self {
        let mut pattern = Self::single_pulse(channels, on_ms);
        pattern.kind = PatternKind::ToggleFeedback { on_ms };
        pattern
    }

    pub fn battery_level(level: u8, channels: Channels, show_ms: u32) -> Self {
        let mut pattern = Self::single_pulse(channels, show_ms);
        pattern.kind = PatternKind::BatteryLevel { level };
        pattern
    }

    pub fn profile_sequence(cfg: &ProfileFeedback, connected: bool) -> Self {
        let kind = PatternKind::ProfileSequence { connected };
        let delay = Step::Off {
            duration: millis(cfg.start_delay_ms),
        };
        let poll = Step::PollUntil {
            condition: Condition::ProfileConnected,
            interval: millis(cfg.poll_interval_ms),
        };
        let success = Step::On {
            channels: cfg.channels,
            duration: millis(cfg.success_ms),
        };
        match cfg.cue {
            StartCue::Single { on_ms } => {
                let cue = Step::On {
                    channels: cfg.channels,
                    duration: millis(on_ms),
                };
                Self::build(kind, &[delay, cue, poll, success])
            }
            StartCue::Double { on_ms, gap_ms } => {
                let cue = Step::On {
                    channels: cfg.channels,
                    duration: millis(on_ms),
                };
                let gap = Step::Off {
                    duration: millis(gap_ms),
                };
                Self::build(kind, &[delay, cue, gap, cue, poll, success])
            }
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn poll_index(&self, condition: Condition) -> Option<usize> {
        self.steps.iter().position(
            |s| matches!(s, Step::PollUntil { condition: c, .. } if *c == condition),
        )
    }
}

/// Transient state of the pattern currently owning the actuator.
#[derive(Debug)]
struct PatternRun {
    pattern: Pattern,
    stage: u8,
    /// The awaited condition was reported before the poll step was reached.
    condition_met: bool,
}

/// Outcome of [`PatternEngine::satisfy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfy {
    /// The run was polling and moved on immediately.
    Advanced,
    /// The run will skip the poll when it gets there.
    Latched,
    /// The run already passed its poll step.
    AlreadyPast,
    /// No in-flight run waits on that condition.
    NotAwaited,
}

/// Runs one [`Pattern`] at a time on the single actuator.
pub struct PatternEngine {
    timer: DeadlineTimer<u8>,
    run: Option<PatternRun>,
}

impl PatternEngine {
    pub const fn new() -> Self {
        Self {
            timer: DeadlineTimer::new(),
            run: None,
        }
    }

    /// Supersede whatever is running and start `pattern` at `now`.
    ///
    /// Returns the kind of the pattern that was cancelled, if any.
    pub fn start(
        &mut self,
        pattern: Pattern,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
    ) -> Option<PatternKind> {
        self.begin(pattern, false, now, hw)
    }

    /// Like [`start`](Self::start), with the poll condition already known
    /// to hold (the triggering event carried it).
    pub fn start_satisfied(
        &mut self,
        pattern: Pattern,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
    ) -> Option<PatternKind> {
        self.begin(pattern, true, now, hw)
    }

    fn begin(
        &mut self,
        pattern: Pattern,
        condition_met: bool,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
    ) -> Option<PatternKind> {
        self.timer.cancel();
        let previous = self.run.take().map(|r| r.pattern.kind);
        debug!("pattern: start {:?}", pattern.kind);

        self.run = Some(PatternRun {
            pattern,
            stage: 0,
            condition_met,
        });
        self.enter(now, hw);
        previous
    }

    /// Stop the current run and leave the actuator dark.
    pub fn cancel(&mut self, hw: &mut impl ActuatorPort) -> Option<PatternKind> {
        self.timer.cancel();
        let run = self.run.take()?;
        hw.show(Channels::NONE);
        Some(run.pattern.kind)
    }

    /// Advance on an expired deadline. Returns the kind of the pattern if
    /// this hop completed it.
    pub fn poll(
        &mut self,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
    ) -> Option<PatternKind> {
        let fired = self.timer.poll(now)?;
        let run = self.run.as_mut()?;
        if run.stage != fired {
            return None;
        }
        match run.pattern.steps.get(fired as usize) {
            // A poll step re-evaluates itself; timed steps move on.
            Some(Step::PollUntil { .. }) => {}
            Some(_) => run.stage += 1,
            None => {}
        }
        self.enter(now, hw)
    }

    /// An external notification says `condition` now holds.
    pub fn satisfy(
        &mut self,
        condition: Condition,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
    ) -> Satisfy {
        let Some(run) = self.run.as_mut() else {
            return Satisfy::NotAwaited;
        };
        let Some(index) = run.pattern.poll_index(condition) else {
            return Satisfy::NotAwaited;
        };
        let stage = run.stage as usize;

        if stage < index {
            run.condition_met = true;
            Satisfy::Latched
        } else if stage == index {
            self.timer.cancel();
            run.stage += 1;
            self.enter(now, hw);
            Satisfy::Advanced
        } else {
            Satisfy::AlreadyPast
        }
    }

    pub fn active(&self) -> Option<PatternKind> {
        self.run.as_ref().map(|r| r.pattern.kind)
    }

    /// Index of the step the active run is executing.
    pub fn active_stage(&self) -> Option<u8> {
        self.run.as_ref().map(|r| r.stage)
    }

    /// True while the active run is lighting the actuator.
    pub fn is_lit(&self) -> bool {
        self.run.as_ref().is_some_and(|r| {
            matches!(r.pattern.steps.get(r.stage as usize), Some(Step::On { .. }))
        })
    }

    pub fn is_idle(&self) -> bool {
        self.run.is_none()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.next_deadline()
    }

    /// Execute steps from the current stage until one needs to wait.
    fn enter(
        &mut self,
        now: Instant,
        hw: &mut (impl ActuatorPort + ConnectionPort),
    ) -> Option<PatternKind> {
        loop {
            let run = self.run.as_mut()?;
            let Some(step) = run.pattern.steps.get(run.stage as usize).copied() else {
                hw.show(Channels::NONE);
                let kind = run.pattern.kind;
                self.run = None;
                debug!("pattern: finished {:?}", kind);
                return Some(kind);
            };

            match step {
                Step::On { channels, duration } => {
                    hw.show(channels);
                    if duration.as_ticks() == 0 {
                        run.stage += 1;
                        continue;
                    }
                    self.timer.schedule(now, duration, run.stage);
                    return None;
                }
                Step::Off { duration } => {
                    hw.show(Channels::NONE);
                    if duration.as_ticks() == 0 {
                        run.stage += 1;
                        continue;
                    }
                    self.timer.schedule(now, duration, run.stage);
                    return None;
                }
                Step::PollUntil {
                    condition,
                    interval,
                } => {
                    if run.condition_met || condition.holds(&*hw) {
                        run.stage += 1;
                        continue;
                    }
                    hw.show(Channels::NONE);
                    self.timer.schedule(now, interval, run.stage);
                    return None;
                }
            }
        }
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new()
    }
}
