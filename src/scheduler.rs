//! Single-slot delayed-action timer.
//!
//! The pattern engine never sleeps: every "turn off after D" or "check
//! again in T" is expressed as a deadline in this timer, and the dispatch
//! loop calls [`DeadlineTimer::poll`] to collect it.
//!
//! ```text
//!   schedule(now, 100ms, A)        schedule(now', 50ms, B)
//!   ─────────┬──────────────────────────┬─────────────────────────────▶ t
//!            │ slot = A @ t0+100        │ slot = B @ t1+50   (A gone)
//!            ▼                          ▼
//!                                       poll(t1+50) ─▶ Some(B), slot empty
//! ```
//!
//! ## Invariants
//!
//! - At most one deadline is armed. Arming while armed replaces the old
//!   deadline in the same call, so there is no window in which both could
//!   fire (last writer wins).
//! - Once [`cancel`](DeadlineTimer::cancel) returns, the cancelled stage is
//!   never yielded by `poll`.
//! - An expired deadline is yielded exactly once, then the slot is empty.

use embassy_time::{Duration, Instant};
use log::debug;

/// Handle for one armed deadline. Stale tokens are harmless: cancelling
/// with a token whose deadline has been replaced or has fired is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(u32);

#[derive(Debug, Clone, Copy)]
struct Deadline<S> {
    fire_at: Instant,
    stage: S,
    token: Token,
}

/// One cancellable, re-armable deadline carrying a stage identifier `S`.
#[derive(Debug)]
pub struct DeadlineTimer<S: Copy> {
    slot: Option<Deadline<S>>,
    generation: u32,
}

impl<S: Copy> DeadlineTimer<S> {
    pub const fn new() -> Self {
        Self {
            slot: None,
            generation: 0,
        }
    }

    /// Arm `stage` to fire `after` from `now`, replacing any armed deadline.
    pub fn schedule(&mut self, now: Instant, after: Duration, stage: S) -> Token {
        self.generation = self.generation.wrapping_add(1);
        let token = Token(self.generation);
        let fire_at = now.checked_add(after).unwrap_or(Instant::MAX);

        if self.slot.is_some() {
            debug!("timer: re-arm replaces pending deadline");
        }
        self.slot = Some(Deadline {
            fire_at,
            stage,
            token,
        });
        token
    }

    /// Disarm without firing. Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.slot.take().is_some()
    }

    /// Disarm only if `token` still identifies the armed deadline.
    pub fn cancel_token(&mut self, token: Token) -> bool {
        match self.slot {
            Some(d) if d.token == token => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }

    /// Yield the armed stage if its deadline has passed, disarming the slot.
    pub fn poll(&mut self, now: Instant) -> Option<S> {
        match self.slot {
            Some(d) if now >= d.fire_at => {
                self.slot = None;
                Some(d.stage)
            }
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.slot.map(|d| d.fire_at)
    }

    pub fn pending_stage(&self) -> Option<S> {
        self.slot.map(|d| d.stage)
    }
}

impl<S: Copy> Default for DeadlineTimer<S> {
    fn default() -> Self {
        Self::new()
    }
}
