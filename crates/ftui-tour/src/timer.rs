#![forbid(unsafe_code)]

//! One-shot timer facility the tour schedules itself with.
//!
//! The controller only needs two operations: arm a one-shot timer and
//! cancel one by handle ([`Scheduler`]). When a timer fires, the host's
//! event loop hands the handle back via
//! [`TourController::on_timer`](crate::controller::TourController::on_timer).
//!
//! [`TimerQueue`] is a deterministic virtual-clock implementation. Hosts with
//! a tick-driven loop (`Event::Tick`, `Every`) feed it elapsed time; tests
//! use it to step through a tour without wall-clock waits.
//!
//! # Invariants
//!
//! 1. Handles are never reused by a queue.
//! 2. Timers pop in deadline order; equal deadlines pop in arming order.
//! 3. A timer armed while draining a window is popped in the same window
//!    if its deadline falls inside it, after the callback that armed it.
//! 4. Cancelling an unknown or already-fired handle is a no-op.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Identifies an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

impl core::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timer:{}", self.0)
    }
}

/// Arms and cancels one-shot timers.
///
/// Firing must happen on the same logical thread as every controller call,
/// strictly after the call that armed the timer has returned.
pub trait Scheduler {
    /// Arm a one-shot timer that fires after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel an armed timer. Returns `false` if it was not pending.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// A [`Scheduler`] whose clock the caller advances explicitly.
pub trait ManualClock: Scheduler {
    /// Current virtual time.
    fn now(&self) -> Duration;

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline.
    fn pop_due(&mut self, until: Duration) -> Option<TimerHandle>;

    /// Move the clock forward to `t`. Earlier times are ignored.
    fn set_now(&mut self, t: Duration);
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        (**self).cancel(handle)
    }
}

impl<S: ManualClock + ?Sized> ManualClock for &mut S {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        (**self).pop_due(until)
    }

    fn set_now(&mut self, t: Duration) {
        (**self).set_now(t);
    }
}

/// Virtual-clock timer queue.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    /// Keyed by (deadline, handle) so iteration is firing order.
    armed: BTreeSet<(Duration, TimerHandle)>,
    /// Deadline of each armed handle, for cancellation.
    deadlines: BTreeMap<TimerHandle, Duration>,
}

impl TimerQueue {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of armed timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether `handle` is armed.
    #[must_use]
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    /// Deadline of the earliest armed timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.armed.first().map(|(deadline, _)| *deadline)
    }

    /// Deadline of `handle`, if armed.
    #[must_use]
    pub fn deadline(&self, handle: TimerHandle) -> Option<Duration> {
        self.deadlines.get(&handle).copied()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let deadline = self.now.saturating_add(delay);
        self.armed.insert((deadline, handle));
        self.deadlines.insert(handle, deadline);
        tracing::trace!(%handle, deadline_ms = deadline.as_millis() as u64, "timer armed");
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => {
                self.armed.remove(&(deadline, handle));
                tracing::trace!(%handle, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

impl ManualClock for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let &(deadline, handle) = self.armed.first()?;
        if deadline > until {
            return None;
        }
        self.armed.remove(&(deadline, handle));
        self.deadlines.remove(&handle);
        self.now = self.now.max(deadline);
        Some(handle)
    }

    fn set_now(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }
}
