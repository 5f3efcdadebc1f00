#![forbid(unsafe_code)]

//! Tour playback state machine.
//!
//! [`TourController`] walks a [`Script`] one step at a time. Each step
//! highlights its target widget, shows the popover next to it, and arms a
//! hold timer. When the hold timer fires the step is taken down and a short
//! transition timer is armed; when that fires the next step is shown.
//!
//! ```text
//!            play / transition timer
//!   Idle ───────────────────────────▶ Showing(i) ──hold timer──▶ TransitioningOut(i)
//!     ▲                                  │  ▲                            │
//!     │ end of script / unresolved       │  └──── transition timer ──────┘
//!     └──────────────────────────────────┘        (advances to i+1)
//!
//!   pause: Showing(i) | TransitioningOut(i) ──▶ Paused(i)
//!   stop:  any ──▶ Idle, cursor reset
//! ```
//!
//! # Invariants
//!
//! 1. At most one timer is pending. Any pending timer is cancelled before a
//!    new one is armed.
//! 2. At most one widget carries the highlight class. The previous highlight
//!    is cleared before a new one is applied.
//! 3. Within a play session the cursor only moves forward; `stop` resets it.
//!
//! # Failure semantics
//!
//! `play`, `pause` and `stop` never fail. An empty script, a step whose
//! name does not resolve, a missing toplevel, or running off the end of the
//! script all end the tour quietly. [`TourController::last_halt`] records
//! why the last run ended for callers that care.

use std::time::Duration;

use crate::config::TourConfig;
use crate::index::WidgetIndex;
use crate::presenter::Presenter;
use crate::script::{Script, ScriptStep};
use crate::timer::{ManualClock, Scheduler, TimerHandle};
use crate::widget::{WidgetId, WidgetTree};

/// Playback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourPhase {
    /// Nothing pending; the cursor is unset or the run halted. After
    /// `stop` the paused step's highlight may still be applied.
    #[default]
    Idle,
    /// Step is highlighted and its hold timer is pending.
    Showing { step: usize },
    /// Step was taken down; the transition timer is pending.
    TransitioningOut { step: usize },
    /// Auto-advance frozen by `pause`; the highlight is kept.
    Paused { step: usize },
}

impl TourPhase {
    /// Step the phase refers to, if any.
    #[must_use]
    pub fn step(self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Showing { step } | Self::TransitioningOut { step } | Self::Paused { step } => {
                Some(step)
            }
        }
    }

    /// Label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Showing { .. } => "showing",
            Self::TransitioningOut { .. } => "transitioning_out",
            Self::Paused { .. } => "paused",
        }
    }
}

/// Why the auto-advance chain last stopped on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// `play` was called on a script with no steps.
    EmptyScript,
    /// The last step finished; the next `play` starts over.
    Completed,
    /// The step's name is not in the widget index.
    Unresolved { step: usize, name: String },
    /// No toplevel is bound, so nothing can resolve.
    NoToplevel { step: usize, name: String },
}

impl HaltReason {
    /// Whether the tour ran to its natural end.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl core::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyScript => write!(f, "script is empty"),
            Self::Completed => write!(f, "tour completed"),
            Self::Unresolved { step, name } => {
                write!(f, "step {step}: no widget named {name:?}")
            }
            Self::NoToplevel { step, name } => {
                write!(f, "step {step}: no toplevel to resolve {name:?}")
            }
        }
    }
}

/// Which of the two chained timers is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Holds a step on screen for its delay.
    Hold,
    /// Short gap between steps.
    Transition,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    kind: TimerKind,
}

/// Drives a guided tour over a widget tree.
///
/// The scheduler and presenter are injected; pass `&mut` references to keep
/// ownership on the caller's side (both traits are implemented for `&mut T`).
pub struct TourController<S: Scheduler, P: Presenter> {
    config: TourConfig,
    scheduler: S,
    presenter: P,
    toplevel: Option<WidgetId>,
    index: Option<WidgetIndex>,
    script: Script,
    cursor: Option<usize>,
    phase: TourPhase,
    pending: Option<PendingTimer>,
    highlighted: Option<WidgetId>,
    last_halt: Option<HaltReason>,
}

impl<S: Scheduler, P: Presenter> TourController<S, P> {
    /// Create a controller with no toplevel and an empty script.
    pub fn new(scheduler: S, presenter: P) -> Self {
        Self {
            config: TourConfig::default(),
            scheduler,
            presenter,
            toplevel: None,
            index: None,
            script: Script::new(),
            cursor: None,
            phase: TourPhase::Idle,
            pending: None,
            highlighted: None,
            last_halt: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TourConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind a toplevel tree at construction.
    #[must_use]
    pub fn with_toplevel(mut self, toplevel: &dyn WidgetTree) -> Self {
        self.set_toplevel(Some(toplevel));
        self
    }

    /// Replace the bound toplevel.
    ///
    /// The old index is discarded. With `Some(tree)`, every named descendant
    /// of `tree.root()` is indexed; with `None` nothing resolves until a new
    /// toplevel is set. Cached step resolutions are dropped either way.
    pub fn set_toplevel(&mut self, toplevel: Option<&dyn WidgetTree>) {
        self.index = None;
        self.toplevel = None;
        self.script.invalidate_resolutions();

        if let Some(tree) = toplevel {
            self.toplevel = Some(tree.root());
            self.index = Some(WidgetIndex::build(tree));
        }
        tracing::debug!(toplevel = ?self.toplevel, "tour toplevel set");
    }

    /// Append a step. Names are resolved at playback time.
    pub fn add_step(&mut self, name: impl Into<String>, text: impl Into<String>, delay_secs: u32) {
        self.script.push(ScriptStep::new(name, text, delay_secs));
    }

    /// Append several steps.
    pub fn extend_script(&mut self, steps: impl IntoIterator<Item = ScriptStep>) {
        self.script.extend(steps);
    }

    /// Advance to the next step now.
    ///
    /// Starts from the first step when nothing has played yet (or after
    /// `stop` or a completed run). While a step is showing this skips ahead,
    /// so two calls in a row move the cursor by two.
    pub fn play(&mut self) {
        tracing::debug!(cursor = ?self.cursor, phase = self.phase.as_str(), "tour play");
        self.cancel_pending();
        self.advance();
    }

    /// Freeze auto-advance and hide the popover.
    ///
    /// The highlight and cursor are kept. A later `play` moves on to the
    /// step after the paused one.
    pub fn pause(&mut self) {
        self.cancel_pending();
        self.presenter.popdown();
        if let Some(step) = self.phase.step() {
            self.phase = TourPhase::Paused { step };
        }
        tracing::debug!(cursor = ?self.cursor, "tour paused");
    }

    /// Pause and rewind, so the next `play` starts from the first step.
    pub fn stop(&mut self) {
        self.pause();
        self.cursor = None;
        self.phase = TourPhase::Idle;
        tracing::debug!("tour stopped");
    }

    /// Deliver a fired timer.
    ///
    /// Returns `false` (and does nothing) when `handle` is not the pending
    /// timer, e.g. one that was cancelled after it was already queued.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        let Some(pending) = self.pending.filter(|p| p.handle == handle) else {
            tracing::trace!(%handle, "stale tour timer ignored");
            return false;
        };
        self.pending = None;
        match pending.kind {
            TimerKind::Hold => self.transition_out(),
            TimerKind::Transition => self.advance(),
        }
        true
    }

    /// Bound toplevel root.
    #[must_use]
    pub fn toplevel(&self) -> Option<WidgetId> {
        self.toplevel
    }

    /// Current widget index, if a toplevel is bound.
    #[must_use]
    pub fn index(&self) -> Option<&WidgetIndex> {
        self.index.as_ref()
    }

    /// The script.
    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Position of the active step; `None` before the first step.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    /// Widget currently carrying the highlight class.
    #[must_use]
    pub fn highlighted(&self) -> Option<WidgetId> {
        self.highlighted
    }

    /// Whether a timer is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Kind of the pending timer.
    #[must_use]
    pub fn pending_timer(&self) -> Option<(TimerHandle, TimerKind)> {
        self.pending.map(|p| (p.handle, p.kind))
    }

    /// Why the last run ended on its own. Cleared whenever a step is shown.
    #[must_use]
    pub fn last_halt(&self) -> Option<&HaltReason> {
        self.last_halt.as_ref()
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// The injected scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The injected presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn advance(&mut self) {
        self.clear_highlight();

        if self.script.is_empty() {
            self.halt(HaltReason::EmptyScript);
            return;
        }

        let next = self.cursor.map_or(0, |i| i + 1);
        if next >= self.script.len() {
            self.cursor = None;
            self.halt(HaltReason::Completed);
            return;
        }
        self.cursor = Some(next);

        let Some(step) = self.script.get_mut(next) else {
            return;
        };
        let Some(index) = self.index.as_ref() else {
            let name = step.name.clone();
            self.halt(HaltReason::NoToplevel { step: next, name });
            return;
        };
        let Some(widget) = step.resolve(index) else {
            let name = step.name.clone();
            self.halt(HaltReason::Unresolved { step: next, name });
            return;
        };
        let delay = step.delay();

        self.presenter.add_class(widget, &self.config.highlight_class);
        self.highlighted = Some(widget);
        self.presenter.set_text(&step.text);
        self.presenter.set_anchor(Some(widget));
        self.presenter.popup();

        self.arm(TimerKind::Hold, delay);
        self.phase = TourPhase::Showing { step: next };
        self.last_halt = None;
        tracing::debug!(
            step = next,
            %widget,
            delay_ms = delay.as_millis() as u64,
            "tour step shown"
        );
    }

    fn transition_out(&mut self) {
        let step = self.phase.step();
        self.clear_highlight();
        self.presenter.popdown();
        self.arm(TimerKind::Transition, self.config.transition_delay_duration());
        if let Some(step) = step {
            self.phase = TourPhase::TransitioningOut { step };
        }
        tracing::debug!(?step, "tour step hidden");
    }

    fn halt(&mut self, reason: HaltReason) {
        self.presenter.popdown();
        self.phase = TourPhase::Idle;
        tracing::info!(reason = %reason, "tour halted");
        self.last_halt = Some(reason);
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration) {
        self.cancel_pending();
        let handle = self.scheduler.schedule(delay);
        self.pending = Some(PendingTimer { handle, kind });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.handle);
        }
    }

    fn clear_highlight(&mut self) {
        if let Some(widget) = self.highlighted.take() {
            self.presenter
                .remove_class(widget, &self.config.highlight_class);
        }
    }

    fn teardown(&mut self) {
        self.cancel_pending();
        self.clear_highlight();
        self.presenter.popdown();
        self.presenter.set_anchor(None);
    }
}

impl<S: ManualClock, P: Presenter> TourController<S, P> {
    /// Advance the scheduler's clock by `dt`, delivering every timer that
    /// falls due, including timers armed while delivering.
    ///
    /// Returns the number of timers delivered.
    pub fn tick(&mut self, dt: Duration) -> usize {
        let until = self.scheduler.now().saturating_add(dt);
        let mut fired = 0;
        while let Some(handle) = self.scheduler.pop_due(until) {
            if self.on_timer(handle) {
                fired += 1;
            }
        }
        self.scheduler.set_now(until);
        fired
    }

    /// Current virtual time of the scheduler.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }
}

impl<S: Scheduler, P: Presenter> Drop for TourController<S, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<S: Scheduler, P: Presenter> core::fmt::Debug for TourController<S, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TourController")
            .field("toplevel", &self.toplevel)
            .field("steps", &self.script.len())
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .field("highlighted", &self.highlighted)
            .field("last_halt", &self.last_halt)
            .finish()
    }
}
