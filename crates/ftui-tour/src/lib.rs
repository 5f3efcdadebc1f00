#![forbid(unsafe_code)]

//! Guided tours: scripted highlight-and-explain walkthroughs of a widget tree.
//!
//! # Role in FrankenTUI
//! `ftui-tour` drives onboarding tours. A tour is a list of steps, each
//! naming a widget, the text to show next to it, and how long to hold it.
//! The controller highlights one widget at a time, shows a popover beside
//! it, and advances on its own timers until the script runs out.
//!
//! # Primary responsibilities
//! - **TourController**: the play / pause / stop state machine.
//! - **WidgetIndex**: name → widget lookup built from a toplevel tree.
//! - **Scheduler / TimerQueue**: one-shot timers, with a deterministic
//!   virtual-clock implementation for tick-driven hosts and tests.
//! - **Presenter / Overlay**: highlight classes and the shared popover.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ftui_tour::{Overlay, TimerQueue, TourController, WidgetArena, WidgetTree};
//!
//! let mut tree = WidgetArena::new("Window");
//! let open = tree.insert_named(tree.root(), "Button", "open");
//! tree.insert_named(tree.root(), "Entry", "search");
//!
//! let mut timers = TimerQueue::new();
//! let mut overlay = Overlay::default();
//! let mut tour = TourController::new(&mut timers, &mut overlay).with_toplevel(&tree);
//! tour.add_step("open", "Open a project here.", 2);
//! tour.add_step("search", "Search everything.", 2);
//!
//! tour.play();
//! assert_eq!(tour.highlighted(), Some(open));
//!
//! // Host loop: feed elapsed time on every tick.
//! tour.tick(Duration::from_millis(2250));
//! assert_eq!(tour.presenter().popover().text(), "Search everything.");
//! ```
//!
//! # Feature flags
//! - `script-config`: load [`TourConfig`] and [`TourDocument`] from TOML or JSON.

pub mod config;
pub mod controller;
pub mod error;
pub mod index;
pub mod popover;
pub mod presenter;
pub mod script;
pub mod timer;
pub mod widget;

pub use config::{PopoverStyle, TourConfig};
pub use controller::{HaltReason, TimerKind, TourController, TourPhase};
pub use error::LoadError;
pub use index::WidgetIndex;
pub use popover::TourPopover;
pub use presenter::{Overlay, Presenter};
#[cfg(feature = "script-config")]
pub use script::TourDocument;
pub use script::{Script, ScriptStep};
pub use timer::{ManualClock, Scheduler, TimerHandle, TimerQueue};
pub use widget::{WidgetArena, WidgetId, WidgetTree};
