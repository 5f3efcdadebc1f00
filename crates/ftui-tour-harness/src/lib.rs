#![forbid(unsafe_code)]

//! Dry-run harness for guided tours.
//!
//! Loads a tour together with a fixture widget tree, plays it on a virtual
//! clock, and reports every highlight and popover change with its timestamp.
//! The `ftui-tour-harness` binary wraps this for the command line.

pub mod cli;
pub mod document;
pub mod error;
pub mod recorder;
pub mod timeline;

pub use cli::run_from_env;
pub use document::{HarnessDocument, WidgetSpec};
pub use error::{HarnessError, Result};
pub use recorder::{PresenterCall, RecordingPresenter};
pub use timeline::{Timeline, TimelineEntry};
