#![forbid(unsafe_code)]

//! A [`Presenter`] that records every call it receives.
//!
//! Calls are forwarded to an inner [`Overlay`] so the recorded state can be
//! inspected the same way a renderer would, and appended to a log so tests
//! and the timeline can see the exact sequence of side effects.

use ftui_tour::{Overlay, PopoverStyle, Presenter, WidgetId};

/// One presenter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    AddClass { widget: WidgetId, class: String },
    RemoveClass { widget: WidgetId, class: String },
    SetAnchor(Option<WidgetId>),
    SetText(String),
    Popup,
    Popdown,
}

impl PresenterCall {
    /// Short operation label.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            Self::AddClass { .. } => "add_class",
            Self::RemoveClass { .. } => "remove_class",
            Self::SetAnchor(_) => "set_anchor",
            Self::SetText(_) => "set_text",
            Self::Popup => "popup",
            Self::Popdown => "popdown",
        }
    }
}

/// Recording presenter.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    overlay: Overlay,
    calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    /// Create a recorder whose overlay popover uses `style`.
    #[must_use]
    pub fn new(style: PopoverStyle) -> Self {
        Self {
            overlay: Overlay::new(style),
            calls: Vec::new(),
        }
    }

    /// Every call so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Forget recorded calls; the overlay state is kept.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// The overlay the calls were applied to.
    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }
}

impl Presenter for RecordingPresenter {
    fn add_class(&mut self, widget: WidgetId, class: &str) {
        self.overlay.add_class(widget, class);
        self.calls.push(PresenterCall::AddClass {
            widget,
            class: class.to_owned(),
        });
    }

    fn remove_class(&mut self, widget: WidgetId, class: &str) {
        self.overlay.remove_class(widget, class);
        self.calls.push(PresenterCall::RemoveClass {
            widget,
            class: class.to_owned(),
        });
    }

    fn set_anchor(&mut self, widget: Option<WidgetId>) {
        self.overlay.set_anchor(widget);
        self.calls.push(PresenterCall::SetAnchor(widget));
    }

    fn set_text(&mut self, text: &str) {
        self.overlay.set_text(text);
        self.calls.push(PresenterCall::SetText(text.to_owned()));
    }

    fn popup(&mut self) {
        self.overlay.popup();
        self.calls.push(PresenterCall::Popup);
    }

    fn popdown(&mut self) {
        self.overlay.popdown();
        self.calls.push(PresenterCall::Popdown);
    }
}
