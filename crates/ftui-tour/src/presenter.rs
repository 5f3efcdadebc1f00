#![forbid(unsafe_code)]

//! Presentation primitives the tour drives.
//!
//! [`Presenter`] groups the style-class toggle on widgets with the popover
//! operations. [`Overlay`] is the stock implementation: it keeps a class set
//! per widget and a [`TourPopover`], both of which the host's render pass
//! reads (`has_class(id, "tour-highlight")`, `popover().lines()`).

use ahash::AHashMap;

use crate::config::PopoverStyle;
use crate::popover::TourPopover;
use crate::widget::WidgetId;

/// Visual side effects of a tour.
pub trait Presenter {
    /// Add a style class to a widget.
    fn add_class(&mut self, widget: WidgetId, class: &str);

    /// Remove a style class from a widget.
    fn remove_class(&mut self, widget: WidgetId, class: &str);

    /// Point the popover at a widget, or detach it.
    fn set_anchor(&mut self, widget: Option<WidgetId>);

    /// Replace the popover text.
    fn set_text(&mut self, text: &str);

    /// Request the popover be shown.
    fn popup(&mut self);

    /// Request the popover be hidden.
    fn popdown(&mut self);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn add_class(&mut self, widget: WidgetId, class: &str) {
        (**self).add_class(widget, class);
    }

    fn remove_class(&mut self, widget: WidgetId, class: &str) {
        (**self).remove_class(widget, class);
    }

    fn set_anchor(&mut self, widget: Option<WidgetId>) {
        (**self).set_anchor(widget);
    }

    fn set_text(&mut self, text: &str) {
        (**self).set_text(text);
    }

    fn popup(&mut self) {
        (**self).popup();
    }

    fn popdown(&mut self) {
        (**self).popdown();
    }
}

/// Class sets per widget plus the shared tour popover.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    classes: AHashMap<WidgetId, Vec<String>>,
    popover: TourPopover,
}

impl Overlay {
    /// Create an overlay whose popover uses `style`.
    #[must_use]
    pub fn new(style: PopoverStyle) -> Self {
        Self {
            classes: AHashMap::new(),
            popover: TourPopover::new(style),
        }
    }

    /// Whether `widget` carries `class`.
    #[must_use]
    pub fn has_class(&self, widget: WidgetId, class: &str) -> bool {
        self.classes
            .get(&widget)
            .is_some_and(|set| set.iter().any(|c| c == class))
    }

    /// Classes on `widget`, in the order they were added.
    #[must_use]
    pub fn classes(&self, widget: WidgetId) -> &[String] {
        self.classes
            .get(&widget)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Widgets carrying `class`, sorted.
    #[must_use]
    pub fn widgets_with(&self, class: &str) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self
            .classes
            .iter()
            .filter(|(_, set)| set.iter().any(|c| c == class))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The popover.
    #[must_use]
    pub fn popover(&self) -> &TourPopover {
        &self.popover
    }
}

impl Presenter for Overlay {
    fn add_class(&mut self, widget: WidgetId, class: &str) {
        let set = self.classes.entry(widget).or_default();
        if !set.iter().any(|c| c == class) {
            set.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, widget: WidgetId, class: &str) {
        if let Some(set) = self.classes.get_mut(&widget) {
            set.retain(|c| c != class);
            if set.is_empty() {
                self.classes.remove(&widget);
            }
        }
    }

    fn set_anchor(&mut self, widget: Option<WidgetId>) {
        self.popover.set_anchor(widget);
    }

    fn set_text(&mut self, text: &str) {
        self.popover.set_text(text);
    }

    fn popup(&mut self) {
        self.popover.popup();
    }

    fn popdown(&mut self) {
        self.popover.popdown();
    }
}
