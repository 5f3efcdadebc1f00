#![forbid(unsafe_code)]

//! The tour's popover: one information icon plus a wrapped label.
//!
//! [`TourPopover`] is the state a renderer reads. It is created once per
//! controller and reused for every step, so only one step's text is ever
//! on screen. Placement relative to the anchor widget is the renderer's
//! business; this type only reports what to draw and how large it is.
//!
//! Wrapping works on display columns, breaks at word boundaries, and splits
//! words longer than the wrap width at grapheme boundaries.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::config::PopoverStyle;
use crate::widget::WidgetId;

/// Columns between the icon and the label.
const ICON_GAP: u16 = 1;

/// Popover content and visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourPopover {
    style: PopoverStyle,
    text: String,
    anchor: Option<WidgetId>,
    visible: bool,
}

impl TourPopover {
    /// Create a hidden, unanchored popover with empty text.
    #[must_use]
    pub fn new(style: PopoverStyle) -> Self {
        Self {
            style,
            text: String::new(),
            anchor: None,
            visible: false,
        }
    }

    /// Style this popover was created with.
    #[must_use]
    pub fn style(&self) -> &PopoverStyle {
        &self.style
    }

    /// Style class carried by the popover.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.style.class
    }

    /// Label text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the label text.
    pub fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
    }

    /// Widget the popover points at.
    #[must_use]
    pub fn anchor(&self) -> Option<WidgetId> {
        self.anchor
    }

    /// Attach to a widget, or detach with `None`.
    pub fn set_anchor(&mut self, anchor: Option<WidgetId>) {
        self.anchor = anchor;
    }

    /// Whether the popover should be drawn.
    ///
    /// A popover without an anchor is never drawn, even after `popup`.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible && self.anchor.is_some()
    }

    /// Request the popover be shown.
    pub fn popup(&mut self) {
        self.visible = true;
    }

    /// Request the popover be hidden.
    pub fn popdown(&mut self) {
        self.visible = false;
    }

    /// Label split into lines no wider than `max_width_chars` (when wrapping).
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        if self.style.wrap {
            wrap(&self.text, usize::from(self.style.max_width_chars.max(1)))
        } else {
            self.text.lines().map(str::to_owned).collect()
        }
    }

    /// Size of the content area as `(width, height)` in cells.
    #[must_use]
    pub fn content_size(&self) -> (u16, u16) {
        let lines = self.lines();
        let label_width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        let icon_width = self.style.icon.width();
        let icon_cols = if icon_width == 0 {
            0
        } else {
            icon_width + usize::from(ICON_GAP)
        };
        let width = u16::try_from(icon_cols + label_width).unwrap_or(u16::MAX);
        let height = u16::try_from(lines.len().max(1)).unwrap_or(u16::MAX);
        (width, height)
    }
}

impl Default for TourPopover {
    fn default() -> Self {
        Self::new(PopoverStyle::default())
    }
}

/// Greedy word wrap by display width. Explicit newlines are kept.
fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0usize;

        for word in paragraph.split_word_bounds() {
            let word_width = word.width();
            let is_space = word.chars().all(char::is_whitespace);

            if line_width + word_width <= max_width {
                if !(is_space && line.is_empty()) {
                    line.push_str(word);
                    line_width += word_width;
                }
                continue;
            }
            if is_space {
                // Break here; the space itself is dropped.
                if !line.is_empty() {
                    out.push(std::mem::take(&mut line).trim_end().to_owned());
                    line_width = 0;
                }
                continue;
            }
            if !line.is_empty() {
                out.push(std::mem::take(&mut line).trim_end().to_owned());
                line_width = 0;
            }
            if word_width <= max_width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }
            for grapheme in word.graphemes(true) {
                let g_width = grapheme.width();
                if line_width + g_width > max_width && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push_str(grapheme);
                line_width += g_width;
            }
        }
        out.push(line.trim_end().to_owned());
    }
    out
}
