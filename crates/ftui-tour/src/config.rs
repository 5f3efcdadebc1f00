#![forbid(unsafe_code)]

//! Tunable settings for tour playback and presentation.
//!
//! Every field defaults to the built-in constant, so
//! `TourConfig::default()` reproduces stock behavior. With the
//! `script-config` feature the config loads from TOML or JSON:
//!
//! ```toml
//! transition_delay_ms = 250
//! highlight_class = "tour-highlight"
//!
//! [popover]
//! class = "tour"
//! max_width_chars = 28
//! ```

#[cfg(feature = "script-config")]
use std::path::Path;

#[cfg(feature = "script-config")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

#[cfg(feature = "script-config")]
use crate::error::LoadError;

/// Pause between hiding one step's popover and showing the next.
pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 250;
/// Style class applied to the widget of the active step.
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "tour-highlight";
/// Style class carried by the tour popover.
pub const DEFAULT_POPOVER_CLASS: &str = "tour";
/// Label wrap width, in display columns.
pub const DEFAULT_MAX_WIDTH_CHARS: u16 = 28;
/// Information glyph drawn before the label.
pub const DEFAULT_ICON: &str = "ℹ";

/// Longest accepted transition delay.
const MAX_TRANSITION_DELAY_MS: u64 = 10_000;

/// Playback and presentation settings for a tour.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "script-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "script-config", serde(default))]
pub struct TourConfig {
    /// Delay between a step's popover hiding and the next step showing.
    pub transition_delay_ms: u64,
    /// Style class toggled on the highlighted widget.
    pub highlight_class: String,
    /// Popover appearance.
    pub popover: PopoverStyle,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: DEFAULT_TRANSITION_DELAY_MS,
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_owned(),
            popover: PopoverStyle::default(),
        }
    }
}

impl TourConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transition delay.
    ///
    /// Stored in whole milliseconds; a sub-millisecond remainder rounds up,
    /// so a non-zero delay never becomes zero.
    #[must_use]
    pub fn transition_delay(mut self, delay: Duration) -> Self {
        let millis = delay.as_nanos().div_ceil(1_000_000);
        self.transition_delay_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    /// Set the highlight style class.
    #[must_use]
    pub fn highlight_class(mut self, class: impl Into<String>) -> Self {
        self.highlight_class = class.into();
        self
    }

    /// Set the popover style.
    #[must_use]
    pub fn popover(mut self, popover: PopoverStyle) -> Self {
        self.popover = popover;
        self
    }

    /// Transition delay as a [`Duration`].
    #[must_use]
    pub fn transition_delay_duration(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "script-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        toml::from_str(s).map_err(LoadError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "script-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LoadError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "script-config")]
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        serde_json::from_str(s).map_err(LoadError::Json)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.transition_delay_ms > MAX_TRANSITION_DELAY_MS {
            errors.push(format!(
                "transition_delay_ms must be <= {MAX_TRANSITION_DELAY_MS}, got {}",
                self.transition_delay_ms
            ));
        }
        if !is_class_name(&self.highlight_class) {
            errors.push(format!(
                "highlight_class must be a non-empty name without whitespace, got {:?}",
                self.highlight_class
            ));
        }
        if !is_class_name(&self.popover.class) {
            errors.push(format!(
                "popover.class must be a non-empty name without whitespace, got {:?}",
                self.popover.class
            ));
        }
        if self.popover.max_width_chars == 0 {
            errors.push("popover.max_width_chars must be > 0".into());
        }

        errors
    }
}

/// Appearance of the tour popover.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "script-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "script-config", serde(default))]
pub struct PopoverStyle {
    /// Style class set on the popover.
    pub class: String,
    /// Label wrap width in display columns.
    pub max_width_chars: u16,
    /// Whether the label wraps at `max_width_chars`.
    pub wrap: bool,
    /// Glyph drawn before the label; empty for none.
    pub icon: String,
}

impl Default for PopoverStyle {
    fn default() -> Self {
        Self {
            class: DEFAULT_POPOVER_CLASS.to_owned(),
            max_width_chars: DEFAULT_MAX_WIDTH_CHARS,
            wrap: true,
            icon: DEFAULT_ICON.to_owned(),
        }
    }
}

impl PopoverStyle {
    /// Set the popover style class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Set the wrap width.
    #[must_use]
    pub fn max_width_chars(mut self, width: u16) -> Self {
        self.max_width_chars = width;
        self
    }

    /// Enable or disable wrapping.
    #[must_use]
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set the leading icon glyph.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

fn is_class_name(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}
