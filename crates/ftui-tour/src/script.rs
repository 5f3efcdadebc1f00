#![forbid(unsafe_code)]

//! Tour script: the ordered, append-only list of steps.
//!
//! Insertion order is playback order. Step names are not validated when
//! added; they are resolved against the [`WidgetIndex`] at playback time,
//! and a tour may visit the same widget more than once.
//!
//! With the `script-config` feature a [`TourDocument`] (configuration plus
//! `[[step]]` tables) can be loaded from TOML or JSON:
//!
//! ```toml
//! [config]
//! transition_delay_ms = 250
//!
//! [[step]]
//! name = "sidebar"
//! text = "Your projects live here."
//! delay_secs = 3
//! ```

#[cfg(feature = "script-config")]
use std::path::Path;

#[cfg(feature = "script-config")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

#[cfg(feature = "script-config")]
use crate::config::TourConfig;
#[cfg(feature = "script-config")]
use crate::error::LoadError;
use crate::index::WidgetIndex;
use crate::widget::WidgetId;

/// One scripted step: which widget to highlight, what to say, for how long.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "script-config", derive(Serialize, Deserialize))]
pub struct ScriptStep {
    /// Name of the target widget.
    pub name: String,
    /// Text shown in the popover.
    pub text: String,
    /// How long the step is held, in whole seconds.
    pub delay_secs: u32,
    /// Widget the name resolved to, filled on first playback.
    #[cfg_attr(feature = "script-config", serde(skip))]
    resolved: Option<WidgetId>,
}

impl ScriptStep {
    /// Create a step.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>, delay_secs: u32) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            delay_secs,
            resolved: None,
        }
    }

    /// Hold duration.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.delay_secs))
    }

    /// Widget cached from an earlier resolution, if any.
    #[must_use]
    pub fn resolved(&self) -> Option<WidgetId> {
        self.resolved
    }

    /// Return the cached widget or look the name up in `index`, caching a hit.
    pub(crate) fn resolve(&mut self, index: &WidgetIndex) -> Option<WidgetId> {
        if self.resolved.is_none() {
            self.resolved = index.get(&self.name);
        }
        self.resolved
    }
}

/// Ordered sequence of [`ScriptStep`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step at the end.
    pub fn push(&mut self, step: ScriptStep) {
        self.steps.push(step);
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ScriptStep> {
        self.steps.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut ScriptStep> {
        self.steps.get_mut(index)
    }

    /// Steps in playback order.
    pub fn iter(&self) -> impl Iterator<Item = &ScriptStep> {
        self.steps.iter()
    }

    /// Drop every cached resolution, e.g. after the toplevel changed.
    pub fn invalidate_resolutions(&mut self) {
        for step in &mut self.steps {
            step.resolved = None;
        }
    }

    /// Steps whose names are absent from `index`, with their positions.
    pub fn unresolved<'a>(
        &'a self,
        index: &'a WidgetIndex,
    ) -> impl Iterator<Item = (usize, &'a ScriptStep)> + 'a {
        self.steps
            .iter()
            .enumerate()
            .filter(move |(_, step)| !index.contains(&step.name))
    }

    /// Sum of all hold durations (transitions excluded).
    #[must_use]
    pub fn total_hold(&self) -> Duration {
        self.steps.iter().map(ScriptStep::delay).sum()
    }
}

impl FromIterator<ScriptStep> for Script {
    fn from_iter<I: IntoIterator<Item = ScriptStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl Extend<ScriptStep> for Script {
    fn extend<I: IntoIterator<Item = ScriptStep>>(&mut self, iter: I) {
        self.steps.extend(iter);
    }
}

/// A tour as stored on disk: configuration and steps.
#[cfg(feature = "script-config")]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TourDocument {
    /// Playback and presentation settings.
    pub config: TourConfig,
    /// Steps in playback order.
    #[serde(rename = "step")]
    pub steps: Vec<ScriptStep>,
}

#[cfg(feature = "script-config")]
impl TourDocument {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        let doc: Self = toml::from_str(s).map_err(LoadError::Toml)?;
        doc.checked()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LoadError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        let doc: Self = serde_json::from_str(s).map_err(LoadError::Json)?;
        doc.checked()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LoadError::Io)?;
        Self::from_json_str(&content)
    }

    /// Configuration problems plus steps with empty names.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.config.validate();
        for (i, step) in self.steps.iter().enumerate() {
            if step.name.is_empty() {
                errors.push(format!("step[{i}].name must not be empty"));
            }
        }
        errors
    }

    /// The steps as a playable [`Script`].
    #[must_use]
    pub fn script(&self) -> Script {
        self.steps.iter().cloned().collect()
    }

    fn checked(self) -> Result<Self, LoadError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(LoadError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{WidgetArena, WidgetTree};

    fn index_with(names: &[&str]) -> (WidgetIndex, Vec<WidgetId>) {
        let mut tree = WidgetArena::new("Window");
        let ids = names
            .iter()
            .map(|n| tree.insert_named(tree.root(), "Box", *n))
            .collect();
        (WidgetIndex::build(&tree), ids)
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut script = Script::new();
        script.push(ScriptStep::new("a", "first", 1));
        script.push(ScriptStep::new("b", "second", 2));
        script.push(ScriptStep::new("a", "again", 1));
        let names: Vec<&str> = script.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[test]
    fn resolve_caches_hits_only() {
        let (index, ids) = index_with(&["a"]);
        let mut hit = ScriptStep::new("a", "", 1);
        let mut miss = ScriptStep::new("missing", "", 1);

        assert_eq!(hit.resolve(&index), Some(ids[0]));
        assert_eq!(hit.resolved(), Some(ids[0]));
        assert_eq!(miss.resolve(&index), None);
        assert_eq!(miss.resolved(), None);
    }

    #[test]
    fn cached_resolution_survives_index_change_until_invalidated() {
        let (first, ids) = index_with(&["a"]);
        let mut script: Script = [ScriptStep::new("a", "", 1)].into_iter().collect();
        if let Some(step) = script.get_mut(0) {
            step.resolve(&first);
        }
        assert_eq!(script.get(0).and_then(ScriptStep::resolved), Some(ids[0]));

        script.invalidate_resolutions();
        assert_eq!(script.get(0).and_then(ScriptStep::resolved), None);
    }

    #[test]
    fn unresolved_lists_missing_names() {
        let (index, _) = index_with(&["a", "b"]);
        let script: Script = [
            ScriptStep::new("a", "", 1),
            ScriptStep::new("ghost", "", 1),
            ScriptStep::new("b", "", 1),
            ScriptStep::new("", "", 1),
        ]
        .into_iter()
        .collect();
        let missing: Vec<usize> = script.unresolved(&index).map(|(i, _)| i).collect();
        assert_eq!(missing, vec![1, 3]);
    }

    #[test]
    fn total_hold_sums_delays() {
        let script: Script = [ScriptStep::new("a", "", 2), ScriptStep::new("b", "", 3)]
            .into_iter()
            .collect();
        assert_eq!(script.total_hold(), Duration::from_secs(5));
    }

    #[cfg(feature = "script-config")]
    mod document {
        use super::*;

        const TOUR: &str = r#"
[config]
transition_delay_ms = 100

[[step]]
name = "a"
text = "Hi"
delay_secs = 2

[[step]]
name = "b"
text = "Bye"
delay_secs = 1
"#;

        #[test]
        fn loads_toml_document() {
            let doc = TourDocument::from_toml_str(TOUR).unwrap();
            assert_eq!(doc.config.transition_delay_ms, 100);
            assert_eq!(doc.steps.len(), 2);
            assert_eq!(doc.steps[1], ScriptStep::new("b", "Bye", 1));
            assert_eq!(doc.script().len(), 2);
        }

        #[test]
        fn loads_json_document() {
            let json = r#"{"step":[{"name":"a","text":"Hi","delay_secs":4}]}"#;
            let doc = TourDocument::from_json_str(json).unwrap();
            assert_eq!(doc.steps, vec![ScriptStep::new("a", "Hi", 4)]);
            assert_eq!(doc.config, TourConfig::default());
        }

        #[test]
        fn rejects_empty_step_name() {
            let toml = "[[step]]\nname = \"\"\ntext = \"x\"\ndelay_secs = 1\n";
            match TourDocument::from_toml_str(toml) {
                Err(LoadError::Validation(errors)) => {
                    assert_eq!(errors, vec!["step[0].name must not be empty".to_string()]);
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }

        #[test]
        fn reports_toml_syntax_errors() {
            assert!(matches!(
                TourDocument::from_toml_str("[[step]\n"),
                Err(LoadError::Toml(_))
            ));
        }

        #[test]
        fn loads_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("tour.toml");
            std::fs::write(&path, TOUR).unwrap();
            let doc = TourDocument::from_toml_file(&path).unwrap();
            assert_eq!(doc.steps[0].text, "Hi");
        }

        #[test]
        fn missing_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            assert!(matches!(
                TourDocument::from_toml_file(dir.path().join("nope.toml")),
                Err(LoadError::Io(_))
            ));
        }
    }
}
