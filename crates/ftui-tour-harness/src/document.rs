#![forbid(unsafe_code)]

//! Harness input: a tour plus the widget tree it runs against.
//!
//! ```toml
//! window = "Window"
//!
//! [config]
//! transition_delay_ms = 250
//!
//! [[widget]]
//! type = "Box"
//! name = "sidebar"
//!
//!   [[widget.children]]
//!   type = "Button"
//!   name = "new-project"
//!
//! [[step]]
//! name = "new-project"
//! text = "Start here."
//! delay_secs = 3
//! ```

use std::path::Path;

use ftui_tour::{LoadError, Script, ScriptStep, TourConfig, TourDocument, WidgetArena, WidgetId};
use serde::{Deserialize, Serialize};

/// One widget of the fixture tree, with its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSpec {
    /// Widget type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Explicit name, if any.
    #[serde(default)]
    pub name: Option<String>,
    /// Children in stacking order.
    #[serde(default)]
    pub children: Vec<WidgetSpec>,
}

impl WidgetSpec {
    /// Leaf widget with an explicit name.
    #[must_use]
    pub fn named(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: Some(name.into()),
            children: Vec::new(),
        }
    }

    /// Leaf widget without a name.
    #[must_use]
    pub fn unnamed(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: None,
            children: Vec::new(),
        }
    }

    /// Add a child.
    #[must_use]
    pub fn child(mut self, child: WidgetSpec) -> Self {
        self.children.push(child);
        self
    }

    fn build_into(&self, tree: &mut WidgetArena, parent: WidgetId) {
        let id = match &self.name {
            Some(name) => tree.insert_named(parent, self.type_name.as_str(), name.as_str()),
            None => tree.insert(parent, self.type_name.as_str()),
        };
        for child in &self.children {
            child.build_into(tree, id);
        }
    }
}

fn default_window() -> String {
    "Window".to_owned()
}

/// A tour and its fixture tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessDocument {
    /// Type name of the toplevel.
    #[serde(default = "default_window")]
    pub window: String,
    /// Playback and presentation settings.
    #[serde(default)]
    pub config: TourConfig,
    /// Steps in playback order.
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
    /// Children of the toplevel.
    #[serde(default, rename = "widget")]
    pub widgets: Vec<WidgetSpec>,
}

impl Default for HarnessDocument {
    fn default() -> Self {
        Self {
            window: default_window(),
            config: TourConfig::default(),
            steps: Vec::new(),
            widgets: Vec::new(),
        }
    }
}

impl HarnessDocument {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        let doc: Self = toml::from_str(s).map_err(LoadError::Toml)?;
        doc.checked()
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        let doc: Self = serde_json::from_str(s).map_err(LoadError::Json)?;
        doc.checked()
    }

    /// Load a file, picking the format by extension (`.json`, else TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Build the fixture tree.
    #[must_use]
    pub fn tree(&self) -> WidgetArena {
        let mut tree = WidgetArena::new(self.window.as_str());
        let root = ftui_tour::WidgetTree::root(&tree);
        for widget in &self.widgets {
            widget.build_into(&mut tree, root);
        }
        tree
    }

    /// The steps as a playable script.
    #[must_use]
    pub fn script(&self) -> Script {
        self.steps.iter().cloned().collect()
    }

    /// The tour part alone.
    #[must_use]
    pub fn tour(&self) -> TourDocument {
        TourDocument {
            config: self.config.clone(),
            steps: self.steps.clone(),
        }
    }

    fn checked(self) -> Result<Self, LoadError> {
        let mut errors = self.tour().validate();
        if self.window.is_empty() {
            errors.push("window must not be empty".into());
        }
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(LoadError::Validation(errors))
        }
    }
}
