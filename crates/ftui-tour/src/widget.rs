#![forbid(unsafe_code)]

//! Widget tree abstraction the tour walks.
//!
//! The tour never owns widgets. It talks to the host's tree through the
//! [`WidgetTree`] trait and keeps only [`WidgetId`] handles, whose referents
//! live as long as the tree owner decides.
//!
//! [`WidgetArena`] is a small owned tree that implements the trait. Hosts
//! with their own widget hierarchy implement [`WidgetTree`] directly;
//! tests and the harness use the arena.
//!
//! # Example
//!
//! ```
//! use ftui_tour::widget::{WidgetArena, WidgetTree};
//!
//! let mut tree = WidgetArena::new("Window");
//! let sidebar = tree.insert_named(tree.root(), "Box", "sidebar");
//! let save = tree.insert_named(sidebar, "Button", "save");
//!
//! assert_eq!(tree.children(sidebar), &[save]);
//! assert_eq!(tree.name(save), Some("save"));
//! ```

/// Non-owning handle to a widget in a tree owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl core::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "widget:{}", self.0)
    }
}

/// Read access to a widget hierarchy.
///
/// Only the two operations the tour depends on are required: enumerating a
/// container's children and reading a widget's name. `type_name` lets the
/// index skip widgets whose name is just their default, type-derived one.
pub trait WidgetTree {
    /// The toplevel container whose descendants are tour targets.
    fn root(&self) -> WidgetId;

    /// Direct children of `id`, in stacking order. Unknown ids have none.
    fn children(&self, id: WidgetId) -> &[WidgetId];

    /// Explicit name assigned to `id`, if any.
    fn name(&self, id: WidgetId) -> Option<&str>;

    /// Type name of `id` (the name a widget reports when none was assigned).
    fn type_name(&self, id: WidgetId) -> &str;
}

#[derive(Debug, Clone)]
struct Node {
    type_name: String,
    name: Option<String>,
    children: Vec<WidgetId>,
}

/// Owned widget tree with arena-allocated nodes.
///
/// Ids are dense indices; nodes are never removed, so a [`WidgetId`] handed
/// out by an arena stays valid for that arena's lifetime.
#[derive(Debug, Clone)]
pub struct WidgetArena {
    nodes: Vec<Node>,
}

impl WidgetArena {
    /// Create a tree containing only a root of the given type.
    #[must_use]
    pub fn new(root_type: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                type_name: root_type.into(),
                name: None,
                children: Vec::new(),
            }],
        }
    }

    /// Append an unnamed child of `type_name` under `parent`.
    ///
    /// An unknown `parent` attaches the node to the root.
    pub fn insert(&mut self, parent: WidgetId, type_name: impl Into<String>) -> WidgetId {
        let id = WidgetId(self.nodes.len() as u64);
        self.nodes.push(Node {
            type_name: type_name.into(),
            name: None,
            children: Vec::new(),
        });
        let parent = if self.contains(parent) {
            parent
        } else {
            self.root()
        };
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Append a named child of `type_name` under `parent`.
    pub fn insert_named(
        &mut self,
        parent: WidgetId,
        type_name: impl Into<String>,
        name: impl Into<String>,
    ) -> WidgetId {
        let id = self.insert(parent, type_name);
        self.set_name(id, Some(name.into()));
        id
    }

    /// Assign or clear a widget's explicit name. Unknown ids are ignored.
    pub fn set_name(&mut self, id: WidgetId, name: Option<String>) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.name = name;
        }
    }

    /// Whether `id` belongs to this arena.
    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        (id.0 as usize) < self.nodes.len()
    }

    /// Number of widgets, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// An arena always holds its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl WidgetTree for WidgetArena {
    fn root(&self) -> WidgetId {
        WidgetId(0)
    }

    fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id.0 as usize)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    fn name(&self, id: WidgetId) -> Option<&str> {
        self.nodes.get(id.0 as usize)?.name.as_deref()
    }

    fn type_name(&self, id: WidgetId) -> &str {
        self.nodes
            .get(id.0 as usize)
            .map_or("", |node| node.type_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_has_only_root() {
        let tree = WidgetArena::new("Window");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), WidgetId(0));
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.type_name(tree.root()), "Window");
        assert_eq!(tree.name(tree.root()), None);
    }

    #[test]
    fn insert_preserves_child_order() {
        let mut tree = WidgetArena::new("Window");
        let a = tree.insert(tree.root(), "Label");
        let b = tree.insert(tree.root(), "Button");
        assert_eq!(tree.children(tree.root()), &[a, b]);
    }

    #[test]
    fn unknown_parent_attaches_to_root() {
        let mut tree = WidgetArena::new("Window");
        let orphan = tree.insert(WidgetId(99), "Label");
        assert_eq!(tree.children(tree.root()), &[orphan]);
    }

    #[test]
    fn unknown_ids_read_as_empty() {
        let tree = WidgetArena::new("Window");
        let ghost = WidgetId(7);
        assert!(!tree.contains(ghost));
        assert!(tree.children(ghost).is_empty());
        assert_eq!(tree.name(ghost), None);
        assert_eq!(tree.type_name(ghost), "");
    }

    #[test]
    fn set_name_overrides_and_clears() {
        let mut tree = WidgetArena::new("Window");
        let w = tree.insert_named(tree.root(), "Entry", "search");
        tree.set_name(w, Some("query".into()));
        assert_eq!(tree.name(w), Some("query"));
        tree.set_name(w, None);
        assert_eq!(tree.name(w), None);
    }

    #[test]
    fn display_format() {
        assert_eq!(WidgetId(3).to_string(), "widget:3");
    }
}
