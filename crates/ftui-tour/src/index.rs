#![forbid(unsafe_code)]

//! Name → widget lookup table built from a toplevel tree.
//!
//! # Invariants
//!
//! 1. Only descendants of the root are indexed; the root itself is not.
//! 2. A widget is indexed only when its explicit name is non-empty and
//!    differs from its type name.
//! 3. When several widgets share a name, the one visited last in
//!    depth-first pre-order wins.
//! 4. The index stores handles only. A rebuilt tree needs a rebuilt index.

use ahash::AHashMap;

use crate::widget::{WidgetId, WidgetTree};

/// Mapping from widget name to widget handle.
#[derive(Debug, Clone, Default)]
pub struct WidgetIndex {
    by_name: AHashMap<String, WidgetId>,
}

impl WidgetIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every named descendant of `tree.root()`.
    #[must_use]
    pub fn build<T: WidgetTree + ?Sized>(tree: &T) -> Self {
        let mut index = Self::new();
        let root = tree.root();

        // Explicit stack, children pushed reversed so pops follow pre-order.
        let mut stack: Vec<WidgetId> = tree.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(name) = tree.name(id)
                && !name.is_empty()
                && name != tree.type_name(id)
            {
                index.by_name.insert(name.to_owned(), id);
            }
            stack.extend(tree.children(id).iter().rev().copied());
        }

        tracing::debug!(entries = index.len(), root = %root, "widget index built");
        index
    }

    /// Look up a widget by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<WidgetId> {
        self.by_name.get(name).copied()
    }

    /// Whether `name` is indexed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of indexed names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Indexed names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
