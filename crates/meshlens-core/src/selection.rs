//! Category queries and selection combination.
//!
//! The engine never touches the host's selection state. It computes the
//! element set a gesture would produce and leaves applying it to the caller.

use std::collections::{BTreeMap, BTreeSet};

use crate::category::{Category, ElementKind};
use crate::result::ClassificationResult;

/// How a category's elements combine with an existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectMode {
    /// Select exactly the category's elements.
    #[default]
    Replace,
    /// Add the category's elements to the selection.
    Add,
    /// Remove the category's elements from the selection.
    Subtract,
}

/// A set of selected element ids, per element kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    vertices: BTreeSet<u32>,
    edges: BTreeSet<u32>,
    faces: BTreeSet<u32>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selection holding the given ids of one kind.
    pub fn from_ids(kind: ElementKind, ids: impl IntoIterator<Item = u32>) -> Self {
        let mut selection = Self::new();
        selection.set_mut(kind).extend(ids);
        selection
    }

    /// Selected ids of one kind, ascending.
    pub fn ids(&self, kind: ElementKind) -> &BTreeSet<u32> {
        match kind {
            ElementKind::Vertex => &self.vertices,
            ElementKind::Edge => &self.edges,
            ElementKind::Face => &self.faces,
        }
    }

    /// Whether an element is selected.
    pub fn contains(&self, kind: ElementKind, id: u32) -> bool {
        self.ids(kind).contains(&id)
    }

    /// Total number of selected elements.
    pub fn len(&self) -> usize {
        self.vertices.len() + self.edges.len() + self.faces.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_mut(&mut self, kind: ElementKind) -> &mut BTreeSet<u32> {
        match kind {
            ElementKind::Vertex => &mut self.vertices,
            ElementKind::Edge => &mut self.edges,
            ElementKind::Face => &mut self.faces,
        }
    }

    /// Combines `ids` of one kind into this selection.
    pub fn apply(&mut self, kind: ElementKind, ids: &[u32], mode: SelectMode) {
        match mode {
            SelectMode::Replace => {
                *self = Self::from_ids(kind, ids.iter().copied());
            }
            SelectMode::Add => {
                self.set_mut(kind).extend(ids.iter().copied());
            }
            SelectMode::Subtract => {
                let set = self.set_mut(kind);
                for id in ids {
                    set.remove(id);
                }
            }
        }
    }
}

/// Computes the selection produced by applying `category` to `current`.
///
/// `Replace` yields exactly the category's elements, `Add` yields the union
/// and `Subtract` the difference. An empty category is not an error.
pub fn select(
    result: &ClassificationResult,
    category: Category,
    mode: SelectMode,
    current: &Selection,
) -> Selection {
    let ids = result.element_ids(category);
    let mut selection = current.clone();
    selection.apply(category.element(), &ids, mode);
    selection
}

/// Element counts for every category, zero counts included.
pub fn stats(result: &ClassificationResult) -> BTreeMap<Category, usize> {
    result.stats().to_map()
}
