//! Classification results and aggregate statistics.

use std::collections::BTreeMap;

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::category::{Category, EdgeTags, ElementKind, FaceTags, VertexTags};
use crate::snapshot::ExtractionWarnings;

/// A classified vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedVertex {
    /// Local-space position.
    pub position: Vec3,
    /// Number of incident edges.
    pub edge_count: u32,
    /// Classification tags.
    pub tags: VertexTags,
}

/// A classified edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedEdge {
    /// Endpoint vertex ids, sorted.
    pub vertices: [u32; 2],
    /// Number of (face, edge) incidences.
    pub face_count: u32,
    /// Classification tags.
    pub tags: EdgeTags,
}

/// A classified face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedFace {
    /// Corner vertex ids in loop order.
    pub vertices: Vec<u32>,
    /// Edge ids in loop order.
    pub edges: Vec<u32>,
    /// Unit normal of the best-fit plane, zero for degenerate faces.
    pub normal: Vec3,
    /// Largest corner deviation from the plane, in the configured metric.
    pub planarity_deviation: f32,
    /// Classification tags.
    pub tags: FaceTags,
}

bitflags! {
    /// Passes replaced by cheaper approximations on large meshes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DegradedPasses: u8 {
        /// Vertex manifold test used incident-face counts instead of fan walks.
        const FAN_CONNECTIVITY = 0b0000_0001;
        /// Planarity was not tested; no face is tagged non-planar.
        const PLANARITY = 0b0000_0010;
    }
}

/// Per-category element counts, gathered during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    counts: [usize; Category::COUNT],
}

impl Statistics {
    /// Counts one more element in a category.
    pub(crate) fn record(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    /// Number of elements in a category.
    pub fn get(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// Every category with its count, zero counts included, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Every category with its count as a map.
    pub fn to_map(&self) -> BTreeMap<Category, usize> {
        self.iter().collect()
    }
}

/// The complete analysis of one mesh snapshot.
///
/// Immutable once built. A refresh produces a new result that replaces the
/// old one in the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub(crate) name: String,
    pub(crate) vertices: Vec<TaggedVertex>,
    pub(crate) edges: Vec<TaggedEdge>,
    pub(crate) faces: Vec<TaggedFace>,
    pub(crate) stats: Statistics,
    pub(crate) warnings: ExtractionWarnings,
    pub(crate) degraded: DegradedPasses,
    pub(crate) transform: Mat4,
}

impl ClassificationResult {
    /// Name of the analyzed object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classified vertices, indexed by vertex id.
    pub fn vertices(&self) -> &[TaggedVertex] {
        &self.vertices
    }

    /// Classified edges, indexed by edge id.
    pub fn edges(&self) -> &[TaggedEdge] {
        &self.edges
    }

    /// Classified faces, indexed by face id.
    pub fn faces(&self) -> &[TaggedFace] {
        &self.faces
    }

    /// Aggregate counts.
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// What extraction had to repair.
    pub fn warnings(&self) -> ExtractionWarnings {
        self.warnings
    }

    /// Passes that ran in degraded mode.
    pub fn degraded(&self) -> DegradedPasses {
        self.degraded
    }

    /// Object-to-world transform at the time of analysis.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Number of elements of a kind.
    pub fn num_elements(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Vertex => self.vertices.len(),
            ElementKind::Edge => self.edges.len(),
            ElementKind::Face => self.faces.len(),
        }
    }

    /// Ids of the elements in a category, ascending.
    pub fn element_ids(&self, category: Category) -> Vec<u32> {
        match category.element() {
            ElementKind::Vertex => ids_where(&self.vertices, |v| category.matches_vertex(&v.tags)),
            ElementKind::Edge => ids_where(&self.edges, |e| category.matches_edge(&e.tags)),
            ElementKind::Face => ids_where(&self.faces, |f| category.matches_face(&f.tags)),
        }
    }
}

fn ids_where<T>(elements: &[T], pred: impl Fn(&T) -> bool) -> Vec<u32> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, e)| pred(e))
        .map(|(i, _)| i as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_include_zero_counts() {
        let mut stats = Statistics::default();
        stats.record(Category::Quad);
        stats.record(Category::Quad);
        stats.record(Category::NPole);

        let map = stats.to_map();
        assert_eq!(map.len(), Category::COUNT);
        assert_eq!(map[&Category::Quad], 2);
        assert_eq!(map[&Category::NPole], 1);
        assert_eq!(map[&Category::NGon], 0);
    }

    #[test]
    fn test_statistics_iterate_in_display_order() {
        let stats = Statistics::default();
        let order: Vec<Category> = stats.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }
}
