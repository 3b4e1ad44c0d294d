//! Classification tags and the category catalog.
//!
//! Every element carries one mutually exclusive class (manifold class for
//! vertices and edges, shape for faces) plus independent flags. A
//! [`Category`] names one overlay row: the set of elements of one kind that
//! carry a given class or flag.

use bitflags::bitflags;
use glam::Vec4;
use serde::{Deserialize, Serialize};

/// The kind of mesh element a category applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    /// Mesh vertices.
    Vertex,
    /// Mesh edges.
    Edge,
    /// Mesh faces.
    Face,
}

/// Manifold class of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexManifold {
    /// No incident edges.
    Isolated,
    /// Incident faces do not form one connected fan, or a wire edge touches it.
    NonManifold,
    /// Everything else.
    Regular,
}

/// Pole class of a vertex, by incident edge count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoleClass {
    /// Not a pole.
    None,
    /// Exactly 3 incident edges.
    NPole,
    /// Exactly 5 incident edges.
    EPole,
    /// 6 or more incident edges.
    HighPole,
}

impl PoleClass {
    /// Classifies an incident edge count.
    pub fn from_edge_count(count: usize) -> Self {
        match count {
            3 => Self::NPole,
            5 => Self::EPole,
            n if n >= 6 => Self::HighPole,
            _ => Self::None,
        }
    }
}

/// Tags of one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexTags {
    /// Manifold class.
    pub manifold: VertexManifold,
    /// Pole class.
    pub pole: PoleClass,
}

/// Manifold class of an edge, by incident face count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeManifold {
    /// Used by a number of faces other than 1 or 2 (including wire edges).
    NonManifold,
    /// Used by exactly one face.
    Boundary,
    /// Used by exactly two faces.
    Interior,
}

impl EdgeManifold {
    /// Classifies an incident face count.
    pub fn from_face_count(count: usize) -> Self {
        match count {
            1 => Self::Boundary,
            2 => Self::Interior,
            _ => Self::NonManifold,
        }
    }
}

bitflags! {
    /// Authored edge attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EdgeFlags: u8 {
        /// Edge is marked sharp.
        const SHARP = 0b0000_0001;
        /// Edge is a UV seam.
        const SEAM = 0b0000_0010;
    }
}

/// Tags of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeTags {
    /// Manifold class.
    pub manifold: EdgeManifold,
    /// Authored attributes.
    pub flags: EdgeFlags,
}

/// Shape of a face, by corner count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceShape {
    /// 3 corners.
    Triangle,
    /// 4 corners.
    Quad,
    /// 5 or more corners.
    NGon,
}

impl FaceShape {
    /// Classifies a corner count. Counts below 3 are treated as triangles;
    /// extraction never produces them.
    pub fn from_corner_count(count: usize) -> Self {
        match count {
            0..=3 => Self::Triangle,
            4 => Self::Quad,
            _ => Self::NGon,
        }
    }
}

bitflags! {
    /// Geometric face defects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FaceFlags: u8 {
        /// Zero area, coincident corners, or fewer than 3 distinct vertices.
        const DEGENERATE = 0b0000_0001;
        /// Corners deviate from the best-fit plane beyond the threshold.
        const NON_PLANAR = 0b0000_0010;
    }
}

/// Tags of one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceTags {
    /// Shape class.
    pub shape: FaceShape,
    /// Geometric defects.
    pub flags: FaceFlags,
}

/// An overlay category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Vertices with no edges.
    Isolated,
    /// Vertices whose faces do not form a single fan.
    NonManifoldVertex,
    /// Vertices that are neither isolated nor non-manifold.
    Regular,
    /// Vertices with 3 edges.
    NPole,
    /// Vertices with 5 edges.
    EPole,
    /// Vertices with 6+ edges.
    HighPole,
    /// Edges not used by exactly 1 or 2 faces.
    NonManifoldEdge,
    /// Edges used by one face.
    Boundary,
    /// Edges used by two faces.
    ManifoldInterior,
    /// Edges marked sharp.
    Sharp,
    /// Edges marked as UV seams.
    Seam,
    /// Three-sided faces.
    Triangle,
    /// Four-sided faces.
    Quad,
    /// Faces with five or more sides.
    NGon,
    /// Zero-area or collapsed faces.
    Degenerate,
    /// Faces that are not flat.
    NonPlanar,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 16;

    /// Every category, in display order.
    pub const ALL: [Category; Self::COUNT] = [
        Category::Isolated,
        Category::NonManifoldVertex,
        Category::Regular,
        Category::NPole,
        Category::EPole,
        Category::HighPole,
        Category::NonManifoldEdge,
        Category::Boundary,
        Category::ManifoldInterior,
        Category::Sharp,
        Category::Seam,
        Category::Triangle,
        Category::Quad,
        Category::NGon,
        Category::Degenerate,
        Category::NonPlanar,
    ];

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The element kind this category selects.
    pub fn element(self) -> ElementKind {
        match self {
            Self::Isolated
            | Self::NonManifoldVertex
            | Self::Regular
            | Self::NPole
            | Self::EPole
            | Self::HighPole => ElementKind::Vertex,
            Self::NonManifoldEdge
            | Self::Boundary
            | Self::ManifoldInterior
            | Self::Sharp
            | Self::Seam => ElementKind::Edge,
            Self::Triangle | Self::Quad | Self::NGon | Self::Degenerate | Self::NonPlanar => {
                ElementKind::Face
            }
        }
    }

    /// Stable identifier, suitable for settings keys.
    pub fn id(self) -> &'static str {
        match self {
            Self::Isolated => "single_vertices",
            Self::NonManifoldVertex => "non_manifold_vertices",
            Self::Regular => "regular_vertices",
            Self::NPole => "n_pole_vertices",
            Self::EPole => "e_pole_vertices",
            Self::HighPole => "high_pole_vertices",
            Self::NonManifoldEdge => "non_manifold_edges",
            Self::Boundary => "boundary_edges",
            Self::ManifoldInterior => "manifold_edges",
            Self::Sharp => "sharp_edges",
            Self::Seam => "seam_edges",
            Self::Triangle => "tri_faces",
            Self::Quad => "quad_faces",
            Self::NGon => "ngon_faces",
            Self::Degenerate => "degenerate_faces",
            Self::NonPlanar => "non_planar_faces",
        }
    }

    /// Looks a category up by its [`id`](Category::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Short UI label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Isolated => "Single Vertices",
            Self::NonManifoldVertex => "Non-Manifold Vertices",
            Self::Regular => "Regular Vertices",
            Self::NPole => "N-Poles (3)",
            Self::EPole => "E-Poles (5)",
            Self::HighPole => "High-Poles (6+)",
            Self::NonManifoldEdge => "Non-Manifold Edges",
            Self::Boundary => "Boundary Edges",
            Self::ManifoldInterior => "Manifold Edges",
            Self::Sharp => "Sharp Edges",
            Self::Seam => "Seam Edges",
            Self::Triangle => "Triangles",
            Self::Quad => "Quads",
            Self::NGon => "N-Gons",
            Self::Degenerate => "Degenerate Faces",
            Self::NonPlanar => "Non-Planar Faces",
        }
    }

    /// One-line UI description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Isolated => "Vertices not connected to any edge",
            Self::NonManifoldVertex => "Vertices whose faces do not form a single fan",
            Self::Regular => "Vertices with manifold connectivity",
            Self::NPole => "Vertices with 3 edges",
            Self::EPole => "Vertices with 5 edges",
            Self::HighPole => "Vertices with 6 or more edges",
            Self::NonManifoldEdge => "Edges shared by other than one or two faces",
            Self::Boundary => "Edges on mesh boundaries",
            Self::ManifoldInterior => "Edges shared by exactly two faces",
            Self::Sharp => "Edges marked sharp",
            Self::Seam => "Edges marked as UV seams",
            Self::Triangle => "Faces with three sides",
            Self::Quad => "Faces with four sides",
            Self::NGon => "Faces with five or more sides",
            Self::Degenerate => "Faces with zero area or invalid geometry",
            Self::NonPlanar => "Faces whose corners are not on a common plane",
        }
    }

    /// Default overlay color (RGBA).
    pub fn default_color(self) -> Vec4 {
        match self {
            Self::Isolated => Vec4::new(1.0, 1.0, 0.0, 0.5),
            Self::NonManifoldVertex | Self::Degenerate => Vec4::new(1.0, 0.0, 0.5, 0.5),
            Self::Regular | Self::ManifoldInterior => Vec4::new(0.6, 0.6, 0.6, 0.5),
            Self::NPole | Self::NonManifoldEdge => Vec4::new(1.0, 0.5, 0.0, 0.5),
            Self::EPole | Self::Boundary => Vec4::new(0.0, 1.0, 1.0, 0.5),
            Self::HighPole => Vec4::new(1.0, 0.0, 1.0, 0.5),
            Self::Sharp => Vec4::new(1.0, 1.0, 1.0, 0.5),
            Self::Seam | Self::Triangle => Vec4::new(1.0, 0.0, 0.0, 0.5),
            Self::Quad => Vec4::new(0.0, 1.0, 0.0, 0.5),
            Self::NGon => Vec4::new(0.0, 0.0, 1.0, 0.5),
            Self::NonPlanar => Vec4::new(1.0, 0.7, 0.0, 0.5),
        }
    }

    /// Whether a vertex with these tags belongs to this category.
    pub fn matches_vertex(self, tags: &VertexTags) -> bool {
        match self {
            Self::Isolated => tags.manifold == VertexManifold::Isolated,
            Self::NonManifoldVertex => tags.manifold == VertexManifold::NonManifold,
            Self::Regular => tags.manifold == VertexManifold::Regular,
            Self::NPole => tags.pole == PoleClass::NPole,
            Self::EPole => tags.pole == PoleClass::EPole,
            Self::HighPole => tags.pole == PoleClass::HighPole,
            _ => false,
        }
    }

    /// Whether an edge with these tags belongs to this category.
    pub fn matches_edge(self, tags: &EdgeTags) -> bool {
        match self {
            Self::NonManifoldEdge => tags.manifold == EdgeManifold::NonManifold,
            Self::Boundary => tags.manifold == EdgeManifold::Boundary,
            Self::ManifoldInterior => tags.manifold == EdgeManifold::Interior,
            Self::Sharp => tags.flags.contains(EdgeFlags::SHARP),
            Self::Seam => tags.flags.contains(EdgeFlags::SEAM),
            _ => false,
        }
    }

    /// Whether a face with these tags belongs to this category.
    pub fn matches_face(self, tags: &FaceTags) -> bool {
        match self {
            Self::Triangle => tags.shape == FaceShape::Triangle,
            Self::Quad => tags.shape == FaceShape::Quad,
            Self::NGon => tags.shape == FaceShape::NGon,
            Self::Degenerate => tags.flags.contains(FaceFlags::DEGENERATE),
            Self::NonPlanar => tags.flags.contains(FaceFlags::NON_PLANAR),
            _ => false,
        }
    }
}
