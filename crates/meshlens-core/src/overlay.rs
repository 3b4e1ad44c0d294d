//! Overlay batches for the drawing collaborator.
//!
//! Turns a classification result into flat, GPU-ready vertex lists per
//! category: points for vertex categories, line segments for edge
//! categories and fan-triangulated polygons for face categories. Colors and
//! sizes are passed through from [`OverlaySettings`]; nothing here draws.

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::category::{Category, ElementKind};
use crate::classify::{centroid, newell_normal};
use crate::result::ClassificationResult;

/// One overlay vertex, laid out for direct upload to a vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// World-space unit normal.
    pub normal: [f32; 3],
}

impl OverlayVertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Primitive topology of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// One vertex per point.
    Points,
    /// Two vertices per segment.
    Lines,
    /// Three vertices per triangle.
    Triangles,
}

impl Primitive {
    /// The primitive used to draw elements of a kind.
    pub fn for_element(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Vertex => Self::Points,
            ElementKind::Edge => Self::Lines,
            ElementKind::Face => Self::Triangles,
        }
    }
}

/// Display style of one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Whether the category is drawn.
    pub enabled: bool,
    /// RGBA color.
    pub color: Vec4,
}

/// Overlay display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    styles: BTreeMap<Category, OverlayStyle>,
    /// Distance face overlays are pushed along their normal.
    face_offset: f32,
    /// Point size of vertex overlays.
    vertex_radius: f32,
    /// Line width of edge overlays.
    edge_width: f32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        let styles = Category::ALL
            .into_iter()
            .map(|c| {
                let style = OverlayStyle {
                    // These two cover nearly every element of a clean mesh
                    enabled: !matches!(c, Category::Regular | Category::ManifoldInterior),
                    color: c.default_color(),
                };
                (c, style)
            })
            .collect();

        Self {
            styles,
            face_offset: 0.001,
            vertex_radius: 10.0,
            edge_width: 5.0,
        }
    }
}

impl OverlaySettings {
    /// Style of a category.
    pub fn style(&self, category: Category) -> OverlayStyle {
        self.styles.get(&category).copied().unwrap_or(OverlayStyle {
            enabled: false,
            color: category.default_color(),
        })
    }

    /// Shows or hides a category.
    pub fn set_enabled(&mut self, category: Category, enabled: bool) {
        let mut style = self.style(category);
        style.enabled = enabled;
        self.styles.insert(category, style);
    }

    /// Sets a category's color.
    pub fn set_color(&mut self, category: Category, color: Vec4) {
        let mut style = self.style(category);
        style.color = color.clamp(Vec4::ZERO, Vec4::ONE);
        self.styles.insert(category, style);
    }

    /// Returns the face offset.
    pub fn face_offset(&self) -> f32 {
        self.face_offset
    }

    /// Sets the face offset.
    pub fn set_face_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.face_offset = offset;
        }
    }

    /// Returns the vertex point size.
    pub fn vertex_radius(&self) -> f32 {
        self.vertex_radius
    }

    /// Sets the vertex point size, clamped to 1..=50.
    pub fn set_vertex_radius(&mut self, radius: f32) {
        if !radius.is_nan() {
            self.vertex_radius = radius.clamp(1.0, 50.0);
        }
    }

    /// Returns the edge line width.
    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    /// Sets the edge line width, clamped to 1..=10.
    pub fn set_edge_width(&mut self, width: f32) {
        if !width.is_nan() {
            self.edge_width = width.clamp(1.0, 10.0);
        }
    }
}

/// Everything needed to draw one category.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBatch {
    /// The category drawn.
    pub category: Category,
    /// How `vertices` is to be assembled.
    pub primitive: Primitive,
    /// World-space vertex data.
    pub vertices: Vec<OverlayVertex>,
    /// RGBA color.
    pub color: Vec4,
    /// Point size or line width; zero for triangles.
    pub size: f32,
}

impl OverlayBatch {
    /// Vertex data as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Returns true if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Builds the overlay geometry of one category in world space.
pub fn build_overlay(
    result: &ClassificationResult,
    category: Category,
    settings: &OverlaySettings,
    transform: Mat4,
) -> OverlayBatch {
    let normals = match category.element() {
        ElementKind::Vertex | ElementKind::Edge => vertex_normals(result),
        ElementKind::Face => Vec::new(),
    };
    let to_world = WorldTransform::new(transform);
    batch_with_normals(result, category, settings, &to_world, &normals)
}

/// Builds a batch for every enabled category that has elements.
pub fn overlay_batches(
    result: &ClassificationResult,
    settings: &OverlaySettings,
) -> Vec<OverlayBatch> {
    let to_world = WorldTransform::new(result.transform());
    let mut normals: Option<Vec<Vec3>> = None;
    let mut batches = Vec::new();

    for category in Category::ALL {
        if !settings.style(category).enabled || result.stats().get(category) == 0 {
            continue;
        }
        let normals: &[Vec3] = match category.element() {
            ElementKind::Vertex | ElementKind::Edge => {
                normals.get_or_insert_with(|| vertex_normals(result)).as_slice()
            }
            ElementKind::Face => &[],
        };
        batches.push(batch_with_normals(result, category, settings, &to_world, normals));
    }
    batches
}

/// `normals` must hold one entry per vertex for point and line categories.
fn batch_with_normals(
    result: &ClassificationResult,
    category: Category,
    settings: &OverlaySettings,
    to_world: &WorldTransform,
    normals: &[Vec3],
) -> OverlayBatch {
    let kind = category.element();
    let ids = result.element_ids(category);
    let mut vertices = Vec::new();

    let size = match kind {
        ElementKind::Vertex => {
            vertices.reserve(ids.len());
            for &v in &ids {
                let vertex = &result.vertices()[v as usize];
                vertices.push(to_world.vertex(vertex.position, normals[v as usize], 0.0));
            }
            settings.vertex_radius()
        }
        ElementKind::Edge => {
            vertices.reserve(ids.len() * 2);
            for &e in &ids {
                for v in result.edges()[e as usize].vertices {
                    let position = result.vertices()[v as usize].position;
                    vertices.push(to_world.vertex(position, normals[v as usize], 0.0));
                }
            }
            settings.edge_width()
        }
        ElementKind::Face => {
            let offset = settings.face_offset();
            for &f in &ids {
                let face = &result.faces()[f as usize];
                let corners = &face.vertices;
                let position = |i: usize| result.vertices()[corners[i] as usize].position;
                // Fan triangulation: (n-2) triangles for an n-gon
                for i in 1..corners.len() - 1 {
                    for p in [position(0), position(i), position(i + 1)] {
                        vertices.push(to_world.vertex(p, face.normal, offset));
                    }
                }
            }
            0.0
        }
    };

    let style = settings.style(category);
    OverlayBatch {
        category,
        primitive: Primitive::for_element(kind),
        vertices,
        color: style.color,
        size,
    }
}

/// Computes vertex normals as area-weighted average of incident face normals.
fn vertex_normals(result: &ClassificationResult) -> Vec<Vec3> {
    let positions: Vec<Vec3> = result.vertices().iter().map(|v| v.position).collect();
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for face in result.faces() {
        // Newell vector length is proportional to area
        let center = centroid(&positions, &face.vertices);
        let weighted = newell_normal(&positions, &face.vertices, center);
        for &v in &face.vertices {
            normals[v as usize] += weighted;
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

struct WorldTransform {
    points: Mat4,
    normals: Mat3,
}

impl WorldTransform {
    fn new(transform: Mat4) -> Self {
        let linear = Mat3::from_mat4(transform);
        let normals = if linear.determinant().abs() > f32::EPSILON {
            linear.inverse().transpose()
        } else {
            linear
        };
        Self {
            points: transform,
            normals,
        }
    }

    fn vertex(&self, position: Vec3, normal: Vec3, offset: f32) -> OverlayVertex {
        let normal = (self.normals * normal).normalize_or_zero();
        let position = self.points.transform_point3(position) + normal * offset;
        OverlayVertex::new(position, normal)
    }
}
