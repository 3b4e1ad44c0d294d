//! Face classification: shape, degeneracy and planarity.

use glam::Vec3;

use crate::category::{FaceFlags, FaceShape, FaceTags};
use crate::options::{AnalysisOptions, PlanarityMetric};

/// Shape tags plus the geometry computed along the way.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FaceAnalysis {
    pub tags: FaceTags,
    pub normal: Vec3,
    pub deviation: f32,
}

/// Computes the centroid of a face's corners.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn centroid(positions: &[Vec3], corners: &[u32]) -> Vec3 {
    let sum: Vec3 = corners.iter().map(|&v| positions[v as usize]).sum();
    sum / corners.len() as f32
}

/// Newell normal: the sum of consecutive edge cross products around the
/// centroid. Its length is twice the (projected) polygon area.
pub(crate) fn newell_normal(positions: &[Vec3], corners: &[u32], center: Vec3) -> Vec3 {
    let n = corners.len();
    let mut normal = Vec3::ZERO;
    for i in 0..n {
        let a = positions[corners[i] as usize] - center;
        let b = positions[corners[(i + 1) % n] as usize] - center;
        normal += a.cross(b);
    }
    normal
}

/// Classifies one face.
pub(crate) fn classify_face(
    positions: &[Vec3],
    corners: &[u32],
    options: &AnalysisOptions,
    test_planarity: bool,
) -> FaceAnalysis {
    let shape = FaceShape::from_corner_count(corners.len());
    let center = centroid(positions, corners);
    let newell = newell_normal(positions, corners, center);
    let area = newell.length() * 0.5;

    let mut flags = FaceFlags::empty();
    if is_degenerate(positions, corners, area, options) {
        flags |= FaceFlags::DEGENERATE;
        return FaceAnalysis {
            tags: FaceTags { shape, flags },
            normal: Vec3::ZERO,
            deviation: 0.0,
        };
    }

    let normal = newell.normalize_or_zero();
    let mut deviation = 0.0;
    if test_planarity && corners.len() > 3 {
        let metric = options.planarity.metric;
        deviation = planarity_deviation(positions, corners, center, normal, metric);
        if deviation > options.planarity.value {
            flags |= FaceFlags::NON_PLANAR;
        }
    }

    FaceAnalysis {
        tags: FaceTags { shape, flags },
        normal,
        deviation,
    }
}

fn is_degenerate(
    positions: &[Vec3],
    corners: &[u32],
    area: f32,
    options: &AnalysisOptions,
) -> bool {
    let mut distinct = corners.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 3 {
        return true;
    }

    let n = corners.len();
    let eps_sq = options.coincident_epsilon * options.coincident_epsilon;
    let coincident = (0..n).any(|i| {
        let a = positions[corners[i] as usize];
        let b = positions[corners[(i + 1) % n] as usize];
        a.distance_squared(b) <= eps_sq
    });

    coincident || area < options.degenerate_area_epsilon
}

/// Largest deviation of any corner from the plane through `center` with unit `normal`.
///
/// Deviations within f32 rounding of the face's coordinates count as zero.
fn planarity_deviation(
    positions: &[Vec3],
    corners: &[u32],
    center: Vec3,
    normal: Vec3,
    metric: PlanarityMetric,
) -> f32 {
    let offsets: Vec<Vec3> = corners.iter().map(|&v| positions[v as usize] - center).collect();
    let (max_dist, size) = offsets.iter().fold((0.0f32, 0.0f32), |(dist, size), d| {
        (dist.max(d.dot(normal).abs()), size.max(d.length()))
    });

    let noise_floor = 4.0 * f32::EPSILON * size.max(center.abs().max_element());
    if max_dist <= noise_floor {
        return 0.0;
    }

    match metric {
        PlanarityMetric::Distance => max_dist,
        PlanarityMetric::Relative => max_dist / size,
        PlanarityMetric::Angle => offsets
            .iter()
            .filter_map(|d| {
                let len = d.length();
                (len > 0.0).then(|| {
                    (d.dot(normal).abs() / len)
                        .clamp(0.0, 1.0)
                        .asin()
                        .to_degrees()
                })
            })
            .fold(0.0, f32::max),
    }
}
