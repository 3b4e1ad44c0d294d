//! Edge classification by incident face count, plus authored flags.

use crate::category::{EdgeFlags, EdgeManifold, EdgeTags};
use crate::topology::MeshTopology;

/// Classifies one edge.
pub(crate) fn classify_edge(topology: &MeshTopology, e: u32) -> EdgeTags {
    let edge = topology.edge(e);

    let mut flags = EdgeFlags::empty();
    flags.set(EdgeFlags::SHARP, edge.sharp);
    flags.set(EdgeFlags::SEAM, edge.seam);

    EdgeTags {
        manifold: EdgeManifold::from_face_count(topology.face_count(e)),
        flags,
    }
}
