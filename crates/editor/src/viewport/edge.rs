//! Edge extraction for triangle meshes
//!
//! Builds the edge-outline overlay drawn over solids in the default view mode:
//! boundary edges of open meshes plus edges where adjacent faces meet at an angle.

use std::collections::HashMap;

use glam::DVec3;

use super::mesh::MeshData;

/// Faces meeting at more than this angle produce an outline edge
pub const OUTLINE_THRESHOLD_DEGREES: f64 = 30.0;

/// Represents an edge in a mesh
#[derive(Debug, Clone)]
pub struct MeshEdge {
    pub start: DVec3,
    pub end: DVec3,
    pub normal1: DVec3,
    /// None for boundary edges (only one adjacent triangle)
    pub normal2: Option<DVec3>,
}

impl MeshEdge {
    /// Angle between the adjacent face normals (in radians); zero for boundary edges
    pub fn dihedral_angle(&self) -> f64 {
        match self.normal2 {
            Some(n2) => self.normal1.dot(n2).clamp(-1.0, 1.0).acos(),
            None => 0.0,
        }
    }

    /// Check if this is a "sharp" edge (faces meet at angle)
    pub fn is_sharp(&self, threshold_degrees: f64) -> bool {
        self.dihedral_angle().to_degrees() > threshold_degrees
    }

    pub fn is_boundary(&self) -> bool {
        self.normal2.is_none()
    }
}

type QuantizedPos = (i64, i64, i64);

fn quantize_position(pos: DVec3) -> QuantizedPos {
    let scale = 10000.0;
    (
        (pos.x * scale).round() as i64,
        (pos.y * scale).round() as i64,
        (pos.z * scale).round() as i64,
    )
}

fn edge_key(p1: QuantizedPos, p2: QuantizedPos) -> (QuantizedPos, QuantizedPos) {
    if p1 < p2 {
        (p1, p2)
    } else {
        (p2, p1)
    }
}

/// Extract all edges from a mesh, in first-seen order.
/// Vertices are matched by position so split (flat-shaded) vertices still share edges.
pub fn extract_edges(mesh: &MeshData) -> Vec<MeshEdge> {
    let mut slots: HashMap<(QuantizedPos, QuantizedPos), usize> = HashMap::new();
    let mut edges: Vec<MeshEdge> = Vec::new();

    for tri_idx in 0..mesh.triangle_count() {
        let [v0, v1, v2] = mesh.triangle(tri_idx);
        let normal = mesh.face_normal(tri_idx);
        if normal == DVec3::ZERO {
            continue;
        }

        for (va, vb) in [(v0, v1), (v1, v2), (v2, v0)] {
            let key = edge_key(quantize_position(va), quantize_position(vb));
            if key.0 == key.1 {
                continue;
            }
            match slots.get(&key) {
                Some(&slot) => {
                    let edge = &mut edges[slot];
                    if edge.normal2.is_none() {
                        edge.normal2 = Some(normal);
                    }
                }
                None => {
                    slots.insert(key, edges.len());
                    edges.push(MeshEdge {
                        start: va,
                        end: vb,
                        normal1: normal,
                        normal2: None,
                    });
                }
            }
        }
    }

    edges
}

/// Line segments of the outline overlay: boundary edges and sharp edges
pub fn outline_segments(mesh: &MeshData, threshold_degrees: f64) -> Vec<[DVec3; 2]> {
    extract_edges(mesh)
        .into_iter()
        .filter(|e| e.is_boundary() || e.is_sharp(threshold_degrees))
        .map(|e| [e.start, e.end])
        .collect()
}
