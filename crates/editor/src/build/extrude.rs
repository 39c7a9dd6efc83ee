//! Flat and extruded sketch geometry

use glam::DVec3;
use kurbo::Point;

use super::profile::Profile2D;
use crate::viewport::mesh::MeshData;

/// Work-plane point → world point at height `y`
fn lift(p: Point, y: f64) -> DVec3 {
    DVec3::new(p.x, y, p.y)
}

/// Triangulate a profile in its 2D frame.
///
/// Returns the vertex list (outer ring followed by the hole ring) and
/// counter-clockwise triangles indexing into it. The outer boundary is convex
/// for every sketch tool, so a fan covers it; a hole with the same vertex
/// count as the outer ring is covered by a ring strip.
pub fn triangulate_profile(profile: &Profile2D) -> (Vec<Point>, Vec<[u32; 3]>) {
    let n = profile.outer.len();
    let mut points = profile.outer.clone();
    let mut triangles = Vec::new();

    match profile.holes.as_slice() {
        [] => {
            for i in 1..n.saturating_sub(1) {
                triangles.push([0, i as u32, i as u32 + 1]);
            }
        }
        [hole] if hole.len() == n => {
            points.extend_from_slice(hole);
            for i in 0..n {
                let next = (i + 1) % n;
                let (o0, o1) = (i as u32, next as u32);
                let (h0, h1) = ((n + i) as u32, (n + next) as u32);
                triangles.push([o0, o1, h1]);
                triangles.push([o0, h1, h0]);
            }
        }
        _ => {
            tracing::warn!(
                holes = profile.holes.len(),
                "unsupported hole layout, filling outer boundary only"
            );
            for i in 1..n.saturating_sub(1) {
                triangles.push([0, i as u32, i as u32 + 1]);
            }
        }
    }

    (points, triangles)
}

/// Flat surface of a profile in the work-plane (y = 0), facing +Y
pub fn flat_surface(profile: &Profile2D) -> MeshData {
    let (points, triangles) = triangulate_profile(profile);
    let mut mesh = MeshData::new();
    for p in &points {
        mesh.push_vertex(lift(*p, 0.0));
    }
    // Counter-clockwise in (x, z) faces -Y, so flip for an upward surface
    for [a, b, c] in triangles {
        mesh.push_triangle(a, c, b);
    }
    mesh
}

/// Prism of a profile along +Y, centered on y = 0 (from -depth/2 to depth/2)
pub fn build_extrusion(profile: &Profile2D, depth: f64) -> MeshData {
    let half = depth * 0.5;
    let (points, triangles) = triangulate_profile(profile);
    let mut mesh = MeshData::new();

    // Caps
    let top: Vec<u32> = points.iter().map(|p| mesh.push_vertex(lift(*p, half))).collect();
    let bottom: Vec<u32> = points
        .iter()
        .map(|p| mesh.push_vertex(lift(*p, -half)))
        .collect();
    for [a, b, c] in &triangles {
        let (a, b, c) = (*a as usize, *b as usize, *c as usize);
        mesh.push_triangle(top[a], top[c], top[b]);
        mesh.push_triangle(bottom[a], bottom[b], bottom[c]);
    }

    // Side walls; outer walls face away from the profile, hole walls into the hole
    push_walls(&mut mesh, &profile.outer, half, true);
    for hole in &profile.holes {
        push_walls(&mut mesh, hole, half, false);
    }

    mesh
}

fn push_walls(mesh: &mut MeshData, ring: &[Point], half: f64, outward: bool) {
    let n = ring.len();
    for i in 0..n {
        let p0 = ring[i];
        let p1 = ring[(i + 1) % n];
        let b0 = mesh.push_vertex(lift(p0, -half));
        let b1 = mesh.push_vertex(lift(p1, -half));
        let t1 = mesh.push_vertex(lift(p1, half));
        let t0 = mesh.push_vertex(lift(p0, half));
        if outward {
            mesh.push_quad(b0, t0, t1, b1);
        } else {
            mesh.push_quad(b0, b1, t1, t0);
        }
    }
}

/// Closed outline strokes of every ring at height `y` (first point repeated at the end)
pub fn outline_strokes(profile: &Profile2D, y: f64) -> Vec<Vec<DVec3>> {
    std::iter::once(&profile.outer)
        .chain(profile.holes.iter())
        .filter(|ring| !ring.is_empty())
        .map(|ring| {
            let mut stroke: Vec<DVec3> = ring.iter().map(|p| lift(*p, y)).collect();
            stroke.push(lift(ring[0], y));
            stroke
        })
        .collect()
}

/// Logical counts of a flat sketch surface: one face bounded by every segment
pub fn flat_counts(profile: &Profile2D) -> (u32, u32) {
    (1, profile.segment_count() as u32)
}

/// Logical counts of an extruded profile: two caps plus one wall per segment
pub fn extruded_counts(profile: &Profile2D) -> (u32, u32) {
    let segments = profile.segment_count() as u32;
    (segments + 2, segments * 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::profile::{build_profile, ProfileOptions, SketchTool};
    use crate::validation::MeshValidator;

    fn rect(hollow: bool) -> Profile2D {
        build_profile(
            SketchTool::Rectangle,
            DVec3::ZERO,
            DVec3::new(2.0, 0.0, 1.0),
            &ProfileOptions {
                hollow,
                polygon_sides: 6.0,
            },
        )
    }

    fn mesh_area(mesh: &MeshData) -> f64 {
        mesh.triangles()
            .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
            .sum()
    }

    #[test]
    fn test_fan_triangulation() {
        let (points, tris) = triangulate_profile(&rect(false));
        assert_eq!(points.len(), 4);
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn test_ring_triangulation_covers_area() {
        let profile = rect(true);
        let surface = flat_surface(&profile);
        assert_eq!(surface.triangle_count(), 8);
        assert!((mesh_area(&surface) - profile.area()).abs() < 1e-9);
    }

    #[test]
    fn test_flat_surface_faces_up() {
        let surface = flat_surface(&rect(false));
        for t in 0..surface.triangle_count() {
            assert!((surface.face_normal(t) - DVec3::Y).length() < 1e-9);
        }
        assert!(surface.extent().y.abs() < 1e-12);
    }

    #[test]
    fn test_extrusion_is_centered() {
        let mesh = build_extrusion(&rect(false), 3.0);
        let e = mesh.extent();
        assert!((e.x - 2.0).abs() < 1e-9);
        assert!((e.y - 3.0).abs() < 1e-9);
        assert!((e.z - 1.0).abs() < 1e-9);
        let min_y = mesh.positions.iter().map(|p| p.y).fold(f64::MAX, f64::min);
        assert!((min_y + 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_extrusion_normals_point_outward() {
        let mesh = build_extrusion(&rect(false), 1.0);
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t);
            let centroid = (a + b + c) / 3.0;
            assert!(mesh.face_normal(t).dot(centroid) > 0.0, "triangle {}", t);
        }
    }

    #[test]
    fn test_hollow_extrusion_has_inner_walls() {
        let solid = build_extrusion(&rect(false), 1.0);
        let hollow = build_extrusion(&rect(true), 1.0);
        // caps: 2 vs 8 triangles each; walls: 4 vs 8 quads
        assert_eq!(solid.triangle_count(), 2 * 2 + 4 * 2);
        assert_eq!(hollow.triangle_count(), 8 * 2 + 8 * 2);
    }

    #[test]
    fn test_outline_strokes_closed() {
        let strokes = outline_strokes(&rect(true), 0.01);
        assert_eq!(strokes.len(), 2);
        for s in &strokes {
            assert_eq!(s.len(), 5);
            assert_eq!(s.first(), s.last());
            assert!(s.iter().all(|p| (p.y - 0.01).abs() < 1e-12));
        }
    }

    #[test]
    fn test_counts() {
        assert_eq!(flat_counts(&rect(false)), (1, 4));
        assert_eq!(extruded_counts(&rect(false)), (6, 12));
        assert_eq!(extruded_counts(&rect(true)), (10, 24));
    }

    #[test]
    fn test_every_tool_extrudes_to_closed_solid() {
        for tool in SketchTool::ALL {
            for hollow in [false, true] {
                let profile = build_profile(
                    tool,
                    DVec3::new(-1.0, 0.0, -0.5),
                    DVec3::new(1.5, 0.0, 1.0),
                    &ProfileOptions {
                        hollow,
                        polygon_sides: 6.0,
                    },
                );
                let mesh = build_extrusion(&profile, 0.75);
                let v = MeshValidator::new(&mesh);
                assert!(v.validate_all().is_empty(), "{:?} hollow={}", tool, hollow);
                assert!(
                    v.is_closed(),
                    "{:?} hollow={} has {} open edges",
                    tool,
                    hollow,
                    v.boundary_edge_count()
                );
                assert_eq!(v.degenerate_triangle_count(), 0, "{:?} hollow={}", tool, hollow);
                let expected = profile.area() * 0.75;
                assert!(
                    (v.signed_volume().abs() - expected).abs() < 1e-9,
                    "{:?} hollow={}: {} vs {}",
                    tool,
                    hollow,
                    v.signed_volume(),
                    expected
                );
            }
        }
    }

    #[test]
    fn test_flat_surface_is_open() {
        let surface = flat_surface(&rect(true));
        let v = MeshValidator::new(&surface);
        assert!(v.validate_all().is_empty());
        assert!(!v.is_closed());
        // outer and hole rings
        assert_eq!(v.boundary_edge_count(), 8);
    }
}
