//! Parametric primitive solids

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use shared::{ShapeKind, ShapeParams};

use crate::viewport::mesh::MeshData;

/// Built primitive: its parameters, declared logical counts and a render mesh
#[derive(Debug, Clone)]
pub struct PrimitiveDescriptor {
    pub params: ShapeParams,
    pub face_count: u32,
    pub edge_count: u32,
    pub mesh: MeshData,
}

/// Logical face/edge counts of a primitive. These describe the parametric
/// solid, not the triangle count of its render mesh.
pub fn primitive_counts(params: &ShapeParams) -> Option<(u32, u32)> {
    let counts = match *params {
        ShapeParams::Box { .. } => (6, 12),
        ShapeParams::Sphere {
            width_segments,
            height_segments,
            ..
        } => {
            let faces = width_segments.saturating_mul(height_segments);
            (faces, faces.saturating_mul(2))
        }
        ShapeParams::Cylinder {
            radial_segments, ..
        } => (
            radial_segments.saturating_add(2),
            radial_segments.saturating_mul(3),
        ),
        ShapeParams::Cone {
            radial_segments, ..
        } => (
            radial_segments.saturating_add(1),
            radial_segments.saturating_mul(2),
        ),
        ShapeParams::Torus {
            radial_segments,
            tubular_segments,
            ..
        } => {
            let n = radial_segments.saturating_mul(tubular_segments);
            (n, n)
        }
        ShapeParams::Plane { .. } => (2, 4),
        _ => return None,
    };
    Some(counts)
}

/// Build a primitive from its parameters
pub fn build_primitive(params: &ShapeParams) -> Result<PrimitiveDescriptor, String> {
    if !params.kind().is_primitive() {
        return Err(format!("{} is not a primitive", params.kind().label()));
    }
    params.validate()?;

    let mesh = match *params {
        ShapeParams::Box {
            width,
            height,
            depth,
        } => box_mesh(width, height, depth),
        ShapeParams::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere_mesh(radius, width_segments, height_segments),
        ShapeParams::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        } => cylinder_mesh(radius_top, radius_bottom, height, radial_segments),
        ShapeParams::Cone {
            radius,
            height,
            radial_segments,
        } => cylinder_mesh(0.0, radius, height, radial_segments),
        ShapeParams::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => torus_mesh(radius, tube, radial_segments, tubular_segments),
        ShapeParams::Plane { width, height } => plane_mesh(width, height),
        _ => return Err(format!("{} is not a primitive", params.kind().label())),
    };

    let (face_count, edge_count) = primitive_counts(params).unwrap_or((0, 0));
    Ok(PrimitiveDescriptor {
        params: params.clone(),
        face_count,
        edge_count,
        mesh,
    })
}

/// Build a primitive with its default parameters
pub fn build_default_primitive(kind: ShapeKind) -> Result<PrimitiveDescriptor, String> {
    let params = ShapeParams::default_for(kind)
        .ok_or_else(|| format!("{} has no default parameters", kind.label()))?;
    build_primitive(&params)
}

/// Axis-aligned box centered at the origin, four vertices per face
fn box_mesh(width: f64, height: f64, depth: f64) -> MeshData {
    let half = DVec3::new(width, height, depth) * 0.5;
    // (normal, u, v) with u × v = normal
    let faces = [
        (DVec3::X, DVec3::Y, DVec3::Z),
        (DVec3::NEG_X, DVec3::Z, DVec3::Y),
        (DVec3::Y, DVec3::Z, DVec3::X),
        (DVec3::NEG_Y, DVec3::X, DVec3::Z),
        (DVec3::Z, DVec3::X, DVec3::Y),
        (DVec3::NEG_Z, DVec3::Y, DVec3::X),
    ];

    let mut mesh = MeshData::new();
    for (n, u, v) in faces {
        let corner = |su: f64, sv: f64| (n + u * su + v * sv) * half;
        let a = mesh.push_vertex(corner(-1.0, -1.0));
        let b = mesh.push_vertex(corner(1.0, -1.0));
        let c = mesh.push_vertex(corner(1.0, 1.0));
        let d = mesh.push_vertex(corner(-1.0, 1.0));
        mesh.push_quad(a, b, c, d);
    }
    mesh
}

/// UV sphere centered at the origin, poles on the Y axis
fn sphere_mesh(radius: f64, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments as usize;
    let hs = height_segments as usize;
    let mut mesh = MeshData::new();

    for j in 0..=hs {
        let theta = j as f64 * PI / hs as f64;
        for i in 0..=ws {
            let phi = i as f64 * TAU / ws as f64;
            mesh.push_vertex(DVec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }

    let row = ws as u32 + 1;
    for j in 0..hs as u32 {
        for i in 0..ws as u32 {
            let a = j * row + i + 1;
            let b = j * row + i;
            let c = (j + 1) * row + i;
            let d = (j + 1) * row + i + 1;
            // Pole rows collapse to a single triangle
            if j != 0 {
                mesh.push_triangle(a, b, d);
            }
            if j != hs as u32 - 1 {
                mesh.push_triangle(b, c, d);
            }
        }
    }
    mesh
}

/// Truncated cone along Y centered at the origin; caps only for non-zero radii
fn cylinder_mesh(radius_top: f64, radius_bottom: f64, height: f64, radial_segments: u32) -> MeshData {
    let n = radial_segments as usize;
    let half = height * 0.5;
    let mut mesh = MeshData::new();

    let ring = |mesh: &mut MeshData, r: f64, y: f64| -> Vec<u32> {
        (0..n)
            .map(|i| {
                let a = i as f64 * TAU / n as f64;
                mesh.push_vertex(DVec3::new(r * a.sin(), y, r * a.cos()))
            })
            .collect()
    };
    let top = ring(&mut mesh, radius_top, half);
    let bottom = ring(&mut mesh, radius_bottom, -half);

    for i in 0..n {
        let next = (i + 1) % n;
        mesh.push_quad(top[i], bottom[i], bottom[next], top[next]);
    }

    if radius_top > 0.0 {
        let c = mesh.push_vertex(DVec3::new(0.0, half, 0.0));
        for i in 0..n {
            mesh.push_triangle(c, top[i], top[(i + 1) % n]);
        }
    }
    if radius_bottom > 0.0 {
        let c = mesh.push_vertex(DVec3::new(0.0, -half, 0.0));
        for i in 0..n {
            mesh.push_triangle(c, bottom[(i + 1) % n], bottom[i]);
        }
    }
    mesh
}

/// Torus in the XY plane centered at the origin
fn torus_mesh(radius: f64, tube: f64, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial = radial_segments as usize;
    let tubular = tubular_segments as usize;
    let mut mesh = MeshData::new();

    for j in 0..=radial {
        let v = j as f64 / radial as f64 * TAU;
        for i in 0..=tubular {
            let u = i as f64 / tubular as f64 * TAU;
            let ring = radius + tube * v.cos();
            mesh.push_vertex(DVec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin()));
        }
    }

    let row = tubular as u32 + 1;
    for j in 1..=radial as u32 {
        for i in 1..=tubular as u32 {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }
    mesh
}

/// Plane lying in XZ, facing +Y
fn plane_mesh(width: f64, height: f64) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut mesh = MeshData::new();
    let a = mesh.push_vertex(DVec3::new(-hw, 0.0, -hh));
    let b = mesh.push_vertex(DVec3::new(-hw, 0.0, hh));
    let c = mesh.push_vertex(DVec3::new(hw, 0.0, hh));
    let d = mesh.push_vertex(DVec3::new(hw, 0.0, -hh));
    mesh.push_quad(a, b, c, d);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MeshValidator;

    fn approx(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_default_counts() {
        let expect = [
            (ShapeKind::Box, 6, 12),
            (ShapeKind::Sphere, 32 * 16, 2 * 32 * 16),
            (ShapeKind::Cylinder, 34, 96),
            (ShapeKind::Cone, 33, 64),
            (ShapeKind::Torus, 16 * 48, 16 * 48),
            (ShapeKind::Plane, 2, 4),
        ];
        for (kind, faces, edges) in expect {
            let d = build_default_primitive(kind).unwrap();
            assert_eq!(d.params.kind(), kind);
            assert_eq!((d.face_count, d.edge_count), (faces, edges), "{:?}", kind);
            assert!(!d.mesh.is_empty());
        }
    }

    #[test]
    fn test_box_extent_and_normals() {
        let d = build_primitive(&ShapeParams::Box {
            width: 2.0,
            height: 3.0,
            depth: 4.0,
        })
        .unwrap();
        assert!(approx(d.mesh.extent(), DVec3::new(2.0, 3.0, 4.0)));
        assert_eq!(d.mesh.triangle_count(), 12);
        // Every face normal points away from the center
        for t in 0..d.mesh.triangle_count() {
            let [a, b, c] = d.mesh.triangle(t);
            let centroid = (a + b + c) / 3.0;
            assert!(d.mesh.face_normal(t).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_sphere_extent() {
        let d = build_default_primitive(ShapeKind::Sphere).unwrap();
        assert!(approx(d.mesh.extent(), DVec3::splat(1.0)));
    }

    #[test]
    fn test_cylinder_and_cone() {
        let cyl = build_default_primitive(ShapeKind::Cylinder).unwrap();
        assert!((cyl.mesh.extent().y - 1.0).abs() < 1e-9);
        // side quads + two cap fans
        assert_eq!(cyl.mesh.triangle_count(), 32 * 2 + 32 * 2);

        let cone = build_default_primitive(ShapeKind::Cone).unwrap();
        assert_eq!(cone.mesh.triangle_count(), 32 * 2 + 32);
    }

    #[test]
    fn test_torus_extent() {
        let d = build_default_primitive(ShapeKind::Torus).unwrap();
        let e = d.mesh.extent();
        assert!((e.x - 1.4).abs() < 1e-6);
        assert!((e.z - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_plane_faces_up() {
        let d = build_default_primitive(ShapeKind::Plane).unwrap();
        assert_eq!(d.mesh.triangle_count(), 2);
        assert!(approx(d.mesh.face_normal(0), DVec3::Y));
        assert!(approx(d.mesh.face_normal(1), DVec3::Y));
    }

    #[test]
    fn test_rejects_invalid_and_non_primitive() {
        assert!(build_primitive(&ShapeParams::Extruded { depth: 1.0 }).is_err());
        assert!(build_primitive(&ShapeParams::Box {
            width: -1.0,
            height: 1.0,
            depth: 1.0
        })
        .is_err());
        assert!(build_default_primitive(ShapeKind::SketchCircle).is_err());
        assert!(primitive_counts(&ShapeParams::Extruded { depth: 1.0 }).is_none());
    }

    #[test]
    fn test_custom_sphere_counts() {
        let d = build_primitive(&ShapeParams::Sphere {
            radius: 1.0,
            width_segments: 8,
            height_segments: 4,
        })
        .unwrap();
        assert_eq!(d.face_count, 32);
        assert_eq!(d.edge_count, 64);
    }

    #[test]
    fn test_solid_primitives_are_closed() {
        for kind in [
            ShapeKind::Box,
            ShapeKind::Sphere,
            ShapeKind::Cylinder,
            ShapeKind::Cone,
            ShapeKind::Torus,
        ] {
            let d = build_default_primitive(kind).unwrap();
            let v = MeshValidator::new(&d.mesh);
            assert!(v.validate_all().is_empty(), "{:?}: {:?}", kind, v.validate_all());
            assert!(v.is_closed(), "{:?} has {} open edges", kind, v.boundary_edge_count());
            assert!(v.signed_volume().abs() > 1e-3, "{:?}", kind);
        }
    }

    #[test]
    fn test_primitive_volumes() {
        let cyl = build_primitive(&ShapeParams::Cylinder {
            radius_top: 0.5,
            radius_bottom: 0.5,
            height: 2.0,
            radial_segments: 64,
        })
        .unwrap();
        let v = MeshValidator::new(&cyl.mesh);
        let expected = std::f64::consts::PI * 0.25 * 2.0;
        assert!(v.signed_volume() > 0.0);
        assert!((v.signed_volume() - expected).abs() / expected < 0.01);
        assert_eq!(v.degenerate_triangle_count(), 0);

        let torus = build_default_primitive(ShapeKind::Torus).unwrap();
        let v = MeshValidator::new(&torus.mesh);
        // 2π²Rr² with R = 0.5, r = 0.2
        let expected = 2.0 * std::f64::consts::PI.powi(2) * 0.5 * 0.04;
        assert!((v.signed_volume().abs() - expected).abs() / expected < 0.05);
    }

    #[test]
    fn test_plane_is_open() {
        let d = build_default_primitive(ShapeKind::Plane).unwrap();
        let v = MeshValidator::new(&d.mesh);
        assert!(v.validate_all().is_empty());
        assert!(!v.is_closed());
        assert_eq!(v.boundary_edge_count(), 4);
    }
}
