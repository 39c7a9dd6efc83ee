//! Mesh validation utilities.
//!
//! `MeshValidator` checks generated geometry: index layout, finite positions,
//! bounding-box dimensions, closedness and winding.

use glam::DVec3;

use crate::viewport::edge::extract_edges;
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Aabb;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    pub fn are_positions_finite(&self) -> bool {
        self.mesh.positions.iter().all(|p| p.is_finite())
    }

    /// Triangles with (near) zero area
    pub fn degenerate_triangle_count(&self) -> usize {
        (0..self.triangle_count())
            .filter(|&t| self.mesh.face_normal(t) == DVec3::ZERO)
            .count()
    }

    /// Edges used by only one triangle. Zero for a closed surface.
    pub fn boundary_edge_count(&self) -> usize {
        extract_edges(self.mesh)
            .iter()
            .filter(|e| e.is_boundary())
            .count()
    }

    pub fn is_closed(&self) -> bool {
        !self.mesh.is_empty() && self.boundary_edge_count() == 0
    }

    /// Signed volume by the divergence theorem; positive when a closed mesh
    /// winds counter-clockwise seen from outside.
    pub fn signed_volume(&self) -> f64 {
        self.mesh
            .triangles()
            .map(|[a, b, c]| a.dot(b.cross(c)) / 6.0)
            .sum()
    }

    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_mesh(self.mesh)
    }

    /// Width, height and depth of the bounding box
    pub fn dimensions(&self) -> DVec3 {
        self.aabb().map(|b| b.size()).unwrap_or(DVec3::ZERO)
    }

    /// Bounding-box dimensions equal `expected` within `tolerance` on every axis.
    pub fn dimensions_approx(&self, expected: DVec3, tolerance: f64) -> bool {
        (self.dimensions() - expected).abs().max_element() < tolerance
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
            // Triangle lookups below would index out of bounds
            return errors;
        }

        if !self.are_positions_finite() {
            errors.push("Some positions are not finite".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{build_default_primitive, build_extrusion, build_profile, flat_surface};
    use crate::build::{ProfileOptions, SketchTool};
    use shared::ShapeKind;

    fn simple_triangle() -> MeshData {
        let mut m = MeshData::new();
        let a = m.push_vertex(DVec3::new(0.0, 0.0, 0.0));
        let b = m.push_vertex(DVec3::new(1.0, 0.0, 0.0));
        let c = m.push_vertex(DVec3::new(0.0, 1.0, 0.0));
        m.push_triangle(a, b, c);
        m
    }

    #[test]
    fn test_counts() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.vertex_count(), 3);
        assert_eq!(v.triangle_count(), 1);
        assert!(v.validate_all().is_empty());
    }

    #[test]
    fn test_indices_out_of_range() {
        let bad = MeshData {
            positions: vec![DVec3::ZERO],
            indices: vec![0, 1, 2],
        };
        let v = MeshValidator::new(&bad);
        assert!(!v.are_indices_in_range());
        assert!(v.validate_all().iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_bad_stride_and_nan() {
        let bad = MeshData {
            positions: vec![DVec3::ZERO, DVec3::X, DVec3::new(f64::NAN, 0.0, 0.0)],
            indices: vec![0, 1],
        };
        let errors = MeshValidator::new(&bad).validate_all();
        assert!(errors.iter().any(|e| e.contains("multiple of 3")));
        assert!(errors.iter().any(|e| e.contains("not finite")));
    }

    #[test]
    fn test_open_triangle_not_closed() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.boundary_edge_count(), 3);
        assert!(!v.is_closed());
        assert!(v.dimensions_approx(DVec3::new(1.0, 1.0, 0.0), 1e-9));
    }

    #[test]
    fn test_box_closed_outward() {
        let desc = build_default_primitive(ShapeKind::Box).unwrap();
        let v = MeshValidator::new(&desc.mesh);
        assert!(v.validate_all().is_empty());
        assert!(v.is_closed());
        assert_eq!(v.degenerate_triangle_count(), 0);
        assert!((v.signed_volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_volume_close_to_analytic() {
        let desc = build_default_primitive(ShapeKind::Sphere).unwrap();
        let v = MeshValidator::new(&desc.mesh);
        assert!(v.is_closed());
        let analytic = 4.0 / 3.0 * std::f64::consts::PI * 0.125;
        let vol = v.signed_volume();
        assert!(vol > 0.0 && (vol - analytic).abs() / analytic < 0.05);
    }

    #[test]
    fn test_hollow_extrusion_closed() {
        let options = ProfileOptions {
            hollow: true,
            ..Default::default()
        };
        let profile = build_profile(
            SketchTool::Rectangle,
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, 1.0),
            &options,
        );
        let mesh = build_extrusion(&profile, 2.0);
        let v = MeshValidator::new(&mesh);
        assert!(v.validate_all().is_empty());
        assert!(v.is_closed());
        let expected = (profile.area()) * 2.0;
        assert!((v.signed_volume() - expected).abs() < 1e-6);
        assert!(v.dimensions_approx(DVec3::new(2.0, 2.0, 2.0), 1e-9));
    }

    #[test]
    fn test_flat_surface_is_open() {
        let profile = build_profile(
            SketchTool::Circle,
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            &ProfileOptions::default(),
        );
        let mesh = flat_surface(&profile);
        let v = MeshValidator::new(&mesh);
        assert!(!v.is_closed());
        assert!(v.dimensions().y.abs() < 1e-12);
    }
}
